use super::{HttpReply, PredictionError, PredictionPayload, Transport};
use serde_json::Value;
use std::time::Instant;

/// Headers sent with every prediction request. The second one gets the call
/// past the tunnel's browser-warning interstitial.
pub(crate) const REQUEST_HEADERS: &[(&str, &str)] = &[
    ("Content-Type", "application/json"),
    ("ngrok-skip-browser-warning", "true"),
];

/// Prediction service client bound to one endpoint.
pub(crate) struct PredictionClient<T> {
    endpoint: String,
    transport: T,
}

impl<T: Transport> PredictionClient<T> {
    pub(crate) fn new(endpoint: impl Into<String>, transport: T) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
        }
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform one round trip and reduce the reply to a predicted value.
    pub(crate) fn predict(&self, payload: &PredictionPayload) -> Result<f64, PredictionError> {
        let body = serde_json::to_string(&[payload])
            .map_err(|err| PredictionError::Encode(err.to_string()))?;

        let start = Instant::now();
        let reply: Result<HttpReply, PredictionError> =
            self.transport.post_json(&self.endpoint, REQUEST_HEADERS, &body);
        let elapsed_ms = start.elapsed().as_millis();

        let reply = match reply {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(elapsed_ms, error = %err, "prediction request failed");
                return Err(err);
            }
        };
        tracing::info!(
            elapsed_ms,
            status = reply.status,
            request_bytes = body.len(),
            response_bytes = reply.body.len(),
            "prediction request complete"
        );

        if !(200..300).contains(&reply.status) {
            return Err(PredictionError::Status(reply.status));
        }
        parse_prediction(&reply.body)
    }
}

/// Pull `prediction` out of element 0 of a JSON array body.
pub(crate) fn parse_prediction(body: &str) -> Result<f64, PredictionError> {
    let value: Value = serde_json::from_str(body).map_err(|err| {
        PredictionError::MalformedResponse(format!("response JSON failed to parse: {err}"))
    })?;
    let Some(items) = value.as_array() else {
        return Err(PredictionError::MalformedResponse(
            "expected a JSON array".to_string(),
        ));
    };
    let Some(first) = items.first() else {
        return Err(PredictionError::MalformedResponse(
            "empty result array".to_string(),
        ));
    };
    first
        .get("prediction")
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            PredictionError::MalformedResponse("missing numeric prediction field".to_string())
        })
}
