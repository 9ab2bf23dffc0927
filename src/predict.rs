//! Prediction request: payload assembly, the HTTP leg, and response
//! reduction.
//!
//! A call is exactly one POST of a one-element JSON array. There are no
//! retries; every failure is terminal for that call and is reported as a
//! single [`PredictionError`].

mod client;
mod payload;
mod transport;

pub(crate) use client::PredictionClient;
pub(crate) use payload::PredictionPayload;
pub(crate) use transport::{HttpReply, Transport, UreqTransport};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum PredictionError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The service answered outside 2xx.
    #[error("HTTP error! status: {0}")]
    Status(u16),
    /// 2xx, but the body is not `[{"prediction": <number>, ...}, ...]`.
    #[error("Invalid response format: {0}")]
    MalformedResponse(String),
    /// The payload could not be serialized. Every payload field is an `f64`
    /// and non-finite values are written as `null`, so a well-formed
    /// payload never produces this.
    #[error("failed to encode payload: {0}")]
    Encode(String),
    /// Another request from the same session has not finished yet.
    #[error("a prediction request is already in flight")]
    Busy,
}
