//! Wizard controller: owns the state for one mount and runs the prediction
//! lifecycle (idle -> loading -> success/error) against it.
//!
//! Requests are split into begin/finish so the single-flight rule and the
//! reset generation check are explicit even though the CLI host performs the
//! call synchronously.
use crate::predict::{PredictionClient, PredictionError, PredictionPayload, Transport};
use crate::wizard::{WizardError, WizardState};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoticeKind {
    Success,
    Failure,
}

/// User-visible message raised when a request settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    pub(crate) kind: NoticeKind,
    pub(crate) title: String,
    pub(crate) description: String,
}

impl Notice {
    fn success() -> Self {
        Self {
            kind: NoticeKind::Success,
            title: "Prediction Complete".to_string(),
            description: "Sales forecast generated successfully!".to_string(),
        }
    }

    fn failure(err: &PredictionError) -> Self {
        Self {
            kind: NoticeKind::Failure,
            title: "Prediction Failed".to_string(),
            description: err.to_string(),
        }
    }
}

/// Occupies the session's single-flight slot until dropped.
#[derive(Debug)]
struct InFlight(Rc<Cell<bool>>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// A begun request. Not `Clone`: each ticket settles exactly once.
///
/// Dropping a ticket without settling it frees the slot for the next
/// request; the loading flag stays set until that request settles.
#[derive(Debug)]
#[must_use = "settle the ticket with `finish_request`"]
pub(crate) struct Ticket {
    generation: u64,
    payload: PredictionPayload,
    _slot: InFlight,
}

impl Ticket {
    pub(crate) fn payload(&self) -> &PredictionPayload {
        &self.payload
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RequestOutcome {
    Predicted(f64),
    Failed(PredictionError),
    /// The response arrived after a reset and was dropped.
    Discarded,
    /// Not started because another request is in flight.
    Rejected(PredictionError),
}

#[derive(Debug, Default)]
pub(crate) struct WizardSession {
    state: WizardState,
    generation: u64,
    in_flight: Rc<Cell<bool>>,
    last_notice: Option<Notice>,
}

impl WizardSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn state(&self) -> &WizardState {
        &self.state
    }

    pub(crate) fn last_notice(&self) -> Option<&Notice> {
        self.last_notice.as_ref()
    }

    pub(crate) fn set_field(&mut self, name: &str, raw: &str) -> Result<(), WizardError> {
        self.state.set_field(name, raw)
    }

    pub(crate) fn go_to_step(&mut self, index: usize) -> bool {
        self.state.go_to_step(index)
    }

    pub(crate) fn next_step(&mut self) -> bool {
        self.state.next_step()
    }

    pub(crate) fn previous_step(&mut self) -> bool {
        self.state.previous_step()
    }

    pub(crate) fn toggle_holiday(&mut self, flag: bool) {
        self.state.toggle_holiday(flag);
    }

    /// Reset the form. Any response still owed to an earlier request will be
    /// discarded when it arrives.
    pub(crate) fn reset(&mut self) {
        self.generation += 1;
        self.state.reset();
        tracing::debug!(generation = self.generation, "wizard reset");
    }

    pub(crate) fn begin_request(&mut self) -> Result<Ticket, PredictionError> {
        if self.in_flight.get() {
            tracing::warn!("prediction requested while another is in flight");
            return Err(PredictionError::Busy);
        }
        self.in_flight.set(true);
        self.state.begin_loading();
        let payload = PredictionPayload::from_state(&self.state);
        let unparsed = payload
            .entries()
            .iter()
            .filter(|(_, value)| value.is_nan())
            .count();
        tracing::debug!(
            generation = self.generation,
            unparsed,
            "prediction request started"
        );
        Ok(Ticket {
            generation: self.generation,
            payload,
            _slot: InFlight(Rc::clone(&self.in_flight)),
        })
    }

    pub(crate) fn finish_request(
        &mut self,
        ticket: Ticket,
        result: Result<f64, PredictionError>,
    ) -> RequestOutcome {
        let ticket_generation = ticket.generation;
        drop(ticket);
        if ticket_generation != self.generation {
            tracing::warn!(
                ticket_generation,
                generation = self.generation,
                "discarding prediction response issued before reset"
            );
            self.state.finish_loading(None);
            return RequestOutcome::Discarded;
        }
        match result {
            Ok(value) => {
                self.state.finish_loading(Some(value));
                self.last_notice = Some(Notice::success());
                RequestOutcome::Predicted(value)
            }
            Err(err) => {
                self.state.finish_loading(None);
                self.last_notice = Some(Notice::failure(&err));
                RequestOutcome::Failed(err)
            }
        }
    }

    /// Begin, perform, and settle one request on the calling thread.
    pub(crate) fn submit<T: Transport>(&mut self, client: &PredictionClient<T>) -> RequestOutcome {
        let ticket = match self.begin_request() {
            Ok(ticket) => ticket,
            Err(err) => return RequestOutcome::Rejected(err),
        };
        let result = client.predict(ticket.payload());
        self.finish_request(ticket, result)
    }
}
