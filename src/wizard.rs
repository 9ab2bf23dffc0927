//! In-memory wizard state: current step, raw field text, holiday flag, and
//! the prediction/loading status shown alongside the form.
use crate::catalog::{self, FieldGroup};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum WizardError {
    #[error("unknown field {0:?}")]
    UnknownField(String),
}

/// Wizard state for one mount.
///
/// `values` always holds exactly the catalog key set. Values are raw text;
/// nothing is parsed until a payload is built.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WizardState {
    current_step: usize,
    values: BTreeMap<String, String>,
    is_holiday: bool,
    prediction: Option<f64>,
    is_loading: bool,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub(crate) fn new() -> Self {
        Self {
            current_step: 0,
            values: catalog::defaults(),
            is_holiday: false,
            prediction: None,
            is_loading: false,
        }
    }

    /// Store raw text for a catalog field. Unknown names leave state untouched.
    pub(crate) fn set_field(&mut self, name: &str, raw: &str) -> Result<(), WizardError> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = raw.to_string();
                Ok(())
            }
            None => Err(WizardError::UnknownField(name.to_string())),
        }
    }

    pub(crate) fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub(crate) fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Jump to `index`; out-of-range indices are ignored. Returns whether the
    /// step changed.
    pub(crate) fn go_to_step(&mut self, index: usize) -> bool {
        if index >= catalog::group_count() || index == self.current_step {
            return false;
        }
        self.current_step = index;
        true
    }

    pub(crate) fn next_step(&mut self) -> bool {
        self.go_to_step(self.current_step + 1)
    }

    pub(crate) fn previous_step(&mut self) -> bool {
        match self.current_step.checked_sub(1) {
            Some(index) => self.go_to_step(index),
            None => false,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.values = catalog::defaults();
        self.is_holiday = false;
        self.prediction = None;
        self.current_step = 0;
    }

    pub(crate) fn toggle_holiday(&mut self, flag: bool) {
        self.is_holiday = flag;
    }

    pub(crate) fn is_holiday(&self) -> bool {
        self.is_holiday
    }

    pub(crate) fn current_step(&self) -> usize {
        self.current_step
    }

    pub(crate) fn current_group(&self) -> &'static FieldGroup {
        &catalog::groups()[self.current_step]
    }

    pub(crate) fn is_first_step(&self) -> bool {
        self.current_step == 0
    }

    pub(crate) fn is_last_step(&self) -> bool {
        self.current_step + 1 == catalog::group_count()
    }

    pub(crate) fn prediction(&self) -> Option<f64> {
        self.prediction
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// A request started: show the spinner and drop any previous result.
    pub(crate) fn begin_loading(&mut self) {
        self.is_loading = true;
        self.prediction = None;
    }

    /// A request ended. `prediction` is `None` for failed or discarded calls.
    pub(crate) fn finish_loading(&mut self, prediction: Option<f64>) {
        self.is_loading = false;
        if prediction.is_some() {
            self.prediction = prediction;
        }
    }
}
