//! Line-oriented wizard front-end.
//!
//! Reads one command per line and renders the current step after every
//! change. Works over any reader/writer pair so it can be scripted.
use crate::catalog;
use crate::format::{format_currency, step_caption};
use crate::predict::{PredictionClient, Transport};
use crate::session::{NoticeKind, RequestOutcome, WizardSession};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

const HELP: &str = "\
Commands:
  set <NAME> <VALUE>   Edit a field on any step (VALUE may be empty)
  next | prev          Move between steps
  goto <N>             Jump to step N (1-based)
  info <NAME>          Describe a field
  holiday on|off       Toggle the holiday-week flag
  predict              Request a forecast (final step only)
  reset                Restore every default and return to step 1
  show                 Redraw the current step
  help                 Show this list
  quit                 Leave the wizard";

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Set(&'a str, &'a str),
    Next,
    Previous,
    Goto(&'a str),
    Info(&'a str),
    Holiday(&'a str),
    Predict,
    Reset,
    Show,
    Help,
    Quit,
    Blank,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    match command {
        "" => Input::Blank,
        "set" => {
            let (name, value) = rest
                .split_once(char::is_whitespace)
                .map(|(name, value)| (name, value.trim()))
                .unwrap_or((rest, ""));
            Input::Set(name, value)
        }
        "next" | "n" => Input::Next,
        "prev" | "previous" | "p" => Input::Previous,
        "goto" => Input::Goto(rest),
        "info" => Input::Info(rest),
        "holiday" => Input::Holiday(rest),
        "predict" => Input::Predict,
        "reset" => Input::Reset,
        "show" => Input::Show,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => Input::Unknown(other),
    }
}

pub(crate) fn render_step<W: Write>(out: &mut W, session: &WizardSession) -> Result<()> {
    let state = session.state();
    let group = state.current_group();
    writeln!(out)?;
    writeln!(
        out,
        "== {} ({}) ==",
        group.title,
        step_caption(state.current_step(), catalog::group_count())
    )?;
    writeln!(
        out,
        "Holiday Week: {}",
        if state.is_holiday() { "on" } else { "off" }
    )?;
    for field in group.fields {
        writeln!(
            out,
            "  {:<18} {:<14} = {:<12} {}",
            field.label,
            format!("[{}]", field.name),
            state.value(field.name).unwrap_or_default(),
            field.tooltip
        )?;
    }
    let mut actions = Vec::new();
    if !state.is_first_step() {
        actions.push("prev");
    }
    actions.push("reset");
    actions.push(if state.is_last_step() { "predict" } else { "next" });
    writeln!(out, "Actions: {}", actions.join(" | "))?;
    if state.is_loading() {
        writeln!(out, "Predicting...")?;
    }
    if let Some(prediction) = state.prediction() {
        writeln!(out, "Predicted Weekly Sales: {}", format_currency(prediction))?;
    }
    Ok(())
}

fn report_outcome<W: Write>(
    out: &mut W,
    session: &WizardSession,
    outcome: &RequestOutcome,
) -> Result<()> {
    match outcome {
        RequestOutcome::Rejected(err) => writeln!(out, "{err}")?,
        RequestOutcome::Discarded => writeln!(out, "Response dropped: the form was reset")?,
        RequestOutcome::Predicted(_) | RequestOutcome::Failed(_) => {
            if let Some(notice) = session.last_notice() {
                let marker = match notice.kind {
                    NoticeKind::Success => "ok",
                    NoticeKind::Failure => "error",
                };
                writeln!(out, "[{marker}] {}: {}", notice.title, notice.description)?;
            }
        }
    }
    Ok(())
}

/// Run the wizard until `quit` or end of input.
pub(crate) fn run<R, W, T>(
    input: R,
    out: &mut W,
    session: &mut WizardSession,
    client: &PredictionClient<T>,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    T: Transport,
{
    render_step(out, session)?;
    for line in input.lines() {
        let line = line.context("read wizard input")?;
        let redraw = match parse_input(&line) {
            Input::Blank => false,
            Input::Quit => break,
            Input::Help => {
                writeln!(out, "{HELP}")?;
                false
            }
            Input::Show => true,
            Input::Set(name, value) => match session.set_field(name, value) {
                Ok(()) => true,
                Err(err) => {
                    writeln!(out, "{err}; fields: {}", catalog::field_names().join(", "))?;
                    false
                }
            },
            Input::Info(name) => {
                match catalog::find(name) {
                    Some(field) => writeln!(
                        out,
                        "{} [{}]: {} (default {})",
                        field.label, field.name, field.tooltip, field.default
                    )?,
                    None => writeln!(out, "unknown field {name:?}")?,
                }
                false
            }
            Input::Next => {
                if !session.next_step() {
                    writeln!(out, "Already on the final step")?;
                }
                true
            }
            Input::Previous => {
                if !session.previous_step() {
                    writeln!(out, "Already on the first step")?;
                }
                true
            }
            Input::Goto(raw) => match raw.parse::<usize>() {
                Ok(step) if (1..=catalog::group_count()).contains(&step) => {
                    session.go_to_step(step - 1);
                    true
                }
                _ => {
                    writeln!(out, "Step must be 1-{}", catalog::group_count())?;
                    false
                }
            },
            Input::Holiday(raw) => match raw {
                "on" | "yes" | "true" => {
                    session.toggle_holiday(true);
                    true
                }
                "off" | "no" | "false" => {
                    session.toggle_holiday(false);
                    true
                }
                _ => {
                    writeln!(out, "Usage: holiday on|off")?;
                    false
                }
            },
            Input::Reset => {
                session.reset();
                true
            }
            Input::Predict => {
                if session.state().is_last_step() {
                    writeln!(out, "Predicting...")?;
                    out.flush()?;
                    let outcome = session.submit(client);
                    report_outcome(out, session, &outcome)?;
                    true
                } else {
                    writeln!(out, "Predict is available on the final step")?;
                    false
                }
            }
            Input::Unknown(command) => {
                writeln!(out, "Unknown command {command:?}; type 'help'")?;
                false
            }
        };
        if redraw {
            render_step(out, session)?;
        }
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::{HttpReply, PredictionError};
    use std::cell::RefCell;

    struct ScriptedTransport {
        replies: RefCell<Vec<HttpReply>>,
        bodies: RefCell<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<(u16, &str)>) -> Self {
            Self {
                replies: RefCell::new(
                    replies
                        .into_iter()
                        .rev()
                        .map(|(status, body)| HttpReply {
                            status,
                            body: body.to_string(),
                        })
                        .collect(),
                ),
                bodies: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn post_json(
            &self,
            _url: &str,
            _headers: &[(&str, &str)],
            body: &str,
        ) -> Result<HttpReply, PredictionError> {
            self.bodies.borrow_mut().push(body.to_string());
            self.replies
                .borrow_mut()
                .pop()
                .ok_or_else(|| PredictionError::Transport("no scripted reply".to_string()))
        }
    }

    fn run_script(
        script: &str,
        replies: Vec<(u16, &str)>,
    ) -> (String, WizardSession, Vec<String>) {
        let client = PredictionClient::new(
            "http://forecast.test/predict",
            ScriptedTransport::new(replies),
        );
        let mut session = WizardSession::new();
        let mut out = Vec::new();
        run(script.as_bytes(), &mut out, &mut session, &client).expect("run wizard");
        let bodies = client_bodies(&client);
        (String::from_utf8(out).expect("utf8 output"), session, bodies)
    }

    fn client_bodies(client: &PredictionClient<ScriptedTransport>) -> Vec<String> {
        client.transport().bodies.borrow().clone()
    }

    #[test]
    fn parse_input_splits_name_and_value() {
        assert_eq!(parse_input("set Store 12"), Input::Set("Store", "12"));
        assert_eq!(parse_input("  set   CPI   1 2 "), Input::Set("CPI", "1 2"));
        assert_eq!(parse_input("set Week"), Input::Set("Week", ""));
        assert_eq!(parse_input("goto 3"), Input::Goto("3"));
        assert_eq!(parse_input("info CPI"), Input::Info("CPI"));
        assert_eq!(parse_input(""), Input::Blank);
        assert_eq!(parse_input("dance"), Input::Unknown("dance"));
    }

    #[test]
    fn full_walkthrough_predicts_on_final_step() {
        let script = "set Store 12\nholiday on\nnext\nnext\nnext\nset Temperature abc\nnext\npredict\nquit\n";
        let (output, session, bodies) =
            run_script(script, vec![(200, r#"[{"prediction": 21543.7}]"#)]);

        assert!(output.contains("Step 5 of 5"));
        assert!(output.contains("[ok] Prediction Complete: Sales forecast generated successfully!"));
        assert!(output.contains("Predicted Weekly Sales: $21,543.70"));
        assert_eq!(session.state().prediction(), Some(21543.7));

        assert_eq!(bodies.len(), 1);
        let sent: serde_json::Value = serde_json::from_str(&bodies[0]).expect("json body");
        assert_eq!(sent[0]["Store"], serde_json::Value::from(12.0));
        assert_eq!(sent[0]["IsHoliday"], serde_json::Value::from(1.0));
        assert!(sent[0]["Temperature"].is_null());
    }

    #[test]
    fn predict_before_final_step_is_refused() {
        let (output, session, bodies) = run_script("predict\n", Vec::new());
        assert!(output.contains("Predict is available on the final step"));
        assert!(bodies.is_empty());
        assert!(!session.state().is_loading());
    }

    #[test]
    fn failure_is_reported_and_no_prediction_shown() {
        let (output, session, _) = run_script("goto 5\npredict\n", vec![(500, "")]);
        assert!(output.contains("[error] Prediction Failed: HTTP error! status: 500"));
        assert!(!output.contains("Predicted Weekly Sales"));
        assert!(session.state().prediction().is_none());
    }

    #[test]
    fn navigation_reports_boundaries_and_reset_returns_to_start() {
        let (output, session, _) =
            run_script("prev\ngoto 9\ngoto 5\nnext\nset Bogus 1\nreset\n", Vec::new());
        assert!(output.contains("Already on the first step"));
        assert!(output.contains("Step must be 1-5"));
        assert!(output.contains("Already on the final step"));
        assert!(output.contains("unknown field \"Bogus\"; fields: Store, Dept, Type, Size"));
        assert_eq!(session.state().current_step(), 0);
    }

    #[test]
    fn info_describes_fields_from_any_step() {
        let (output, _, _) = run_script("info Fuel_Price\ninfo Nope\n", Vec::new());
        assert!(output.contains(
            "Fuel Price [Fuel_Price]: Average fuel price in the region (default 2.572)"
        ));
        assert!(output.contains("unknown field \"Nope\""));
    }

    #[test]
    fn end_of_input_ends_the_session() {
        let (output, session, _) = run_script("set Dept 4", Vec::new());
        assert!(output.contains("== Store Information (Step 1 of 5) =="));
        assert_eq!(session.state().value("Dept"), Some("4"));
    }
}
