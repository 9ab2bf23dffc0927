use anyhow::{anyhow, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;

mod catalog;
mod cli;
mod config;
mod format;
mod interactive;
mod logging;
mod predict;
mod sequencer;
mod session;
mod wizard;

use cli::{CatalogArgs, Command, EndpointArgs, PredictArgs, RootArgs, SplashArgs, WizardArgs};
use config::Settings;
use predict::{PredictionClient, PredictionPayload, UreqTransport};
use sequencer::clock::{ManualClock, SystemClock};
use sequencer::driver::{run_sequence, CancelToken, RunOutcome};
use sequencer::{LoadingSequencer, SequencerEvent, SequencerTimings};
use session::{RequestOutcome, WizardSession};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    logging::init(args.verbose);

    match args.command {
        Command::Wizard(args) => cmd_wizard(args),
        Command::Predict(args) => cmd_predict(args),
        Command::Catalog(args) => cmd_catalog(args),
        Command::Splash(args) => cmd_splash(args),
    }
}

fn cmd_wizard(args: WizardArgs) -> Result<()> {
    let settings = resolve_endpoint_settings(&args.endpoint)?;
    if !args.no_splash {
        let outcome = play_loading_sequence(settings.timings, args.instant, None, None)?;
        if outcome != RunOutcome::Completed {
            return Ok(());
        }
    }

    let client = prediction_client(&settings);
    let mut session = WizardSession::new();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Sales forecast wizard (type 'help' for commands)")?;
    interactive::run(stdin.lock(), &mut out, &mut session, &client)
}

fn cmd_predict(args: PredictArgs) -> Result<()> {
    let settings = resolve_endpoint_settings(&args.endpoint)?;
    let mut session = WizardSession::new();
    for assignment in &args.set {
        let (name, value) = parse_assignment(assignment)?;
        session
            .set_field(name, value)
            .with_context(|| format!("--set {assignment}"))?;
    }
    session.toggle_holiday(args.holiday);

    let payload = PredictionPayload::from_state(session.state());
    let client = prediction_client(&settings);
    match session.submit(&client) {
        RequestOutcome::Predicted(value) => {
            if args.json {
                let report = serde_json::json!({
                    "prediction": value,
                    "formatted": format::format_currency(value),
                    "payload": payload,
                    "values": session.state().values(),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("serialize prediction")?
                );
            } else {
                println!(
                    "Predicted Weekly Sales: {}",
                    format::format_currency(value)
                );
            }
            Ok(())
        }
        RequestOutcome::Failed(err) => {
            if args.json {
                println!("{}", serde_json::json!({ "error": err.to_string() }));
            }
            Err(anyhow::Error::new(err).context("Prediction Failed"))
        }
        RequestOutcome::Discarded | RequestOutcome::Rejected(_) => {
            Err(anyhow!("prediction request did not complete"))
        }
    }
}

fn cmd_catalog(args: CatalogArgs) -> Result<()> {
    if args.json {
        let text =
            serde_json::to_string_pretty(catalog::groups()).context("serialize field catalog")?;
        println!("{text}");
        return Ok(());
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (step, group) in catalog::groups().iter().enumerate() {
        writeln!(
            out,
            "{}: {}",
            format::step_caption(step, catalog::group_count()),
            group.title
        )?;
        for field in group.fields {
            writeln!(
                out,
                "  {:<14} {:<18} default {:<8} {}",
                field.name, field.label, field.default, field.tooltip
            )?;
        }
    }
    Ok(())
}

fn cmd_splash(args: SplashArgs) -> Result<()> {
    let settings = config::resolve_settings(args.config.as_deref(), None, None)?;
    let outcome =
        play_loading_sequence(settings.timings, args.instant, args.seed, args.cancel_at)?;
    match outcome {
        RunOutcome::Completed => println!("Loading complete"),
        RunOutcome::Cancelled => println!("Loading cancelled"),
    }
    Ok(())
}

fn resolve_endpoint_settings(args: &EndpointArgs) -> Result<Settings> {
    config::resolve_settings(
        args.config.as_deref(),
        std::env::var(config::ENDPOINT_ENV).ok(),
        args.endpoint.clone(),
    )
}

fn prediction_client(settings: &Settings) -> PredictionClient<UreqTransport> {
    let client = PredictionClient::new(
        settings.endpoint.clone(),
        UreqTransport::new(settings.request_timeout),
    );
    tracing::debug!(endpoint = client.endpoint(), "prediction client ready");
    client
}

fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE (got {raw:?})"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("field name is empty in {raw:?}"));
    }
    Ok((name, value))
}

/// Run the loading sequence once, drawing its progress to stderr.
///
/// With `cancel_at`, the host tears the sequence down as soon as progress
/// reaches that percentage; the hand-off callback then never runs.
fn play_loading_sequence(
    timings: SequencerTimings,
    instant: bool,
    seed: Option<u64>,
    cancel_at: Option<f64>,
) -> Result<RunOutcome> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let ready = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ready);
    let mut sequencer = LoadingSequencer::new(timings, rng, move || {
        flag.set(true);
        tracing::info!("loading sequence complete");
    });

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
            .context("progress bar template")?,
    );
    bar.set_message("Loading");
    let cancel = CancelToken::new();
    let render = |event: SequencerEvent| match event {
        SequencerEvent::Progress(progress) => {
            bar.set_position(progress.round() as u64);
            if cancel_at.is_some_and(|limit| progress >= limit) {
                cancel.cancel();
                bar.abandon_with_message("Cancelled");
            }
        }
        SequencerEvent::Holding => bar.set_message("Ready"),
        SequencerEvent::Exiting => bar.finish_and_clear(),
        SequencerEvent::Completed => {}
    };

    let outcome = if instant {
        run_sequence(&mut sequencer, &mut ManualClock::new(), &cancel, render)
    } else {
        run_sequence(&mut sequencer, &mut SystemClock::new(), &cancel, render)
    };
    tracing::debug!(?outcome, handed_off = ready.get(), "loading sequence finished");
    Ok(outcome)
}
