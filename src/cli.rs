//! CLI argument parsing for the forecast wizard.
//!
//! The CLI only wires settings and I/O; wizard state, requests, and the
//! loading sequence live in their own modules.
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "fcw",
    version,
    about = "Weekly sales forecast wizard",
    after_help = "Commands:\n  wizard                 Step through the form interactively and request a forecast\n  predict --set K=V ...  Request one forecast non-interactively\n  catalog                List the wizard steps and fields\n  splash                 Play the loading sequence\n\nExamples:\n  fcw wizard\n  fcw predict --set Store=12 --set Dept=7 --holiday --json\n  fcw catalog --json\n  fcw splash --instant",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Wizard(WizardArgs),
    Predict(PredictArgs),
    Catalog(CatalogArgs),
    Splash(SplashArgs),
}

/// Settings shared by commands that talk to the prediction service.
#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// Prediction endpoint URL (overrides FCW_ENDPOINT and the config file)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// JSON config file (defaults to <config dir>/fcw/config.json when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Step through the form interactively and request a forecast")]
pub struct WizardArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,

    /// Skip the loading sequence
    #[arg(long)]
    pub no_splash: bool,

    /// Run the loading sequence on virtual time (no waiting)
    #[arg(long)]
    pub instant: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Request one forecast non-interactively")]
pub struct PredictArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,

    /// Field override as NAME=VALUE (repeatable); unset fields keep defaults
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Mark the week as a holiday week
    #[arg(long)]
    pub holiday: bool,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "List the wizard steps and fields")]
pub struct CatalogArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Play the loading sequence")]
pub struct SplashArgs {
    /// JSON config file for sequencer timings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run on virtual time (no waiting)
    #[arg(long)]
    pub instant: bool,

    /// Seed for the progress increments
    #[arg(long)]
    pub seed: Option<u64>,

    /// Tear the sequence down once progress reaches PERCENT
    #[arg(long, value_name = "PERCENT")]
    pub cancel_at: Option<f64>,
}
