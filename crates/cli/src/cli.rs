use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Select recommended actions for an SEO report payload.
///
/// Paths not given on the command line fall back to the environment
/// (`SEO_REPORT_*`, optionally profile-prefixed) and then to built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "seo-actions", about = "Rule-driven action selection for SEO reports")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate rules and write actions.json, actions_debug.json and run_trace.json
    Evaluate(EvaluateArgs),
    /// Lint a rule file and print the result as JSON
    Validate(ValidateArgs),
    /// Print a per-rule decision listing
    Explain(ExplainArgs),
    /// Compare two actions_debug.json traces and print changed decisions
    Diff(DiffArgs),
}

/// Inputs shared by every command that runs a selection.
#[derive(Args, Debug)]
pub struct SelectionInputs {
    /// Action rule file (YAML)
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Report payload (JSON)
    #[arg(long)]
    pub payload: PathBuf,

    /// Project file with the threshold table (JSON)
    #[arg(long)]
    pub project: PathBuf,

    /// Render language override (default: payload meta.report_language)
    #[arg(long)]
    pub lang: Option<String>,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub inputs: SelectionInputs,

    /// Directory for the output artifacts
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Action rule file (YAML)
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub inputs: SelectionInputs,

    /// Only show entries for this rule id
    #[arg(long)]
    pub rule: Option<String>,
}

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Trace from the earlier run
    #[arg(long)]
    pub before: PathBuf,

    /// Trace from the later run
    #[arg(long)]
    pub after: PathBuf,
}
