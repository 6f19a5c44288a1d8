use clap::{Args, Parser, Subcommand};
use vz_core::ProblemLevel;

#[derive(Debug, Parser)]
#[command(name = "vztxt")]
#[command(about = "Translate between vztxt source and flight program XML")]
pub(crate) struct Cli {
    /// Log filter for the translator itself; `RUST_LOG` takes precedence.
    #[arg(long = "log-level", global = true, default_value = "warn")]
    pub(crate) log_level: String,
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    ToXml(ToXmlArgs),
    ToText(ToTextArgs),
    Check(CheckArgs),
    Format(FormatArgs),
}

#[derive(Debug, Args)]
pub(crate) struct ToXmlArgs {
    #[arg(long = "input")]
    pub(crate) input: String,
    #[arg(long = "output")]
    pub(crate) output: Option<String>,
    #[arg(long = "min-level", default_value = "warning")]
    pub(crate) min_level: ProblemLevel,
}

#[derive(Debug, Args)]
pub(crate) struct ToTextArgs {
    #[arg(long = "input")]
    pub(crate) input: String,
    #[arg(long = "output")]
    pub(crate) output: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "input")]
    pub(crate) input: String,
    #[arg(long = "min-level", default_value = "hint")]
    pub(crate) min_level: ProblemLevel,
    #[arg(long = "json")]
    pub(crate) json: bool,
}

#[derive(Debug, Args)]
pub(crate) struct FormatArgs {
    #[arg(long = "input")]
    pub(crate) input: String,
    #[arg(long = "output")]
    pub(crate) output: Option<String>,
}
