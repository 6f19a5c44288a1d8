use std::ffi::OsString;

use clap::Parser;
use vz_core::VzError;

mod cli_args;
mod commands;
mod error_map;
mod models;
mod source_loader;

pub(crate) use cli_args::{CheckArgs, Cli, FormatArgs, Mode, ToTextArgs, ToXmlArgs};
pub(crate) use error_map::{
    emit_error, map_cli_output_write, map_cli_report_json, map_cli_source_read,
};
pub(crate) use models::CheckReport;
pub(crate) use source_loader::{read_source, write_output};
#[cfg(test)]
pub(crate) use source_loader::resolve_input;

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    init_logging(&cli.log_level);
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn init_logging(level: &str) {
    let _ = env_logger::Builder::new()
        .parse_filters(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

fn run(cli: Cli) -> Result<i32, VzError> {
    commands::run_mode(cli.command)
}

#[cfg(test)]
mod tests;
