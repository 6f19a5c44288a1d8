use log::info;
use vz_compiler::{format_source, parse_and_validate, text_to_xml, xml_to_text};
use vz_core::{ProblemLevel, ProblemLog, VzError};

use crate::{
    map_cli_report_json, read_source, write_output, CheckArgs, CheckReport, FormatArgs, Mode,
    ToTextArgs, ToXmlArgs,
};

pub(super) fn run_mode(mode: Mode) -> Result<i32, VzError> {
    match mode {
        Mode::ToXml(args) => run_to_xml(args),
        Mode::ToText(args) => run_to_text(args),
        Mode::Check(args) => run_check(args),
        Mode::Format(args) => run_format(args),
    }
}

fn report_problems(log: &ProblemLog, min_level: ProblemLevel) {
    for problem in log.filtered(min_level) {
        eprintln!("{}", problem);
    }
}

/// Error-level problems block the write; the exporter alone does not catch
/// every semantic mistake.
fn ensure_no_errors(log: &ProblemLog, input: &str) -> Result<(), VzError> {
    if !log.has_errors() {
        return Ok(());
    }
    let count = log.filtered(ProblemLevel::Error).len();
    Err(VzError::new(
        "CLI_SOURCE_INVALID",
        format!("{} error(s) in {}", count, input),
    ))
}

pub(super) fn run_to_xml(args: ToXmlArgs) -> Result<i32, VzError> {
    let source = read_source(&args.input)?;
    let mut log = ProblemLog::new();
    let exported = text_to_xml(&source, &mut log);
    report_problems(&log, args.min_level);
    ensure_no_errors(&log, &args.input)?;
    write_output(args.output.as_deref(), &exported?)?;
    info!(input = args.input.as_str(); "converted vztxt to xml");
    Ok(0)
}

pub(super) fn run_to_text(args: ToTextArgs) -> Result<i32, VzError> {
    let xml = read_source(&args.input)?;
    let text = xml_to_text(&xml)?;
    write_output(args.output.as_deref(), &text)?;
    info!(input = args.input.as_str(); "converted xml to vztxt");
    Ok(0)
}

pub(super) fn run_check(args: CheckArgs) -> Result<i32, VzError> {
    let source = read_source(&args.input)?;
    let mut log = ProblemLog::new();
    parse_and_validate(&source, Some(&mut log));

    let has_errors = log.has_errors();
    if args.json {
        let report = CheckReport {
            input: &args.input,
            has_errors,
            problems: log.filtered(args.min_level),
        };
        println!("{}", serde_json::to_string(&report).map_err(map_cli_report_json)?);
    } else {
        for problem in log.filtered(args.min_level) {
            println!("{}", problem);
        }
        println!("RESULT:{}", if has_errors { "ERROR" } else { "OK" });
    }
    Ok(if has_errors { 1 } else { 0 })
}

pub(super) fn run_format(args: FormatArgs) -> Result<i32, VzError> {
    let source = read_source(&args.input)?;
    let mut log = ProblemLog::new();
    let formatted = format_source(&source, &mut log);
    report_problems(&log, ProblemLevel::Warning);
    ensure_no_errors(&log, &args.input)?;
    write_output(args.output.as_deref(), &formatted)?;
    Ok(0)
}
