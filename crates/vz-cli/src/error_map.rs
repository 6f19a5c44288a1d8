use std::fmt::Display;

use vz_core::VzError;

fn map_error(code: &'static str, error: impl Display) -> VzError {
    VzError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: VzError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    let message = serde_json::to_string(&error.message).unwrap_or_else(|_| "\"\"".to_string());
    println!("ERROR_MSG_JSON:{}", message);
    if let Some(span) = error.span {
        println!("ERROR_AT:{}:{}", span.start.line, span.start.column);
    }
    1
}

pub(crate) fn map_cli_source_read(error: std::io::Error) -> VzError {
    map_error("CLI_SOURCE_READ", error)
}

pub(crate) fn map_cli_output_write(error: std::io::Error) -> VzError {
    map_error("CLI_OUTPUT_WRITE", error)
}

pub(crate) fn map_cli_report_json(error: serde_json::Error) -> VzError {
    map_error("CLI_REPORT_JSON", error)
}
