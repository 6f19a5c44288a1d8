use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use vz_core::VzError;

use crate::{map_cli_output_write, map_cli_source_read};

pub(crate) fn resolve_input(input: &str) -> Result<PathBuf, VzError> {
    let path = PathBuf::from(input);
    if !path.exists() {
        return Err(VzError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("input does not exist: {}", path.display()),
        ));
    }
    if !path.is_file() {
        return Err(VzError::new(
            "CLI_SOURCE_NOT_FILE",
            format!("input is not a file: {}", path.display()),
        ));
    }
    Ok(path)
}

pub(crate) fn read_source(input: &str) -> Result<String, VzError> {
    let path = resolve_input(input)?;
    let source = fs::read_to_string(&path).map_err(map_cli_source_read)?;
    let shown = path.display().to_string();
    debug!(path = shown.as_str(), bytes = source.len(); "read input");
    Ok(source)
}

/// Writes `content` to `output`, or to stdout when no output path is given.
pub(crate) fn write_output(output: Option<&str>, content: &str) -> Result<(), VzError> {
    let Some(output) = output else {
        print!("{}", content);
        return Ok(());
    };
    let path = Path::new(output);
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(map_cli_output_write)?;
    }
    fs::write(path, content).map_err(map_cli_output_write)?;
    debug!(path = output, bytes = content.len(); "wrote output");
    Ok(())
}
