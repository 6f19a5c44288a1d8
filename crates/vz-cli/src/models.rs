use serde::Serialize;
use vz_core::Problem;

/// `check --json` payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckReport<'a> {
    pub(crate) input: &'a str,
    pub(crate) has_errors: bool,
    pub(crate) problems: Vec<&'a Problem>,
}
