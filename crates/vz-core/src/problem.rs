use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemLevel {
    Debug = 1,
    Info = 2,
    Hint = 3,
    Warning = 4,
    Error = 5,
}

impl ProblemLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Hint => "hint",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ProblemLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProblemLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "hint" => Ok(Self::Hint),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown problem level \"{}\"", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub level: ProblemLevel,
    pub message: String,
    pub start: Option<SourceLocation>,
    pub end: Option<SourceLocation>,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start {
            Some(start) => write!(
                f,
                "{} {}:{} {}",
                self.level, start.line, start.column, self.message
            ),
            None => write!(f, "{} {}", self.level, self.message),
        }
    }
}

/// Append-only, ordered diagnostic sink for one top-level operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemLog {
    pub problems: Vec<Problem>,
}

impl ProblemLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(
        &mut self,
        level: ProblemLevel,
        message: impl Into<String>,
        start: Option<SourceLocation>,
        end: Option<SourceLocation>,
    ) {
        self.problems.push(Problem {
            level,
            message: message.into(),
            start,
            end,
        });
    }

    pub fn debug(
        &mut self,
        message: impl Into<String>,
        start: Option<SourceLocation>,
        end: Option<SourceLocation>,
    ) {
        self.post(ProblemLevel::Debug, message, start, end);
    }

    pub fn info(
        &mut self,
        message: impl Into<String>,
        start: Option<SourceLocation>,
        end: Option<SourceLocation>,
    ) {
        self.post(ProblemLevel::Info, message, start, end);
    }

    pub fn hint(
        &mut self,
        message: impl Into<String>,
        start: Option<SourceLocation>,
        end: Option<SourceLocation>,
    ) {
        self.post(ProblemLevel::Hint, message, start, end);
    }

    pub fn warning(
        &mut self,
        message: impl Into<String>,
        start: Option<SourceLocation>,
        end: Option<SourceLocation>,
    ) {
        self.post(ProblemLevel::Warning, message, start, end);
    }

    pub fn error(
        &mut self,
        message: impl Into<String>,
        start: Option<SourceLocation>,
        end: Option<SourceLocation>,
    ) {
        self.post(ProblemLevel::Error, message, start, end);
    }

    pub fn filtered(&self, min_level: ProblemLevel) -> Vec<&Problem> {
        self.problems
            .iter()
            .filter(|problem| problem.level >= min_level)
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.problems
            .iter()
            .any(|problem| problem.level == ProblemLevel::Error)
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

#[cfg(test)]
mod problem_tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(ProblemLevel::Debug < ProblemLevel::Info);
        assert!(ProblemLevel::Info < ProblemLevel::Hint);
        assert!(ProblemLevel::Hint < ProblemLevel::Warning);
        assert!(ProblemLevel::Warning < ProblemLevel::Error);
        assert_eq!(ProblemLevel::Error as u8, 5);
    }

    #[test]
    fn filtered_keeps_order_and_minimum_level() {
        let mut log = ProblemLog::new();
        log.warning("w1", None, None);
        log.debug("d1", None, None);
        log.error("e1", Some(SourceLocation::new(3, 2)), None);
        log.hint("h1", None, None);

        let messages = log
            .filtered(ProblemLevel::Hint)
            .into_iter()
            .map(|problem| problem.message.as_str())
            .collect::<Vec<_>>();
        assert_eq!(messages, vec!["w1", "e1", "h1"]);
        assert_eq!(log.len(), 4);
        assert!(log.has_errors());
    }

    #[test]
    fn problem_display_includes_location_when_present() {
        let mut log = ProblemLog::new();
        log.error("boom", Some(SourceLocation::new(4, 7)), None);
        log.info("note", None, None);
        assert_eq!(log.problems[0].to_string(), "error 4:7 boom");
        assert_eq!(log.problems[1].to_string(), "info note");
    }

    #[test]
    fn level_parses_from_cli_spelling() {
        assert_eq!("warn".parse::<ProblemLevel>(), Ok(ProblemLevel::Warning));
        assert_eq!("Error".parse::<ProblemLevel>(), Ok(ProblemLevel::Error));
        assert!("loud".parse::<ProblemLevel>().is_err());
    }

    #[test]
    fn log_serializes_levels_in_lowercase() {
        let mut log = ProblemLog::new();
        log.error("bad", None, None);
        let json = serde_json::to_string(&log).expect("log should serialize");
        assert!(json.contains(r#""level":"error""#));
    }
}
