use serde::Serialize;

use crate::error::ProbeError;

/// Result of a single probe: a value, or the failure detail that was reported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Check<T> {
    Passed(T),
    Failed(String),
}

impl<T> Check<T> {
    pub fn is_passed(&self) -> bool {
        matches!(self, Check::Passed(_))
    }

    pub fn passed(&self) -> Option<&T> {
        match self {
            Check::Passed(value) => Some(value),
            Check::Failed(_) => None,
        }
    }
}

impl<T> From<Result<T, ProbeError>> for Check<T> {
    fn from(result: Result<T, ProbeError>) -> Self {
        match result {
            Ok(value) => Check::Passed(value),
            Err(e) => Check::Failed(e.to_string()),
        }
    }
}

/// A library the interpreter could import, with its self-reported version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoadedLibrary {
    pub module: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticReport {
    pub display_name: String,
    pub client: String,
    pub python: Check<String>,
    pub library: Check<LoadedLibrary>,
    pub construction: Check<()>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<Check<String>>,
}

impl DiagnosticReport {
    /// True when every probe that ran succeeded.
    pub fn all_passed(&self) -> bool {
        self.python.is_passed()
            && self.library.is_passed()
            && self.construction.is_passed()
            && self.executable.as_ref().is_none_or(Check::is_passed)
    }
}
