use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to run {program}: {reason}")]
    InterpreterUnavailable { program: String, reason: String },

    #[error("{detail}")]
    ImportFailed { detail: String },

    #[error("{detail}")]
    ConstructionFailed { detail: String },

    #[error("failed to run {program}: {reason}")]
    ExecutableUnavailable { program: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ProbeError>;
