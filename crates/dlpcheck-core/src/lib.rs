//! dlpcheck core library
//!
//! Probes that check whether yt-dlp can be imported and used by the local
//! Python interpreter, and the console rendering of their results.

pub mod config;
pub mod error;
pub mod format;
pub mod interpreter;
pub mod pipeline;
pub mod snippets;
pub mod types;

pub use config::ProbeConfig;
pub use error::{ProbeError, Result};
pub use format::{
    format_capability_heading, format_capability_line, format_executable_line,
    format_import_heading, format_import_lines, format_python_line, format_report_lines,
};
pub use interpreter::{Interpreter, SnippetOutput, exception_detail};
pub use pipeline::{
    ProbeListener, Stage, construct_client, executable_version, load_library, python_version,
    run_diagnostics, run_diagnostics_with,
};
pub use types::{Check, DiagnosticReport, LoadedLibrary};
