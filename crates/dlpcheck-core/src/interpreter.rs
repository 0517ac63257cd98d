//! Running Python snippets in a child interpreter.
//!
//! Every probe is a short snippet passed with `-c`. The child is killed if
//! its handle is dropped before it exits, so no interpreter outlives a probe.

use std::process::{ExitStatus, Stdio};

use tokio::process::Command;

use crate::{
    error::{ProbeError, Result},
    snippets::payload,
};

#[derive(Clone, Debug)]
pub struct Interpreter {
    program: String,
    args: Vec<String>,
}

/// Captured result of one snippet run.
#[derive(Debug)]
pub struct SnippetOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl SnippetOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Value the snippet wrote after the payload marker on stdout.
    ///
    /// Without a marker, the last non-empty stdout line is used.
    pub fn value(&self) -> String {
        match payload(&self.stdout) {
            Some(value) => value.trim_end().to_string(),
            None => self
                .stdout
                .lines()
                .rev()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Message of the exception that terminated the snippet.
    ///
    /// A guarded snippet writes `str(exc)` after the payload marker, which is
    /// taken verbatim. An uncaught traceback falls back to its last line, and
    /// silence to the exit status.
    pub fn failure_detail(&self) -> String {
        if let Some(detail) = payload(&self.stderr) {
            return detail.trim_end().to_string();
        }
        exception_detail(&self.stderr)
            .unwrap_or_else(|| format!("interpreter exited with {}", self.status))
    }
}

impl Interpreter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Interpreter launched with leading arguments, e.g. `py -3` or
    /// `uv run python`.
    pub fn with_args<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run `code` with `-c`. Only a failure to start the interpreter is an
    /// error; a snippet that raises is reported through the exit status.
    pub async fn run(&self, code: &str) -> Result<SnippetOutput> {
        tracing::debug!(program = %self.program, "running snippet");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("-c")
            .arg(code)
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProbeError::InterpreterUnavailable {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        let snippet = SnippetOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        tracing::debug!(status = %snippet.status, stderr = %snippet.stderr.trim(), "snippet finished");

        Ok(snippet)
    }
}

/// Extract the exception message from an uncaught traceback.
///
/// Python ends a traceback with `ExceptionType: message`; the message is what
/// `str(exc)` would print. A bare `ExceptionType` line yields an empty message.
/// Any other last line is returned as is.
pub fn exception_detail(stderr: &str) -> Option<String> {
    let last = stderr.lines().rev().map(str::trim).find(|l| !l.is_empty())?;

    match last.split_once(':') {
        Some((head, rest)) if is_exception_name(head) => Some(rest.trim_start().to_string()),
        None if is_exception_name(last) => Some(String::new()),
        _ => Some(last.to_string()),
    }
}

fn is_exception_name(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
        && s.rsplit('.')
            .next()
            .is_some_and(|name| name.starts_with(|c: char| c.is_ascii_uppercase()))
}
