use std::{convert::Infallible, process::Stdio};

use tokio::process::Command;

use crate::{
    config::ProbeConfig,
    error::{ProbeError, Result},
    format::{
        format_capability_heading, format_capability_line, format_executable_line,
        format_import_heading, format_import_lines, format_python_line,
    },
    interpreter::Interpreter,
    snippets::{construction_snippet, import_snippet, python_version_snippet},
    types::{Check, DiagnosticReport, LoadedLibrary},
};

/// Read the interpreter's `sys.version`
pub async fn python_version(interpreter: &Interpreter) -> Result<String> {
    let output = interpreter.run(&python_version_snippet()).await?;

    if !output.success() {
        return Err(ProbeError::InterpreterUnavailable {
            program: interpreter.program().to_string(),
            reason: output.failure_detail(),
        });
    }

    Ok(output.value())
}

/// Import the library module and read its version attribute
pub async fn load_library(interpreter: &Interpreter, config: &ProbeConfig) -> Result<LoadedLibrary> {
    let code = import_snippet(&config.module, &config.version_attr);
    let output = interpreter.run(&code).await?;

    if !output.success() {
        return Err(ProbeError::ImportFailed {
            detail: output.failure_detail(),
        });
    }

    Ok(LoadedLibrary {
        module: config.module.clone(),
        version: output.value(),
    })
}

/// Construct the library's client inside a `with` block and let it close.
///
/// Without a loaded library the module name is unbound, so this fails the way
/// an unguarded reference would, without spawning anything.
pub async fn construct_client(
    interpreter: &Interpreter,
    config: &ProbeConfig,
    library: Option<&LoadedLibrary>,
) -> Result<()> {
    let Some(library) = library else {
        return Err(ProbeError::ConstructionFailed {
            detail: format!("name '{}' is not defined", config.module),
        });
    };

    let code = construction_snippet(&library.module, &config.client);
    let output = interpreter.run(&code).await?;

    if !output.success() {
        return Err(ProbeError::ConstructionFailed {
            detail: output.failure_detail(),
        });
    }

    Ok(())
}

/// Ask a standalone executable for its version
pub async fn executable_version(program: &str) -> Result<String> {
    run_version(Command::new(program), program).await
}

async fn run_version(mut command: Command, program: &str) -> Result<String> {
    let output = command
        .arg("--version")
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| ProbeError::ExecutableUnavailable {
            program: program.to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = match stderr.trim() {
            "" => format!("exited with {}", output.status),
            msg => msg.to_string(),
        };
        return Err(ProbeError::ExecutableUnavailable {
            program: program.to_string(),
            reason,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Probe steps in run order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Python,
    Import,
    Construction,
    Executable,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Python => "Checking interpreter",
            Stage::Import => "Importing library",
            Stage::Construction => "Creating client",
            Stage::Executable => "Checking executable",
        }
    }
}

/// Receives each probe's console lines while a run is in progress.
pub trait ProbeListener {
    type Error;

    /// A probe is about to run; `heading` is the line announcing it, if any.
    fn started(&mut self, stage: Stage, heading: Option<&str>)
    -> std::result::Result<(), Self::Error>;

    fn finished(
        &mut self,
        stage: Stage,
        lines: &[String],
        passed: bool,
    ) -> std::result::Result<(), Self::Error>;
}

impl ProbeListener for () {
    type Error = Infallible;

    fn started(&mut self, _: Stage, _: Option<&str>) -> std::result::Result<(), Infallible> {
        Ok(())
    }

    fn finished(&mut self, _: Stage, _: &[String], _: bool) -> std::result::Result<(), Infallible> {
        Ok(())
    }
}

/// Run every probe in order, reporting each one to `listener` as it goes.
///
/// Probe failures are recorded in the report; only the listener can abort.
pub async fn run_diagnostics_with<L: ProbeListener>(
    config: &ProbeConfig,
    listener: &mut L,
) -> std::result::Result<DiagnosticReport, L::Error> {
    let interpreter = config.interpreter();
    let name = &config.display_name;

    listener.started(Stage::Python, None)?;
    let python: Check<String> = python_version(&interpreter).await.into();
    listener.finished(
        Stage::Python,
        &[format_python_line(&python)],
        python.is_passed(),
    )?;

    listener.started(Stage::Import, Some(&format_import_heading(name)))?;
    let library: Check<LoadedLibrary> = load_library(&interpreter, config).await.into();
    listener.finished(
        Stage::Import,
        &format_import_lines(name, &library),
        library.is_passed(),
    )?;

    listener.started(Stage::Construction, Some(&format_capability_heading(name)))?;
    let construction: Check<()> = construct_client(&interpreter, config, library.passed())
        .await
        .into();
    listener.finished(
        Stage::Construction,
        &[format_capability_line(&config.client, &construction)],
        construction.is_passed(),
    )?;

    let executable = match &config.executable {
        Some(program) => {
            listener.started(Stage::Executable, None)?;
            let check: Check<String> = executable_version(program).await.into();
            listener.finished(
                Stage::Executable,
                &[format_executable_line(name, &check)],
                check.is_passed(),
            )?;
            Some(check)
        }
        None => None,
    };

    Ok(DiagnosticReport {
        display_name: config.display_name.clone(),
        client: config.client.clone(),
        python,
        library,
        construction,
        executable,
    })
}

/// Run every probe in order and collect the outcomes.
pub async fn run_diagnostics(config: &ProbeConfig) -> DiagnosticReport {
    match run_diagnostics_with(config, &mut ()).await {
        Ok(report) => report,
        Err(never) => match never {},
    }
}
