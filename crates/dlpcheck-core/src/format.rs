use crate::types::{Check, DiagnosticReport, LoadedLibrary};

/// `Python version: ...` line
pub fn format_python_line(python: &Check<String>) -> String {
    match python {
        Check::Passed(version) => format!("Python version: {}", version),
        Check::Failed(detail) => format!("Python version: unavailable ({})", detail),
    }
}

pub fn format_import_heading(display_name: &str) -> String {
    format!("Testing {} import...", display_name)
}

pub fn format_import_lines(display_name: &str, library: &Check<LoadedLibrary>) -> Vec<String> {
    match library {
        Check::Passed(lib) => vec![
            format!("{} imported successfully", display_name),
            format!("{} version: {}", display_name, lib.version),
        ],
        Check::Failed(detail) => vec![format!("Failed to import {}: {}", display_name, detail)],
    }
}

pub fn format_capability_heading(display_name: &str) -> String {
    format!("Testing basic {} functionality...", display_name)
}

pub fn format_capability_line(client: &str, construction: &Check<()>) -> String {
    match construction {
        Check::Passed(()) => format!("{} created successfully", client),
        Check::Failed(detail) => format!("Failed to create {}: {}", client, detail),
    }
}

pub fn format_executable_line(display_name: &str, executable: &Check<String>) -> String {
    match executable {
        Check::Passed(version) => format!("{} executable: {}", display_name, version),
        Check::Failed(detail) => format!("{} executable unavailable: {}", display_name, detail),
    }
}

/// Render a whole report in console order.
pub fn format_report_lines(report: &DiagnosticReport) -> Vec<String> {
    let mut lines = vec![
        format_python_line(&report.python),
        format_import_heading(&report.display_name),
    ];
    lines.extend(format_import_lines(&report.display_name, &report.library));
    lines.push(format_capability_heading(&report.display_name));
    lines.push(format_capability_line(&report.client, &report.construction));
    if let Some(executable) = &report.executable {
        lines.push(format_executable_line(&report.display_name, executable));
    }
    lines
}
