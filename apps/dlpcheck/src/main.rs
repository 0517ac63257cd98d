use std::{
    io::{self, Write},
    time::Duration,
};

use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use dlpcheck_core::{
    DiagnosticReport, ProbeConfig, ProbeListener, Stage, config, run_diagnostics,
    run_diagnostics_with,
};

#[derive(Parser)]
#[command(name = "dlpcheck")]
#[command(about = "Check that yt-dlp can be imported and a YoutubeDL client created")]
struct Cli {
    /// Python interpreter to probe
    #[arg(long, default_value = config::DEFAULT_PYTHON)]
    python: String,

    /// Extra argument passed to the interpreter before `-c` (repeatable)
    #[arg(long = "python-arg", allow_hyphen_values = true)]
    python_args: Vec<String>,

    /// Library module to import
    #[arg(long, default_value = config::DEFAULT_MODULE)]
    module: String,

    /// Also check the standalone yt-dlp executable
    #[arg(long)]
    executable: bool,

    /// Executable used by --executable
    #[arg(long, default_value = config::DEFAULT_EXECUTABLE)]
    ytdlp: String,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Exit with status 1 when any check fails
    #[arg(long)]
    strict: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl From<&Cli> for ProbeConfig {
    fn from(cli: &Cli) -> Self {
        let config = ProbeConfig::default()
            .with_python(&cli.python)
            .with_python_args(&cli.python_args)
            .with_module(&cli.module);
        if cli.executable {
            config.with_executable(&cli.ytdlp)
        } else {
            config
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn create_spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")?,
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

/// Write a result line, green when it passed and red when it failed.
/// Colors are only applied on a terminal, so piped output stays plain.
fn write_outcome(out: &mut impl Write, line: &str, passed: bool) -> io::Result<()> {
    if passed {
        writeln!(out, "{}", style(line).green())
    } else {
        writeln!(out, "{}", style(line).red())
    }
}

/// Prints each heading before its probe runs and each outcome when it ends.
struct ConsoleListener<W> {
    out: W,
    spinners: bool,
    spinner: Option<ProgressBar>,
}

impl<W: Write> ProbeListener for ConsoleListener<W> {
    type Error = anyhow::Error;

    fn started(&mut self, stage: Stage, heading: Option<&str>) -> Result<()> {
        if let Some(heading) = heading {
            writeln!(self.out, "{}", heading)?;
        }
        self.out.flush()?;
        if self.spinners {
            self.spinner = Some(create_spinner(&format!("{}...", stage.label()))?);
        }
        Ok(())
    }

    fn finished(&mut self, _: Stage, lines: &[String], passed: bool) -> Result<()> {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        for line in lines {
            write_outcome(&mut self.out, line, passed)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Run the probes one at a time, printing as they go.
async fn run_streaming(
    config: &ProbeConfig,
    out: impl Write,
    spinners: bool,
) -> Result<DiagnosticReport> {
    let mut listener = ConsoleListener {
        out,
        spinners,
        spinner: None,
    };
    run_diagnostics_with(config, &mut listener).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ProbeConfig::from(&cli);
    tracing::debug!(?config, "starting diagnostics");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let report = if cli.json {
        let report = run_diagnostics(&config).await;
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        report
    } else {
        run_streaming(&config, &mut out, true).await?
    };

    if cli.strict && !report.all_passed() {
        tracing::warn!("one or more checks failed");
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_is_default_config() {
        let cli = Cli::parse_from(["dlpcheck"]);
        assert_eq!(ProbeConfig::from(&cli), ProbeConfig::default());
        assert!(!cli.json);
        assert!(!cli.strict);
    }

    #[test]
    fn test_flags_map_into_config() {
        let cli = Cli::parse_from([
            "dlpcheck",
            "--python",
            "py",
            "--python-arg",
            "-3",
            "--module",
            "youtube_dl",
            "--executable",
            "--ytdlp",
            "/opt/bin/yt-dlp",
        ]);
        let config = ProbeConfig::from(&cli);
        assert_eq!(config.python, "py");
        assert_eq!(config.python_args, vec!["-3"]);
        assert_eq!(config.module, "youtube_dl");
        assert_eq!(config.executable.as_deref(), Some("/opt/bin/yt-dlp"));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_write_outcome_plain_when_colors_disabled() {
        console::set_colors_enabled(false);
        let mut buf = Vec::new();
        write_outcome(&mut buf, "YoutubeDL created successfully", true).unwrap();
        write_outcome(&mut buf, "Failed to import yt-dlp: boom", false).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "YoutubeDL created successfully\nFailed to import yt-dlp: boom\n"
        );
    }
}

#[cfg(all(test, unix))]
mod console_tests {
    use tempfile::{TempDir, tempdir};

    use super::*;

    /// Interpreter stand-in run as `/bin/sh python.sh -c CODE`.
    fn fake_python(dir: &TempDir, cases: &str) -> ProbeConfig {
        let script = dir.path().join("python.sh");
        let body = format!(
            "case \"$2\" in\n  *sys.version*) printf '@@dlpcheck@@3.12.1 (main) [GCC 13.2.0]' ;;\n{}\nesac\n",
            cases
        );
        std::fs::write(&script, body).unwrap();
        ProbeConfig::default()
            .with_python("/bin/sh")
            .with_python_args([script.to_string_lossy().to_string()])
    }

    async fn console_output(config: &ProbeConfig) -> String {
        console::set_colors_enabled(false);
        let mut buf = Vec::new();
        run_streaming(config, &mut buf, false).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_library_present_and_functional() {
        let dir = tempdir().unwrap();
        let config = fake_python(
            &dir,
            r#"  *YoutubeDL*) exit 0 ;;
  *__version__*) printf '@@dlpcheck@@2024.12.13' ;;"#,
        );

        assert_eq!(
            console_output(&config).await,
            "Python version: 3.12.1 (main) [GCC 13.2.0]\n\
             Testing yt-dlp import...\n\
             yt-dlp imported successfully\n\
             yt-dlp version: 2024.12.13\n\
             Testing basic yt-dlp functionality...\n\
             YoutubeDL created successfully\n"
        );
    }

    #[tokio::test]
    async fn test_library_absent() {
        let dir = tempdir().unwrap();
        let config = fake_python(
            &dir,
            r#"  *) printf '%s' "@@dlpcheck@@No module named 'yt_dlp'" >&2
     exit 1 ;;"#,
        );

        assert_eq!(
            console_output(&config).await,
            "Python version: 3.12.1 (main) [GCC 13.2.0]\n\
             Testing yt-dlp import...\n\
             Failed to import yt-dlp: No module named 'yt_dlp'\n\
             Testing basic yt-dlp functionality...\n\
             Failed to create YoutubeDL: name 'yt_dlp' is not defined\n"
        );
    }

    #[tokio::test]
    async fn test_client_cannot_be_created() {
        let dir = tempdir().unwrap();
        let config = fake_python(
            &dir,
            r#"  *YoutubeDL*) printf '%s' "@@dlpcheck@@No module named 'websockets'" >&2
     exit 1 ;;
  *__version__*) printf '@@dlpcheck@@2024.12.13' ;;"#,
        );

        assert_eq!(
            console_output(&config).await,
            "Python version: 3.12.1 (main) [GCC 13.2.0]\n\
             Testing yt-dlp import...\n\
             yt-dlp imported successfully\n\
             yt-dlp version: 2024.12.13\n\
             Testing basic yt-dlp functionality...\n\
             Failed to create YoutubeDL: No module named 'websockets'\n"
        );
    }

    #[tokio::test]
    async fn test_executable_line_follows_capability() {
        let dir = tempdir().unwrap();
        let config = fake_python(
            &dir,
            r#"  *YoutubeDL*) exit 0 ;;
  *__version__*) printf '@@dlpcheck@@2024.12.13' ;;"#,
        )
        .with_executable("/nonexistent/yt-dlp");

        let output = console_output(&config).await;
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[5], "YoutubeDL created successfully");
        assert!(
            lines[6].starts_with("yt-dlp executable unavailable: failed to run /nonexistent/yt-dlp: ")
        );
    }
}
