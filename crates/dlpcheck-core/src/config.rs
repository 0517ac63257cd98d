use crate::interpreter::Interpreter;

/// Which interpreter, module and client a diagnostic run targets.
///
/// The defaults describe a stock yt-dlp install reachable through `python3`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Interpreter program, resolved through `PATH` when not a path.
    pub python: String,
    /// Arguments placed before `-c` on every interpreter invocation.
    pub python_args: Vec<String>,
    /// Importable module name.
    pub module: String,
    /// Name shown in the console lines.
    pub display_name: String,
    /// Attribute path read off the module for its version string.
    pub version_attr: String,
    /// Client class constructed by the capability probe.
    pub client: String,
    /// Standalone executable, probed only when set.
    pub executable: Option<String>,
}

pub const DEFAULT_PYTHON: &str = "python3";
pub const DEFAULT_MODULE: &str = "yt_dlp";
pub const DEFAULT_EXECUTABLE: &str = "yt-dlp";

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            python: DEFAULT_PYTHON.to_string(),
            python_args: Vec::new(),
            module: DEFAULT_MODULE.to_string(),
            display_name: "yt-dlp".to_string(),
            version_attr: "version.__version__".to_string(),
            client: "YoutubeDL".to_string(),
            executable: None,
        }
    }
}

impl ProbeConfig {
    pub fn interpreter(&self) -> Interpreter {
        Interpreter::with_args(&self.python, &self.python_args)
    }

    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    pub fn with_python_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.python_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = Some(executable.into());
        self
    }
}
