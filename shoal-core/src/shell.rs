//! Core shell state.

use std::io::Write;
use std::path::{Path, PathBuf};

use normalize_path::NormalizePath;

use crate::commands::ExecutionParameters;
use crate::env::ShellEnvironment;
use crate::error;
use crate::input::InputSource;
use crate::interp;
use crate::results::ExecutionResult;

/// Options for creating a new shell instance.
#[derive(Clone, Default)]
pub struct CreateOptions {
    /// Whether the shell is interactive.
    pub interactive: bool,
    /// The name the shell was invoked under; used to prefix diagnostics.
    pub shell_name: Option<String>,
    /// The parameters addressable as `$0`..`$9`: the shell or script name
    /// followed by its arguments.
    pub positional_parameters: Vec<String>,
}

/// Runtime options controlling shell behavior.
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    /// Whether the shell is interactive.
    pub interactive: bool,
}

/// A shell instance. Cloning yields a subshell-style copy: variables and
/// state diverge from the parent, while the line-input source stays shared.
#[derive(Clone)]
pub struct Shell {
    /// The variables defined in this shell.
    pub env: ShellEnvironment,
    /// The current working directory.
    pub working_dir: PathBuf,
    /// The exit status of the last command executed.
    pub last_exit_status: u8,
    /// Runtime options.
    pub options: RuntimeOptions,
    /// The name the shell was invoked under.
    pub shell_name: Option<String>,
    /// The parameters addressable as `$0`..`$9`.
    pub positional_parameters: Vec<String>,
    /// The line-input source; shared with here-document collection.
    pub input: InputSource,
}

impl Shell {
    /// Returns a new shell instance created with the given options, reading
    /// lines from the given source.
    pub fn new(options: &CreateOptions, input: InputSource) -> Result<Self, error::Error> {
        let working_dir = std::env::current_dir()?;
        let mut env = ShellEnvironment::from_process_env();
        seed_env(&mut env, &working_dir);

        Ok(Self {
            env,
            working_dir,
            last_exit_status: 0,
            options: RuntimeOptions {
                interactive: options.interactive,
            },
            shell_name: options.shell_name.clone(),
            positional_parameters: options.positional_parameters.clone(),
            input,
        })
    }

    /// Returns the name used to prefix this shell's diagnostics.
    pub fn display_name(&self) -> &str {
        self.shell_name.as_deref().unwrap_or("shoal")
    }

    /// Retrieves the positional parameter named by the given digit, if set.
    pub(crate) fn positional_parameter(&self, digit: char) -> Option<&str> {
        let index = usize::try_from(digit.to_digit(10)?).ok()?;
        self.positional_parameters.get(index).map(String::as_str)
    }

    /// Changes the shell's working directory, updating `PWD` and `OLDPWD`.
    /// The target is interpreted relative to the current working directory
    /// and normalized lexically.
    pub fn set_working_dir(&mut self, target: &str) -> Result<(), error::Error> {
        let candidate = if Path::new(target).is_absolute() {
            PathBuf::from(target)
        } else {
            self.working_dir.join(target)
        };

        let normalized = candidate.normalize();
        if !normalized.is_dir() {
            return Err(error::Error::NotADirectory(normalized));
        }

        let old = std::mem::replace(&mut self.working_dir, normalized);
        self.env.set("OLDPWD", old.to_string_lossy().into_owned());
        self.env.export("OLDPWD");
        self.env
            .set("PWD", self.working_dir.to_string_lossy().into_owned());
        self.env.export("PWD");

        Ok(())
    }

    /// Parses and executes one line of input, returning its result. Parse
    /// errors are reported on the context's standard error and yield status
    /// 2 without executing anything.
    pub async fn run_line(
        &mut self,
        line: &str,
        params: &ExecutionParameters,
    ) -> Result<ExecutionResult, error::Error> {
        match shoal_parser::parse_line(line) {
            Ok(Some(pipeline)) => interp::run_pipeline(self, &pipeline, params).await,
            Ok(None) => Ok(ExecutionResult::new(self.last_exit_status)),
            Err(e) => {
                let mut stderr = params.stderr()?;
                writeln!(stderr, "{}: {e}", self.display_name())?;
                self.last_exit_status = 2;
                Ok(ExecutionResult::new(2))
            }
        }
    }

    /// Returns a minimal shell for unit tests; reads no input and inherits
    /// nothing from the process environment.
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self {
            env: ShellEnvironment::default(),
            working_dir: PathBuf::from("/"),
            last_exit_status: 0,
            options: RuntimeOptions::default(),
            shell_name: None,
            positional_parameters: Vec::new(),
            input: InputSource::from_string(""),
        }
    }
}

/// Seeds shell-managed variables on startup: `PWD` reflects the actual
/// working directory and `SHLVL` counts shell nesting.
fn seed_env(env: &mut ShellEnvironment, working_dir: &Path) {
    env.set("PWD", working_dir.to_string_lossy().into_owned());
    env.export("PWD");

    let level = env
        .get_str("SHLVL")
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(0);
    env.set("SHLVL", (level + 1).to_string());
    env.export("SHLVL");
}
