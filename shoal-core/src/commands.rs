//! Command execution contexts and external process composition.

use std::ffi::OsStr;
use std::os::unix::process::CommandExt;
use std::process::Stdio;

use command_fds::{CommandFdExt, FdMapping};

use crate::error;
use crate::openfiles::{OpenFile, OpenFiles, STDERR_FD, STDIN_FD, STDOUT_FD};
use crate::processes::ChildProcess;
use crate::results::ExecutionResult;
use crate::shell::Shell;
use crate::sys;

/// Parameters governing a single command's execution.
#[derive(Default)]
pub struct ExecutionParameters {
    /// The open files tracked by the current context.
    pub open_files: OpenFiles,
}

impl ExecutionParameters {
    /// Duplicates the parameters, yielding an independent set of open files
    /// referring to the same underlying descriptors.
    pub fn try_clone(&self) -> Result<Self, error::Error> {
        Ok(Self {
            open_files: self.open_files.try_clone()?,
        })
    }

    /// Returns the file backing standard input; usable with `read!` et al.
    pub fn stdin(&self) -> Result<OpenFile, error::Error> {
        self.dup_fd(STDIN_FD)
    }

    /// Returns the file backing standard output; usable with `write!` et al.
    pub fn stdout(&self) -> Result<OpenFile, error::Error> {
        self.dup_fd(STDOUT_FD)
    }

    /// Returns the file backing standard error; usable with `write!` et al.
    pub fn stderr(&self) -> Result<OpenFile, error::Error> {
        self.dup_fd(STDERR_FD)
    }

    fn dup_fd(&self, fd: u32) -> Result<OpenFile, error::Error> {
        match self.open_files.get(fd) {
            Some(file) => file.try_dup(),
            None => Err(error::Error::ChildCreationFailure),
        }
    }
}

/// Represents the context for executing a command.
pub struct ExecutionContext<'a> {
    /// The shell in which the command is being executed.
    pub shell: &'a mut Shell,
    /// The name the command was invoked under.
    pub command_name: String,
    /// The parameters for the execution.
    pub params: ExecutionParameters,
}

impl ExecutionContext<'_> {
    /// Returns the file backing standard output in this context.
    pub fn stdout(&self) -> Result<OpenFile, error::Error> {
        self.params.stdout()
    }

    /// Returns the file backing standard error in this context.
    pub fn stderr(&self) -> Result<OpenFile, error::Error> {
        self.params.stderr()
    }
}

/// The result of spawning one pipeline stage.
pub(crate) enum CommandSpawnResult {
    /// A child process was spawned.
    SpawnedProcess(ChildProcess),
    /// A builtin is running in a separate task, with child-process semantics.
    SpawnedBuiltin(tokio::task::JoinHandle<u8>),
    /// The stage completed without spawning anything.
    ImmediateExit(u8),
    /// The stage completed and asks the shell to exit.
    ExitShell(u8),
}

impl CommandSpawnResult {
    /// Waits for the stage to complete, yielding its execution result.
    pub(crate) async fn wait(self) -> Result<ExecutionResult, error::Error> {
        match self {
            Self::SpawnedProcess(mut child) => {
                let output = child.wait().await?;
                Ok(ExecutionResult::from(output))
            }
            Self::SpawnedBuiltin(handle) => Ok(ExecutionResult::new(handle.await?)),
            Self::ImmediateExit(code) => Ok(ExecutionResult::new(code)),
            Self::ExitShell(code) => Ok(ExecutionResult {
                exit_code: code,
                exit_shell: true,
                terminating_signal: None,
            }),
        }
    }
}

/// Composes a `std::process::Command` for an external command: argv, working
/// directory, the projected environment, and descriptor wiring. Files beyond
/// the standard three are mapped into the child via fd mappings that move
/// ownership of the parent's duplicates.
pub(crate) fn compose_std_command<S: AsRef<OsStr>>(
    shell: &Shell,
    command_path: &OsStr,
    argv0: &str,
    args: &[S],
    mut open_files: OpenFiles,
) -> Result<std::process::Command, error::Error> {
    let mut cmd = std::process::Command::new(command_path);

    // Override argv[0] to the name the command was invoked under.
    cmd.arg0(argv0);

    for arg in args {
        cmd.arg(arg);
    }

    cmd.current_dir(shell.working_dir.as_path());

    // Project the shell's exported variables as the child's environment.
    cmd.env_clear();
    for (name, value) in shell.env.to_environ() {
        cmd.env(name, value);
    }

    if let Some(stdin_file) = open_files.remove(STDIN_FD) {
        let as_stdio: Stdio = stdin_file.into();
        cmd.stdin(as_stdio);
    }

    match open_files.remove(STDOUT_FD) {
        Some(OpenFile::Stdout) | None => (),
        Some(stdout_file) => {
            let as_stdio: Stdio = stdout_file.into();
            cmd.stdout(as_stdio);
        }
    }

    match open_files.remove(STDERR_FD) {
        Some(OpenFile::Stderr) | None => (),
        Some(stderr_file) => {
            let as_stdio: Stdio = stderr_file.into();
            cmd.stderr(as_stdio);
        }
    }

    // Map any remaining fds into the child.
    let mut fd_mappings = Vec::new();
    for (child_fd, open_file) in open_files {
        fd_mappings.push(FdMapping {
            child_fd: i32::try_from(child_fd)?,
            parent_fd: open_file.into_owned_fd()?,
        });
    }
    cmd.fd_mappings(fd_mappings)
        .map_err(|_e| error::Error::ChildCreationFailure)?;

    // The shell ignores SIGQUIT for its own lifetime, and ignored
    // dispositions survive exec; the child restores the default first.
    // SAFETY: the hook makes only async-signal-safe calls.
    unsafe {
        cmd.pre_exec(|| {
            sys::signal::reset_sigquit_for_child();
            Ok(())
        });
    }

    Ok(cmd)
}

/// Spawns the composed command, tracking the resulting child process.
pub(crate) fn spawn_external(cmd: std::process::Command) -> Result<ChildProcess, std::io::Error> {
    let child = sys::process::spawn(cmd)?;
    let pid = child.id().and_then(|id| i32::try_from(id).ok());
    let child = ChildProcess::new(pid, child);
    if let Some(pid) = child.pid() {
        tracing::debug!(target: "commands", "spawned child process (pid {pid})");
    }
    Ok(child)
}

/// Maps a spawn failure to its exit status and user-facing message, following
/// the conventional shell taxonomy: 126 for a command that exists but cannot
/// be run, 127 for one that does not exist.
pub(crate) fn launch_failure_status(err: &std::io::Error) -> (u8, String) {
    match err.raw_os_error() {
        Some(nix::libc::EACCES) => (126, "Permission denied".into()),
        Some(nix::libc::ENOEXEC) => (126, "Exec format error".into()),
        Some(nix::libc::EISDIR) => (126, "Is a directory".into()),
        Some(nix::libc::ENOENT) => (127, "No such file or directory".into()),
        _ => (1, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_failures_follow_the_shell_taxonomy() {
        let err = std::io::Error::from_raw_os_error(nix::libc::EACCES);
        assert_eq!(launch_failure_status(&err).0, 126);

        let err = std::io::Error::from_raw_os_error(nix::libc::ENOENT);
        assert_eq!(launch_failure_status(&err).0, 127);

        let err = std::io::Error::from_raw_os_error(nix::libc::ENOEXEC);
        let (code, message) = launch_failure_status(&err);
        assert_eq!(code, 126);
        assert_eq!(message, "Exec format error");
    }
}
