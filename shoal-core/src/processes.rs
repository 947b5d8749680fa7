//! Child process tracking.

use crate::{error, sys};

/// A waitable future that will yield the results of a child process's execution.
type WaitableChildProcess = std::pin::Pin<
    Box<dyn futures::Future<Output = Result<std::process::Output, std::io::Error>> + Send + Sync>,
>;

/// Tracks a spawned child process being awaited.
pub struct ChildProcess {
    /// If available, the process ID of the child.
    pid: Option<sys::process::ProcessId>,
    exec_future: WaitableChildProcess,
}

impl ChildProcess {
    /// Wraps a child process and its future.
    pub(crate) fn new(pid: Option<sys::process::ProcessId>, child: sys::process::Child) -> Self {
        Self {
            pid,
            exec_future: Box::pin(child.wait_with_output()),
        }
    }

    /// Returns the process's ID.
    pub const fn pid(&self) -> Option<sys::process::ProcessId> {
        self.pid
    }

    /// Waits for the process to exit. SIGINT received while waiting is
    /// swallowed here; the foreground child shares the terminal's process
    /// group and sees the signal itself, so the shell just keeps waiting for
    /// the child's fate.
    pub async fn wait(&mut self) -> Result<std::process::Output, error::Error> {
        #[allow(clippy::ignored_unit_patterns)]
        loop {
            tokio::select! {
                output = &mut self.exec_future => {
                    break Ok(output?);
                },
                _ = sys::signal::await_ctrl_c() => {
                    // The child saw the SIGINT too; let it decide, and keep
                    // waiting for it to exit.
                },
            }
        }
    }
}
