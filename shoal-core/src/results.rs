//! Types for execution results.

/// The result of executing a command.
#[derive(Clone, Debug, Default)]
pub struct ExecutionResult {
    /// The numerical exit code of the command.
    pub exit_code: u8,
    /// Whether the shell should exit after this command.
    pub exit_shell: bool,
    /// The signal that terminated the command, if any.
    pub terminating_signal: Option<i32>,
}

impl From<std::process::Output> for ExecutionResult {
    fn from(output: std::process::Output) -> Self {
        Self::from(output.status)
    }
}

impl From<std::process::ExitStatus> for ExecutionResult {
    fn from(status: std::process::ExitStatus) -> Self {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        if let Some(code) = status.code() {
            return Self::new((code & 0xFF) as u8);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            if let Some(signal) = status.signal() {
                let mut result = Self::new(128 + (signal & 0xFF) as u8);
                result.terminating_signal = Some(signal);
                return result;
            }
        }

        tracing::error!("unhandled exit status: {status:?}");
        Self::new(127)
    }
}

impl ExecutionResult {
    /// Returns a new result with the given exit code.
    ///
    /// # Parameters
    /// - `exit_code` - The exit code of the command.
    pub fn new(exit_code: u8) -> Self {
        Self {
            exit_code,
            ..Self::default()
        }
    }

    /// Returns a new result indicating success.
    pub fn success() -> Self {
        Self::new(0)
    }

    /// Returns whether the command was successful.
    pub const fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_taken_from_status() {
        use std::os::unix::process::ExitStatusExt;

        let status = std::process::ExitStatus::from_raw(0x2A00);
        let result = ExecutionResult::from(status);
        assert_eq!(result.exit_code, 42);
        assert_eq!(result.terminating_signal, None);
        assert!(!result.exit_shell);
    }

    #[test]
    fn signal_termination_maps_to_128_plus_signal() {
        use std::os::unix::process::ExitStatusExt;

        // Raw wait status for termination by SIGINT (signal 2).
        let status = std::process::ExitStatus::from_raw(2);
        let result = ExecutionResult::from(status);
        assert_eq!(result.exit_code, 130);
        assert_eq!(result.terminating_signal, Some(2));
    }

    #[test]
    fn success_is_zero() {
        assert!(ExecutionResult::success().is_success());
        assert!(!ExecutionResult::new(1).is_success());
    }
}
