//! Infrastructure for shell built-in commands.

use std::io::Write;

use clap::Parser;

use crate::commands;
use crate::error;

mod cd;
mod echo;
mod env;
mod exit;
mod export;
mod pwd;
mod unset;

/// Exit codes for built-in commands.
pub enum ExitCode {
    /// The command was successful.
    Success,
    /// The inputs to the command were invalid.
    InvalidUsage,
    /// The command returned a specific custom numerical exit code.
    Custom(u8),
    /// The command is requesting to exit the shell, yielding the given exit code.
    ExitShell(u8),
}

impl ExitCode {
    /// Returns the numerical exit status for this code. A request to exit the
    /// shell carries its own status; the caller decides whether to honor the
    /// request itself.
    pub const fn status(&self) -> u8 {
        match self {
            Self::Success => 0,
            Self::InvalidUsage => 2,
            Self::Custom(code) | Self::ExitShell(code) => *code,
        }
    }
}

/// The closed set of built-in commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum BuiltinKind {
    /// Change the shell's working directory.
    Cd,
    /// Write arguments to standard output.
    Echo,
    /// Print the exported environment.
    Env,
    /// Exit the shell.
    Exit,
    /// Mark variables for export.
    Export,
    /// Print the working directory.
    Pwd,
    /// Remove variables.
    Unset,
}

impl BuiltinKind {
    /// Returns whether the builtin mutates shell state observable after it
    /// completes. Such a builtin only takes effect when run unpiped, in the
    /// shell's own context.
    pub const fn mutates_shell_state(self) -> bool {
        match self {
            Self::Cd | Self::Export | Self::Unset | Self::Exit => true,
            Self::Echo | Self::Env | Self::Pwd => false,
        }
    }
}

/// Trait implemented by built-in shell commands.
pub trait Command: Parser {
    /// Instantiates the built-in command with the given arguments.
    fn new<I>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = String>,
    {
        Self::try_parse_from(args)
    }

    /// Executes the built-in command in the provided context.
    fn execute(
        &self,
        context: commands::ExecutionContext<'_>,
    ) -> impl std::future::Future<Output = Result<ExitCode, error::Error>> + std::marker::Send;
}

/// Parses and executes the given builtin. Invalid options or arguments yield
/// a usage message on the context's standard error and an `InvalidUsage`
/// code, without the command running at all.
pub(crate) async fn execute(
    kind: BuiltinKind,
    context: commands::ExecutionContext<'_>,
    args: &[String],
) -> Result<ExitCode, error::Error> {
    match kind {
        BuiltinKind::Cd => parse_and_execute::<cd::CdCommand>(context, args).await,
        BuiltinKind::Echo => parse_and_execute::<echo::EchoCommand>(context, args).await,
        BuiltinKind::Env => parse_and_execute::<env::EnvCommand>(context, args).await,
        BuiltinKind::Exit => parse_and_execute::<exit::ExitCommand>(context, args).await,
        BuiltinKind::Export => parse_and_execute::<export::ExportCommand>(context, args).await,
        BuiltinKind::Pwd => parse_and_execute::<pwd::PwdCommand>(context, args).await,
        BuiltinKind::Unset => parse_and_execute::<unset::UnsetCommand>(context, args).await,
    }
}

async fn parse_and_execute<C: Command>(
    context: commands::ExecutionContext<'_>,
    args: &[String],
) -> Result<ExitCode, error::Error> {
    let argv = std::iter::once(context.command_name.clone()).chain(args.iter().cloned());

    match C::new(argv) {
        Ok(command) => command.execute(context).await,
        Err(e) if e.kind() == clap::error::ErrorKind::DisplayHelp => {
            let mut stdout = context.stdout()?;
            write!(stdout, "{e}")?;
            Ok(ExitCode::Success)
        }
        Err(e) => {
            let mut stderr = context.stderr()?;
            write!(stderr, "{e}")?;
            Ok(ExitCode::InvalidUsage)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn builtin_names_parse_to_kinds() {
        assert_eq!(BuiltinKind::from_str("cd"), Ok(BuiltinKind::Cd));
        assert_eq!(BuiltinKind::from_str("exit"), Ok(BuiltinKind::Exit));
        assert!(BuiltinKind::from_str("ls").is_err());
        assert!(BuiltinKind::from_str("CD").is_err());
    }

    #[test]
    fn state_mutating_builtins_are_identified() {
        assert!(BuiltinKind::Cd.mutates_shell_state());
        assert!(BuiltinKind::Export.mutates_shell_state());
        assert!(BuiltinKind::Unset.mutates_shell_state());
        assert!(BuiltinKind::Exit.mutates_shell_state());

        assert!(!BuiltinKind::Echo.mutates_shell_state());
        assert!(!BuiltinKind::Env.mutates_shell_state());
        assert!(!BuiltinKind::Pwd.mutates_shell_state());
    }

    #[test]
    fn exit_codes_map_to_statuses() {
        assert_eq!(ExitCode::Success.status(), 0);
        assert_eq!(ExitCode::InvalidUsage.status(), 2);
        assert_eq!(ExitCode::Custom(17).status(), 17);
        assert_eq!(ExitCode::ExitShell(3).status(), 3);
    }
}
