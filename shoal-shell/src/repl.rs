//! The shell's read-eval loop, shared by interactive and non-interactive
//! sessions.

use std::io::Write;

use shoal_core::{ExecutionParameters, ReadOutcome, Shell};

const PROMPT: &str = "shoal$ ";

/// Reads and executes lines until the input is exhausted or a command asks
/// the shell to exit. Returns the shell's final exit status.
pub(crate) async fn run_loop(shell: &mut Shell) -> Result<u8, shoal_core::Error> {
    let params = ExecutionParameters::default();

    loop {
        if shell.options.interactive {
            // The prompt goes to stderr, like other shells, so command
            // output redirection leaves it visible.
            let mut stderr = std::io::stderr();
            write!(stderr, "{PROMPT}")?;
            stderr.flush()?;
        }

        match shell.input.read_line()? {
            ReadOutcome::Eof => {
                if shell.options.interactive {
                    // Mirror the Ctrl-D behavior of other shells.
                    eprintln!("exit");
                }
                break;
            }
            ReadOutcome::Interrupted => {
                // The interrupted line is abandoned; a fresh prompt follows.
                shell.last_exit_status = 130;
                eprintln!();
            }
            ReadOutcome::Line(line) => match shell.run_line(&line, &params).await {
                Ok(result) => {
                    if result.exit_shell {
                        return Ok(result.exit_code);
                    }
                }
                Err(e) => {
                    eprintln!("{}: {e}", shell.display_name());
                    shell.last_exit_status = 1;
                }
            },
        }
    }

    Ok(shell.last_exit_status)
}
