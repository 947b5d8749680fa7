//! Core implementation of the shoal shell: shell state, the pipeline
//! execution engine, built-in commands, and the facilities they rely on.

pub mod builtins;
mod commands;
pub mod env;
mod error;
mod expansion;
mod heredoc;
mod input;
mod interp;
mod openfiles;
mod pathsearch;
mod processes;
mod redirect;
mod results;
mod shell;
mod sys;
pub mod traps;

pub use commands::{ExecutionContext, ExecutionParameters};
pub use error::Error;
pub use heredoc::HEREDOC_SIZE_LIMIT;
pub use input::{InputSource, ReadOutcome};
pub use openfiles::{OpenFile, OpenFiles, STDERR_FD, STDIN_FD, STDOUT_FD};
pub use results::ExecutionResult;
pub use shell::{CreateOptions, RuntimeOptions, Shell};
