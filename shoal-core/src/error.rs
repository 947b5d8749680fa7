//! Monolithic error type for the shell.

use std::path::PathBuf;

/// Monolithic error type for the shell.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The given path is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A redirection target word expanded to nothing or to multiple fields.
    #[error("{0}: ambiguous redirect")]
    AmbiguousRedirect(String),

    /// An error occurred while redirecting with the given file.
    #[error("{0}: {1}")]
    RedirectionFailure(String, std::io::Error),

    /// A here-document body exceeded the maximum allowed size.
    #[error("here-document exceeds the maximum allowed size")]
    HereDocumentTooLarge,

    /// No materialized here-document body was available for a redirection.
    #[error("here-document body unavailable")]
    HereDocumentUnavailable,

    /// Execution was interrupted by the user.
    #[error("interrupted")]
    Interrupted,

    /// The given open file cannot be read from.
    #[error("cannot read from {0}")]
    OpenFileNotReadable(&'static str),

    /// The given open file cannot be written to.
    #[error("cannot write to {0}")]
    OpenFileNotWritable(&'static str),

    /// An error occurred while creating a child process.
    #[error("failed to create child process")]
    ChildCreationFailure,

    /// An I/O error occurred.
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),

    /// A system error occurred.
    #[error("system error: {0}")]
    ErrnoError(#[from] nix::errno::Errno),

    /// A threading error occurred.
    #[error("threading error")]
    ThreadingError(#[from] tokio::task::JoinError),

    /// An integer conversion failed.
    #[error("failed to convert integer")]
    TryIntParseError(#[from] std::num::TryFromIntError),
}
