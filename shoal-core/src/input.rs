//! Line-oriented input sources for the shell.
//!
//! A single [`InputSource`] is shared between the interpreter's line loop and
//! here-document materialization, so a here-document started on one line
//! consumes the lines that follow it from the same underlying stream.

use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error;
use crate::traps::InterruptGuard;

/// The result of reading one line of input.
pub enum ReadOutcome {
    /// A line was read; the trailing newline (if any) has been removed.
    Line(String),
    /// The source is exhausted.
    Eof,
    /// The read was abandoned because the user interrupted it.
    Interrupted,
}

enum Stream {
    /// The process's standard input, read unbuffered so that bytes past the
    /// current line remain available to child processes.
    Stdin,
    File(std::io::BufReader<std::fs::File>),
    String(std::io::Cursor<Vec<u8>>),
    /// Test-only stream whose reads behave as if interrupted by the user.
    #[cfg(test)]
    Interrupt,
}

/// A shared, line-oriented input source. Clones refer to the same underlying
/// stream.
#[derive(Clone)]
pub struct InputSource {
    stream: Arc<Mutex<Stream>>,
}

impl InputSource {
    /// Returns a source reading from the process's standard input.
    pub fn stdin() -> Self {
        Self::new(Stream::Stdin)
    }

    /// Returns a source reading from the given script file.
    pub fn script(path: impl AsRef<Path>) -> Result<Self, error::Error> {
        let file = std::fs::File::open(path)?;
        Ok(Self::new(Stream::File(std::io::BufReader::new(file))))
    }

    /// Returns a source reading from an in-memory string.
    pub fn from_string(contents: impl Into<String>) -> Self {
        Self::new(Stream::String(std::io::Cursor::new(
            contents.into().into_bytes(),
        )))
    }

    /// Returns a source whose reads behave as if interrupted by the user.
    #[cfg(test)]
    pub(crate) fn interrupted() -> Self {
        Self::new(Stream::Interrupt)
    }

    fn new(stream: Stream) -> Self {
        Self {
            stream: Arc::new(Mutex::new(stream)),
        }
    }

    /// Reads the next line from the source. While the read is in progress,
    /// SIGINT is diverted to a flag so that an interactive interrupt abandons
    /// the line instead of killing the shell.
    pub fn read_line(&self) -> Result<ReadOutcome, error::Error> {
        let guard = InterruptGuard::install()?;
        let mut stream = self.stream.lock().unwrap_or_else(|e| e.into_inner());

        let mut line = Vec::new();
        loop {
            let mut byte = [0u8; 1];
            match stream.read_byte(&mut byte) {
                Ok(0) => {
                    if line.is_empty() {
                        return Ok(ReadOutcome::Eof);
                    }
                    break;
                }
                Ok(_) => {
                    if byte[0] == b'\n' {
                        break;
                    }
                    line.push(byte[0]);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                    if guard.interrupted() {
                        return Ok(ReadOutcome::Interrupted);
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(ReadOutcome::Line(String::from_utf8_lossy(&line).into_owned()))
    }
}

impl Stream {
    fn read_byte(&mut self, buf: &mut [u8; 1]) -> std::io::Result<usize> {
        match self {
            Self::Stdin => {
                nix::unistd::read(std::io::stdin(), buf).map_err(std::io::Error::from)
            }
            Self::File(reader) => reader.read(buf),
            Self::String(cursor) => cursor.read(buf),
            #[cfg(test)]
            Self::Interrupt => {
                crate::traps::set_pending_interrupt();
                Err(std::io::ErrorKind::Interrupted.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next_line(source: &InputSource) -> Option<String> {
        match source.read_line() {
            Ok(ReadOutcome::Line(line)) => Some(line),
            _ => None,
        }
    }

    #[test]
    fn string_sources_yield_lines_then_eof() {
        let source = InputSource::from_string("first\nsecond\n");
        assert_eq!(next_line(&source).as_deref(), Some("first"));
        assert_eq!(next_line(&source).as_deref(), Some("second"));
        assert!(matches!(source.read_line(), Ok(ReadOutcome::Eof)));
    }

    #[test]
    fn final_line_without_newline_is_yielded() {
        let source = InputSource::from_string("no newline");
        assert_eq!(next_line(&source).as_deref(), Some("no newline"));
        assert!(matches!(source.read_line(), Ok(ReadOutcome::Eof)));
    }

    #[test]
    fn clones_share_the_stream() {
        let source = InputSource::from_string("one\ntwo\n");
        let alias = source.clone();
        assert_eq!(next_line(&source).as_deref(), Some("one"));
        assert_eq!(next_line(&alias).as_deref(), Some("two"));
    }

    #[test]
    fn interrupted_reads_are_reported_as_such() {
        let source = InputSource::interrupted();
        assert!(matches!(source.read_line(), Ok(ReadOutcome::Interrupted)));
    }

    #[test]
    fn script_sources_read_files() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("script.sh");
        std::fs::write(&path, "echo hello\n")?;

        let source = InputSource::script(&path)?;
        assert_eq!(next_line(&source).as_deref(), Some("echo hello"));
        Ok(())
    }
}
