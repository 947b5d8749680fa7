//! Managing files open within a shell instance.

use std::collections::HashMap;
use std::io::{Read, Write};
#[cfg(unix)]
use std::os::fd::{AsFd, OwnedFd};
use std::process::Stdio;

use crate::error;
use crate::sys;

/// Represents a file open in a shell context.
pub enum OpenFile {
    /// The original standard input this process was started with.
    Stdin,
    /// The original standard output this process was started with.
    Stdout,
    /// The original standard error this process was started with.
    Stderr,
    /// A file open for reading or writing.
    File(std::fs::File),
    /// A read end of a pipe.
    PipeReader(sys::pipes::PipeReader),
    /// A write end of a pipe.
    PipeWriter(sys::pipes::PipeWriter),
}

impl OpenFile {
    /// Duplicates the open file, yielding a new handle referring to the same
    /// underlying file description.
    pub fn try_dup(&self) -> Result<Self, error::Error> {
        let duplicate = match self {
            Self::Stdin => Self::Stdin,
            Self::Stdout => Self::Stdout,
            Self::Stderr => Self::Stderr,
            Self::File(f) => Self::File(f.try_clone()?),
            Self::PipeReader(f) => Self::PipeReader(f.try_clone()?),
            Self::PipeWriter(f) => Self::PipeWriter(f.try_clone()?),
        };

        Ok(duplicate)
    }

    /// Converts the open file into an `OwnedFd` suitable for mapping into a
    /// child process. The original standard streams are duplicated so the
    /// shell retains its own copies.
    #[cfg(unix)]
    pub(crate) fn into_owned_fd(self) -> Result<OwnedFd, error::Error> {
        match self {
            Self::Stdin => Ok(std::io::stdin().as_fd().try_clone_to_owned()?),
            Self::Stdout => Ok(std::io::stdout().as_fd().try_clone_to_owned()?),
            Self::Stderr => Ok(std::io::stderr().as_fd().try_clone_to_owned()?),
            Self::File(f) => Ok(f.into()),
            Self::PipeReader(r) => Ok(OwnedFd::from(r)),
            Self::PipeWriter(w) => Ok(OwnedFd::from(w)),
        }
    }
}

impl From<OpenFile> for Stdio {
    fn from(open_file: OpenFile) -> Self {
        match open_file {
            OpenFile::Stdin | OpenFile::Stdout | OpenFile::Stderr => Self::inherit(),
            OpenFile::File(f) => f.into(),
            OpenFile::PipeReader(f) => f.into(),
            OpenFile::PipeWriter(f) => f.into(),
        }
    }
}

impl Read for OpenFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Stdin => std::io::stdin().read(buf),
            Self::Stdout | Self::Stderr | Self::PipeWriter(_) => Err(std::io::Error::other(
                error::Error::OpenFileNotReadable(self.description()),
            )),
            Self::File(f) => f.read(buf),
            Self::PipeReader(reader) => reader.read(buf),
        }
    }
}

impl Write for OpenFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Self::Stdin | Self::PipeReader(_) => Err(std::io::Error::other(
                error::Error::OpenFileNotWritable(self.description()),
            )),
            Self::Stdout => std::io::stdout().write(buf),
            Self::Stderr => std::io::stderr().write(buf),
            Self::File(f) => f.write(buf),
            Self::PipeWriter(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdin | Self::PipeReader(_) => Ok(()),
            Self::Stdout => std::io::stdout().flush(),
            Self::Stderr => std::io::stderr().flush(),
            Self::File(f) => f.flush(),
            Self::PipeWriter(writer) => writer.flush(),
        }
    }
}

impl OpenFile {
    const fn description(&self) -> &'static str {
        match self {
            Self::Stdin => "stdin",
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
            Self::File(_) => "file",
            Self::PipeReader(_) => "pipe reader",
            Self::PipeWriter(_) => "pipe writer",
        }
    }
}

/// Represents the open files in a shell context.
pub struct OpenFiles {
    files: HashMap<u32, OpenFile>,
}

impl Default for OpenFiles {
    fn default() -> Self {
        Self {
            files: HashMap::from([
                (STDIN_FD, OpenFile::Stdin),
                (STDOUT_FD, OpenFile::Stdout),
                (STDERR_FD, OpenFile::Stderr),
            ]),
        }
    }
}

/// File descriptor used for standard input.
pub const STDIN_FD: u32 = 0;
/// File descriptor used for standard output.
pub const STDOUT_FD: u32 = 1;
/// File descriptor used for standard error.
pub const STDERR_FD: u32 = 2;

impl OpenFiles {
    /// Duplicates the table of open files.
    pub fn try_clone(&self) -> Result<Self, error::Error> {
        let mut files = HashMap::with_capacity(self.files.len());
        for (fd, file) in &self.files {
            files.insert(*fd, file.try_dup()?);
        }

        Ok(Self { files })
    }

    /// Retrieves the file backing the given file descriptor, if open.
    pub fn get(&self, fd: u32) -> Option<&OpenFile> {
        self.files.get(&fd)
    }

    /// Removes the file backing the given file descriptor from the table,
    /// returning it if it was open.
    pub fn remove(&mut self, fd: u32) -> Option<OpenFile> {
        self.files.remove(&fd)
    }

    /// Associates the given file with a file descriptor, returning the file
    /// previously open there, if any.
    pub fn set(&mut self, fd: u32, file: OpenFile) -> Option<OpenFile> {
        self.files.insert(fd, file)
    }
}

impl IntoIterator for OpenFiles {
    type Item = (u32, OpenFile);
    type IntoIter = <HashMap<u32, OpenFile> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}
