//! Anonymous pipe support.

pub(crate) use os_pipe::{PipeReader, PipeWriter};

pub(crate) fn pipe() -> std::io::Result<(PipeReader, PipeWriter)> {
    os_pipe::pipe()
}
