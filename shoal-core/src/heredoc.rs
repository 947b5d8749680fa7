//! Here-document materialization.
//!
//! Every here-document in a pipeline is materialized before any stage is
//! spawned: body lines are collected from the shell's input source, expanded
//! when the delimiter was unquoted, and written into an OS pipe whose read
//! end becomes the redirection source. The body is thus fixed at
//! materialization time.

use std::collections::VecDeque;
use std::io::Write;

use shoal_parser::ast;

use crate::error;
use crate::expansion;
use crate::input::ReadOutcome;
use crate::openfiles::OpenFile;
use crate::shell::Shell;
use crate::sys;

/// The maximum number of body bytes collected for a single here-document.
pub const HEREDOC_SIZE_LIMIT: usize = 1_048_576;

/// Materialized here-document descriptors for a pipeline, one queue per
/// stage, in redirection order.
pub(crate) struct MaterializedHeredocs {
    stages: Vec<VecDeque<OpenFile>>,
}

impl MaterializedHeredocs {
    /// Takes the next materialized descriptor for the given stage. Each
    /// descriptor is yielded exactly once.
    pub(crate) fn take(&mut self, stage_index: usize) -> Option<OpenFile> {
        self.stages.get_mut(stage_index)?.pop_front()
    }
}

/// Collects and materializes every here-document in the pipeline, in stage
/// order then redirection order.
pub(crate) fn materialize_all(
    shell: &mut Shell,
    pipeline: &ast::Pipeline,
) -> Result<MaterializedHeredocs, error::Error> {
    let mut stages = Vec::with_capacity(pipeline.stages.len());

    for stage in &pipeline.stages {
        let mut materialized = VecDeque::new();
        for redirect in &stage.redirects {
            if let ast::RedirectTarget::HereDocTag(tag) = &redirect.target {
                let body = collect_body(shell, tag)?;
                materialized.push_back(into_pipe(&body)?);
            }
        }
        stages.push(materialized);
    }

    Ok(MaterializedHeredocs { stages })
}

fn collect_body(shell: &mut Shell, tag: &ast::HereDocTag) -> Result<String, error::Error> {
    let mut body = String::new();

    loop {
        if shell.options.interactive {
            let mut stderr = std::io::stderr();
            write!(stderr, "> ")?;
            stderr.flush()?;
        }

        match shell.input.read_line()? {
            ReadOutcome::Interrupted => return Err(error::Error::Interrupted),
            ReadOutcome::Eof => {
                let mut stderr = std::io::stderr();
                writeln!(
                    stderr,
                    "{}: warning: here-document delimited by end-of-file (wanted `{}')",
                    shell.display_name(),
                    tag.delimiter
                )?;
                break;
            }
            ReadOutcome::Line(line) => {
                // The delimiter comparison is exact; the line's terminating
                // newline is already stripped.
                if line == tag.delimiter {
                    break;
                }

                let line = if tag.requires_expansion {
                    expansion::expand_text(shell, &line)
                } else {
                    line
                };

                if body.len() + line.len() + 1 > HEREDOC_SIZE_LIMIT {
                    // Drain the rest of the body so its lines are not later
                    // mistaken for commands.
                    discard_until_delimiter(shell, &tag.delimiter)?;
                    return Err(error::Error::HereDocumentTooLarge);
                }
                body.push_str(&line);
                body.push('\n');
            }
        }
    }

    Ok(body)
}

fn discard_until_delimiter(shell: &mut Shell, delimiter: &str) -> Result<(), error::Error> {
    loop {
        match shell.input.read_line()? {
            ReadOutcome::Eof | ReadOutcome::Interrupted => break,
            ReadOutcome::Line(line) => {
                if line == delimiter {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Writes the body into a fresh pipe and returns its read end. The pipe's
/// capacity is grown to hold bodies larger than the platform default, since
/// no reader exists until the consuming stage spawns.
fn into_pipe(body: &str) -> Result<OpenFile, error::Error> {
    let (reader, mut writer) = sys::pipes::pipe()?;

    #[cfg(target_os = "linux")]
    if body.len() > 65536 {
        use std::os::fd::AsFd;
        nix::fcntl::fcntl(
            writer.as_fd(),
            nix::fcntl::FcntlArg::F_SETPIPE_SZ(i32::try_from(body.len())?),
        )?;
    }

    writer.write_all(body.as_bytes())?;
    drop(writer);

    Ok(OpenFile::PipeReader(reader))
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use crate::input::InputSource;

    fn heredoc_pipeline(delimiter: &str, requires_expansion: bool) -> ast::Pipeline {
        ast::Pipeline {
            stages: vec![ast::SimpleCommand {
                words: vec![],
                redirects: vec![ast::Redirect {
                    kind: ast::RedirectKind::HereDoc,
                    fd: 0,
                    target: ast::RedirectTarget::HereDocTag(ast::HereDocTag {
                        delimiter: delimiter.into(),
                        requires_expansion,
                    }),
                }],
            }],
        }
    }

    fn read_all(file: &mut OpenFile) -> String {
        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();
        contents
    }

    #[test]
    fn body_round_trips_through_the_pipe() -> anyhow::Result<()> {
        let mut shell = Shell::empty();
        shell.input = InputSource::from_string("x\ny\nEOF\nleftover\n");

        let pipeline = heredoc_pipeline("EOF", true);
        let mut docs = materialize_all(&mut shell, &pipeline)?;

        let mut file = docs.take(0).unwrap();
        assert_eq!(read_all(&mut file), "x\ny\n");
        assert!(docs.take(0).is_none());

        // Lines past the delimiter stay in the input source.
        assert!(matches!(
            shell.input.read_line()?,
            ReadOutcome::Line(line) if line == "leftover"
        ));

        Ok(())
    }

    #[test]
    fn delimiter_match_is_exact() -> anyhow::Result<()> {
        let mut shell = Shell::empty();
        shell.input = InputSource::from_string("EOF \n EOF\nEOF\n");

        let pipeline = heredoc_pipeline("EOF", false);
        let mut docs = materialize_all(&mut shell, &pipeline)?;

        let mut file = docs.take(0).unwrap();
        assert_eq!(read_all(&mut file), "EOF \n EOF\n");
        Ok(())
    }

    #[test]
    fn unquoted_delimiters_enable_expansion() -> anyhow::Result<()> {
        let mut shell = Shell::empty();
        shell.env.set("NAME", "world");
        shell.last_exit_status = 3;
        shell.input = InputSource::from_string("hello $NAME $?\nEOF\n");

        let pipeline = heredoc_pipeline("EOF", true);
        let mut docs = materialize_all(&mut shell, &pipeline)?;
        let mut file = docs.take(0).unwrap();
        assert_eq!(read_all(&mut file), "hello world 3\n");

        Ok(())
    }

    #[test]
    fn quoted_delimiters_disable_expansion() -> anyhow::Result<()> {
        let mut shell = Shell::empty();
        shell.env.set("NAME", "world");
        shell.input = InputSource::from_string("hello $NAME\nEOF\n");

        let pipeline = heredoc_pipeline("EOF", false);
        let mut docs = materialize_all(&mut shell, &pipeline)?;
        let mut file = docs.take(0).unwrap();
        assert_eq!(read_all(&mut file), "hello $NAME\n");

        Ok(())
    }

    #[test]
    fn oversized_bodies_abort_before_anything_spawns() {
        let mut shell = Shell::empty();

        let long_line = "a".repeat(64 * 1024);
        let mut input = String::new();
        for _ in 0..17 {
            input.push_str(&long_line);
            input.push('\n');
        }
        input.push_str("EOF\n");
        shell.input = InputSource::from_string(input);

        let pipeline = heredoc_pipeline("EOF", false);
        let result = materialize_all(&mut shell, &pipeline);
        assert!(matches!(result, Err(error::Error::HereDocumentTooLarge)));
    }

    #[test]
    fn eof_ends_collection_with_the_body_so_far() -> anyhow::Result<()> {
        let mut shell = Shell::empty();
        shell.input = InputSource::from_string("only line");

        let pipeline = heredoc_pipeline("EOF", false);
        let mut docs = materialize_all(&mut shell, &pipeline)?;
        let mut file = docs.take(0).unwrap();
        assert_eq!(read_all(&mut file), "only line\n");

        Ok(())
    }

    #[test]
    fn heredocs_materialize_across_all_stages_in_order() -> anyhow::Result<()> {
        let mut shell = Shell::empty();
        shell.input = InputSource::from_string("first\nA\nsecond\nB\n");

        let mut stages = heredoc_pipeline("A", false).stages;
        stages.extend(heredoc_pipeline("B", false).stages);
        let pipeline = ast::Pipeline { stages };

        let mut docs = materialize_all(&mut shell, &pipeline)?;
        let mut first = docs.take(0).unwrap();
        let mut second = docs.take(1).unwrap();
        assert_eq!(read_all(&mut first), "first\n");
        assert_eq!(read_all(&mut second), "second\n");

        Ok(())
    }
}
