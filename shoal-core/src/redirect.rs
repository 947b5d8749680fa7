//! Applying redirections to a command's open files.

use std::path::{Path, PathBuf};

use shoal_parser::ast;

use crate::error;
use crate::expansion;
use crate::heredoc::MaterializedHeredocs;
use crate::openfiles::{OpenFile, OpenFiles};
use crate::shell::Shell;

/// Applies one redirection to the given open files. Every redirection opens
/// its target (so `> a > b` truncates both files), and binding the same fd
/// twice lets the later redirection win.
pub(crate) fn setup_redirect(
    shell: &Shell,
    open_files: &mut OpenFiles,
    stage_index: usize,
    redirect: &ast::Redirect,
    heredocs: &mut MaterializedHeredocs,
) -> Result<(), error::Error> {
    let file = match &redirect.target {
        ast::RedirectTarget::HereDocTag(_) => heredocs
            .take(stage_index)
            .ok_or(error::Error::HereDocumentUnavailable)?,
        ast::RedirectTarget::Filename(word) => {
            let path = expand_filename(shell, word)?;
            let mut options = std::fs::OpenOptions::new();
            match redirect.kind {
                ast::RedirectKind::Input => {
                    options.read(true);
                }
                ast::RedirectKind::Output => {
                    options.write(true).create(true).truncate(true);
                }
                ast::RedirectKind::Append => {
                    options.write(true).create(true).append(true);
                }
                // The parser only attaches filename targets to file
                // redirections.
                ast::RedirectKind::HereDoc => {
                    return Err(error::Error::HereDocumentUnavailable);
                }
            }

            let file = options.open(&path).map_err(|e| {
                error::Error::RedirectionFailure(path.to_string_lossy().into_owned(), e)
            })?;
            OpenFile::File(file)
        }
    };

    open_files.set(redirect.fd, file);
    Ok(())
}

/// Expands a redirection target word to exactly one filename, resolved
/// against the shell's working directory.
fn expand_filename(shell: &Shell, word: &ast::Word) -> Result<PathBuf, error::Error> {
    let expanded = expansion::expand_word(shell, word)
        .ok_or_else(|| error::Error::AmbiguousRedirect(word.to_string()))?;

    let path = Path::new(&expanded);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(shell.working_dir.join(path))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn no_heredocs() -> MaterializedHeredocs {
        let pipeline = ast::Pipeline { stages: vec![] };
        let mut shell = Shell::empty();
        crate::heredoc::materialize_all(&mut shell, &pipeline).unwrap()
    }

    fn filename_redirect(kind: ast::RedirectKind, fd: u32, path: &Path) -> ast::Redirect {
        ast::Redirect {
            kind,
            fd,
            target: ast::RedirectTarget::Filename(ast::Word {
                pieces: vec![ast::WordPiece::Text(path.display().to_string())],
            }),
        }
    }

    #[test]
    fn later_redirections_win_but_all_targets_open() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, "stale")?;

        let shell = Shell::empty();
        let mut open_files = OpenFiles::default();
        let mut heredocs = no_heredocs();
        for redirect in [
            filename_redirect(ast::RedirectKind::Output, 1, &a),
            filename_redirect(ast::RedirectKind::Output, 1, &b),
        ] {
            setup_redirect(&shell, &mut open_files, 0, &redirect, &mut heredocs)?;
        }

        if let Some(file) = open_files.remove(1) {
            let mut file = file;
            file.write_all(b"fresh")?;
        }
        drop(open_files);

        // `a` was opened (and truncated) even though `b` won the fd.
        assert_eq!(std::fs::read_to_string(&a)?, "");
        assert_eq!(std::fs::read_to_string(&b)?, "fresh");

        Ok(())
    }

    #[test]
    fn applying_the_same_list_twice_is_idempotent() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("out");

        let shell = Shell::empty();
        let redirect = filename_redirect(ast::RedirectKind::Output, 1, &target);

        for _ in 0..2 {
            let mut open_files = OpenFiles::default();
            let mut heredocs = no_heredocs();
            setup_redirect(&shell, &mut open_files, 0, &redirect, &mut heredocs)?;
            assert!(matches!(open_files.get(1), Some(OpenFile::File(_))));
        }

        assert_eq!(std::fs::read_to_string(&target)?, "");
        Ok(())
    }

    #[test]
    fn input_redirections_bind_readable_files() -> anyhow::Result<()> {
        use std::io::Read;

        let dir = tempfile::tempdir()?;
        let source = dir.path().join("in");
        std::fs::write(&source, "contents")?;

        let shell = Shell::empty();
        let mut open_files = OpenFiles::default();
        let mut heredocs = no_heredocs();
        let redirect = filename_redirect(ast::RedirectKind::Input, 0, &source);
        setup_redirect(&shell, &mut open_files, 0, &redirect, &mut heredocs)?;

        let mut contents = String::new();
        open_files
            .remove(0)
            .unwrap()
            .read_to_string(&mut contents)?;
        assert_eq!(contents, "contents");

        Ok(())
    }

    #[test]
    fn append_redirections_extend_the_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("log");
        std::fs::write(&target, "old\n")?;

        let shell = Shell::empty();
        let mut open_files = OpenFiles::default();
        let mut heredocs = no_heredocs();
        let redirect = filename_redirect(ast::RedirectKind::Append, 1, &target);
        setup_redirect(&shell, &mut open_files, 0, &redirect, &mut heredocs)?;

        if let Some(mut file) = open_files.remove(1) {
            file.write_all(b"new\n")?;
        }

        assert_eq!(std::fs::read_to_string(&target)?, "old\nnew\n");
        Ok(())
    }

    #[test]
    fn missing_input_files_report_the_target_name() {
        let shell = Shell::empty();
        let mut open_files = OpenFiles::default();
        let mut heredocs = no_heredocs();
        let redirect =
            filename_redirect(ast::RedirectKind::Input, 0, Path::new("/no/such/file"));

        let result = setup_redirect(&shell, &mut open_files, 0, &redirect, &mut heredocs);
        assert!(matches!(
            result,
            Err(error::Error::RedirectionFailure(name, _)) if name == "/no/such/file"
        ));
    }

    #[test]
    fn relative_targets_resolve_against_the_shell_working_dir() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;

        let mut shell = Shell::empty();
        shell.working_dir = dir.path().to_path_buf();

        let redirect = ast::Redirect {
            kind: ast::RedirectKind::Output,
            fd: 1,
            target: ast::RedirectTarget::Filename(ast::Word {
                pieces: vec![ast::WordPiece::Text("out".into())],
            }),
        };

        let mut open_files = OpenFiles::default();
        let mut heredocs = no_heredocs();
        setup_redirect(&shell, &mut open_files, 0, &redirect, &mut heredocs)?;
        drop(open_files);

        assert!(dir.path().join("out").exists());
        Ok(())
    }
}
