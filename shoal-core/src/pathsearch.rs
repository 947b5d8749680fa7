//! Resolving command names to executables.

use std::path::{Path, PathBuf};

use crate::sys::fs::{DEFAULT_EXECUTABLE_SEARCH_PATHS, PathExt};

/// The outcome of resolving a command name.
pub(crate) enum ResolvedCommand {
    /// The name resolved to the given executable file.
    Found(PathBuf),
    /// No matching file was found.
    NotFound,
    /// A matching file (or directory) exists but cannot be executed.
    NotExecutable(PathBuf),
}

/// Resolves a command name against the given colon-separated search path.
/// Names containing a slash are treated as paths and are not searched. When
/// `path_value` is `None`, a default set of well-known directories is
/// searched instead. Relative names and search-path components are resolved
/// against `working_dir`, since the shell changes directory without moving
/// the process.
pub(crate) fn resolve(path_value: Option<&str>, name: &str, working_dir: &Path) -> ResolvedCommand {
    if name.contains('/') {
        let path = resolve_against(working_dir, Path::new(name));
        if !path.exists() {
            return ResolvedCommand::NotFound;
        }
        if path.is_dir() || !path.executable() {
            return ResolvedCommand::NotExecutable(path);
        }
        return ResolvedCommand::Found(path);
    }

    let mut not_executable = None;
    for dir in search_dirs(path_value) {
        // An empty search-path component names the working directory.
        let candidate = if dir.is_empty() {
            working_dir.join(name)
        } else {
            resolve_against(working_dir, Path::new(dir)).join(name)
        };
        if candidate.is_file() {
            if candidate.executable() {
                return ResolvedCommand::Found(candidate);
            }
            not_executable.get_or_insert(candidate);
        }
    }

    match not_executable {
        Some(path) => ResolvedCommand::NotExecutable(path),
        None => ResolvedCommand::NotFound,
    }
}

fn search_dirs(path_value: Option<&str>) -> Vec<&str> {
    match path_value {
        Some(path) => path.split(':').collect(),
        None => DEFAULT_EXECUTABLE_SEARCH_PATHS.to_vec(),
    }
}

fn resolve_against(working_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use std::os::unix::fs::PermissionsExt;

    use super::*;

    fn create_file(dir: &Path, name: &str, mode: u32) -> anyhow::Result<PathBuf> {
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\n")?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode))?;
        Ok(path)
    }

    #[test]
    fn finds_executables_in_path_order() -> anyhow::Result<()> {
        let first = tempfile::tempdir()?;
        let second = tempfile::tempdir()?;
        create_file(first.path(), "tool", 0o755)?;
        create_file(second.path(), "tool", 0o755)?;

        let path_value = format!("{}:{}", first.path().display(), second.path().display());
        let resolved = resolve(Some(&path_value), "tool", Path::new("/"));
        assert!(matches!(
            resolved, ResolvedCommand::Found(p) if p == first.path().join("tool")));

        Ok(())
    }

    #[test]
    fn skips_non_executable_files_when_a_later_match_works() -> anyhow::Result<()> {
        let first = tempfile::tempdir()?;
        let second = tempfile::tempdir()?;
        create_file(first.path(), "tool", 0o644)?;
        create_file(second.path(), "tool", 0o755)?;

        let path_value = format!("{}:{}", first.path().display(), second.path().display());
        let resolved = resolve(Some(&path_value), "tool", Path::new("/"));
        assert!(matches!(
            resolved, ResolvedCommand::Found(p) if p == second.path().join("tool")));

        Ok(())
    }

    #[test]
    fn sole_non_executable_match_is_reported_as_such() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        create_file(dir.path(), "tool", 0o644)?;

        let path_value = dir.path().display().to_string();
        assert!(matches!(
            resolve(Some(&path_value), "tool", Path::new("/")),
            ResolvedCommand::NotExecutable(_)
        ));

        Ok(())
    }

    #[test]
    fn missing_commands_are_not_found() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path_value = dir.path().display().to_string();
        assert!(matches!(
            resolve(Some(&path_value), "no-such-tool", Path::new("/")),
            ResolvedCommand::NotFound
        ));
        Ok(())
    }

    #[test]
    fn slash_names_bypass_the_search() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let tool = create_file(dir.path(), "tool", 0o755)?;

        let name = tool.display().to_string();
        assert!(matches!(
            resolve(None, &name, Path::new("/")),
            ResolvedCommand::Found(_)
        ));

        let dir_name = dir.path().display().to_string();
        assert!(matches!(
            resolve(None, &dir_name, Path::new("/")),
            ResolvedCommand::NotExecutable(_)
        ));

        Ok(())
    }

    #[test]
    fn relative_components_resolve_against_the_working_dir() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir(dir.path().join("bin"))?;
        create_file(&dir.path().join("bin"), "tool", 0o755)?;

        let resolved = resolve(Some("bin"), "tool", dir.path());
        assert!(matches!(
            resolved, ResolvedCommand::Found(p) if p == dir.path().join("bin").join("tool")));

        // Same for a relative slash-containing name.
        let resolved = resolve(None, "bin/tool", dir.path());
        assert!(matches!(
            resolved, ResolvedCommand::Found(p) if p == dir.path().join("bin/tool")));

        Ok(())
    }

    #[test]
    fn empty_components_name_the_working_dir() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        create_file(dir.path(), "tool", 0o755)?;

        let resolved = resolve(Some(""), "tool", dir.path());
        assert!(matches!(
            resolved, ResolvedCommand::Found(p) if p == dir.path().join("tool")));

        Ok(())
    }
}
