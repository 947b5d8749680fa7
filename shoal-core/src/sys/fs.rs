//! File-system helpers.

use std::path::Path;

/// Search paths used when `PATH` is unset.
pub(crate) const DEFAULT_EXECUTABLE_SEARCH_PATHS: &[&str] = &[
    "/usr/local/sbin",
    "/usr/local/bin",
    "/usr/sbin",
    "/usr/bin",
    "/sbin",
    "/bin",
];

/// Extension trait for file access checks.
pub(crate) trait PathExt {
    /// Returns whether the calling process may execute the file.
    fn executable(&self) -> bool;
}

impl PathExt for Path {
    fn executable(&self) -> bool {
        nix::unistd::access(self, nix::unistd::AccessFlags::X_OK).is_ok()
    }
}
