//! # External Tool Detection (`common::system::tools`)
//!
//! File: cli/src/common/system/tools.rs
//!
//! ## Overview
//!
//! Archivers depend on external utilities (`tar`, `xz`, `compress`, ...). This
//! module answers "is this utility installed?" by searching `PATH` for an
//! executable file of that name, the same resolution the OS performs when a
//! pipeline stage is spawned.
//!
//! The tool is never executed for the check. Several compressors read stdin
//! when run without arguments and would block on a check like `tool --version`.
//!
use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;
use tracing::trace;

/// Locates `name` in the directories listed in `PATH`.
///
/// A name containing a path separator is checked as-is instead.
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    find_in(name, env::var_os("PATH").as_deref())
}

/// True if `name` resolves to an executable.
pub fn is_available(name: &str) -> bool {
    find_in_path(name).is_some()
}

/// The subset of `utilities` that cannot be found, in their original order.
pub fn missing<'a>(utilities: &[&'a str]) -> Vec<&'a str> {
    utilities
        .iter()
        .copied()
        .filter(|utility| !is_available(utility))
        .collect()
}

fn find_in(name: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    let cwd = env::current_dir().ok()?;
    let found = which::which_in(name, path_var, cwd).ok();
    trace!("Lookup of '{}' in PATH: {:?}", name, found);
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_common_tool_is_found() {
        assert!(is_available("sh"), "'sh' should be found in PATH for test execution");
        assert!(!is_available("nonexistent_pack_test_command_98765"));
    }

    #[test]
    fn test_missing_preserves_order() {
        let missing = missing(&["sh", "pack-missing-b", "pack-missing-a"]);
        assert_eq!(missing, vec!["pack-missing-b", "pack-missing-a"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_files_are_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let plain = first.path().join("tool");
        fs::write(&plain, "").unwrap();
        fs::set_permissions(&plain, fs::Permissions::from_mode(0o644)).unwrap();
        let exec = second.path().join("tool");
        fs::write(&exec, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&exec, fs::Permissions::from_mode(0o755)).unwrap();

        let path_var = env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(find_in("tool", Some(path_var.as_os_str())), Some(exec.clone()));
        assert_eq!(find_in("tool", None), None);
        assert_eq!(find_in(exec.to_str().unwrap(), None), Some(exec));
        assert_eq!(find_in("", Some(path_var.as_os_str())), None);
    }
}
