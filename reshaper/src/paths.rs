//! Path resolution for the CLI.
//!
//! Relative input and output paths are anchored at the directory holding the
//! executable, so the tool behaves the same from any working directory.

use std::io;
use std::path::{Path, PathBuf};

/// Default input file name.
pub const DEFAULT_INPUT: &str = "raw-values.csv";

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "yeast-model.csv";

/// Directory containing the running executable, with symlinks resolved.
pub fn executable_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory")
        })
}

/// `path` itself when absolute, otherwise `path` joined onto `base`.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_join_base() {
        let base = Path::new("/opt/dough/scripts");
        assert_eq!(
            resolve_against(base, Path::new("../src/data/yeast-model.csv")),
            PathBuf::from("/opt/dough/scripts/../src/data/yeast-model.csv")
        );
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let base = Path::new("/opt/dough/scripts");
        let absolute = std::env::temp_dir().join(DEFAULT_INPUT);
        assert_eq!(resolve_against(base, &absolute), absolute);
    }

    #[test]
    fn test_executable_dir_exists() {
        let dir = executable_dir().unwrap();
        assert!(dir.is_dir());
    }
}
