//! Locating `*_spec.yaml` files in a spec directory.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::diagnostics::{HelmSpecError, Result};

/// Glob-style pattern spec files must match, for messages.
pub const SPEC_FILE_PATTERN: &str = "*_spec.yaml";

const SPEC_FILE_SUFFIX: &str = "_spec.yaml";

/// Finds spec files in a spec directory.
///
/// Only files directly inside the directory are considered; the search does
/// not descend into subdirectories.
#[derive(Debug)]
pub struct SpecDiscoverer;

impl SpecDiscoverer {
    /// Checks that `dir` exists, is a directory, and holds at least one spec file.
    pub fn validate_spec_dir(dir: &Path) -> Result<()> {
        let metadata = std::fs::metadata(dir).map_err(|source| HelmSpecError::SpecDirMissing {
            path: dir.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(HelmSpecError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        if Self::discover_spec_files(dir)?.is_empty() {
            return Err(HelmSpecError::NoSpecFiles {
                pattern: SPEC_FILE_PATTERN.to_string(),
                path: dir.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Lists the spec files in `dir`, sorted for a deterministic run order.
    pub fn discover_spec_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| HelmSpecError::Walk {
                path: dir.to_path_buf(),
                message: e.to_string(),
            })?;
            // `Path::is_file` follows symlinks, so linked spec files count.
            if !Self::is_spec_file(entry.path()) || !entry.path().is_file() {
                continue;
            }
            files.push(entry.into_path());
        }
        files.sort();
        Ok(files)
    }

    fn is_spec_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(SPEC_FILE_SUFFIX))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn finds_only_spec_files_at_top_level() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_spec.yaml"), "").unwrap();
        fs::write(dir.path().join("a_spec.yaml"), "").unwrap();
        fs::write(dir.path().join("values.yaml"), "").unwrap();
        fs::write(dir.path().join("c_spec.yml"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/d_spec.yaml"), "").unwrap();

        let files = SpecDiscoverer::discover_spec_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a_spec.yaml"), dir.path().join("b_spec.yaml")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_spec_files_are_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("real.yaml"), "").unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("real.yaml"),
            dir.path().join("linked_spec.yaml"),
        )
        .unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("gone.yaml"),
            dir.path().join("dangling_spec.yaml"),
        )
        .unwrap();

        SpecDiscoverer::validate_spec_dir(dir.path()).unwrap();
        assert_eq!(
            SpecDiscoverer::discover_spec_files(dir.path()).unwrap(),
            vec![dir.path().join("linked_spec.yaml")]
        );
    }

    #[test]
    fn missing_dir_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = SpecDiscoverer::validate_spec_dir(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, HelmSpecError::SpecDirMissing { .. }));
    }

    #[test]
    fn file_is_not_a_spec_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a_spec.yaml");
        fs::write(&file, "").unwrap();
        let err = SpecDiscoverer::validate_spec_dir(&file).unwrap_err();
        assert!(matches!(err, HelmSpecError::NotADirectory { .. }));
    }

    #[test]
    fn dir_without_specs_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.yaml"), "").unwrap();
        let err = SpecDiscoverer::validate_spec_dir(dir.path()).unwrap_err();
        assert!(matches!(err, HelmSpecError::NoSpecFiles { .. }));
        assert!(err.to_string().contains(SPEC_FILE_PATTERN));
    }
}
