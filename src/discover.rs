//! Input discovery: enumerate workflow files in one directory by suffix.
//!
//! Matching is non-recursive. For each configured suffix, matches are
//! appended in lexicographic order, so `yml` files precede `yaml` files
//! with the default suffix list regardless of directory iteration order.

use globset::Glob;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug)]
pub enum DiscoverError {
    /// A suffix produced a malformed glob. This is a programming or
    /// configuration error, never a runtime condition.
    Pattern(globset::Error),
    /// The workflows directory could not be read.
    Directory(std::io::Error),
}

impl std::fmt::Display for DiscoverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoverError::Pattern(e) => write!(f, "invalid workflow file pattern: {e}"),
            DiscoverError::Directory(e) => write!(f, "failed to read workflows directory: {e}"),
        }
    }
}

impl std::error::Error for DiscoverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoverError::Pattern(e) => Some(e),
            DiscoverError::Directory(e) => Some(e),
        }
    }
}

/// Returns all files in `dir` whose name matches `*.<suffix>` for any of the
/// given suffixes, grouped by suffix in the order given and sorted by name
/// within each group.
pub fn workflow_files(dir: &Path, suffixes: &[String]) -> Result<Vec<PathBuf>, DiscoverError> {
    let mut entries: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(DiscoverError::Directory)? {
        let entry = entry.map_err(DiscoverError::Directory)?;
        let path = entry.path();
        if path.is_file() {
            entries.push(path);
        }
    }

    let mut matched: Vec<PathBuf> = Vec::new();
    for suffix in suffixes {
        let matcher = Glob::new(&format!("*.{suffix}"))
            .map_err(DiscoverError::Pattern)?
            .compile_matcher();
        let mut batch: Vec<PathBuf> = entries
            .iter()
            .filter(|p| p.file_name().is_some_and(|name| matcher.is_match(name)))
            .cloned()
            .collect();
        batch.sort();
        debug!(suffix = %suffix, count = batch.len(), "Matched workflow files for suffix");
        matched.extend(batch);
    }

    info!(dir = %dir.display(), count = matched.len(), "Workflow discovery complete");
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir, write};
    use tempfile::tempdir;

    fn suffixes() -> Vec<String> {
        vec!["yml".to_string(), "yaml".to_string()]
    }

    #[test]
    fn returns_matches_grouped_by_suffix_then_sorted() {
        let dir = tempdir().unwrap();
        write(dir.path().join("deploy.yaml"), "b").unwrap();
        write(dir.path().join("release.yml"), "c").unwrap();
        write(dir.path().join("build.yml"), "a").unwrap();
        write(dir.path().join("notes.txt"), "x").unwrap();

        let files = workflow_files(dir.path(), &suffixes()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["build.yml", "release.yml", "deploy.yaml"]);
    }

    #[test]
    fn empty_directory_yields_empty_list() {
        let dir = tempdir().unwrap();
        let files = workflow_files(dir.path(), &suffixes()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn does_not_recurse_into_subdirectories() {
        let dir = tempdir().unwrap();
        create_dir(dir.path().join("nested")).unwrap();
        write(dir.path().join("nested").join("inner.yml"), "y").unwrap();
        write(dir.path().join("top.yml"), "t").unwrap();

        let files = workflow_files(dir.path(), &suffixes()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("top.yml"));
    }

    #[test]
    fn missing_directory_is_a_directory_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");
        let err = workflow_files(&missing, &suffixes()).unwrap_err();
        assert!(matches!(err, DiscoverError::Directory(_)));
    }

    #[test]
    fn malformed_suffix_is_a_pattern_error() {
        let dir = tempdir().unwrap();
        let bad = vec!["{".to_string()];
        let err = workflow_files(dir.path(), &bad).unwrap_err();
        assert!(matches!(err, DiscoverError::Pattern(_)));
    }
}
