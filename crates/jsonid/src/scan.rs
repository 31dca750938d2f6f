//! Deterministic discovery of `.json` files under a directory.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Recursively collect regular files under `root` whose name ends in
/// `.json` (case-insensitive), sorted ascending by file name.
///
/// Identifier assignment is order-dependent, so the sort must be
/// reproducible across runs; ties between equal file names in
/// different subdirectories are broken by the full path.
///
/// A missing or unreadable root is logged and treated as a directory
/// with no matching files. Symlinks are not followed.
#[must_use]
pub fn list_json_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(
                    root = %root.display(),
                    error = %err,
                    "skipping unreadable path while scanning for JSON files"
                );
                continue;
            }
        };
        if entry.file_type().is_file() && has_json_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort_by(|a, b| match (a.file_name(), b.file_name()) {
        (Some(left), Some(right)) => left.cmp(right).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    });
    files
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"{}").unwrap();
    }

    #[test]
    fn finds_json_files_recursively_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();

        touch(&dir.path().join("pistol.json"));
        touch(&dir.path().join("readme.txt"));
        touch(&nested.join("gaussrifle.json"));
        touch(&nested.join("notes.md"));

        let files = list_json_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["gaussrifle.json", "pistol.json"]);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.JSON"));
        touch(&dir.path().join("b.Json"));
        touch(&dir.path().join("c.jsonx"));

        let files = list_json_files(dir.path());
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn missing_root_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(list_json_files(&missing).is_empty());
    }

    #[test]
    fn directories_are_not_listed() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("folder.json")).unwrap();
        assert!(list_json_files(dir.path()).is_empty());
    }
}
