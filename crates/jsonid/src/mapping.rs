//! The identifier-to-file table.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Map from identifier to the file it addresses.
///
/// Keys are normalized to uppercase on insert, so the `BTreeMap`
/// ordering and all lookups are effectively case-insensitive. No two
/// identifiers refer to the same file; the reconciler enforces this by
/// checking [`Mapping::contains_file`] before inserting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: BTreeMap<String, PathBuf>,
}

impl Mapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive lookup of the file addressed by `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Path> {
        self.entries.get(&id.to_uppercase()).map(PathBuf::as_path)
    }

    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.entries.contains_key(&id.to_uppercase())
    }

    /// Whether `file` is already mapped under some identifier.
    #[must_use]
    pub fn contains_file(&self, file: &Path) -> bool {
        self.entries.values().any(|mapped| mapped == file)
    }

    pub(crate) fn insert(&mut self, id: &str, file: PathBuf) {
        self.entries.insert(id.to_uppercase(), file);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(id, file)| (id.as_str(), file.as_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut mapping = Mapping::new();
        mapping.insert("weapo1", PathBuf::from("/data/weapons/pistol.json"));

        assert_eq!(
            mapping.get("WEAPO1"),
            Some(Path::new("/data/weapons/pistol.json"))
        );
        assert_eq!(mapping.get("Weapo1"), mapping.get("weapo1"));
        assert!(mapping.contains_id("wEaPo1"));
        assert_eq!(mapping.get("WEAPO2"), None);
    }

    #[test]
    fn keys_are_stored_uppercase() {
        let mut mapping = Mapping::new();
        mapping.insert("ab###1", PathBuf::from("/tmp/a.json"));

        let keys: Vec<_> = mapping.iter().map(|(id, _)| id.to_string()).collect();
        assert_eq!(keys, vec!["AB###1"]);
    }

    #[test]
    fn contains_file_sees_every_value() {
        let mut mapping = Mapping::new();
        mapping.insert("A1", PathBuf::from("/tmp/a.json"));
        mapping.insert("B1", PathBuf::from("/tmp/b.json"));

        assert!(mapping.contains_file(Path::new("/tmp/b.json")));
        assert!(!mapping.contains_file(Path::new("/tmp/c.json")));
    }
}
