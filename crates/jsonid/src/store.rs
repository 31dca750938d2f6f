//! Flat-file persistence for the id mapping.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jsonid_properties::PropertiesTable;

use crate::mapping::Mapping;

/// Loads and saves the mapping as a flat `key=value` file.
///
/// Persistence failures are absorbed: the in-memory mapping stays
/// authoritative for the process lifetime whether or not the file can
/// be read or written.
#[derive(Debug)]
pub struct PersistentStore {
    path: PathBuf,
    delete_missing_files: bool,
}

impl PersistentStore {
    pub fn new(path: impl Into<PathBuf>, delete_missing_files: bool) -> Self {
        Self {
            path: path.into(),
            delete_missing_files,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted mapping.
    ///
    /// Entries with an empty value are dropped, as are entries whose
    /// file no longer exists when `delete_missing_files` is set. A
    /// missing or empty store file is replaced with a fresh empty one,
    /// so a file always exists after the first run.
    #[must_use]
    pub fn load(&self) -> Mapping {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.write_table(&PropertiesTable::new());
                return Mapping::new();
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "failed to read persisted mapping; starting empty"
                );
                return Mapping::new();
            }
        };

        let table = jsonid_properties::parse(&text);
        if table.is_empty() {
            self.write_table(&PropertiesTable::new());
            return Mapping::new();
        }

        let mut mapping = Mapping::new();
        for (id, value) in table.iter() {
            if value.is_empty() {
                continue;
            }
            let file = PathBuf::from(value);
            if self.delete_missing_files && !file.exists() {
                tracing::debug!(id, file = %file.display(), "dropping stale entry");
                continue;
            }
            mapping.insert(id, file);
        }
        mapping
    }

    /// Serialize `mapping` to the store path, replacing any previous
    /// content wholesale. Returns whether the write succeeded.
    pub fn save(&self, mapping: &Mapping) -> bool {
        let table: PropertiesTable = mapping
            .iter()
            .map(|(id, file)| (id.to_string(), file.display().to_string()))
            .collect();
        self.write_table(&table)
    }

    fn write_table(&self, table: &PropertiesTable) -> bool {
        let mut text = String::from("# File paths\n");
        text.push_str(&jsonid_properties::serialize(table));

        // Write a sibling temp file first so a failed write cannot
        // truncate the existing store.
        let tmp = self.path.with_extension("tmp");
        let result = fs::write(&tmp, text).and_then(|()| fs::rename(&tmp, &self.path));
        match result {
            Ok(()) => {
                tracing::debug!(
                    path = %self.path.display(),
                    entries = table.len(),
                    "persisted mapping"
                );
                true
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "could not persist mapping; changes not saved this run"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_at(dir: &Path, delete_missing_files: bool) -> PersistentStore {
        PersistentStore::new(dir.join("storage.properties"), delete_missing_files)
    }

    #[test]
    fn load_creates_an_empty_store_file_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), false);

        let mapping = store.load();
        assert!(mapping.is_empty());
        assert!(store.path().is_file());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pistol.json");
        fs::write(&file, b"{}").unwrap();

        let store = store_at(dir.path(), false);
        let mut mapping = Mapping::new();
        mapping.insert("WEAPO1", file);
        assert!(store.save(&mapping));

        assert_eq!(store.load(), mapping);
    }

    #[test]
    fn load_applies_the_stale_entry_policy() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");

        let mut mapping = Mapping::new();
        mapping.insert("WEAPO1", missing);

        let keeping = store_at(dir.path(), false);
        keeping.save(&mapping);
        assert_eq!(keeping.load().len(), 1);

        let deleting = store_at(dir.path(), true);
        assert!(deleting.load().is_empty());
    }

    #[test]
    fn entries_with_empty_values_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.properties");
        fs::write(&path, "WEAPO1=\nWEAPO2=/tmp/pistol.json\n").unwrap();

        let store = PersistentStore::new(&path, false);
        let mapping = store.load();
        assert_eq!(mapping.len(), 1);
        assert!(mapping.contains_id("WEAPO2"));
    }

    #[test]
    fn save_failure_is_absorbed() {
        let dir = tempfile::tempdir().unwrap();
        // The parent of the store path does not exist.
        let store = PersistentStore::new(dir.path().join("no/such/dir/storage.properties"), false);
        assert!(!store.save(&Mapping::new()));
    }
}
