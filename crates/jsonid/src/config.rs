//! The label-to-directory configuration.

use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read label config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Ordered `label -> directory` pairs.
///
/// Loaded once at startup and read-only afterwards. Iteration order is
/// the insertion (file) order, which fixes the order labels are
/// reconciled in.
#[derive(Clone, Debug, Default)]
pub struct LabelConfig {
    labels: IndexMap<String, PathBuf>,
}

impl LabelConfig {
    /// Read a flat `label=directory` file.
    ///
    /// An unreadable config is a startup failure: silently treating it
    /// as empty would make every reconciliation a no-op.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = jsonid_properties::parse(&text);
        tracing::info!(
            path = %path.display(),
            labels = table.len(),
            "loaded label config"
        );
        Ok(Self::from_pairs(
            table
                .iter()
                .map(|(label, dir)| (label.to_string(), PathBuf::from(dir))),
        ))
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, PathBuf)>) -> Self {
        Self {
            labels: pairs.into_iter().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.labels
            .iter()
            .map(|(label, dir)| (label.as_str(), dir.as_path()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_preserves_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filepath.properties");
        std::fs::write(&path, "weapons=/data/weapons\narmor=/data/armor\n").unwrap();

        let config = LabelConfig::load(&path).unwrap();
        let labels: Vec<_> = config.iter().map(|(label, _)| label.to_string()).collect();
        assert_eq!(labels, vec!["weapons", "armor"]);
        assert_eq!(config.len(), 2);
    }

    #[test]
    fn load_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LabelConfig::load(dir.path().join("nope.properties")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
