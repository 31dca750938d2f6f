//! Stable, human-readable identifiers for JSON files.
//!
//! `jsonid` scans configured directories for `.json` files, assigns
//! each file an identifier made of a fixed-length label prefix and a
//! numeric suffix (`WEAPO1`, `WEAPO2`, ...), and persists the mapping
//! across runs in a flat `key=value` file. Rebuilding merges newly
//! discovered files into the existing mapping without disturbing
//! identifiers that are already assigned.
//!
//! ```no_run
//! use jsonid::{JsonIdMapper, LabelConfig, MapperOptions};
//!
//! let config = LabelConfig::load("filepath.properties")?;
//! let mapper = JsonIdMapper::new(
//!     config,
//!     MapperOptions {
//!         storage_path: Some("storage.properties".into()),
//!         ..MapperOptions::default()
//!     },
//! )?;
//!
//! if let Some(file) = mapper.file_for_id("weapo1") {
//!     println!("{}", file.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

mod config;
mod mapping;
mod prefix;
mod reconcile;
mod scan;
mod store;

pub use config::{ConfigError, LabelConfig};
pub use mapping::Mapping;
pub use prefix::{derive_prefix, FILLER};
pub use reconcile::{reconcile, ReconcileError};
pub use scan::list_json_files;
pub use store::PersistentStore;

/// Prefix length used when [`MapperOptions`] does not override it.
pub const DEFAULT_PREFIX_LENGTH: usize = 5;

/// Options for building a [`JsonIdMapper`].
#[derive(Clone, Debug)]
pub struct MapperOptions {
    /// Where to persist the mapping. `None` keeps it in memory only.
    pub storage_path: Option<PathBuf>,

    /// Drop persisted entries whose file no longer exists on disk.
    ///
    /// Dropping an entry frees its identifier for reassignment to a
    /// different file on a later run, which systems holding on to old
    /// identifiers may not expect.
    pub delete_missing_files: bool,

    /// Length labels are truncated or `#`-padded to when deriving
    /// identifier prefixes.
    pub prefix_length: usize,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            storage_path: None,
            delete_missing_files: false,
            prefix_length: DEFAULT_PREFIX_LENGTH,
        }
    }
}

/// Owns the resolved identifier-to-file mapping and answers read-only
/// queries over it.
///
/// Construction runs one full build: load the persisted mapping (if a
/// storage path is configured), reconcile it against the current
/// directory contents, and persist the result. The mapping is rebuilt
/// in full by [`JsonIdMapper::update`]; there is no incremental API.
///
/// Single-threaded by design: a host embedding this in a concurrent
/// setting must serialize `update` calls and only read after a rebuild
/// has returned.
#[derive(Debug)]
pub struct JsonIdMapper {
    config: LabelConfig,
    store: Option<PersistentStore>,
    mapping: Mapping,
    prefix_length: usize,
}

impl JsonIdMapper {
    /// Build the mapper. On a reconcile error no mapper is returned
    /// and nothing is persisted.
    pub fn new(config: LabelConfig, options: MapperOptions) -> Result<Self, ReconcileError> {
        let store = options
            .storage_path
            .map(|path| PersistentStore::new(path, options.delete_missing_files));
        let mut mapping = store.as_ref().map(PersistentStore::load).unwrap_or_default();

        reconcile(&config, &mut mapping, options.prefix_length)?;
        tracing::info!(entries = mapping.len(), "mapping built");

        let mapper = Self {
            config,
            store,
            mapping,
            prefix_length: options.prefix_length,
        };
        mapper.persist();
        Ok(mapper)
    }

    /// Rebuild the mapping against the current directory contents and
    /// persist the result.
    ///
    /// The persisted file is not re-read: the in-memory mapping is
    /// authoritative for the process lifetime. On error the previous
    /// mapping remains in effect.
    pub fn update(&mut self) -> Result<(), ReconcileError> {
        let mut rebuilt = self.mapping.clone();
        reconcile(&self.config, &mut rebuilt, self.prefix_length)?;
        self.mapping = rebuilt;
        self.persist();
        Ok(())
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            store.save(&self.mapping);
        }
    }

    /// The resolved mapping, in ascending identifier order.
    #[must_use]
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// The derived prefix for each configured label, in config order.
    #[must_use]
    pub fn prefixes(&self) -> Vec<String> {
        self.config
            .iter()
            .map(|(label, _)| derive_prefix(label, self.prefix_length))
            .collect()
    }

    /// The file addressed by `id` (case-insensitive).
    #[must_use]
    pub fn file_for_id(&self, id: &str) -> Option<&Path> {
        self.mapping.get(id)
    }

    /// All entries whose identifier starts with `prefix`
    /// (case-insensitive), in identifier order.
    #[must_use]
    pub fn files_with_prefix(&self, prefix: &str) -> Vec<(&str, &Path)> {
        let prefix = prefix.to_uppercase();
        self.mapping
            .iter()
            .filter(|(id, _)| id.starts_with(&prefix))
            .collect()
    }

    /// The first entry whose file name contains `name`
    /// (case-insensitive).
    #[must_use]
    pub fn find_file_by_name(&self, name: &str) -> Option<(&str, &Path)> {
        let needle = name.to_lowercase();
        self.mapping.iter().find(|(_, file)| {
            file_name(file).is_some_and(|n| n.to_lowercase().contains(&needle))
        })
    }

    /// The identifier of the file whose extension-stripped name equals
    /// `stem` (case-insensitive).
    #[must_use]
    pub fn id_for_file_stem(&self, stem: &str) -> Option<&str> {
        self.mapping
            .iter()
            .find(|(_, file)| {
                file.file_stem()
                    .and_then(OsStr::to_str)
                    .is_some_and(|s| s.eq_ignore_ascii_case(stem))
            })
            .map(|(id, _)| id)
    }
}

fn file_name(file: &Path) -> Option<&str> {
    file.file_name().and_then(OsStr::to_str)
}
