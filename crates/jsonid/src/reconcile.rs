//! One full merge of scanned directories into the id mapping.

use crate::config::LabelConfig;
use crate::mapping::Mapping;
use crate::prefix::derive_prefix;
use crate::scan::list_json_files;

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("label `{label}` has an empty directory path")]
    EmptyDirectoryPath { label: String },
}

/// Merge the current contents of every configured directory into
/// `mapping`, assigning a fresh identifier to each file not already
/// present as a value.
///
/// Labels are processed in config order; within a label, files are
/// processed in scan order with a numeric suffix counter starting at
/// 1. The counter probes past occupied identifiers and never moves
/// backward within the pass. A file that is already mapped keeps its
/// existing identifier and does not consume the probed suffix, so the
/// next genuinely new file receives the first free one.
///
/// A directory that scans empty is logged and skipped without touching
/// the mapping. A malformed config entry aborts the whole pass: a
/// partially reconciled mapping must not be published.
pub fn reconcile(
    config: &LabelConfig,
    mapping: &mut Mapping,
    prefix_length: usize,
) -> Result<(), ReconcileError> {
    for (label, directory) in config.iter() {
        if directory.as_os_str().is_empty() {
            return Err(ReconcileError::EmptyDirectoryPath {
                label: label.to_string(),
            });
        }

        let prefix = derive_prefix(label, prefix_length);
        let files = list_json_files(directory);
        if files.is_empty() {
            tracing::warn!(
                label,
                directory = %directory.display(),
                "directory contains no JSON files"
            );
            continue;
        }

        let mut counter: u64 = 1;
        for file in files {
            // The prefix is already uppercase, so the candidate is the
            // final identifier form.
            let id = loop {
                let candidate = format!("{prefix}{counter}");
                if !mapping.contains_id(&candidate) {
                    break candidate;
                }
                counter += 1;
            };

            if mapping.contains_file(&file) {
                continue;
            }

            tracing::debug!(id = %id, file = %file.display(), "assigned identifier");
            mapping.insert(&id, file);
            counter += 1;
        }
    }
    Ok(())
}
