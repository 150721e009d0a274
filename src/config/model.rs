//! Per-model resolution.

use super::collection::{LegacyStoragePolicy, resolve_collection, resolve_storages, resolve_sub_config};
use super::tree::ConfigTree;
use super::types::ModelConfig;
use crate::error::{ConfigError, Result};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

static LAST_RUN_STAMP: AtomicI64 = AtomicI64::new(0);

/// Nanosecond UNIX timestamp, strictly increasing within the process.
///
/// Two calls never return the same value even when the clock does not advance
/// between them.
pub fn run_stamp() -> i64 {
    let now = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let previous = LAST_RUN_STAMP
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now.max(previous + 1)
}

/// Builds [`ModelConfig`]s from the `models` group of a root tree.
#[derive(Debug, Clone)]
pub struct ModelResolver {
    workdir: PathBuf,
    legacy_storage: LegacyStoragePolicy,
}

impl ModelResolver {
    pub fn new(workdir: impl Into<PathBuf>, legacy_storage: LegacyStoragePolicy) -> Self {
        Self {
            workdir: workdir.into(),
            legacy_storage,
        }
    }

    /// Resolve `models.<key>` of `root`.
    pub fn resolve(&self, root: &ConfigTree, key: &str) -> Result<ModelConfig> {
        let temp_path = self.workdir.join(run_stamp().to_string());
        let dump_path = temp_path.join(key);

        let tree = root
            .sub_tree("models")
            .and_then(|models| models.child(key))
            .ok_or_else(|| ConfigError::ModelTreeMissing {
                model: key.to_string(),
            })?;

        let compress_with = resolve_sub_config(&tree, "compress_with", "");
        let encrypt_with = resolve_sub_config(&tree, "encrypt_with", "");
        let archive = tree.sub_tree("archive");
        let databases = resolve_collection(&tree, "databases");
        let storages = resolve_storages(&tree, self.legacy_storage);

        debug!(
            model = %key,
            databases = databases.len(),
            storages = storages.len(),
            "Resolved model into {}",
            temp_path.display()
        );

        Ok(ModelConfig {
            name: key.to_string(),
            temp_path,
            dump_path,
            compress_with,
            encrypt_with,
            archive,
            databases,
            storages,
            tree,
        })
    }
}
