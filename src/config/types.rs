//! Resolved configuration records.
//!
//! Fixed fields (`name`, `type`, paths) are surfaced through typed accessors;
//! backend-specific settings stay reachable through the scoped [`ConfigTree`].

use super::tree::ConfigTree;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Named, typed handle onto one block of the document.
///
/// Used for compression and encryption strategies, database sources, and
/// storage destinations alike.
#[derive(Debug, Clone)]
pub struct SubConfig {
    name: String,
    kind: String,
    tree: Option<ConfigTree>,
}

impl SubConfig {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, tree: Option<ConfigTree>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            tree,
        }
    }

    /// Block name; empty for anonymous or legacy entries.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The block's `type`, read once at resolution time. Empty when the block is absent.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Scoped view of the block, `None` when the document omits it.
    pub fn tree(&self) -> Option<&ConfigTree> {
        self.tree.as_ref()
    }

    /// Whether the document declared this block.
    pub fn is_configured(&self) -> bool {
        self.tree.is_some()
    }
}

/// One fully resolved backup model.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub(crate) name: String,
    pub(crate) temp_path: PathBuf,
    pub(crate) dump_path: PathBuf,
    pub(crate) compress_with: SubConfig,
    pub(crate) encrypt_with: SubConfig,
    pub(crate) archive: Option<ConfigTree>,
    pub(crate) databases: BTreeMap<String, SubConfig>,
    pub(crate) storages: BTreeMap<String, SubConfig>,
    pub(crate) tree: ConfigTree,
}

impl ModelConfig {
    /// Key of this model under `models`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scratch directory for this run, unique within the process.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Dump directory, always `temp_path/name`.
    pub fn dump_path(&self) -> &Path {
        &self.dump_path
    }

    pub fn compress_with(&self) -> &SubConfig {
        &self.compress_with
    }

    pub fn encrypt_with(&self) -> &SubConfig {
        &self.encrypt_with
    }

    /// Archive block, if archiving is configured.
    pub fn archive(&self) -> Option<&ConfigTree> {
        self.archive.as_ref()
    }

    pub fn databases(&self) -> &BTreeMap<String, SubConfig> {
        &self.databases
    }

    pub fn storages(&self) -> &BTreeMap<String, SubConfig> {
        &self.storages
    }

    /// The model's own block, for fields not surfaced above.
    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// Find a database by its `name` field rather than its map key.
    pub fn database_by_name(&self, name: &str) -> Option<&SubConfig> {
        self.databases.values().find(|db| db.name() == name)
    }

    /// Find a storage by its key under `storages`.
    pub fn storage(&self, key: &str) -> Option<&SubConfig> {
        self.storages.get(key)
    }
}
