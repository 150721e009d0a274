//! Resolution entry point and the resulting process-wide model set.

use super::collection::LegacyStoragePolicy;
use super::locator::ConfigLocator;
use super::model::ModelResolver;
use super::tree::ConfigTree;
use super::types::ModelConfig;
use crate::error::{ConfigError, Result};
use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Directory name under the system temp dir used when `workdir` is unset.
pub const DEFAULT_WORKDIR_NAME: &str = "gobackup";

/// Knobs for a resolution pass.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Handling of the deprecated `store_with` block.
    pub legacy_storage: LegacyStoragePolicy,
    /// Fallback for `workdir`.
    pub default_workdir: PathBuf,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            legacy_storage: LegacyStoragePolicy::default(),
            default_workdir: std::env::temp_dir().join(DEFAULT_WORKDIR_NAME),
        }
    }
}

/// Outcome of one resolution pass.
///
/// Immutable once built. A reload builds a new state; see [`SharedState`].
#[derive(Debug, Clone, Default)]
pub struct ResolutionState {
    found: bool,
    source: Option<PathBuf>,
    models: Vec<ModelConfig>,
}

impl ResolutionState {
    /// Locate the document in the standard places and resolve it.
    pub fn init(explicit_path: Option<&Path>) -> Result<Self> {
        Self::init_with(
            &ConfigLocator::discover(),
            explicit_path,
            &ResolveOptions::default(),
        )
    }

    /// Locate the document with `locator` and resolve it.
    ///
    /// A missing or malformed document is logged and yields a state that is not
    /// found. A document without models, or a model block that cannot be read,
    /// is an error.
    pub fn init_with(
        locator: &ConfigLocator,
        explicit_path: Option<&Path>,
        options: &ResolveOptions,
    ) -> Result<Self> {
        let doc = match locator.locate(explicit_path) {
            Ok(doc) => doc,
            Err(e) => {
                error!("Load gobackup config failed: {}", e);
                return Ok(Self::default());
            }
        };

        info!("Using config file ({} tier): {}", doc.tier, doc.path.display());
        Self::resolve(doc.tree, Some(doc.path), options)
    }

    /// Resolve an already-parsed document.
    pub fn resolve(
        mut tree: ConfigTree,
        source: Option<PathBuf>,
        options: &ResolveOptions,
    ) -> Result<Self> {
        tree.set_default(
            "workdir",
            options.default_workdir.to_string_lossy().into_owned(),
        );

        let resolver = ModelResolver::new(tree.get_string("workdir"), options.legacy_storage);
        let models = tree
            .get_string_key_set("models")
            .iter()
            .map(|key| resolver.resolve(&tree, key))
            .collect::<Result<Vec<_>>>()?;

        if models.is_empty() {
            return Err(ConfigError::NoModelsResolved { path: source });
        }

        info!("Resolved {} model(s)", models.len());
        Ok(Self {
            found: true,
            source,
            models,
        })
    }

    /// Whether a document was found and resolved.
    pub fn is_found(&self) -> bool {
        self.found
    }

    /// Path of the resolved document.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn models(&self) -> &[ModelConfig] {
        &self.models
    }

    pub fn model_names(&self) -> Vec<&str> {
        self.models.iter().map(ModelConfig::name).collect()
    }

    /// First model called `name`.
    pub fn model_by_name(&self, name: &str) -> Option<&ModelConfig> {
        self.models.iter().find(|m| m.name() == name)
    }
}

/// Read-mostly holder for the current [`ResolutionState`].
///
/// Readers take `Arc` snapshots, so models they hold stay valid when a reload
/// swaps in a new state.
pub struct SharedState {
    current: ArcSwap<ResolutionState>,
}

impl SharedState {
    pub fn new(state: ResolutionState) -> Self {
        Self {
            current: ArcSwap::from_pointee(state),
        }
    }

    /// Snapshot of the current state.
    pub fn load(&self) -> Arc<ResolutionState> {
        self.current.load_full()
    }

    /// Swap in `state`, returning the previous one.
    pub fn replace(&self, state: ResolutionState) -> Arc<ResolutionState> {
        self.current.swap(Arc::new(state))
    }

    /// Re-resolve and swap in the result.
    ///
    /// Returns `Ok(false)` and keeps the current state when no document is found.
    /// Fatal resolution errors also keep the current state.
    pub fn reload(
        &self,
        locator: &ConfigLocator,
        explicit_path: Option<&Path>,
        options: &ResolveOptions,
    ) -> Result<bool> {
        let state = match ResolutionState::init_with(locator, explicit_path, options) {
            Ok(state) => state,
            Err(e) => {
                warn!("Config reload failed: {}. Keeping current config.", e);
                return Err(e);
            }
        };

        if !state.is_found() {
            warn!("Config reload found no document. Keeping current config.");
            return Ok(false);
        }

        self.replace(state);
        Ok(true)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new(ResolutionState::default())
    }
}
