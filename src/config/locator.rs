//! Configuration document discovery.
//!
//! Without an explicit path the document is searched for in three tiers, first
//! existing file wins:
//! 1. **Current** - `./gobackup.yml`
//! 2. **User** - `~/.gobackup/gobackup.yml`
//! 3. **System** - `/etc/gobackup/gobackup.yml`
//!
//! `gobackup.yaml` is accepted wherever `gobackup.yml` is.

use super::tree::ConfigTree;
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Base name of the configuration document.
pub const CONFIG_NAME: &str = "gobackup";

/// Extensions tried for [`CONFIG_NAME`], in order.
pub const CONFIG_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "GOBACKUP_CONFIG_PATH";

/// Search tier a document was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SearchTier {
    /// Path given explicitly (argument or environment)
    Explicit,
    /// Current working directory
    Current,
    /// Per-user directory (~/.gobackup/)
    User,
    /// System-wide directory (/etc/gobackup/)
    System,
}

impl std::fmt::Display for SearchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchTier::Explicit => write!(f, "explicit"),
            SearchTier::Current => write!(f, "current"),
            SearchTier::User => write!(f, "user"),
            SearchTier::System => write!(f, "system"),
        }
    }
}

/// A parsed document and where it came from.
#[derive(Debug, Clone)]
pub struct LocatedDocument {
    pub path: PathBuf,
    pub tier: SearchTier,
    pub tree: ConfigTree,
}

/// Finds and parses the configuration document.
#[derive(Debug, Clone)]
pub struct ConfigLocator {
    /// Explicit path from the environment, used when no argument is given
    pub env_path: Option<PathBuf>,
    /// Current-directory tier
    pub current_dir: Option<PathBuf>,
    /// User tier
    pub user_dir: Option<PathBuf>,
    /// System tier
    pub system_dir: Option<PathBuf>,
}

impl Default for ConfigLocator {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigLocator {
    /// Standard search locations, honouring `GOBACKUP_CONFIG_PATH`.
    pub fn discover() -> Self {
        let env_path = std::env::var_os(CONFIG_PATH_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let user_dir = dirs::home_dir().map(|h| h.join(".gobackup"));
        if user_dir.is_none() {
            debug!("No home directory, user tier disabled");
        }

        Self {
            env_path,
            current_dir: Some(PathBuf::from(".")),
            user_dir,
            system_dir: Some(PathBuf::from("/etc/gobackup")),
        }
    }

    /// Create a locator with explicit tier directories and no environment override.
    pub fn with_dirs(
        current_dir: Option<PathBuf>,
        user_dir: Option<PathBuf>,
        system_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            env_path: None,
            current_dir,
            user_dir,
            system_dir,
        }
    }

    /// Candidate files in search order.
    pub fn candidates(&self) -> Vec<(SearchTier, PathBuf)> {
        let tiers = [
            (SearchTier::Current, &self.current_dir),
            (SearchTier::User, &self.user_dir),
            (SearchTier::System, &self.system_dir),
        ];

        let mut candidates = Vec::new();
        for (tier, dir) in tiers {
            let Some(dir) = dir else {
                debug!("Skipping {} tier: no directory", tier);
                continue;
            };
            for ext in CONFIG_EXTENSIONS {
                candidates.push((tier, dir.join(format!("{CONFIG_NAME}.{ext}"))));
            }
        }
        candidates
    }

    /// Locate and parse the document.
    ///
    /// An explicit path (argument, then environment) is the only place looked at
    /// when present. Otherwise the first existing candidate is parsed; a malformed
    /// file does not fall through to later tiers.
    pub fn locate(&self, explicit_path: Option<&Path>) -> Result<LocatedDocument> {
        if let Some(path) = explicit_path.or(self.env_path.as_deref()) {
            if !path.is_file() {
                return Err(ConfigError::DocumentNotFound {
                    searched: vec![path.to_path_buf()],
                });
            }
            return Self::parse(path, SearchTier::Explicit);
        }

        let candidates = self.candidates();
        for (tier, path) in &candidates {
            if path.is_file() {
                debug!("Found config file in {} tier: {}", tier, path.display());
                return Self::parse(path, *tier);
            }
        }

        Err(ConfigError::DocumentNotFound {
            searched: candidates.into_iter().map(|(_, path)| path).collect(),
        })
    }

    fn parse(path: &Path, tier: SearchTier) -> Result<LocatedDocument> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::DocumentRead {
            path: path.to_path_buf(),
            source,
        })?;
        let tree = ConfigTree::from_yaml_str(&content).map_err(|source| {
            ConfigError::DocumentParse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Ok(LocatedDocument {
            path: path.to_path_buf(),
            tier,
            tree,
        })
    }
}
