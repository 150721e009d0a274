//! Configuration resolution engine.
//!
//! Turns a gobackup YAML document into strongly structured backup models:
//! 1. **Locate** - explicit path, `GOBACKUP_CONFIG_PATH`, then `./`, `~/.gobackup/`, `/etc/gobackup/`
//! 2. **Parse** - into a shared, path-addressed [`ConfigTree`]
//! 3. **Resolve** - every key under `models` into a [`ModelConfig`]
//!
//! ## Document layout
//! ```yaml
//! workdir: /var/tmp/gobackup   # optional
//! models:
//!   daily:
//!     compress_with: { type: tgz }
//!     encrypt_with: { type: openssl, password: secret }
//!     archive: { includes: [/etc/nginx] }
//!     databases:
//!       app: { type: mysql, host: localhost }
//!     storages:
//!       remote: { type: scp, host: backup.example.com }
//! ```
//!
//! The singular `store_with` block is deprecated in favour of `storages`; see
//! [`LegacyStoragePolicy`].

mod collection;
mod locator;
mod model;
mod state;
mod tree;
mod types;

pub use collection::{
    LEGACY_STORAGE_KEY, LegacyStoragePolicy, STORAGES_KEY, resolve_collection, resolve_storages,
    resolve_sub_config,
};
pub use locator::{
    CONFIG_EXTENSIONS, CONFIG_NAME, CONFIG_PATH_ENV, ConfigLocator, LocatedDocument, SearchTier,
};
pub use model::{ModelResolver, run_stamp};
pub use state::{DEFAULT_WORKDIR_NAME, ResolutionState, ResolveOptions, SharedState};
pub use tree::ConfigTree;
pub use types::{ModelConfig, SubConfig};
