//! Resolution of named sub-blocks into [`SubConfig`] records.

use super::tree::ConfigTree;
use super::types::SubConfig;
use std::collections::BTreeMap;
use tracing::warn;

/// Deprecated single-storage key.
pub const LEGACY_STORAGE_KEY: &str = "store_with";

/// Multi-storage group key replacing [`LEGACY_STORAGE_KEY`].
pub const STORAGES_KEY: &str = "storages";

/// What to do with a `store_with` block.
///
/// The deprecation warning is logged under both policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegacyStoragePolicy {
    /// Use `store_with` as the only storage, keyed `store_with`, when `storages`
    /// is absent. A present `storages` group (even an empty one) wins.
    #[default]
    FallbackWhenAbsent,
    /// Ignore `store_with` entirely; `storages` is the sole source.
    Discard,
}

/// Resolve the block at `path` under `parent`.
///
/// A missing block yields a `SubConfig` with no tree and an empty type.
pub fn resolve_sub_config(parent: &ConfigTree, path: &str, name: &str) -> SubConfig {
    sub_config_from(parent.sub_tree(path), name)
}

fn sub_config_from(tree: Option<ConfigTree>, name: &str) -> SubConfig {
    let kind = tree
        .as_ref()
        .map(|t| t.get_string("type"))
        .unwrap_or_default();
    SubConfig::new(name, kind, tree)
}

/// Resolve every child of the `group` mapping, keyed and named by its key.
///
/// Keys are taken whole, so `db.example.com` is one entry.
pub fn resolve_collection(parent: &ConfigTree, group: &str) -> BTreeMap<String, SubConfig> {
    let Some(group_tree) = parent.sub_tree(group) else {
        return BTreeMap::new();
    };

    group_tree
        .get_string_key_set("")
        .into_iter()
        .map(|key| {
            let sub = sub_config_from(group_tree.child(&key), &key);
            (key, sub)
        })
        .collect()
}

/// Resolve a model's storages, reconciling the deprecated `store_with` block.
pub fn resolve_storages(
    model: &ConfigTree,
    policy: LegacyStoragePolicy,
) -> BTreeMap<String, SubConfig> {
    let legacy = model.sub_tree(LEGACY_STORAGE_KEY);
    if legacy.is_some() {
        warn!(
            model = %model.path(),
            "[Deprecated] \"{}\" is deprecated now, please use \"{}\" which supports multiple storages.",
            LEGACY_STORAGE_KEY,
            STORAGES_KEY
        );
    }

    let mut storages = resolve_collection(model, STORAGES_KEY);

    if policy == LegacyStoragePolicy::FallbackWhenAbsent
        && !model.is_set(STORAGES_KEY)
        && let Some(tree) = legacy
    {
        let kind = tree.get_string("type");
        storages.insert(
            LEGACY_STORAGE_KEY.to_string(),
            SubConfig::new("", kind, Some(tree)),
        );
    }

    storages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(yaml: &str) -> ConfigTree {
        ConfigTree::from_yaml_str(yaml).unwrap()
    }

    #[test]
    fn test_sub_config_reads_type_and_keeps_tree() {
        let tree = model("compress_with:\n  type: gzip\n  level: 5\n");
        let sub = resolve_sub_config(&tree, "compress_with", "");
        assert_eq!(sub.kind(), "gzip");
        assert_eq!(sub.name(), "");
        assert_eq!(sub.tree().unwrap().get_string("level"), "5");
    }

    #[test]
    fn test_sub_config_missing_block() {
        let tree = model("compress_with:\n  type: gzip\n");
        let sub = resolve_sub_config(&tree, "encrypt_with", "");
        assert!(!sub.is_configured());
        assert_eq!(sub.kind(), "");
    }

    #[test]
    fn test_collection_keys_and_types() {
        let tree = model(
            r#"
databases:
  db1:
    type: mysql
    host: 10.0.0.1
  db2:
    type: postgres
"#,
        );
        let dbs = resolve_collection(&tree, "databases");
        assert_eq!(dbs.keys().collect::<Vec<_>>(), vec!["db1", "db2"]);
        assert_eq!(dbs["db1"].kind(), "mysql");
        assert_eq!(dbs["db1"].name(), "db1");
        assert_eq!(dbs["db1"].tree().unwrap().get_string("host"), "10.0.0.1");
        assert_eq!(dbs["db2"].kind(), "postgres");
    }

    #[test]
    fn test_collection_dotted_keys() {
        let tree = model(
            r#"
storages:
  backup.example.com:
    type: scp
    host: backup.example.com
databases:
  db.example.com:
    type: mysql
"#,
        );
        let dbs = resolve_collection(&tree, "databases");
        assert_eq!(dbs.len(), 1);
        let db = &dbs["db.example.com"];
        assert_eq!(db.name(), "db.example.com");
        assert_eq!(db.kind(), "mysql");
        assert!(db.is_configured());

        let storages = resolve_storages(&tree, LegacyStoragePolicy::default());
        assert_eq!(storages["backup.example.com"].kind(), "scp");
    }

    #[test]
    fn test_collection_absent_group() {
        let tree = model("compress_with:\n  type: gzip\n");
        assert!(resolve_collection(&tree, "databases").is_empty());
    }

    #[test]
    fn test_collection_entry_without_mapping() {
        let tree = model("databases:\n  db1: mysql\n");
        let dbs = resolve_collection(&tree, "databases");
        assert!(!dbs["db1"].is_configured());
        assert_eq!(dbs["db1"].kind(), "");
    }

    #[test]
    fn test_legacy_fallback_when_storages_absent() {
        let tree = model("store_with:\n  type: s3\n  bucket: backups\n");
        let storages = resolve_storages(&tree, LegacyStoragePolicy::FallbackWhenAbsent);
        assert_eq!(storages.len(), 1);
        let legacy = &storages["store_with"];
        assert_eq!(legacy.kind(), "s3");
        assert_eq!(legacy.name(), "");
        assert_eq!(legacy.tree().unwrap().get_string("bucket"), "backups");
    }

    #[test]
    fn test_legacy_discarded_under_discard_policy() {
        let tree = model("store_with:\n  type: s3\n");
        let storages = resolve_storages(&tree, LegacyStoragePolicy::Discard);
        assert!(storages.is_empty());
    }

    #[test]
    fn test_storages_group_wins_over_legacy() {
        let tree = model(
            r#"
store_with:
  type: s3
storages:
  local:
    type: local
    path: /backups
"#,
        );
        let storages = resolve_storages(&tree, LegacyStoragePolicy::FallbackWhenAbsent);
        assert_eq!(storages.len(), 1);
        assert_eq!(storages["local"].kind(), "local");
        assert!(!storages.contains_key("store_with"));
    }

    #[test]
    fn test_empty_storages_group_still_wins() {
        let tree = model("store_with:\n  type: s3\nstorages: {}\n");
        let storages = resolve_storages(&tree, LegacyStoragePolicy::FallbackWhenAbsent);
        assert!(storages.is_empty());
    }
}
