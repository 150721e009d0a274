//! Read-only, path-addressed view over a parsed configuration document.
//!
//! Paths are dot-separated (`models.daily.compress_with`). A [`ConfigTree`]
//! is a cheap handle: the parsed document lives behind an `Arc` and every
//! sub-tree is the same document plus a longer path prefix.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
struct Document {
    values: Value,
    defaults: Value,
}

/// Scoped view onto a configuration document.
#[derive(Debug, Clone)]
pub struct ConfigTree {
    doc: Arc<Document>,
    prefix: Vec<String>,
}

impl ConfigTree {
    /// Wrap an already-parsed value as a root tree.
    pub fn from_value(values: Value) -> Self {
        Self {
            doc: Arc::new(Document {
                values,
                defaults: Value::Null,
            }),
            prefix: Vec::new(),
        }
    }

    /// Parse a YAML document into a root tree.
    ///
    /// Duplicate mapping keys are rejected by the YAML parser. `<<` merge keys
    /// are applied and scalar mapping keys (`2024:`, `true:`) become strings.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        // Blank or comment-only documents are an empty root
        if content
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#'))
        {
            return Ok(Self::from_value(Value::Null));
        }

        let mut yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
        yaml.apply_merge()?;
        Ok(Self::from_value(yaml_to_json(yaml)))
    }

    /// Absolute dot-path of this view (empty for the root).
    pub fn path(&self) -> String {
        self.prefix.join(".")
    }

    /// Raw value at `path`, falling back to a registered default.
    ///
    /// An explicit YAML `null` counts as absent.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let segments: Vec<&str> = self
            .prefix
            .iter()
            .map(String::as_str)
            .chain(split_path(path))
            .collect();

        lookup(&self.doc.values, &segments).or_else(|| lookup(&self.doc.defaults, &segments))
    }

    /// Whether `path` resolves to a value (document or default).
    pub fn is_set(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// String at `path`; empty when absent.
    ///
    /// Numbers and booleans are rendered as text, mappings and sequences give
    /// an empty string.
    pub fn get_string(&self, path: &str) -> String {
        match self.get(path) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Boolean at `path`, accepting `"true"`/`"false"` strings.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        match self.get(path)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Integer at `path`, accepting numeric strings.
    pub fn get_i64(&self, path: &str) -> Option<i64> {
        match self.get(path)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Direct child keys of the mapping at `path`; empty when absent or not a mapping.
    pub fn get_string_key_set(&self, path: &str) -> BTreeSet<String> {
        match self.get(path) {
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            _ => BTreeSet::new(),
        }
    }

    /// View rooted at `path`, or `None` unless `path` resolves to a mapping.
    pub fn sub_tree(&self, path: &str) -> Option<ConfigTree> {
        match self.get(path) {
            Some(Value::Object(_)) => Some(Self {
                doc: Arc::clone(&self.doc),
                prefix: self
                    .prefix
                    .iter()
                    .cloned()
                    .chain(split_path(path).map(str::to_string))
                    .collect(),
            }),
            _ => None,
        }
    }

    /// View rooted at the direct child `key`, taken as one segment even when
    /// it contains dots.
    pub fn child(&self, key: &str) -> Option<ConfigTree> {
        let segments: Vec<&str> = self
            .prefix
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(key))
            .collect();

        match lookup(&self.doc.values, &segments).or_else(|| lookup(&self.doc.defaults, &segments)) {
            Some(Value::Object(_)) => {
                let mut prefix = self.prefix.clone();
                prefix.push(key.to_string());
                Some(Self {
                    doc: Arc::clone(&self.doc),
                    prefix,
                })
            }
            _ => None,
        }
    }

    /// Register a fallback consulted only when `path` is otherwise absent.
    ///
    /// Views extracted before this call keep seeing the old defaults.
    pub fn set_default(&mut self, path: &str, value: impl Into<Value>) {
        let segments: Vec<String> = self
            .prefix
            .iter()
            .cloned()
            .chain(split_path(path).map(str::to_string))
            .collect();
        if segments.is_empty() {
            return;
        }

        let doc = Arc::make_mut(&mut self.doc);
        insert(&mut doc.defaults, &segments, value.into());
    }

    /// Deserialize the whole view into a typed backend configuration.
    pub fn deserialize<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        let value = self.get("").cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
    }
}

fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(key, value)| (key_to_string(key), yaml_to_json(value)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn key_to_string(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => s,
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => String::new(),
        Yaml::Tagged(tagged) => key_to_string(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|segment| !segment.is_empty())
}

fn lookup<'a>(mut node: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    for segment in segments {
        node = node.as_object()?.get(*segment)?;
    }
    match node {
        Value::Null => None,
        value => Some(value),
    }
}

fn insert(node: &mut Value, segments: &[String], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        let child = map.entry(first.clone()).or_insert(Value::Null);
        insert(child, rest, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn sample() -> ConfigTree {
        ConfigTree::from_yaml_str(
            r#"
models:
  daily:
    compress_with:
      type: gzip
      level: 5
    archive:
      includes: [/etc, /var/www]
    enabled: "true"
    empty:
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_get_string_absent_is_empty() {
        let tree = sample();
        assert_eq!(tree.get_string("models.daily.compress_with.type"), "gzip");
        assert_eq!(tree.get_string("models.daily.nope"), "");
        assert_eq!(tree.get_string("models.daily.empty"), "");
        assert!(!tree.is_set("models.daily.empty"));
    }

    #[test]
    fn test_get_string_renders_scalars() {
        let tree = sample();
        assert_eq!(tree.get_string("models.daily.compress_with.level"), "5");
        assert_eq!(tree.get_i64("models.daily.compress_with.level"), Some(5));
        assert_eq!(tree.get_bool("models.daily.enabled"), Some(true));
        // Sequences have no string form
        assert_eq!(tree.get_string("models.daily.archive.includes"), "");
    }

    #[test]
    fn test_key_set() {
        let tree = sample();
        let keys = tree.get_string_key_set("models.daily");
        assert!(keys.contains("compress_with"));
        assert!(keys.contains("archive"));
        assert!(tree.get_string_key_set("models.missing").is_empty());
        assert!(tree.get_string_key_set("models.daily.compress_with.type").is_empty());
    }

    #[test]
    fn test_sub_tree_is_scoped_view() {
        let tree = sample();
        let model = tree.sub_tree("models.daily").unwrap();
        assert_eq!(model.path(), "models.daily");
        assert_eq!(model.get_string("compress_with.type"), "gzip");

        let compress = model.sub_tree("compress_with").unwrap();
        assert_eq!(compress.path(), "models.daily.compress_with");
        assert_eq!(compress.get_string("level"), "5");

        // Parent is untouched and a second extraction is equivalent
        let again = tree.sub_tree("models.daily").unwrap();
        assert_eq!(again.get_string("compress_with.type"), "gzip");
        assert_eq!(tree.get_string("models.daily.compress_with.type"), "gzip");
    }

    #[test]
    fn test_sub_tree_requires_mapping() {
        let tree = sample();
        assert!(tree.sub_tree("models.daily.compress_with.type").is_none());
        assert!(tree.sub_tree("models.daily.archive.includes").is_none());
        assert!(tree.sub_tree("models.missing").is_none());
    }

    #[test]
    fn test_default_only_when_absent() {
        let mut tree = ConfigTree::from_yaml_str("workdir: /data/backup\n").unwrap();
        tree.set_default("workdir", "/tmp/gobackup");
        tree.set_default("retention.days", 7);
        assert_eq!(tree.get_string("workdir"), "/data/backup");
        assert_eq!(tree.get_i64("retention.days"), Some(7));

        let mut bare = ConfigTree::from_yaml_str("models: {}\n").unwrap();
        bare.set_default("workdir", "/tmp/gobackup");
        assert_eq!(bare.get_string("workdir"), "/tmp/gobackup");
    }

    #[test]
    fn test_deserialize_view() {
        #[derive(Deserialize)]
        struct Compress {
            #[serde(rename = "type")]
            kind: String,
            level: u32,
        }

        let tree = sample();
        let compress: Compress = tree
            .sub_tree("models.daily.compress_with")
            .unwrap()
            .deserialize()
            .unwrap();
        assert_eq!(compress.kind, "gzip");
        assert_eq!(compress.level, 5);
    }

    #[test]
    fn test_child_keeps_dotted_key_whole() {
        let tree = ConfigTree::from_yaml_str(
            "databases:\n  db.example.com:\n    type: mysql\n",
        )
        .unwrap();
        let group = tree.sub_tree("databases").unwrap();
        assert_eq!(
            group.get_string_key_set(""),
            BTreeSet::from(["db.example.com".to_string()])
        );

        let db = group.child("db.example.com").unwrap();
        assert_eq!(db.get_string("type"), "mysql");
        assert!(group.child("db").is_none());
        // Dotted paths still split
        assert!(group.sub_tree("db.example.com").is_none());
    }

    #[test]
    fn test_merge_keys_applied() {
        let tree = ConfigTree::from_yaml_str(
            r#"
shared:
  s3: &s3
    type: s3
    bucket: team-backups
storages:
  primary:
    <<: *s3
    path: /daily
  override:
    <<: *s3
    bucket: other
"#,
        )
        .unwrap();

        let primary = tree.sub_tree("storages.primary").unwrap();
        assert_eq!(primary.get_string("type"), "s3");
        assert_eq!(primary.get_string("bucket"), "team-backups");
        assert_eq!(
            primary.get_string_key_set(""),
            BTreeSet::from(["bucket".to_string(), "path".to_string(), "type".to_string()])
        );
        // Local keys win over merged ones
        assert_eq!(tree.get_string("storages.override.bucket"), "other");
    }

    #[test]
    fn test_scalar_keys_become_strings() {
        let tree = ConfigTree::from_yaml_str(
            "models:\n  2024:\n    databases:\n      1:\n        type: redis\n  true: {}\n",
        )
        .unwrap();
        assert_eq!(
            tree.get_string_key_set("models"),
            BTreeSet::from(["2024".to_string(), "true".to_string()])
        );
        assert_eq!(tree.get_string("models.2024.databases.1.type"), "redis");
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = ConfigTree::from_yaml_str("models:\n  a: {}\n  a: {}\n");
        assert!(result.is_err());
    }
}
