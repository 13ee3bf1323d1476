//! Deep merge of TOML values with provenance tracking.
//!
//! The merge operates on raw [`toml::Value`] trees rather than deserialized
//! structs. This correctly handles "absent vs default" — a missing key in a
//! TOML table will not override the base layer.

use std::collections::HashMap;

/// Which configuration layer a value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLayer {
    /// Compiled-in defaults (`defaults.toml`).
    Defaults,
    /// System-wide configuration (`/etc/axiom/config.toml`).
    System,
    /// User-level configuration (`~/.axiom/config.toml`).
    User,
    /// Workspace-level configuration (`{workspace}/.axiom/config.toml`).
    Workspace,
    /// Environment variable fallback.
    Environment,
}

impl std::fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defaults => write!(f, "defaults"),
            Self::System => write!(f, "system (/etc/axiom/config.toml)"),
            Self::User => write!(f, "user (~/.axiom/config.toml)"),
            Self::Workspace => write!(f, "workspace (.axiom/config.toml)"),
            Self::Environment => write!(f, "environment variable"),
        }
    }
}

/// Tracks which layer set each field's value.
pub type FieldSources = HashMap<String, ConfigLayer>;

/// Deep-merge `overlay` into `base`, recording which layer set each leaf
/// field. `prefix` is the dotted path prefix (e.g. `"journal"`) and `layer`
/// identifies where the overlay came from.
pub fn deep_merge_tracking(
    base: &mut toml::Value,
    overlay: &toml::Value,
    prefix: &str,
    layer: &ConfigLayer,
    sources: &mut FieldSources,
) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };

                if let Some(base_val) = base_table.get_mut(key) {
                    if overlay_val.is_table() {
                        deep_merge_tracking(base_val, overlay_val, &path, layer, sources);
                    } else {
                        *base_val = overlay_val.clone();
                        sources.insert(path, layer.clone());
                    }
                } else {
                    base_table.insert(key.clone(), overlay_val.clone());
                    record_all_leaves(overlay_val, &path, layer, sources);
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
            sources.insert(prefix.to_owned(), layer.clone());
        },
    }
}

/// Walk a value tree and record all leaf paths with their source layer.
fn record_all_leaves(
    val: &toml::Value,
    prefix: &str,
    layer: &ConfigLayer,
    sources: &mut FieldSources,
) {
    if let toml::Value::Table(table) = val {
        for (key, child) in table {
            let path = format!("{prefix}.{key}");
            record_all_leaves(child, &path, layer, sources);
        }
    } else {
        sources.insert(prefix.to_owned(), layer.clone());
    }
}

/// Mark all leaf values in a tree with the `Defaults` layer.
pub fn record_defaults(val: &toml::Value, prefix: &str, sources: &mut FieldSources) {
    if let toml::Value::Table(table) = val {
        for (key, child) in table {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            record_defaults(child, &path, sources);
        }
    } else {
        sources.insert(prefix.to_owned(), ConfigLayer::Defaults);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_merge_overrides_scalar_leaf() {
        let mut base: toml::Value = toml::from_str("[journal]\nfsync_every_append = true\n").unwrap();
        let overlay: toml::Value =
            toml::from_str("[journal]\nfsync_every_append = false\n").unwrap();
        let mut sources = FieldSources::new();
        deep_merge_tracking(&mut base, &overlay, "", &ConfigLayer::User, &mut sources);
        assert_eq!(
            base.get("journal").unwrap().get("fsync_every_append"),
            Some(&toml::Value::Boolean(false))
        );
        assert_eq!(
            sources.get("journal.fsync_every_append"),
            Some(&ConfigLayer::User)
        );
    }

    #[test]
    fn deep_merge_leaves_unset_fields_untouched() {
        let mut base: toml::Value =
            toml::from_str("[scheduler]\ntick_interval_ms = 60000\nmax_concurrent_jobs = 5\n")
                .unwrap();
        let overlay: toml::Value = toml::from_str("[scheduler]\nmax_concurrent_jobs = 2\n").unwrap();
        let mut sources = FieldSources::new();
        deep_merge_tracking(
            &mut base,
            &overlay,
            "",
            &ConfigLayer::Workspace,
            &mut sources,
        );
        assert_eq!(
            base.get("scheduler").unwrap().get("tick_interval_ms"),
            Some(&toml::Value::Integer(60000))
        );
        assert_eq!(
            base.get("scheduler").unwrap().get("max_concurrent_jobs"),
            Some(&toml::Value::Integer(2))
        );
    }

    #[test]
    fn record_defaults_marks_every_leaf() {
        let val: toml::Value = toml::from_str("[journal]\nfsync_every_append = true\n").unwrap();
        let mut sources = FieldSources::new();
        record_defaults(&val, "", &mut sources);
        assert_eq!(
            sources.get("journal.fsync_every_append"),
            Some(&ConfigLayer::Defaults)
        );
    }
}
