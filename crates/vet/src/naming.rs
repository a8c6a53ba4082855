//! Field naming: mapping a record field to the name used in failure paths.
//!
//! Each field may carry a raw tag value for the `json`, `yaml` and `form`
//! conventions. The default strategy takes the first non-empty name in that
//! order, where a name is the part of the tag before any `,` option suffix. A
//! winning name of `"-"` excludes the field from traversal; no tag at all means
//! the declared field name is used.

use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tag value that excludes a field.
pub const SKIP_MARKER: &str = "-";

/// Field naming strategy. An empty result skips the field and everything below it.
pub type FieldNameFn = Arc<dyn Fn(&FieldInfo) -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    Json,
    Yaml,
    Form,
}

impl Convention {
    /// Priority order used by [`default_field_name`].
    pub const DEFAULT_ORDER: [Convention; 3] = [Convention::Json, Convention::Yaml, Convention::Form];

    pub fn as_str(self) -> &'static str {
        match self {
            Convention::Json => "json",
            Convention::Yaml => "yaml",
            Convention::Form => "form",
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw tag values attached to a field, options included (`"name,omitempty"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tags {
    pub json: Option<&'static str>,
    pub yaml: Option<&'static str>,
    pub form: Option<&'static str>,
}

impl Tags {
    pub const NONE: Tags = Tags {
        json: None,
        yaml: None,
        form: None,
    };

    pub const fn new(
        json: Option<&'static str>,
        yaml: Option<&'static str>,
        form: Option<&'static str>,
    ) -> Self {
        Self { json, yaml, form }
    }

    pub fn get(&self, convention: Convention) -> Option<&'static str> {
        match convention {
            Convention::Json => self.json,
            Convention::Yaml => self.yaml,
            Convention::Form => self.form,
        }
    }
}

/// Static description of a record field, emitted by `#[derive(Walk)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Declared Rust name; tuple fields use their index.
    pub name: &'static str,
    /// False for fields private to their module.
    pub visible: bool,
    pub tags: Tags,
}

impl FieldInfo {
    pub const fn new(name: &'static str, visible: bool, tags: Tags) -> Self {
        Self {
            name,
            visible,
            tags,
        }
    }
}

/// The default field naming strategy: `json`, then `yaml`, then `form`.
pub fn default_field_name(field: &FieldInfo) -> String {
    resolve(field, &Convention::DEFAULT_ORDER)
}

/// Naming strategy consulting `order` instead of the default priority.
pub fn by_conventions(order: Vec<Convention>) -> FieldNameFn {
    Arc::new(move |field: &FieldInfo| resolve(field, &order))
}

fn resolve(field: &FieldInfo, order: &[Convention]) -> String {
    let tagged = order
        .iter()
        .filter_map(|convention| field.tags.get(*convention))
        .map(tag_name)
        .find(|name| !name.is_empty());

    match tagged {
        Some(SKIP_MARKER) => String::new(),
        Some(name) => name.to_string(),
        None => field.name.to_string(),
    }
}

fn tag_name(raw: &str) -> &str {
    raw.split_once(',').map_or(raw, |(name, _)| name)
}
