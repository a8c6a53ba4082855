//! Path joining: rendering accumulated path segments into a failure path.

use std::sync::Arc;

pub const SEPARATOR: &str = ".";

/// Path joining strategy. Receives the parent segments and the field a failure
/// is reported against; either may be empty.
pub type FieldJoinFn = Arc<dyn Fn(&[String], &str) -> String + Send + Sync>;

/// Appends `field` when non-empty and joins everything with `.`.
pub fn default_field_join(path: &[String], field: &str) -> String {
    join_with(path, field, SEPARATOR)
}

/// Same as [`default_field_join`] with another separator.
pub fn separator_join(separator: impl Into<String>) -> FieldJoinFn {
    let separator = separator.into();
    Arc::new(move |path: &[String], field: &str| join_with(path, field, &separator))
}

fn join_with(path: &[String], field: &str, separator: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain((!field.is_empty()).then_some(field))
        .collect::<Vec<_>>()
        .join(separator)
}
