use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::config::{Config, ConfigError};
use crate::error::Errors;
use crate::naming::{self, FieldInfo, FieldNameFn};
use crate::path::{self, FieldJoinFn};
use crate::walk::{Shape, Walk};

static DEFAULT: Lazy<Validator> = Lazy::new(Validator::new);

/// Validates `value` with the default [`Validator`].
pub fn validate<T: Walk + ?Sized>(value: &T) -> Result<(), Errors> {
    DEFAULT.validate(value)
}

/// Walks values depth-first, running every [`crate::Validate`] contract it
/// finds and collecting the failures under their paths.
///
/// A `Validator` holds no state between calls and can be shared across threads.
#[derive(Clone)]
pub struct Validator {
    field_name: FieldNameFn,
    field_join: FieldJoinFn,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self {
            field_name: Arc::new(naming::default_field_name),
            field_join: Arc::new(path::default_field_join),
        }
    }

    /// Builds a validator from a loaded [`Config`], after validating it.
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        validate(cfg)?;
        Ok(Self {
            field_name: naming::by_conventions(cfg.naming.conventions.clone()),
            field_join: path::separator_join(cfg.path.separator.clone()),
        })
    }

    /// Replaces the field naming strategy. Returning an empty string for a field
    /// skips it and everything nested below it.
    pub fn set_field_name<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&FieldInfo) -> String + Send + Sync + 'static,
    {
        self.field_name = Arc::new(f);
        self
    }

    /// Replaces the path joining strategy.
    pub fn set_field_join<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&[String], &str) -> String + Send + Sync + 'static,
    {
        self.field_join = Arc::new(f);
        self
    }

    pub fn with_field_name<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldInfo) -> String + Send + Sync + 'static,
    {
        self.set_field_name(f);
        self
    }

    pub fn with_field_join<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String], &str) -> String + Send + Sync + 'static,
    {
        self.set_field_join(f);
        self
    }

    /// Validates `value` and everything nested in it.
    ///
    /// Returns `Ok(())` when no contract reported a failure. Paths are relative
    /// to `value`, which itself never contributes a segment.
    pub fn validate<T: Walk + ?Sized>(&self, value: &T) -> Result<(), Errors> {
        let mut path = Vec::new();
        let mut errs = Errors::new();
        self.visit(&mut path, value, &mut errs);
        debug!(failures = errs.len(), "validation finished");
        errs.into_result()
    }

    fn visit<T: Walk + ?Sized>(&self, path: &mut Vec<String>, node: &T, errs: &mut Errors) {
        let shape = node.shape();
        if let Shape::Pointer(None) = shape {
            return;
        }

        if let Some(Err(reported)) = node.contract().map(|c| c.validate()) {
            for failure in reported {
                let field = match &shape {
                    Shape::Record(record) if !failure.path.is_empty() => record
                        .field_by_name(&failure.path)
                        .map(|field| (self.field_name)(field.info)),
                    _ => None,
                };
                let field = field.as_deref().unwrap_or(&failure.path);
                let failure = failure.rehome((self.field_join)(path, field));
                trace!(path = %failure.path, "contract reported failure");
                errs.push(failure);
            }
        }

        match shape {
            Shape::Scalar | Shape::Pointer(None) => {}
            // Followed without adding a segment.
            Shape::Pointer(Some(target)) => self.visit(path, target, errs),
            Shape::Sequence(items) | Shape::Array(items) => {
                for (index, item) in items.enumerate() {
                    self.descend(path, index.to_string(), item, errs);
                }
            }
            Shape::Map(entries) => {
                for (key, value) in entries {
                    self.descend(path, key, value, errs);
                }
            }
            Shape::Record(record) => {
                for field in record.fields() {
                    if !field.info.visible {
                        continue;
                    }
                    let name = (self.field_name)(field.info);
                    if name.is_empty() {
                        continue;
                    }
                    if let Some(value) = field.value {
                        self.descend(path, name, value, errs);
                    }
                }
            }
        }
    }

    fn descend(&self, path: &mut Vec<String>, segment: String, node: &dyn Walk, errs: &mut Errors) {
        path.push(segment);
        self.visit(path, node, errs);
        path.pop();
    }
}
