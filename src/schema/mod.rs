//! Schemas name the fields of a page representation and the transformer for each one.
//!
//! A transformer may be omitted, in which case `string` is used, so these two specs are equivalent:
//!
//! ```
//! use content_api::SchemaSpec;
//!
//! let a = SchemaSpec::new().field("title").field("description").with("averageRating", "float");
//! let b = SchemaSpec::new()
//!     .with("title", "string")
//!     .with("description", "string")
//!     .with("averageRating", "float");
//! # assert_eq!(a.len(), b.len());
//! ```
//!
//! Transformer names are looked up when a field is transformed, not when the spec is built,
//! so transformers registered later are still honoured.

pub mod registry;
pub mod spec;

pub use registry::{Transformer, TransformerRegistry};
pub use spec::{Arg, SchemaEntry, SchemaSpec, TransformerRef, TransformerSpec};

use crate::content::FieldValue;
use crate::error::TransformError;
use serde_json::Value;

const DEFAULT_TRANSFORMER: &str = "string";

/// A spec read against a registry.
#[derive(Clone, Copy, Debug)]
pub struct Schema<'a> {
    spec: &'a SchemaSpec,
    registry: &'a TransformerRegistry,
}

impl<'a> Schema<'a> {
    pub fn new(spec: &'a SchemaSpec, registry: &'a TransformerRegistry) -> Self {
        Schema { spec, registry }
    }

    /// Field names in declaration order, bare and keyed alike.
    pub fn fields(&self) -> Vec<&'a str> {
        self.spec.entries().iter().map(|e| e.field.as_str()).collect()
    }

    /// Resolves the transformer for `field` and binds its extra arguments.
    pub fn transformer(&self, field: &str) -> Result<BoundTransformer<'a>, TransformError> {
        let entry = self
            .spec
            .entry(field)
            .ok_or_else(|| TransformError::UnknownField(field.to_string()))?;
        let Some(spec) = &entry.transformer else {
            return self.named(field, DEFAULT_TRANSFORMER, &[]);
        };
        match &spec.head {
            TransformerRef::Func(f) => Ok(BoundTransformer {
                transformer: f.clone(),
                args: &spec.args,
                registry: self.registry,
            }),
            TransformerRef::Named(name) => self.named(field, name, &spec.args),
        }
    }

    fn named(
        &self,
        field: &str,
        name: &str,
        args: &'a [Arg],
    ) -> Result<BoundTransformer<'a>, TransformError> {
        let transformer = self
            .registry
            .get(name)
            .cloned()
            .ok_or_else(|| TransformError::UnknownTransformer {
                field: field.to_string(),
                name: name.to_string(),
            })?;
        Ok(BoundTransformer {
            transformer,
            args,
            registry: self.registry,
        })
    }
}

/// A resolved transformer with its extra arguments bound after the field value.
#[derive(Clone, Debug)]
pub struct BoundTransformer<'a> {
    transformer: Transformer,
    args: &'a [Arg],
    registry: &'a TransformerRegistry,
}

impl BoundTransformer<'_> {
    pub fn apply(&self, value: &dyn FieldValue) -> Result<Value, TransformError> {
        self.transformer.call(value, self.args, self.registry)
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }
}
