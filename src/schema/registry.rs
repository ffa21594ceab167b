//! Transformer registry: named functions turning a raw field value into JSON.
//!
//! Every registry starts with the built-ins `string`, `integer`, `float`, `split`,
//! `page` and `collection`. Hosts may add or overwrite entries at setup time.

use crate::content::{FieldValue, ListFormat};
use crate::error::TransformError;
use crate::schema::spec::{Arg, SchemaSpec};
use crate::serializer::PageSerializer;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type TransformFn =
    dyn Fn(&dyn FieldValue, &[Arg], &TransformerRegistry) -> Result<Value, TransformError> + Send + Sync;

/// A transformer function: `(value, extra args, registry) -> JSON`.
///
/// The registry is passed through so nested transformers (`page`, `collection`)
/// resolve against the same table as the outer schema.
#[derive(Clone)]
pub struct Transformer(Arc<TransformFn>);

impl Transformer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn FieldValue, &[Arg], &TransformerRegistry) -> Result<Value, TransformError>
            + Send
            + Sync
            + 'static,
    {
        Transformer(Arc::new(f))
    }

    /// Wraps a function that only looks at the field value.
    pub fn from_value_fn<F>(f: F) -> Self
    where
        F: Fn(&dyn FieldValue) -> Value + Send + Sync + 'static,
    {
        Transformer::new(move |value, _args, _registry| Ok(f(value)))
    }

    pub fn call(
        &self,
        value: &dyn FieldValue,
        args: &[Arg],
        registry: &TransformerRegistry,
    ) -> Result<Value, TransformError> {
        (self.0)(value, args, registry)
    }
}

impl PartialEq for Transformer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transformer(..)")
    }
}

/// Name → transformer table owned by one `Api` instance.
#[derive(Clone)]
pub struct TransformerRegistry {
    transformers: HashMap<String, Transformer>,
}

impl TransformerRegistry {
    /// Registry seeded with the built-in transformers.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("string", Transformer::new(string));
        registry.register("integer", Transformer::new(integer));
        registry.register("float", Transformer::new(float));
        registry.register("split", Transformer::new(split));
        registry.register("page", Transformer::new(page));
        registry.register("collection", Transformer::new(collection));
        registry
    }

    /// Registry without built-ins.
    pub fn empty() -> Self {
        TransformerRegistry {
            transformers: HashMap::new(),
        }
    }

    /// Inserts or overwrites a transformer.
    pub fn register(&mut self, name: impl Into<String>, transformer: Transformer) {
        self.transformers.insert(name.into(), transformer);
    }

    pub fn get(&self, name: &str) -> Option<&Transformer> {
        self.transformers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transformers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.transformers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("names", &self.names())
            .finish()
    }
}

fn string(value: &dyn FieldValue, _args: &[Arg], _r: &TransformerRegistry) -> Result<Value, TransformError> {
    Ok(Value::String(value.to_text()))
}

fn integer(value: &dyn FieldValue, _args: &[Arg], _r: &TransformerRegistry) -> Result<Value, TransformError> {
    Ok(Value::from(value.to_int()))
}

fn float(value: &dyn FieldValue, _args: &[Arg], _r: &TransformerRegistry) -> Result<Value, TransformError> {
    // NaN and infinities have no JSON form
    Ok(serde_json::Number::from_f64(value.to_float())
        .map(Value::Number)
        .unwrap_or(Value::Null))
}

fn split(value: &dyn FieldValue, args: &[Arg], _r: &TransformerRegistry) -> Result<Value, TransformError> {
    let delimiter = match args.first() {
        None => ",",
        Some(Arg::Value(Value::String(d))) => d.as_str(),
        Some(_) => return Err(invalid_args("split", "delimiter must be a string")),
    };
    Ok(Value::from(value.split(delimiter)))
}

fn page(value: &dyn FieldValue, args: &[Arg], registry: &TransformerRegistry) -> Result<Value, TransformError> {
    let schema = nested_schema("page", args.first())?;
    match value.to_entity() {
        Some(entity) => Ok(Value::Object(PageSerializer::serialize(
            entity.as_ref(),
            &schema,
            registry,
        )?)),
        None => Ok(Value::Null),
    }
}

fn collection(
    value: &dyn FieldValue,
    args: &[Arg],
    registry: &TransformerRegistry,
) -> Result<Value, TransformError> {
    let schema = nested_schema("collection", args.first())?;
    let format = match args.get(1) {
        None => ListFormat::default(),
        Some(Arg::Value(Value::String(f))) => f
            .parse()
            .map_err(|e: String| invalid_args("collection", &e))?,
        Some(_) => return Err(invalid_args("collection", "list format must be a string")),
    };
    let mut out = Vec::new();
    // unresolved identifiers are dropped, not null-padded
    for entity in value.to_entities(format).into_iter().flatten() {
        out.push(Value::Object(PageSerializer::serialize(
            entity.as_ref(),
            &schema,
            registry,
        )?));
    }
    Ok(Value::Array(out))
}

fn nested_schema<'a>(name: &str, arg: Option<&'a Arg>) -> Result<Cow<'a, SchemaSpec>, TransformError> {
    match arg {
        None => Ok(Cow::Owned(SchemaSpec::new())),
        Some(Arg::Schema(spec)) => Ok(Cow::Borrowed(spec)),
        Some(Arg::Value(v)) => SchemaSpec::from_value(v)
            .map(Cow::Owned)
            .map_err(|e| invalid_args(name, &e.to_string())),
    }
}

fn invalid_args(name: &str, message: &str) -> TransformError {
    TransformError::InvalidArgs {
        name: name.to_string(),
        message: message.to_string(),
    }
}
