//! Schema specification types: which fields to emit and how to transform each one.

use crate::error::SchemaError;
use crate::schema::registry::Transformer;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Extra positional argument forwarded to a transformer after the field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Value(Value),
    /// Nested schema, used by the `page` and `collection` transformers.
    Schema(SchemaSpec),
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Value(Value::String(s.to_string()))
    }
}

impl From<SchemaSpec> for Arg {
    fn from(s: SchemaSpec) -> Self {
        Arg::Schema(s)
    }
}

/// Head of a transformer spec: a registry name or a function supplied inline.
#[derive(Clone, Debug, PartialEq)]
pub enum TransformerRef {
    Named(String),
    Func(Transformer),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransformerSpec {
    pub head: TransformerRef,
    pub args: Vec<Arg>,
}

impl TransformerSpec {
    pub fn named(name: impl Into<String>) -> Self {
        TransformerSpec {
            head: TransformerRef::Named(name.into()),
            args: Vec::new(),
        }
    }

    pub fn func(transformer: Transformer) -> Self {
        TransformerSpec {
            head: TransformerRef::Func(transformer),
            args: Vec::new(),
        }
    }

    /// Appends a positional argument.
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Parses `"name"` or `["name", ...args]`.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        match value {
            Value::String(name) => Ok(TransformerSpec::named(name.as_str())),
            Value::Array(items) => {
                let (head, rest) = items
                    .split_first()
                    .ok_or_else(|| SchemaError("transformer array must not be empty".into()))?;
                let name = head.as_str().ok_or_else(|| {
                    SchemaError(format!("transformer name must be a string, got {}", head))
                })?;
                Ok(TransformerSpec {
                    head: TransformerRef::Named(name.to_string()),
                    args: rest.iter().cloned().map(Arg::Value).collect(),
                })
            }
            other => Err(SchemaError(format!(
                "transformer must be a name or [name, ...args], got {}",
                other
            ))),
        }
    }
}

impl From<&str> for TransformerSpec {
    fn from(name: &str) -> Self {
        TransformerSpec::named(name)
    }
}

impl From<String> for TransformerSpec {
    fn from(name: String) -> Self {
        TransformerSpec::named(name)
    }
}

impl From<Transformer> for TransformerSpec {
    fn from(t: Transformer) -> Self {
        TransformerSpec::func(t)
    }
}

/// One declared field. `transformer: None` is a bare entry (default `string`).
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaEntry {
    pub field: String,
    pub transformer: Option<TransformerSpec>,
}

/// Ordered field list. Declaration order is output order; field names are unique.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaSpec {
    entries: Vec<SchemaEntry>,
}

impl SchemaSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bare field using the default transformer.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.insert(SchemaEntry {
            field: name.into(),
            transformer: None,
        });
        self
    }

    /// Adds a field with an explicit transformer.
    pub fn with(mut self, name: impl Into<String>, transformer: impl Into<TransformerSpec>) -> Self {
        self.insert(SchemaEntry {
            field: name.into(),
            transformer: Some(transformer.into()),
        });
        self
    }

    /// Inserts an entry; a repeated field name replaces the earlier entry in place.
    pub fn insert(&mut self, entry: SchemaEntry) {
        match self.entries.iter_mut().find(|e| e.field == entry.field) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    pub fn entry(&self, field: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|e| e.field == field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses the JSON schema document format.
    ///
    /// Array form: `["title", {"price": "float"}, {"maker": ["page", ["title"]]}]`.
    /// Object form: `{"title": null, "price": "float"}`. `null` means the default transformer.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let mut spec = SchemaSpec::new();
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::String(name) => spec.insert(SchemaEntry {
                            field: name.clone(),
                            transformer: None,
                        }),
                        Value::Object(obj) if obj.len() == 1 => {
                            for (name, t) in obj {
                                spec.insert(keyed_entry(name, t)?);
                            }
                        }
                        other => {
                            return Err(SchemaError(format!(
                                "schema entry must be a field name or a single-key object, got {}",
                                other
                            )))
                        }
                    }
                }
            }
            Value::Object(obj) => {
                for (name, t) in obj {
                    spec.insert(keyed_entry(name, t)?);
                }
            }
            other => {
                return Err(SchemaError(format!(
                    "schema must be an array or object, got {}",
                    other
                )))
            }
        }
        Ok(spec)
    }
}

fn keyed_entry(name: &str, transformer: &Value) -> Result<SchemaEntry, SchemaError> {
    let transformer = match transformer {
        Value::Null => None,
        t => Some(TransformerSpec::from_value(t)?),
    };
    Ok(SchemaEntry {
        field: name.to_string(),
        transformer,
    })
}

impl<'de> Deserialize<'de> for SchemaSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        SchemaSpec::from_value(&v).map_err(serde::de::Error::custom)
    }
}
