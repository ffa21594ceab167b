//! Handler results and their normalization into JSON responses.

use crate::content::{Entity, EntityRef};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::schema::SchemaSpec;
use crate::serializer::{CollectionSerializer, PageSerializer};
use crate::state::ApiState;
use serde_json::Value;
use std::borrow::Cow;

/// Schema for a page or collection result: a registered name or an inline spec.
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaRef {
    Named(String),
    Inline(SchemaSpec),
}

impl From<&str> for SchemaRef {
    fn from(name: &str) -> Self {
        SchemaRef::Named(name.to_string())
    }
}

impl From<String> for SchemaRef {
    fn from(name: String) -> Self {
        SchemaRef::Named(name)
    }
}

impl From<SchemaSpec> for SchemaRef {
    fn from(spec: SchemaSpec) -> Self {
        SchemaRef::Inline(spec)
    }
}

/// What a route handler returns.
#[derive(Clone)]
pub enum HandlerResult {
    /// Finished response, passed through unchanged.
    Response(ApiResponse),
    /// A single entity; `None` becomes a 404.
    Page {
        page: Option<EntityRef>,
        schema: Option<SchemaRef>,
        status: Option<u16>,
    },
    /// An ordered collection; `None` becomes a 404.
    Collection {
        collection: Option<Vec<EntityRef>>,
        schema: Option<SchemaRef>,
        status: Option<u16>,
    },
    /// Plain JSON data. Must be an object or an array.
    Data(Value),
}

impl HandlerResult {
    pub fn page(page: Option<EntityRef>) -> Self {
        HandlerResult::Page {
            page,
            schema: None,
            status: None,
        }
    }

    pub fn collection(collection: Option<Vec<EntityRef>>) -> Self {
        HandlerResult::Collection {
            collection,
            schema: None,
            status: None,
        }
    }

    /// Sets the schema of a page or collection result. No effect on other results.
    pub fn with_schema(mut self, schema: impl Into<SchemaRef>) -> Self {
        match &mut self {
            HandlerResult::Page { schema: s, .. } | HandlerResult::Collection { schema: s, .. } => {
                *s = Some(schema.into())
            }
            _ => {}
        }
        self
    }

    /// Overrides the success code of a page or collection result. No effect on other results.
    pub fn with_status(mut self, code: u16) -> Self {
        match &mut self {
            HandlerResult::Page { status, .. } | HandlerResult::Collection { status, .. } => {
                *status = Some(code)
            }
            _ => {}
        }
        self
    }
}

impl From<Value> for HandlerResult {
    fn from(v: Value) -> Self {
        HandlerResult::Data(v)
    }
}

impl From<ApiResponse> for HandlerResult {
    fn from(r: ApiResponse) -> Self {
        HandlerResult::Response(r)
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl ApiState {
    /// Turns any handler result into a response.
    pub fn normalize_response(&self, result: HandlerResult) -> Result<ApiResponse, ApiError> {
        match result {
            HandlerResult::Response(response) => Ok(response),
            HandlerResult::Page {
                page,
                schema,
                status,
            } => self.page_response(page.as_deref(), schema.as_ref(), status),
            HandlerResult::Collection {
                collection,
                schema,
                status,
            } => self.collection_response(collection.as_deref(), schema.as_ref(), status),
            HandlerResult::Data(data @ (Value::Object(_) | Value::Array(_))) => {
                if self.wrap_plain_results {
                    Ok(self.success_response(data, None))
                } else {
                    Ok(self.json_response(data, 200))
                }
            }
            HandlerResult::Data(other) => Err(ApiError::InvalidHandlerResult(json_kind(&other))),
        }
    }

    pub fn page_response(
        &self,
        page: Option<&dyn Entity>,
        schema: Option<&SchemaRef>,
        status: Option<u16>,
    ) -> Result<ApiResponse, ApiError> {
        let Some(page) = page else {
            return Ok(self.error_response(Some(404), None));
        };
        let spec = self.resolve_schema(schema);
        let data = PageSerializer::serialize(page, &spec, &self.transformers)?;
        Ok(self.success_response(Value::Object(data), status))
    }

    pub fn collection_response(
        &self,
        collection: Option<&[EntityRef]>,
        schema: Option<&SchemaRef>,
        status: Option<u16>,
    ) -> Result<ApiResponse, ApiError> {
        let Some(collection) = collection else {
            return Ok(self.error_response(Some(404), None));
        };
        let spec = self.resolve_schema(schema);
        let data = CollectionSerializer::serialize(collection, &spec, &self.transformers)?;
        Ok(self.success_response(Value::Array(data), status))
    }

    /// Named schemas come from the registry; an unregistered name resolves to the empty schema.
    pub fn resolve_schema<'a>(&'a self, schema: Option<&'a SchemaRef>) -> Cow<'a, SchemaSpec> {
        match schema {
            None => Cow::Owned(SchemaSpec::new()),
            Some(SchemaRef::Inline(spec)) => Cow::Borrowed(spec),
            Some(SchemaRef::Named(name)) => match self.schema(name) {
                Some(spec) => Cow::Borrowed(spec),
                None => {
                    tracing::warn!(schema = %name, "unknown schema, using empty schema");
                    Cow::Owned(SchemaSpec::new())
                }
            },
        }
    }
}
