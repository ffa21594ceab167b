//! State shared by every wrapped route handler. Populated while the `Api` is configured,
//! then frozen behind an `Arc` when the route table is built.

use crate::handlers::filter::FilterFn;
use crate::schema::{SchemaSpec, TransformerRegistry};
use axum::http::HeaderMap;
use std::collections::HashMap;

#[derive(Clone)]
pub struct ApiState {
    /// Base path without leading or trailing `/`.
    pub base: String,
    /// Applied to every generated response.
    pub headers: HeaderMap,
    /// Wrap plain handler data in a success envelope (`true`) or emit it as is.
    pub wrap_plain_results: bool,
    pub transformers: TransformerRegistry,
    pub schemas: HashMap<String, SchemaSpec>,
    pub filters: HashMap<String, FilterFn>,
}

impl ApiState {
    pub fn new(base: &str) -> Self {
        ApiState {
            base: base.trim_matches('/').to_string(),
            headers: HeaderMap::new(),
            wrap_plain_results: true,
            transformers: TransformerRegistry::new(),
            schemas: HashMap::new(),
            filters: HashMap::new(),
        }
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaSpec> {
        self.schemas.get(name)
    }

    pub fn filter(&self, name: &str) -> Option<&FilterFn> {
        self.filters.get(name)
    }
}

impl Default for ApiState {
    fn default() -> Self {
        Self::new("")
    }
}
