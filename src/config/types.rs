//! Configuration types for an `Api` instance.

use crate::schema::SchemaSpec;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    /// Base path; surrounding slashes are ignored.
    #[serde(default)]
    pub base: String,
    /// Headers added to every generated response (e.g. CORS).
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Wrap plain handler data in a success envelope instead of returning it as is.
    #[serde(default = "default_true")]
    pub wrap_plain_results: bool,
    /// Request body limit in bytes.
    #[serde(default)]
    pub body_limit: Option<usize>,
    /// Named schemas registered at construction.
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaSpec>,
}

fn default_true() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base: String::new(),
            headers: BTreeMap::new(),
            wrap_plain_results: true,
            body_limit: None,
            schemas: BTreeMap::new(),
        }
    }
}
