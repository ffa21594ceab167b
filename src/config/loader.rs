//! Load `ApiConfig` from a JSON document or from the environment (`.env` honoured).

use crate::config::types::ApiConfig;
use crate::error::ConfigError;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::collections::BTreeMap;

pub const ENV_BASE: &str = "CONTENT_API_BASE";
pub const ENV_HEADERS: &str = "CONTENT_API_HEADERS";
pub const ENV_WRAP_PLAIN_RESULTS: &str = "CONTENT_API_WRAP_PLAIN_RESULTS";
pub const ENV_BODY_LIMIT: &str = "CONTENT_API_BODY_LIMIT";
pub const ENV_SCHEMAS: &str = "CONTENT_API_SCHEMAS";

impl ApiConfig {
    /// The document must be a JSON object; missing keys keep their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let document = json_object(s).map_err(ConfigError::Load)?;
        serde_json::from_value(document).map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Reads `CONTENT_API_*` variables after loading `.env` if present. Unset variables keep defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ApiConfig::default();
        if let Some(base) = get(ENV_BASE) {
            config.base = base;
        }
        if let Some(headers) = get(ENV_HEADERS) {
            config.headers = serde_json::from_str::<BTreeMap<String, String>>(&headers)
                .map_err(|e| ConfigError::Load(format!("{}: {}", ENV_HEADERS, e)))?;
        }
        if let Some(wrap) = get(ENV_WRAP_PLAIN_RESULTS) {
            config.wrap_plain_results = parse_bool(&wrap)
                .ok_or_else(|| ConfigError::Load(format!("{}: expected a boolean, got '{}'", ENV_WRAP_PLAIN_RESULTS, wrap)))?;
        }
        if let Some(limit) = get(ENV_BODY_LIMIT) {
            let limit = limit
                .trim()
                .parse()
                .map_err(|e| ConfigError::Load(format!("{}: {}", ENV_BODY_LIMIT, e)))?;
            config.body_limit = Some(limit);
        }
        if let Some(schemas) = get(ENV_SCHEMAS) {
            let schemas = json_object(&schemas).map_err(|e| ConfigError::Load(format!("{}: {}", ENV_SCHEMAS, e)))?;
            config.schemas = serde_json::from_value(schemas)
                .map_err(|e| ConfigError::Load(format!("{}: {}", ENV_SCHEMAS, e)))?;
        }
        Ok(config)
    }

    /// Validated response headers.
    pub fn header_map(&self) -> Result<HeaderMap, ConfigError> {
        let mut map = HeaderMap::new();
        for (name, value) in &self.headers {
            let invalid = |message: String| ConfigError::InvalidHeader {
                name: name.clone(),
                message,
            };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

fn json_object(s: &str) -> Result<Value, String> {
    match serde_json::from_str::<Value>(s).map_err(|e| e.to_string())? {
        value @ Value::Object(_) => Ok(value),
        other => Err(format!("expected a JSON object, got {}", kind(&other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
