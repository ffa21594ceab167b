//! Host-facing content traits: entities (pages) and their raw field values.
//!
//! The content runtime owns storage and parsing. This crate only reads through these traits
//! while serializing, so every method takes `&self`.

use std::sync::Arc;

/// Shared handle to a host entity.
pub type EntityRef = Arc<dyn Entity>;

/// Shared handle to a raw field value.
pub type FieldRef = Arc<dyn FieldValue>;

/// Format of a field holding a list of entity identifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListFormat {
    /// YAML sequence (`- products/a`).
    #[default]
    Yaml,
    /// JSON array of strings.
    Json,
    /// One identifier per line.
    Lines,
}

impl std::str::FromStr for ListFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(ListFormat::Yaml),
            "json" => Ok(ListFormat::Json),
            "lines" | "text" => Ok(ListFormat::Lines),
            _ => Err(format!("unknown list format: {} (expected yaml, json or lines)", s)),
        }
    }
}

/// One content node (a page).
pub trait Entity: Send + Sync {
    /// Identifier unique within the parent scope.
    fn slug(&self) -> &str;

    /// Raw value of a field. Hosts return an empty value for unknown names.
    fn field(&self, name: &str) -> FieldRef;
}

/// A raw, typed attribute value of an entity.
pub trait FieldValue: Send + Sync {
    fn to_text(&self) -> String;

    fn to_int(&self) -> i64 {
        let text = self.to_text();
        let text = text.trim();
        text.parse::<i64>()
            .ok()
            .or_else(|| text.parse::<f64>().ok().map(|f| f as i64))
            .unwrap_or(0)
    }

    fn to_float(&self) -> f64 {
        self.to_text().trim().parse().unwrap_or(0.0)
    }

    /// Splits the raw text on `delimiter`; pieces are trimmed and empty pieces dropped.
    fn split(&self, delimiter: &str) -> Vec<String> {
        let text = self.to_text();
        if delimiter.is_empty() {
            let whole = text.trim();
            return if whole.is_empty() { Vec::new() } else { vec![whole.to_string()] };
        }
        text.split(delimiter)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Resolves the value as a reference to a single entity.
    fn to_entity(&self) -> Option<EntityRef>;

    /// Resolves the value as a list of references. One slot per listed identifier;
    /// `None` marks an identifier that could not be resolved.
    fn to_entities(&self, format: ListFormat) -> Vec<Option<EntityRef>>;
}
