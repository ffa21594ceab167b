//! Content API: schema-driven JSON serialization of content pages and collections,
//! behind a small routing façade that turns handler results into uniform JSON envelopes.

pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod response;
pub mod routes;
pub mod schema;
pub mod serializer;
pub mod state;

#[cfg(test)]
mod fixtures;

pub use api::Api;
pub use config::ApiConfig;
pub use content::{Entity, EntityRef, FieldRef, FieldValue, ListFormat};
pub use error::{ApiError, ConfigError, SchemaError, TransformError};
pub use handlers::{Filter, FilterChain, Handler, HandlerResult, RequestContext, SchemaRef};
pub use memory::MemorySite;
pub use response::{ApiResponse, Envelope, EnvelopeStatus};
pub use routes::{RouteEntry, RouteMethod};
pub use schema::{Schema, SchemaSpec, Transformer, TransformerRegistry, TransformerSpec};
pub use serializer::{CollectionSerializer, PageSerializer};
pub use state::ApiState;
