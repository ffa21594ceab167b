//! Handler layer: request context, filter chains and result normalization.

pub mod context;
pub mod filter;
pub mod result;

pub use context::RequestContext;
pub use filter::{Filter, FilterChain, FilterFn};
pub use result::{HandlerResult, SchemaRef};

use crate::error::ApiError;
use std::sync::Arc;

/// Route handler: `(context, positional captures) -> result`.
pub type Handler =
    Arc<dyn Fn(&mut RequestContext, &[String]) -> Result<HandlerResult, ApiError> + Send + Sync>;

/// Boxes a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut RequestContext, &[String]) -> Result<HandlerResult, ApiError> + Send + Sync + 'static,
{
    Arc::new(f)
}
