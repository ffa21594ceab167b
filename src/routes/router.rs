//! Converts the route table into an axum `Router`.
//!
//! Every request goes through one dispatcher that walks the table in registration order.
//! The first entry whose method and pattern match (constraints included) serves it, so a
//! constrained route that rejects a value lets later routes try. Requests nothing matches,
//! inside or outside the base path, get the catch-all 404.

use crate::error::ConfigError;
use crate::handlers::RequestContext;
use crate::response::ApiResponse;
use crate::routes::table::{find, RouteEntry};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, Method, Uri},
    Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

type Table = Arc<Vec<RouteEntry>>;

async fn serve(
    State(table): State<Table>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResponse {
    let mut ctx = RequestContext::new(method, uri.path());
    ctx.query = Query::<HashMap<String, String>>::try_from_uri(&uri)
        .map(|Query(q)| q)
        .unwrap_or_default();
    ctx.headers = headers;
    ctx.body = body;
    let span = tracing::debug_span!("request", id = %ctx.id, method = %ctx.method, path = %ctx.path);
    span.in_scope(|| {
        // paths outside the base match nothing, not even the catch-all's patterns
        let found = find(&table, &ctx.method, &ctx.path)
            .or_else(|| table.iter().find(|e| e.is_catch_all()).map(|e| (e, Vec::new())));
        match found {
            Some((entry, args)) => {
                tracing::debug!(pattern = %entry.pattern(), "dispatch");
                entry.call(&mut ctx, &args)
            }
            None => ApiResponse::new(Value::Null, 404),
        }
    })
}

/// Builds the router. `body_limit` caps request bodies in bytes.
pub fn into_router(table: &[RouteEntry], body_limit: Option<usize>) -> Result<Router, ConfigError> {
    if !table.iter().any(|e| e.is_catch_all()) {
        return Err(ConfigError::Load("route table has no catch-all entry".into()));
    }
    let mut router = Router::new()
        .fallback(serve)
        .with_state(Arc::new(table.to_vec()));
    if let Some(limit) = body_limit {
        router = router.layer(RequestBodyLimitLayer::new(limit));
    }
    Ok(router)
}
