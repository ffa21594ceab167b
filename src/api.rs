//! The `Api` façade: registries, route registration and route table construction.
//!
//! Configuration methods take and return `self` so an API reads as one chain:
//!
//! ```
//! use content_api::{Api, HandlerResult, SchemaSpec};
//! use serde_json::json;
//!
//! let api = Api::new("/v1/")
//!     .schema("product", SchemaSpec::new().field("title").with("price", "float"))
//!     .get("/ping", |_ctx, _args| Ok(json!({ "pong": true }).into()))
//!     .get("/product/(:any)", |_ctx, _args| Ok(HandlerResult::page(None).with_schema("product")));
//!
//! let routes = api.routes().unwrap();
//! assert_eq!(routes[0].pattern(), "v1/ping");
//! assert!(routes[2].is_catch_all());
//! ```

use crate::config::ApiConfig;
use crate::error::{ApiError, ConfigError};
use crate::handlers::{handler, FilterChain, Handler, HandlerResult, RequestContext};
use crate::response::ApiResponse;
use crate::routes::{self, build_table, Route, RouteEntry, RouteMethod};
use crate::schema::{SchemaSpec, Transformer};
use crate::state::ApiState;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct Api {
    state: ApiState,
    routes: Vec<Route>,
    body_limit: Option<usize>,
}

impl Api {
    pub fn new(base: &str) -> Self {
        Api {
            state: ApiState::new(base),
            routes: Vec::new(),
            body_limit: None,
        }
    }

    pub fn from_config(config: ApiConfig) -> Result<Self, ConfigError> {
        let headers = config.header_map()?;
        let mut api = Api::new(&config.base)
            .headers(headers)
            .wrap_plain_results(config.wrap_plain_results);
        api.body_limit = config.body_limit;
        for (name, spec) in config.schemas {
            api.state.schemas.insert(name, spec);
        }
        Ok(api)
    }

    pub fn base(&self) -> &str {
        &self.state.base
    }

    pub fn state(&self) -> &ApiState {
        &self.state
    }

    /// Registers (or replaces) a named schema.
    pub fn schema(mut self, name: impl Into<String>, spec: SchemaSpec) -> Self {
        self.state.schemas.insert(name.into(), spec);
        self
    }

    pub fn get_schema(&self, name: &str) -> Option<&SchemaSpec> {
        self.state.schema(name)
    }

    /// Registers a named filter usable from any route's filter chain.
    pub fn filter<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut RequestContext) -> Result<(), ApiError> + Send + Sync + 'static,
    {
        self.state.filters.insert(name.into(), Arc::new(f));
        self
    }

    /// Registers or overwrites a transformer for this instance.
    pub fn transformer(mut self, name: impl Into<String>, transformer: Transformer) -> Self {
        self.state.transformers.register(name, transformer);
        self
    }

    /// Replaces the headers applied to every generated response.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.state.headers = headers;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.state.headers.insert(name, value);
        self
    }

    pub fn wrap_plain_results(mut self, wrap: bool) -> Self {
        self.state.wrap_plain_results = wrap;
        self
    }

    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = Some(limit);
        self
    }

    /// Appends a route. Routes are matched in registration order.
    pub fn route(
        mut self,
        pattern: &str,
        method: RouteMethod,
        handler: Handler,
        filters: impl Into<FilterChain>,
    ) -> Self {
        self.routes.push(Route {
            pattern: pattern.to_string(),
            method,
            handler,
            filters: filters.into(),
        });
        self
    }

    pub fn get<F>(self, pattern: &str, f: F) -> Self
    where
        F: Fn(&mut RequestContext, &[String]) -> Result<HandlerResult, ApiError> + Send + Sync + 'static,
    {
        self.route(pattern, RouteMethod::Get, handler(f), FilterChain::new())
    }

    pub fn post<F>(self, pattern: &str, f: F) -> Self
    where
        F: Fn(&mut RequestContext, &[String]) -> Result<HandlerResult, ApiError> + Send + Sync + 'static,
    {
        self.route(pattern, RouteMethod::Post, handler(f), FilterChain::new())
    }

    pub fn put<F>(self, pattern: &str, f: F) -> Self
    where
        F: Fn(&mut RequestContext, &[String]) -> Result<HandlerResult, ApiError> + Send + Sync + 'static,
    {
        self.route(pattern, RouteMethod::Put, handler(f), FilterChain::new())
    }

    pub fn patch<F>(self, pattern: &str, f: F) -> Self
    where
        F: Fn(&mut RequestContext, &[String]) -> Result<HandlerResult, ApiError> + Send + Sync + 'static,
    {
        self.route(pattern, RouteMethod::Patch, handler(f), FilterChain::new())
    }

    pub fn delete<F>(self, pattern: &str, f: F) -> Self
    where
        F: Fn(&mut RequestContext, &[String]) -> Result<HandlerResult, ApiError> + Send + Sync + 'static,
    {
        self.route(pattern, RouteMethod::Delete, handler(f), FilterChain::new())
    }

    /// Like [`Api::get`] with a filter chain run before the handler.
    pub fn get_with<F>(self, pattern: &str, filters: impl Into<FilterChain>, f: F) -> Self
    where
        F: Fn(&mut RequestContext, &[String]) -> Result<HandlerResult, ApiError> + Send + Sync + 'static,
    {
        self.route(pattern, RouteMethod::Get, handler(f), filters)
    }

    pub fn post_with<F>(self, pattern: &str, filters: impl Into<FilterChain>, f: F) -> Self
    where
        F: Fn(&mut RequestContext, &[String]) -> Result<HandlerResult, ApiError> + Send + Sync + 'static,
    {
        self.route(pattern, RouteMethod::Post, handler(f), filters)
    }

    pub fn put_with<F>(self, pattern: &str, filters: impl Into<FilterChain>, f: F) -> Self
    where
        F: Fn(&mut RequestContext, &[String]) -> Result<HandlerResult, ApiError> + Send + Sync + 'static,
    {
        self.route(pattern, RouteMethod::Put, handler(f), filters)
    }

    pub fn patch_with<F>(self, pattern: &str, filters: impl Into<FilterChain>, f: F) -> Self
    where
        F: Fn(&mut RequestContext, &[String]) -> Result<HandlerResult, ApiError> + Send + Sync + 'static,
    {
        self.route(pattern, RouteMethod::Patch, handler(f), filters)
    }

    pub fn delete_with<F>(self, pattern: &str, filters: impl Into<FilterChain>, f: F) -> Self
    where
        F: Fn(&mut RequestContext, &[String]) -> Result<HandlerResult, ApiError> + Send + Sync + 'static,
    {
        self.route(pattern, RouteMethod::Delete, handler(f), filters)
    }

    /// Builds the route table against a snapshot of the current registries:
    /// registered routes in order, then the catch-all 404.
    pub fn routes(&self) -> Result<Vec<RouteEntry>, ConfigError> {
        build_table(Arc::new(self.state.clone()), &self.routes)
    }

    pub fn into_router(self) -> Result<Router, ConfigError> {
        let table = self.routes()?;
        tracing::info!(base = %self.state.base, routes = table.len(), "api router built");
        routes::into_router(&table, self.body_limit)
    }

    pub fn normalize_response(&self, result: HandlerResult) -> Result<ApiResponse, ApiError> {
        self.state.normalize_response(result)
    }

    pub fn success_response(&self, data: Value, code: Option<u16>) -> ApiResponse {
        self.state.success_response(data, code)
    }

    pub fn error_response(&self, code: Option<u16>, message: Option<&str>) -> ApiResponse {
        self.state.error_response(code, message)
    }

    pub fn json_response(&self, body: Value, code: u16) -> ApiResponse {
        self.state.json_response(body, code)
    }
}
