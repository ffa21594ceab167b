//! Route table: registered routes wrapped with the filter chain and response normalization,
//! followed by the catch-all 404 route.

use crate::error::{ApiError, ConfigError};
use crate::handlers::{FilterChain, Handler, RequestContext};
use crate::response::ApiResponse;
use crate::routes::pattern::{join, translate, PathTemplate};
use crate::routes::{Route, RouteMethod};
use crate::state::ApiState;
use axum::http::Method;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

#[derive(Clone)]
enum Action {
    Handler { handler: Handler, filters: FilterChain },
    NotFound,
}

/// One entry of the built table. Patterns are host-neutral (`v1/product/(:all)`).
#[derive(Clone)]
pub struct RouteEntry {
    pub patterns: Vec<String>,
    pub method: RouteMethod,
    templates: Vec<PathTemplate>,
    state: Arc<ApiState>,
    action: Action,
}

impl RouteEntry {
    pub fn pattern(&self) -> &str {
        &self.patterns[0]
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self.action, Action::NotFound)
    }

    pub fn state(&self) -> &ApiState {
        &self.state
    }

    /// Positional captures when this entry serves `method` on `path`.
    pub fn matches(&self, method: &Method, path: &str) -> Option<Vec<String>> {
        let covered = match RouteMethod::from_http(method) {
            Some(m) => self.method.covers(m),
            None => self.method == RouteMethod::All,
        };
        if !covered {
            return None;
        }
        self.templates.iter().find_map(|t| t.captures(path))
    }

    /// Runs filters, handler and normalization. Never fails: every failure becomes an error envelope.
    pub fn call(&self, ctx: &mut RequestContext, args: &[String]) -> ApiResponse {
        let (handler, filters) = match &self.action {
            Action::NotFound => return self.state.error_response(Some(404), None),
            Action::Handler { handler, filters } => (handler, filters),
        };
        if !self.templates.iter().any(|t| t.accepts(args)) {
            return self.state.error_response(Some(404), None);
        }
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            dispatch(&self.state, filters, handler, ctx, args)
        }));
        match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => self.state.failure_response(&err),
            Err(_) => {
                tracing::error!(pattern = %self.pattern(), "handler panicked");
                self.state.error_response(Some(500), None)
            }
        }
    }
}

fn dispatch(
    state: &ApiState,
    filters: &FilterChain,
    handler: &Handler,
    ctx: &mut RequestContext,
    args: &[String],
) -> Result<ApiResponse, ApiError> {
    filters.run(state, ctx)?;
    let result = handler(ctx, args)?;
    state.normalize_response(result)
}

/// First entry in table order serving `method` on `path`, with its captures.
pub fn find<'a>(table: &'a [RouteEntry], method: &Method, path: &str) -> Option<(&'a RouteEntry, Vec<String>)> {
    table
        .iter()
        .find_map(|entry| entry.matches(method, path).map(|args| (entry, args)))
}

/// Prefixes every route with the base path and appends the catch-all
/// (`base` and `base/(:all)`, any method, 404).
pub fn build_table(state: Arc<ApiState>, routes: &[Route]) -> Result<Vec<RouteEntry>, ConfigError> {
    let mut table = Vec::with_capacity(routes.len() + 1);
    for route in routes {
        let pattern = join(&state.base, &route.pattern);
        let template = translate(&pattern)?;
        tracing::debug!(pattern = %pattern, method = %route.method, filters = route.filters.len(), "route");
        table.push(RouteEntry {
            patterns: vec![pattern],
            method: route.method,
            templates: vec![template],
            state: Arc::clone(&state),
            action: Action::Handler {
                handler: Arc::clone(&route.handler),
                filters: route.filters.clone(),
            },
        });
    }
    let patterns = vec![state.base.clone(), join(&state.base, "(:all)")];
    let templates = patterns.iter().map(|p| translate(p)).collect::<Result<_, _>>()?;
    table.push(RouteEntry {
        patterns,
        method: RouteMethod::All,
        templates,
        state: Arc::clone(&state),
        action: Action::NotFound,
    });
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{handler, Filter, HandlerResult};
    use axum::http::Method;
    use serde_json::json;

    fn route(pattern: &str, method: RouteMethod, handler: Handler, filters: FilterChain) -> Route {
        Route {
            pattern: pattern.into(),
            method,
            handler,
            filters,
        }
    }

    fn echo() -> Handler {
        handler(|_ctx, args| Ok(json!({ "args": args }).into()))
    }

    fn ctx() -> RequestContext {
        RequestContext::new(Method::GET, "/")
    }

    #[test]
    fn preserves_order_and_appends_catch_all() {
        let state = Arc::new(ApiState::new("/v1/"));
        let table = build_table(
            state,
            &[
                route("/products", RouteMethod::Get, echo(), FilterChain::new()),
                route("/product/(:all)", RouteMethod::Get, echo(), FilterChain::new()),
            ],
        )
        .unwrap();
        let patterns: Vec<_> = table.iter().map(|e| e.pattern()).collect();
        assert_eq!(patterns, vec!["v1/products", "v1/product/(:all)", "v1"]);
        assert_eq!(table[1].method, RouteMethod::Get);
        let last = table.last().unwrap();
        assert!(last.is_catch_all());
        assert_eq!(last.patterns, vec!["v1", "v1/(:all)"]);
        assert_eq!(last.method, RouteMethod::All);
    }

    #[test]
    fn catch_all_returns_404() {
        let table = build_table(Arc::new(ApiState::new("v1")), &[]).unwrap();
        let res = table[0].call(&mut ctx(), &[]);
        assert_eq!(res.body, json!({ "status": "error", "code": 404, "message": "Not found" }));
    }

    #[test]
    fn passes_positional_arguments() {
        let table = build_table(
            Arc::new(ApiState::new("v1")),
            &[route("/product/(:all)", RouteMethod::Get, echo(), FilterChain::new())],
        )
        .unwrap();
        let res = table[0].call(&mut ctx(), &["product-a".to_string()]);
        assert_eq!(res.body["data"], json!({ "args": ["product-a"] }));
    }

    #[test]
    fn filter_rejection_skips_handler() {
        let called = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let seen = Arc::clone(&called);
        let guarded = handler(move |_ctx, _args| {
            seen.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(json!({}).into())
        });
        let filters = FilterChain::from(Filter::func(|_| Err(ApiError::reject(403, "Unauthorized"))));
        let table = build_table(
            Arc::new(ApiState::new("v1")),
            &[route("/secret", RouteMethod::Get, guarded, filters)],
        )
        .unwrap();
        let res = table[0].call(&mut ctx(), &[]);
        assert_eq!(res.code, 403);
        assert_eq!(res.body, json!({ "status": "error", "code": 403, "message": "Unauthorized" }));
        assert!(!called.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn filter_state_reaches_handler() {
        let me = handler(|ctx, _args| Ok(json!({ "user": ctx.get("user") }).into()));
        let filters = FilterChain::from(Filter::func(|ctx| {
            ctx.set("user", "alice");
            Ok(())
        }));
        let table = build_table(
            Arc::new(ApiState::new("")),
            &[route("/me", RouteMethod::Get, me, filters)],
        )
        .unwrap();
        assert_eq!(table[0].call(&mut ctx(), &[]).body["data"], json!({ "user": "alice" }));
    }

    #[test]
    fn handler_failures_become_envelopes() {
        let failing = handler(|_ctx, _args| Err(ApiError::internal("boom")));
        let invalid = handler(|_ctx, _args| Ok(HandlerResult::Data(json!("Invalid Body"))));
        let coded = handler(|_ctx, _args| Err(ApiError::reject(409, "taken")));
        let panicking = handler(|_ctx, _args| panic!("bug"));
        let table = build_table(
            Arc::new(ApiState::new("")),
            &[
                route("/a", RouteMethod::Get, failing, FilterChain::new()),
                route("/b", RouteMethod::Get, invalid, FilterChain::new()),
                route("/c", RouteMethod::Get, coded, FilterChain::new()),
                route("/d", RouteMethod::Get, panicking, FilterChain::new()),
            ],
        )
        .unwrap();
        assert_eq!(
            table[0].call(&mut ctx(), &[]).body,
            json!({ "status": "error", "code": 500, "message": "Internal Server Error" })
        );
        assert_eq!(table[1].call(&mut ctx(), &[]).code, 500);
        assert_eq!(
            table[2].call(&mut ctx(), &[]).body,
            json!({ "status": "error", "code": 409, "message": "taken" })
        );
        assert_eq!(table[3].call(&mut ctx(), &[]).code, 500);
    }

    #[test]
    fn constrained_captures_fall_through_to_404() {
        let table = build_table(
            Arc::new(ApiState::new("")),
            &[route("/orders/(:num)", RouteMethod::Get, echo(), FilterChain::new())],
        )
        .unwrap();
        assert_eq!(table[0].call(&mut ctx(), &["12".into()]).code, 200);
        assert_eq!(table[0].call(&mut ctx(), &["abc".into()]).code, 404);
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let err = build_table(
            Arc::new(ApiState::new("")),
            &[route("/(:all)/x", RouteMethod::Get, echo(), FilterChain::new())],
        );
        assert!(matches!(err, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn find_tries_entries_in_order() {
        let table = build_table(
            Arc::new(ApiState::new("/v1/")),
            &[
                route("/products/(:num)", RouteMethod::Get, echo(), FilterChain::new()),
                route("/products/(:any)", RouteMethod::Get, echo(), FilterChain::new()),
                route("/products/:id", RouteMethod::Post, echo(), FilterChain::new()),
            ],
        )
        .unwrap();
        let (entry, args) = find(&table, &Method::GET, "/v1/products/12").unwrap();
        assert_eq!((entry.pattern(), args), ("v1/products/(:num)", vec!["12".to_string()]));
        let (entry, _) = find(&table, &Method::GET, "/v1/products/abc").unwrap();
        assert_eq!(entry.pattern(), "v1/products/(:any)");
        let (entry, args) = find(&table, &Method::POST, "/v1/products/abc").unwrap();
        assert_eq!((entry.pattern(), args), ("v1/products/:id", vec!["abc".to_string()]));
    }

    #[test]
    fn find_falls_back_to_catch_all_inside_the_base_only() {
        let table = build_table(
            Arc::new(ApiState::new("/v1/")),
            &[route("(:any)", RouteMethod::Get, echo(), FilterChain::new())],
        )
        .unwrap();
        assert_eq!(find(&table, &Method::GET, "/v1/x").unwrap().0.pattern(), "v1/(:any)");
        assert!(find(&table, &Method::GET, "/v1/a/b").unwrap().0.is_catch_all());
        assert!(find(&table, &Method::GET, "/v1").unwrap().0.is_catch_all());
        assert!(find(&table, &Method::OPTIONS, "/v1/x").unwrap().0.is_catch_all());
        assert!(find(&table, &Method::GET, "/v2/x").is_none());
    }
}
