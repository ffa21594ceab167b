//! Pre-handler filters. A chain runs in order; the first failure stops it.

use crate::error::ApiError;
use crate::handlers::context::RequestContext;
use crate::state::ApiState;
use std::fmt;
use std::sync::Arc;

pub type FilterFn = Arc<dyn Fn(&mut RequestContext) -> Result<(), ApiError> + Send + Sync>;

/// A filter referenced by registry name or supplied directly.
#[derive(Clone)]
pub enum Filter {
    Named(String),
    Func(FilterFn),
}

impl Filter {
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&mut RequestContext) -> Result<(), ApiError> + Send + Sync + 'static,
    {
        Filter::Func(Arc::new(f))
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Filter::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<&str> for Filter {
    fn from(name: &str) -> Self {
        Filter::Named(name.to_string())
    }
}

impl From<String> for Filter {
    fn from(name: String) -> Self {
        Filter::Named(name)
    }
}

/// Ordered filters attached to one route.
#[derive(Clone, Debug, Default)]
pub struct FilterChain(Vec<Filter>);

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, filter: impl Into<Filter>) -> Self {
        self.0.push(filter.into());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.0.iter()
    }

    /// Runs every filter in order against `ctx`, stopping at the first failure.
    /// Named filters are looked up in `state`; an unregistered name fails the chain.
    pub fn run(&self, state: &ApiState, ctx: &mut RequestContext) -> Result<(), ApiError> {
        self.0.iter().try_for_each(|filter| {
            let f = match filter {
                Filter::Named(name) => state
                    .filter(name)
                    .ok_or_else(|| ApiError::UnknownFilter(name.clone()))?,
                Filter::Func(f) => f,
            };
            f(ctx)
        })
    }
}

impl From<Filter> for FilterChain {
    fn from(filter: Filter) -> Self {
        FilterChain(vec![filter])
    }
}

impl From<&str> for FilterChain {
    fn from(name: &str) -> Self {
        FilterChain(vec![name.into()])
    }
}

impl From<Vec<Filter>> for FilterChain {
    fn from(filters: Vec<Filter>) -> Self {
        FilterChain(filters)
    }
}

impl<const N: usize> From<[&str; N]> for FilterChain {
    fn from(names: [&str; N]) -> Self {
        FilterChain(names.iter().map(|n| Filter::from(*n)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue, Method};
    use serde_json::json;
    use std::sync::Arc;

    fn ctx() -> RequestContext {
        RequestContext::new(Method::GET, "/")
    }

    #[test]
    fn runs_in_order_and_shares_context() {
        let chain = FilterChain::new()
            .then(Filter::func(|ctx| {
                ctx.set("trace", json!(["first"]));
                Ok(())
            }))
            .then(Filter::func(|ctx| {
                let mut trace = ctx.get("trace").cloned().unwrap_or(json!([]));
                if let Some(items) = trace.as_array_mut() {
                    items.push(json!("second"));
                }
                ctx.set("trace", trace);
                Ok(())
            }));
        let mut ctx = ctx();
        chain.run(&ApiState::default(), &mut ctx).unwrap();
        assert_eq!(ctx.get("trace"), Some(&json!(["first", "second"])));
    }

    #[test]
    fn failure_short_circuits() {
        let chain = FilterChain::new()
            .then(Filter::func(|_| Err(ApiError::reject(403, "Unauthorized"))))
            .then(Filter::func(|ctx| {
                ctx.set("reached", true);
                Ok(())
            }));
        let mut ctx = ctx();
        let err = chain.run(&ApiState::default(), &mut ctx).unwrap_err();
        assert_eq!(err.code(), Some(403));
        assert!(ctx.get("reached").is_none());
    }

    #[test]
    fn named_filters_resolve_through_state() {
        let mut state = ApiState::default();
        state.filters.insert(
            "auth".into(),
            Arc::new(|ctx: &mut RequestContext| match ctx.header("x-api-key") {
                Some("secret") => Ok(()),
                _ => Err(ApiError::status(401)),
            }),
        );
        let chain = FilterChain::from(["auth"]);
        assert!(chain.run(&state, &mut ctx()).is_err());
        let mut ok = ctx().with_header(HeaderName::from_static("x-api-key"), HeaderValue::from_static("secret"));
        assert!(chain.run(&state, &mut ok).is_ok());

        let missing = FilterChain::from("nope");
        assert!(matches!(
            missing.run(&state, &mut ctx()),
            Err(ApiError::UnknownFilter(name)) if name == "nope"
        ));
    }

    #[test]
    fn empty_chain_passes() {
        assert!(FilterChain::new().run(&ApiState::default(), &mut ctx()).is_ok());
    }
}
