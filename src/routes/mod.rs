//! Route registration records, the built route table and its axum router.

pub mod pattern;
pub mod router;
pub mod table;

pub use pattern::{join, translate, PathTemplate};
pub use router::into_router;
pub use table::{build_table, find, RouteEntry};

use crate::handlers::{FilterChain, Handler};
use axum::http::Method;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    /// Any method.
    All,
}

impl RouteMethod {
    pub const CONCRETE: [RouteMethod; 5] = [
        RouteMethod::Get,
        RouteMethod::Post,
        RouteMethod::Put,
        RouteMethod::Patch,
        RouteMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMethod::Get => "GET",
            RouteMethod::Post => "POST",
            RouteMethod::Put => "PUT",
            RouteMethod::Patch => "PATCH",
            RouteMethod::Delete => "DELETE",
            RouteMethod::All => "ALL",
        }
    }

    /// Whether a route registered with `self` serves requests of `other`.
    pub fn covers(&self, other: RouteMethod) -> bool {
        *self == RouteMethod::All || *self == other
    }

    /// The registration method serving an HTTP method. `HEAD` is served by `GET` routes;
    /// methods without a counterpart only reach `All` routes.
    pub fn from_http(method: &Method) -> Option<RouteMethod> {
        match *method {
            Method::GET | Method::HEAD => Some(RouteMethod::Get),
            Method::POST => Some(RouteMethod::Post),
            Method::PUT => Some(RouteMethod::Put),
            Method::PATCH => Some(RouteMethod::Patch),
            Method::DELETE => Some(RouteMethod::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RouteMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(RouteMethod::Get),
            "POST" => Ok(RouteMethod::Post),
            "PUT" => Ok(RouteMethod::Put),
            "PATCH" => Ok(RouteMethod::Patch),
            "DELETE" => Ok(RouteMethod::Delete),
            "ALL" | "ANY" | "*" => Ok(RouteMethod::All),
            _ => Err(format!("unsupported method: {}", s)),
        }
    }
}

/// A registered route, before the base path is applied.
#[derive(Clone)]
pub struct Route {
    pub pattern: String,
    pub method: RouteMethod,
    pub handler: Handler,
    pub filters: FilterChain,
}
