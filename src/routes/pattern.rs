//! Route patterns: joining with the base path and compiling placeholders into path matchers.
//!
//! Placeholders occupy a whole path segment: `(:any)`, `(:num)`, `(:alpha)`, `(:alphanum)`
//! match one segment and `(:all)` matches the rest of the path. Named captures (`:name`,
//! `*name`) are accepted too and behave like `(:any)` and `(:all)`. Captures are positional.

use crate::error::ConfigError;
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::OnceLock;

/// `base + "/" + pattern` without surrounding slashes.
pub fn join(base: &str, pattern: &str) -> String {
    let base = base.trim_matches('/');
    let pattern = pattern.trim_matches('/');
    match (base.is_empty(), pattern.is_empty()) {
        (true, _) => pattern.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base, pattern),
    }
}

/// A compiled pattern plus one optional constraint per capture, in capture order.
#[derive(Clone, Debug)]
pub struct PathTemplate {
    pub pattern: String,
    regex: Regex,
    pub constraints: Vec<Option<Regex>>,
}

impl PathTemplate {
    /// Positional captures when `path` matches, percent-decoded. Surrounding slashes are ignored.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(path.trim_matches('/'))?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| {
                    let raw = m.map_or("", |m| m.as_str());
                    percent_decode_str(raw).decode_utf8_lossy().into_owned()
                })
                .collect(),
        )
    }

    /// Whether positional captures satisfy the placeholder constraints.
    pub fn accepts(&self, captures: &[String]) -> bool {
        self.constraints
            .iter()
            .zip(captures)
            .all(|(c, value)| c.as_ref().map_or(true, |re| re.is_match(value)))
    }
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\(:(any|all|num|alpha|alphanum)\)$").expect("static regex"))
}

/// Regex body matched by a placeholder kind.
fn capture_body(kind: &str) -> &'static str {
    match kind {
        "num" => r"-?[0-9]+(?:\.[0-9]+)?",
        "alpha" => r"[a-zA-Z]+",
        "alphanum" => r"[a-zA-Z0-9]+",
        "all" => r".*",
        _ => r"[^/]+",
    }
}

fn constraint(kind: &str) -> Option<Regex> {
    match kind {
        "num" | "alpha" | "alphanum" => Regex::new(&format!("^(?:{})$", capture_body(kind))).ok(),
        _ => None,
    }
}

pub fn translate(pattern: &str) -> Result<PathTemplate, ConfigError> {
    let invalid = |message: &str| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        message: message.to_string(),
    };
    let segments: Vec<&str> = pattern
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let mut out = Vec::with_capacity(segments.len());
    let mut constraints = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        let last = i + 1 == segments.len();
        let kind = if let Some(caps) = placeholder_re().captures(segment) {
            Some(caps.get(1).map_or("any", |m| m.as_str()))
        } else if segment.contains("(:") {
            return Err(invalid("placeholders must fill a whole segment"));
        } else if segment.starts_with('*') {
            Some("all")
        } else if segment.starts_with(':') {
            Some("any")
        } else {
            None
        };
        match kind {
            Some(kind) => {
                if kind == "all" && !last {
                    return Err(invalid("rest-of-path captures must be the last segment"));
                }
                out.push(format!("({})", capture_body(kind)));
                constraints.push(constraint(kind));
            }
            None => out.push(regex::escape(segment)),
        }
    }
    let regex = Regex::new(&format!("^{}$", out.join("/"))).map_err(|e| invalid(&e.to_string()))?;
    Ok(PathTemplate {
        pattern: segments.join("/"),
        regex,
        constraints,
    })
}
