//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled rules in registration order
//! - Resolve a request path to a rule, a static file, or a miss
//! - Surface captured path parameters for the dispatcher to merge
//!
//! # Design Decisions
//! - Exact rules are tried strictly before pattern rules
//! - First match wins within each class (registration order)
//! - Pattern matches must span the whole path; partial matches are rejected
//! - Static prefixes are checked first for GET/HEAD and bypass the lifecycle

use std::path::{Path, PathBuf};

use http::Method;

use crate::routing::rule::{HandlerFactory, PatternError, RoutingRule};

/// Outcome of a routing lookup.
pub enum Resolution<'a> {
    /// A rule matched; `captures` holds `(param name, captured value)` pairs.
    Handler {
        rule: &'a RoutingRule,
        captures: Vec<(String, String)>,
    },
    /// A static prefix matched; serve the file directly.
    StaticFile(PathBuf),
    NotFound,
}

/// The routing table. Mutated only during the registration phase, then
/// read-only for the lifetime of the process.
#[derive(Default)]
pub struct RoutingTable {
    exact: Vec<RoutingRule>,
    patterns: Vec<RoutingRule>,
    static_dirs: Vec<(String, PathBuf)>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `pattern` and append the rule. Zero-token patterns are stored
    /// as exact rules so the common case never touches the regex engine.
    pub fn add_rule(
        &mut self,
        pattern: &str,
        handler_name: &str,
        factory: HandlerFactory,
    ) -> Result<(), PatternError> {
        let rule = RoutingRule::compile(pattern, handler_name, factory)?;
        if rule.is_exact() {
            self.exact.push(rule);
        } else {
            self.patterns.push(rule);
        }
        Ok(())
    }

    /// Map a URL prefix to a filesystem directory for static assets.
    pub fn set_static_path(&mut self, prefix: impl Into<String>, dir: impl Into<PathBuf>) {
        self.static_dirs.push((prefix.into(), dir.into()));
    }

    /// Resolve `path` to a rule. Static prefixes short-circuit for GET/HEAD;
    /// static assets never enter the dispatch lifecycle.
    pub fn resolve(&self, path: &str, method: &Method) -> Resolution<'_> {
        if *method == Method::GET || *method == Method::HEAD {
            if let Some(file) = self.static_file_for(path) {
                return Resolution::StaticFile(file);
            }
        }

        let trimmed = path.strip_suffix('/').filter(|t| !t.is_empty());
        for rule in &self.exact {
            if path == rule.pattern() || trimmed == Some(rule.pattern()) {
                return Resolution::Handler {
                    rule,
                    captures: Vec::new(),
                };
            }
        }

        for rule in &self.patterns {
            let Some(matcher) = rule.matcher() else { continue };
            let Some(caps) = matcher.captures(path) else { continue };
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            if whole != path {
                continue;
            }
            if caps.len() - 1 != rule.params().len() {
                continue;
            }
            let captures = rule
                .params()
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = caps
                        .get(i + 1)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default();
                    (name.clone(), value)
                })
                .collect();
            return Resolution::Handler { rule, captures };
        }

        Resolution::NotFound
    }

    /// Longest matching static prefix, if any. Rejects traversal segments.
    fn static_file_for(&self, path: &str) -> Option<PathBuf> {
        let (prefix, dir) = self
            .static_dirs
            .iter()
            .filter(|(prefix, _)| path.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())?;
        let rel = path[prefix.len()..].trim_start_matches('/');
        if Path::new(rel)
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return None;
        }
        Some(dir.join(rel))
    }
}
