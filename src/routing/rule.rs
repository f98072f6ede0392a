//! Route patterns and their compiled form.
//!
//! A pattern is a literal path plus zero or more parameter tokens of the exact
//! shape `:name(fragment)`, where `fragment` is a regex capture group. A
//! pattern with no tokens skips regex evaluation entirely and is matched by
//! string comparison.

use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

use crate::handler::Handler;

/// Constructs a fresh handler instance for each dispatched request.
pub type HandlerFactory = Arc<dyn Fn() -> Box<dyn Handler> + Send + Sync>;

/// Registration-time pattern failure. Fatal to application startup.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern `{pattern}`: found {found} parameter tokens but {expected} `:` markers")]
    TokenMismatch {
        pattern: String,
        found: usize,
        expected: usize,
    },
    #[error("pattern `{pattern}`: parameter fragment `{fragment}` is not a valid regex: {source}")]
    BadFragment {
        pattern: String,
        fragment: String,
        source: regex::Error,
    },
    #[error("pattern `{pattern}`: assembled matcher failed to compile: {source}")]
    BadPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// One registered route. Immutable after registration, owned by the
/// [`RoutingTable`](crate::routing::RoutingTable) for the process lifetime.
pub struct RoutingRule {
    pattern: String,
    matcher: Option<Regex>,
    params: Vec<String>,
    handler_name: String,
    factory: HandlerFactory,
}

impl RoutingRule {
    /// Parse and compile a registration-time pattern.
    pub(crate) fn compile(
        pattern: &str,
        handler_name: &str,
        factory: HandlerFactory,
    ) -> Result<Self, PatternError> {
        let colon_count = pattern.matches(':').count();
        if colon_count == 0 {
            return Ok(Self {
                pattern: pattern.to_string(),
                matcher: None,
                params: Vec::new(),
                handler_name: handler_name.to_string(),
                factory,
            });
        }

        // The token scanner itself is a fixed, known-good expression.
        let token_re = match Regex::new(r":\w+\(.*?\)") {
            Ok(re) => re,
            Err(source) => {
                return Err(PatternError::BadPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            }
        };
        let tokens: Vec<String> = token_re
            .find_iter(pattern)
            .map(|m| m.as_str().to_string())
            .collect();
        if tokens.len() != colon_count {
            return Err(PatternError::TokenMismatch {
                pattern: pattern.to_string(),
                found: tokens.len(),
                expected: colon_count,
            });
        }

        let mut params = Vec::with_capacity(tokens.len());
        let mut rebuilt = pattern.to_string();
        for token in &tokens {
            // Token shape guarantees an opening paren after the name.
            let open = match token.find('(') {
                Some(i) => i,
                None => continue,
            };
            let name = &token[1..open];
            let fragment = &token[open..];
            if let Err(source) = Regex::new(fragment) {
                return Err(PatternError::BadFragment {
                    pattern: pattern.to_string(),
                    fragment: fragment.to_string(),
                    source,
                });
            }
            params.push(name.to_string());
            rebuilt = rebuilt.replacen(token.as_str(), fragment, 1);
        }

        let anchored = format!("^{rebuilt}");
        let matcher = Regex::new(&anchored).map_err(|source| PatternError::BadPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            matcher: Some(matcher),
            params,
            handler_name: handler_name.to_string(),
            factory,
        })
    }

    /// The raw pattern as registered. For exact rules this is the literal path.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True when the rule carries no parameter tokens.
    pub fn is_exact(&self) -> bool {
        self.matcher.is_none()
    }

    pub(crate) fn matcher(&self) -> Option<&Regex> {
        self.matcher.as_ref()
    }

    /// Parameter names in declaration order.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    pub(crate) fn make_handler(&self) -> Box<dyn Handler> {
        (self.factory)()
    }
}

impl std::fmt::Debug for RoutingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingRule")
            .field("pattern", &self.pattern)
            .field("exact", &self.is_exact())
            .field("params", &self.params)
            .field("handler", &self.handler_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> HandlerFactory {
        struct Nop;
        impl Handler for Nop {}
        Arc::new(|| Box::new(Nop) as Box<dyn Handler>)
    }

    #[test]
    fn literal_pattern_stays_exact() {
        let rule = RoutingRule::compile("/about", "About", factory()).unwrap();
        assert!(rule.is_exact());
        assert!(rule.params().is_empty());
    }

    #[test]
    fn parameter_tokens_become_capture_groups() {
        let rule = RoutingRule::compile("/user/:id([0-9]+)", "User", factory()).unwrap();
        assert!(!rule.is_exact());
        assert_eq!(rule.params(), ["id"]);
        let caps = rule.matcher().unwrap().captures("/user/42").unwrap();
        assert_eq!(&caps[1], "42");
    }

    #[test]
    fn multiple_tokens_keep_declaration_order() {
        let rule =
            RoutingRule::compile("/a/:x([a-z]+)/b/:y([0-9]+)", "Multi", factory()).unwrap();
        assert_eq!(rule.params(), ["x", "y"]);
        let caps = rule.matcher().unwrap().captures("/a/foo/b/7").unwrap();
        assert_eq!(&caps[1], "foo");
        assert_eq!(&caps[2], "7");
    }

    #[test]
    fn stray_colon_is_a_token_mismatch() {
        let err = RoutingRule::compile("/user/:id([0-9+", "User", factory()).unwrap_err();
        assert!(matches!(err, PatternError::TokenMismatch { .. }));
    }

    #[test]
    fn invalid_fragment_fails_compilation() {
        let err = RoutingRule::compile("/user/:id([)", "User", factory()).unwrap_err();
        assert!(matches!(err, PatternError::BadFragment { .. }));
    }
}
