//! Route patterns: literal segments, `:name` parameters and `(...)` groups.

use regex::Regex;

use crate::error::{AppError, AppResult};

/// A compiled route pattern such as `/api/webhooks/(.*)` or `/users/:id`.
///
/// Patterns match the whole path. A single trailing slash is tolerated on
/// everything except the root pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    regex: Regex,
}

impl RoutePattern {
    pub fn new(pattern: &str) -> AppResult<Self> {
        if !pattern.starts_with('/') {
            return Err(invalid(pattern, "must start with `/`"));
        }

        let mut out = String::from("^");
        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '(' => {
                    // Copy the group through to the regex verbatim, tracking nesting.
                    let mut depth = 1;
                    out.push('(');
                    for g in chars.by_ref() {
                        match g {
                            '(' => depth += 1,
                            ')' => depth -= 1,
                            _ => {}
                        }
                        out.push(g);
                        if depth == 0 {
                            break;
                        }
                    }
                    if depth != 0 {
                        return Err(invalid(pattern, "unbalanced `(`"));
                    }
                }
                ')' => return Err(invalid(pattern, "unbalanced `)`")),
                ':' => {
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if n.is_ascii_alphanumeric() || n == '_' {
                            name.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if name.is_empty() {
                        return Err(invalid(pattern, "parameter without a name"));
                    }
                    out.push_str("[^/]+");
                }
                other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }
        if pattern != "/" {
            out.push_str("/?");
        }
        out.push('$');

        let regex = Regex::new(&out).map_err(|e| invalid(pattern, &e.to_string()))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn invalid(pattern: &str, reason: &str) -> AppError {
    AppError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    }
}
