//! Which request paths the gate runs on at all.

const API_PREFIXES: &[&str] = &["/api", "/trpc"];
const FRAMEWORK_PREFIX: &str = "_next";

/// Selects the request paths the gate applies to.
///
/// Static files (anything whose last part carries a file extension) and
/// framework-internal `/_next` paths are skipped. The root and every API or
/// RPC path are always included, extension or not.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestMatcher;

impl RequestMatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn applies(&self, path: &str) -> bool {
        if path == "/" || is_api_path(path) {
            return true;
        }
        let rest = path.strip_prefix('/').unwrap_or(path);
        !(rest.starts_with(FRAMEWORK_PREFIX) || has_file_extension(rest))
    }
}

/// True for `name.ext` where the extension is one or more word characters
/// and the dot is not the first character.
fn has_file_extension(rest: &str) -> bool {
    match rest.rfind('.') {
        Some(i) if i > 0 => {
            let ext = &rest[i + 1..];
            !ext.is_empty() && ext.chars().all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// `/api...` and `/trpc...` paths, which get status codes rather than redirects.
pub fn is_api_path(path: &str) -> bool {
    API_PREFIXES.iter().any(|p| path.starts_with(p))
}
