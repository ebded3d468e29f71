use crate::models::HttpMethod;

/// Token every path placeholder collapses to
pub const PARAM_TOKEN: &str = "{param}";

/// Replaces each `{name}` or `<name>` placeholder with [`PARAM_TOKEN`].
///
/// A placeholder runs from an opening delimiter to the next matching closing
/// one and may contain any other character, so `{b/{c}` is one placeholder.
/// Literal text is kept as is. Unclosed or empty placeholders pass through
/// unchanged.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(start) = rest.find(['{', '<']) {
        let close = if rest[start..].starts_with('{') { '}' } else { '>' };
        normalized.push_str(&rest[..start]);

        let after_open = &rest[start + 1..];
        match after_open.find(close) {
            Some(end) if end > 0 => {
                normalized.push_str(PARAM_TOKEN);
                rest = &after_open[end + 1..];
            }
            _ => {
                // Not a placeholder, keep the opening delimiter literally
                normalized.push_str(&rest[start..start + 1]);
                rest = after_open;
            }
        }
    }

    normalized.push_str(rest);
    normalized
}

/// Matching key, e.g. `GET /users/{param}`
pub fn normalized_key(method: HttpMethod, path: &str) -> String {
    format!("{} {}", method, normalize_path(path))
}
