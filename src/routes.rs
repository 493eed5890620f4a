//! Route table extraction from `initializer.rb`.
//!
//! This is a single-line heuristic, not a Ruby parser. Each line is scanned
//! for a `router.<verb>` call, the first quoted literal (the path), a `to:`
//! keyword argument (the component) and an optional `as:` keyword argument
//! (the helper). Lines that don't fit are skipped silently.
//!
//! Known limitations: declarations spanning several lines, escaped quote
//! characters and nested string literals yield no route or a truncated one.
//!
//! ```ruby
//! router.get '/users', to: UsersComponent, as: 'users'
//! router.add_route('/legacy', LegacyComponent)
//! ```

use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Call-site marker naming the routing registry.
const REGISTRY_MARKER: &str = "router.";

const METHODS: &[&str] = &["get", "post", "put", "patch", "delete", "add_route"];

/// Legacy registration form; always a GET.
const LEGACY_METHOD: &str = "add_route";

const HELPER_SUFFIX: &str = "_path";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub method: String,
    pub path: String,
    pub component: String,
    pub helper: Option<String>,
}

/// Extract routes in source line order.
pub fn parse(source: &str) -> Vec<Route> {
    source.lines().filter_map(parse_line).collect()
}

/// Parse a route file. A missing file has no routes.
pub fn parse_file(path: &Path) -> std::io::Result<Vec<Route>> {
    match fs::read_to_string(path) {
        Ok(source) => Ok(parse(&source)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

fn parse_line(line: &str) -> Option<Route> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let method = registry_method(line)?;
    let path = quoted(line)?;

    let component = if let Some(rest) = keyword_argument(line, "to:") {
        until_delimiter(rest)
    } else if method == LEGACY_METHOD {
        let (_, rest) = line.split_once(',')?;
        until_delimiter(rest)
    } else {
        return None;
    };
    let component = unquote(component);
    if component.is_empty() {
        return None;
    }

    let helper = keyword_argument(line, "as:")
        .and_then(quoted)
        .map(|name| format!("{}{}", name, HELPER_SUFFIX));

    let method = if method == LEGACY_METHOD {
        "GET".to_string()
    } else {
        method.to_uppercase()
    };

    Some(Route {
        method,
        path: path.to_string(),
        component: component.to_string(),
        helper,
    })
}

/// The recognised verb right after the first `router.` that has one.
fn registry_method(line: &str) -> Option<&'static str> {
    line.match_indices(REGISTRY_MARKER).find_map(|(idx, _)| {
        let rest = &line[idx + REGISTRY_MARKER.len()..];
        let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
        METHODS.iter().copied().find(|m| *m == &rest[..end])
    })
}

/// Contents of the first quoted literal, closed by the quote that opened it.
fn quoted(text: &str) -> Option<&str> {
    let start = text.find(['"', '\''])?;
    let quote = text[start..].chars().next()?;
    let body = &text[start + 1..];
    let end = body.find(quote)?;
    Some(&body[..end])
}

/// Text following a `keyword:` that is not the tail of a longer identifier.
fn keyword_argument<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    line.match_indices(keyword)
        .find(|(idx, _)| !line[..*idx].chars().next_back().is_some_and(is_ident_char))
        .map(|(idx, _)| &line[idx + keyword.len()..])
}

/// Trimmed text up to the first `,` or `)`.
fn until_delimiter(text: &str) -> &str {
    let end = text.find([',', ')']).unwrap_or(text.len());
    text[..end].trim()
}

fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
