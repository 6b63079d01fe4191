//! Metric name normalization
//!
//! Pure string helpers that turn MBean domains, properties and attribute names
//! into valid Prometheus metric names.

use once_cell::sync::Lazy;
use regex::Regex;

static SNAKE_CASE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("invalid snake case regex"));
static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9:_]").expect("invalid unsafe chars regex"));
static MULTIPLE_UNDERSCORES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__+").expect("invalid underscore regex"));

/// Separator between name components
pub const SEP: char = '_';

/// Replace characters outside `[a-zA-Z0-9:_]` with `_` and merge runs of `_`
pub fn safe_name(name: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(name, "_");
    MULTIPLE_UNDERSCORES.replace_all(&replaced, "_").into_owned()
}

/// Sanitize, split camelCase boundaries with `_` and lowercase
///
/// ```ignore
/// assert_eq!(camel_case_to_lower("crate_DummyStatus_SomethingEnabled"),
///            "crate_dummy_status_something_enabled");
/// ```
pub fn camel_case_to_lower(name: &str) -> String {
    let safe = safe_name(name);
    SNAKE_CASE_PATTERN
        .replace_all(&safe, "${1}_${2}")
        .to_lowercase()
}

/// Join name components with [`SEP`], skipping empty ones
pub fn join_components<'a>(components: impl IntoIterator<Item = &'a str>) -> String {
    let mut name = String::new();
    for component in components.into_iter().filter(|c| !c.is_empty()) {
        if !name.is_empty() {
            name.push(SEP);
        }
        name.push_str(component);
    }
    name
}

/// Render ordered key properties as `<k=v, k=v>`
///
/// Help text must not contain `[]` or `()` around the property map.
pub fn angle_brackets(properties: &[(String, String)]) -> String {
    let inner = properties
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ");
    format!("<{}>", inner)
}
