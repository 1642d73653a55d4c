//! `{{ placeholder }}` template rendering and scalar formatting.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z_$][\w$-]*)\s*\}\}").expect("placeholder regex should compile"));

/// Substitute `{{ name }}` tokens with values from `context`.
///
/// Strings are inserted verbatim, other scalars as their JSON text. Tokens
/// naming keys absent from `context` are left untouched.
///
/// # Examples
/// ```rust
/// use routegen_util::render_template;
/// use serde_json::{Map, json};
///
/// let mut context = Map::new();
/// context.insert("cat".into(), json!("tech"));
/// context.insert("page".into(), json!(2));
///
/// let rendered = render_template("/api/{{cat}}/posts?page={{ page }}&q={{missing}}", &context);
/// assert_eq!(rendered, "/api/tech/posts?page=2&q={{missing}}");
/// ```
pub fn render_template(template: &str, context: &Map<String, Value>) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| match context.get(&caps[1]) {
            Some(value) => scalar_text(value),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names of every placeholder referenced by `template`, in order of appearance.
pub fn template_placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER_REGEX
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Render a JSON value as route or template text.
///
/// `null` renders as the empty string so absent property lookups never leak
/// a literal `null` into paths.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
