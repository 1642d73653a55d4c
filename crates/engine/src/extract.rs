//! Shapes a fetched payload into the scalar values of one route level.

use anyhow::anyhow;
use routegen_types::ParameterConfig;
use routegen_util::deep_get;
use serde_json::Value;

use crate::error::ExpandError;

/// Extract the ordered route-segment values for `param` from `payload`.
///
/// 1. A programmatic results handler (or, failing that, `results_path`)
///    replaces the payload.
/// 2. Without `property` the payload must already be a list of scalars.
/// 3. With `property` each row contributes the value at that dotted path;
///    missing paths yield `null` rather than an error.
pub fn extract_scalars(param: &str, payload: Value, config: &ParameterConfig) -> Result<Vec<Value>, ExpandError> {
    let payload = apply_results_handler(param, payload, config)?;
    let Value::Array(rows) = payload else {
        return Err(ExpandError::Shape {
            param: param.to_string(),
            found: json_kind(&payload),
        });
    };

    let Some(property) = config.property.as_deref() else {
        return Ok(rows);
    };
    Ok(rows
        .iter()
        .map(|row| deep_get(property, row).cloned().unwrap_or(Value::Null))
        .collect())
}

fn apply_results_handler(param: &str, payload: Value, config: &ParameterConfig) -> Result<Value, ExpandError> {
    if let Some(handler) = config.results_handler.as_ref() {
        return handler.apply(payload).map_err(|source| ExpandError::Transform {
            param: param.to_string(),
            source,
        });
    }
    match config.results_path.as_deref() {
        Some(path) => deep_get(path, &payload).cloned().ok_or_else(|| ExpandError::Transform {
            param: param.to_string(),
            source: anyhow!("results path '{}' not found in payload", path),
        }),
        None => Ok(payload),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ParameterConfig {
        ParameterConfig::new("https://cms.local/graphql", "")
    }

    #[test]
    fn scalar_lists_pass_through_without_property() {
        let values = extract_scalars("cat", json!(["tech", "life"]), &config()).expect("scalars");
        assert_eq!(values, vec![json!("tech"), json!("life")]);
    }

    #[test]
    fn property_selects_from_each_row() {
        let payload = json!([{ "data": { "id": "1" } }, { "data": { "id": "2" } }]);
        let values = extract_scalars("id", payload, &config().with_property("data.id")).expect("scalars");
        assert_eq!(values, vec![json!("1"), json!("2")]);
    }

    #[test]
    fn missing_property_yields_null_per_row() {
        let payload = json!([{ "slug": "a" }, { "title": "no slug" }]);
        let values = extract_scalars("slug", payload, &config().with_property("slug")).expect("scalars");
        assert_eq!(values, vec![json!("a"), Value::Null]);
    }

    #[test]
    fn results_handler_runs_before_property() {
        let config = config()
            .with_property("slug")
            .with_results_handler(|payload| Ok(payload["data"]["articles"].clone()));
        let payload = json!({ "data": { "articles": [{ "slug": "x" }, { "slug": "y" }] } });
        let values = extract_scalars("slug", payload, &config).expect("scalars");
        assert_eq!(values, vec![json!("x"), json!("y")]);
    }

    #[test]
    fn results_handler_errors_propagate_unchanged() {
        let config = config().with_results_handler(|_| Err(anyhow!("malformed payload")));
        let err = extract_scalars("slug", json!([]), &config).expect_err("handler fails");
        match err {
            ExpandError::Transform { param, source } => {
                assert_eq!(param, "slug");
                assert_eq!(source.to_string(), "malformed payload");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn results_path_plucks_wrapped_rows() {
        let config = config().with_results_path("data.categories").with_property("slug");
        let payload = json!({ "data": { "categories": [{ "slug": "tech" }] } });
        let values = extract_scalars("cat", payload, &config).expect("scalars");
        assert_eq!(values, vec![json!("tech")]);
    }

    #[test]
    fn non_list_payload_is_a_shape_error() {
        let err = extract_scalars("cat", json!({ "data": [] }), &config()).expect_err("object payload");
        assert!(matches!(err, ExpandError::Shape { found: "object", .. }));
    }
}
