//! Query evaluation.

use serde_json::Value;

use crate::error::{Error, Result};

/// Evaluates a query expression against a decoded JSON document.
pub trait QueryEngine {
    /// # Errors
    ///
    /// Returns [`Error::Query`] if the expression does not parse or fails
    /// during evaluation.
    fn evaluate(&self, expression: &str, data: &Value) -> Result<Value>;
}

/// JMESPath evaluation backed by the `jmespath` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct Jmespath;

impl QueryEngine for Jmespath {
    fn evaluate(&self, expression: &str, data: &Value) -> Result<Value> {
        let query_error = |message: String| Error::Query {
            expression: expression.to_string(),
            message,
        };
        let compiled = jmespath::compile(expression).map_err(|err| query_error(err.to_string()))?;
        let result = compiled
            .search(data.clone())
            .map_err(|err| query_error(err.to_string()))?;
        serde_json::to_value(&*result).map_err(|err| query_error(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn eval(expression: &str, data: &Value) -> Result<Value> {
        Jmespath.evaluate(expression, data)
    }

    #[test]
    fn test_index_expression() {
        let data = json!({"a": [1, 2, 3]});
        assert_eq!(eval("a[1]", &data).unwrap(), json!(2));
    }

    #[test]
    fn test_projection_and_filter() {
        let data = json!({
            "people": [
                {"name": "ann", "age": 31},
                {"name": "bo", "age": 19},
                {"name": "cy", "age": 44}
            ]
        });
        assert_eq!(
            eval("people[?age > `30`].name", &data).unwrap(),
            json!(["ann", "cy"])
        );
    }

    #[test]
    fn test_missing_field_is_null() {
        assert_eq!(eval("nope", &json!({"a": 1})).unwrap(), Value::Null);
    }

    #[test]
    fn test_syntax_error_is_query_error() {
        let err = eval("a[", &json!({})).unwrap_err();
        match err {
            Error::Query { expression, .. } => assert_eq!(expression, "a["),
            other => panic!("expected query error, got {other:?}"),
        }
    }

    #[test]
    fn test_runtime_type_error_is_query_error() {
        let err = eval("abs(a)", &json!({"a": "text"})).unwrap_err();
        assert!(matches!(err, Error::Query { .. }));
    }
}
