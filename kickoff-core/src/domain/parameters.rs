//! Build parameters

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Errors raised while reading build parameters
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("parameters are not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("parameters must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("parameter '{0}' must be a string, number or boolean")]
    UnsupportedValue(String),
}

/// String parameters submitted with a trigger
///
/// Empty parameters select the parameterless build endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobParameters(BTreeMap<String, String>);

impl JobParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object such as `{"BRANCH": "main", "RETRIES": 3}`
    ///
    /// Numbers and booleans are sent as their JSON text, `null` as an empty
    /// string. Nested arrays and objects cannot be form-encoded and are
    /// rejected.
    pub fn from_json(input: &str) -> Result<Self, ParameterError> {
        let value: JsonValue = serde_json::from_str(input)?;
        let object = match value {
            JsonValue::Object(map) => map,
            JsonValue::Array(_) => return Err(ParameterError::NotAnObject("an array")),
            JsonValue::String(_) => return Err(ParameterError::NotAnObject("a string")),
            JsonValue::Number(_) => return Err(ParameterError::NotAnObject("a number")),
            JsonValue::Bool(_) => return Err(ParameterError::NotAnObject("a boolean")),
            JsonValue::Null => return Err(ParameterError::NotAnObject("null")),
        };

        let mut params = BTreeMap::new();
        for (key, value) in object {
            let text = match value {
                JsonValue::String(s) => s,
                JsonValue::Number(n) => n.to_string(),
                JsonValue::Bool(b) => b.to_string(),
                JsonValue::Null => String::new(),
                JsonValue::Array(_) | JsonValue::Object(_) => {
                    return Err(ParameterError::UnsupportedValue(key));
                }
            };
            params.insert(key, text);
        }

        Ok(Self(params))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for JobParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object() {
        let params = JobParameters::from_json("{}").unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_scalars_are_stringified() {
        let params =
            JobParameters::from_json(r#"{"BRANCH":"main","RETRIES":3,"DRY_RUN":true,"NOTE":null}"#)
                .unwrap();
        assert_eq!(params.len(), 4);
        assert_eq!(params.get("BRANCH"), Some("main"));
        assert_eq!(params.get("RETRIES"), Some("3"));
        assert_eq!(params.get("DRY_RUN"), Some("true"));
        assert_eq!(params.get("NOTE"), Some(""));
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            JobParameters::from_json(r#"["a"]"#),
            Err(ParameterError::NotAnObject(_))
        ));
        assert!(matches!(
            JobParameters::from_json("not json"),
            Err(ParameterError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_rejects_nested_values() {
        let err = JobParameters::from_json(r#"{"TAGS":["a","b"]}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "parameter 'TAGS' must be a string, number or boolean"
        );
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let params: JobParameters = [("A", "1"), ("B", "x")].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"A":"1","B":"x"}"#
        );
    }
}
