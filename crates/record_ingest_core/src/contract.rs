use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const SUCCESS_MESSAGE: &str = "Successfully inserted data!";
pub const DEFAULT_YEAR: i64 = 2012;
pub const DEFAULT_TITLE: &str = "The Amazing Spider-Man 2";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub year: i64,
    pub title: String,
    pub id: String,
}

impl Record {
    /// Record written when a request arrives without a body.
    pub fn with_defaults(id: impl Into<String>) -> Self {
        Self {
            year: DEFAULT_YEAR,
            title: DEFAULT_TITLE.to_string(),
            id: id.into(),
        }
    }

    pub fn year_text(&self) -> String {
        self.year.to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessBody {
    pub message: String,
}

impl SuccessBody {
    pub fn inserted() -> Self {
        Self {
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn parse_record(body: &str) -> Result<Record, ValidationError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|error| ValidationError::new(format!("Malformed JSON body: {error}")))?;
    record_from_value(&value)
}

/// Validates an already-decoded body. Extra fields are ignored.
pub fn record_from_value(value: &Value) -> Result<Record, ValidationError> {
    let Some(object) = value.as_object() else {
        return Err(ValidationError::new("Request body must be a JSON object"));
    };

    let year = coerce_year(required_field(object, "year")?)?;
    let title = coerce_text(required_field(object, "title")?, "title")?;
    let id = coerce_text(required_field(object, "id")?, "id")?;

    if id.is_empty() {
        return Err(ValidationError::new("Field 'id' cannot be empty"));
    }

    Ok(Record { year, title, id })
}

fn required_field<'a>(
    object: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a Value, ValidationError> {
    match object.get(name) {
        Some(Value::Null) | None => Err(ValidationError::new(format!(
            "Missing required field '{name}'"
        ))),
        Some(value) => Ok(value),
    }
}

fn coerce_year(value: &Value) -> Result<i64, ValidationError> {
    let parsed = match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::new("Field 'year' must be an integer"))
}

fn coerce_text(value: &Value, name: &str) -> Result<String, ValidationError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(true) => Ok("True".to_string()),
        Value::Bool(false) => Ok("False".to_string()),
        _ => Err(ValidationError::new(format!("Field '{name}' must be a string"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_complete_body() {
        let record = parse_record(r#"{"year":2012,"title":"X","id":"abc"}"#)
            .expect("body should parse");

        assert_eq!(
            record,
            Record {
                year: 2012,
                title: "X".to_string(),
                id: "abc".to_string(),
            }
        );
        assert_eq!(record.year_text(), "2012");
    }

    #[test]
    fn rejects_missing_title() {
        let error = parse_record(r#"{"year":2012,"id":"abc"}"#).expect_err("title is required");
        assert_eq!(error.message(), "Missing required field 'title'");
    }

    #[test]
    fn null_counts_as_missing() {
        let error = record_from_value(&json!({"year": null, "title": "X", "id": "abc"}))
            .expect_err("null year should fail");
        assert_eq!(error.message(), "Missing required field 'year'");
    }

    #[test]
    fn coerces_year_text_and_numeric_identifiers() {
        let record = record_from_value(&json!({"year": " 1999 ", "title": 42, "id": 7}))
            .expect("coercible body should parse");

        assert_eq!(record.year, 1999);
        assert_eq!(record.title, "42");
        assert_eq!(record.id, "7");
    }

    #[test]
    fn rejects_fractional_year() {
        let error = record_from_value(&json!({"year": 2012.5, "title": "X", "id": "abc"}))
            .expect_err("fractional year should fail");
        assert_eq!(error.message(), "Field 'year' must be an integer");
    }

    #[test]
    fn rejects_structured_title() {
        let error = record_from_value(&json!({"year": 2012, "title": ["X"], "id": "abc"}))
            .expect_err("array title should fail");
        assert_eq!(error.message(), "Field 'title' must be a string");
    }

    #[test]
    fn rejects_empty_id_but_keeps_whitespace_id() {
        let error = record_from_value(&json!({"year": 2012, "title": "X", "id": ""}))
            .expect_err("empty id should fail");
        assert_eq!(error.message(), "Field 'id' cannot be empty");

        let record = record_from_value(&json!({"year": 2012, "title": "X", "id": " "}))
            .expect("whitespace id is a valid key");
        assert_eq!(record.id, " ");
    }

    #[test]
    fn booleans_use_capitalized_text() {
        let record = record_from_value(&json!({"year": 2012, "title": true, "id": false}))
            .expect("boolean fields should coerce");
        assert_eq!(record.title, "True");
        assert_eq!(record.id, "False");
    }

    #[test]
    fn rejects_non_object_and_malformed_bodies() {
        let error = parse_record("[1,2,3]").expect_err("array body should fail");
        assert_eq!(error.message(), "Request body must be a JSON object");

        let error = parse_record("{\"year\":").expect_err("truncated body should fail");
        assert!(error.message().starts_with("Malformed JSON body"));
    }

    #[test]
    fn ignores_unknown_fields() {
        let record = record_from_value(&json!({
            "year": 2012,
            "title": "X",
            "id": "abc",
            "rating": 5
        }))
        .expect("extra fields should be ignored");
        assert_eq!(record.id, "abc");
    }

    #[test]
    fn default_record_uses_fixed_year_and_title() {
        let record = Record::with_defaults("generated");
        assert_eq!(record.year_text(), "2012");
        assert_eq!(record.title, "The Amazing Spider-Man 2");
        assert_eq!(record.id, "generated");
    }
}
