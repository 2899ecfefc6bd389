use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::adapters::ids::IdGenerator;
use crate::adapters::record_store::{RecordStore, StoreError};
use crate::runtime::contract::{
    parse_record, record_from_value, ErrorBody, Record, SuccessBody, ValidationError,
};
use crate::runtime::TABLE_NAME_ENV;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    #[error("{0}")]
    ClientInput(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("{0}")]
    Configuration(String),
}

impl InsertError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ClientInput(_) => 400,
            Self::Storage(_) | Self::Configuration(_) => 500,
        }
    }

    /// Message returned to the caller. Storage details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::ClientInput(message) | Self::Configuration(message) => message.clone(),
            Self::Storage(_) => "Failed to insert data".to_string(),
        }
    }
}

impl From<ValidationError> for InsertError {
    fn from(error: ValidationError) -> Self {
        Self::ClientInput(error.message().to_string())
    }
}

pub fn handle_insert_event(
    event: Value,
    table_name: Option<&str>,
    store: &impl RecordStore,
    ids: &impl IdGenerator,
) -> ApiGatewayResponse {
    match insert_record(&event, table_name, store, ids) {
        Ok(record) => {
            info!(record_id = %record.id, status_code = 200, "inserted record");
            success_response(200, SuccessBody::inserted())
        }
        Err(failure) => {
            let status_code = failure.status_code();
            match &failure {
                InsertError::ClientInput(reason) => {
                    warn!(status_code, reason = %reason, "rejected request body");
                }
                InsertError::Storage(source) => {
                    error!(status_code, error = %source, "record write failed");
                }
                InsertError::Configuration(reason) => {
                    error!(status_code, reason = %reason, "handler is misconfigured");
                }
            }
            error_response(
                status_code,
                ErrorBody {
                    error: failure.public_message(),
                },
            )
        }
    }
}

fn insert_record(
    event: &Value,
    table_name: Option<&str>,
    store: &impl RecordStore,
    ids: &impl IdGenerator,
) -> Result<Record, InsertError> {
    let table = match table_name {
        Some(value) if !value.trim().is_empty() => value,
        _ => {
            return Err(InsertError::Configuration(format!(
                "{TABLE_NAME_ENV} must be configured"
            )));
        }
    };
    info!(table, "loaded table name from environment");

    let record = match request_body(event)? {
        Some(RequestBody::Text(text)) => {
            info!(payload = %text, "received payload");
            parse_record(&text)?
        }
        Some(RequestBody::Inline(value)) => {
            info!(payload = %value, "received payload");
            record_from_value(value)?
        }
        None => {
            info!("received request without a payload");
            Record::with_defaults(ids.next_id())
        }
    };

    store.put_record(table, &record)?;
    Ok(record)
}

enum RequestBody<'a> {
    Text(String),
    Inline(&'a Value),
}

/// `None` when the event carries no body: key absent, null, or empty string.
fn request_body(event: &Value) -> Result<Option<RequestBody<'_>>, InsertError> {
    let Some(object) = event.as_object() else {
        return Err(InsertError::ClientInput(
            "Request payload must be a JSON object".to_string(),
        ));
    };

    let base64_encoded = object
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    match object.get("body") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.is_empty() => Ok(None),
        Some(Value::String(text)) if base64_encoded => {
            decode_base64_body(text).map(|decoded| Some(RequestBody::Text(decoded)))
        }
        Some(Value::String(text)) => Ok(Some(RequestBody::Text(text.clone()))),
        Some(value @ Value::Object(_)) => Ok(Some(RequestBody::Inline(value))),
        Some(_) => Err(InsertError::ClientInput(
            "Request body must be a JSON object".to_string(),
        )),
    }
}

fn decode_base64_body(encoded: &str) -> Result<String, InsertError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|error| InsertError::ClientInput(format!("Malformed base64 body: {error}")))?;
    String::from_utf8(bytes)
        .map_err(|_| InsertError::ClientInput("Request body must be UTF-8".to_string()))
}

fn success_response(status_code: u16, payload: SuccessBody) -> ApiGatewayResponse {
    json_response(status_code, payload)
}

fn error_response(status_code: u16, payload: ErrorBody) -> ApiGatewayResponse {
    json_response(status_code, payload)
}

fn json_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body: serde_json::to_string(&payload).expect("response payload should serialize"),
    }
}
