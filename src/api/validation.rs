use actix_web::{error::InternalError, Error, HttpResponse};
use serde::Serialize;
use validator::ValidationErrors;

/// Error envelope shared by every endpoint
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

fn bad_request(error: &str, fields: serde_json::Value) -> Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        fields,
    });
    InternalError::from_response("", response).into()
}

/// Collect per-field messages, plus struct-level ones under `__all__`
fn field_messages(errors: &ValidationErrors) -> serde_json::Value {
    let fields: serde_json::Map<String, serde_json::Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
                .collect();
            (field.to_string(), serde_json::json!({ "errors": messages }))
        })
        .collect();

    serde_json::Value::Object(fields)
}

fn to_bad_request(err: actix_web_validator::Error) -> Error {
    match err {
        actix_web_validator::Error::Validate(errors) => {
            bad_request("Validation failed", field_messages(&errors))
        }
        actix_web_validator::Error::Deserialize(de_err) => {
            let message = de_err.to_string();
            let message = if message.contains("EOF while parsing") {
                "Request body is empty. Expected JSON payload".to_string()
            } else {
                message
            };
            bad_request(
                "Request validation failed",
                serde_json::json!({ "message": message }),
            )
        }
        other => bad_request(
            "Validation failed",
            serde_json::json!({ "message": other.to_string() }),
        ),
    }
}

/// JSON body extractor config with the shared error envelope
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| to_bad_request(err))
}

/// Query string extractor config with the shared error envelope
pub fn query_config() -> actix_web_validator::QueryConfig {
    actix_web_validator::QueryConfig::default().error_handler(|err, _req| to_bad_request(err))
}
