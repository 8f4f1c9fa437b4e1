use serde::Deserialize;

use crate::domain::{ApiErrorDetail, Credentials, SendRequest};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct BulkErrorJsonResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "errorCode")]
    error_code: Option<BulkErrorCode>,
}

/// SMSAlert sends `errorCode` either as a string or as a bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BulkErrorCode {
    Text(String),
    Number(serde_json::Number),
}

impl BulkErrorCode {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

pub fn encode_send_bulk_form(
    credentials: &Credentials,
    request: &SendRequest,
) -> Vec<(String, String)> {
    vec![
        (
            "username".to_owned(),
            credentials.username().as_str().to_owned(),
        ),
        ("apiKey".to_owned(), credentials.api_key().as_str().to_owned()),
        ("tel".to_owned(), request.phone_number().raw().to_owned()),
        ("message".to_owned(), request.message().as_str().to_owned()),
        (
            "cleanupUtf8".to_owned(),
            if request.cleanup_utf8() { "1" } else { "0" }.to_owned(),
        ),
    ]
}

pub fn decode_send_bulk_error_json(json: &str) -> Result<ApiErrorDetail, TransportError> {
    let parsed: BulkErrorJsonResponse = serde_json::from_str(json)?;
    Ok(ApiErrorDetail {
        message: parsed.message,
        error_code: parsed.error_code.map(BulkErrorCode::into_string),
    })
}
