use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

use crate::domain::{Credentials, SendRequest};

/// `Authorization` header value for the v2 API (`Basic base64(username:api_key)`).
pub fn encode_basic_auth(credentials: &Credentials) -> String {
    let token = format!(
        "{}:{}",
        credentials.username().as_str(),
        credentials.api_key().as_str()
    );
    format!("Basic {}", BASE64.encode(token))
}

pub fn encode_send_v2_json(request: &SendRequest) -> serde_json::Value {
    json!({
        "phoneNumber": request.phone_number().raw(),
        "message": request.message().as_str(),
        "cleanupUtf8": request.cleanup_utf8(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_matches_rfc7617_example() {
        let creds = Credentials::new("Aladdin", "open sesame").unwrap();
        assert_eq!(
            encode_basic_auth(&creds),
            "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
        );
    }

    #[test]
    fn json_body_uses_camel_case_keys() {
        let request = SendRequest::parse("+40700000000", "hello", false).unwrap();
        assert_eq!(
            encode_send_v2_json(&request),
            json!({
                "phoneNumber": "+40700000000",
                "message": "hello",
                "cleanupUtf8": false,
            })
        );
    }

    #[test]
    fn json_body_does_not_carry_credentials() {
        let request = SendRequest::parse("+40700000000", "hello", true).unwrap();
        let body = encode_send_v2_json(&request);
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert!(!object.contains_key("apiKey"));
    }
}
