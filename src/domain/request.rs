use std::time::Duration;

use crate::domain::validation::ValidationError;
use crate::domain::value::{MessageText, RawPhoneNumber};

/// Cleanup flag used when neither the caller nor the stored entry sets one.
pub const DEFAULT_CLEANUP_UTF8: bool = true;

/// SMSAlert API generation used by a client.
///
/// The two generations are never mixed: a client talks to exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    /// `POST /api/v2/message/send`, Basic auth header and JSON body.
    #[default]
    V2,
    /// `POST /api/sms/sendBulk`, credentials inside a form-encoded body.
    LegacyBulk,
}

impl ApiVersion {
    /// Path appended to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::V2 => "/api/v2/message/send",
            Self::LegacyBulk => "/api/sms/sendBulk",
        }
    }

    /// Upper bound for one request, including reading the response body.
    pub fn default_timeout(self) -> Duration {
        match self {
            Self::V2 => Duration::from_secs(10),
            Self::LegacyBulk => Duration::from_secs(5),
        }
    }
}

/// One outbound SMS: a single destination, a message and the cleanup flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    phone_number: RawPhoneNumber,
    message: MessageText,
    cleanup_utf8: bool,
}

impl SendRequest {
    pub fn new(phone_number: RawPhoneNumber, message: MessageText, cleanup_utf8: bool) -> Self {
        Self {
            phone_number,
            message,
            cleanup_utf8,
        }
    }

    /// Validate loosely-typed inputs into a request.
    ///
    /// The phone number is checked first, so a call missing both reports the phone number.
    pub fn parse(
        phone_number: impl Into<String>,
        message: impl Into<String>,
        cleanup_utf8: bool,
    ) -> Result<Self, ValidationError> {
        let phone_number = RawPhoneNumber::new(phone_number)?;
        let message = MessageText::new(message)?;
        Ok(Self::new(phone_number, message, cleanup_utf8))
    }

    pub fn phone_number(&self) -> &RawPhoneNumber {
        &self.phone_number
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }

    pub fn cleanup_utf8(&self) -> bool {
        self.cleanup_utf8
    }
}

/// Resolve the effective cleanup flag.
///
/// Precedence: per-call override, then stored options, then stored entry data, then
/// [`DEFAULT_CLEANUP_UTF8`].
pub fn resolve_cleanup_utf8(
    call_override: Option<bool>,
    options: Option<bool>,
    data: Option<bool>,
) -> bool {
    call_override
        .or(options)
        .or(data)
        .unwrap_or(DEFAULT_CLEANUP_UTF8)
}
