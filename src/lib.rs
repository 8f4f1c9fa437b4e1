//! Typed Rust client and notification integration for the SMSAlert HTTP API.
//!
//! The crate is layered: a domain layer of strong types, a transport layer for wire-format
//! quirks, a small client layer issuing one POST per SMS, and an integration layer that
//! adapts host service calls and config entries onto the client.
//!
//! ```rust,no_run
//! use smsalert::{Credentials, SmsAlertClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SmsAlertClient::new(Credentials::new("user", "api-key")?);
//!     client.send_sms("+40700000000", "hello", true).await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod integration;
mod transport;

pub use client::{
    BuildError, DEFAULT_BASE_URL, SendError, SmsAlertClient, SmsAlertClientBuilder,
    SmsAlertError,
};
pub use domain::{
    ApiErrorDetail, ApiKey, ApiVersion, Credentials, DEFAULT_CLEANUP_UTF8, MessageText,
    PhoneNumber, RawPhoneNumber, SendRequest, Username, ValidationError, resolve_cleanup_utf8,
};
pub use integration::{
    ConfigEntry, ConfigFlow, Dispatch, Integration, NotifyCall, NotifyService, OptionsFlow,
    SendSmsService, ServiceCallError, ServiceHost,
};
