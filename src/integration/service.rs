use serde_json::{Map, Value};

use super::payload::{Destination, Dispatch, SkipReason, coerce_bool};
use crate::client::{SmsAlertClient, SmsAlertError};
use crate::domain::resolve_cleanup_utf8;

/// Flat payload of a `smsalert.send_sms` service call.
pub type ServiceData = Map<String, Value>;

/// Error surfaced to the host so its UI can show the failure.
#[derive(Debug, thiserror::Error)]
pub enum ServiceCallError {
    #[error("no SMSAlert account is configured")]
    NotConfigured,

    #[error("unknown SMSAlert config entry: {entry_id}")]
    UnknownEntry { entry_id: String },

    #[error("failed to send SMS: {0}")]
    Failed(#[source] SmsAlertError),
}

/// `send_sms` handler bound to one config entry.
#[derive(Clone)]
pub struct SendSmsService {
    entry_id: String,
    client: SmsAlertClient,
    cleanup_utf8_default: bool,
}

impl SendSmsService {
    pub(crate) fn new(
        entry_id: impl Into<String>,
        client: SmsAlertClient,
        cleanup_utf8_default: bool,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            client,
            cleanup_utf8_default,
        }
    }

    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }

    /// Handle one call.
    ///
    /// A missing phone number is logged and skipped; send failures are returned as
    /// [`ServiceCallError::Failed`].
    pub async fn call(&self, data: &ServiceData) -> Result<Dispatch, ServiceCallError> {
        let explicit = data.get("phoneNumber").or_else(|| data.get("phone_number"));
        let phone_number = Destination::from_values(explicit, data.get("target"))
            .ok_or(SkipReason::MissingPhoneNumber)
            .and_then(Destination::into_phone_number);
        let phone_number = match phone_number {
            Ok(phone_number) => phone_number,
            Err(reason) => {
                tracing::error!(
                    entry_id = %self.entry_id,
                    ?reason,
                    "SMSAlert send_sms called without a usable phone number"
                );
                return Ok(Dispatch::Skipped(reason));
            }
        };

        let message = data.get("message").and_then(Value::as_str).unwrap_or_default();
        let cleanup_utf8 = resolve_cleanup_utf8(
            coerce_bool("cleanupUtf8", data.get("cleanupUtf8")),
            Some(self.cleanup_utf8_default),
            None,
        );

        self.client
            .send_sms(&phone_number, message, cleanup_utf8)
            .await
            .map(|()| Dispatch::Sent)
            .map_err(|err| {
                tracing::error!(entry_id = %self.entry_id, error = %err, "SMSAlert send_sms failed");
                ServiceCallError::Failed(err)
            })
    }
}
