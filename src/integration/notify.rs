use serde::Deserialize;
use serde_json::{Map, Value};

use super::payload::{Destination, Dispatch, SkipReason, coerce_bool};
use crate::client::SmsAlertClient;
use crate::domain::resolve_cleanup_utf8;

/// Payload of a generic notify call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyCall {
    #[serde(default)]
    pub message: String,
    /// A single number or a list holding exactly one number.
    #[serde(default)]
    pub target: Option<Value>,
    /// Extra fields: `phoneNumber` and `cleanupUtf8`.
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

/// Notify service bound to one config entry.
///
/// Failures are logged and reported through [`Dispatch`], never raised: a notification has
/// no synchronous failure channel back to whoever fired it.
#[derive(Clone)]
pub struct NotifyService {
    entry_id: String,
    client: SmsAlertClient,
    cleanup_utf8_default: bool,
}

impl NotifyService {
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

    pub async fn send_message(&self, call: NotifyCall) -> Dispatch {
        let data = call.data.unwrap_or_default();

        let phone_number = Destination::from_values(data.get("phoneNumber"), call.target.as_ref())
            .ok_or(SkipReason::MissingPhoneNumber)
            .and_then(Destination::into_phone_number);
        let phone_number = match phone_number {
            Ok(phone_number) => phone_number,
            Err(reason) => {
                tracing::error!(
                    entry_id = %self.entry_id,
                    ?reason,
                    "SMSAlert notify call needs exactly one target"
                );
                return Dispatch::Skipped(reason);
            }
        };

        let cleanup_utf8 = resolve_cleanup_utf8(
            coerce_bool("cleanupUtf8", data.get("cleanupUtf8")),
            Some(self.cleanup_utf8_default),
            None,
        );

        match self
            .client
            .send_sms(&phone_number, &call.message, cleanup_utf8)
            .await
        {
            Ok(()) => Dispatch::Sent,
            Err(err) => {
                tracing::error!(entry_id = %self.entry_id, error = %err, "SMSAlert notify failed");
                Dispatch::Failed(err)
            }
        }
    }
}
