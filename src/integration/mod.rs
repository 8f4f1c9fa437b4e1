//! Integration layer: config entries, setup/options flows, and the service adapters a
//! home-automation host invokes.
//!
//! [`Integration`] owns the set of active entries. The `send_sms` service is registered
//! with the host when the first entry is set up and removed when the last one unloads.

mod entry;
mod flow;
mod notify;
mod payload;
mod service;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use entry::{ConfigEntry, EntryData, EntryOptions, unique_id_for};
pub use flow::{
    AbortReason, ConfigFlow, FieldKind, FlowResult, FormField, FormSchema, NewEntry, OptionsFlow,
    OptionsInput, UserInput,
};
pub use notify::{NotifyCall, NotifyService};
pub use payload::{Destination, Dispatch, SkipReason};
pub use service::{SendSmsService, ServiceCallError, ServiceData};

use crate::client::{
    DEFAULT_BASE_URL, HttpTransport, ReqwestTransport, SmsAlertClient, endpoint_url,
};
use crate::domain::{ApiVersion, ValidationError};

pub const DOMAIN: &str = "smsalert";
pub const SERVICE_SEND_SMS: &str = "send_sms";
pub const DEFAULT_TITLE: &str = "SMSAlert";

/// Service registry of the embedding host.
pub trait ServiceHost {
    fn register_service(&mut self, domain: &'static str, service: &'static str);
    fn remove_service(&mut self, domain: &'static str, service: &'static str);
}

struct ActiveEntry {
    client: SmsAlertClient,
    entry: ConfigEntry,
}

impl ActiveEntry {
    fn cleanup_utf8_default(&self) -> bool {
        self.entry.cleanup_utf8_default()
    }
}

/// Setup/teardown lifecycle for all SMSAlert entries of one host.
pub struct Integration<H: ServiceHost> {
    host: H,
    http: Arc<dyn HttpTransport>,
    api_version: ApiVersion,
    endpoint: String,
    entries: BTreeMap<String, ActiveEntry>,
}

impl<H: ServiceHost> Integration<H> {
    /// Create an integration that sends through the host's shared HTTP client.
    pub fn new(host: H, http_client: reqwest::Client) -> Self {
        Self::with_transport(host, Arc::new(ReqwestTransport::new(http_client)))
    }

    pub(crate) fn with_transport(host: H, http: Arc<dyn HttpTransport>) -> Self {
        let api_version = ApiVersion::default();
        Self {
            host,
            http,
            api_version,
            endpoint: format!("{DEFAULT_BASE_URL}{}", api_version.path()),
            entries: BTreeMap::new(),
        }
    }

    /// Use another API generation (and optionally another base URL) for entries set up
    /// from now on.
    pub fn with_api(
        mut self,
        api_version: ApiVersion,
        base_url: Option<&str>,
    ) -> Result<Self, ValidationError> {
        self.endpoint = endpoint_url(base_url.unwrap_or(DEFAULT_BASE_URL), api_version)?;
        self.api_version = api_version;
        Ok(self)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn active_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn is_active(&self, entry_id: &str) -> bool {
        self.entries.contains_key(entry_id)
    }

    /// Activate an entry. Setting up an already active entry replaces it.
    pub fn setup_entry(&mut self, entry: &ConfigEntry) -> Result<(), ValidationError> {
        let credentials = entry.data.credentials()?;
        let client = SmsAlertClient::from_parts(
            credentials,
            self.api_version,
            self.endpoint.clone(),
            self.api_version.default_timeout(),
            Arc::clone(&self.http),
        );

        let was_empty = self.entries.is_empty();
        self.entries.insert(
            entry.entry_id.clone(),
            ActiveEntry {
                client,
                entry: entry.clone(),
            },
        );
        tracing::debug!(entry_id = %entry.entry_id, "SMSAlert entry set up");

        if was_empty {
            tracing::info!(domain = DOMAIN, service = SERVICE_SEND_SMS, "registering service");
            self.host.register_service(DOMAIN, SERVICE_SEND_SMS);
        }
        Ok(())
    }

    /// Deactivate an entry. Returns `false` if it was not active.
    pub fn unload_entry(&mut self, entry_id: &str) -> bool {
        if self.entries.remove(entry_id).is_none() {
            tracing::warn!(entry_id, "unload requested for inactive SMSAlert entry");
            return false;
        }
        tracing::debug!(entry_id, "SMSAlert entry unloaded");

        if self.entries.is_empty() {
            tracing::info!(domain = DOMAIN, service = SERVICE_SEND_SMS, "removing service");
            self.host.remove_service(DOMAIN, SERVICE_SEND_SMS);
        }
        true
    }

    /// Store edited options. Returns `false` if the entry is not active.
    pub fn update_options(&mut self, entry_id: &str, options: EntryOptions) -> bool {
        match self.entries.get_mut(entry_id) {
            Some(active) => {
                active.entry.options = options;
                true
            }
            None => false,
        }
    }

    pub fn notify_service(&self, entry_id: &str) -> Option<NotifyService> {
        self.entries.get(entry_id).map(|active| {
            NotifyService::new(
                entry_id,
                active.client.clone(),
                active.cleanup_utf8_default(),
            )
        })
    }

    /// Handler for `entry_id`, or for the first active entry when `None`.
    pub fn send_sms_service(
        &self,
        entry_id: Option<&str>,
    ) -> Result<SendSmsService, ServiceCallError> {
        let (entry_id, active) = match entry_id {
            Some(entry_id) => self.entries.get_key_value(entry_id).ok_or_else(|| {
                ServiceCallError::UnknownEntry {
                    entry_id: entry_id.to_owned(),
                }
            })?,
            None => self
                .entries
                .iter()
                .next()
                .ok_or(ServiceCallError::NotConfigured)?,
        };
        Ok(SendSmsService::new(
            entry_id.as_str(),
            active.client.clone(),
            active.cleanup_utf8_default(),
        ))
    }

    /// Dispatch a `smsalert.send_sms` call; `config_entry_id` in the payload picks the entry.
    pub async fn call_send_sms(&self, data: &ServiceData) -> Result<Dispatch, ServiceCallError> {
        let entry_id = data
            .get("config_entry_id")
            .and_then(serde_json::Value::as_str);
        let handler = self.send_sms_service(entry_id)?;
        handler.call(data).await
    }
}
