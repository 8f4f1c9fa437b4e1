use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DEFAULT_TITLE, DOMAIN};
use crate::domain::{Credentials, Username, ValidationError, resolve_cleanup_utf8};

/// Credentials persisted in the host's entry store.
///
/// `cleanup_utf8` only appears in entries written by older releases; newer ones keep it in
/// [`EntryOptions`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryData {
    pub username: String,
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup_utf8: Option<bool>,
}

impl EntryData {
    pub fn credentials(&self) -> Result<Credentials, ValidationError> {
        Credentials::new(self.username.as_str(), self.api_key.as_str())
    }
}

impl fmt::Debug for EntryData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryData")
            .field("username", &self.username)
            .field("api_key", &"***")
            .field("cleanup_utf8", &self.cleanup_utf8)
            .finish()
    }
}

/// Options editable after setup without re-entering credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup_utf8: Option<bool>,
}

/// One configured SMSAlert account as stored by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: String,
    pub unique_id: String,
    #[serde(default = "default_title")]
    pub title: String,
    pub data: EntryData,
    #[serde(default)]
    pub options: EntryOptions,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_owned()
}

impl ConfigEntry {
    /// Cleanup flag used when a call does not override it.
    pub fn cleanup_utf8_default(&self) -> bool {
        resolve_cleanup_utf8(None, self.options.cleanup_utf8, self.data.cleanup_utf8)
    }
}

/// Unique id that prevents configuring the same account twice.
pub fn unique_id_for(username: &Username) -> String {
    format!("{DOMAIN}:{}", username.as_str())
}
