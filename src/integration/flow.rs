//! Setup and options forms for the host's configuration UI.
//!
//! Flows are pure: they describe forms and return the entry the host should store. The
//! host owns persistence and assigns entry ids.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use super::DEFAULT_TITLE;
use super::entry::{ConfigEntry, EntryData, EntryOptions, unique_id_for};
use crate::domain::{ApiKey, DEFAULT_CLEANUP_UTF8, Username, ValidationError};

const CLEANUP_UTF8_FIELD: &str = "cleanup_utf8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub key: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormSchema {
    pub step_id: &'static str,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    AlreadyConfigured,
}

/// Entry produced by a finished setup flow, before the host assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub unique_id: String,
    pub title: String,
    pub data: EntryData,
    pub options: EntryOptions,
}

impl NewEntry {
    pub fn into_entry(self, entry_id: impl Into<String>) -> ConfigEntry {
        ConfigEntry {
            entry_id: entry_id.into(),
            unique_id: self.unique_id,
            title: self.title,
            data: self.data,
            options: self.options,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowResult {
    /// Render (or re-render) a form; `errors` maps field keys to error ids.
    ShowForm {
        schema: FormSchema,
        errors: BTreeMap<&'static str, &'static str>,
    },
    CreateEntry(NewEntry),
    UpdateOptions(EntryOptions),
    Abort(AbortReason),
}

/// Raw values submitted through the setup form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub cleanup_utf8: Option<bool>,
}

/// Raw values submitted through the options form.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OptionsInput {
    #[serde(default)]
    pub cleanup_utf8: Option<bool>,
}

/// Initial setup: asks for credentials and the cleanup default.
#[derive(Debug, Clone, Default)]
pub struct ConfigFlow {
    configured: BTreeSet<String>,
}

impl ConfigFlow {
    pub const VERSION: u32 = 1;

    /// `configured` are the unique ids of entries the host already stores.
    pub fn new(configured: impl IntoIterator<Item = String>) -> Self {
        Self {
            configured: configured.into_iter().collect(),
        }
    }

    pub fn step_user(&self, input: Option<UserInput>) -> FlowResult {
        let Some(input) = input else {
            return show_user_form(BTreeMap::new());
        };

        let username = Username::new(input.username);
        let api_key = ApiKey::new(input.api_key);
        let (username, api_key) = match (username, api_key) {
            (Ok(username), Ok(api_key)) => (username, api_key),
            (username, api_key) => {
                let mut errors = BTreeMap::new();
                for err in [username.err(), api_key.err()].into_iter().flatten() {
                    if let ValidationError::Empty { field } = err {
                        errors.insert(field, "required");
                    }
                }
                return show_user_form(errors);
            }
        };

        let unique_id = unique_id_for(&username);
        if self.configured.contains(&unique_id) {
            tracing::debug!(%unique_id, "SMSAlert account already configured");
            return FlowResult::Abort(AbortReason::AlreadyConfigured);
        }

        FlowResult::CreateEntry(NewEntry {
            unique_id,
            title: DEFAULT_TITLE.to_owned(),
            data: EntryData {
                username: username.as_str().to_owned(),
                api_key: api_key.as_str().to_owned(),
                cleanup_utf8: None,
            },
            options: EntryOptions {
                cleanup_utf8: Some(input.cleanup_utf8.unwrap_or(DEFAULT_CLEANUP_UTF8)),
            },
        })
    }
}

fn show_user_form(errors: BTreeMap<&'static str, &'static str>) -> FlowResult {
    FlowResult::ShowForm {
        schema: FormSchema {
            step_id: "user",
            fields: vec![
                FormField {
                    key: Username::FIELD,
                    kind: FieldKind::String,
                    required: true,
                    default: None,
                },
                FormField {
                    key: ApiKey::FIELD,
                    kind: FieldKind::String,
                    required: true,
                    default: None,
                },
                cleanup_field(DEFAULT_CLEANUP_UTF8),
            ],
        },
        errors,
    }
}

fn cleanup_field(default: bool) -> FormField {
    FormField {
        key: CLEANUP_UTF8_FIELD,
        kind: FieldKind::Bool,
        required: false,
        default: Some(serde_json::Value::Bool(default)),
    }
}

/// Later edits: only the cleanup default can change.
#[derive(Debug, Clone)]
pub struct OptionsFlow {
    current: EntryOptions,
}

impl OptionsFlow {
    pub fn new(entry: &ConfigEntry) -> Self {
        Self {
            current: entry.options,
        }
    }

    pub fn step_init(&self, input: Option<OptionsInput>) -> FlowResult {
        match input {
            Some(input) => FlowResult::UpdateOptions(EntryOptions {
                cleanup_utf8: Some(input.cleanup_utf8.unwrap_or(DEFAULT_CLEANUP_UTF8)),
            }),
            None => FlowResult::ShowForm {
                schema: FormSchema {
                    step_id: "init",
                    fields: vec![cleanup_field(
                        self.current.cleanup_utf8.unwrap_or(DEFAULT_CLEANUP_UTF8),
                    )],
                },
                errors: BTreeMap::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(username: &str, api_key: &str, cleanup_utf8: Option<bool>) -> UserInput {
        UserInput {
            username: username.to_owned(),
            api_key: api_key.to_owned(),
            cleanup_utf8,
        }
    }

    #[test]
    fn user_step_without_input_shows_setup_form() {
        let result = ConfigFlow::default().step_user(None);
        let FlowResult::ShowForm { schema, errors } = result else {
            panic!("expected form, got {result:?}");
        };
        assert_eq!(schema.step_id, "user");
        assert!(errors.is_empty());
        let keys: Vec<_> = schema.fields.iter().map(|f| (f.key, f.required)).collect();
        assert_eq!(
            keys,
            vec![("username", true), ("api_key", true), ("cleanup_utf8", false)]
        );
        assert_eq!(schema.fields[2].default, Some(serde_json::Value::Bool(true)));
    }

    #[test]
    fn user_step_stores_trimmed_credentials_and_cleanup_option() {
        let result = ConfigFlow::default().step_user(Some(input(" alice ", " k3y ", Some(false))));
        let FlowResult::CreateEntry(entry) = result else {
            panic!("expected entry, got {result:?}");
        };
        assert_eq!(entry.unique_id, "smsalert:alice");
        assert_eq!(entry.title, "SMSAlert");
        assert_eq!(entry.data.username, "alice");
        assert_eq!(entry.data.api_key, "k3y");
        assert_eq!(entry.data.cleanup_utf8, None);
        assert_eq!(entry.options.cleanup_utf8, Some(false));

        let stored = entry.into_entry("01J");
        assert_eq!(stored.entry_id, "01J");
        assert!(!stored.cleanup_utf8_default());
    }

    #[test]
    fn user_step_defaults_cleanup_to_true() {
        let result = ConfigFlow::default().step_user(Some(input("alice", "k3y", None)));
        let FlowResult::CreateEntry(entry) = result else {
            panic!("expected entry, got {result:?}");
        };
        assert_eq!(entry.options.cleanup_utf8, Some(true));
    }

    #[test]
    fn user_step_aborts_for_already_configured_account() {
        let flow = ConfigFlow::new(["smsalert:alice".to_owned()]);
        assert_eq!(
            flow.step_user(Some(input("  alice", "other", None))),
            FlowResult::Abort(AbortReason::AlreadyConfigured)
        );
    }

    #[test]
    fn user_step_reports_blank_fields() {
        let result = ConfigFlow::default().step_user(Some(input(" ", "", None)));
        let FlowResult::ShowForm { errors, .. } = result else {
            panic!("expected form, got {result:?}");
        };
        assert_eq!(errors.get("username"), Some(&"required"));
        assert_eq!(errors.get("api_key"), Some(&"required"));
    }

    #[test]
    fn options_step_defaults_to_current_value() {
        let entry = ConfigFlow::default()
            .step_user(Some(input("alice", "k3y", Some(false))));
        let FlowResult::CreateEntry(entry) = entry else {
            panic!("expected entry");
        };
        let entry = entry.into_entry("01J");

        let result = OptionsFlow::new(&entry).step_init(None);
        let FlowResult::ShowForm { schema, .. } = result else {
            panic!("expected form, got {result:?}");
        };
        assert_eq!(schema.step_id, "init");
        assert_eq!(schema.fields.len(), 1);
        assert_eq!(schema.fields[0].key, "cleanup_utf8");
        assert_eq!(schema.fields[0].default, Some(serde_json::Value::Bool(false)));
    }

    #[test]
    fn options_step_returns_updated_options() {
        let entry = ConfigFlow::default()
            .step_user(Some(input("alice", "k3y", None)));
        let FlowResult::CreateEntry(entry) = entry else {
            panic!("expected entry");
        };
        let flow = OptionsFlow::new(&entry.into_entry("01J"));

        assert_eq!(
            flow.step_init(Some(OptionsInput {
                cleanup_utf8: Some(false)
            })),
            FlowResult::UpdateOptions(EntryOptions {
                cleanup_utf8: Some(false)
            })
        );
        assert_eq!(
            flow.step_init(Some(OptionsInput::default())),
            FlowResult::UpdateOptions(EntryOptions {
                cleanup_utf8: Some(true)
            })
        );
    }

    #[test]
    fn form_input_deserializes_from_host_payload() {
        let parsed: UserInput =
            serde_json::from_str(r#"{"username":"alice","api_key":"k3y"}"#).unwrap();
        assert_eq!(parsed.cleanup_utf8, None);
        assert_eq!(parsed.username, "alice");
    }
}
