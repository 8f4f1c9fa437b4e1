//! Normalization of loosely-typed service payloads.

use serde_json::Value;

use crate::client::SmsAlertError;

/// Destination exactly as the caller supplied it, before it is reduced to one number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// An explicit `phoneNumber` / `phone_number` field.
    Explicit(String),
    /// `target` given as a single value.
    Target(String),
    /// `target` given as a list. Non-scalar items are kept as empty strings so they still count.
    Targets(Vec<String>),
}

impl Destination {
    /// Pick the destination from an explicit field first, falling back to `target`.
    ///
    /// Blank explicit values are treated as absent.
    pub fn from_values(explicit: Option<&Value>, target: Option<&Value>) -> Option<Self> {
        let explicit = explicit
            .and_then(scalar_string)
            .filter(|phone| !phone.trim().is_empty());
        if let Some(phone) = explicit {
            return Some(Self::Explicit(phone));
        }

        match target? {
            Value::Array(items) => Some(Self::Targets(
                items
                    .iter()
                    .map(|item| scalar_string(item).unwrap_or_default())
                    .collect(),
            )),
            other => scalar_string(other).map(Self::Target),
        }
    }

    /// Reduce to the single number SMSAlert accepts per call.
    pub fn into_phone_number(self) -> Result<String, SkipReason> {
        let phone = match self {
            Self::Explicit(phone) | Self::Target(phone) => phone,
            Self::Targets(mut phones) => match phones.len() {
                0 => return Err(SkipReason::MissingPhoneNumber),
                1 => phones.remove(0),
                count => return Err(SkipReason::MultipleTargets { count }),
            },
        };
        if phone.trim().is_empty() {
            return Err(SkipReason::MissingPhoneNumber);
        }
        Ok(phone)
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Read a boolean the way service payloads spell it.
///
/// Unrecognized values are ignored (with a warning) so the caller falls back to its default.
pub fn coerce_bool(key: &str, value: Option<&Value>) -> Option<bool> {
    let parsed = match value? {
        Value::Null => return None,
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Some(true),
            "false" | "off" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };
    if parsed.is_none() {
        tracing::warn!(key, ?value, "ignoring unrecognized boolean value");
    }
    parsed
}

/// Why an adapter decided not to call SMSAlert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingPhoneNumber,
    MultipleTargets { count: usize },
}

/// Outcome of one adapter invocation.
#[derive(Debug)]
pub enum Dispatch {
    Sent,
    Skipped(SkipReason),
    Failed(SmsAlertError),
}

impl Dispatch {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn explicit_field_wins_over_target() {
        let explicit = json!("+40700000001");
        let target = json!("+40700000002");
        assert_eq!(
            Destination::from_values(Some(&explicit), Some(&target)),
            Some(Destination::Explicit("+40700000001".to_owned()))
        );
    }

    #[test]
    fn blank_explicit_field_falls_back_to_target() {
        let explicit = json!("  ");
        let target = json!(["+40700000002"]);
        let destination = Destination::from_values(Some(&explicit), Some(&target)).unwrap();
        assert_eq!(destination.into_phone_number().unwrap(), "+40700000002");
    }

    #[test]
    fn numeric_targets_are_accepted() {
        let target = json!(40700000000_u64);
        assert_eq!(
            Destination::from_values(None, Some(&target)),
            Some(Destination::Target("40700000000".to_owned()))
        );
    }

    #[test]
    fn multiple_targets_are_rejected() {
        let target = json!(["+111", "+222"]);
        let destination = Destination::from_values(None, Some(&target)).unwrap();
        assert_eq!(
            destination.into_phone_number(),
            Err(SkipReason::MultipleTargets { count: 2 })
        );
    }

    #[test]
    fn non_scalar_list_items_still_count_as_targets() {
        let target = json!(["+111", null]);
        let destination = Destination::from_values(None, Some(&target)).unwrap();
        assert_eq!(
            destination.into_phone_number(),
            Err(SkipReason::MultipleTargets { count: 2 })
        );

        let target = json!([{}]);
        let destination = Destination::from_values(None, Some(&target)).unwrap();
        assert_eq!(
            destination.into_phone_number(),
            Err(SkipReason::MissingPhoneNumber)
        );
    }

    #[test]
    fn missing_or_empty_destinations_are_reported() {
        assert_eq!(Destination::from_values(None, None), None);
        assert_eq!(Destination::from_values(None, Some(&json!({}))), None);
        assert_eq!(
            Destination::Targets(Vec::new()).into_phone_number(),
            Err(SkipReason::MissingPhoneNumber)
        );
        assert_eq!(
            Destination::Target(" ".to_owned()).into_phone_number(),
            Err(SkipReason::MissingPhoneNumber)
        );
    }

    #[test]
    fn coerce_bool_accepts_common_spellings() {
        assert_eq!(coerce_bool("k", Some(&json!(false))), Some(false));
        assert_eq!(coerce_bool("k", Some(&json!("On"))), Some(true));
        assert_eq!(coerce_bool("k", Some(&json!("no"))), Some(false));
        assert_eq!(coerce_bool("k", Some(&json!(1))), Some(true));
        assert_eq!(coerce_bool("k", Some(&json!("maybe"))), None);
        assert_eq!(coerce_bool("k", Some(&json!(null))), None);
        assert_eq!(coerce_bool("k", None), None);
    }
}
