//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{ApiVersion, DEFAULT_CLEANUP_UTF8, SendRequest, resolve_cleanup_utf8};
pub use response::ApiErrorDetail;
pub use validation::ValidationError;
pub use value::{ApiKey, Credentials, MessageText, PhoneNumber, RawPhoneNumber, Username};
