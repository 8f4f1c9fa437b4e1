//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod send_bulk;
mod send_v2;

pub use send_bulk::{decode_send_bulk_error_json, encode_send_bulk_form};
pub use send_v2::{encode_basic_auth, encode_send_v2_json};
