use std::fmt::Write;

use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

/// Midtrans signs each HTTP notification with
/// `SHA512(order_id + status_code + gross_amount + server_key)`, hex encoded, in the `signature_key` field.
pub fn notification_signature(order_id: &str, status_code: &str, gross_amount: &str, server_key: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hasher.finalize().iter().fold(String::with_capacity(128), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

/// Compares a received signature against the expected one, ignoring hex case. The comparison runs in constant time.
pub fn is_valid_notification_signature(
    signature: &str,
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &str,
) -> bool {
    let expected = notification_signature(order_id, status_code, gross_amount, server_key);
    let received = signature.trim().to_ascii_lowercase();
    expected.as_bytes().ct_eq(received.as_bytes()).into()
}

/// Snap item names are limited to 50 characters.
pub fn truncate_item_name(name: &str) -> String {
    name.chars().take(50).collect()
}
