//! Persisted snapshot encoding.
//!
//! The whole cart is written as a single JSON document:
//!
//! ```text
//! {"version":1,"checksum":"<blake3 hex>","items":[{"id":..,"quantity":..},..]}
//! ```
//!
//! The checksum is Blake3 over the exact text of `items` as stored, so a
//! snapshot verifies byte for byte and never depends on how numbers survive
//! a parse. A bare JSON array of line items (written by older clients, with
//! no envelope) is still accepted on read. Anything else is reported as
//! [`CartCoreError::CorruptSnapshot`].

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

use crate::cart::Cart;
use crate::error::{CartCoreError, Result};
use crate::item::LineItem;
use crate::validation::validate_items;

/// Current envelope version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Domain prefix mixed into the checksum.
const CHECKSUM_DOMAIN: &[u8] = b"cart-snapshot-v1:";

/// The layout a snapshot was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// Versioned envelope with checksum.
    Envelope,
    /// Bare array of line items.
    Legacy,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    checksum: String,
    items: &'a RawValue,
}

#[derive(Deserialize)]
struct Envelope<'a> {
    version: u32,
    checksum: String,
    #[serde(borrow)]
    items: &'a RawValue,
}

/// Encode a cart into its persisted form.
pub fn encode_snapshot(cart: &Cart) -> Result<String> {
    let items = serde_json::to_string(cart.items()).map_err(encoding)?;
    let items = RawValue::from_string(items).map_err(encoding)?;

    let envelope = EnvelopeRef {
        version: SNAPSHOT_VERSION,
        checksum: checksum(items.get()),
        items: &items,
    };
    serde_json::to_string(&envelope).map_err(encoding)
}

/// Decode a persisted snapshot.
///
/// Returns the cart and the layout it was stored in.
pub fn decode_snapshot(raw: &str) -> Result<(Cart, SnapshotFormat)> {
    let (items, format) = match raw.trim_start().as_bytes().first() {
        Some(b'[') => {
            let items: Vec<LineItem> = serde_json::from_str(raw).map_err(corrupt)?;
            (items, SnapshotFormat::Legacy)
        }
        Some(b'{') => {
            let envelope: Envelope<'_> = serde_json::from_str(raw).map_err(corrupt)?;
            if envelope.version != SNAPSHOT_VERSION {
                return Err(CartCoreError::CorruptSnapshot(format!(
                    "unsupported snapshot version {}",
                    envelope.version
                )));
            }
            let expected = checksum(envelope.items.get());
            if expected != envelope.checksum {
                return Err(CartCoreError::CorruptSnapshot(format!(
                    "checksum mismatch: expected {}, got {}",
                    expected, envelope.checksum
                )));
            }
            let items: Vec<LineItem> =
                serde_json::from_str(envelope.items.get()).map_err(corrupt)?;
            (items, SnapshotFormat::Envelope)
        }
        _ => {
            let value: Value = serde_json::from_str(raw).map_err(corrupt)?;
            return Err(CartCoreError::CorruptSnapshot(format!(
                "expected object or array, got {}",
                json_kind(&value)
            )));
        }
    };

    validate_items(&items).map_err(|e| CartCoreError::CorruptSnapshot(e.to_string()))?;
    Ok((Cart::from_items_unchecked(items), format))
}

fn checksum(items: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(CHECKSUM_DOMAIN);
    hasher.update(items.as_bytes());
    hex::encode(hasher.finalize().as_bytes())
}

fn encoding(e: serde_json::Error) -> CartCoreError {
    CartCoreError::Encoding(e.to_string())
}

fn corrupt(e: serde_json::Error) -> CartCoreError {
    CartCoreError::CorruptSnapshot(e.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
