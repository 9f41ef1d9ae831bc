//! Wire representations shared by the client and the service.
//!
//! Values cross the boundary as their tagged byte blob, base64-encoded so
//! they travel inside JSON and query-free text bodies. Iteration items are
//! a JSON list of tagged objects.

use serde::{Deserialize, Serialize};

use opensled_codec::{blob_from_base64, blob_to_base64, decode, encode};
use opensled_store::IterItem;

use crate::Error;

/// One shaped iteration item on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum WireItem {
    /// Key and base64-encoded tagged value blob.
    Pair { key: String, value: String },
    Key { key: String },
    /// Base64-encoded tagged value blob.
    Value { value: String },
    Empty,
}

impl WireItem {
    /// Encode a shaped item for transmission.
    pub fn from_item(item: &IterItem) -> Result<WireItem, Error> {
        Ok(match item {
            IterItem::Pair(key, value) => WireItem::Pair {
                key: key.clone(),
                value: blob_to_base64(&encode(value)?),
            },
            IterItem::Key(key) => WireItem::Key { key: key.clone() },
            IterItem::Value(value) => WireItem::Value {
                value: blob_to_base64(&encode(value)?),
            },
            IterItem::Empty => WireItem::Empty,
        })
    }

    /// Decode a received item back into its shaped form.
    pub fn into_item(self) -> Result<IterItem, Error> {
        Ok(match self {
            WireItem::Pair { key, value } => {
                IterItem::Pair(key, decode(&blob_from_base64(&value)?)?)
            }
            WireItem::Key { key } => IterItem::Key(key),
            WireItem::Value { value } => IterItem::Value(decode(&blob_from_base64(&value)?)?),
            WireItem::Empty => IterItem::Empty,
        })
    }
}
