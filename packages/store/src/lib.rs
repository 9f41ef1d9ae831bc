//! Semantic store layer for opensled.
//!
//! This layer adds meaning to the engine's raw bytes:
//! - [`KeyPath`]: a logical key as text segments, addressing either a value
//!   or a sub-store
//! - [`StoreHandle`]: one handle over a root or prefixed engine view, with
//!   typed get/put/delete, shaped iteration, and counting
//! - [`Registry`]: the explicit root-handle registry - one shared handle
//!   per database path, with a mutexed check-and-insert
//!
//! Prefixing is a pure key-space partition: the flat engine key is the
//! byte-for-byte concatenation of all segments, with no delimiters.
//!
//! # Example
//!
//! ```rust,no_run
//! use opensled_store::{KeyPath, Registry};
//! use opensled_codec::Value;
//!
//! let registry = Registry::new();
//! let store = registry.get_instance("./data/mydb").unwrap();
//!
//! store.put(&KeyPath::value(["users", "123"]), &Value::from("alice")).unwrap();
//! let sub = store.sub_store(&KeyPath::sub_store(["users"])).unwrap();
//! assert_eq!(sub.get(&KeyPath::from("123")).unwrap(), Some(Value::from("alice")));
//! ```

mod error;
mod handle;
mod key;
mod registry;

pub use error::Error;
pub use handle::{Iter, IterItem, IterOptions, StoreHandle};
pub use key::KeyPath;
pub use registry::Registry;

// Re-export codec types for convenience
pub use opensled_codec::{CodecError, Tensor, Value};
