//! Byte-level engine layer for opensled.
//!
//! This layer knows nothing about value types or key segments - keys and
//! values are opaque byte sequences:
//! - `Engine`: an open sled database directory
//! - `View`: a restriction of the key space to keys sharing a byte prefix,
//!   supporting the same point operations and ordered scans as the root
//! - `Scan`: lazy ordered iteration over a view
//!
//! Semantic concerns (key segments, tagged values, handles) live in the
//! layers above.
//!
//! # Example
//!
//! ```rust,no_run
//! use opensled_engine::Engine;
//!
//! let engine = Engine::open("./data/mydb").unwrap();
//! let view = engine.view().prefixed(b"users");
//! view.put(b"123", b"payload").unwrap();
//! assert!(view.get(b"123").unwrap().is_some());
//! ```

mod error;
mod view;

pub use error::EngineError;
pub use view::{Engine, Scan, View};
