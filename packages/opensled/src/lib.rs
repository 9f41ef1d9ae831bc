//! opensled: a typed, prefix-addressable key-value store over an ordered
//! on-disk engine.
//!
//! Values are tagged on disk (bytes, integers, strings, JSON documents and
//! tensors), keys are UTF-8 text segments whose concatenation is the flat
//! engine key, and prefixes partition the key space with no delimiters.
//! The same typed surface is available locally and over the HTTP facade.
//!
//! # Example
//!
//! ```rust,no_run
//! use opensled::{Database, KeyPath, Registry, Value};
//!
//! let registry = Registry::new();
//! let db = Database::open(&registry, "./data/mydb").unwrap();
//!
//! db.put(&KeyPath::value(["users", "123"]), &Value::from("alice")).unwrap();
//! let users = db.sub_store(&KeyPath::sub_store(["users"])).unwrap();
//! assert_eq!(users.get(&KeyPath::from("123")).unwrap(), Some(Value::from("alice")));
//! ```
//!
//! To serve databases over HTTP, bind a listener and hand it a registry:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use opensled::Registry;
//!
//! # async fn run() -> std::io::Result<()> {
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:2310").await?;
//! opensled::serve(listener, Arc::new(Registry::new())).await
//! # }
//! ```

mod database;
mod error;

pub use database::Database;
pub use error::DbError;

pub use opensled_codec::{CodecError, Dtype, MemoryOrder, Tensor, Value};
pub use opensled_engine::{Engine, EngineError};
pub use opensled_http::{serve, Error as HttpError, RemoteStore};
pub use opensled_store::{
    Error as StoreError, Iter, IterItem, IterOptions, KeyPath, Registry, StoreHandle,
};
