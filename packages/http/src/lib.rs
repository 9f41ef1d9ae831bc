//! HTTP facade for opensled.
//!
//! Two halves share one wire contract:
//! - [`RemoteStore`]: a blocking client mirroring the local store handle
//!   surface
//! - [`service`]: the axum service exposing registered databases at
//!   `/getitem`, `/setitem`, `/delitem`, `/dblen`, `/iterator` and `/repr`
//!
//! Values travel as their tagged byte blob, base64-encoded; both sides run
//! the codec, so a malformed payload is rejected at the boundary it
//! crosses.

mod client;
mod error;
mod params;
pub mod service;
pub mod types;

pub use client::RemoteStore;
pub use error::Error;
pub use service::{router, serve};
