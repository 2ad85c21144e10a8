//! # Dapr Demo Core
//!
//! `daprdemo-core` holds the pieces behind the demo binaries: building Dapr envelopes,
//! talking to the sidecar over gRPC, and serving the app callback API.
//!
//! ## Key Components
//!
//! * **[`envelope`]:** Wraps domain messages into Dapr envelopes. Payloads are type-erased
//!   (`google.protobuf.Any`) and can only be read back by naming the expected type.
//! * **[`SidecarClient`]:** The client facade. Each call returns a future that owns what it
//!   needs, so calls can be issued first and awaited later.
//! * **[`caller`]:** The linear call sequences the `daprdemo` binary runs.
//! * **[`callback::ShoppingCart`]:** An app callback service Dapr can invoke.
//!
//! ## Re-exports
//!
//! This crate re-exports `dapr_proto`, `prost` and `tonic` so consumers use compatible
//! versions of the generated types.
pub mod callback;
pub mod caller;
pub mod client;
pub mod config;
pub mod envelope;

pub use client::SidecarClient;
pub use config::SidecarConfig;

// Re-exports
pub use dapr_proto;
pub use prost;
pub use tonic;

/// Type alias for the standard boxed error used in generic bounds.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
