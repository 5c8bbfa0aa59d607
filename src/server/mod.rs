//! Server module for exposing the syndication resources over HTTP
//!
//! `ServerBuilder` wires the store, token issuer and event bus into a
//! `ServerHost`; `RestExposure` turns the host into an Axum router.

pub mod builder;
pub mod exposure;
pub mod handlers;
pub mod host;
pub mod registry;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use host::ServerHost;
pub use registry::{RecordDescriptor, ResourceDescriptor, ResourceRegistry};
