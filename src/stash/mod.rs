//! Stash relay
//!
//! Moves a KML file from wherever it lives into a stash endpoint so a map
//! can load it from there:
//! - `client` - the HTTP calls (download, multipart upload, retrieval)
//! - `relay` - download then upload, producing a `KmlLayer`
//! - `deferred` - the write-once handle returned by the fire-and-forget relay

pub mod client;
pub mod deferred;
pub mod relay;

pub use client::StashClient;
pub use deferred::Deferred;
pub use relay::StashRelay;
