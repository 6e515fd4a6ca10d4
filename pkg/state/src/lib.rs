//! Read access to cluster objects.
//!
//! [`ResourceStore`] is the seam the aggregator talks to. Both backends keep
//! objects under `/registry/<kind>/<namespace>/<id>`: [`client::StateStore`]
//! reads a SlateDB registry, [`memory::MemoryStore`] an in-process map.

pub mod client;
pub mod memory;
pub mod selector;
pub mod store;

pub use store::{ListParams, LogParams, LogStream, RegistryBackend, ResourceStore};
