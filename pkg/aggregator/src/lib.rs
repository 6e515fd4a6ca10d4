//! Fan-out, policy filtering and shaping of cluster reads.
//!
//! Every operation takes the caller's [`RoleAssigner`](pkg_rbac::RoleAssigner)
//! and returns only what it may see. Lists drop hidden objects silently;
//! single-object lookups answer `Forbidden`.

pub mod aggregator;
pub mod logs;
pub mod overview;
pub mod request;
pub mod shape;
#[cfg(test)]
mod testing;
pub mod workloads;

pub use aggregator::Aggregator;
pub use logs::{LogRequest, LogSnapshot};
pub use overview::{Overview, OverviewLink};
pub use request::{AggregationRequest, ErrorCollector};
pub use shape::{ResourceOverview, ShapeSettings};
