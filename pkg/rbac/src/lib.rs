//! Label-based visibility policy.
//!
//! [`PolicyEngine`] answers pure `(Role, labels)` questions; [`RoleAssignment`]
//! layers the per-kind capabilities the aggregator asks for on top of it.

pub mod assignment;
#[cfg(any(test, feature = "testing"))]
pub mod fake;
pub mod policy;

pub use assignment::{RoleAssigner, RoleAssignment};
pub use policy::{MatchLabel, MatchLabelError, PolicyEngine};
pub use pkg_types::rbac::Role;
