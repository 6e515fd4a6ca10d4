pub mod config;
pub mod configmap;
pub mod daemonset;
pub mod deployment;
pub mod error;
pub mod job;
pub mod meta;
pub mod namespace;
pub mod pod;
pub mod rbac;
pub mod replicaset;
pub mod service;
pub mod validate;

pub use error::ApiError;
pub use meta::{Kind, Labels, ObjectMeta, Resource};
