use serde::{Deserialize, Serialize};

use crate::meta::{Kind, Labels, ObjectMeta, Resource};
use crate::pod::PodSpec;

// --- ReplicaSet status ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplicaSetStatus {
    pub replicas: u32,
    pub ready_replicas: u32,
    pub available_replicas: u32,
}

// --- ReplicaSet spec ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplicaSetSpec {
    #[serde(default)]
    pub replicas: u32,
    #[serde(default)]
    pub selector: Labels,
    #[serde(default)]
    pub template: PodSpec,
}

// --- ReplicaSet ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaSet {
    #[serde(flatten)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ReplicaSetSpec,
    #[serde(default)]
    pub status: ReplicaSetStatus,
    /// Owner reference (Deployment that manages this RS)
    #[serde(default)]
    pub owner_ref: Option<String>,
}

impl Resource for ReplicaSet {
    const KIND: Kind = Kind::ReplicaSet;

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }

    fn selector(&self) -> Option<&Labels> {
        Some(&self.spec.selector)
    }
}
