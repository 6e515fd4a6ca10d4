use serde::{Deserialize, Serialize};

use crate::meta::{Kind, Labels, ObjectMeta, Resource};
use crate::pod::PodSpec;

// --- DaemonSet status ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonSetStatus {
    pub desired_number_scheduled: u32,
    pub current_number_scheduled: u32,
    pub number_ready: u32,
}

// --- DaemonSet spec ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonSetSpec {
    #[serde(default)]
    pub template: PodSpec,
    /// Label selector for matching pods
    #[serde(default)]
    pub selector: Labels,
    /// Only schedule on nodes matching these labels
    #[serde(default)]
    pub node_selector: Labels,
}

// --- DaemonSet ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonSet {
    #[serde(flatten)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: DaemonSetSpec,
    #[serde(default)]
    pub status: DaemonSetStatus,
}

impl Resource for DaemonSet {
    const KIND: Kind = Kind::DaemonSet;

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
