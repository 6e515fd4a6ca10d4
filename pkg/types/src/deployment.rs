use serde::{Deserialize, Serialize};

use crate::meta::{Kind, Labels, ObjectMeta, Resource};
use crate::pod::PodSpec;

// --- Deployment strategy ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeploymentStrategy {
    RollingUpdate {
        #[serde(default = "default_max_surge")]
        max_surge: u32,
        #[serde(default)]
        max_unavailable: u32,
    },
    Recreate,
}

fn default_max_surge() -> u32 {
    1
}

impl Default for DeploymentStrategy {
    fn default() -> Self {
        DeploymentStrategy::RollingUpdate {
            max_surge: 1,
            max_unavailable: 0,
        }
    }
}

// --- Deployment status ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentStatus {
    pub ready_replicas: u32,
    pub available_replicas: u32,
    pub updated_replicas: u32,
}

// --- Deployment spec ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentSpec {
    #[serde(default)]
    pub replicas: u32,
    #[serde(default)]
    pub template: PodSpec,
    #[serde(default)]
    pub strategy: DeploymentStrategy,
    /// Label selector for matching pods
    #[serde(default)]
    pub selector: Labels,
}

// --- Deployment ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    #[serde(flatten)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: DeploymentSpec,
    #[serde(default)]
    pub status: DeploymentStatus,
    #[serde(default)]
    pub generation: u64,
}

impl Resource for Deployment {
    const KIND: Kind = Kind::Deployment;

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
