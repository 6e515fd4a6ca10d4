use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::meta::{Kind, Labels, ObjectMeta, Resource};
use crate::pod::PodSpec;

// --- Job status ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum JobCondition {
    #[default]
    Running,
    Complete,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobStatus {
    pub active: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub condition: JobCondition,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completion_time: Option<DateTime<Utc>>,
}

// --- Job spec ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    #[serde(default)]
    pub template: PodSpec,
    #[serde(default)]
    pub selector: Labels,
    /// Number of successful completions required
    #[serde(default = "default_completions")]
    pub completions: u32,
    /// Max pods running in parallel
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_completions() -> u32 {
    1
}
fn default_parallelism() -> u32 {
    1
}

impl Default for JobSpec {
    fn default() -> Self {
        Self {
            template: PodSpec::default(),
            selector: Labels::new(),
            completions: default_completions(),
            parallelism: default_parallelism(),
        }
    }
}

// --- Job ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    #[serde(flatten)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: JobSpec,
    #[serde(default)]
    pub status: JobStatus,
    /// Owner reference (CronJob if created by one)
    #[serde(default)]
    pub owner_ref: Option<String>,
}

impl Resource for Job {
    const KIND: Kind = Kind::Job;

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
