use pkg_types::Labels;
use pkg_types::rbac::Role;

use crate::policy::PolicyEngine;

/// Per-kind visibility questions asked by the aggregator for every object
/// it receives from the store.
pub trait RoleAssigner: Send + Sync + 'static {
    fn matches(&self, labels: &Labels, app_name: Option<&str>) -> bool;
    /// Label-scoped access; `None` means the object has no labels.
    fn compare_labels(&self, labels: Option<&Labels>, exact: bool) -> bool;
    fn in_exclusions(&self, value: &str) -> bool;
    fn match_labels(&self) -> &[String];
    fn role(&self) -> &Role;

    fn has_application_access(&self) -> bool;
    fn has_namespace_access(&self, namespace: &str) -> bool;
    fn has_env_vars_access(&self, labels: &Labels) -> bool;
    fn has_config_map_access(&self, labels: &Labels) -> bool;
    fn has_log_access(&self, labels: &Labels) -> bool;
    fn has_pod_access(&self, labels: &Labels) -> bool;
    fn has_deployment_access(&self, labels: &Labels) -> bool;
    fn has_service_access(&self, labels: &Labels) -> bool;
    fn has_daemon_set_access(&self, labels: &Labels) -> bool;
    fn has_job_access(&self, labels: &Labels) -> bool;
}

/*
Operators:
  - see apps, pods, logs, deployments and services in any namespace
  - env vars and config maps only where a match label allows it
Viewers:
  - see workloads whose labels match one of their match labels
  - nothing scoped at all when no match labels are configured
Exclusions override both.
*/

/// The active decision-making wrapper around one [`Role`] for one request.
#[derive(Debug, Clone)]
pub struct RoleAssignment {
    role: Role,
    engine: PolicyEngine,
}

impl RoleAssignment {
    pub fn new(role: Role, engine: PolicyEngine) -> Self {
        Self { role, engine }
    }

    /// Capability shared by every label-scoped kind: a viewer who is not an
    /// operator needs at least one match label before labels are compared.
    fn scoped(&self, labels: &Labels, exact: bool) -> bool {
        if self.engine.enabled()
            && self.role.viewers
            && !self.role.operators
            && self.role.match_labels.is_empty()
        {
            return false;
        }
        self.compare_labels(present(labels), exact)
    }
}

/// Objects without any labels carry no evidence of ownership.
fn present(labels: &Labels) -> Option<&Labels> {
    (!labels.is_empty()).then_some(labels)
}

impl RoleAssigner for RoleAssignment {
    fn matches(&self, labels: &Labels, app_name: Option<&str>) -> bool {
        self.engine.matches(&self.role, labels, app_name)
    }

    fn compare_labels(&self, labels: Option<&Labels>, exact: bool) -> bool {
        self.engine.compare_labels(&self.role, labels, exact)
    }

    fn in_exclusions(&self, value: &str) -> bool {
        self.engine.in_exclusions(&self.role, value)
    }

    fn match_labels(&self) -> &[String] {
        &self.role.match_labels
    }

    fn role(&self) -> &Role {
        &self.role
    }

    fn has_application_access(&self) -> bool {
        !self.engine.enabled() || self.role.operators || self.role.viewers
    }

    fn has_namespace_access(&self, namespace: &str) -> bool {
        if !self.engine.enabled() || namespace.is_empty() {
            return true;
        }
        !self.in_exclusions(namespace)
    }

    fn has_env_vars_access(&self, labels: &Labels) -> bool {
        self.scoped(labels, true)
    }

    fn has_config_map_access(&self, labels: &Labels) -> bool {
        self.scoped(labels, true)
    }

    fn has_log_access(&self, labels: &Labels) -> bool {
        self.scoped(labels, true)
    }

    fn has_pod_access(&self, labels: &Labels) -> bool {
        self.scoped(labels, false)
    }

    fn has_deployment_access(&self, labels: &Labels) -> bool {
        self.scoped(labels, false)
    }

    fn has_service_access(&self, labels: &Labels) -> bool {
        self.scoped(labels, false)
    }

    fn has_daemon_set_access(&self, labels: &Labels) -> bool {
        self.scoped(labels, false)
    }

    fn has_job_access(&self, labels: &Labels) -> bool {
        self.scoped(labels, false)
    }
}
