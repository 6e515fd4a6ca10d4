//! Test double for [`RoleAssigner`].

use pkg_types::Labels;
use pkg_types::rbac::Role;

use crate::assignment::RoleAssigner;

/// Answers every capability with the same fixed decision.
#[derive(Debug, Clone, Default)]
pub struct StaticAssigner {
    allow: bool,
    role: Role,
}

impl StaticAssigner {
    pub fn allow_all() -> Self {
        Self {
            allow: true,
            role: Role::operator(),
        }
    }

    pub fn deny_all() -> Self {
        Self {
            allow: false,
            role: Role::default(),
        }
    }
}

impl RoleAssigner for StaticAssigner {
    fn matches(&self, _labels: &Labels, _app_name: Option<&str>) -> bool {
        self.allow
    }

    fn compare_labels(&self, _labels: Option<&Labels>, _exact: bool) -> bool {
        self.allow
    }

    fn in_exclusions(&self, _value: &str) -> bool {
        !self.allow
    }

    fn match_labels(&self) -> &[String] {
        &self.role.match_labels
    }

    fn role(&self) -> &Role {
        &self.role
    }

    fn has_application_access(&self) -> bool {
        self.allow
    }

    fn has_namespace_access(&self, _namespace: &str) -> bool {
        self.allow
    }

    fn has_env_vars_access(&self, _labels: &Labels) -> bool {
        self.allow
    }

    fn has_config_map_access(&self, _labels: &Labels) -> bool {
        self.allow
    }

    fn has_log_access(&self, _labels: &Labels) -> bool {
        self.allow
    }

    fn has_pod_access(&self, _labels: &Labels) -> bool {
        self.allow
    }

    fn has_deployment_access(&self, _labels: &Labels) -> bool {
        self.allow
    }

    fn has_service_access(&self, _labels: &Labels) -> bool {
        self.allow
    }

    fn has_daemon_set_access(&self, _labels: &Labels) -> bool {
        self.allow
    }

    fn has_job_access(&self, _labels: &Labels) -> bool {
        self.allow
    }
}
