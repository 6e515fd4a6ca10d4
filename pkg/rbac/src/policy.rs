use pkg_constants::labels::VIEWER_APP_LABEL;
use pkg_types::Labels;
use pkg_types::rbac::Role;
use thiserror::Error;
use tracing::debug;

// --- Match labels ---

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchLabelError {
    #[error("match label '{0}' has no '=' separator")]
    MissingSeparator(String),
}

/// One parsed `key=value` entry of [`Role::match_labels`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchLabel<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> MatchLabel<'a> {
    /// Split on the first `=`.
    pub fn parse(raw: &'a str) -> Result<Self, MatchLabelError> {
        raw.split_once('=')
            .map(|(key, value)| MatchLabel { key, value })
            .ok_or_else(|| MatchLabelError::MissingSeparator(raw.to_string()))
    }

    /// Exact comparison: case-insensitive equality, or a trailing `*` turning
    /// the rule into "label value contains this prefix".
    fn accepts_exact(&self, label_value: &str) -> bool {
        if label_value.eq_ignore_ascii_case(self.value) {
            return true;
        }
        match self.value.strip_suffix('*') {
            Some(prefix) => label_value.contains(prefix),
            None => false,
        }
    }
}

// --- Policy engine ---

/// Stateless evaluator of a [`Role`] against object labels.
///
/// `enabled` is the process-wide RBAC switch read from configuration at
/// startup; when it is off every check allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyEngine {
    enabled: bool,
}

impl PolicyEngine {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// True when `value` contains any exclusion as a substring, so `"mongo"`
    /// excludes `"dev-mongo"` and `"prod-mongo-2"` alike.
    pub fn in_exclusions(&self, role: &Role, value: &str) -> bool {
        if !self.enabled {
            return false;
        }
        role.exclusions.iter().any(|exclude| value.contains(exclude.as_str()))
    }

    /// Namespace/application level visibility.
    pub fn matches(&self, role: &Role, labels: &Labels, app_name: Option<&str>) -> bool {
        if !self.enabled {
            return true;
        }
        let app_name = app_name.filter(|name| !name.is_empty());

        labels.iter().any(|(key, value)| {
            if self.in_exclusions(role, value) || self.in_exclusions(role, key) {
                return false;
            }
            match app_name {
                Some(app) => !self.in_exclusions(role, app) && app.contains(value.as_str()),
                None => {
                    role.operators || (role.viewers && key.eq_ignore_ascii_case(VIEWER_APP_LABEL))
                }
            }
        })
    }

    /// Label-scoped access to a single object.
    ///
    /// `labels` is `None` when the object carries no labels at all. With
    /// `exact` the configured value must match; otherwise the key alone
    /// grants access. A single malformed match label denies the whole call.
    pub fn compare_labels(&self, role: &Role, labels: Option<&Labels>, exact: bool) -> bool {
        if !self.enabled {
            return true;
        }

        if role.operators {
            return labels.is_none_or(|labels| {
                !labels.values().any(|value| self.in_exclusions(role, value))
            });
        }

        let Some(labels) = labels else {
            return false;
        };

        if role.match_labels.is_empty() {
            return true;
        }

        let rules = match role
            .match_labels
            .iter()
            .map(|raw| MatchLabel::parse(raw))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(rules) => rules,
            Err(e) => {
                debug!("Denying access: {}", e);
                return false;
            }
        };

        rules.iter().any(|rule| match labels.get(rule.key) {
            Some(value) if !self.in_exclusions(role, value) => !exact || rule.accepts_exact(value),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const ON: PolicyEngine = PolicyEngine { enabled: true };
    const OFF: PolicyEngine = PolicyEngine { enabled: false };

    #[test]
    fn parse_splits_on_first_separator() {
        let rule = MatchLabel::parse("team=a=b").unwrap();
        assert_eq!(rule.key, "team");
        assert_eq!(rule.value, "a=b");
        assert_eq!(
            MatchLabel::parse("team"),
            Err(MatchLabelError::MissingSeparator("team".to_string()))
        );
    }

    #[test]
    fn exclusions_are_substring_matches() {
        let role = Role::operator().with_exclusions(["mongo"]);
        assert!(ON.in_exclusions(&role, "dev-mongo-0"));
        assert!(!ON.in_exclusions(&role, "test"));
        assert!(!OFF.in_exclusions(&role, "dev-mongo-0"));
    }

    #[test]
    fn disabled_engine_allows_everything() {
        let role = Role::default().with_exclusions(["secret"]);
        let lbls = labels(&[("app", "secret-app")]);
        assert!(OFF.matches(&role, &lbls, None));
        assert!(OFF.matches(&role, &lbls, Some("other")));
        assert!(OFF.compare_labels(&role, None, true));
        assert!(OFF.compare_labels(&role, Some(&lbls), false));
    }

    #[test]
    fn matches_viewer_on_app_key_only() {
        let role = Role::viewer(Vec::<String>::new());
        assert!(ON.matches(&role, &labels(&[("App", "web")]), None));
        assert!(!ON.matches(&role, &labels(&[("tier", "web")]), None));
    }

    #[test]
    fn matches_operator_on_any_non_excluded_label() {
        let role = Role::operator().with_exclusions(["internal"]);
        assert!(ON.matches(&role, &labels(&[("tier", "web")]), None));
        assert!(!ON.matches(&role, &labels(&[("tier", "internal-web")]), None));
        assert!(!ON.matches(&role, &labels(&[("internal", "web")]), None));
        assert!(!ON.matches(&role, &Labels::new(), None));
    }

    #[test]
    fn matches_by_app_name_containment() {
        let role = Role::viewer(Vec::<String>::new()).with_exclusions(["legacy"]);
        let lbls = labels(&[("app", "billing")]);
        assert!(ON.matches(&role, &lbls, Some("billing-api")));
        assert!(!ON.matches(&role, &lbls, Some("orders-api")));
        assert!(!ON.matches(&role, &lbls, Some("legacy-billing")));
        // empty app name falls back to role flags
        assert!(ON.matches(&role, &lbls, Some("")));
    }

    #[test]
    fn operator_bypasses_match_labels() {
        let role = Role {
            match_labels: vec!["app=other".to_string()],
            ..Role::operator()
        };
        let lbls = labels(&[("app", "web")]);
        assert!(ON.compare_labels(&role, Some(&lbls), true));
        assert!(ON.compare_labels(&role, Some(&lbls), false));
        assert!(ON.compare_labels(&role, None, true));
    }

    #[test]
    fn operator_denied_on_excluded_label_value() {
        let role = Role::operator().with_exclusions(["kube"]);
        let lbls = labels(&[("app", "kube-proxy")]);
        assert!(!ON.compare_labels(&role, Some(&lbls), false));
    }

    #[test]
    fn viewer_requires_matching_value_when_exact() {
        let role = Role::viewer(["app=test"]);
        assert!(!ON.compare_labels(&role, Some(&labels(&[("app", "test2")])), true));
        assert!(ON.compare_labels(&role, Some(&labels(&[("app", "test")])), true));
        assert!(ON.compare_labels(&role, Some(&labels(&[("app", "TEST")])), true));
    }

    #[test]
    fn viewer_key_presence_suffices_when_not_exact() {
        let role = Role::viewer(["app=test"]);
        assert!(ON.compare_labels(&role, Some(&labels(&[("app", "test2")])), false));
        assert!(!ON.compare_labels(&role, Some(&labels(&[("team", "test")])), false));
    }

    #[test]
    fn wildcard_matches_prefix() {
        let role = Role::viewer(["app=team*"]);
        assert!(ON.compare_labels(&role, Some(&labels(&[("app", "team-x")])), true));
        assert!(!ON.compare_labels(&role, Some(&labels(&[("app", "other")])), true));
    }

    #[test]
    fn any_rule_grants_access() {
        let role = Role::viewer(["app=a", "team=payments"]);
        assert!(ON.compare_labels(&role, Some(&labels(&[("team", "payments")])), true));
    }

    #[test]
    fn excluded_label_value_never_grants() {
        let role = Role::viewer(["app=mongo"]).with_exclusions(["mongo"]);
        assert!(!ON.compare_labels(&role, Some(&labels(&[("app", "mongo")])), true));
        assert!(!ON.compare_labels(&role, Some(&labels(&[("app", "mongo")])), false));
    }

    #[test]
    fn absent_labels_deny_non_operators() {
        let role = Role::viewer(["app=test"]);
        assert!(!ON.compare_labels(&role, None, false));
        assert!(!ON.compare_labels(&Role::default(), None, false));
    }

    #[test]
    fn malformed_rule_denies_whole_call() {
        let role = Role::viewer(["app=test", "broken"]);
        assert!(!ON.compare_labels(&role, Some(&labels(&[("app", "test")])), true));
        assert!(!ON.compare_labels(&role, Some(&labels(&[("app", "test")])), false));
    }

    #[test]
    fn empty_match_labels_default_to_allow() {
        let role = Role {
            viewers: true,
            ..Role::default()
        };
        assert!(ON.compare_labels(&role, Some(&labels(&[("app", "anything")])), true));
    }
}
