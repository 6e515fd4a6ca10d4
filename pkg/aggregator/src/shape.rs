use pkg_constants::labels::{DEFAULT_LINK_LABEL, DEFAULT_NAME_LABELS, DEFAULT_SENSITIVE_ENV};
use pkg_state::ListParams;
use pkg_types::configmap::ConfigMap;
use pkg_types::daemonset::DaemonSet;
use pkg_types::deployment::Deployment;
use pkg_types::job::Job;
use pkg_types::pod::Pod;
use pkg_types::replicaset::ReplicaSet;
use pkg_types::service::Service;
use pkg_types::{Labels, Resource};
use serde::Serialize;

// --- Settings ---

/// How objects are named and correlated, plus which env vars are never shown.
#[derive(Debug, Clone)]
pub struct ShapeSettings {
    /// Label whose value groups objects into one application.
    pub link_label: String,
    /// Searched in order for a human-friendly name.
    pub name_labels: Vec<String>,
    /// Case-insensitive substrings marking an env var name as sensitive.
    pub sensitive_env: Vec<String>,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            link_label: DEFAULT_LINK_LABEL.to_string(),
            name_labels: DEFAULT_NAME_LABELS.iter().map(|s| s.to_string()).collect(),
            sensitive_env: DEFAULT_SENSITIVE_ENV.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ShapeSettings {
    /// First configured name label with a non-empty value, else `raw`.
    pub fn friendly_name(&self, labels: &Labels, raw: &str) -> String {
        self.name_labels
            .iter()
            .find_map(|key| labels.get(key).filter(|v| !v.is_empty()))
            .cloned()
            .unwrap_or_else(|| raw.to_string())
    }

    /// Value of the link label, else the friendly name.
    pub fn linked_name(&self, labels: &Labels, friendly_name: &str) -> String {
        labels
            .get(&self.link_label)
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| friendly_name.to_string())
    }

    /// List filter selecting every object of one application.
    pub fn link_params(&self, linked_name: Option<&str>) -> ListParams {
        match linked_name.filter(|name| !name.is_empty()) {
            Some(name) => ListParams::matching(Labels::from([(
                self.link_label.clone(),
                name.to_string(),
            )])),
            None => ListParams::default(),
        }
    }

    pub fn is_sensitive(&self, env_name: &str) -> bool {
        let lower = env_name.to_ascii_lowercase();
        self.sensitive_env
            .iter()
            .any(|needle| lower.contains(&needle.to_ascii_lowercase()))
    }

    pub fn shape<T: Resource>(&self, obj: T, supplied: Option<&Labels>) -> ResourceOverview<T> {
        let friendly_name = self.friendly_name(obj.labels(), obj.name());
        let linked_name = self.linked_name(obj.labels(), &friendly_name);
        let label_selector = effective_selector(obj.selector(), supplied, obj.labels());
        ResourceOverview {
            name: obj.name().to_string(),
            friendly_name,
            linked_name,
            namespace: obj.namespace().to_string(),
            label_selector,
            object: obj,
            deployments: None,
            config_maps: None,
        }
    }
}

/// Declared selector, then the caller's, then the object's own labels.
pub fn effective_selector(
    declared: Option<&Labels>,
    supplied: Option<&Labels>,
    labels: &Labels,
) -> Labels {
    declared
        .filter(|s| !s.is_empty())
        .or(supplied.filter(|s| !s.is_empty()))
        .unwrap_or(labels)
        .clone()
}

// --- Payload ---

/// One visible object plus the names used to group it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOverview<T> {
    pub name: String,
    pub friendly_name: String,
    pub linked_name: String,
    pub namespace: String,
    pub label_selector: Labels,
    pub object: T,
    /// Related deployments; omitted when not looked up or when the lookup failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployments: Option<Vec<ResourceOverview<Deployment>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_maps: Option<Vec<ResourceOverview<ConfigMap>>>,
}

pub type ServiceOverview = ResourceOverview<Service>;
pub type DeploymentOverview = ResourceOverview<Deployment>;
pub type DaemonSetOverview = ResourceOverview<DaemonSet>;
pub type JobOverview = ResourceOverview<Job>;
pub type ReplicaSetOverview = ResourceOverview<ReplicaSet>;
pub type PodOverview = ResourceOverview<Pod>;
pub type ConfigMapOverview = ResourceOverview<ConfigMap>;

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_types::ObjectMeta;
    use pkg_types::service::ServiceSpec;

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn make_service(meta: ObjectMeta, selector: Labels) -> Service {
        Service {
            metadata: meta,
            spec: ServiceSpec {
                selector,
                ..ServiceSpec::default()
            },
            cluster_ip: None,
        }
    }

    #[test]
    fn friendly_name_follows_label_order() {
        let s = ShapeSettings::default();
        assert_eq!(s.friendly_name(&labels(&[("k8s-app", "dns"), ("name", "x")]), "raw"), "dns");
        assert_eq!(s.friendly_name(&labels(&[("app", ""), ("name", "x")]), "raw"), "x");
        assert_eq!(s.friendly_name(&Labels::new(), "raw"), "raw");
    }

    #[test]
    fn linked_name_prefers_link_label() {
        let s = ShapeSettings {
            link_label: "team".into(),
            ..ShapeSettings::default()
        };
        assert_eq!(s.linked_name(&labels(&[("team", "payments")]), "web"), "payments");
        assert_eq!(s.linked_name(&labels(&[("app", "web")]), "web"), "web");
    }

    #[test]
    fn selector_fallback_chain() {
        let own = labels(&[("app", "web")]);
        let declared = labels(&[("tier", "fe")]);
        let supplied = labels(&[("team", "a")]);
        assert_eq!(effective_selector(Some(&declared), Some(&supplied), &own), declared);
        assert_eq!(effective_selector(Some(&Labels::new()), Some(&supplied), &own), supplied);
        assert_eq!(effective_selector(None, None, &own), own);
    }

    #[test]
    fn shape_fills_names_and_selector() {
        let meta = ObjectMeta::new("web-svc", "ns1").with_label("app", "web");
        let ov = ShapeSettings::default().shape(make_service(meta, labels(&[("app", "web")])), None);
        assert_eq!(ov.name, "web-svc");
        assert_eq!(ov.friendly_name, "web");
        assert_eq!(ov.linked_name, "web");
        assert_eq!(ov.namespace, "ns1");
        assert_eq!(ov.label_selector, labels(&[("app", "web")]));
        assert!(ov.deployments.is_none());
    }

    #[test]
    fn sensitive_env_is_case_insensitive() {
        let s = ShapeSettings::default();
        assert!(s.is_sensitive("DB_PASSWORD"));
        assert!(s.is_sensitive("api_token"));
        assert!(!s.is_sensitive("LOG_LEVEL"));
    }

    #[test]
    fn link_params_skip_empty_name() {
        let s = ShapeSettings::default();
        assert_eq!(s.link_params(Some("web")).match_labels, labels(&[("app", "web")]));
        assert_eq!(
            s.link_params(Some("web,tier")).match_labels,
            labels(&[("app", "web,tier")])
        );
        assert!(s.link_params(Some("")).match_labels.is_empty());
        assert!(s.link_params(None).match_labels.is_empty());
        assert!(s.link_params(Some("web")).label_selector.is_none());
    }
}
