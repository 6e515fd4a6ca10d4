use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label set attached to every cluster object.
pub type Labels = HashMap<String, String>;

// --- Object metadata ---

/// Fields every registry object carries. Flattened into each kind so the
/// JSON shape stays `{ "name": .., "namespace": .., "labels": .. }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl ObjectMeta {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            labels: Labels::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

// --- Kind ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Namespace,
    Pod,
    Deployment,
    DaemonSet,
    Job,
    ReplicaSet,
    Service,
    ConfigMap,
}

impl Kind {
    /// Registry path segment, e.g. `/registry/<plural>/<ns>/<name>`.
    pub fn plural(&self) -> &'static str {
        match self {
            Kind::Namespace => "namespaces",
            Kind::Pod => "pods",
            Kind::Deployment => "deployments",
            Kind::DaemonSet => "daemonsets",
            Kind::Job => "jobs",
            Kind::ReplicaSet => "replicasets",
            Kind::Service => "services",
            Kind::ConfigMap => "configmaps",
        }
    }

    pub fn from_plural(plural: &str) -> Option<Self> {
        match plural {
            "namespaces" => Some(Kind::Namespace),
            "pods" => Some(Kind::Pod),
            "deployments" => Some(Kind::Deployment),
            "daemonsets" => Some(Kind::DaemonSet),
            "jobs" => Some(Kind::Job),
            "replicasets" => Some(Kind::ReplicaSet),
            "services" => Some(Kind::Service),
            "configmaps" => Some(Kind::ConfigMap),
            _ => None,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Namespace => write!(f, "Namespace"),
            Kind::Pod => write!(f, "Pod"),
            Kind::Deployment => write!(f, "Deployment"),
            Kind::DaemonSet => write!(f, "DaemonSet"),
            Kind::Job => write!(f, "Job"),
            Kind::ReplicaSet => write!(f, "ReplicaSet"),
            Kind::Service => write!(f, "Service"),
            Kind::ConfigMap => write!(f, "ConfigMap"),
        }
    }
}

// --- Resource ---

/// The minimal view of a typed object that the policy and the aggregator
/// need. Everything else on the object is payload and never read for
/// authorization.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: Kind;

    fn meta(&self) -> &ObjectMeta;

    fn meta_mut(&mut self) -> &mut ObjectMeta;

    /// Label selector the object declares for the pods it manages, if any.
    fn selector(&self) -> Option<&Labels> {
        None
    }

    fn name(&self) -> &str {
        &self.meta().name
    }

    fn namespace(&self) -> &str {
        &self.meta().namespace
    }

    fn labels(&self) -> &Labels {
        &self.meta().labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_round_trips_every_kind() {
        for kind in [
            Kind::Namespace,
            Kind::Pod,
            Kind::Deployment,
            Kind::DaemonSet,
            Kind::Job,
            Kind::ReplicaSet,
            Kind::Service,
            Kind::ConfigMap,
        ] {
            assert_eq!(Kind::from_plural(kind.plural()), Some(kind));
        }
        assert_eq!(Kind::from_plural("secrets"), None);
    }

    #[test]
    fn meta_accepts_registry_records_without_labels() {
        let meta: ObjectMeta =
            serde_json::from_str(r#"{"id":"abc","name":"web","namespace":"default"}"#).unwrap();
        assert_eq!(meta.name, "web");
        assert!(meta.labels.is_empty());
    }
}
