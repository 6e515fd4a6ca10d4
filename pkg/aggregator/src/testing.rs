//! Fixtures shared by the aggregator tests.

use async_trait::async_trait;
use pkg_state::memory::MemoryStore;
use pkg_state::{ListParams, LogParams, LogStream, ResourceStore};
use pkg_types::configmap::ConfigMap;
use pkg_types::daemonset::{DaemonSet, DaemonSetSpec, DaemonSetStatus};
use pkg_types::deployment::{Deployment, DeploymentSpec, DeploymentStatus};
use pkg_types::job::{Job, JobSpec, JobStatus};
use pkg_types::namespace::Namespace;
use pkg_types::pod::{ContainerSpec, Pod, PodSpec, PodStatus};
use pkg_types::replicaset::{ReplicaSet, ReplicaSetSpec, ReplicaSetStatus};
use pkg_types::service::{Service, ServiceSpec};
use pkg_types::{Kind, Labels, ObjectMeta, Resource};
use std::sync::Arc;

use crate::aggregator::Aggregator;
use crate::shape::ShapeSettings;

/// Delegates to a [`MemoryStore`] but fails every list of the given kinds.
pub struct FailingStore {
    inner: MemoryStore,
    failing: Vec<Kind>,
}

#[async_trait]
impl ResourceStore for FailingStore {
    async fn list_namespaces(&self) -> anyhow::Result<Vec<Namespace>> {
        if self.failing.contains(&Kind::Namespace) {
            anyhow::bail!("namespaces unavailable");
        }
        self.inner.list_namespaces().await
    }

    async fn list<T: Resource>(&self, namespace: &str, params: &ListParams) -> anyhow::Result<Vec<T>> {
        if self.failing.contains(&T::KIND) {
            anyhow::bail!("{} unavailable", T::KIND.plural());
        }
        self.inner.list(namespace, params).await
    }

    async fn get<T: Resource>(&self, namespace: &str, name: &str) -> anyhow::Result<Option<T>> {
        if self.failing.contains(&T::KIND) {
            anyhow::bail!("{} unavailable", T::KIND.plural());
        }
        self.inner.get(namespace, name).await
    }

    async fn read_logs(
        &self,
        namespace: &str,
        pod: &str,
        params: &LogParams,
    ) -> anyhow::Result<LogStream> {
        self.inner.read_logs(namespace, pod, params).await
    }
}

pub async fn make_store() -> MemoryStore {
    let store = MemoryStore::new();
    for ns in ["default", "ns1", "ns2", "kube-system"] {
        store.insert_namespace(ns).await.unwrap();
    }
    store
}

pub fn make_aggregator(store: MemoryStore) -> Aggregator<MemoryStore> {
    Aggregator::new(Arc::new(store), ShapeSettings::default())
}

pub fn make_failing_aggregator(store: MemoryStore, failing: &[Kind]) -> Aggregator<FailingStore> {
    let store = FailingStore {
        inner: store,
        failing: failing.to_vec(),
    };
    Aggregator::new(Arc::new(store), ShapeSettings::default())
}

fn app(app: &str) -> Labels {
    Labels::from([("app".to_string(), app.to_string())])
}

pub fn make_service(name: &str, ns: &str, app_name: &str) -> Service {
    Service {
        metadata: ObjectMeta::new(name, ns).with_label("app", app_name),
        spec: ServiceSpec {
            selector: app(app_name),
            ..ServiceSpec::default()
        },
        cluster_ip: Some("10.43.0.10".into()),
    }
}

pub fn make_deployment(name: &str, ns: &str, app_name: &str) -> Deployment {
    Deployment {
        metadata: ObjectMeta::new(name, ns).with_label("app", app_name),
        spec: DeploymentSpec {
            replicas: 2,
            selector: app(app_name),
            ..DeploymentSpec::default()
        },
        status: DeploymentStatus::default(),
        generation: 1,
    }
}

pub fn make_daemon_set(name: &str, ns: &str, app_name: &str) -> DaemonSet {
    DaemonSet {
        metadata: ObjectMeta::new(name, ns).with_label("app", app_name),
        spec: DaemonSetSpec {
            selector: app(app_name),
            ..DaemonSetSpec::default()
        },
        status: DaemonSetStatus::default(),
    }
}

pub fn make_job(name: &str, ns: &str, app_name: &str) -> Job {
    Job {
        metadata: ObjectMeta::new(name, ns).with_label("app", app_name),
        spec: JobSpec {
            selector: app(app_name),
            ..JobSpec::default()
        },
        status: JobStatus::default(),
        owner_ref: None,
    }
}

pub fn make_replica_set(name: &str, ns: &str, app_name: &str) -> ReplicaSet {
    ReplicaSet {
        metadata: ObjectMeta::new(name, ns).with_label("app", app_name),
        spec: ReplicaSetSpec {
            replicas: 1,
            selector: app(app_name),
            ..ReplicaSetSpec::default()
        },
        status: ReplicaSetStatus::default(),
        owner_ref: Some(app_name.to_string()),
    }
}

pub fn make_pod(name: &str, ns: &str, app_name: &str, env: &[(&str, &str)]) -> Pod {
    Pod {
        metadata: ObjectMeta::new(name, ns).with_label("app", app_name),
        spec: PodSpec {
            containers: vec![ContainerSpec {
                name: "app".into(),
                image: format!("registry.local/{}:1.0", app_name),
                command: vec![],
                args: vec![],
                env: env
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                resources: Default::default(),
            }],
            ..PodSpec::default()
        },
        status: PodStatus::Running,
        status_message: None,
        node_name: Some("node-1".into()),
        owner_ref: None,
        restart_count: 0,
    }
}

pub fn make_config_map(name: &str, ns: &str, app_name: &str) -> ConfigMap {
    ConfigMap {
        metadata: ObjectMeta::new(name, ns).with_label("app", app_name),
        data: [("MODE".to_string(), "live".to_string())].into(),
    }
}
