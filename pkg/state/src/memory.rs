use async_trait::async_trait;
use pkg_constants::state::{NAMESPACES_PREFIX, REGISTRY_PREFIX};
use pkg_types::Resource;
use pkg_types::configmap::ConfigMap;
use pkg_types::daemonset::DaemonSet;
use pkg_types::deployment::Deployment;
use pkg_types::job::Job;
use pkg_types::namespace::Namespace;
use pkg_types::pod::Pod;
use pkg_types::replicaset::ReplicaSet;
use pkg_types::service::Service;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::store::{RegistryBackend, log_key};

/// In-process registry with the same key layout as [`crate::client::StateStore`].
///
/// Used by tests and by the server's memory mode.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

/// YAML seed for [`MemoryStore::from_fixture`].
///
/// ```yaml
/// namespaces: [default, payments]
/// services:
///   - name: checkout
///     namespace: payments
///     labels: { app: checkout }
/// logs:
///   payments/checkout-0/app: |
///     started
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub namespaces: Vec<String>,
    pub services: Vec<Service>,
    pub deployments: Vec<Deployment>,
    #[serde(alias = "daemonSets")]
    pub daemonsets: Vec<DaemonSet>,
    pub jobs: Vec<Job>,
    #[serde(alias = "replicaSets")]
    pub replicasets: Vec<ReplicaSet>,
    pub pods: Vec<Pod>,
    #[serde(alias = "configMaps")]
    pub configmaps: Vec<ConfigMap>,
    /// `<namespace>/<pod>/<container>` → captured output.
    pub logs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, key: impl Into<String>, value: Vec<u8>) {
        self.entries.write().await.insert(key.into(), value);
    }

    /// Store `obj` under `/registry/<plural>/<namespace>/<name>`.
    pub async fn insert<T: Resource>(&self, obj: &T) -> anyhow::Result<()> {
        let key = format!(
            "{}/{}/{}/{}",
            REGISTRY_PREFIX,
            T::KIND.plural(),
            obj.namespace(),
            obj.name()
        );
        self.put(key, serde_json::to_vec(obj)?).await;
        Ok(())
    }

    pub async fn insert_namespace(&self, name: &str) -> anyhow::Result<()> {
        let key = format!("{}{}", NAMESPACES_PREFIX, name);
        self.put(key, serde_json::to_vec(&Namespace::new(name))?).await;
        Ok(())
    }

    pub async fn append_log(&self, namespace: &str, pod: &str, container: &str, data: &[u8]) {
        let key = log_key(namespace, pod, container);
        self.entries
            .write()
            .await
            .entry(key)
            .or_default()
            .extend_from_slice(data);
    }

    pub async fn load(&self, fixture: Fixture) -> anyhow::Result<()> {
        for ns in &fixture.namespaces {
            self.insert_namespace(ns).await?;
        }
        insert_all(self, &fixture.services).await?;
        insert_all(self, &fixture.deployments).await?;
        insert_all(self, &fixture.daemonsets).await?;
        insert_all(self, &fixture.jobs).await?;
        insert_all(self, &fixture.replicasets).await?;
        insert_all(self, &fixture.pods).await?;
        insert_all(self, &fixture.configmaps).await?;

        for (path, output) in &fixture.logs {
            let mut parts = path.splitn(3, '/');
            let (Some(ns), Some(pod), Some(container)) = (parts.next(), parts.next(), parts.next())
            else {
                anyhow::bail!("log entry '{}' is not <namespace>/<pod>/<container>", path);
            };
            self.append_log(ns, pod, container, output.as_bytes()).await;
        }
        Ok(())
    }

    /// Build a store seeded from a YAML fixture file.
    pub async fn from_fixture(path: &str) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read fixture {}: {}", path, e))?;
        let fixture: Fixture = serde_yaml::from_str(&content)?;
        let store = Self::new();
        store.load(fixture).await?;
        info!(
            "Loaded fixture {} ({} entries)",
            path,
            store.entries.read().await.len()
        );
        Ok(store)
    }
}

async fn insert_all<T: Resource>(store: &MemoryStore, items: &[T]) -> anyhow::Result<()> {
    for item in items {
        store.insert(item).await?;
    }
    Ok(())
}

#[async_trait]
impl RegistryBackend for MemoryStore {
    async fn read(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn scan(&self, prefix: &str) -> anyhow::Result<Vec<(String, Vec<u8>)>> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
