use async_trait::async_trait;
use futures_util::stream::{self, Stream, StreamExt};
use pkg_constants::logs::{DEFAULT_TAIL_LINES, FOLLOW_POLL_INTERVAL_MS};
use pkg_constants::state::{LOGS_PREFIX, NAMESPACES_PREFIX, REGISTRY_PREFIX};
use pkg_types::{Labels, Resource};
use pkg_types::namespace::Namespace;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

use crate::selector::{FieldSelector, LabelSelector};

/// Live byte stream of a pod's log output.
pub type LogStream = Pin<Box<dyn Stream<Item = anyhow::Result<Vec<u8>>> + Send>>;

/// Optional filters for [`ResourceStore::list`].
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// `key=value[,key=value]`
    pub label_selector: Option<String>,
    /// Labels an object must carry with exactly these values. Values are
    /// compared as-is, never parsed as selector syntax.
    pub match_labels: Labels,
    /// `metadata.name=<name>` / `metadata.namespace=<ns>`
    pub field_selector: Option<String>,
}

impl ListParams {
    pub fn labels(selector: impl Into<String>) -> Self {
        Self {
            label_selector: Some(selector.into()),
            ..Self::default()
        }
    }

    pub fn matching(labels: Labels) -> Self {
        Self {
            match_labels: labels,
            ..Self::default()
        }
    }

    fn accepts(&self, labels: &Labels) -> bool {
        self.match_labels
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
    }
}

#[derive(Debug, Clone)]
pub struct LogParams {
    /// Container to read; the first one found when unset.
    pub container: Option<String>,
    pub tail_lines: usize,
    pub follow: bool,
}

impl Default for LogParams {
    fn default() -> Self {
        Self {
            container: None,
            tail_lines: DEFAULT_TAIL_LINES,
            follow: false,
        }
    }
}

/// Lists and gets typed cluster objects. The aggregator never sees anything
/// below this trait.
#[async_trait]
pub trait ResourceStore: Send + Sync + 'static {
    async fn list_namespaces(&self) -> anyhow::Result<Vec<Namespace>>;

    /// All objects of `T` in `namespace` (every namespace when empty), in
    /// registry order, filtered by the given selectors.
    async fn list<T: Resource>(&self, namespace: &str, params: &ListParams)
    -> anyhow::Result<Vec<T>>;

    async fn get<T: Resource>(&self, namespace: &str, name: &str) -> anyhow::Result<Option<T>>;

    async fn read_logs(
        &self,
        namespace: &str,
        pod: &str,
        params: &LogParams,
    ) -> anyhow::Result<LogStream>;
}

/// Raw key-value access to a registry. Anything implementing it is a
/// [`ResourceStore`].
#[async_trait]
pub trait RegistryBackend: Clone + Send + Sync + 'static {
    async fn read(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;

    /// All `(key, value)` pairs whose key starts with `prefix`, ordered by key.
    async fn scan(&self, prefix: &str) -> anyhow::Result<Vec<(String, Vec<u8>)>>;
}

pub fn object_prefix<T: Resource>(namespace: &str) -> String {
    if namespace.is_empty() {
        format!("{}/{}/", REGISTRY_PREFIX, T::KIND.plural())
    } else {
        format!("{}/{}/{}/", REGISTRY_PREFIX, T::KIND.plural(), namespace)
    }
}

pub fn log_key(namespace: &str, pod: &str, container: &str) -> String {
    format!("{}/{}/{}/{}", LOGS_PREFIX, namespace, pod, container)
}

fn decode_all<T: Resource>(entries: Vec<(String, Vec<u8>)>) -> Vec<T> {
    entries
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_slice::<T>(&value) {
            Ok(obj) => Some(obj),
            Err(e) => {
                warn!("Skipping undecodable {} at {}: {}", T::KIND, key, e);
                None
            }
        })
        .collect()
}

/// Last `n` lines of `data`, keeping the trailing newline if present.
pub fn tail_lines(data: &[u8], n: usize) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    let body = data.strip_suffix(b"\n").unwrap_or(data);
    let start = body
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, b)| **b == b'\n')
        .nth(n - 1)
        .map(|(i, _)| i + 1)
        .unwrap_or(0);
    data[start..].to_vec()
}

#[async_trait]
impl<B: RegistryBackend> ResourceStore for B {
    async fn list_namespaces(&self) -> anyhow::Result<Vec<Namespace>> {
        let entries = self.scan(NAMESPACES_PREFIX).await?;
        Ok(decode_all(entries))
    }

    async fn list<T: Resource>(
        &self,
        namespace: &str,
        params: &ListParams,
    ) -> anyhow::Result<Vec<T>> {
        let labels = LabelSelector::parse(params.label_selector.as_deref().unwrap_or_default())?;
        let fields = FieldSelector::parse(params.field_selector.as_deref().unwrap_or_default())?;

        let entries = self.scan(&object_prefix::<T>(namespace)).await?;
        let mut items: Vec<T> = decode_all(entries);
        items.retain(|obj| {
            params.accepts(obj.labels())
                && labels.matches(obj.labels())
                && fields.matches(obj.meta())
        });
        Ok(items)
    }

    async fn get<T: Resource>(&self, namespace: &str, name: &str) -> anyhow::Result<Option<T>> {
        // registry keys are object ids, not names
        let entries = self.scan(&object_prefix::<T>(namespace)).await?;
        let by_name = FieldSelector::name(name);
        Ok(decode_all::<T>(entries)
            .into_iter()
            .find(|obj| by_name.matches(obj.meta())))
    }

    async fn read_logs(
        &self,
        namespace: &str,
        pod: &str,
        params: &LogParams,
    ) -> anyhow::Result<LogStream> {
        let key = match &params.container {
            Some(container) => log_key(namespace, pod, container),
            None => {
                let prefix = format!("{}/{}/{}/", LOGS_PREFIX, namespace, pod);
                match self.scan(&prefix).await?.into_iter().next() {
                    Some((key, _)) => key,
                    None => anyhow::bail!("no logs recorded for pod {}/{}", namespace, pod),
                }
            }
        };

        let Some(data) = self.read(&key).await? else {
            anyhow::bail!("no logs recorded at {}", key);
        };
        let head = tail_lines(&data, params.tail_lines);

        if !params.follow {
            return Ok(stream::once(async move { Ok::<_, anyhow::Error>(head) }).boxed());
        }

        let backend = self.clone();
        let offset = data.len();
        let interval = Duration::from_millis(FOLLOW_POLL_INTERVAL_MS);
        let follow = stream::unfold(Some((backend, key, offset)), move |state| async move {
            let (backend, key, mut offset) = state?;
            loop {
                tokio::time::sleep(interval).await;
                match backend.read(&key).await {
                    Ok(Some(data)) => {
                        if data.len() < offset {
                            debug!("Log {} was truncated, following from the start", key);
                            offset = 0;
                        }
                        if data.len() > offset {
                            let chunk = data[offset..].to_vec();
                            let next = data.len();
                            return Some((Ok(chunk), Some((backend, key, next))));
                        }
                    }
                    // log removed with its pod
                    Ok(None) => return None,
                    Err(e) => return Some((Err(e), None)),
                }
            }
        });

        Ok(stream::once(async move { Ok::<_, anyhow::Error>(head) }).chain(follow).boxed())
    }
}
