use futures_util::StreamExt;
use pkg_constants::logs::{DEFAULT_TAIL_LINES, FOLLOW_TAIL_LINES};
use pkg_rbac::RoleAssigner;
use pkg_state::{LogParams, LogStream, ResourceStore};
use pkg_types::pod::Pod;
use pkg_types::validate::validate_name;
use pkg_types::{ApiError, Resource};
use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregator::Aggregator;

/// Which log to read and how much of it.
#[derive(Debug, Clone, Default)]
pub struct LogRequest {
    pub namespace: String,
    pub pod: String,
    /// First container of the pod when unset.
    pub container: Option<String>,
    /// Trailing lines; ignored when following.
    pub tail_lines: Option<usize>,
    pub follow: bool,
}

impl LogRequest {
    pub fn new(namespace: impl Into<String>, pod: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            pod: pod.into(),
            ..Self::default()
        }
    }

    fn params(&self) -> LogParams {
        let tail_lines = if self.follow {
            FOLLOW_TAIL_LINES
        } else {
            self.tail_lines
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_TAIL_LINES)
        };
        LogParams {
            container: self.container.clone().filter(|c| !c.is_empty()),
            tail_lines,
            follow: self.follow,
        }
    }
}

/// Collected output of one pod's log.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LogSnapshot {
    pub pod: String,
    pub output: String,
}

impl<S: ResourceStore> Aggregator<S> {
    /// Live log stream for a pod the caller may read.
    pub async fn read_logs<R: RoleAssigner>(
        &self,
        role: &R,
        req: &LogRequest,
    ) -> Result<LogStream, ApiError> {
        if req.pod.is_empty() {
            return Err(ApiError::validation("pod name must be provided when getting logs"));
        }
        if req.namespace.is_empty() {
            return Err(ApiError::validation("namespace must be provided when getting logs"));
        }
        validate_name(&req.pod).map_err(|e| ApiError::validation(e.to_string()))?;

        if !role.has_namespace_access(&req.namespace) {
            debug!("Logs in namespace {} forbidden", req.namespace);
            return Err(ApiError::Forbidden);
        }

        let pod = self
            .store
            .get::<Pod>(&req.namespace, &req.pod)
            .await
            .map_err(|e| {
                warn!("Failed to get pod {}/{}: {}", req.namespace, req.pod, e);
                ApiError::internal(e)
            })?
            .ok_or_else(|| ApiError::not_found(format!("Pod {}/{}", req.namespace, req.pod)))?;

        let labels = pod.labels();
        if !role.has_pod_access(labels)
            || !role.has_log_access(labels)
            || !role.matches(labels, None)
        {
            debug!("Logs of pod {}/{} forbidden", req.namespace, req.pod);
            return Err(ApiError::Forbidden);
        }

        self.store
            .read_logs(&req.namespace, &req.pod, &req.params())
            .await
            .map_err(|e| {
                warn!("Failed to read logs of {}/{}: {}", req.namespace, req.pod, e);
                ApiError::internal(e)
            })
    }

    /// The log's current tail, collected into one string.
    pub async fn logs<R: RoleAssigner>(
        &self,
        role: &R,
        req: &LogRequest,
    ) -> Result<LogSnapshot, ApiError> {
        let req = LogRequest {
            follow: false,
            ..req.clone()
        };
        let mut stream = self.read_logs(role, &req).await?;

        let mut output = Vec::new();
        while let Some(chunk) = stream.next().await {
            output.extend(chunk.map_err(ApiError::internal)?);
        }
        Ok(LogSnapshot {
            pod: req.pod,
            output: String::from_utf8_lossy(&output).into_owned(),
        })
    }
}
