//! Per-kind list and detail operations.
//!
//! Lists are filtered by the request's linked name and never report policy
//! denials. Detail lookups return `Forbidden` when the object exists but is
//! hidden from the caller.

use pkg_rbac::RoleAssigner;
use pkg_state::ResourceStore;
use pkg_types::Resource;
use pkg_types::configmap::ConfigMap;
use pkg_types::daemonset::DaemonSet;
use pkg_types::deployment::Deployment;
use pkg_types::job::Job;
use pkg_types::pod::Pod;
use pkg_types::replicaset::ReplicaSet;
use pkg_types::service::Service;
use pkg_types::ApiError;

use crate::aggregator::{Aggregator, Listing};
use crate::request::AggregationRequest;
use crate::shape::{
    ConfigMapOverview, DaemonSetOverview, DeploymentOverview, JobOverview, PodOverview,
    ReplicaSetOverview, ServiceOverview, ShapeSettings,
};

/// Drop env vars the caller may not see, and sensitive ones always.
fn sanitize_pod<R: RoleAssigner>(role: &R, settings: &ShapeSettings, pod: &mut Pod) {
    let show_env = role.has_env_vars_access(pod.labels());
    for container in &mut pod.spec.containers {
        if show_env {
            container.env.retain(|name, _| !settings.is_sensitive(name));
        } else {
            container.env.clear();
        }
    }
}

impl<S: ResourceStore> Aggregator<S> {
    // --- Services ---

    pub async fn services<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
    ) -> Result<Vec<ServiceOverview>, ApiError> {
        let params = self.settings.link_params(req.linked_name.as_deref());
        let items: Vec<ServiceOverview> = self
            .fetch(req, &params, Listing::Primary, R::has_service_access)
            .await?;
        Ok(self.with_related(req, items).await)
    }

    pub async fn service<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
        name: &str,
    ) -> Result<ServiceOverview, ApiError> {
        let item = self.fetch_one::<Service, R, _>(req, name, R::has_service_access).await?;
        Ok(self.with_related(req, vec![item]).await.remove(0))
    }

    // --- Deployments ---

    pub async fn deployments<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
    ) -> Result<Vec<DeploymentOverview>, ApiError> {
        let params = self.settings.link_params(req.linked_name.as_deref());
        self.fetch(req, &params, Listing::Primary, R::has_deployment_access)
            .await
    }

    pub async fn deployment<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
        name: &str,
    ) -> Result<DeploymentOverview, ApiError> {
        self.fetch_one::<Deployment, R, _>(req, name, R::has_deployment_access)
            .await
    }

    // --- DaemonSets ---

    pub async fn daemon_sets<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
    ) -> Result<Vec<DaemonSetOverview>, ApiError> {
        let params = self.settings.link_params(req.linked_name.as_deref());
        let items: Vec<DaemonSetOverview> = self
            .fetch(req, &params, Listing::Primary, R::has_daemon_set_access)
            .await?;
        Ok(self.with_related(req, items).await)
    }

    pub async fn daemon_set<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
        name: &str,
    ) -> Result<DaemonSetOverview, ApiError> {
        let item = self
            .fetch_one::<DaemonSet, R, _>(req, name, R::has_daemon_set_access)
            .await?;
        Ok(self.with_related(req, vec![item]).await.remove(0))
    }

    // --- Jobs ---

    pub async fn jobs<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
    ) -> Result<Vec<JobOverview>, ApiError> {
        let params = self.settings.link_params(req.linked_name.as_deref());
        self.fetch(req, &params, Listing::Primary, R::has_job_access)
            .await
    }

    pub async fn job<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
        name: &str,
    ) -> Result<JobOverview, ApiError> {
        self.fetch_one::<Job, R, _>(req, name, R::has_job_access).await
    }

    // --- ReplicaSets ---
    // Gated by the daemon set capability.

    pub async fn replica_sets<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
    ) -> Result<Vec<ReplicaSetOverview>, ApiError> {
        let params = self.settings.link_params(req.linked_name.as_deref());
        self.fetch(req, &params, Listing::Primary, R::has_daemon_set_access)
            .await
    }

    pub async fn replica_set<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
        name: &str,
    ) -> Result<ReplicaSetOverview, ApiError> {
        self.fetch_one::<ReplicaSet, R, _>(req, name, R::has_daemon_set_access)
            .await
    }

    // --- Pods ---

    pub async fn pods<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
    ) -> Result<Vec<PodOverview>, ApiError> {
        let params = self.settings.link_params(req.linked_name.as_deref());
        let mut items: Vec<PodOverview> = self
            .fetch(req, &params, Listing::Primary, R::has_pod_access)
            .await?;
        for item in &mut items {
            sanitize_pod(req.role.as_ref(), &self.settings, &mut item.object);
        }
        Ok(items)
    }

    pub async fn pod<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
        name: &str,
    ) -> Result<PodOverview, ApiError> {
        let mut item = self.fetch_one::<Pod, R, _>(req, name, R::has_pod_access).await?;
        sanitize_pod(req.role.as_ref(), &self.settings, &mut item.object);
        Ok(item)
    }

    // --- ConfigMaps ---

    pub async fn config_maps<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
    ) -> Result<Vec<ConfigMapOverview>, ApiError> {
        let params = self.settings.link_params(req.linked_name.as_deref());
        self.fetch(req, &params, Listing::Primary, R::has_config_map_access)
            .await
    }

    pub async fn config_map<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
        name: &str,
    ) -> Result<ConfigMapOverview, ApiError> {
        self.fetch_one::<ConfigMap, R, _>(req, name, R::has_config_map_access)
            .await
    }
}
