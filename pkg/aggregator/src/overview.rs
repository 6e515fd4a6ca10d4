use pkg_rbac::RoleAssigner;
use pkg_state::{ListParams, ResourceStore};
use pkg_types::daemonset::DaemonSet;
use pkg_types::deployment::Deployment;
use pkg_types::job::Job;
use pkg_types::namespace::Namespace;
use pkg_types::pod::Pod;
use pkg_types::replicaset::ReplicaSet;
use pkg_types::service::Service;
use pkg_types::{ApiError, Resource};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::aggregator::{Aggregator, Listing};
use crate::request::{AggregationRequest, ErrorCollector};
use crate::shape::{
    ConfigMapOverview, DaemonSetOverview, DeploymentOverview, JobOverview, PodOverview,
    ReplicaSetOverview, ResourceOverview, ServiceOverview,
};

/// Every visible object of one application in one namespace, by kind.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub linked_name: String,
    pub namespace: String,
    pub daemon_sets: Vec<DaemonSetOverview>,
    pub deployments: Vec<DeploymentOverview>,
    pub jobs: Vec<JobOverview>,
    pub pods: Vec<PodOverview>,
    pub replica_sets: Vec<ReplicaSetOverview>,
    pub services: Vec<ServiceOverview>,
    pub config_maps: Vec<ConfigMapOverview>,
}

/// One entry of the cluster-wide application listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewLink {
    pub linked_name: String,
    pub namespace: String,
}

impl OverviewLink {
    fn same_as(&self, other: &OverviewLink) -> bool {
        self.linked_name.eq_ignore_ascii_case(&other.linked_name)
            && self.namespace.eq_ignore_ascii_case(&other.namespace)
    }
}

impl<T> From<&ResourceOverview<T>> for OverviewLink {
    fn from(item: &ResourceOverview<T>) -> Self {
        Self {
            linked_name: item.linked_name.clone(),
            namespace: item.namespace.clone(),
        }
    }
}

/// Case-insensitive dedupe on `(linked name, namespace)`; first one wins.
pub fn dedupe_links(links: impl IntoIterator<Item = OverviewLink>) -> Vec<OverviewLink> {
    let mut out: Vec<OverviewLink> = Vec::new();
    for link in links {
        if !out.iter().any(|seen| seen.same_as(&link)) {
            out.push(link);
        }
    }
    out
}

fn keep<T>(result: Result<Vec<T>, ApiError>, errors: &mut Vec<ApiError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        errors.push(e);
        Vec::new()
    })
}

fn push_links<T>(
    result: Result<Vec<ResourceOverview<T>>, ApiError>,
    links: &mut Vec<OverviewLink>,
    collector: &ErrorCollector,
) {
    match result {
        Ok(items) => links.extend(items.iter().map(OverviewLink::from)),
        Err(e) => collector.push(e),
    }
}

impl<S: ResourceStore> Aggregator<S> {
    /// All kinds for one application, fetched concurrently. Any failing
    /// kind fails the whole overview.
    pub async fn overview<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
    ) -> Result<Overview, ApiError> {
        let (daemon_sets, deployments, jobs, pods, replica_sets, services, config_maps) = tokio::join!(
            self.daemon_sets(req),
            self.deployments(req),
            self.jobs(req),
            self.pods(req),
            self.replica_sets(req),
            self.services(req),
            self.config_maps(req),
        );

        let mut errors = Vec::new();
        let overview = Overview {
            linked_name: req.linked_name.clone().unwrap_or_default(),
            namespace: req.namespace.clone(),
            daemon_sets: keep(daemon_sets, &mut errors),
            deployments: keep(deployments, &mut errors),
            jobs: keep(jobs, &mut errors),
            pods: keep(pods, &mut errors),
            replica_sets: keep(replica_sets, &mut errors),
            services: keep(services, &mut errors),
            config_maps: keep(config_maps, &mut errors),
        };

        if !errors.is_empty() {
            warn!(
                "Overview of {} in {} failed for {} kind(s)",
                overview.linked_name,
                overview.namespace,
                errors.len()
            );
            return Err(ApiError::from_list(&errors));
        }
        Ok(overview)
    }

    /// Namespaces the caller may see.
    pub async fn namespaces<R: RoleAssigner>(&self, role: &R) -> Result<Vec<Namespace>, ApiError> {
        let namespaces = self.store.list_namespaces().await.map_err(|e| {
            warn!("Failed to list namespaces: {}", e);
            ApiError::internal(e)
        })?;
        Ok(namespaces
            .into_iter()
            .filter(|ns| role.has_namespace_access(ns.name()))
            .collect())
    }

    /// Workload kinds of one namespace reduced to their application links.
    async fn namespace_links<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
        collector: &ErrorCollector,
    ) -> Vec<OverviewLink> {
        let params = ListParams::default();
        let primary = Listing::Primary;
        let (daemon_sets, deployments, jobs, pods, replica_sets, services) = tokio::join!(
            self.fetch::<DaemonSet, R, _>(req, &params, primary, R::has_daemon_set_access),
            self.fetch::<Deployment, R, _>(req, &params, primary, R::has_deployment_access),
            self.fetch::<Job, R, _>(req, &params, primary, R::has_job_access),
            self.fetch::<Pod, R, _>(req, &params, primary, R::has_pod_access),
            self.fetch::<ReplicaSet, R, _>(req, &params, primary, R::has_daemon_set_access),
            self.fetch::<Service, R, _>(req, &params, primary, R::has_service_access),
        );

        let mut links = Vec::new();
        push_links(daemon_sets, &mut links, collector);
        push_links(deployments, &mut links, collector);
        push_links(jobs, &mut links, collector);
        push_links(pods, &mut links, collector);
        push_links(replica_sets, &mut links, collector);
        push_links(services, &mut links, collector);
        links
    }

    /// Cluster-wide application listing: every accessible namespace is
    /// scanned concurrently and any failure fails the whole listing.
    pub async fn overviews<R: RoleAssigner>(
        &self,
        role: Arc<R>,
    ) -> Result<Vec<OverviewLink>, ApiError> {
        let namespaces = self.store.list_namespaces().await.map_err(|e| {
            warn!("Failed to list namespaces: {}", e);
            ApiError::internal(e)
        })?;

        let collector = Arc::new(ErrorCollector::default());
        let mut slots: Vec<Vec<OverviewLink>> = vec![Vec::new(); namespaces.len()];
        let mut workers = JoinSet::new();

        for (index, ns) in namespaces.iter().enumerate() {
            if !role.has_namespace_access(ns.name()) {
                debug!("Skipping namespace {}", ns.name());
                continue;
            }
            let req = AggregationRequest::new(ns.name(), Arc::clone(&role));
            let this = self.clone();
            let collector = Arc::clone(&collector);
            workers.spawn(async move { (index, this.namespace_links(&req, &collector).await) });
        }

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((index, links)) => slots[index] = links,
                Err(e) => collector.push(ApiError::internal(format!("namespace worker: {}", e))),
            }
        }
        collector.finish()?;

        let links = dedupe_links(slots.into_iter().flatten());
        info!(
            "Listed {} application(s) across {} namespace(s)",
            links.len(),
            namespaces.len()
        );
        Ok(links)
    }
}
