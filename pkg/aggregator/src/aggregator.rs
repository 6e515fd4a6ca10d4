use futures_util::future::join_all;
use pkg_rbac::RoleAssigner;
use pkg_state::{ListParams, ResourceStore};
use pkg_types::configmap::ConfigMap;
use pkg_types::deployment::Deployment;
use pkg_types::validate::validate_name;
use pkg_types::{ApiError, Labels, Resource};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::request::AggregationRequest;
use crate::shape::{
    ConfigMapOverview, DeploymentOverview, ResourceOverview, ShapeSettings,
};

/// Fetch, filter and shape pipeline shared by every kind.
pub struct Aggregator<S> {
    pub(crate) store: Arc<S>,
    pub(crate) settings: Arc<ShapeSettings>,
}

impl<S> Clone for Aggregator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            settings: Arc::clone(&self.settings),
        }
    }
}

/// Which pass of the pipeline a list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Listing {
    /// Top-level list; objects must also carry one of the caller's match
    /// labels with its exact value. Detail lookups skip this rule, so a
    /// viewer may open an object by name that its lists leave out.
    Primary,
    /// Objects looked up for an already visible parent.
    Related,
}

fn ns_label(namespace: &str) -> &str {
    if namespace.is_empty() { "<all>" } else { namespace }
}

impl<S: ResourceStore> Aggregator<S> {
    pub fn new(store: Arc<S>, settings: ShapeSettings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &ShapeSettings {
        &self.settings
    }

    /// List one kind. A store failure fails the whole kind; denied objects
    /// are dropped silently.
    pub(crate) async fn fetch<T, R, F>(
        &self,
        req: &AggregationRequest<R>,
        params: &ListParams,
        listing: Listing,
        allowed: F,
    ) -> Result<Vec<ResourceOverview<T>>, ApiError>
    where
        T: Resource,
        R: RoleAssigner,
        F: Fn(&R, &Labels) -> bool + Send + Sync,
    {
        let role = req.role.as_ref();
        if !role.has_application_access() || !role.has_namespace_access(&req.namespace) {
            debug!(
                "{} in {} hidden from caller",
                T::KIND.plural(),
                ns_label(&req.namespace)
            );
            return Ok(Vec::new());
        }

        let items = self
            .store
            .list::<T>(&req.namespace, params)
            .await
            .map_err(|e| {
                warn!(
                    "Failed to list {} in {}: {}",
                    T::KIND.plural(),
                    ns_label(&req.namespace),
                    e
                );
                ApiError::internal(format!(
                    "listing {} in {}: {}",
                    T::KIND.plural(),
                    ns_label(&req.namespace),
                    e
                ))
            })?;

        Ok(items
            .into_iter()
            .filter(|obj| {
                let visible = role.has_namespace_access(obj.namespace())
                    && allowed(role, obj.labels())
                    && (listing == Listing::Related
                        || role.compare_labels(Some(obj.labels()), true));
                if !visible {
                    debug!("Denied {} {}/{}", T::KIND, obj.namespace(), obj.name());
                }
                visible
            })
            .map(|obj| self.settings.shape(obj, req.label_selector.as_ref()))
            .collect())
    }

    /// Single object by name, with the same shaping as [`Self::fetch`].
    pub(crate) async fn fetch_one<T, R, F>(
        &self,
        req: &AggregationRequest<R>,
        name: &str,
        allowed: F,
    ) -> Result<ResourceOverview<T>, ApiError>
    where
        T: Resource,
        R: RoleAssigner,
        F: Fn(&R, &Labels) -> bool + Send + Sync,
    {
        if req.namespace.is_empty() {
            return Err(ApiError::validation("namespace must be provided"));
        }
        validate_name(name).map_err(|e| ApiError::validation(e.to_string()))?;

        let role = req.role.as_ref();
        if !role.has_application_access() || !role.has_namespace_access(&req.namespace) {
            debug!("Namespace {} forbidden for {}", req.namespace, T::KIND);
            return Err(ApiError::Forbidden);
        }

        let obj = self
            .store
            .get::<T>(&req.namespace, name)
            .await
            .map_err(|e| {
                warn!("Failed to get {} {}/{}: {}", T::KIND, req.namespace, name, e);
                ApiError::internal(e)
            })?
            .ok_or_else(|| {
                ApiError::not_found(format!("{} {}/{}", T::KIND, req.namespace, name))
            })?;

        if !allowed(role, obj.labels()) {
            debug!("Denied {} {}/{}", T::KIND, req.namespace, name);
            return Err(ApiError::Forbidden);
        }
        Ok(self.settings.shape(obj, req.label_selector.as_ref()))
    }

    /// Deployments and config maps selected by `selector`, each gated by its
    /// own capability. Failures are logged and leave the field empty.
    async fn related<R: RoleAssigner>(
        &self,
        req: &AggregationRequest<R>,
        selector: &Labels,
    ) -> (Option<Vec<DeploymentOverview>>, Option<Vec<ConfigMapOverview>>) {
        if selector.is_empty() {
            return (None, None);
        }
        let params = ListParams::matching(selector.clone());

        let (deployments, config_maps) = tokio::join!(
            self.fetch::<Deployment, R, _>(
                req,
                &params,
                Listing::Related,
                R::has_deployment_access
            ),
            self.fetch::<ConfigMap, R, _>(
                req,
                &params,
                Listing::Related,
                R::has_config_map_access
            ),
        );

        let deployments = deployments
            .inspect_err(|e| warn!("Related deployments lookup failed: {}", e))
            .ok();
        let config_maps = config_maps
            .inspect_err(|e| warn!("Related config maps lookup failed: {}", e))
            .ok();
        (deployments, config_maps)
    }

    /// Attach related objects to every item, one lookup per item, results
    /// kept in item order.
    pub(crate) async fn with_related<T, R>(
        &self,
        req: &AggregationRequest<R>,
        items: Vec<ResourceOverview<T>>,
    ) -> Vec<ResourceOverview<T>>
    where
        T: Resource,
        R: RoleAssigner,
    {
        let scoped: Vec<_> = items
            .iter()
            .map(|item| req.in_namespace(&item.namespace))
            .collect();
        let slots = join_all(
            items
                .iter()
                .zip(&scoped)
                .map(|(item, req)| self.related(req, &item.label_selector)),
        )
        .await;

        items
            .into_iter()
            .zip(slots)
            .map(|(mut item, (deployments, config_maps))| {
                item.deployments = deployments;
                item.config_maps = config_maps;
                item
            })
            .collect()
    }
}
