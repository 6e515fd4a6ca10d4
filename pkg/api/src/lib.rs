pub mod auth;
pub mod error;
pub mod handlers;
pub mod request_id;
pub mod server;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use pkg_aggregator::Aggregator;
use pkg_rbac::{PolicyEngine, Role};

/// Token table and policy switches consulted by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// When false every request runs as `default_role`.
    pub enabled: bool,
    pub tokens: HashMap<String, Role>,
    pub default_role: Role,
    pub engine: PolicyEngine,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tokens: HashMap::new(),
            default_role: Role::operator(),
            engine: PolicyEngine::new(false),
        }
    }
}

/// Shared application state injected into all Axum handlers.
pub struct AppState<S> {
    pub aggregator: Aggregator<S>,
    pub auth: Arc<AuthConfig>,
    pub request_timeout: Duration,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            aggregator: self.aggregator.clone(),
            auth: Arc::clone(&self.auth),
            request_timeout: self.request_timeout,
        }
    }
}
