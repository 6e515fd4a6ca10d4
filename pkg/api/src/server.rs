use axum::{Router, middleware, routing::get};
use pkg_aggregator::{Aggregator, ShapeSettings};
use pkg_state::ResourceStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::auth::auth_middleware;
use crate::handlers::{cluster, logs, resources};
use crate::request_id::request_id_middleware;
use crate::{AppState, AuthConfig};

/// Server configuration passed from the binary's CLI.
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub request_timeout: Duration,
    pub auth: AuthConfig,
    pub settings: ShapeSettings,
}

/// Build the full router over `state`.
pub fn router<S: ResourceStore>(state: AppState<S>) -> Router {
    // Protected API routes
    let api_routes = Router::new()
        .route("/api/v1/namespaces", get(cluster::list_namespaces::<S>))
        .route("/api/v1/overviews", get(cluster::list_overviews::<S>))
        .route(
            "/api/v1/overviews/{linked_name}",
            get(cluster::get_overview::<S>),
        )
        .route("/api/v1/{kind}", get(resources::list_all::<S>))
        .route(
            "/api/v1/namespaces/{ns}/{kind}",
            get(resources::list_resources::<S>),
        )
        .route(
            "/api/v1/namespaces/{ns}/{kind}/{name}",
            get(resources::get_resource::<S>),
        )
        .route(
            "/api/v1/namespaces/{ns}/pods/{name}/logs",
            get(logs::get_logs::<S>),
        )
        .route(
            "/api/v1/namespaces/{ns}/pods/{name}/logs/stream",
            get(logs::stream_logs::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<S>,
        ));

    // Public routes + merged
    Router::new()
        .route("/healthz", get(cluster::healthz))
        .merge(api_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

pub async fn start_server<S: ResourceStore>(store: S, config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState {
        aggregator: Aggregator::new(Arc::new(store), config.settings),
        auth: Arc::new(config.auth),
        request_timeout: config.request_timeout,
    };
    let app = router(state);

    info!("Starting API server on {}", config.addr);
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use pkg_constants::network::REQUEST_ID_HEADER;
    use pkg_rbac::{PolicyEngine, Role};
    use pkg_state::memory::{Fixture, MemoryStore};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use tower::ServiceExt;

    async fn make_store() -> MemoryStore {
        let fixture: Fixture = serde_json::from_value(json!({
            "namespaces": ["default", "ns1", "ns2"],
            "services": [
                { "name": "svc1", "namespace": "ns1", "labels": { "app": "svc1" },
                  "spec": { "selector": { "app": "svc1" } } },
                { "name": "svc2", "namespace": "ns1", "labels": { "app": "svc2" },
                  "spec": { "selector": { "app": "svc2" } } },
                { "name": "svc3", "namespace": "ns2", "labels": { "app": "svc3" },
                  "spec": { "selector": { "app": "svc3" } } }
            ],
            "pods": [
                { "name": "svc1-0", "namespace": "ns1", "labels": { "app": "svc1" },
                  "spec": { "containers": [
                      { "name": "app", "image": "svc1:1.0", "env": { "DB_PASSWORD": "x", "MODE": "live" } }
                  ] } },
                { "name": "svc3-0", "namespace": "ns2", "labels": { "app": "svc3" },
                  "spec": { "containers": [ { "name": "app", "image": "svc3:1.0" } ] } }
            ],
            "logs": {
                "ns1/svc1-0/app": "booting\nready\n",
                "ns2/svc3-0/app": "hello\n"
            }
        }))
        .unwrap();
        let store = MemoryStore::new();
        store.load(fixture).await.unwrap();
        store
    }

    async fn make_app(auth: AuthConfig) -> Router {
        let state = AppState {
            aggregator: Aggregator::new(Arc::new(make_store().await), ShapeSettings::default()),
            auth: Arc::new(auth),
            request_timeout: Duration::from_secs(5),
        };
        router(state)
    }

    fn make_auth() -> AuthConfig {
        AuthConfig {
            enabled: true,
            tokens: HashMap::from([
                ("ops".to_string(), Role::operator().with_exclusions(["ns2"])),
                ("svc1-team".to_string(), Role::viewer(["app=svc1"])),
            ]),
            default_role: Role::default(),
            engine: PolicyEngine::new(true),
        }
    }

    async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let response = app
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn names(body: &Value) -> Vec<String> {
        let mut names: Vec<String> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["name"].as_str().unwrap().to_string())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn healthz_is_public_and_tagged() {
        let app = make_app(make_auth()).await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .header(REQUEST_ID_HEADER, "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
    }

    #[tokio::test]
    async fn api_requires_a_known_token() {
        let app = make_app(make_auth()).await;

        let (status, body) = get(&app, "/api/v1/namespaces", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 401);

        let (status, _) = get(&app, "/api/v1/namespaces", Some("nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn viewer_sees_only_matching_services() {
        let app = make_app(make_auth()).await;
        let (status, body) = get(&app, "/api/v1/namespaces/ns1/services", Some("svc1-team")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["svc1"]);
    }

    #[tokio::test]
    async fn operator_exclusions_apply_to_lists_and_namespaces() {
        let app = make_app(make_auth()).await;

        let (status, body) = get(&app, "/api/v1/services", Some("ops")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["svc1", "svc2"]);

        let (_, body) = get(&app, "/api/v1/namespaces", Some("ops")).await;
        assert_eq!(names(&body), vec!["default", "ns1"]);
    }

    #[tokio::test]
    async fn linked_name_filters_the_list() {
        let app = make_app(make_auth()).await;
        let (_, body) = get(&app, "/api/v1/namespaces/ns1/services?linkedName=svc2", Some("ops")).await;
        assert_eq!(names(&body), vec!["svc2"]);
    }

    #[tokio::test]
    async fn selector_syntax_in_linked_name_is_not_interpreted() {
        let app = make_app(make_auth()).await;
        for uri in [
            "/api/v1/namespaces/ns1/services?linkedName=svc1%2Ctier",
            "/api/v1/namespaces/ns1/services?linkedName=svc1%21%3Dx",
        ] {
            let (status, body) = get(&app, uri, Some("ops")).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert!(names(&body).is_empty(), "{}", uri);
        }
    }

    #[tokio::test]
    async fn overviews_list_one_link_per_application() {
        let app = make_app(make_auth()).await;
        let (status, body) = get(&app, "/api/v1/overviews", Some("ops")).await;
        assert_eq!(status, StatusCode::OK);
        let mut links: Vec<String> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|l| {
                let ns = l["namespace"].as_str().unwrap();
                format!("{}/{}", ns, l["linkedName"].as_str().unwrap())
            })
            .collect();
        links.sort();
        assert_eq!(links, vec!["ns1/svc1", "ns1/svc2"]);
    }

    #[tokio::test]
    async fn overview_groups_one_application() {
        let app = make_app(make_auth()).await;
        let (status, body) = get(&app, "/api/v1/overviews/svc1?namespace=ns1", Some("ops")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["linkedName"], "svc1");
        assert_eq!(names(&body["services"]), vec!["svc1"]);
        assert_eq!(names(&body["pods"]), vec!["svc1-0"]);
    }

    #[tokio::test]
    async fn detail_errors_map_to_status_codes() {
        let app = make_app(make_auth()).await;

        let (status, _) = get(&app, "/api/v1/namespaces/ns1/secrets", Some("ops")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get(&app, "/api/v1/namespaces/ns1/services/gone", Some("ops")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);

        let (status, _) = get(&app, "/api/v1/namespaces/ns2/services/svc3", Some("ops")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn pod_detail_hides_sensitive_env() {
        let app = make_app(AuthConfig::default()).await;
        let (status, body) = get(&app, "/api/v1/namespaces/ns1/pods/svc1-0", None).await;
        assert_eq!(status, StatusCode::OK);
        let env = &body["object"]["spec"]["containers"][0]["env"];
        assert_eq!(env["MODE"], "live");
        assert!(env.get("DB_PASSWORD").is_none());
    }

    #[tokio::test]
    async fn logs_return_the_tail() {
        let app = make_app(make_auth()).await;
        let (status, body) = get(
            &app,
            "/api/v1/namespaces/ns1/pods/svc1-0/logs?tailLines=1",
            Some("svc1-team"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pod"], "svc1-0");
        assert_eq!(body["output"], "ready\n");

        let (status, _) = get(&app, "/api/v1/namespaces/ns2/pods/svc3-0/logs", Some("ops")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn disabled_auth_uses_the_default_role() {
        let app = make_app(AuthConfig::default()).await;
        let (status, body) = get(&app, "/api/v1/services", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["svc1", "svc2", "svc3"]);
    }
}
