use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path as AxumPath, Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use pkg_aggregator::{LogRequest, LogSnapshot};
use pkg_state::ResourceStore;
use serde::Deserialize;
use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::AppState;
use crate::auth::Caller;
use crate::error::{AppError, with_deadline};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    /// First container of the pod when omitted.
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default, alias = "tail")]
    pub tail_lines: Option<usize>,
}

fn log_request(ns: String, pod: String, query: LogQuery, follow: bool) -> LogRequest {
    LogRequest {
        container: query.container,
        tail_lines: query.tail_lines,
        follow,
        ..LogRequest::new(ns, pod)
    }
}

/// SSE data may not carry carriage returns; the trailing newline is implied.
fn event_data(chunk: &[u8]) -> String {
    String::from_utf8_lossy(chunk)
        .replace('\r', "")
        .trim_end_matches('\n')
        .to_string()
}

/// GET /api/v1/namespaces/{ns}/pods/{name}/logs — the log's current tail.
pub async fn get_logs<S: ResourceStore>(
    State(state): State<AppState<S>>,
    Caller(role): Caller,
    AxumPath((ns, pod)): AxumPath<(String, String)>,
    Query(query): Query<LogQuery>,
) -> Result<Json<LogSnapshot>, AppError> {
    let req = log_request(ns, pod, query, false);
    let snapshot = with_deadline(
        state.request_timeout,
        state.aggregator.logs(role.as_ref(), &req),
    )
    .await?;
    Ok(Json(snapshot))
}

/// GET /api/v1/namespaces/{ns}/pods/{name}/logs/stream — SSE endpoint
/// following the log. Read failures are sent as `error` events.
pub async fn stream_logs<S: ResourceStore>(
    State(state): State<AppState<S>>,
    Caller(role): Caller,
    AxumPath((ns, pod)): AxumPath<(String, String)>,
    Query(query): Query<LogQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let req = log_request(ns, pod, query, true);
    let stream = with_deadline(
        state.request_timeout,
        state.aggregator.read_logs(role.as_ref(), &req),
    )
    .await?;

    info!("Following logs of pod {}/{}", req.namespace, req.pod);

    let events = stream.map(|chunk| {
        let event = match chunk {
            Ok(bytes) => Event::default().data(event_data(&bytes)),
            Err(e) => Event::default()
                .event("error")
                .data(e.to_string().replace(['\r', '\n'], " ")),
        };
        Ok::<_, Infallible>(event)
    });
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
