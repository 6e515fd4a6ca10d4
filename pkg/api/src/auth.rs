use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use pkg_rbac::RoleAssignment;
use pkg_types::ApiError;
use tracing::{debug, warn};

use crate::AppState;
use crate::error::AppError;

/// Middleware: resolves the caller's role and attaches it to the request.
///
/// With authentication enabled the Bearer token must name a configured role;
/// otherwise every request is assigned the default role.
pub async fn auth_middleware<S>(
    State(state): State<AppState<S>>,
    mut req: Request,
    next: Next,
) -> Response
where
    S: Send + Sync + 'static,
{
    let auth = &state.auth;
    let role = if auth.enabled {
        let Some(token) = bearer_token(&req) else {
            debug!("Request without a Bearer token");
            return AppError(ApiError::Unauthorized).into_response();
        };
        match auth.tokens.get(token) {
            Some(role) => role.clone(),
            None => {
                warn!("Invalid Bearer token provided");
                return AppError(ApiError::Unauthorized).into_response();
            }
        }
    } else {
        auth.default_role.clone()
    };

    let assignment = RoleAssignment::new(role, auth.engine);
    req.extensions_mut().insert(Arc::new(assignment));
    next.run(req).await
}

fn bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
}

/// The role attached by [`auth_middleware`]. Rejects with 401 when absent.
pub struct Caller(pub Arc<RoleAssignment>);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Arc<RoleAssignment>>()
            .cloned()
            .map(Caller)
            .ok_or(AppError(ApiError::Unauthorized))
    }
}
