use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::authentication::ports::AuthGate;
use crate::domain::user::models::User;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension holding the user resolved by the auth gate.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Resolve the bearer token through the auth gate and expose the user to handlers.
///
/// Every rejection produces the same 401 body; the reason is only logged.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&req)
        .map_err(|reason| {
            tracing::warn!(reason, "Rejected request credentials");
            ApiError::unauthenticated()
        })?
        .to_string();

    let user = state.auth_service.authenticate(&token).await.map_err(|e| {
        if e.is_rejection() {
            tracing::warn!(reason = %e, "Rejected bearer token");
        } else {
            tracing::error!(error = %e, "Bearer token could not be resolved");
        }
        ApiError::from(e)
    })?;

    tracing::debug!(user_id = %user.id, "Request authenticated");
    req.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, &'static str> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or("missing Authorization header")?
        .to_str()
        .map_err(|_| "Authorization header is not visible ASCII")?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or("Authorization header is not of the form `Bearer <token>`")?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err("Authorization scheme is not Bearer");
    }
    if token.is_empty() {
        return Err("empty bearer token");
    }

    Ok(token)
}
