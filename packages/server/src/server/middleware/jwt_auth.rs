use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::common::UserId;
use crate::domains::auth::{AuthError, JwtService};

/// The user a verified bearer token speaks for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
}

/// Resolve the `Authorization` header into an `AuthUser` extension
///
/// No header means an anonymous request; resolvers that need a user answer
/// UNAUTHENTICATED themselves. A header that is present but malformed,
/// expired or forged is refused here with 401, so a client never silently
/// degrades to anonymous.
pub async fn authenticate(
    State(jwt_service): State<Arc<JwtService>>,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve(request.headers(), &jwt_service) {
        Ok(Some(user)) => {
            debug!(user_id = %user.user_id, "Authenticated request");
            request.extensions_mut().insert(user);
        }
        Ok(None) => debug!("Anonymous request"),
        Err(e) => {
            warn!(error = %e, "Rejected bearer token");
            return unauthorized(e);
        }
    }

    next.run(request).await
}

fn resolve(headers: &HeaderMap, jwt_service: &JwtService) -> Result<Option<AuthUser>, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let token = value
        .to_str()
        .ok()
        .and_then(bearer_token)
        .ok_or_else(|| AuthError::InvalidToken("expected `Bearer <token>`".to_string()))?;

    let user_id = jwt_service.verify(token)?;
    Ok(Some(AuthUser { user_id }))
}

/// Token part of a `Bearer` credential; the scheme is case-insensitive
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn unauthorized(error: AuthError) -> Response {
    let body = json!({
        "errors": [{
            "message": error.to_string(),
            "extensions": { "code": error.code() },
        }]
    });
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
