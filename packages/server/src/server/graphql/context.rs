use juniper::FieldResult;
use std::sync::Arc;

use crate::common::UserId;
use crate::domains::auth::AuthError;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// GraphQL request context
///
/// Shared deps plus whoever the bearer token resolved to for this request.
#[derive(Clone)]
pub struct GraphQLContext {
    pub deps: Arc<ServerDeps>,
    pub auth_user: Option<AuthUser>,
    pub default_search_radius_km: f64,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(
        deps: Arc<ServerDeps>,
        auth_user: Option<AuthUser>,
        default_search_radius_km: f64,
    ) -> Self {
        Self {
            deps,
            auth_user,
            default_search_radius_km,
        }
    }

    /// Current user id, or UNAUTHENTICATED
    pub fn require_user(&self) -> FieldResult<UserId> {
        self.auth_user
            .as_ref()
            .map(|user| user.user_id)
            .ok_or_else(|| AuthError::AuthenticationRequired.into_field_error())
    }
}
