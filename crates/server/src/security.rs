//! Bearer-token authentication and per-operation capability checks.
//!
//! Tokens are issued elsewhere; this module only verifies HS256 signatures and reads the `roles`
//! claim. Which roles grant which capability is decided by an [`AccessControl`] implementation.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// What an operation needs from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    SystemView,
    SystemEdit,
}

/// Authenticated caller, stored in request extensions by [`authenticate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Access-control collaborator consulted before each operation.
pub trait AccessControl: Send + Sync {
    fn permits(&self, principal: &Principal, capability: Capability) -> bool;
}

/// Grants a capability when the caller holds the base user role plus the capability's role.
#[derive(Debug, Clone)]
pub struct RoleAccessControl {
    pub user_role: String,
    pub view_role: String,
    pub edit_role: String,
}

impl RoleAccessControl {
    pub fn from_config(cfg: &configs::AuthConfig) -> Self {
        Self {
            user_role: cfg.user_role.clone(),
            view_role: cfg.view_role.clone(),
            edit_role: cfg.edit_role.clone(),
        }
    }
}

impl AccessControl for RoleAccessControl {
    fn permits(&self, principal: &Principal, capability: Capability) -> bool {
        let required = match capability {
            Capability::SystemView => &self.view_role,
            Capability::SystemEdit => &self.edit_role,
        };
        principal.has_role(&self.user_role) && principal.has_role(required)
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    roles: Vec<String>,
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verify `Authorization: Bearer <jwt>` and attach the [`Principal`].
/// Missing, malformed or expired tokens get 401.
pub async fn authenticate(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_owned();
    let Some(token) = bearer_token(&req) else {
        warn!(path = %path, "missing or malformed Authorization header");
        return Err(JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", None));
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let claims = match decode::<Claims>(token, &key, &validation) {
        Ok(data) => data.claims,
        Err(e) => {
            warn!(path = %path, err = %e, "token validation failed");
            return Err(JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(e.to_string())));
        }
    };

    debug!(subject = %claims.sub, roles = ?claims.roles, "authenticated");
    req.extensions_mut().insert(Principal { subject: claims.sub, roles: claims.roles });
    Ok(next.run(req).await)
}

async fn require(state: &ServerState, capability: Capability, req: Request, next: Next) -> Result<Response, JsonApiError> {
    let Some(principal) = req.extensions().get::<Principal>() else {
        return Err(JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", None));
    };
    if !state.access.permits(principal, capability) {
        warn!(subject = %principal.subject, ?capability, path = %req.uri().path(), "capability denied");
        return Err(JsonApiError::new(StatusCode::FORBIDDEN, "Forbidden", Some(format!("{:?} required", capability))));
    }
    Ok(next.run(req).await)
}

pub async fn require_system_view(State(state): State<ServerState>, req: Request, next: Next) -> Result<Response, JsonApiError> {
    require(&state, Capability::SystemView, req, next).await
}

pub async fn require_system_edit(State(state): State<ServerState>, req: Request, next: Next) -> Result<Response, JsonApiError> {
    require(&state, Capability::SystemEdit, req, next).await
}
