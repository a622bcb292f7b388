use std::sync::Arc;

use service::system::{SystemRepository, SystemService};

use crate::security::{AccessControl, RoleAccessControl};

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

/// Shared handler state. Everything is behind `Arc`, so cloning per request is cheap.
#[derive(Clone)]
pub struct ServerState {
    pub systems: Arc<SystemService<dyn SystemRepository>>,
    pub access: Arc<dyn AccessControl>,
    pub auth: ServerAuthConfig,
}

impl ServerState {
    /// Wire the service over `repo` with role-based access taken from the `[auth]` section.
    pub fn new(repo: Arc<dyn SystemRepository>, auth: &configs::AuthConfig) -> Self {
        Self {
            systems: Arc::new(SystemService::new(repo)),
            access: Arc::new(RoleAccessControl::from_config(auth)),
            auth: ServerAuthConfig { jwt_secret: auth.jwt_secret.clone() },
        }
    }
}
