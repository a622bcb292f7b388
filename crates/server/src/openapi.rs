use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Wire shape of `service::system::System`.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemDoc {
    /// Assigned by the server; ignored on create.
    pub system_id: Option<i32>,
    /// Must not be empty.
    #[schema(min_length = 1)]
    pub name: String,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::systems::list_systems,
        crate::routes::systems::get_system,
        crate::routes::systems::create_system,
        crate::routes::systems::update_system,
    ),
    components(schemas(HealthResponse, SystemDoc)),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "system", description = "System Operations")
    )
)]
pub struct ApiDoc;
