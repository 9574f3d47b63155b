//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/api/v1` handler, the health probes and the
//! request/response bodies they exchange. Swagger UI serves it in debug
//! builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{AddOutcome, Error, ErrorCode, Miniature, RemoveOutcome, Role, User};
use crate::inbound::http::collection::{AddResponse, RemoveResponse};
use crate::inbound::http::miniatures::{CatalogueEntryResponse, MiniatureRequest};
use crate::inbound::http::users::{LoginRequest, RegisterRequest, RoleChangeRequest};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Minipedia API",
        description = "Shared catalogue of die-cast miniatures and personal collections."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::change_role,
        crate::inbound::http::miniatures::list_miniatures,
        crate::inbound::http::miniatures::get_miniature,
        crate::inbound::http::miniatures::create_miniature,
        crate::inbound::http::miniatures::update_miniature,
        crate::inbound::http::miniatures::delete_miniature,
        crate::inbound::http::collection::list_collection,
        crate::inbound::http::collection::add_to_collection,
        crate::inbound::http::collection::remove_from_collection,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Role,
        Miniature,
        AddOutcome,
        RemoveOutcome,
        RegisterRequest,
        LoginRequest,
        RoleChangeRequest,
        MiniatureRequest,
        CatalogueEntryResponse,
        AddResponse,
        RemoveResponse,
    )),
    tags(
        (name = "users", description = "Registration, login and role management"),
        (name = "miniatures", description = "The shared catalogue"),
        (name = "collection", description = "The caller's personal collection"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
