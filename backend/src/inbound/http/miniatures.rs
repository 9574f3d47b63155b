//! Catalogue API handlers.
//!
//! ```text
//! GET /api/v1/miniatures
//! GET /api/v1/miniatures/7
//! POST /api/v1/miniatures {"name":"Skyline GT-R","brand":"Tomica","scale":"1:64","year":"1999"}
//! PUT /api/v1/miniatures/7 {...}
//! DELETE /api/v1/miniatures/7
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::CatalogueListing;
use crate::domain::{Error, Miniature, MiniatureDetails, MiniatureId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::miniature_error;

/// Editable miniature attributes, used for both create and update.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MiniatureRequest {
    #[schema(example = "Skyline GT-R R34")]
    pub name: String,
    #[schema(example = "Tomica")]
    pub brand: String,
    #[schema(example = "1:64")]
    pub scale: String,
    #[schema(example = "1999")]
    pub year: String,
}

impl TryFrom<MiniatureRequest> for MiniatureDetails {
    type Error = Error;

    fn try_from(value: MiniatureRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.brand, &value.scale, &value.year)
            .map_err(miniature_error)
    }
}

/// One catalogue row as seen by the current user.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueEntryResponse {
    #[serde(flatten)]
    pub miniature: Miniature,
    /// Whether the miniature is in the caller's collection.
    pub in_collection: bool,
}

impl From<CatalogueListing> for CatalogueEntryResponse {
    fn from(listing: CatalogueListing) -> Self {
        Self {
            miniature: listing.miniature,
            in_collection: listing.in_collection,
        }
    }
}

/// Whole catalogue, newest first, with collection flags.
#[utoipa::path(
    get,
    path = "/api/v1/miniatures",
    responses(
        (status = 200, description = "Catalogue", body = [CatalogueEntryResponse]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["miniatures"],
    operation_id = "listMiniatures"
)]
#[get("/miniatures")]
pub async fn list_miniatures(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CatalogueEntryResponse>>> {
    let user_id = session.require_user_id()?;
    let listings = state.catalogue_query.list(&user_id).await?;
    Ok(web::Json(listings.into_iter().map(Into::into).collect()))
}

/// One miniature.
#[utoipa::path(
    get,
    path = "/api/v1/miniatures/{id}",
    params(("id" = i64, Path, description = "Miniature id")),
    responses(
        (status = 200, description = "Miniature", body = Miniature),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Unknown miniature", body = Error)
    ),
    tags = ["miniatures"],
    operation_id = "getMiniature"
)]
#[get("/miniatures/{id}")]
pub async fn get_miniature(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Miniature>> {
    session.require_user_id()?;
    let miniature = state
        .catalogue_query
        .get(MiniatureId::new(path.into_inner()))
        .await?;
    Ok(web::Json(miniature))
}

/// Add a catalogue entry; the caller becomes its creator.
#[utoipa::path(
    post,
    path = "/api/v1/miniatures",
    request_body = MiniatureRequest,
    responses(
        (status = 201, description = "Created", body = Miniature),
        (status = 400, description = "Invalid attributes", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Role may not create miniatures", body = Error)
    ),
    tags = ["miniatures"],
    operation_id = "createMiniature"
)]
#[post("/miniatures")]
pub async fn create_miniature(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<MiniatureRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let details = MiniatureDetails::try_from(payload.into_inner())?;
    let created = state.catalogue.create(&user_id, details).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Replace a miniature's attributes (creator or admin).
#[utoipa::path(
    put,
    path = "/api/v1/miniatures/{id}",
    params(("id" = i64, Path, description = "Miniature id")),
    request_body = MiniatureRequest,
    responses(
        (status = 200, description = "Updated", body = Miniature),
        (status = 400, description = "Invalid attributes", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the creator or an admin", body = Error),
        (status = 404, description = "Unknown miniature", body = Error)
    ),
    tags = ["miniatures"],
    operation_id = "updateMiniature"
)]
#[put("/miniatures/{id}")]
pub async fn update_miniature(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<MiniatureRequest>,
) -> ApiResult<web::Json<Miniature>> {
    let user_id = session.require_user_id()?;
    let details = MiniatureDetails::try_from(payload.into_inner())?;
    let updated = state
        .catalogue
        .update(&user_id, MiniatureId::new(path.into_inner()), details)
        .await?;
    Ok(web::Json(updated))
}

/// Delete a miniature and every collection entry naming it (creator or admin).
#[utoipa::path(
    delete,
    path = "/api/v1/miniatures/{id}",
    params(("id" = i64, Path, description = "Miniature id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the creator or an admin", body = Error),
        (status = 404, description = "Unknown miniature", body = Error)
    ),
    tags = ["miniatures"],
    operation_id = "deleteMiniature"
)]
#[delete("/miniatures/{id}")]
pub async fn delete_miniature(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state
        .catalogue
        .delete(&user_id, MiniatureId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "miniatures_tests.rs"]
mod tests;
