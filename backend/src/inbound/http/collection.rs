//! Personal collection handlers.
//!
//! ```text
//! GET /api/v1/collection
//! POST /api/v1/collection/7
//! DELETE /api/v1/collection/7
//! ```
//!
//! Adding an owned miniature or removing an absent one is not an error: the
//! outcome is reported in the body so clients can show a friendly message.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Serialize;

use crate::domain::{AddOutcome, Error, Miniature, MiniatureId, RemoveOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body returned by `POST /api/v1/collection/{miniatureId}`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddResponse {
    pub outcome: AddOutcome,
    #[schema(example = 7)]
    pub miniature_id: i64,
    #[schema(example = "Miniature added to your collection.")]
    pub message: &'static str,
}

/// Body returned by `DELETE /api/v1/collection/{miniatureId}`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResponse {
    pub outcome: RemoveOutcome,
    #[schema(example = 7)]
    pub miniature_id: i64,
    #[schema(example = "Miniature removed from your collection.")]
    pub message: &'static str,
}

const fn add_message(outcome: AddOutcome) -> &'static str {
    match outcome {
        AddOutcome::Added => "Miniature added to your collection.",
        AddOutcome::AlreadyPresent => "Miniature is already in your collection.",
    }
}

const fn remove_message(outcome: RemoveOutcome) -> &'static str {
    match outcome {
        RemoveOutcome::Removed => "Miniature removed from your collection.",
        RemoveOutcome::NotPresent => "Miniature was not in your collection.",
    }
}

/// Miniatures in the caller's collection, in the configured order.
#[utoipa::path(
    get,
    path = "/api/v1/collection",
    responses(
        (status = 200, description = "Collection", body = [Miniature]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["collection"],
    operation_id = "listCollection"
)]
#[get("/collection")]
pub async fn list_collection(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Miniature>>> {
    let user_id = session.require_user_id()?;
    let items = state.collection_query.list(&user_id).await?;
    Ok(web::Json(items))
}

/// Add a miniature to the caller's collection.
#[utoipa::path(
    post,
    path = "/api/v1/collection/{miniatureId}",
    params(("miniatureId" = i64, Path, description = "Miniature id")),
    responses(
        (status = 201, description = "Added", body = AddResponse),
        (status = 200, description = "Already in the collection", body = AddResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Unknown miniature", body = Error)
    ),
    tags = ["collection"],
    operation_id = "addToCollection"
)]
#[post("/collection/{miniature_id}")]
pub async fn add_to_collection(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let miniature_id = MiniatureId::new(path.into_inner());
    let outcome = state.collection.add(&user_id, miniature_id).await?;
    let body = AddResponse {
        outcome,
        miniature_id: miniature_id.get(),
        message: add_message(outcome),
    };
    Ok(match outcome {
        AddOutcome::Added => HttpResponse::Created().json(body),
        AddOutcome::AlreadyPresent => HttpResponse::Ok().json(body),
    })
}

/// Remove a miniature from the caller's collection.
#[utoipa::path(
    delete,
    path = "/api/v1/collection/{miniatureId}",
    params(("miniatureId" = i64, Path, description = "Miniature id")),
    responses(
        (status = 200, description = "Removed, or was not present", body = RemoveResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Unknown miniature", body = Error)
    ),
    tags = ["collection"],
    operation_id = "removeFromCollection"
)]
#[delete("/collection/{miniature_id}")]
pub async fn remove_from_collection(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RemoveResponse>> {
    let user_id = session.require_user_id()?;
    let miniature_id = MiniatureId::new(path.into_inner());
    let outcome = state.collection.remove(&user_id, miniature_id).await?;
    Ok(web::Json(RemoveResponse {
        outcome,
        miniature_id: miniature_id.get(),
        message: remove_message(outcome),
    }))
}
