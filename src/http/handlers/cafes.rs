use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::AuthClaims,
    http::handlers::ratings::MessageResponse,
    models::{Cafe, CafeSort, PageQuery, PageRequest, PaginationMeta},
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateCafePayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCafePayload {
    pub is_active: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CafePagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_cafes: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl From<PaginationMeta> for CafePagination {
    fn from(meta: PaginationMeta) -> Self {
        Self {
            current_page: meta.current_page,
            total_pages: meta.total_pages,
            total_cafes: meta.total_ratings,
            has_next: meta.has_next,
            has_prev: meta.has_prev,
        }
    }
}

#[derive(Serialize)]
pub struct CafeListResponse {
    pub cafes: Vec<Cafe>,
    pub pagination: CafePagination,
}

pub async fn list_cafes_handler(
    Query(query): Query<PageQuery>,
    State(state): State<AppState>,
) -> Result<Json<CafeListResponse>, (StatusCode, String)> {
    let page = PageRequest::new(query.page, query.limit);
    let sort = CafeSort::parse(query.sort_by.as_deref());

    let listing = state.cafes.list(page, sort).await.map_err(|e| {
        tracing::error!("Error listing cafes: {}", e);
        e.to_response()
    })?;

    Ok(Json(CafeListResponse {
        cafes: listing.items,
        pagination: listing.pagination.into(),
    }))
}

pub async fn create_cafe_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(payload): Json<CreateCafePayload>,
) -> Result<(StatusCode, Json<Cafe>), (StatusCode, String)> {
    let owner_id = claims.user_id()?;

    match state
        .cafes
        .create(owner_id, payload.name, payload.description)
        .await
    {
        Ok(cafe) => {
            tracing::info!("Cafe created: {} (ID: {})", cafe.name, cafe.id);
            Ok((StatusCode::CREATED, Json(cafe)))
        }
        Err(err) => {
            tracing::error!("Error creating cafe: {}", err);
            Err(err.to_response())
        }
    }
}

pub async fn get_cafe_handler(
    Path(cafe_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Cafe>, (StatusCode, String)> {
    let cafe = state.cafes.get(cafe_id).await.map_err(|e| {
        tracing::error!("Error retrieving cafe: {}", e);
        e.to_response()
    })?;

    Ok(Json(cafe))
}

pub async fn update_cafe_handler(
    Path(cafe_id): Path<Uuid>,
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(payload): Json<UpdateCafePayload>,
) -> Result<Json<Cafe>, (StatusCode, String)> {
    let user_id = claims.user_id()?;

    let cafe = state
        .cafes
        .set_active(cafe_id, user_id, payload.is_active)
        .await
        .map_err(|e| {
            tracing::error!("Error updating cafe {}: {}", cafe_id, e);
            e.to_response()
        })?;

    Ok(Json(cafe))
}

pub async fn delete_cafe_handler(
    Path(cafe_id): Path<Uuid>,
    State(state): State<AppState>,
    claims: AuthClaims,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let user_id = claims.user_id()?;

    state.cafes.delete(cafe_id, user_id).await.map_err(|e| {
        tracing::error!("Error deleting cafe {}: {}", cafe_id, e);
        e.to_response()
    })?;

    Ok(Json(MessageResponse {
        message: "Cafe deleted successfully".into(),
    }))
}
