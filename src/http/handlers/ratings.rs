use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::AuthClaims,
    errors::AppError,
    models::{Aspects, HelpfulToggle, PageQuery, PageRequest, PaginationMeta, Rating, RatingSort},
    services::CafeRatingsPage,
    state::AppState,
};

#[derive(Deserialize)]
pub struct SubmitRatingPayload {
    pub cafe: Option<Uuid>,
    pub rating: Option<i16>,
    pub review: Option<String>,
    pub aspects: Option<Aspects>,
}

#[derive(Serialize)]
pub struct RatingResponse {
    pub message: String,
    pub rating: Rating,
}

#[derive(Serialize)]
pub struct UserRatingsResponse {
    pub ratings: Vec<Rating>,
    pub pagination: PaginationMeta,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct HelpfulResponse {
    pub message: String,
    #[serde(flatten)]
    pub toggle: HelpfulToggle,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, (StatusCode, String)> {
    value.ok_or_else(|| AppError::Validation(format!("{} is required", field)).to_response())
}

pub async fn submit_rating_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(payload): Json<SubmitRatingPayload>,
) -> Result<(StatusCode, Json<RatingResponse>), (StatusCode, String)> {
    let user_id = claims.user_id()?;
    let cafe_id = required(payload.cafe, "Cafe")?;
    let stars = required(payload.rating, "Rating")?;
    let review = required(payload.review, "Review")?;

    let outcome = state
        .ratings
        .submit(user_id, cafe_id, stars, review, payload.aspects)
        .await
        .map_err(|err| {
            tracing::error!("Error submitting rating: {}", err);
            err.to_response()
        })?;

    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "Rating added successfully")
    } else {
        (StatusCode::OK, "Rating updated successfully")
    };

    Ok((
        status,
        Json(RatingResponse {
            message: message.into(),
            rating: outcome.rating,
        }),
    ))
}

pub async fn get_cafe_ratings_handler(
    Path(cafe_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
    State(state): State<AppState>,
) -> Result<Json<CafeRatingsPage>, (StatusCode, String)> {
    let page = PageRequest::new(query.page, query.limit);
    let sort = RatingSort::parse(query.sort_by.as_deref());

    let ratings = state
        .ratings
        .list_for_cafe(cafe_id, page, sort)
        .await
        .map_err(|e| {
            tracing::error!("Error retrieving ratings for cafe {}: {}", cafe_id, e);
            e.to_response()
        })?;

    tracing::info!(
        "Retrieved {} ratings for cafe {} (page {})",
        ratings.ratings.len(),
        cafe_id,
        page.page
    );
    Ok(Json(ratings))
}

pub async fn get_my_cafe_rating_handler(
    Path(cafe_id): Path<Uuid>,
    State(state): State<AppState>,
    claims: AuthClaims,
) -> Result<Json<Rating>, (StatusCode, String)> {
    let user_id = claims.user_id()?;

    let rating = state
        .ratings
        .get_for_user_cafe(user_id, cafe_id)
        .await
        .map_err(|e| {
            tracing::error!("Error retrieving user rating: {}", e);
            e.to_response()
        })?;

    Ok(Json(rating))
}

pub async fn get_my_ratings_handler(
    Query(query): Query<PageQuery>,
    State(state): State<AppState>,
    claims: AuthClaims,
) -> Result<Json<UserRatingsResponse>, (StatusCode, String)> {
    let user_id = claims.user_id()?;
    let page = PageRequest::new(query.page, query.limit);

    let ratings = state
        .ratings
        .list_for_user(user_id, page)
        .await
        .map_err(|e| {
            tracing::error!("Error retrieving ratings for user {}: {}", user_id, e);
            e.to_response()
        })?;

    Ok(Json(UserRatingsResponse {
        ratings: ratings.items,
        pagination: ratings.pagination,
    }))
}

pub async fn delete_rating_handler(
    Path(rating_id): Path<Uuid>,
    State(state): State<AppState>,
    claims: AuthClaims,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let user_id = claims.user_id()?;

    state
        .ratings
        .remove(rating_id, user_id)
        .await
        .map_err(|e| {
            tracing::error!("Error deleting rating {}: {}", rating_id, e);
            e.to_response()
        })?;

    Ok(Json(MessageResponse {
        message: "Rating deleted successfully".into(),
    }))
}

pub async fn toggle_helpful_handler(
    Path(rating_id): Path<Uuid>,
    State(state): State<AppState>,
    claims: AuthClaims,
) -> Result<Json<HelpfulResponse>, (StatusCode, String)> {
    let user_id = claims.user_id()?;

    let toggle = state
        .ratings
        .toggle_helpful(rating_id, user_id)
        .await
        .map_err(|e| {
            tracing::error!("Error toggling helpful on rating {}: {}", rating_id, e);
            e.to_response()
        })?;

    let message = if toggle.is_helpful {
        "Marked as helpful"
    } else {
        "Helpful mark removed"
    };

    Ok(Json(HelpfulResponse {
        message: message.into(),
        toggle,
    }))
}
