use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{
        Aspects, HelpfulToggle, NewRating, PageRequest, Rating, RatingSort,
        rating::{AspectTotals, RatingRow, Tally},
    },
};

const RATING_COLUMNS: &str = "r.id, r.user_id, r.cafe_id, r.rating, r.review, \
    r.aspect_food, r.aspect_service, r.aspect_ambiance, r.aspect_value, \
    ARRAY(SELECT h.user_id FROM rating_helpful h WHERE h.rating_id = r.id ORDER BY h.user_id) AS helpful_voters, \
    r.helpful_count, r.created_at, r.updated_at";

pub async fn get_rating_by_id(rating_id: Uuid, postgres: &PgPool) -> Result<Option<Rating>, AppError> {
    let row = sqlx::query_as::<_, RatingRow>(&format!(
        "SELECT {RATING_COLUMNS} FROM ratings r WHERE r.id = $1"
    ))
    .bind(rating_id)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch rating: {}", e)))?;

    Ok(row.map(Rating::from))
}

pub async fn get_user_rating(
    user_id: Uuid,
    cafe_id: Uuid,
    postgres: &PgPool,
) -> Result<Option<Rating>, AppError> {
    let row = sqlx::query_as::<_, RatingRow>(&format!(
        "SELECT {RATING_COLUMNS} FROM ratings r WHERE r.user_id = $1 AND r.cafe_id = $2"
    ))
    .bind(user_id)
    .bind(cafe_id)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user rating: {}", e)))?;

    Ok(row.map(Rating::from))
}

pub async fn add_rating(rating: NewRating, postgres: &PgPool) -> Result<Rating, AppError> {
    let id = Uuid::new_v4();

    // Unique violations on (user_id, cafe_id) surface as `Conflict` through `From<sqlx::Error>`.
    sqlx::query(
        "INSERT INTO ratings (id, user_id, cafe_id, rating, review,
            aspect_food, aspect_service, aspect_ambiance, aspect_value)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(id)
    .bind(rating.user_id)
    .bind(rating.cafe_id)
    .bind(rating.rating)
    .bind(&rating.review)
    .bind(rating.aspects.food)
    .bind(rating.aspects.service)
    .bind(rating.aspects.ambiance)
    .bind(rating.aspects.value)
    .execute(postgres)
    .await?;

    get_rating_by_id(id, postgres)
        .await?
        .ok_or(AppError::InternalError)
}

pub async fn update_rating(
    rating_id: Uuid,
    stars: i16,
    review: String,
    aspects: Aspects,
    postgres: &PgPool,
) -> Result<Rating, AppError> {
    let result = sqlx::query(
        "UPDATE ratings
        SET rating = $2, review = $3,
            aspect_food = $4, aspect_service = $5, aspect_ambiance = $6, aspect_value = $7,
            updated_at = NOW()
        WHERE id = $1",
    )
    .bind(rating_id)
    .bind(stars)
    .bind(&review)
    .bind(aspects.food)
    .bind(aspects.service)
    .bind(aspects.ambiance)
    .bind(aspects.value)
    .execute(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to update rating: {}", e)))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Rating not found".into()));
    }

    get_rating_by_id(rating_id, postgres)
        .await?
        .ok_or_else(|| AppError::NotFound("Rating not found".into()))
}

pub async fn delete_rating(rating_id: Uuid, postgres: &PgPool) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM ratings WHERE id = $1")
        .bind(rating_id)
        .execute(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete rating: {}", e)))?;

    Ok(result.rows_affected() > 0)
}

pub async fn toggle_helpful(
    rating_id: Uuid,
    user_id: Uuid,
    postgres: &PgPool,
) -> Result<Option<HelpfulToggle>, AppError> {
    let mut tx = postgres
        .begin()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

    // Row lock serializes concurrent toggles on the same rating.
    let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM ratings WHERE id = $1 FOR UPDATE")
        .bind(rating_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to lock rating: {}", e)))?;

    if locked.is_none() {
        return Ok(None);
    }

    let removed = sqlx::query("DELETE FROM rating_helpful WHERE rating_id = $1 AND user_id = $2")
        .bind(rating_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to remove helpful mark: {}", e)))?
        .rows_affected()
        > 0;

    if !removed {
        sqlx::query("INSERT INTO rating_helpful (rating_id, user_id) VALUES ($1, $2)")
            .bind(rating_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to add helpful mark: {}", e)))?;
    }

    let helpful_count = sqlx::query_scalar::<_, i32>(
        "UPDATE ratings
        SET helpful_count = (SELECT COUNT(*)::int FROM rating_helpful WHERE rating_id = $1)
        WHERE id = $1
        RETURNING helpful_count",
    )
    .bind(rating_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to update helpful count: {}", e)))?;

    tx.commit()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to commit helpful toggle: {}", e)))?;

    Ok(Some(HelpfulToggle {
        helpful_count,
        is_helpful: !removed,
    }))
}

pub async fn get_cafe_ratings(
    cafe_id: Uuid,
    sort: RatingSort,
    page: PageRequest,
    postgres: &PgPool,
) -> Result<Vec<Rating>, AppError> {
    let rows = sqlx::query_as::<_, RatingRow>(&format!(
        "SELECT {RATING_COLUMNS} FROM ratings r
        WHERE r.cafe_id = $1
        ORDER BY {}
        LIMIT $2 OFFSET $3",
        sort.order_by()
    ))
    .bind(cafe_id)
    .bind(i64::from(page.limit))
    .bind(page.offset())
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch cafe ratings: {}", e)))?;

    Ok(rows.into_iter().map(Rating::from).collect())
}

pub async fn count_cafe_ratings(cafe_id: Uuid, postgres: &PgPool) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ratings WHERE cafe_id = $1")
        .bind(cafe_id)
        .fetch_one(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to count cafe ratings: {}", e)))
}

pub async fn get_user_ratings(
    user_id: Uuid,
    page: PageRequest,
    postgres: &PgPool,
) -> Result<Vec<Rating>, AppError> {
    let rows = sqlx::query_as::<_, RatingRow>(&format!(
        "SELECT {RATING_COLUMNS} FROM ratings r
        WHERE r.user_id = $1
        ORDER BY r.created_at DESC, r.id DESC
        LIMIT $2 OFFSET $3"
    ))
    .bind(user_id)
    .bind(i64::from(page.limit))
    .bind(page.offset())
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user ratings: {}", e)))?;

    Ok(rows.into_iter().map(Rating::from).collect())
}

pub async fn count_user_ratings(user_id: Uuid, postgres: &PgPool) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ratings WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to count user ratings: {}", e)))
}

pub async fn get_star_histogram(
    cafe_id: Uuid,
    postgres: &PgPool,
) -> Result<Vec<(i16, i64)>, AppError> {
    sqlx::query_as::<_, (i16, i64)>(
        "SELECT rating, COUNT(*)
        FROM ratings
        WHERE cafe_id = $1
        GROUP BY rating
        ORDER BY rating DESC",
    )
    .bind(cafe_id)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to group cafe ratings: {}", e)))
}

pub async fn get_aspect_totals(cafe_id: Uuid, postgres: &PgPool) -> Result<AspectTotals, AppError> {
    let (food_sum, food_count, service_sum, service_count, ambiance_sum, ambiance_count, value_sum, value_count) =
        sqlx::query_as::<_, (i64, i64, i64, i64, i64, i64, i64, i64)>(
            "SELECT
                COALESCE(SUM(aspect_food), 0)::bigint, COUNT(aspect_food),
                COALESCE(SUM(aspect_service), 0)::bigint, COUNT(aspect_service),
                COALESCE(SUM(aspect_ambiance), 0)::bigint, COUNT(aspect_ambiance),
                COALESCE(SUM(aspect_value), 0)::bigint, COUNT(aspect_value)
            FROM ratings
            WHERE cafe_id = $1",
        )
        .bind(cafe_id)
        .fetch_one(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to total aspect ratings: {}", e)))?;

    Ok(AspectTotals {
        food: Tally { sum: food_sum, count: food_count },
        service: Tally { sum: service_sum, count: service_count },
        ambiance: Tally { sum: ambiance_sum, count: ambiance_count },
        value: Tally { sum: value_sum, count: value_count },
    })
}
