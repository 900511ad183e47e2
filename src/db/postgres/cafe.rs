use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{Cafe, CafeSort, NewCafe, PageRequest, RatingSummary, cafe::CafeRow},
};

const CAFE_COLUMNS: &str = "id, owner_id, name, description, is_active, \
    rating_average, rating_count, created_at, updated_at";

pub async fn add_cafe(cafe: NewCafe, postgres: &PgPool) -> Result<Cafe, AppError> {
    let row = sqlx::query_as::<_, CafeRow>(&format!(
        "INSERT INTO cafes (id, owner_id, name, description)
        VALUES ($1, $2, $3, $4)
        RETURNING {CAFE_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(cafe.owner_id)
    .bind(&cafe.name)
    .bind(&cafe.description)
    .fetch_one(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to create cafe: {}", e)))?;

    tracing::info!("Created cafe: {} (ID: {})", row.name, row.id);

    Ok(row.into())
}

pub async fn get_cafe_by_id(cafe_id: Uuid, postgres: &PgPool) -> Result<Option<Cafe>, AppError> {
    let row = sqlx::query_as::<_, CafeRow>(&format!(
        "SELECT {CAFE_COLUMNS} FROM cafes WHERE id = $1"
    ))
    .bind(cafe_id)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch cafe: {}", e)))?;

    Ok(row.map(Cafe::from))
}

pub async fn get_active_cafes(
    sort: CafeSort,
    page: PageRequest,
    postgres: &PgPool,
) -> Result<Vec<Cafe>, AppError> {
    let rows = sqlx::query_as::<_, CafeRow>(&format!(
        "SELECT {CAFE_COLUMNS} FROM cafes
        WHERE is_active
        ORDER BY {}
        LIMIT $1 OFFSET $2",
        sort.order_by()
    ))
    .bind(i64::from(page.limit))
    .bind(page.offset())
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch cafes: {}", e)))?;

    Ok(rows.into_iter().map(Cafe::from).collect())
}

pub async fn count_active_cafes(postgres: &PgPool) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cafes WHERE is_active")
        .fetch_one(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to count cafes: {}", e)))
}

pub async fn set_cafe_active(
    cafe_id: Uuid,
    is_active: bool,
    postgres: &PgPool,
) -> Result<Option<Cafe>, AppError> {
    let row = sqlx::query_as::<_, CafeRow>(&format!(
        "UPDATE cafes
        SET is_active = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {CAFE_COLUMNS}"
    ))
    .bind(cafe_id)
    .bind(is_active)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to update cafe: {}", e)))?;

    Ok(row.map(Cafe::from))
}

pub async fn set_rating_summary(
    cafe_id: Uuid,
    summary: RatingSummary,
    postgres: &PgPool,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE cafes
        SET rating_average = $2, rating_count = $3, updated_at = NOW()
        WHERE id = $1",
    )
    .bind(cafe_id)
    .bind(summary.average)
    .bind(summary.count)
    .execute(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to write rating summary: {}", e)))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Cafe not found".into()));
    }

    Ok(())
}

pub async fn delete_cafe(cafe_id: Uuid, postgres: &PgPool) -> Result<bool, AppError> {
    let mut tx = postgres
        .begin()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

    // The foreign key cascades as well; the explicit delete reports how many rows went.
    let removed_ratings = sqlx::query("DELETE FROM ratings WHERE cafe_id = $1")
        .bind(cafe_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete cafe ratings: {}", e)))?
        .rows_affected();

    let removed = sqlx::query("DELETE FROM cafes WHERE id = $1")
        .bind(cafe_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete cafe: {}", e)))?
        .rows_affected()
        > 0;

    tx.commit()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to commit cafe deletion: {}", e)))?;

    if removed {
        tracing::info!(
            "Deleted cafe {} and {} of its ratings",
            cafe_id,
            removed_ratings
        );
    }

    Ok(removed)
}
