pub mod cafe;
pub mod rating;

use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

use crate::{
    db::store::{CafeStore, RatingStore},
    errors::AppError,
    models::{
        Aspects, Cafe, CafeSort, HelpfulToggle, NewCafe, NewRating, PageRequest, Rating,
        RatingSort, RatingSummary, rating::AspectTotals,
    },
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool and applies the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect to Postgres: {}", e)))?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Postgres migrations applied");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl RatingStore for PgStore {
    async fn find_rating(&self, rating_id: Uuid) -> Result<Option<Rating>, AppError> {
        rating::get_rating_by_id(rating_id, &self.pool).await
    }

    async fn find_user_rating(
        &self,
        user_id: Uuid,
        cafe_id: Uuid,
    ) -> Result<Option<Rating>, AppError> {
        rating::get_user_rating(user_id, cafe_id, &self.pool).await
    }

    async fn insert_rating(&self, new_rating: NewRating) -> Result<Rating, AppError> {
        rating::add_rating(new_rating, &self.pool).await
    }

    async fn update_rating(
        &self,
        rating_id: Uuid,
        stars: i16,
        review: String,
        aspects: Aspects,
    ) -> Result<Rating, AppError> {
        rating::update_rating(rating_id, stars, review, aspects, &self.pool).await
    }

    async fn delete_rating(&self, rating_id: Uuid) -> Result<bool, AppError> {
        rating::delete_rating(rating_id, &self.pool).await
    }

    async fn toggle_helpful(
        &self,
        rating_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<HelpfulToggle>, AppError> {
        rating::toggle_helpful(rating_id, user_id, &self.pool).await
    }

    async fn list_cafe_ratings(
        &self,
        cafe_id: Uuid,
        sort: RatingSort,
        page: PageRequest,
    ) -> Result<Vec<Rating>, AppError> {
        rating::get_cafe_ratings(cafe_id, sort, page, &self.pool).await
    }

    async fn count_cafe_ratings(&self, cafe_id: Uuid) -> Result<i64, AppError> {
        rating::count_cafe_ratings(cafe_id, &self.pool).await
    }

    async fn list_user_ratings(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Rating>, AppError> {
        rating::get_user_ratings(user_id, page, &self.pool).await
    }

    async fn count_user_ratings(&self, user_id: Uuid) -> Result<i64, AppError> {
        rating::count_user_ratings(user_id, &self.pool).await
    }

    async fn star_histogram(&self, cafe_id: Uuid) -> Result<Vec<(i16, i64)>, AppError> {
        rating::get_star_histogram(cafe_id, &self.pool).await
    }

    async fn aspect_totals(&self, cafe_id: Uuid) -> Result<AspectTotals, AppError> {
        rating::get_aspect_totals(cafe_id, &self.pool).await
    }
}

#[async_trait]
impl CafeStore for PgStore {
    async fn create_cafe(&self, new_cafe: NewCafe) -> Result<Cafe, AppError> {
        cafe::add_cafe(new_cafe, &self.pool).await
    }

    async fn find_cafe(&self, cafe_id: Uuid) -> Result<Option<Cafe>, AppError> {
        cafe::get_cafe_by_id(cafe_id, &self.pool).await
    }

    async fn list_cafes(&self, sort: CafeSort, page: PageRequest) -> Result<Vec<Cafe>, AppError> {
        cafe::get_active_cafes(sort, page, &self.pool).await
    }

    async fn count_active_cafes(&self) -> Result<i64, AppError> {
        cafe::count_active_cafes(&self.pool).await
    }

    async fn set_cafe_active(
        &self,
        cafe_id: Uuid,
        is_active: bool,
    ) -> Result<Option<Cafe>, AppError> {
        cafe::set_cafe_active(cafe_id, is_active, &self.pool).await
    }

    async fn write_rating_summary(
        &self,
        cafe_id: Uuid,
        summary: RatingSummary,
    ) -> Result<(), AppError> {
        cafe::set_rating_summary(cafe_id, summary, &self.pool).await
    }

    async fn delete_cafe(&self, cafe_id: Uuid) -> Result<bool, AppError> {
        cafe::delete_cafe(cafe_id, &self.pool).await
    }
}
