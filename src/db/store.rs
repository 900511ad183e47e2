use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{
        Aspects, Cafe, CafeSort, HelpfulToggle, NewCafe, NewRating, PageRequest, Rating,
        RatingSort, RatingSummary, rating::AspectTotals,
    },
};

/// Persistence for ratings. Implementations enforce one row per (user, cafe).
#[async_trait]
pub trait RatingStore: Send + Sync {
    async fn find_rating(&self, rating_id: Uuid) -> Result<Option<Rating>, AppError>;

    async fn find_user_rating(
        &self,
        user_id: Uuid,
        cafe_id: Uuid,
    ) -> Result<Option<Rating>, AppError>;

    /// Fails with `Conflict` if the (user, cafe) pair already has a row.
    async fn insert_rating(&self, rating: NewRating) -> Result<Rating, AppError>;

    /// Overwrites stars, review and aspects of an existing row.
    async fn update_rating(
        &self,
        rating_id: Uuid,
        stars: i16,
        review: String,
        aspects: Aspects,
    ) -> Result<Rating, AppError>;

    /// Returns `false` when no row matched.
    async fn delete_rating(&self, rating_id: Uuid) -> Result<bool, AppError>;

    /// Atomically flips `user_id` in the voter set. `None` when the rating is absent.
    async fn toggle_helpful(
        &self,
        rating_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<HelpfulToggle>, AppError>;

    async fn list_cafe_ratings(
        &self,
        cafe_id: Uuid,
        sort: RatingSort,
        page: PageRequest,
    ) -> Result<Vec<Rating>, AppError>;

    async fn count_cafe_ratings(&self, cafe_id: Uuid) -> Result<i64, AppError>;

    async fn list_user_ratings(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Rating>, AppError>;

    async fn count_user_ratings(&self, user_id: Uuid) -> Result<i64, AppError>;

    /// Number of ratings per star value, read over the cafe's full rating set.
    async fn star_histogram(&self, cafe_id: Uuid) -> Result<Vec<(i16, i64)>, AppError>;

    async fn aspect_totals(&self, cafe_id: Uuid) -> Result<AspectTotals, AppError>;
}

#[async_trait]
pub trait CafeStore: Send + Sync {
    async fn create_cafe(&self, cafe: NewCafe) -> Result<Cafe, AppError>;

    async fn find_cafe(&self, cafe_id: Uuid) -> Result<Option<Cafe>, AppError>;

    /// One page of active cafes.
    async fn list_cafes(&self, sort: CafeSort, page: PageRequest) -> Result<Vec<Cafe>, AppError>;

    async fn count_active_cafes(&self) -> Result<i64, AppError>;

    /// Returns the updated cafe, or `None` when absent.
    async fn set_cafe_active(
        &self,
        cafe_id: Uuid,
        is_active: bool,
    ) -> Result<Option<Cafe>, AppError>;

    async fn write_rating_summary(
        &self,
        cafe_id: Uuid,
        summary: RatingSummary,
    ) -> Result<(), AppError>;

    /// Deletes the cafe and every rating that references it. Returns `false` when absent.
    async fn delete_cafe(&self, cafe_id: Uuid) -> Result<bool, AppError>;
}
