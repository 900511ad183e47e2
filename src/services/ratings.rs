use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{CafeStore, RatingStore},
    errors::AppError,
    models::{
        Aspects, Cafe, HelpfulToggle, NewRating, Page, PageRequest, PaginationMeta, Rating,
        RatingSort,
        rating::{CafeRatingSummary, MAX_REVIEW_CHARS, MAX_STARS, MIN_STARS},
    },
    services::{
        aggregator::{RatingHook, aspect_averages, distribution},
        cafe_locks::CafeLocks,
    },
};

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub rating: Rating,
    pub created: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CafeRatingsPage {
    pub ratings: Vec<Rating>,
    pub pagination: PaginationMeta,
    pub summary: CafeRatingSummary,
}

fn validate_stars(field: &str, stars: i16) -> Result<(), AppError> {
    if !(MIN_STARS..=MAX_STARS).contains(&stars) {
        return Err(AppError::Validation(format!(
            "{} must be between {} and {}",
            field, MIN_STARS, MAX_STARS
        )));
    }
    Ok(())
}

pub fn validate_submission(stars: i16, review: &str, aspects: &Aspects) -> Result<(), AppError> {
    validate_stars("Rating", stars)?;

    if review.trim().is_empty() {
        return Err(AppError::Validation("Review is required".into()));
    }
    if review.chars().count() > MAX_REVIEW_CHARS {
        return Err(AppError::Validation(format!(
            "Review must not exceed {} characters",
            MAX_REVIEW_CHARS
        )));
    }

    for (name, value) in aspects.fields() {
        if let Some(stars) = value {
            validate_stars(&format!("Aspect '{}'", name), stars)?;
        }
    }

    Ok(())
}

/// Rating writes and reads. Every write to a cafe's rating set runs under that
/// cafe's lock and is followed by the post-commit hook before the lock is released.
pub struct RatingService {
    ratings: Arc<dyn RatingStore>,
    cafes: Arc<dyn CafeStore>,
    hook: Arc<dyn RatingHook>,
    locks: CafeLocks,
}

impl RatingService {
    pub fn new(
        ratings: Arc<dyn RatingStore>,
        cafes: Arc<dyn CafeStore>,
        hook: Arc<dyn RatingHook>,
        locks: CafeLocks,
    ) -> Self {
        Self {
            ratings,
            cafes,
            hook,
            locks,
        }
    }

    async fn active_cafe(&self, cafe_id: Uuid) -> Result<Cafe, AppError> {
        self.cafes
            .find_cafe(cafe_id)
            .await?
            .filter(|cafe| cafe.is_active)
            .ok_or_else(|| AppError::NotFound("Cafe not found".into()))
    }

    pub async fn submit(
        &self,
        user_id: Uuid,
        cafe_id: Uuid,
        stars: i16,
        review: String,
        aspects: Option<Aspects>,
    ) -> Result<SubmitOutcome, AppError> {
        let supplied = aspects.unwrap_or_default();
        validate_submission(stars, &review, &supplied)?;
        // Deactivation and deletion take the same lock, so the check holds for the write.
        let _guard = self.locks.acquire(cafe_id).await;
        self.active_cafe(cafe_id).await?;

        let outcome = match self.ratings.find_user_rating(user_id, cafe_id).await? {
            Some(existing) => {
                let rating = self
                    .ratings
                    .update_rating(
                        existing.id,
                        stars,
                        review,
                        existing.aspects.merged_with(supplied),
                    )
                    .await?;
                SubmitOutcome {
                    rating,
                    created: false,
                }
            }
            None => {
                let rating = self
                    .ratings
                    .insert_rating(NewRating {
                        user_id,
                        cafe_id,
                        rating: stars,
                        review,
                        aspects: supplied,
                    })
                    .await?;
                SubmitOutcome {
                    rating,
                    created: true,
                }
            }
        };

        self.hook.ratings_changed(cafe_id).await;

        tracing::info!(
            "User {} {} rating {} for cafe {}",
            user_id,
            if outcome.created { "created" } else { "updated" },
            outcome.rating.id,
            cafe_id
        );

        Ok(outcome)
    }

    pub async fn remove(&self, rating_id: Uuid, requester: Uuid) -> Result<(), AppError> {
        let rating = self
            .ratings
            .find_rating(rating_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Rating not found".into()))?;

        if rating.user_id != requester {
            return Err(AppError::Forbidden(
                "Not authorized to delete this rating".into(),
            ));
        }

        let _guard = self.locks.acquire(rating.cafe_id).await;

        if !self.ratings.delete_rating(rating_id).await? {
            return Err(AppError::NotFound("Rating not found".into()));
        }

        self.hook.ratings_changed(rating.cafe_id).await;

        tracing::info!("User {} deleted rating {}", requester, rating_id);
        Ok(())
    }

    pub async fn toggle_helpful(
        &self,
        rating_id: Uuid,
        user_id: Uuid,
    ) -> Result<HelpfulToggle, AppError> {
        self.ratings
            .toggle_helpful(rating_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Rating not found".into()))
    }

    pub async fn list_for_cafe(
        &self,
        cafe_id: Uuid,
        page: PageRequest,
        sort: RatingSort,
    ) -> Result<CafeRatingsPage, AppError> {
        let cafe = self
            .cafes
            .find_cafe(cafe_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cafe not found".into()))?;

        let ratings = self.ratings.list_cafe_ratings(cafe_id, sort, page).await?;
        let total = self.ratings.count_cafe_ratings(cafe_id).await?;
        let histogram = self.ratings.star_histogram(cafe_id).await?;
        let aspects = self.ratings.aspect_totals(cafe_id).await?;

        Ok(CafeRatingsPage {
            ratings,
            pagination: PaginationMeta::new(page, total),
            summary: CafeRatingSummary {
                average_rating: cafe.ratings.average,
                total_ratings: cafe.ratings.count,
                distribution: distribution(&histogram, total),
                aspects: aspect_averages(&aspects),
            },
        })
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Rating>, AppError> {
        let items = self.ratings.list_user_ratings(user_id, page).await?;
        let total = self.ratings.count_user_ratings(user_id).await?;

        Ok(Page {
            items,
            pagination: PaginationMeta::new(page, total),
        })
    }

    pub async fn get_for_user_cafe(&self, user_id: Uuid, cafe_id: Uuid) -> Result<Rating, AppError> {
        self.ratings
            .find_user_rating(user_id, cafe_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No rating found for this cafe".into()))
    }
}
