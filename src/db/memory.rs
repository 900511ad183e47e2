use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    db::store::{CafeStore, RatingStore},
    errors::AppError,
    models::{
        Aspects, Cafe, CafeSort, HelpfulToggle, NewCafe, NewRating, PageRequest, Rating,
        RatingSort, RatingSummary, rating::AspectTotals,
    },
};

#[derive(Debug, Clone)]
struct StoredRating {
    // Insertion order, used to break timestamp ties.
    seq: u64,
    rating: Rating,
}

#[derive(Debug, Default)]
struct MemoryState {
    cafes: HashMap<Uuid, Cafe>,
    ratings: HashMap<Uuid, StoredRating>,
    next_seq: u64,
}

impl MemoryState {
    fn ratings_where(&self, keep: impl Fn(&Rating) -> bool) -> Vec<&StoredRating> {
        self.ratings.values().filter(|s| keep(&s.rating)).collect()
    }
}

/// Process-local store for development runs and tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(a: &StoredRating, b: &StoredRating) -> Ordering {
    b.rating
        .created_at
        .cmp(&a.rating.created_at)
        .then(b.seq.cmp(&a.seq))
}

fn compare(sort: RatingSort, a: &StoredRating, b: &StoredRating) -> Ordering {
    match sort {
        RatingSort::Newest => newest_first(a, b),
        RatingSort::Oldest => newest_first(b, a),
        RatingSort::Highest => b
            .rating
            .rating
            .cmp(&a.rating.rating)
            .then_with(|| newest_first(a, b)),
        RatingSort::Lowest => a
            .rating
            .rating
            .cmp(&b.rating.rating)
            .then_with(|| newest_first(a, b)),
        RatingSort::MostHelpful => b
            .rating
            .helpful_count
            .cmp(&a.rating.helpful_count)
            .then_with(|| newest_first(a, b)),
    }
}

fn compare_cafes(sort: CafeSort, a: &Cafe, b: &Cafe) -> Ordering {
    let newest = b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id));
    match sort {
        CafeSort::Rating => b
            .ratings
            .average
            .total_cmp(&a.ratings.average)
            .then(b.ratings.count.cmp(&a.ratings.count))
            .then(newest),
        CafeSort::Newest => newest,
    }
}

fn paginate(mut rows: Vec<&StoredRating>, sort: RatingSort, page: PageRequest) -> Vec<Rating> {
    rows.sort_by(|a, b| compare(sort, a, b));
    rows.into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .map(|s| s.rating.clone())
        .collect()
}

#[async_trait]
impl RatingStore for MemoryStore {
    async fn find_rating(&self, rating_id: Uuid) -> Result<Option<Rating>, AppError> {
        let state = self.state.lock().await;
        Ok(state.ratings.get(&rating_id).map(|s| s.rating.clone()))
    }

    async fn find_user_rating(
        &self,
        user_id: Uuid,
        cafe_id: Uuid,
    ) -> Result<Option<Rating>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .ratings
            .values()
            .find(|s| s.rating.user_id == user_id && s.rating.cafe_id == cafe_id)
            .map(|s| s.rating.clone()))
    }

    async fn insert_rating(&self, new_rating: NewRating) -> Result<Rating, AppError> {
        let mut state = self.state.lock().await;

        if !state.cafes.contains_key(&new_rating.cafe_id) {
            return Err(AppError::NotFound("Cafe not found".into()));
        }

        let duplicate = state.ratings.values().any(|s| {
            s.rating.user_id == new_rating.user_id && s.rating.cafe_id == new_rating.cafe_id
        });
        if duplicate {
            return Err(AppError::Conflict("You have already rated this cafe".into()));
        }

        let now = Utc::now();
        let rating = Rating {
            id: Uuid::new_v4(),
            user_id: new_rating.user_id,
            cafe_id: new_rating.cafe_id,
            rating: new_rating.rating,
            review: new_rating.review,
            aspects: new_rating.aspects,
            helpful_voters: Vec::new(),
            helpful_count: 0,
            created_at: now,
            updated_at: now,
        };

        let seq = state.next_seq;
        state.next_seq += 1;
        state.ratings.insert(
            rating.id,
            StoredRating {
                seq,
                rating: rating.clone(),
            },
        );

        Ok(rating)
    }

    async fn update_rating(
        &self,
        rating_id: Uuid,
        stars: i16,
        review: String,
        aspects: Aspects,
    ) -> Result<Rating, AppError> {
        let mut state = self.state.lock().await;
        let stored = state
            .ratings
            .get_mut(&rating_id)
            .ok_or_else(|| AppError::NotFound("Rating not found".into()))?;

        stored.rating.rating = stars;
        stored.rating.review = review;
        stored.rating.aspects = aspects;
        stored.rating.updated_at = Utc::now();

        Ok(stored.rating.clone())
    }

    async fn delete_rating(&self, rating_id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        Ok(state.ratings.remove(&rating_id).is_some())
    }

    async fn toggle_helpful(
        &self,
        rating_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<HelpfulToggle>, AppError> {
        let mut state = self.state.lock().await;
        let Some(stored) = state.ratings.get_mut(&rating_id) else {
            return Ok(None);
        };

        let voters = &mut stored.rating.helpful_voters;
        let is_helpful = match voters.binary_search(&user_id) {
            Ok(pos) => {
                voters.remove(pos);
                false
            }
            Err(pos) => {
                voters.insert(pos, user_id);
                true
            }
        };
        stored.rating.helpful_count = voters.len() as i32;

        Ok(Some(HelpfulToggle {
            helpful_count: stored.rating.helpful_count,
            is_helpful,
        }))
    }

    async fn list_cafe_ratings(
        &self,
        cafe_id: Uuid,
        sort: RatingSort,
        page: PageRequest,
    ) -> Result<Vec<Rating>, AppError> {
        let state = self.state.lock().await;
        let rows = state.ratings_where(|r| r.cafe_id == cafe_id);
        Ok(paginate(rows, sort, page))
    }

    async fn count_cafe_ratings(&self, cafe_id: Uuid) -> Result<i64, AppError> {
        let state = self.state.lock().await;
        Ok(state.ratings_where(|r| r.cafe_id == cafe_id).len() as i64)
    }

    async fn list_user_ratings(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Rating>, AppError> {
        let state = self.state.lock().await;
        let rows = state.ratings_where(|r| r.user_id == user_id);
        Ok(paginate(rows, RatingSort::Newest, page))
    }

    async fn count_user_ratings(&self, user_id: Uuid) -> Result<i64, AppError> {
        let state = self.state.lock().await;
        Ok(state.ratings_where(|r| r.user_id == user_id).len() as i64)
    }

    async fn star_histogram(&self, cafe_id: Uuid) -> Result<Vec<(i16, i64)>, AppError> {
        let state = self.state.lock().await;
        let mut counts: HashMap<i16, i64> = HashMap::new();
        for stored in state.ratings_where(|r| r.cafe_id == cafe_id) {
            *counts.entry(stored.rating.rating).or_insert(0) += 1;
        }

        let mut histogram: Vec<(i16, i64)> = counts.into_iter().collect();
        histogram.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(histogram)
    }

    async fn aspect_totals(&self, cafe_id: Uuid) -> Result<AspectTotals, AppError> {
        let state = self.state.lock().await;
        let mut totals = AspectTotals::default();
        for stored in state.ratings_where(|r| r.cafe_id == cafe_id) {
            let aspects = stored.rating.aspects;
            totals.food.add(aspects.food);
            totals.service.add(aspects.service);
            totals.ambiance.add(aspects.ambiance);
            totals.value.add(aspects.value);
        }
        Ok(totals)
    }
}

#[async_trait]
impl CafeStore for MemoryStore {
    async fn create_cafe(&self, new_cafe: NewCafe) -> Result<Cafe, AppError> {
        let now = Utc::now();
        let cafe = Cafe {
            id: Uuid::new_v4(),
            owner_id: new_cafe.owner_id,
            name: new_cafe.name,
            description: new_cafe.description,
            is_active: true,
            ratings: RatingSummary::default(),
            created_at: now,
            updated_at: now,
        };

        self.state.lock().await.cafes.insert(cafe.id, cafe.clone());
        Ok(cafe)
    }

    async fn find_cafe(&self, cafe_id: Uuid) -> Result<Option<Cafe>, AppError> {
        Ok(self.state.lock().await.cafes.get(&cafe_id).cloned())
    }

    async fn list_cafes(&self, sort: CafeSort, page: PageRequest) -> Result<Vec<Cafe>, AppError> {
        let state = self.state.lock().await;
        let mut cafes: Vec<&Cafe> = state.cafes.values().filter(|c| c.is_active).collect();
        cafes.sort_by(|a, b| compare_cafes(sort, a, b));

        Ok(cafes
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn count_active_cafes(&self) -> Result<i64, AppError> {
        let state = self.state.lock().await;
        Ok(state.cafes.values().filter(|c| c.is_active).count() as i64)
    }

    async fn set_cafe_active(
        &self,
        cafe_id: Uuid,
        is_active: bool,
    ) -> Result<Option<Cafe>, AppError> {
        let mut state = self.state.lock().await;
        Ok(state.cafes.get_mut(&cafe_id).map(|cafe| {
            cafe.is_active = is_active;
            cafe.updated_at = Utc::now();
            cafe.clone()
        }))
    }

    async fn write_rating_summary(
        &self,
        cafe_id: Uuid,
        summary: RatingSummary,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        let cafe = state
            .cafes
            .get_mut(&cafe_id)
            .ok_or_else(|| AppError::NotFound("Cafe not found".into()))?;

        cafe.ratings = summary;
        cafe.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_cafe(&self, cafe_id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        if state.cafes.remove(&cafe_id).is_none() {
            return Ok(false);
        }

        state.ratings.retain(|_, s| s.rating.cafe_id != cafe_id);
        Ok(true)
    }
}
