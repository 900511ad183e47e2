use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::{CafeStore, RatingStore},
    errors::AppError,
    models::{
        RatingSummary,
        rating::{AspectAverages, AspectTotals, DistributionEntry, MAX_STARS, MIN_STARS, Tally},
    },
};

/// Invoked by the rating service after a write to a cafe's rating set has committed.
#[async_trait]
pub trait RatingHook: Send + Sync {
    async fn ratings_changed(&self, cafe_id: Uuid);
}

/// Mean of `sum / count` rounded half-up to one decimal place. `0.0` for an empty set.
pub fn round_tenths(sum: i64, count: i64) -> f64 {
    if count <= 0 {
        return 0.0;
    }

    let tenths = (20 * sum + count) / (2 * count);
    tenths as f64 / 10.0
}

/// `count / total * 100` rounded half-up to a whole percent. `0` when `total` is zero.
pub fn percentage(count: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }

    (200 * count + total) / (2 * total)
}

pub fn summarize(histogram: &[(i16, i64)]) -> RatingSummary {
    let (sum, count) = histogram
        .iter()
        .fold((0i64, 0i64), |(sum, count), &(stars, n)| {
            (sum + i64::from(stars) * n, count + n)
        });

    RatingSummary {
        average: round_tenths(sum, count),
        count,
    }
}

/// One entry per star value, 5 down to 1, including values nobody picked.
pub fn distribution(histogram: &[(i16, i64)], total: i64) -> Vec<DistributionEntry> {
    (MIN_STARS..=MAX_STARS)
        .rev()
        .map(|stars| {
            let count = histogram
                .iter()
                .find(|(value, _)| *value == stars)
                .map(|(_, n)| *n)
                .unwrap_or(0);

            DistributionEntry {
                rating: stars,
                count,
                percentage: percentage(count, total),
            }
        })
        .collect()
}

pub fn aspect_averages(totals: &AspectTotals) -> AspectAverages {
    let average = |tally: Tally| (tally.count > 0).then(|| round_tenths(tally.sum, tally.count));

    AspectAverages {
        food: average(totals.food),
        service: average(totals.service),
        ambiance: average(totals.ambiance),
        value: average(totals.value),
    }
}

/// Owns the cafe rating summary: re-reads the full rating set and overwrites it.
pub struct Aggregator {
    ratings: Arc<dyn RatingStore>,
    cafes: Arc<dyn CafeStore>,
}

impl Aggregator {
    pub fn new(ratings: Arc<dyn RatingStore>, cafes: Arc<dyn CafeStore>) -> Self {
        Self { ratings, cafes }
    }

    pub async fn recompute(&self, cafe_id: Uuid) -> Result<RatingSummary, AppError> {
        let histogram = self.ratings.star_histogram(cafe_id).await?;
        let summary = summarize(&histogram);

        self.cafes.write_rating_summary(cafe_id, summary).await?;

        tracing::debug!(
            "Recomputed rating summary for cafe {}: {} over {} ratings",
            cafe_id,
            summary.average,
            summary.count
        );

        Ok(summary)
    }
}

#[async_trait]
impl RatingHook for Aggregator {
    async fn ratings_changed(&self, cafe_id: Uuid) {
        // A stale summary is tolerated until the next successful recompute.
        if let Err(e) = self.recompute(cafe_id).await {
            tracing::error!("Failed to recompute rating summary for cafe {}: {}", cafe_id, e);
        }
    }
}
