use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MIN_STARS: i16 = 1;
pub const MAX_STARS: i16 = 5;
pub const MAX_REVIEW_CHARS: usize = 1000;

/// Per-aspect sub-scores. Every field is optional and, when present, 1–5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aspects {
    pub food: Option<i16>,
    pub service: Option<i16>,
    pub ambiance: Option<i16>,
    pub value: Option<i16>,
}

impl Aspects {
    /// Overlays the supplied fields on top of `self`, leaving unsupplied ones as they were.
    pub fn merged_with(self, supplied: Aspects) -> Aspects {
        Aspects {
            food: supplied.food.or(self.food),
            service: supplied.service.or(self.service),
            ambiance: supplied.ambiance.or(self.ambiance),
            value: supplied.value.or(self.value),
        }
    }

    pub fn fields(&self) -> [(&'static str, Option<i16>); 4] {
        [
            ("food", self.food),
            ("service", self.service),
            ("ambiance", self.ambiance),
            ("value", self.value),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub cafe_id: Uuid,
    pub rating: i16,
    pub review: String,
    pub aspects: Aspects,
    pub helpful_voters: Vec<Uuid>,
    pub helpful_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rating {
    pub fn is_helpful_to(&self, user_id: Uuid) -> bool {
        self.helpful_voters.contains(&user_id)
    }
}

#[derive(Debug, FromRow)]
pub struct RatingRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub cafe_id: Uuid,
    pub rating: i16,
    pub review: String,
    pub aspect_food: Option<i16>,
    pub aspect_service: Option<i16>,
    pub aspect_ambiance: Option<i16>,
    pub aspect_value: Option<i16>,
    pub helpful_voters: Vec<Uuid>,
    pub helpful_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        Rating {
            id: row.id,
            user_id: row.user_id,
            cafe_id: row.cafe_id,
            rating: row.rating,
            review: row.review,
            aspects: Aspects {
                food: row.aspect_food,
                service: row.aspect_service,
                ambiance: row.aspect_ambiance,
                value: row.aspect_value,
            },
            helpful_voters: row.helpful_voters,
            helpful_count: row.helpful_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A validated rating submission, ready to be written.
#[derive(Debug, Clone)]
pub struct NewRating {
    pub user_id: Uuid,
    pub cafe_id: Uuid,
    pub rating: i16,
    pub review: String,
    pub aspects: Aspects,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RatingSort {
    #[default]
    Newest,
    Oldest,
    Highest,
    Lowest,
    MostHelpful,
}

impl RatingSort {
    /// Unknown keys fall back to newest first.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("oldest") => RatingSort::Oldest,
            Some("highest") => RatingSort::Highest,
            Some("lowest") => RatingSort::Lowest,
            Some("mostHelpful") | Some("helpful") => RatingSort::MostHelpful,
            _ => RatingSort::Newest,
        }
    }

    pub fn order_by(&self) -> &'static str {
        match self {
            RatingSort::Newest => "r.created_at DESC, r.id DESC",
            RatingSort::Oldest => "r.created_at ASC, r.id ASC",
            RatingSort::Highest => "r.rating DESC, r.created_at DESC, r.id DESC",
            RatingSort::Lowest => "r.rating ASC, r.created_at DESC, r.id DESC",
            RatingSort::MostHelpful => "r.helpful_count DESC, r.created_at DESC, r.id DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpfulToggle {
    pub helpful_count: i32,
    pub is_helpful: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DistributionEntry {
    pub rating: i16,
    pub count: i64,
    pub percentage: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AspectAverages {
    pub food: Option<f64>,
    pub service: Option<f64>,
    pub ambiance: Option<f64>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CafeRatingSummary {
    pub average_rating: f64,
    pub total_ratings: i64,
    pub distribution: Vec<DistributionEntry>,
    pub aspects: AspectAverages,
}

/// Running sum and count of one numeric field across a cafe's ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub sum: i64,
    pub count: i64,
}

impl Tally {
    pub fn add(&mut self, value: Option<i16>) {
        if let Some(v) = value {
            self.sum += i64::from(v);
            self.count += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AspectTotals {
    pub food: Tally,
    pub service: Tally,
    pub ambiance: Tally,
    pub value: Tally,
}
