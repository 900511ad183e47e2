use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Denormalized `{average, count}` of a cafe's ratings. Only the aggregator writes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cafe {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub ratings: RatingSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct CafeRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub rating_average: f64,
    pub rating_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CafeRow> for Cafe {
    fn from(row: CafeRow) -> Self {
        Cafe {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            description: row.description,
            is_active: row.is_active,
            ratings: RatingSummary {
                average: row.rating_average,
                count: row.rating_count,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCafe {
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
}

/// Ordering for the public cafe listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CafeSort {
    #[default]
    Rating,
    Newest,
}

impl CafeSort {
    /// Unknown keys fall back to highest rated first.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("newest") => CafeSort::Newest,
            _ => CafeSort::Rating,
        }
    }

    pub fn order_by(&self) -> &'static str {
        match self {
            CafeSort::Rating => "rating_average DESC, rating_count DESC, created_at DESC, id DESC",
            CafeSort::Newest => "created_at DESC, id DESC",
        }
    }
}
