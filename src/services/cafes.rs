use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::CafeStore,
    errors::AppError,
    models::{Cafe, CafeSort, NewCafe, Page, PageRequest, PaginationMeta},
    services::cafe_locks::CafeLocks,
};

const MAX_NAME_CHARS: usize = 120;

pub struct CafeService {
    cafes: Arc<dyn CafeStore>,
    locks: CafeLocks,
}

impl CafeService {
    pub fn new(cafes: Arc<dyn CafeStore>, locks: CafeLocks) -> Self {
        Self { cafes, locks }
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        name: String,
        description: String,
    ) -> Result<Cafe, AppError> {
        let name = name.trim().to_string();
        if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
            return Err(AppError::Validation(format!(
                "Cafe name must be between 1 and {} characters",
                MAX_NAME_CHARS
            )));
        }

        self.cafes
            .create_cafe(NewCafe {
                owner_id,
                name,
                description,
            })
            .await
    }

    pub async fn get(&self, cafe_id: Uuid) -> Result<Cafe, AppError> {
        self.cafes
            .find_cafe(cafe_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cafe not found".into()))
    }

    /// Active cafes only, highest rated first unless `sort` says otherwise.
    pub async fn list(&self, page: PageRequest, sort: CafeSort) -> Result<Page<Cafe>, AppError> {
        let total = self.cafes.count_active_cafes().await?;
        let items = self.cafes.list_cafes(sort, page).await?;

        Ok(Page {
            items,
            pagination: PaginationMeta::new(page, total),
        })
    }

    /// Owner-only. An inactive cafe drops out of the listing and refuses new ratings.
    pub async fn set_active(
        &self,
        cafe_id: Uuid,
        requester: Uuid,
        is_active: bool,
    ) -> Result<Cafe, AppError> {
        let cafe = self.get(cafe_id).await?;

        if cafe.owner_id != requester {
            return Err(AppError::Forbidden(
                "Not authorized to update this cafe".into(),
            ));
        }

        let _guard = self.locks.acquire(cafe_id).await;

        let cafe = self
            .cafes
            .set_cafe_active(cafe_id, is_active)
            .await?
            .ok_or_else(|| AppError::NotFound("Cafe not found".into()))?;

        tracing::info!(
            "User {} set cafe {} active={}",
            requester,
            cafe_id,
            is_active
        );
        Ok(cafe)
    }

    /// Owner-only. Ratings go with the cafe and no summary recompute follows.
    pub async fn delete(&self, cafe_id: Uuid, requester: Uuid) -> Result<(), AppError> {
        let cafe = self.get(cafe_id).await?;

        if cafe.owner_id != requester {
            return Err(AppError::Forbidden(
                "Not authorized to delete this cafe".into(),
            ));
        }

        let _guard = self.locks.acquire(cafe_id).await;

        if !self.cafes.delete_cafe(cafe_id).await? {
            return Err(AppError::NotFound("Cafe not found".into()));
        }

        tracing::info!("User {} deleted cafe {}", requester, cafe_id);
        Ok(())
    }
}
