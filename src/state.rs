use std::sync::Arc;

use crate::{
    db::{CafeStore, RatingStore},
    services::{Aggregator, CafeLocks, CafeService, RatingService},
};

#[derive(Clone)]
pub struct AppState {
    pub ratings: Arc<RatingService>,
    pub cafes: Arc<CafeService>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    /// Wires both services over one backing store, with the aggregator as the rating hook.
    pub fn new<S>(store: S, jwt_secret: &str) -> Self
    where
        S: RatingStore + CafeStore + 'static,
    {
        let store = Arc::new(store);
        Self::with_stores(store.clone(), store, jwt_secret)
    }

    pub fn with_stores(
        ratings: Arc<dyn RatingStore>,
        cafes: Arc<dyn CafeStore>,
        jwt_secret: &str,
    ) -> Self {
        let locks = CafeLocks::new();
        let aggregator = Arc::new(Aggregator::new(ratings.clone(), cafes.clone()));

        Self {
            ratings: Arc::new(RatingService::new(
                ratings,
                cafes.clone(),
                aggregator,
                locks.clone(),
            )),
            cafes: Arc::new(CafeService::new(cafes, locks)),
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}
