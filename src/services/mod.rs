pub mod aggregator;
pub mod cafe_locks;
pub mod cafes;
pub mod ratings;

pub use aggregator::{Aggregator, RatingHook};
pub use cafe_locks::CafeLocks;
pub use cafes::CafeService;
pub use ratings::{CafeRatingsPage, RatingService, SubmitOutcome};
