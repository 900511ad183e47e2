pub mod cafe;
pub mod pagination;
pub mod rating;

pub use cafe::{Cafe, CafeSort, NewCafe, RatingSummary};
pub use pagination::{Page, PageQuery, PageRequest, PaginationMeta};
pub use rating::{Aspects, HelpfulToggle, NewRating, Rating, RatingSort};
