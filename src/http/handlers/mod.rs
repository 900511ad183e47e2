pub mod cafes;
pub mod ratings;

pub use cafes::{
    create_cafe_handler, delete_cafe_handler, get_cafe_handler, list_cafes_handler,
    update_cafe_handler,
};

pub use ratings::{
    delete_rating_handler, get_cafe_ratings_handler, get_my_cafe_rating_handler,
    get_my_ratings_handler, submit_rating_handler, toggle_helpful_handler,
};
