use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::{
    http::handlers::{
        create_cafe_handler, delete_cafe_handler, delete_rating_handler, get_cafe_handler,
        get_cafe_ratings_handler, get_my_cafe_rating_handler, get_my_ratings_handler,
        list_cafes_handler, submit_rating_handler, toggle_helpful_handler, update_cafe_handler,
    },
    state::AppState,
};

pub fn create_http_routes(state: AppState) -> Router {
    Router::new()
        .route("/ratings", post(submit_rating_handler))
        .route("/ratings/cafe/{cafe_id}", get(get_cafe_ratings_handler))
        .route("/ratings/user", get(get_my_ratings_handler))
        .route("/ratings/user/{cafe_id}", get(get_my_cafe_rating_handler))
        .route("/ratings/{rating_id}", delete(delete_rating_handler))
        .route("/ratings/{rating_id}/helpful", post(toggle_helpful_handler))
        .route("/cafes", get(list_cafes_handler).post(create_cafe_handler))
        .route(
            "/cafes/{cafe_id}",
            get(get_cafe_handler)
                .patch(update_cafe_handler)
                .delete(delete_cafe_handler),
        )
        .with_state(state)
}
