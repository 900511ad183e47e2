#![allow(dead_code)]

use cafe_hub_be::{
    auth::Claims,
    config::Config,
    db::{CafeStore, MemoryStore},
    models::Cafe,
    state::AppState,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret";

pub fn setup() -> (MemoryStore, AppState) {
    let store = MemoryStore::new();
    let state = AppState::new(store.clone(), TEST_SECRET);
    (store, state)
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        port: 0,
        jwt_secret: TEST_SECRET.into(),
        allowed_origins: vec!["http://localhost:3000".into()],
        rate_limit_per_minute: 10_000,
    }
}

pub async fn create_cafe(state: &AppState, owner: Uuid) -> Cafe {
    state
        .cafes
        .create(owner, "Bean There".into(), "Espresso and pastries".into())
        .await
        .expect("cafe should be created")
}

pub async fn summary_of(store: &MemoryStore, cafe_id: Uuid) -> (f64, i64) {
    let cafe = store
        .find_cafe(cafe_id)
        .await
        .expect("store read")
        .expect("cafe exists");
    (cafe.ratings.average, cafe.ratings.count)
}

pub fn token_for(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("token should encode")
}
