mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use cafe_hub_be::create_app;
use common::{setup, test_config, token_for};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> Router {
    let (_store, state) = setup();
    create_app(state, &test_config())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<Uuid>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token_for(user_id)));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    (status, value)
}

async fn create_cafe(app: &Router, owner: Uuid) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/cafes",
        Some(owner),
        Some(json!({ "name": "Daily Grind", "description": "Third wave coffee" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn rate(app: &Router, user: Uuid, cafe_id: &str, stars: i64) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/ratings",
        Some(user),
        Some(json!({ "cafe": cafe_id, "rating": stars, "review": "Lovely spot" })),
    )
    .await
}

#[tokio::test]
async fn test_submit_returns_created_then_ok() {
    let app = app();
    let cafe_id = create_cafe(&app, Uuid::new_v4()).await;
    let user = Uuid::new_v4();

    let (status, body) = rate(&app, user, &cafe_id, 4).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Rating added successfully");
    assert_eq!(body["rating"]["rating"], 4);
    assert_eq!(body["rating"]["helpfulCount"], 0);

    let (status, body) = rate(&app, user, &cafe_id, 2).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Rating updated successfully");
    assert_eq!(body["rating"]["rating"], 2);

    let (status, cafe) = send(&app, Method::GET, &format!("/cafes/{cafe_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cafe["ratings"]["average"], 2.0);
    assert_eq!(cafe["ratings"]["count"], 1);
}

#[tokio::test]
async fn test_submit_errors() {
    let app = app();
    let cafe_id = create_cafe(&app, Uuid::new_v4()).await;
    let user = Uuid::new_v4();

    let (status, _) = rate(&app, user, &Uuid::new_v4().to_string(), 4).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = rate(&app, user, &cafe_id, 7).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/ratings",
        Some(user),
        Some(json!({ "cafe": cafe_id, "rating": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Review is required");

    let (status, _) = send(
        &app,
        Method::POST,
        "/ratings",
        None,
        Some(json!({ "cafe": cafe_id, "rating": 3, "review": "anon" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cafe_ratings_listing() {
    let app = app();
    let cafe_id = create_cafe(&app, Uuid::new_v4()).await;

    for stars in [5, 5, 4, 3, 1] {
        let (status, _) = rate(&app, Uuid::new_v4(), &cafe_id, stars).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/ratings/cafe/{cafe_id}?page=1&limit=2&sortBy=highest"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let stars: Vec<i64> = body["ratings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["rating"].as_i64().unwrap())
        .collect();
    assert_eq!(stars, vec![5, 5]);

    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["totalPages"], 3);
    assert_eq!(body["pagination"]["totalRatings"], 5);
    assert_eq!(body["pagination"]["hasNext"], true);
    assert_eq!(body["pagination"]["hasPrev"], false);

    assert_eq!(body["summary"]["averageRating"], 3.6);
    assert_eq!(body["summary"]["totalRatings"], 5);
    assert_eq!(
        body["summary"]["distribution"],
        json!([
            { "rating": 5, "count": 2, "percentage": 40 },
            { "rating": 4, "count": 1, "percentage": 20 },
            { "rating": 3, "count": 1, "percentage": 20 },
            { "rating": 2, "count": 0, "percentage": 0 },
            { "rating": 1, "count": 1, "percentage": 20 },
        ])
    );

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/ratings/cafe/{}", Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_my_ratings_endpoints() {
    let app = app();
    let cafe_id = create_cafe(&app, Uuid::new_v4()).await;
    let other_cafe = create_cafe(&app, Uuid::new_v4()).await;
    let user = Uuid::new_v4();

    rate(&app, user, &cafe_id, 4).await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/ratings/user/{cafe_id}"),
        Some(user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cafeId"], cafe_id.as_str());

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/ratings/user/{other_cafe}"),
        Some(user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    rate(&app, user, &other_cafe, 5).await;

    let (status, body) = send(&app, Method::GET, "/ratings/user?limit=10", Some(user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ratings"].as_array().unwrap().len(), 2);
    assert_eq!(body["ratings"][0]["cafeId"], other_cafe.as_str());
    assert_eq!(body["pagination"]["totalRatings"], 2);
}

#[tokio::test]
async fn test_delete_rating_permissions() {
    let app = app();
    let cafe_id = create_cafe(&app, Uuid::new_v4()).await;
    let author = Uuid::new_v4();

    let (_, body) = rate(&app, author, &cafe_id, 5).await;
    let rating_id = body["rating"]["id"].as_str().unwrap().to_string();
    let uri = format!("/ratings/{rating_id}");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::DELETE, &uri, Some(author), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Rating deleted successfully");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(author), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, cafe) = send(&app, Method::GET, &format!("/cafes/{cafe_id}"), None, None).await;
    assert_eq!(cafe["ratings"]["count"], 0);
    assert_eq!(cafe["ratings"]["average"], 0.0);
}

#[tokio::test]
async fn test_helpful_toggle_endpoint() {
    let app = app();
    let cafe_id = create_cafe(&app, Uuid::new_v4()).await;
    let (_, body) = rate(&app, Uuid::new_v4(), &cafe_id, 3).await;
    let uri = format!("/ratings/{}/helpful", body["rating"]["id"].as_str().unwrap());
    let voter = Uuid::new_v4();

    let (status, body) = send(&app, Method::POST, &uri, Some(voter), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["helpfulCount"], 1);
    assert_eq!(body["isHelpful"], true);
    assert_eq!(body["message"], "Marked as helpful");

    let (_, body) = send(&app, Method::POST, &uri, Some(voter), None).await;
    assert_eq!(body["helpfulCount"], 0);
    assert_eq!(body["isHelpful"], false);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/ratings/{}/helpful", Uuid::new_v4()),
        Some(voter),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_cafe_cascades() {
    let app = app();
    let owner = Uuid::new_v4();
    let cafe_id = create_cafe(&app, owner).await;
    let user = Uuid::new_v4();
    rate(&app, user, &cafe_id, 4).await;

    let uri = format!("/cafes/{cafe_id}");
    let (status, _) = send(&app, Method::DELETE, &uri, Some(user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(owner), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/ratings/user", Some(user), None).await;
    assert_eq!(body["ratings"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/ratings/user")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cafe_listing_and_deactivation() {
    let app = app();
    let owner = Uuid::new_v4();
    let quiet = create_cafe(&app, owner).await;
    let popular = create_cafe(&app, owner).await;

    rate(&app, Uuid::new_v4(), &quiet, 3).await;
    rate(&app, Uuid::new_v4(), &popular, 5).await;

    let (status, body) = send(&app, Method::GET, "/cafes?limit=1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cafes"].as_array().unwrap().len(), 1);
    assert_eq!(body["cafes"][0]["id"], popular.as_str());
    assert_eq!(body["pagination"]["totalCafes"], 2);
    assert_eq!(body["pagination"]["totalPages"], 2);
    assert_eq!(body["pagination"]["hasNext"], true);

    let uri = format!("/cafes/{popular}");
    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(Uuid::new_v4()),
        Some(json!({ "isActive": false })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(owner),
        Some(json!({ "isActive": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isActive"], false);

    let (_, body) = send(&app, Method::GET, "/cafes?sortBy=rating", None, None).await;
    assert_eq!(body["cafes"].as_array().unwrap().len(), 1);
    assert_eq!(body["cafes"][0]["id"], quiet.as_str());

    let (status, _) = rate(&app, Uuid::new_v4(), &popular, 4).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
