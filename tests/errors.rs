use axum::http::StatusCode;
use cafe_hub_be::errors::AppError;

#[test]
fn test_error_statuses() {
    let cases = [
        (AppError::NotFound("Cafe not found".into()), StatusCode::NOT_FOUND),
        (AppError::Forbidden("no".into()), StatusCode::FORBIDDEN),
        (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
        (AppError::Unauthorized("who".into()), StatusCode::UNAUTHORIZED),
        (AppError::Conflict("twice".into()), StatusCode::CONFLICT),
        (AppError::DatabaseError("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        (AppError::EnvError("unset".into()), StatusCode::INTERNAL_SERVER_ERROR),
        (AppError::InternalError, StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (err, status) in cases {
        assert_eq!(err.to_response().0, status, "{err}");
    }
}

#[test]
fn test_io_errors_convert_and_map_to_500() {
    let err: AppError = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken").into();

    assert!(matches!(err, AppError::Io(_)));
    let (status, message) = err.to_response();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(message, "port taken");
}
