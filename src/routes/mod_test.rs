use super::*;

#[test]
fn api_error_keeps_client_error_message() {
    let (status, Json(body)) = api_error(StatusCode::CONFLICT, "project already exists: x");
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "project already exists: x");
}

#[test]
fn api_error_hides_server_error_details() {
    let (status, Json(body)) = api_error(StatusCode::INTERNAL_SERVER_ERROR, "database error: connection refused");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal error");
}

#[tokio::test]
async fn healthz_returns_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}
