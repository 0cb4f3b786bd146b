use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, COMPANY_EMAIL, FLAKY_POSTING_ID, INDIVIDUAL_EMAIL, NEWCOMER_EMAIL, PASSWORD};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body.to_string()).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<String> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(String::new()).unwrap()
}

async fn login_token(email: &str) -> String {
    let body = format!(r#"{{"email":"{email}","password":"{PASSWORD}"}}"#);
    let resp = app()
        .oneshot(json_request("POST", "/api/auth/login", None, &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await["token"].as_str().unwrap().to_string()
}

// --- auth ---

#[tokio::test]
async fn login_returns_token_and_account_type() {
    let body = format!(r#"{{"email":"{COMPANY_EMAIL}","password":"{PASSWORD}"}}"#);
    let resp = app()
        .oneshot(json_request("POST", "/api/auth/login", None, &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["userType"], "COMPANY");
    assert_eq!(json["name"], "Acme");
    assert!(json["token"].as_str().unwrap().starts_with("token-"));
}

#[tokio::test]
async fn login_wrong_password_returns_401_with_message() {
    let body = format!(r#"{{"email":"{INDIVIDUAL_EMAIL}","password":"nope"}}"#);
    let resp = app()
        .oneshot(json_request("POST", "/api/auth/login", None, &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["message"], "invalid credentials");
}

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = app().oneshot(get("/api/resumes/my", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn individual_cannot_list_company_postings() {
    let token = login_token(INDIVIDUAL_EMAIL).await;
    let resp = app().oneshot(get("/api/job-postings/my", Some(&token))).await.unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(&body_bytes(resp).await[..], b"company accounts only");
}

// --- resumes ---

#[tokio::test]
async fn unknown_resume_returns_404() {
    let token = login_token(INDIVIDUAL_EMAIL).await;
    let resp = app().oneshot(get("/api/resumes/404", Some(&token))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn my_resumes_lists_owned_resumes() {
    let token = login_token(INDIVIDUAL_EMAIL).await;
    let resp = app().oneshot(get("/api/resumes/my", Some(&token))).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["createdAt"], "2024-03-01T09:30:00");
}

// --- applications ---

#[tokio::test]
async fn my_applications_without_any_is_an_empty_body() {
    let token = login_token(NEWCOMER_EMAIL).await;
    let resp = app().oneshot(get("/api/applications/my", Some(&token))).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn posting_applications_include_legacy_row() {
    let token = login_token(COMPANY_EMAIL).await;
    let resp = app()
        .oneshot(get("/api/applications/job-posting/10", Some(&token)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let rows = body_json(resp).await;
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["applicantName"], "Kim");
    assert!(rows[1].get("applicantName").is_none());
}

#[tokio::test]
async fn flaky_posting_count_returns_500() {
    let token = login_token(COMPANY_EMAIL).await;
    let ok = app()
        .oneshot(get("/api/applications/job-posting/10/count", Some(&token)))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(body_json(ok).await, 1);

    let uri = format!("/api/applications/job-posting/{FLAKY_POSTING_ID}/count");
    let resp = app().oneshot(get(&uri, Some(&token))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn update_status_rejects_unknown_value() {
    let token = login_token(COMPANY_EMAIL).await;
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/api/applications/1/status",
            Some(&token),
            r#"{"status":"ARCHIVED"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- catalogue ---

#[tokio::test]
async fn categories_are_wrapped() {
    let token = login_token(INDIVIDUAL_EMAIL).await;
    let resp = app()
        .oneshot(get("/api/job-postings/categories", Some(&token)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["categories"][0], "IT");
}

// --- matching ---

#[tokio::test]
async fn matching_respects_top_n_and_keeps_storage_order() {
    let token = login_token(INDIVIDUAL_EMAIL).await;
    let resp = app()
        .oneshot(get("/api/matching/resume/1/job-postings?topN=2", Some(&token)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let ids: Vec<i64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["jobPostingId"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![10, 11]);
}

#[tokio::test]
async fn candidate_matching_is_company_only() {
    let token = login_token(INDIVIDUAL_EMAIL).await;
    let resp = app()
        .oneshot(get("/api/matching/job-posting/10/resumes", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
