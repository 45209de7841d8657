use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Project, ACEH_ID, BELIZE_ID, FIJI_ID, TOKEN};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn authed_get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(String::new())
        .unwrap()
}

fn names(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

// --- non-project resources ---

#[tokio::test]
async fn health_is_public() {
    let resp = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn unknown_resource_returns_404() {
    let resp = app().oneshot(get("/fail")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn me_requires_token() {
    let resp = app().oneshot(get("/me")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app().oneshot(authed_get("/me")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["email"], "diver@example.org");
}

#[tokio::test]
async fn attributes_are_listed() {
    let resp = app().oneshot(get("/fishspecies")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["results"][0]["resource"], "fishspecies");
}

// --- projects ---

#[tokio::test]
async fn projects_without_token_or_showall_is_empty() {
    let resp = app().oneshot(get("/projects")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn projects_with_token_lists_memberships() {
    let resp = app().oneshot(authed_get("/projects")).await.unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(names(&body), vec!["Fiji Reef Survey", "Aceh Coral Monitoring"]);
}

#[tokio::test]
async fn projects_showall_flag_lists_everything() {
    let resp = app().oneshot(get("/projects?showall")).await.unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["count"], 3);
    assert_eq!(
        names(&body),
        vec!["Fiji Reef Survey", "Belize Barrier Reef", "Aceh Coral Monitoring"]
    );
}

#[tokio::test]
async fn get_project_by_id() {
    let resp = app().oneshot(get(&format!("/projects/{BELIZE_ID}"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let project: Project = body_json(resp).await;
    assert_eq!(project.id, BELIZE_ID);
    assert_eq!(project.name, "Belize Barrier Reef");
}

#[tokio::test]
async fn get_project_unknown_or_malformed_id_returns_404() {
    let resp = app()
        .oneshot(get("/projects/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app().oneshot(get("/projects/0")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- project-scoped resources ---

#[tokio::test]
async fn project_resource_echoes_query() {
    let resp = app()
        .oneshot(get(&format!("/projects/{FIJI_ID}/fishbelttransects?len_surveyed_min=20")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["query"], "len_surveyed_min=20");
    assert_eq!(body["results"][0]["resource"], "fishbelttransects");
    assert_eq!(body["results"][0]["project"], FIJI_ID.to_string());
}

#[tokio::test]
async fn project_resource_without_query_has_null_query() {
    let resp = app()
        .oneshot(get(&format!("/projects/{ACEH_ID}/sampleevents")))
        .await
        .unwrap();
    let body: Value = body_json(resp).await;
    assert!(body["query"].is_null());
}

#[tokio::test]
async fn project_resource_unknown_kind_returns_404() {
    let resp = app()
        .oneshot(get(&format!("/projects/{FIJI_ID}/nothing")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- several requests against one router ---

#[tokio::test]
async fn resolve_name_then_fetch_sites() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/projects?showall"))
        .await
        .unwrap();
    let body: Value = body_json(resp).await;
    let id = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "Aceh Coral Monitoring")
        .map(|p| p["id"].as_str().unwrap().to_string())
        .unwrap();
    assert_eq!(id, ACEH_ID.to_string());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/projects/{id}/sites")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["results"][0]["resource"], "sites");
}
