use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

/// Bearer token the mock accepts.
pub const TOKEN: &str = "mock-jwt-token";

pub const FIJI_ID: Uuid = Uuid::from_u128(0x0f1f_0000_0000_4000_8000_0000_0000_0001);
pub const BELIZE_ID: Uuid = Uuid::from_u128(0x0be1_0000_0000_4000_8000_0000_0000_0002);
pub const ACEH_ID: Uuid = Uuid::from_u128(0x0ace_0000_0000_4000_8000_0000_0000_0003);

const PUBLIC_RESOURCES: &[&str] = &[
    "health",
    "managements",
    "profiles",
    "projecttags",
    "sites",
    "summarysites",
    "version",
    "choices",
    "benthicattributes",
    "fishfamilies",
    "fishgenera",
    "fishgroupings",
    "fishsizes",
    "fishspecies",
];

const PROJECT_SCOPED: &[&str] = &[
    "collectrecords",
    "managements",
    "observers",
    "project_profiles",
    "sites",
    "obsbenthiclits",
    "obsbenthicpits",
    "obscoloniesbleached",
    "obshabitatcomplexities",
    "obstransectbeltfishs",
    "obsquadratbenthicpercent",
    "benthiclittransectmethods",
    "benthicpittransectmethods",
    "benthictransects",
    "beltfishtransectmethods",
    "bleachingquadratcollectionmethods",
    "fishbelttransects",
    "habitatcomplexitytransectmethods",
    "quadratcollections",
    "sampleunitmethods",
    "sampleevents",
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub status: u8,
    pub countries: Vec<String>,
}

/// Data the mock serves. `members` lists the projects the holder of
/// `TOKEN` belongs to.
#[derive(Clone, Debug)]
pub struct Fixture {
    pub projects: Vec<Project>,
    pub members: Vec<Uuid>,
}

impl Default for Fixture {
    fn default() -> Self {
        let project = |id, name: &str, country: &str| Project {
            id,
            name: name.to_string(),
            status: 90,
            countries: vec![country.to_string()],
        };
        Self {
            projects: vec![
                project(FIJI_ID, "Fiji Reef Survey", "Fiji"),
                project(BELIZE_ID, "Belize Barrier Reef", "Belize"),
                project(ACEH_ID, "Aceh Coral Monitoring", "Indonesia"),
            ],
            members: vec![FIJI_ID, ACEH_ID],
        }
    }
}

pub type Shared = Arc<Fixture>;

pub fn app() -> Router {
    app_with(Fixture::default())
}

pub fn app_with(fixture: Fixture) -> Router {
    Router::new()
        .route("/me", get(me))
        .route("/projects", get(list_projects))
        .route("/projects/{id}", get(get_project))
        .route("/projects/{id}/{resource}", get(project_resource))
        .route("/{resource}", get(public_resource))
        .with_state(Arc::new(fixture))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn is_authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        == Some(TOKEN)
}

fn has_flag(query: Option<&str>, flag: &str) -> bool {
    query.is_some_and(|q| {
        q.split('&')
            .any(|part| part == flag || part.starts_with(&format!("{flag}=")))
    })
}

fn page(results: Vec<Value>) -> Value {
    json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results,
    })
}

async fn me(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    if !is_authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({
        "id": Uuid::nil(),
        "first_name": "Mock",
        "last_name": "Diver",
        "email": "diver@example.org",
    })))
}

async fn public_resource(Path(resource): Path<String>) -> Result<Json<Value>, StatusCode> {
    if !PUBLIC_RESOURCES.contains(&resource.as_str()) {
        return Err(StatusCode::NOT_FOUND);
    }
    let body = match resource.as_str() {
        "health" => json!("ok"),
        "version" => json!({"version": "mock"}),
        other => page(vec![json!({"resource": other})]),
    };
    Ok(Json(body))
}

async fn list_projects(
    State(fixture): State<Shared>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    let showall = has_flag(query.as_deref(), "showall");
    let authorized = is_authorized(&headers);
    let results = fixture
        .projects
        .iter()
        .filter(|p| showall || (authorized && fixture.members.contains(&p.id)))
        .map(|p| json!(p))
        .collect();
    Json(page(results))
}

async fn get_project(
    State(fixture): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Project>, StatusCode> {
    let id = Uuid::parse_str(&id).map_err(|_| StatusCode::NOT_FOUND)?;
    fixture
        .projects
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Project-scoped listing. Echoes the raw query so clients can verify what
/// reached the wire.
async fn project_resource(
    State(fixture): State<Shared>,
    Path((id, resource)): Path<(String, String)>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, StatusCode> {
    let id = Uuid::parse_str(&id).map_err(|_| StatusCode::NOT_FOUND)?;
    if !fixture.projects.iter().any(|p| p.id == id) || !PROJECT_SCOPED.contains(&resource.as_str()) {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut body = page(vec![json!({"project": id, "resource": resource})]);
    body["query"] = json!(query);
    Ok(Json(body))
}
