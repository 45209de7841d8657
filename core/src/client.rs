//! Synchronous client for the MERMAID API.
//!
//! # Design
//! `ApiClient` holds the session (base URL and optional bearer token) and a
//! `Transport`. Every public operation validates its input with
//! `ResourceResolver` first, then performs at most one GET, or two when a
//! project has to be resolved by name. Requests are built by
//! `build_request` and responses interpreted by `parse_response`, so both
//! halves can be exercised without a network.

use std::fmt;

use serde_json::Value;
use tracing::{debug, instrument, warn, Span};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Query};
use crate::resources::{normalize_path, FilterKey, ResourceResolver, SAMPLE_EVENTS};
use crate::transport::Transport;
use crate::types::{FilterValue, Project, ProjectRef};

/// Client for the MERMAID REST API.
///
/// The session is fixed at construction: a client built without a token
/// stays unauthenticated for its whole lifetime.
pub struct ApiClient<T> {
    base_url: String,
    token: Option<String>,
    transport: T,
}

#[cfg(feature = "ureq")]
impl ApiClient<crate::transport::UreqTransport> {
    /// Client backed by the blocking `ureq` transport, honoring the
    /// configured timeout.
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = crate::transport::UreqTransport::new(config.timeout);
        Self::new(config, transport)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Build the GET request for `path`, which is normalized before being
    /// joined onto the base URL.
    pub fn build_request(&self, path: &str, query: Option<Query>) -> HttpRequest {
        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/{}", self.base_url, normalize_path(path)),
            query,
            headers,
        }
    }

    /// Map a response for `path` to its JSON body or a typed error.
    pub fn parse_response(&self, path: &str, response: HttpResponse) -> Result<Value, ApiError> {
        match response.status {
            200 => serde_json::from_str(&response.body)
                .map_err(|e| ApiError::DeserializationError(e.to_string())),
            401 => Err(ApiError::unauthorized_default()),
            404 => Err(ApiError::InvalidResource(normalize_path(path).to_string())),
            status => Err(ApiError::TransportError {
                status,
                body: response.body,
            }),
        }
    }

    /// GET `path` relative to the base URL and return the parsed body.
    #[instrument(
        name = "mermaid_fetch",
        skip(self, query),
        fields(
            http.method = "GET",
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
        )
    )]
    pub fn fetch(&self, path: &str, query: Option<Query>) -> Result<Value, ApiError> {
        let request = self.build_request(path, query);
        Span::current().record("http.url", request.full_url().as_str());

        let response = self.transport.send(&request)?;
        Span::current().record("http.status_code", response.status);

        if response.status == 200 {
            debug!("request succeeded");
        } else {
            warn!(status = response.status, "request failed");
        }
        self.parse_response(path, response)
    }

    /// Non-project resources such as `health`, `version` or `me`. `me`
    /// requires a token and is refused locally without one.
    pub fn get_info(&self, kind: &str) -> Result<Value, ApiError> {
        if kind == "me" && !self.is_authenticated() {
            return Err(ApiError::Unauthorized(
                "authentication required for access to \"me\" endpoint".to_string(),
            ));
        }
        ResourceResolver::validate_info(kind)?;
        self.fetch(kind, None)
    }

    /// Choice lists (countries, growth forms, ...) used across the service.
    pub fn get_choices(&self) -> Result<Value, ApiError> {
        self.fetch("choices", None)
    }

    pub fn get_attribute(&self, kind: &str) -> Result<Value, ApiError> {
        ResourceResolver::validate_attribute(kind)?;
        self.fetch(kind, None)
    }

    pub fn get_benthic_attributes(&self) -> Result<Value, ApiError> {
        self.get_attribute("benthicattributes")
    }

    pub fn get_fish_families(&self) -> Result<Value, ApiError> {
        self.get_attribute("fishfamilies")
    }

    pub fn get_fish_genera(&self) -> Result<Value, ApiError> {
        self.get_attribute("fishgenera")
    }

    pub fn get_fish_groupings(&self) -> Result<Value, ApiError> {
        self.get_attribute("fishgroupings")
    }

    pub fn get_fish_species(&self) -> Result<Value, ApiError> {
        self.get_attribute("fishspecies")
    }

    pub fn get_fish_sizes(&self) -> Result<Value, ApiError> {
        self.get_attribute("fishsizes")
    }

    /// Projects the caller is a member of, or every project when `showall`
    /// is set. `showall` goes on the wire as a bare flag.
    pub fn get_projects(&self, showall: bool) -> Result<Value, ApiError> {
        self.fetch("projects", showall.then(|| Query::flag("showall")))
    }

    /// Look up a project. Names are matched exactly against the unfiltered
    /// project list; the first match in service order wins.
    pub fn resolve_project(&self, project: &ProjectRef) -> Result<Project, ApiError> {
        match project {
            ProjectRef::Id(id) => {
                let id = checked_id(id)?;
                let body = self.fetch(&ResourceResolver::build_path(id, None), None)?;
                serde_json::from_value(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
            }
            ProjectRef::Name(name) => self.find_project_by_name(name),
            ProjectRef::Object(project) => Ok(project.clone()),
        }
    }

    /// Project id for any reference. An id is returned normalized, without a
    /// request; one that is blank after normalizing is `InvalidProject`.
    pub fn resolve_project_id(&self, project: &ProjectRef) -> Result<String, ApiError> {
        let (id, label) = match project {
            ProjectRef::Id(id) => return checked_id(id).map(str::to_string),
            ProjectRef::Object(project) => (project.id.clone(), project.name.clone()),
            ProjectRef::Name(name) => (self.find_project_by_name(name)?.id, name.clone()),
        };
        if id.is_empty() {
            return Err(ApiError::InvalidProject(format!("{label} has no id")));
        }
        Ok(id)
    }

    /// Project-level resources: sites, managements, observers, ...
    pub fn get_project_resource(&self, kind: &str, project: &ProjectRef) -> Result<Value, ApiError> {
        ResourceResolver::validate_project_resource(kind)?;
        self.fetch_project_resource(project, kind, None, None)
    }

    /// Observations of one kind, optionally narrowed by one of that kind's
    /// filters.
    pub fn get_observations(
        &self,
        kind: &str,
        project: &ProjectRef,
        filter: Option<&str>,
        filter_val: Option<FilterValue>,
    ) -> Result<Value, ApiError> {
        let key = ResourceResolver::validate_observation(kind, filter)?;
        self.fetch_project_resource(project, kind, key, filter_val.as_ref())
    }

    /// Sample units, optionally narrowed by surveyed length.
    pub fn get_sample_units(
        &self,
        kind: &str,
        project: &ProjectRef,
        filter: Option<&str>,
        filter_val: Option<FilterValue>,
    ) -> Result<Value, ApiError> {
        let key = ResourceResolver::validate_sample_unit(kind, filter)?;
        self.fetch_project_resource(project, kind, key, filter_val.as_ref())
    }

    pub fn get_sample_methods(&self, kind: &str, project: &ProjectRef) -> Result<Value, ApiError> {
        ResourceResolver::validate_sample_method(kind)?;
        self.fetch_project_resource(project, kind, None, None)
    }

    /// Sample events, optionally bounded by sample date (`YYYY-MM-DD`).
    pub fn get_sample_events(
        &self,
        project: &ProjectRef,
        filter: Option<&str>,
        filter_val: Option<FilterValue>,
    ) -> Result<Value, ApiError> {
        let key = ResourceResolver::validate_sample_event_filter(filter)?;
        self.fetch_project_resource(project, SAMPLE_EVENTS, key, filter_val.as_ref())
    }

    fn fetch_project_resource(
        &self,
        project: &ProjectRef,
        resource: &str,
        filter: Option<FilterKey>,
        filter_val: Option<&FilterValue>,
    ) -> Result<Value, ApiError> {
        ResourceResolver::require_value(filter, filter_val)?;
        let id = self.resolve_project_id(project)?;
        let path = ResourceResolver::build_path(&id, Some(resource));
        let query = ResourceResolver::build_query(filter.map(|key| key.name), filter_val);
        self.fetch(&path, query)
    }

    fn find_project_by_name(&self, name: &str) -> Result<Project, ApiError> {
        let projects = self.get_projects(true)?;
        let results = projects
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| ApiError::DeserializationError("projects response has no results".to_string()))?;

        let found = results
            .iter()
            .find(|item| item.get("name").and_then(Value::as_str) == Some(name))
            .ok_or_else(|| ApiError::InvalidProject(format!("name:{name}")))?;
        debug!(name, "resolved project by name");
        serde_json::from_value(found.clone()).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

/// An id that normalizes to nothing would address the project list itself.
fn checked_id(id: &str) -> Result<&str, ApiError> {
    let id = normalize_path(id);
    if id.is_empty() {
        return Err(ApiError::InvalidProject("empty project id".to_string()));
    }
    Ok(id)
}

impl<T> fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}
