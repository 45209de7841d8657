//! Domain types for the MERMAID API.
//!
//! # Design
//! Response bodies stay `serde_json::Value` except for projects, which the
//! client needs to inspect during name resolution. Unknown project fields are
//! preserved in `extra` so a resolved project compares equal to the body the
//! service returned for it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::resources::normalize_path;

/// A MERMAID project. Only `id` and `name` are interpreted by the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// How a caller identifies the project an operation is scoped to.
///
/// Precedence between the three forms is fixed by [`ProjectRef::from_parts`]:
/// an id beats a name, and a name beats a project object.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectRef {
    Id(String),
    Name(String),
    Object(Project),
}

impl ProjectRef {
    pub fn id(id: impl Into<String>) -> Self {
        ProjectRef::Id(id.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        ProjectRef::Name(name.into())
    }

    /// Collapse loosely supplied identifiers into one reference.
    ///
    /// Empty strings, and ids that are only slashes, count as absent. Fails
    /// with `InvalidProject` when nothing usable is given.
    pub fn from_parts(
        id: Option<&str>,
        name: Option<&str>,
        project: Option<Project>,
    ) -> Result<Self, ApiError> {
        if let Some(id) = id.filter(|id| !normalize_path(id).is_empty()) {
            return Ok(ProjectRef::Id(id.to_string()));
        }
        if let Some(name) = name.filter(|name| !name.is_empty()) {
            return Ok(ProjectRef::Name(name.to_string()));
        }
        project.map(ProjectRef::Object).ok_or_else(|| {
            ApiError::InvalidProject("no project id, name or object given".to_string())
        })
    }
}

impl From<Project> for ProjectRef {
    fn from(project: Project) -> Self {
        ProjectRef::Object(project)
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectRef::Id(id) => write!(f, "id:{id}"),
            ProjectRef::Name(name) => write!(f, "name:{name}"),
            ProjectRef::Object(project) => write!(f, "id:{} name:{}", project.id, project.name),
        }
    }
}

/// Value for a filter that takes one, e.g. `size_min=20` or
/// `sample_date_after=2019-01-01`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Number(n) => write!(f, "{n}"),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Number(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        FilterValue::Number(i64::from(n))
    }
}

impl From<u32> for FilterValue {
    fn from(n: u32) -> Self {
        FilterValue::Number(i64::from(n))
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}
