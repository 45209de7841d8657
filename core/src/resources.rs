//! Resource vocabularies and request-path resolution.
//!
//! # Design
//! The service exposes a fixed set of endpoints grouped into vocabularies:
//! non-project resources, attributes, project resources, observations and
//! sample units/methods. The tables below are immutable statics; every
//! `ResourceResolver` check is a pure lookup so invalid input is rejected
//! before a request is built.
//!
//! Sample units and sample-unit methods are served from one combined table.
//! Older service revisions listed them separately and disagreed on where
//! `sampleunitmethods` belongs.

use tracing::debug;

use crate::error::ApiError;
use crate::http::Query;
use crate::types::FilterValue;

pub const NON_PROJECT_RESOURCES: &[&str] = &[
    "health",
    "managements",
    "me",
    "profiles",
    "projecttags",
    "sites",
    "summarysites",
    "version",
];

pub const ATTRIBUTES: &[&str] = &[
    "benthicattributes",
    "fishfamilies",
    "fishgenera",
    "fishgroupings",
    "fishsizes",
    "fishspecies",
];

pub const PROJECT_RESOURCES: &[&str] = &[
    "collectrecords",
    "managements",
    "observers",
    "project_profiles",
    "sites",
];

pub const OBSERVATIONS: &[&str] = &[
    "obsbenthiclits",
    "obsbenthicpits",
    "obscoloniesbleached",
    "obshabitatcomplexities",
    "obstransectbeltfishs",
    "obsquadratbenthicpercent",
];

pub const SAMPLE_UNITS_METHODS: &[&str] = &[
    "benthiclittransectmethods",
    "benthicpittransectmethods",
    "benthictransects",
    "beltfishtransectmethods",
    "bleachingquadratcollectionmethods",
    "fishbelttransects",
    "habitatcomplexitytransectmethods",
    "quadratcollections",
    "sampleunitmethods",
];

/// Resource segment for sample events under a project.
pub const SAMPLE_EVENTS: &str = "sampleevents";

/// A query filter accepted by some resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterKey {
    pub name: &'static str,
    /// Range and date filters are meaningless as bare flags.
    pub requires_value: bool,
}

const fn flag(name: &'static str) -> FilterKey {
    FilterKey {
        name,
        requires_value: false,
    }
}

const fn valued(name: &'static str) -> FilterKey {
    FilterKey {
        name,
        requires_value: true,
    }
}

static BELT_FISH_FILTERS: &[FilterKey] = &[
    flag("beltfish"),
    flag("beltfish__transect"),
    flag("beltfish__transect__sample_event"),
    flag("fish_attribute"),
    valued("size_min"),
    valued("size_max"),
    valued("count_min"),
    valued("count_max"),
];

static BENTHIC_LIT_FILTERS: &[FilterKey] = &[
    flag("benthiclit"),
    flag("benthiclit__transect"),
    flag("benthiclit__transect__sample_event"),
    flag("attribute"),
    flag("growth_form"),
    valued("length_min"),
    valued("length_max"),
];

static BENTHIC_PIT_FILTERS: &[FilterKey] = &[
    flag("benthicpit"),
    flag("benthicpit__transect"),
    flag("benthicpit__transect__sample_event"),
    flag("attribute"),
    flag("growth_form"),
];

static HABITAT_COMPLEXITY_FILTERS: &[FilterKey] = &[
    flag("habitatcomplexity"),
    flag("habitatcomplexity__transect"),
    flag("habitatcomplexity__transect__sample_event"),
    flag("score"),
];

static COLONIES_BLEACHED_FILTERS: &[FilterKey] = &[
    flag("bleachingquadratcollection"),
    flag("bleachingquadratcollection__quadrat"),
    flag("bleachingquadratcollection__sample_event"),
    flag("attribute"),
    flag("growth_form"),
];

static QUADRAT_BENTHIC_PERCENT_FILTERS: &[FilterKey] = &[
    flag("bleachingquadratcollection"),
    flag("bleachingquadratcollection__quadrat"),
    flag("bleachingquadratcollection__sample_event"),
    flag("quadrat_number"),
];

static OBSERVATION_FILTERS: &[(&str, &[FilterKey])] = &[
    ("obsbenthiclits", BENTHIC_LIT_FILTERS),
    ("obsbenthicpits", BENTHIC_PIT_FILTERS),
    ("obscoloniesbleached", COLONIES_BLEACHED_FILTERS),
    ("obshabitatcomplexities", HABITAT_COMPLEXITY_FILTERS),
    ("obstransectbeltfishs", BELT_FISH_FILTERS),
    ("obsquadratbenthicpercent", QUADRAT_BENTHIC_PERCENT_FILTERS),
];

pub static SAMPLE_UNIT_FILTERS: &[FilterKey] =
    &[valued("len_surveyed_min"), valued("len_surveyed_max")];

pub static SAMPLE_EVENT_FILTERS: &[FilterKey] =
    &[valued("sample_date_before"), valued("sample_date_after")];

/// The endpoint groups a resource kind can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
    NonProject,
    Attribute,
    ProjectResource,
    Observation,
    SampleUnitMethod,
}

impl Vocabulary {
    pub fn members(self) -> &'static [&'static str] {
        match self {
            Vocabulary::NonProject => NON_PROJECT_RESOURCES,
            Vocabulary::Attribute => ATTRIBUTES,
            Vocabulary::ProjectResource => PROJECT_RESOURCES,
            Vocabulary::Observation => OBSERVATIONS,
            Vocabulary::SampleUnitMethod => SAMPLE_UNITS_METHODS,
        }
    }

    pub fn contains(self, kind: &str) -> bool {
        self.members().contains(&kind)
    }

    fn label(self) -> &'static str {
        match self {
            Vocabulary::NonProject => "non-project resource",
            Vocabulary::Attribute => "attribute",
            Vocabulary::ProjectResource => "project resource",
            Vocabulary::Observation => "observation",
            Vocabulary::SampleUnitMethod => "sample unit",
        }
    }

    fn check(self, kind: &str) -> Result<(), ApiError> {
        if self.contains(kind) {
            Ok(())
        } else {
            debug!(kind, vocabulary = self.label(), "rejected resource kind");
            Err(ApiError::InvalidResource(format!("{} {kind}", self.label())))
        }
    }
}

/// Permitted filters for an observation kind, or `None` if `kind` is not an
/// observation.
pub fn observation_filters(kind: &str) -> Option<&'static [FilterKey]> {
    OBSERVATION_FILTERS
        .iter()
        .find(|(name, _)| *name == kind)
        .map(|(_, filters)| *filters)
}

/// Validates resource kinds and filters, and composes request paths and
/// query payloads. Holds no state.
#[derive(Debug)]
pub struct ResourceResolver;

impl ResourceResolver {
    pub fn validate_info(kind: &str) -> Result<(), ApiError> {
        Vocabulary::NonProject.check(kind)
    }

    pub fn validate_attribute(kind: &str) -> Result<(), ApiError> {
        Vocabulary::Attribute.check(kind)
    }

    pub fn validate_project_resource(kind: &str) -> Result<(), ApiError> {
        Vocabulary::ProjectResource.check(kind)
    }

    /// Check an observation kind and, if given, a filter from its own set.
    /// Returns the matched filter so the caller can check its value.
    pub fn validate_observation(
        kind: &str,
        filter: Option<&str>,
    ) -> Result<Option<FilterKey>, ApiError> {
        let filters = observation_filters(kind)
            .ok_or_else(|| ApiError::InvalidResource(format!("observation {kind}")))?;
        lookup_filter(filters, kind, filter)
    }

    pub fn validate_sample_unit(
        kind: &str,
        filter: Option<&str>,
    ) -> Result<Option<FilterKey>, ApiError> {
        Vocabulary::SampleUnitMethod.check(kind)?;
        lookup_filter(SAMPLE_UNIT_FILTERS, kind, filter)
    }

    pub fn validate_sample_method(kind: &str) -> Result<(), ApiError> {
        Vocabulary::SampleUnitMethod.check(kind)
    }

    pub fn validate_sample_event_filter(filter: Option<&str>) -> Result<Option<FilterKey>, ApiError> {
        lookup_filter(SAMPLE_EVENT_FILTERS, SAMPLE_EVENTS, filter)
    }

    /// Range and date filters must carry a value.
    pub fn require_value(
        filter: Option<FilterKey>,
        value: Option<&FilterValue>,
    ) -> Result<(), ApiError> {
        match filter {
            Some(key) if key.requires_value && value.is_none() => Err(ApiError::InvalidResource(
                format!("filter {} requires a value", key.name),
            )),
            _ => Ok(()),
        }
    }

    /// `projects/{id}/` or `projects/{id}/{resource}/`. Slashes around the
    /// inputs are dropped so repeated composition yields the same path.
    pub fn build_path(project_id: &str, resource: Option<&str>) -> String {
        let id = normalize_path(project_id);
        match resource.map(normalize_path) {
            Some(resource) if !resource.is_empty() => format!("projects/{id}/{resource}/"),
            _ => format!("projects/{id}/"),
        }
    }

    /// No filter gives no payload; a filter with a value gives `key=value`;
    /// a filter alone gives a bare flag.
    pub fn build_query(filter: Option<&str>, value: Option<&FilterValue>) -> Option<Query> {
        let filter = filter.filter(|f| !f.is_empty())?;
        Some(match value {
            Some(value) => Query::pair(filter, value.to_string()),
            None => Query::flag(filter),
        })
    }
}

/// Strip leading and trailing slashes and spaces.
pub fn normalize_path(path: &str) -> &str {
    path.trim_matches(|c| c == '/' || c == ' ')
}

fn lookup_filter(
    filters: &'static [FilterKey],
    kind: &str,
    filter: Option<&str>,
) -> Result<Option<FilterKey>, ApiError> {
    let Some(filter) = filter else {
        return Ok(None);
    };
    filters
        .iter()
        .find(|key| key.name == filter)
        .copied()
        .map(Some)
        .ok_or_else(|| {
            debug!(kind, filter, "rejected filter");
            ApiError::InvalidResource(format!("filter {filter} for {kind}"))
        })
}
