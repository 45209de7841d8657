//! Synchronous, typed client for the MERMAID marine-survey API.
//!
//! # Overview
//! Maps semantic operations (look up a project by name, fetch filtered
//! observations, list sample units) onto resource paths and query payloads,
//! validates them against the service's fixed vocabularies, performs the GET
//! through a pluggable `Transport`, and classifies failures into `ApiError`.
//!
//! # Design
//! - `ResourceResolver` is pure: vocabulary checks plus path/query
//!   composition, no I/O.
//! - `ApiClient` owns the session and the transport. Every operation is one
//!   blocking round trip, or two when a project is resolved by name.
//! - The network is behind `Transport`; the `ureq` feature (on by default)
//!   provides a blocking implementation.
//! - Pagination is not handled: list endpoints return the service's first
//!   page as-is.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resources;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use config::{ClientConfig, API_DEV_URL, API_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Query};
pub use resources::{FilterKey, ResourceResolver, Vocabulary};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{FilterValue, Project, ProjectRef};
