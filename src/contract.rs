//! # contract: seams of the reporting pipeline
//!
//! Wire shapes emitted by the external tooling, the enriched job record the
//! report is built from, and the traits implemented by the real
//! process-backed adapters and by mocks in tests.
//!
//! ## Mocking & Testing
//! - The traits are annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests (exported under the
//!   `test-export-mocks` feature).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use serde::Deserialize;

/// Error type for page fetches (boxed, covers spawn/IO/parse causes).
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for a single identity lookup.
pub type ResolveError = Box<dyn std::error::Error + Send + Sync>;

/// Display shape for report dates, e.g. `Tue Aug 05 2025`.
pub const DATE_FORMAT: &str = "%a %b %d %Y";

/// One raw job object as emitted by the listing command after flattening.
///
/// Unknown fields are ignored; everything but the name is optional on the
/// wire. `started` arrives as epoch milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct RawJob {
    pub name: String,
    #[serde(default)]
    pub params: RawJobParams,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub execution: Option<String>,
    #[serde(default)]
    pub creator_uuid: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub started: Option<DateTime<Utc>>,
}

/// The parameters sub-object of a raw job.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJobParams {
    #[serde(default)]
    pub subtask: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
}

/// One workflow job as it appears in the report.
///
/// Created by the collector from a [`RawJob`]; `creator_name` is written
/// exactly once by the enrichment stage and stays empty when `creator_id`
/// is empty or the lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub name: String,
    pub id: String,
    pub started_at: Option<DateTime<Utc>>,
    pub origin: String,
    pub execution_state: String,
    pub creator_id: String,
    pub creator_name: String,
}

impl JobRecord {
    /// Collapses a raw listing object into a report record. A subtask
    /// parameter is folded into the name as `<name>/<subtask>`.
    pub fn from_raw(raw: RawJob) -> Self {
        let mut name = raw.name;
        if let Some(subtask) = raw.params.subtask.filter(|s| !s.is_empty()) {
            name = format!("{name}/{subtask}");
        }
        JobRecord {
            name,
            id: raw.uuid.unwrap_or_default(),
            started_at: raw.started,
            origin: raw.params.origin.unwrap_or_default(),
            execution_state: raw.execution.unwrap_or_default(),
            creator_id: raw.creator_uuid.unwrap_or_default(),
            creator_name: String::new(),
        }
    }

    /// Display date for the report row, empty when the job never recorded a
    /// start instant.
    pub fn display_date(&self) -> String {
        self.started_at
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

/// A paged source of raw workflow jobs.
///
/// Implemented by the process-backed adapter in `source.rs` and by mocks in
/// tests. One call maps to one listing invocation.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetch one page of raw jobs starting at `offset`. An empty page is the
    /// expected shape past the end of the listing, not an error.
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Vec<RawJob>, SourceError>;
}

/// Resolves a creator identifier to a human-readable login.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Look up one identifier. Failures are scoped to that identifier only.
    async fn resolve(&self, id: &str) -> Result<String, ResolveError>;
}
