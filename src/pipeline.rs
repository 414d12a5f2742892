//! High-level pipeline: collect → enrich, a strictly linear two-stage chain
//! handed to a rendering or delivery collaborator by the CLI.
//!
//! No stage begins before its predecessor fully completes: collection is
//! sequential-recursive over pages, enrichment is the sole source of
//! parallelism and joins every lookup before returning.

use tracing::info;

use crate::collect;
use crate::config::DateWindow;
use crate::contract::{IdentityResolver, JobRecord, JobSource, SourceError};
use crate::enrich;

/// Collect all jobs in the window, then resolve creator names, preserving
/// listing order end to end. Deterministic in output order given
/// deterministic external-process outputs.
pub async fn run_report<S, R>(
    source: &S,
    resolver: &R,
    window: &DateWindow,
    resolve_limit: Option<usize>,
) -> Result<Vec<JobRecord>, SourceError>
where
    S: JobSource + ?Sized,
    R: IdentityResolver + ?Sized,
{
    info!(start = %window.start, end = %window.end, "Starting collection stage");
    let jobs = collect::collect(source, window.start).await?;

    info!(jobs = jobs.len(), "Collection complete, starting enrichment stage");
    let jobs = enrich::enrich(jobs, resolver, resolve_limit).await;

    info!(jobs = jobs.len(), "Enrichment complete");
    Ok(jobs)
}
