//! Concurrent creator-name enrichment: fan out one lookup per job, join all,
//! write results back by original index.

use futures::future;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::contract::{IdentityResolver, JobRecord};

/// Resolve creator names for every job that carries a creator id.
///
/// All lookups run concurrently, bounded by `limit` when one is given. Each
/// task owns its `(index, creator_id)` pair and results are written back
/// index-addressed after the join, so the output order always equals the
/// input order regardless of completion order. A failed lookup leaves that
/// one job's creator name empty and never affects the others.
pub async fn enrich<R>(mut jobs: Vec<JobRecord>, resolver: &R, limit: Option<usize>) -> Vec<JobRecord>
where
    R: IdentityResolver + ?Sized,
{
    let lookups: Vec<(usize, String)> = jobs
        .iter()
        .enumerate()
        .filter(|(_, job)| !job.creator_id.is_empty())
        .map(|(idx, job)| (idx, job.creator_id.clone()))
        .collect();

    if lookups.is_empty() {
        return jobs;
    }
    debug!(pending = lookups.len(), limit = ?limit, "Starting creator lookups");

    let tasks: Vec<_> = lookups
        .into_iter()
        .map(|(idx, id)| async move {
            match resolver.resolve(&id).await {
                Ok(login) => (idx, Some(login)),
                Err(e) => {
                    warn!(creator = %id, error = %e, "Creator lookup failed; leaving name empty");
                    (idx, None)
                }
            }
        })
        .collect();

    let resolved: Vec<(usize, Option<String>)> = match limit {
        // A zero cap would never make progress; treat it as one.
        Some(cap) => stream::iter(tasks).buffer_unordered(cap.max(1)).collect().await,
        None => future::join_all(tasks).await,
    };

    for (idx, login) in resolved {
        if let Some(login) = login {
            jobs[idx].creator_name = login;
        }
    }
    jobs
}
