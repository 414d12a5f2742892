//! Paginated collection of workflow jobs from the listing source.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::contract::{JobRecord, JobSource, SourceError};

/// Fixed page size requested from the listing command.
pub const PAGE_LIMIT: u32 = 10;

/// Collect every job started strictly after `since`, in listing order.
///
/// One fetch is in flight at a time. The terminal page is the first one whose
/// RAW length falls below the requested limit: the listing contract only
/// guarantees that a short raw page means no further pages exist, so a full
/// page that the date filter empties out entirely still advances the offset.
pub async fn collect<S>(source: &S, since: DateTime<Utc>) -> Result<Vec<JobRecord>, SourceError>
where
    S: JobSource + ?Sized,
{
    let mut jobs = Vec::new();
    let mut offset = 0u32;

    loop {
        let raw_page = source.fetch_page(offset, PAGE_LIMIT).await?;
        let raw_len = raw_page.len();

        jobs.extend(
            raw_page
                .into_iter()
                .filter(|raw| raw.started.is_some_and(|s| s > since))
                .map(JobRecord::from_raw),
        );
        debug!(offset, raw = raw_len, kept = jobs.len(), "Collected job page");

        if (raw_len as u32) < PAGE_LIMIT {
            break;
        }
        offset += PAGE_LIMIT;
    }

    info!(count = jobs.len(), since = %since, "Job collection complete");
    Ok(jobs)
}
