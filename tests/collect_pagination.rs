use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use workflow_reporter::collect::{collect, PAGE_LIMIT};
use workflow_reporter::contract::{MockJobSource, RawJob, RawJobParams};

fn raw(name: &str, started: Option<DateTime<Utc>>) -> RawJob {
    RawJob {
        name: name.to_string(),
        params: RawJobParams {
            subtask: None,
            origin: Some("api".to_string()),
        },
        uuid: Some(format!("uuid-{name}")),
        execution: Some("succeeded".to_string()),
        creator_uuid: None,
        started,
    }
}

fn threshold() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn stops_on_short_raw_page_after_three_fetches() {
    let since = threshold();
    let offsets = Arc::new(Mutex::new(Vec::new()));
    let seen = offsets.clone();

    let mut source = MockJobSource::new();
    source.expect_fetch_page().times(3).returning(move |offset, limit| {
        assert_eq!(limit, PAGE_LIMIT);
        seen.lock().unwrap().push(offset);
        let count = match offset {
            0 | 10 => 10,
            20 => 7,
            other => panic!("unexpected offset {other}"),
        };
        Ok((0..count)
            .map(|i| {
                raw(
                    &format!("job-{offset}-{i}"),
                    Some(threshold() + Duration::minutes(1)),
                )
            })
            .collect())
    });

    let jobs = collect(&source, since).await.expect("collection should succeed");

    // Pages of raw sizes [10, 10, 7] at limit 10: exactly three requests.
    assert_eq!(*offsets.lock().unwrap(), vec![0, 10, 20]);
    assert_eq!(jobs.len(), 27);
    // Listing order is preserved across concatenated pages.
    assert_eq!(jobs[0].name, "job-0-0");
    assert_eq!(jobs[10].name, "job-10-0");
    assert_eq!(jobs[26].name, "job-20-6");
}

#[tokio::test]
async fn fully_filtered_full_page_still_advances_the_offset() {
    let since = threshold();
    let mut source = MockJobSource::new();

    // First page: ten raw jobs, all too old. A short filtered page must NOT
    // be mistaken for the terminal page while the raw page is full.
    source.expect_fetch_page().times(2).returning(move |offset, _limit| {
        let page = match offset {
            0 => (0..10)
                .map(|i| raw(&format!("old-{i}"), Some(threshold() - Duration::hours(1))))
                .collect(),
            10 => vec![
                raw("fresh-a", Some(threshold() + Duration::minutes(5))),
                raw("fresh-b", Some(threshold() + Duration::minutes(6))),
            ],
            other => panic!("unexpected offset {other}"),
        };
        Ok(page)
    });

    let jobs = collect(&source, since).await.unwrap();
    assert_eq!(
        jobs.iter().map(|j| j.name.as_str()).collect::<Vec<_>>(),
        vec!["fresh-a", "fresh-b"]
    );
}

#[tokio::test]
async fn threshold_filter_is_strictly_greater_than() {
    let since = threshold();
    let mut source = MockJobSource::new();

    source.expect_fetch_page().times(1).returning(move |_offset, _limit| {
        Ok(vec![
            raw("at-threshold", Some(threshold())),
            raw("just-after", Some(threshold() + Duration::milliseconds(1))),
            raw("never-started", None),
        ])
    });

    let jobs = collect(&source, since).await.unwrap();
    // Exactly-at-threshold and never-started jobs are excluded.
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].name, "just-after");
}

#[tokio::test]
async fn empty_first_page_yields_empty_result() {
    let since = threshold();
    let mut source = MockJobSource::new();
    source
        .expect_fetch_page()
        .times(1)
        .returning(|_offset, _limit| Ok(Vec::new()));

    let jobs = collect(&source, since).await.unwrap();
    assert!(jobs.is_empty());
}

#[tokio::test]
async fn fetch_failure_aborts_the_run() {
    let since = threshold();
    let mut source = MockJobSource::new();
    source
        .expect_fetch_page()
        .times(1)
        .returning(|_offset, _limit| Err("malformed flatten output".into()));

    let result = collect(&source, since).await;
    assert!(result.is_err());
}
