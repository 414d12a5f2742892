use chrono::{Duration, TimeZone, Utc};
use workflow_reporter::config::DateWindow;
use workflow_reporter::contract::{MockIdentityResolver, MockJobSource, RawJob, RawJobParams};
use workflow_reporter::pipeline::run_report;
use workflow_reporter::report::render_console;

fn raw(name: &str, creator: Option<&str>, minutes_after_start: i64) -> RawJob {
    RawJob {
        name: name.to_string(),
        params: RawJobParams::default(),
        uuid: Some(format!("uuid-{name}")),
        execution: Some("succeeded".to_string()),
        creator_uuid: creator.map(str::to_string),
        started: Some(window().start + Duration::minutes(minutes_after_start)),
    }
}

fn window() -> DateWindow {
    let end = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    DateWindow {
        start: end - Duration::days(7),
        end,
    }
}

#[tokio::test]
async fn collects_enriches_and_preserves_order_end_to_end() {
    let mut source = MockJobSource::new();
    source.expect_fetch_page().times(1).returning(|_offset, _limit| {
        Ok(vec![
            raw("deploy", Some("u1"), 10),
            raw("backup", None, 20),
            raw("reboot", Some("u2"), 30),
            // Outside the window: filtered out before enrichment.
            raw("ancient", Some("u3"), -10),
        ])
    });

    let mut resolver = MockIdentityResolver::new();
    resolver.expect_resolve().times(2).returning(|id| match id {
        "u1" => Ok("alice".to_string()),
        "u2" => Ok("bob".to_string()),
        other => panic!("unexpected lookup for {other}"),
    });

    let w = window();
    let jobs = run_report(&source, &resolver, &w, None)
        .await
        .expect("pipeline should succeed");

    assert_eq!(
        jobs.iter().map(|j| j.name.as_str()).collect::<Vec<_>>(),
        vec!["deploy", "backup", "reboot"]
    );
    assert_eq!(jobs[0].creator_name, "alice");
    assert_eq!(jobs[1].creator_name, "");
    assert_eq!(jobs[2].creator_name, "bob");

    // creator_name is populated iff creator_id is non-empty.
    for job in &jobs {
        assert_eq!(job.creator_name.is_empty(), job.creator_id.is_empty());
    }

    // The enriched set renders straight into the report collaborator.
    let report = render_console(&jobs, &w);
    assert!(report.contains("alice"));
    assert!(report.contains("bob"));
}

#[tokio::test]
async fn collection_failure_terminates_the_run_before_enrichment() {
    let mut source = MockJobSource::new();
    source
        .expect_fetch_page()
        .times(1)
        .returning(|_offset, _limit| Err("listing output could not be parsed".into()));

    let mut resolver = MockIdentityResolver::new();
    resolver.expect_resolve().never();

    let result = run_report(&source, &resolver, &window(), None).await;
    assert!(result.is_err());
}
