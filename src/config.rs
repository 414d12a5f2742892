use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;
use tracing::{debug, info};

/// Where the finished report goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Print a plain-text table to stdout.
    Console,
    /// Render HTML and hand it to the SMTP relay.
    Email,
}

/// Delivery parameters for email mode.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub from: String,
    pub to: String,
}

/// Paths of the external tools the pipeline shells out to. Each one can be
/// overridden through the environment, which is also how the tests point the
/// adapter at fake executables.
#[derive(Debug, Clone)]
pub struct ToolPaths {
    /// Listing command; receives the `/jobs?limit=N&offset=M` argument.
    pub workflow_cmd: String,
    /// Flattening filter; reads the listing stream on stdin.
    pub flatten_cmd: String,
    pub flatten_args: Vec<String>,
    /// Per-identifier lookup command; invoked as `<cmd> get <id>`.
    pub lookup_cmd: String,
    /// Emits the datacenter-name object for the mail subject.
    pub sysinfo_cmd: String,
}

impl ToolPaths {
    pub fn from_env() -> Self {
        let paths = Self {
            workflow_cmd: env_or("WORKFLOW_REPORTER_WORKFLOW_CMD", "/opt/smartdc/bin/sdc-workflow"),
            flatten_cmd: env_or("WORKFLOW_REPORTER_FLATTEN_CMD", "json"),
            flatten_args: vec!["-gH".to_string()],
            lookup_cmd: env_or("WORKFLOW_REPORTER_LOOKUP_CMD", "sdc-useradm"),
            sysinfo_cmd: env_or("WORKFLOW_REPORTER_SYSINFO_CMD", "sysinfo"),
        };
        debug!(?paths, "Resolved external tool paths");
        paths
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

/// Fully validated run configuration. Constructing one is the pre-flight
/// check: nothing is spawned before this succeeds.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub days: i64,
    pub kind: ReportKind,
    pub mail: Option<MailConfig>,
    pub tools: ToolPaths,
    /// Cap on concurrent creator lookups; `None` leaves the fan-out unbounded.
    pub resolve_limit: Option<usize>,
}

impl RunConfig {
    pub fn new(
        days: i64,
        kind: ReportKind,
        mail_host: Option<String>,
        mail_from: Option<String>,
        mail_to: Option<String>,
        resolve_limit: Option<usize>,
    ) -> Result<Self> {
        if days < 1 {
            bail!("days must be greater than 0");
        }
        if resolve_limit == Some(0) {
            bail!("resolve-limit must be at least 1");
        }

        let mail = match kind {
            ReportKind::Console => None,
            ReportKind::Email => match (mail_host, mail_from, mail_to) {
                (Some(host), Some(from), Some(to)) => Some(MailConfig { host, from, to }),
                _ => bail!("must supply mail host, from, and to for the email report type"),
            },
        };

        let config = Self {
            days,
            kind,
            mail,
            tools: ToolPaths::from_env(),
            resolve_limit,
        };
        info!(
            days = config.days,
            kind = ?config.kind,
            resolve_limit = ?config.resolve_limit,
            "Run configuration validated"
        );
        Ok(config)
    }
}

/// The reporting window, computed once per run and read-only thereafter.
#[derive(Debug, Clone, Copy)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Window covering the trailing `days` days, ending now.
    pub fn trailing(days: i64) -> Self {
        let end = Utc::now();
        Self {
            start: end - Duration::days(days),
            end,
        }
    }
}
