use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::info;

use crate::config::{DateWindow, ReportKind, RunConfig};
use crate::mailer::Mailer;
use crate::pipeline::run_report;
use crate::report;
use crate::resolve::CommandIdentityResolver;
use crate::source::{self, WorkflowJobSource};

/// CLI for workflow-reporter: report workflow jobs started over the trailing
/// N days, with creator identities resolved.
#[derive(Parser)]
#[clap(
    name = "workflow-reporter",
    version,
    about = "Report workflow jobs from the trailing N days, with creator names resolved"
)]
pub struct Cli {
    /// Number of trailing days to report on
    #[clap(short, long)]
    pub days: i64,

    /// Where the report goes
    #[clap(short = 'r', long, value_enum, default_value_t = ReportKind::Console)]
    pub report_type: ReportKind,

    /// SMTP relay host (email mode)
    #[clap(short = 'm', long)]
    pub mail_host: Option<String>,

    /// From address (email mode)
    #[clap(short = 'f', long)]
    pub mail_from: Option<String>,

    /// To address (email mode)
    #[clap(short = 't', long)]
    pub mail_to: Option<String>,

    /// Cap on concurrent creator lookups; unbounded when omitted
    #[clap(long)]
    pub resolve_limit: Option<usize>,
}

/// Extracted async CLI logic entrypoint for integration tests and main().
pub async fn run(cli: Cli) -> Result<()> {
    // Pre-flight validation: nothing is spawned before this succeeds.
    let config = RunConfig::new(
        cli.days,
        cli.report_type,
        cli.mail_host,
        cli.mail_from,
        cli.mail_to,
        cli.resolve_limit,
    )?;

    let window = DateWindow::trailing(config.days);
    info!(days = config.days, start = %window.start, end = %window.end, "Starting job report run");

    let job_source = WorkflowJobSource::new(config.tools.clone());
    let resolver = CommandIdentityResolver::new(config.tools.clone());
    let jobs = run_report(&job_source, &resolver, &window, config.resolve_limit)
        .await
        .map_err(|e| anyhow!("job collection failed: {e}"))?;

    match config.kind {
        ReportKind::Console => {
            println!("{}", report::render_console(&jobs, &window));
        }
        ReportKind::Email => {
            let mail = config
                .mail
                .ok_or_else(|| anyhow!("email report type requires mail parameters"))?;
            let html = report::render_email(&jobs, &window);
            let datacenter = source::datacenter_name(&config.tools)
                .await
                .map_err(|e| anyhow!("failed to read datacenter name: {e}"))?;
            let subject = format!("{datacenter} -- SDC Job Report");
            Mailer::new(mail, subject).send(html).await;
        }
    }

    Ok(())
}
