//! Process-backed job source: chains the listing command into the flattening
//! filter and parses the filter's output into raw job objects.
//!
//! Two children are spawned and reaped per page. The listing command's stdout
//! is pumped into the filter's stdin; both handles are awaited on every exit
//! path, including the malformed-output one, before any error propagates.

use std::process::Stdio;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::config::ToolPaths;
use crate::contract::{JobSource, RawJob, SourceError};

/// Job source backed by the workflow listing command.
pub struct WorkflowJobSource {
    tools: ToolPaths,
}

impl WorkflowJobSource {
    pub fn new(tools: ToolPaths) -> Self {
        Self { tools }
    }

    fn listing_query(offset: u32, limit: u32) -> String {
        format!("/jobs?limit={limit}&offset={offset}")
    }
}

#[async_trait::async_trait]
impl JobSource for WorkflowJobSource {
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Vec<RawJob>, SourceError> {
        let query = Self::listing_query(offset, limit);
        debug!(cmd = %self.tools.workflow_cmd, query = %query, "Spawning listing command");

        let mut listing = Command::new(&self.tools.workflow_cmd)
            .arg(&query)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("failed to spawn {}: {e}", self.tools.workflow_cmd))?;

        let mut flatten = match Command::new(&self.tools.flatten_cmd)
            .args(&self.tools.flatten_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                // The listing child is already running; reap it before
                // propagating, per the module contract.
                listing.kill().await.ok();
                return Err(format!("failed to spawn {}: {e}", self.tools.flatten_cmd).into());
            }
        };

        // Pump the listing stdout into the filter stdin, then close it so the
        // filter sees end-of-input.
        let (mut listing_out, mut flatten_in) =
            match (listing.stdout.take(), flatten.stdin.take()) {
                (Some(out), Some(input)) => (out, input),
                _ => {
                    listing.kill().await.ok();
                    flatten.kill().await.ok();
                    return Err("child pipe handles were not captured".into());
                }
            };
        let pump = tokio::spawn(async move {
            let mut buf = Vec::new();
            listing_out.read_to_end(&mut buf).await?;
            flatten_in.write_all(&buf).await?;
            flatten_in.shutdown().await?;
            Ok::<_, std::io::Error>(())
        });

        // Reap both children before propagating anything.
        let output = flatten.wait_with_output().await;
        let pump_result = pump.await;
        let listing_status = listing.wait().await;

        let output = output.map_err(|e| format!("flatten command failed: {e}"))?;
        pump_result.map_err(|e| format!("stream pump panicked: {e}"))??;
        let listing_status = listing_status?;
        if !listing_status.success() {
            warn!(status = ?listing_status.code(), offset, "Listing command exited non-zero");
        }

        let stdout = String::from_utf8(output.stdout)?;
        let stdout = stdout.trim();
        if stdout.is_empty() {
            debug!(offset, "Listing returned an empty page");
            return Ok(Vec::new());
        }

        let jobs: Vec<RawJob> = serde_json::from_str(stdout).map_err(|e| {
            error!(error = %e, offset, "Malformed flatten output; aborting run");
            e
        })?;
        info!(count = jobs.len(), offset, "Fetched raw job page");
        Ok(jobs)
    }
}

/// Reads the datacenter name from the sysinfo command, used to label the
/// mail subject line.
pub async fn datacenter_name(tools: &ToolPaths) -> Result<String, SourceError> {
    debug!(cmd = %tools.sysinfo_cmd, "Spawning sysinfo command");
    let output = Command::new(&tools.sysinfo_cmd)
        .output()
        .await
        .map_err(|e| format!("failed to spawn {}: {e}", tools.sysinfo_cmd))?;

    let stdout = String::from_utf8(output.stdout)?;
    let value: serde_json::Value = serde_json::from_str(stdout.trim())?;
    let name = value
        .get("Datacenter Name")
        .and_then(|v| v.as_str())
        .ok_or("sysinfo output missing \"Datacenter Name\"")?;
    Ok(name.to_string())
}
