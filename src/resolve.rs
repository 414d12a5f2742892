//! Identity lookup through the external user-admin command.

use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::config::ToolPaths;
use crate::contract::{IdentityResolver, ResolveError};

#[derive(Debug, Deserialize)]
struct LookupReply {
    login: String,
}

/// Resolver backed by the per-identifier lookup command
/// (`sdc-useradm get <id>` by default).
pub struct CommandIdentityResolver {
    tools: ToolPaths,
}

impl CommandIdentityResolver {
    pub fn new(tools: ToolPaths) -> Self {
        Self { tools }
    }
}

#[async_trait::async_trait]
impl IdentityResolver for CommandIdentityResolver {
    async fn resolve(&self, id: &str) -> Result<String, ResolveError> {
        debug!(cmd = %self.tools.lookup_cmd, id, "Spawning identity lookup");
        let output = Command::new(&self.tools.lookup_cmd)
            .arg("get")
            .arg(id)
            .output()
            .await
            .map_err(|e| format!("failed to spawn {}: {e}", self.tools.lookup_cmd))?;

        let stdout = String::from_utf8(output.stdout)?;
        let reply: LookupReply = serde_json::from_str(stdout.trim())
            .map_err(|e| format!("malformed lookup output for {id}: {e}"))?;
        Ok(reply.login)
    }
}
