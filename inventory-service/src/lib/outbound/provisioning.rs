use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::ProvisioningConfig;
use crate::inventory::errors::ProvisioningError;
use crate::inventory::models::CopiedMedia;
use crate::inventory::ports::ProvisioningClient;

/// Port the xCAT daemon listens on when the configured server omits one.
const DEFAULT_XCATD_PORT: u16 = 3001;

/// copycds announces each media tree it fills with this prefix, followed by
/// `<install dir>/<basename>/<arch>`.
const COPY_TARGET_PREFIX: &str = "Copying media to ";

/// Provisioning client that drives the xCAT command line tools.
///
/// Commands run on this host; `XCATHOST` points them at the configured
/// management node.
pub struct XcatClient {
    copycds_command: String,
    xcat_host: Option<String>,
}

impl XcatClient {
    pub fn new(config: &ProvisioningConfig) -> Self {
        Self {
            copycds_command: config.copycds_command.clone(),
            xcat_host: config.xcat_server.as_deref().map(xcat_host),
        }
    }

    async fn run(&self, program: &str, args: &[String]) -> Result<Vec<String>, ProvisioningError> {
        tracing::debug!(command = program, args = ?args, "Executing provisioning command");

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(host) = &self.xcat_host {
            cmd.env("XCATHOST", host);
        }

        let output = cmd.output().await.map_err(|e| ProvisioningError::Spawn {
            command: program.to_string(),
            reason: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(
                command = program,
                status = %output.status,
                stderr = %stderr,
                "Provisioning command failed"
            );
            return Err(ProvisioningError::CommandFailed {
                command: program.to_string(),
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[async_trait]
impl ProvisioningClient for XcatClient {
    async fn copy_installation_media(
        &self,
        paths: &[String],
    ) -> Result<Vec<CopiedMedia>, ProvisioningError> {
        let output = self.run(&self.copycds_command, paths).await?;
        let copied = parse_copied_media(&output);

        if copied.is_empty() {
            return Err(ProvisioningError::UnrecognizedOutput {
                command: self.copycds_command.clone(),
                output: output.join("; "),
            });
        }

        Ok(copied)
    }
}

fn parse_copied_media(lines: &[String]) -> Vec<CopiedMedia> {
    lines
        .iter()
        .filter_map(|line| line.strip_prefix(COPY_TARGET_PREFIX))
        .filter_map(|target| {
            let directory = target.trim().trim_end_matches('/');
            let mut components = directory.rsplit('/');
            let arch = components.next().filter(|s| !s.is_empty())?;
            let basename = components.next().filter(|s| !s.is_empty())?;

            Some(CopiedMedia {
                basename: basename.to_string(),
                arch: arch.to_string(),
                directory: directory.to_string(),
            })
        })
        .collect()
}

fn xcat_host(server: &str) -> String {
    if server.contains(':') {
        server.to_string()
    } else {
        format!("{}:{}", server, DEFAULT_XCATD_PORT)
    }
}
