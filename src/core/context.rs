//! Global context for scan execution

use crate::cli::args::Cli;
use crate::http::client::ProbePolicy;
use crate::payload::markers::{MarkerSource, RANDOM_MARKER_LEN};
use crate::xss::pipeline::{FilteredPolicy, PipelineConfig};
use std::time::Duration;

pub struct Context {
    pub targets: Vec<String>,
    /// Raw request file, accepted but never parsed
    pub raw_request: Option<String>,
    pub policy: ProbePolicy,
    pub pipeline: PipelineConfig,
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: String,
    pub output_file: Option<String>,
}

impl Context {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let mut targets: Vec<String> = cli
            .urls
            .iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();

        if let Some(ref path) = cli.list {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Cannot read target list {}: {}", path.display(), e))?;
            targets.extend(parse_target_list(&content));
        }

        if targets.is_empty() && cli.request.is_none() {
            anyhow::bail!("No target given: use --url, --list or --request");
        }

        if cli.concurrency == 0 {
            anyhow::bail!("--concurrency must be at least 1");
        }

        if cli.timeout == 0 {
            anyhow::bail!("--timeout must be at least 1 second");
        }

        if cli.connect_timeout == 0 {
            anyhow::bail!("--connect-timeout must be at least 1 second");
        }

        let mut policy = ProbePolicy {
            connect_timeout: Duration::from_secs(cli.connect_timeout),
            request_timeout: Duration::from_secs(cli.timeout),
            ..ProbePolicy::default()
        };
        if let Some(ua) = cli.user_agent {
            policy.user_agent = ua;
        }

        let marker = if cli.random_marker {
            MarkerSource::global().marker(RANDOM_MARKER_LEN)
        } else {
            cli.marker.unwrap_or_else(|| PipelineConfig::default().marker)
        };
        if marker.is_empty() {
            anyhow::bail!("--marker must not be empty");
        }

        let pipeline = PipelineConfig {
            concurrency: cli.concurrency,
            marker,
            filtered_policy: if cli.report_filtered {
                FilteredPolicy::Report
            } else {
                FilteredPolicy::Drop
            },
            channel_capacity: cli.concurrency,
        };

        Ok(Self {
            targets,
            raw_request: cli.request,
            policy,
            pipeline,
            quiet: cli.quiet,
            verbose: cli.verbose,
            output_format: cli.format,
            output_file: cli.output,
        })
    }
}

/// One URL per line; blank lines and `#` comments are skipped
pub fn parse_target_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}
