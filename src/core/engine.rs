//! OSMOS Core Engine
//!
//! Builds the probe client, runs the pipeline over every target and
//! reports findings as they stream in.

use crate::core::context::Context;
use crate::http::client::ProbeClient;
use crate::reporting::model::Finding;
use crate::reporting::reporter::Reporter;
use crate::xss::pipeline::Pipeline;
use std::io::Write;
use tokio_util::sync::CancellationToken;

pub struct Engine {
    ctx: Context,
}

impl Engine {
    pub fn new(ctx: Context) -> anyhow::Result<Self> {
        Ok(Self { ctx })
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let mut stdout = std::io::stdout();
        self.run_to(&mut stdout).await
    }

    /// Run the scan, writing console lines and the report to `out`
    pub async fn run_to<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        if let Some(ref request) = self.ctx.raw_request {
            self.console(out, &format!("Request: {}", request))?;
            tracing::warn!("Raw request scanning is not supported, ignoring {}", request);
        }

        if self.ctx.targets.is_empty() {
            return Ok(());
        }

        tracing::info!(
            "Starting OSMOS scan: {} target(s), concurrency {}, timeout {:?}",
            self.ctx.targets.len(),
            self.ctx.pipeline.concurrency,
            self.ctx.policy.request_timeout
        );
        if self.ctx.verbose {
            tracing::debug!("Marker: {}", self.ctx.pipeline.marker);
            tracing::debug!("User-Agent: {}", self.ctx.policy.user_agent);
        }

        let cancel = CancellationToken::new();
        let client = ProbeClient::with_cancellation(self.ctx.policy.clone(), cancel.clone())?;
        let pipeline = Pipeline::new(client, self.ctx.pipeline.clone());

        let interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling in-flight probes");
                interrupt.cancel();
            }
        });

        for target in &self.ctx.targets {
            self.console(out, &format!("URL: {}", target))?;
        }

        let mut reporter = Reporter::new();
        let mut findings = pipeline.spawn(self.ctx.targets.iter().cloned());
        while let Some(finding) = findings.next().await {
            self.print_finding(out, &finding)?;
            reporter.add(finding);
        }

        if cancel.is_cancelled() {
            tracing::warn!("Scan cancelled, results are partial");
        }

        tracing::info!(
            "OSMOS scan completed: {} finding(s), {} confirmed parameter(s), {} probe failure(s)",
            reporter.findings().len(),
            reporter.confirmed().count(),
            reporter.error_count()
        );

        self.generate_report(out, &reporter)
    }

    /// JSON report goes to stdout, so nothing else may
    fn json_on_stdout(&self) -> bool {
        self.ctx.output_format == "json" && self.ctx.output_file.is_none()
    }

    fn console<W: Write>(&self, out: &mut W, line: &str) -> std::io::Result<()> {
        if self.json_on_stdout() {
            if !self.ctx.quiet {
                eprintln!("{}", line);
            }
            return Ok(());
        }
        writeln!(out, "{}", line)
    }

    fn print_finding<W: Write>(&self, out: &mut W, finding: &Finding) -> std::io::Result<()> {
        if finding.is_error() {
            if !self.ctx.quiet {
                eprintln!("{}", finding);
            }
            return Ok(());
        }
        self.console(out, &finding.to_string())
    }

    fn generate_report<W: Write>(&self, out: &mut W, reporter: &Reporter) -> anyhow::Result<()> {
        let findings = reporter.findings();

        match self.ctx.output_format.as_str() {
            "json" => {
                let json = crate::reporting::json::render(findings)?;

                if let Some(ref output_file) = self.ctx.output_file {
                    std::fs::write(output_file, &json)?;
                    writeln!(out, "\n📄 Report saved to: {}", output_file)?;
                } else {
                    writeln!(out, "{}", json)?;
                }
            }
            _ => {
                if let Some(ref output_file) = self.ctx.output_file {
                    let text_report = crate::reporting::text::render_string(findings);
                    std::fs::write(output_file, text_report)?;
                    writeln!(out, "\n📄 Full report saved to: {}", output_file)?;
                } else if self.ctx.verbose {
                    write!(out, "{}", crate::reporting::text::render_string(findings))?;
                }
            }
        }

        Ok(())
    }
}
