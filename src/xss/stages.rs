//! The three pipeline stages
//!
//! Each stage takes one `ParamCheck`, probes the target and forwards refined
//! work downstream. Findings go to a shared sink as soon as they are known.
//! Failures only drop the item at hand.

use crate::errors::ProbeError;
use crate::http::client::ProbeClient;
use crate::payload::markers::{wrap_probe, SPECIAL_CHARS};
use crate::reporting::model::Finding;
use crate::xss::append::check_append;
use crate::xss::check::ParamCheck;
use crate::xss::pipeline::FilteredPolicy;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub type FindingSink = mpsc::UnboundedSender<Finding>;

#[async_trait]
pub trait Stage: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Handle one item, sending zero or more items to `out`
    async fn process(&self, item: ParamCheck, out: &mpsc::Sender<ParamCheck>);
}

async fn forward(out: &mpsc::Sender<ParamCheck>, item: ParamCheck) {
    if out.send(item).await.is_err() {
        tracing::debug!("downstream stage closed, item dropped");
    }
}

fn report_failure(sink: &FindingSink, stage: &str, item: &ParamCheck, err: &ProbeError) {
    if err.is_cancelled() {
        tracing::debug!("[{}] {} cancelled", stage, item.url);
        return;
    }

    if item.has_param() {
        tracing::debug!("[{}] {} param {}: {}", stage, item.url, item.param, err);
    } else {
        tracing::debug!("[{}] {}: {}", stage, item.url, err);
    }

    let _ = sink.send(Finding::ProbeFailed {
        url: item.url.clone(),
        param: item.has_param().then(|| item.param.clone()),
        error: err.to_string(),
    });
}

// ==============================
// STAGE A: INITIAL REFLECTION
// ==============================

pub struct InitialReflection {
    client: ProbeClient,
    findings: FindingSink,
}

impl InitialReflection {
    pub fn new(client: ProbeClient, findings: FindingSink) -> Self {
        Self { client, findings }
    }
}

#[async_trait]
impl Stage for InitialReflection {
    fn name(&self) -> &'static str {
        "reflection"
    }

    async fn process(&self, item: ParamCheck, out: &mpsc::Sender<ParamCheck>) {
        let reflected = match crate::xss::reflect::detect_reflected(&self.client, &item.url).await {
            Ok(r) => r,
            Err(e) => {
                report_failure(&self.findings, self.name(), &item, &e);
                return;
            }
        };

        if reflected.is_empty() {
            tracing::info!("No reflection detected on {}", item.url);
            let _ = self.findings.send(Finding::NoReflection { url: item.url });
            return;
        }

        tracing::info!("{} reflected parameter(s) on {}: {:?}", reflected.len(), item.url, reflected);

        for param in reflected {
            let _ = self.findings.send(Finding::ReflectedParameter {
                url: item.url.clone(),
                param: param.clone(),
            });
            forward(out, ParamCheck::with_param(item.url.clone(), param)).await;
        }
    }
}

// ==============================
// STAGE B: MARKER CONFIRMATION
// ==============================

pub struct MarkerConfirmation {
    client: ProbeClient,
    findings: FindingSink,
    marker: String,
    policy: FilteredPolicy,
}

impl MarkerConfirmation {
    pub fn new(
        client: ProbeClient,
        findings: FindingSink,
        marker: String,
        policy: FilteredPolicy,
    ) -> Self {
        Self {
            client,
            findings,
            marker,
            policy,
        }
    }
}

#[async_trait]
impl Stage for MarkerConfirmation {
    fn name(&self) -> &'static str {
        "marker"
    }

    async fn process(&self, item: ParamCheck, out: &mpsc::Sender<ParamCheck>) {
        match check_append(&self.client, &item.url, &item.param, &self.marker).await {
            Ok(true) => {
                tracing::debug!("marker confirmed for {} on {}", item.param, item.url);
                forward(out, item).await;
            }
            Ok(false) => {
                tracing::debug!("marker not reflected for {} on {}", item.param, item.url);
                if self.policy == FilteredPolicy::Report {
                    let _ = self.findings.send(Finding::ReflectedButFiltered {
                        url: item.url,
                        param: item.param,
                    });
                }
            }
            Err(e) => report_failure(&self.findings, self.name(), &item, &e),
        }
    }
}

// ==============================
// STAGE C: CHARACTER SURVIVAL
// ==============================

pub struct CharacterSurvival {
    client: ProbeClient,
    findings: FindingSink,
}

impl CharacterSurvival {
    pub fn new(client: ProbeClient, findings: FindingSink) -> Self {
        Self { client, findings }
    }
}

#[async_trait]
impl Stage for CharacterSurvival {
    fn name(&self) -> &'static str {
        "chars"
    }

    async fn process(&self, item: ParamCheck, out: &mpsc::Sender<ParamCheck>) {
        let mut survived: Vec<String> = Vec::new();

        for ch in SPECIAL_CHARS {
            match check_append(&self.client, &item.url, &item.param, &wrap_probe(ch)).await {
                Ok(true) => survived.push(ch.to_string()),
                Ok(false) => {}
                Err(e) if e.is_cancelled() => {
                    tracing::debug!("[{}] {} param {} cancelled", self.name(), item.url, item.param);
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        "[{}] {} param {} char {}: {}",
                        self.name(),
                        item.url,
                        item.param,
                        ch,
                        e
                    );
                }
            }
        }

        tracing::info!("{} on {}: unfiltered {:?}", item.param, item.url, survived);

        let _ = self.findings.send(Finding::UnfilteredChars {
            url: item.url.clone(),
            param: item.param.clone(),
            chars: survived,
        });
        forward(out, item).await;
    }
}
