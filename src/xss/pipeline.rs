//! Staged concurrent pipeline
//!
//! ```text
//! targets -> [reflection x N] -> [marker x N] -> [chars x N] -> drain
//!                  \                  \               \
//!                   +------------------+---------------+--> findings
//! ```
//!
//! Every stage is a fixed pool of workers sharing one input receiver. Each
//! worker owns a clone of the stage's output sender, so the output closes
//! once the last worker has drained its input and returned. Closing the
//! target feed therefore ripples through to the finding stream.

use crate::http::client::ProbeClient;
use crate::payload::markers::DEFAULT_MARKER;
use crate::reporting::model::Finding;
use crate::xss::check::ParamCheck;
use crate::xss::stages::{CharacterSurvival, InitialReflection, MarkerConfirmation, Stage};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// What to do with a parameter whose naive reflection is not confirmed by the marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilteredPolicy {
    /// Drop silently as a false positive
    #[default]
    Drop,
    /// Emit a `ReflectedButFiltered` finding
    Report,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Workers per stage
    pub concurrency: usize,
    pub marker: String,
    pub filtered_policy: FilteredPolicy,
    /// Buffer size of the hand-off channels between stages
    pub channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 40,
            marker: DEFAULT_MARKER.to_string(),
            filtered_policy: FilteredPolicy::Drop,
            channel_capacity: 40,
        }
    }
}

/// Start `width` workers running `stage` over `input`.
///
/// The returned receiver yields what the workers forward and closes when
/// all of them have finished. Workers stop reading early when `cancel`
/// fires.
pub fn spawn_pool<S: Stage>(
    stage: Arc<S>,
    width: usize,
    input: mpsc::Receiver<ParamCheck>,
    capacity: usize,
    cancel: CancellationToken,
) -> mpsc::Receiver<ParamCheck> {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let input = Arc::new(Mutex::new(input));

    for worker in 0..width.max(1) {
        let stage = stage.clone();
        let input = input.clone();
        let tx = tx.clone();
        let cancel = cancel.clone();

        tokio::spawn(async move {
            loop {
                let next = {
                    let mut rx = input.lock().await;
                    tokio::select! {
                        _ = cancel.cancelled() => None,
                        item = rx.recv() => item,
                    }
                };

                let Some(item) = next else {
                    break;
                };

                stage.process(item, &tx).await;
            }
            tracing::trace!("[{}] worker {} done", stage.name(), worker);
        });
    }

    rx
}

/// Stream of findings produced by a running pipeline.
///
/// Ends once the last stage has drained and closed.
pub struct Findings {
    rx: mpsc::UnboundedReceiver<Finding>,
}

impl Findings {
    pub async fn next(&mut self) -> Option<Finding> {
        self.rx.recv().await
    }

    pub async fn collect(mut self) -> Vec<Finding> {
        let mut out = Vec::new();
        while let Some(f) = self.rx.recv().await {
            out.push(f);
        }
        out
    }
}

pub struct Pipeline {
    client: ProbeClient,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(client: ProbeClient, config: PipelineConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Abort in-flight probes; the finding stream still closes normally
    pub fn cancel(&self) {
        self.client.cancellation().cancel();
    }

    /// Feed `targets` into the pipeline and return the finding stream.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<I>(&self, targets: I) -> Findings
    where
        I: IntoIterator<Item = String>,
    {
        let width = self.config.concurrency.max(1);
        let capacity = self.config.channel_capacity;
        let cancel = self.client.cancellation().clone();

        let (findings_tx, findings_rx) = mpsc::unbounded_channel();
        let (input_tx, input_rx) = mpsc::channel::<ParamCheck>(capacity.max(1));

        let reflection = Arc::new(InitialReflection::new(
            self.client.clone(),
            findings_tx.clone(),
        ));
        let marker = Arc::new(MarkerConfirmation::new(
            self.client.clone(),
            findings_tx.clone(),
            self.config.marker.clone(),
            self.config.filtered_policy,
        ));
        let chars = Arc::new(CharacterSurvival::new(
            self.client.clone(),
            findings_tx.clone(),
        ));

        let reflected = spawn_pool(reflection, width, input_rx, capacity, cancel.clone());
        let confirmed = spawn_pool(marker, width, reflected, capacity, cancel.clone());
        let mut reported = spawn_pool(chars, width, confirmed, capacity, cancel.clone());

        let targets: Vec<String> = targets.into_iter().collect();
        tracing::info!(
            "Pipeline started: {} target(s), {} workers per stage",
            targets.len(),
            width
        );

        tokio::spawn(async move {
            for url in targets {
                let item = ParamCheck::new(url);
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    sent = input_tx.send(item) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
            // input_tx dropped here, closing the first stage
        });

        // Holding a sink clone keeps the finding stream open until the
        // last stage is drained, not just until its workers exit.
        tokio::spawn(async move {
            let mut count = 0usize;
            while let Some(item) = reported.recv().await {
                count += 1;
                tracing::trace!("reported {} param {}", item.url, item.param);
            }
            tracing::debug!("Pipeline drained: {} parameter(s) fully probed", count);
            drop(findings_tx);
        });

        Findings { rx: findings_rx }
    }

    /// Run a single target to completion
    pub async fn run(&self, target: &str) -> Vec<Finding> {
        self.spawn([target.to_string()]).collect().await
    }
}
