use tracing::Instrument;
use tunesweep_core::{
    KnobValue, LogEntry, LogTarget, LogWriter, ParsePolicy, PreparedRequest, SweepConfig,
    SweepError, Transport,
};
use tunesweep_llm::{build_request, normalize};

/// One log file and the knob values that will be appended to it.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchPlan {
    pub batch: u32,
    pub target: LogTarget,
    pub values: Vec<KnobValue>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Requests that came back with a response.
    pub requests: usize,
    /// Entries whose six blocks were appended (some may have failed).
    pub entries: usize,
    /// Knob values dropped under [`ParsePolicy::Skip`].
    pub skipped: usize,
    pub failed_writes: usize,
}

#[derive(Debug)]
pub enum SweepReport {
    /// Dry run: the first request was built and nothing was sent or written.
    DryRun { request: PreparedRequest },
    Completed(SweepStats),
}

/// The full schedule of a sweep, without any I/O.
pub fn plan(config: &SweepConfig) -> Vec<BatchPlan> {
    let knob = config.knob();
    (1..=config.batch_count())
        .map(|batch| BatchPlan {
            batch,
            target: LogTarget::new(config.title(), &knob.name, batch),
            values: knob.schedule().collect(),
        })
        .collect()
}

/// Runs a configured sweep: batches × knob values, one request each,
/// strictly in order.
pub struct Sweep<T, W> {
    config: SweepConfig,
    transport: T,
    log_writer: W,
}

impl<T, W> Sweep<T, W>
where
    T: Transport,
    W: LogWriter,
{
    pub fn new(config: SweepConfig, transport: T, log_writer: W) -> Self {
        Self {
            config,
            transport,
            log_writer,
        }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn log_writer(&self) -> &W {
        &self.log_writer
    }

    pub fn plan(&self) -> Vec<BatchPlan> {
        plan(&self.config)
    }

    /// Transport errors always end the run. Parse errors end it under
    /// [`ParsePolicy::Abort`]. Log write errors are reported and counted.
    pub async fn run(&self) -> Result<SweepReport, SweepError> {
        let mut stats = SweepStats::default();
        for batch in self.plan() {
            let span = tracing::info_span!(
                "sweep_batch",
                batch = %batch.target.batch_prefix(),
                knob = %self.config.knob().name,
                values = batch.values.len(),
            );
            if let Some(request) = self.run_batch(&batch, &mut stats).instrument(span).await? {
                return Ok(SweepReport::DryRun { request });
            }
        }

        tracing::info!(
            requests = stats.requests,
            entries = stats.entries,
            skipped = stats.skipped,
            failed_writes = stats.failed_writes,
            "sweep finished"
        );
        Ok(SweepReport::Completed(stats))
    }

    /// Returns the built request instead of sending it when dry-run is on.
    async fn run_batch(
        &self,
        batch: &BatchPlan,
        stats: &mut SweepStats,
    ) -> Result<Option<PreparedRequest>, SweepError> {
        let endpoint = self.config.endpoint();

        for &value in &batch.values {
            let request = build_request(&self.config, value)?;
            if self.config.dry_run() {
                tracing::info!(value = %value, url = %request.url, "dry run, request not sent");
                return Ok(Some(request));
            }

            let response = self
                .transport
                .send(&request)
                .instrument(tracing::info_span!("sweep_request", value = %value))
                .await?;
            stats.requests += 1;
            if !response.is_success() {
                tracing::warn!(
                    value = %value,
                    status = response.status,
                    "endpoint returned a non-success status"
                );
            }

            let result = match normalize(endpoint, &response) {
                Ok(result) => result,
                Err(err) if err.is_fatal() || self.config.parse_policy() == ParsePolicy::Abort => {
                    return Err(err)
                }
                Err(err) => {
                    tracing::error!(value = %value, error = %err, "skipping knob value");
                    stats.skipped += 1;
                    continue;
                }
            };

            let entry = LogEntry {
                prompt: self.config.prompt(),
                knob_name: &self.config.knob().name,
                knob_value: value,
                endpoint_url: endpoint.url(),
                model: &result.model,
                role: self.config.role(),
                text: &result.text,
            };
            for block in entry.blocks() {
                if let Err(err) = self.log_writer.append(&batch.target, &block) {
                    tracing::error!(error = %err, "failed to append log block");
                    stats.failed_writes += 1;
                }
            }
            stats.entries += 1;
            tracing::info!(value = %value, model = %result.model, "response logged");
        }

        Ok(None)
    }
}
