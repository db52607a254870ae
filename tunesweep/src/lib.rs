//! Sweep one request parameter across a range against a text-generation
//! endpoint and append every response to per-batch log files.
//!
//! ```rust,no_run
//! use tunesweep::{FileLogWriter, HttpTransport, KnobRange, Sweep, SweepConfig, SweepReport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tunesweep::SweepError> {
//!     let config = SweepConfig::builder()
//!         .api_key("sk-...")
//!         .knob(KnobRange::new("top_p", 0.0, 1.0, 0.25))
//!         .batch_count(3)
//!         .build()?;
//!
//!     let transport = HttpTransport::from_config(&config)?;
//!     let writer = FileLogWriter::new(config.log_root());
//!     if let SweepReport::Completed(stats) = Sweep::new(config, transport, writer).run().await? {
//!         println!("{} responses logged", stats.entries);
//!     }
//!     Ok(())
//! }
//! ```
mod sweep;

pub use sweep::{plan, BatchPlan, Sweep, SweepReport, SweepStats};

pub use tunesweep_core::{
    Endpoint, EndpointKind, FileLogWriter, KnobRange, KnobSchedule, KnobValue, LogEntry,
    LogTarget, LogWriter, NormalizedResult, ParsePolicy, PreparedRequest, RawResponse,
    SweepConfig, SweepConfigBuilder, SweepError, Transport, DEFAULT_BATCH_COUNT, DEFAULT_KNOB,
    DEFAULT_KNOB_INCREMENT, DEFAULT_KNOB_MAX, DEFAULT_KNOB_MIN, DEFAULT_TIMEOUT, MAX_BATCH_COUNT,
};
pub use tunesweep_llm::{build_request, normalize, request_body, HttpTransport};
