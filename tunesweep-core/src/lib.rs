//! Core types for tunesweep: configuration, the knob schedule, the transport
//! seam and the append-only run log.

mod config;
mod error;
mod knob;
mod result;
mod run_log;
mod transport;

pub use config::{
    Endpoint, EndpointKind, ParsePolicy, SweepConfig, SweepConfigBuilder, DEFAULT_BATCH_COUNT,
    DEFAULT_CHAT_URL, DEFAULT_EDIT_INPUT, DEFAULT_EDIT_MODEL, DEFAULT_EDIT_URL, DEFAULT_KNOB,
    DEFAULT_KNOB_INCREMENT, DEFAULT_KNOB_MAX, DEFAULT_KNOB_MIN, DEFAULT_LOG_ROOT, DEFAULT_MODEL,
    DEFAULT_PROMPT, DEFAULT_ROLE, DEFAULT_TIMEOUT, DEFAULT_TITLE, MAX_BATCH_COUNT,
};
pub use error::SweepError;
pub use knob::{
    KnobRange, KnobSchedule, KnobValue, KNOWN_KNOBS, MAX_KNOB_MAGNITUDE, MAX_KNOB_STEPS,
};
pub use result::NormalizedResult;
pub use run_log::{FileLogWriter, LogEntry, LogTarget, LogWriter, SEPARATOR};
pub use transport::{PreparedRequest, RawResponse, Transport};
