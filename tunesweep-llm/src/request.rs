//! Request bodies for the chat completions and edits endpoints.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tunesweep_core::{Endpoint, KnobValue, PreparedRequest, SweepConfig, SweepError};

/// Request body for the chat completions endpoint
#[derive(Serialize, Debug, Clone)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    #[serde(flatten)]
    pub knob: KnobParam<'a>,
}

#[derive(Serialize, Debug, Clone)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Request body for the edits endpoint
#[derive(Serialize, Debug, Clone)]
pub struct EditRequest<'a> {
    pub model: &'a str,
    pub input: &'a str,
    pub instruction: &'a str,
    #[serde(flatten)]
    pub knob: KnobParam<'a>,
}

/// The swept parameter, serialized under its own name, e.g. `"temperature": 0.8`.
#[derive(Debug, Clone, Copy)]
pub struct KnobParam<'a> {
    pub name: &'a str,
    pub value: KnobValue,
}

impl Serialize for KnobParam<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.name, &self.value.rounded())?;
        map.end()
    }
}

/// Serializes the body for `value` against the configured endpoint.
pub fn request_body(config: &SweepConfig, value: KnobValue) -> Result<String, SweepError> {
    let knob = KnobParam {
        name: &config.knob().name,
        value,
    };
    let body = match config.endpoint() {
        Endpoint::Chat { .. } => serde_json::to_string(&ChatCompletionRequest {
            model: config.model(),
            messages: vec![ChatMessage {
                role: config.role(),
                content: config.prompt(),
            }],
            knob,
        })?,
        Endpoint::Edit { model, input, .. } => serde_json::to_string(&EditRequest {
            model,
            input,
            instruction: config.prompt(),
            knob,
        })?,
    };
    Ok(body)
}

/// Builds the POST request for one sweep coordinate.
pub fn build_request(
    config: &SweepConfig,
    value: KnobValue,
) -> Result<PreparedRequest, SweepError> {
    let body = request_body(config, value)?;
    Ok(PreparedRequest::new(
        config.endpoint().url(),
        body,
        config.api_key().clone(),
    ))
}
