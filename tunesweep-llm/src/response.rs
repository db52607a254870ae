//! Response schemas and their reduction to a [`NormalizedResult`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tunesweep_core::{Endpoint, EndpointKind, NormalizedResult, RawResponse, SweepError};

/// Non-streaming response from chat completions
#[derive(Deserialize, Debug, Clone)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Response from the edits endpoint. It carries no usable model name.
#[derive(Deserialize, Debug, Clone)]
pub struct EditResponse {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: u64,
    pub choices: Vec<EditChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EditChoice {
    pub text: String,
    #[serde(default)]
    pub index: u32,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// OpenAI-style error response
#[derive(Deserialize, Debug, Clone)]
pub struct OpenAiError {
    pub error: ErrorDetail,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<serde_json::Value>,
}

/// Parses `response` with the schema of `endpoint` and extracts model and text.
///
/// The body is parsed whatever the HTTP status was. An empty `choices` array
/// is a parse failure.
pub fn normalize(
    endpoint: &Endpoint,
    response: &RawResponse,
) -> Result<NormalizedResult, SweepError> {
    let kind = endpoint.kind();
    tracing::debug!(
        endpoint = %kind,
        status = response.status,
        body = %response.body,
        "raw response"
    );

    match endpoint {
        Endpoint::Chat { .. } => {
            let parsed: ChatCompletionResponse = parse(kind, response)?;
            log_usage(kind, parsed.usage.as_ref());
            let choice = parsed
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| no_choices(kind, response))?;
            Ok(NormalizedResult::new(
                parsed.model,
                choice.message.content.unwrap_or_default(),
            ))
        }
        Endpoint::Edit { model, .. } => {
            let parsed: EditResponse = parse(kind, response)?;
            log_usage(kind, parsed.usage.as_ref());
            let choice = parsed
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| no_choices(kind, response))?;
            Ok(NormalizedResult::new(model.clone(), choice.text))
        }
    }
}

fn parse<T: DeserializeOwned>(kind: EndpointKind, response: &RawResponse) -> Result<T, SweepError> {
    serde_json::from_str(&response.body).map_err(|err| {
        let reason = match serde_json::from_str::<OpenAiError>(&response.body) {
            Ok(api_error) => format!("api error: {}", api_error.error.message),
            Err(_) => err.to_string(),
        };
        SweepError::Parse {
            endpoint: kind.as_str(),
            status: response.status,
            reason,
        }
    })
}

fn no_choices(kind: EndpointKind, response: &RawResponse) -> SweepError {
    SweepError::Parse {
        endpoint: kind.as_str(),
        status: response.status,
        reason: "response contained no choices".to_string(),
    }
}

fn log_usage(kind: EndpointKind, usage: Option<&Usage>) {
    if let Some(usage) = usage {
        tracing::debug!(
            endpoint = %kind,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "token usage"
        );
    }
}
