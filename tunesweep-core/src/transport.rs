use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::SweepError;

/// A fully built POST request, ready to hand to a [`Transport`].
#[derive(Clone, Debug)]
pub struct PreparedRequest {
    pub url: String,
    pub body: String,
    api_key: SecretString,
}

impl PreparedRequest {
    pub fn new(url: impl Into<String>, body: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
            api_key,
        }
    }

    /// Header pairs sent with every request.
    pub fn headers(&self) -> [(&'static str, String); 2] {
        [
            (
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            ),
            ("Content-Type", "application/json".to_string()),
        ]
    }
}

/// Status and full body of a response. The body is kept regardless of status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and reads the whole body. Only connection-level
    /// failures are errors; any HTTP status comes back as a response.
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse, SweepError>;
}

