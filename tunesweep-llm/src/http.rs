use std::time::Duration;

use reqwest::Client;
use tunesweep_core::{PreparedRequest, RawResponse, SweepConfig, SweepError, Transport};

/// [`Transport`] backed by a reqwest client with a request timeout.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, SweepError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SweepError::Transport(err.to_string()))?;
        Ok(Self { http })
    }

    pub fn from_config(config: &SweepConfig) -> Result<Self, SweepError> {
        Self::new(config.timeout())
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse, SweepError> {
        let mut builder = self.http.post(&request.url).body(request.body.clone());
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| SweepError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| SweepError::Transport(err.to_string()))?;

        Ok(RawResponse::new(status, body))
    }
}
