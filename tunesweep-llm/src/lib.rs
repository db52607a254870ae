mod http;

// Wire formats for the chat completions and edits endpoints
pub mod request;
pub mod response;

pub use http::HttpTransport;
pub use tunesweep_core::{Endpoint, KnobValue, NormalizedResult, PreparedRequest, RawResponse};

pub use request::{build_request, request_body, ChatCompletionRequest, EditRequest, KnobParam};
pub use response::{normalize, ChatCompletionResponse, EditResponse, Usage};
