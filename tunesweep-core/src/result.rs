/// Endpoint-agnostic outcome of one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedResult {
    pub model: String,
    pub text: String,
}

impl NormalizedResult {
    pub fn new(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            text: text.into(),
        }
    }
}
