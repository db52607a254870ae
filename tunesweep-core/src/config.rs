use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::knob::{KnobRange, KNOWN_KNOBS};
use crate::SweepError;

pub const DEFAULT_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_EDIT_URL: &str = "https://api.openai.com/v1/edits";
pub const DEFAULT_PROMPT: &str = "write me a hello world program in go";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_ROLE: &str = "user";
pub const DEFAULT_EDIT_MODEL: &str = "code-davinci-edit-001";
/// A deliberately mis-indented serverless manifest for the edit instruction to fix.
pub const DEFAULT_EDIT_INPUT: &str = "service: my-service\n provider:\n     name: aws\n     runtime: nodejs12.x\nregion: us-east-1\n     resources:\n      Resources:\n    PromptsTable:\n           Type: AWS::DynamoDB::Table\n          Properties:\n                 TableName: prompts\n              AttributeDefinitions:\n- AttributeName: id\n                     AttributeType: S\n              StreamSpecification:\nStreamViewType: NEW_AND_OLD_IMAGES\n              KeySchema:\n                  - AttributeName: id\n             KeyType: HASH\n                 BillingMode: PAY_PER_REQUEST";
pub const DEFAULT_KNOB: &str = "temperature";
pub const DEFAULT_KNOB_MIN: f64 = 0.6;
pub const DEFAULT_KNOB_MAX: f64 = 1.0;
pub const DEFAULT_KNOB_INCREMENT: f64 = 0.2;
pub const DEFAULT_TITLE: &str = "hello-world-program";
pub const DEFAULT_LOG_ROOT: &str = "logs";
pub const DEFAULT_BATCH_COUNT: u32 = 2;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Batch prefixes are two digits wide.
pub const MAX_BATCH_COUNT: u32 = 99;

/// Which remote API shape a sweep targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EndpointKind {
    #[default]
    Chat,
    Edit,
}

impl EndpointKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EndpointKind::Chat => "chat",
            EndpointKind::Edit => "edit",
        }
    }
}

impl FromStr for EndpointKind {
    type Err = SweepError;

    /// Accepts the numeric selectors (`1`, `2`) as well as names.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "chat" | "chat-completions" | "chat_completions" => Ok(EndpointKind::Chat),
            "2" | "edit" | "edits" => Ok(EndpointKind::Edit),
            other => Err(SweepError::config(format!(
                "unknown endpoint selector '{other}' (expected 1/chat or 2/edit)"
            ))),
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The selected endpoint together with the data only that endpoint needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Chat {
        url: String,
    },
    Edit {
        url: String,
        model: String,
        input: String,
    },
}

impl Endpoint {
    pub fn kind(&self) -> EndpointKind {
        match self {
            Endpoint::Chat { .. } => EndpointKind::Chat,
            Endpoint::Edit { .. } => EndpointKind::Edit,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Endpoint::Chat { url } | Endpoint::Edit { url, .. } => url,
        }
    }
}

/// What the sweep does with a response that does not match its schema.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Stop the run and return the error.
    #[default]
    Abort,
    /// Report the error, leave no log block for that knob value, keep going.
    Skip,
}

impl FromStr for ParsePolicy {
    type Err = SweepError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(ParsePolicy::Abort),
            "skip" => Ok(ParsePolicy::Skip),
            other => Err(SweepError::config(format!(
                "unknown parse policy '{other}' (expected abort or skip)"
            ))),
        }
    }
}

/// Immutable description of one sweep run.
#[derive(Clone, Debug)]
pub struct SweepConfig {
    api_key: SecretString,
    dry_run: bool,
    endpoint: Endpoint,
    prompt: String,
    model: String,
    role: String,
    knob: KnobRange,
    batch_count: u32,
    title: String,
    log_root: PathBuf,
    timeout: Duration,
    parse_policy: ParsePolicy,
}

impl SweepConfig {
    pub fn builder() -> SweepConfigBuilder {
        SweepConfigBuilder::new()
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn knob(&self) -> &KnobRange {
        &self.knob
    }

    pub fn batch_count(&self) -> u32 {
        self.batch_count
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn log_root(&self) -> &Path {
        &self.log_root
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn parse_policy(&self) -> ParsePolicy {
        self.parse_policy
    }
}

#[derive(Clone, Debug)]
pub struct SweepConfigBuilder {
    api_key: Option<SecretString>,
    dry_run: bool,
    endpoint: EndpointKind,
    chat_url: String,
    edit_url: String,
    edit_model: String,
    edit_input: String,
    prompt: String,
    model: String,
    role: String,
    knob: KnobRange,
    batch_count: u32,
    title: String,
    log_root: PathBuf,
    timeout: Duration,
    parse_policy: ParsePolicy,
}

impl Default for SweepConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepConfigBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            dry_run: false,
            endpoint: EndpointKind::Chat,
            chat_url: DEFAULT_CHAT_URL.to_string(),
            edit_url: DEFAULT_EDIT_URL.to_string(),
            edit_model: DEFAULT_EDIT_MODEL.to_string(),
            edit_input: DEFAULT_EDIT_INPUT.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            role: DEFAULT_ROLE.to_string(),
            knob: KnobRange::new(
                DEFAULT_KNOB,
                DEFAULT_KNOB_MIN,
                DEFAULT_KNOB_MAX,
                DEFAULT_KNOB_INCREMENT,
            ),
            batch_count: DEFAULT_BATCH_COUNT,
            title: DEFAULT_TITLE.to_string(),
            log_root: PathBuf::from(DEFAULT_LOG_ROOT),
            timeout: DEFAULT_TIMEOUT,
            parse_policy: ParsePolicy::Abort,
        }
    }

    /// Blank keys are treated as missing.
    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.api_key = if value.trim().is_empty() {
            None
        } else {
            Some(SecretString::new(value))
        };
        self
    }

    pub fn dry_run(mut self, value: bool) -> Self {
        self.dry_run = value;
        self
    }

    pub fn endpoint(mut self, value: EndpointKind) -> Self {
        self.endpoint = value;
        self
    }

    pub fn chat_url(mut self, value: impl Into<String>) -> Self {
        self.chat_url = value.into();
        self
    }

    pub fn edit_url(mut self, value: impl Into<String>) -> Self {
        self.edit_url = value.into();
        self
    }

    pub fn edit_model(mut self, value: impl Into<String>) -> Self {
        self.edit_model = value.into();
        self
    }

    pub fn edit_input(mut self, value: impl Into<String>) -> Self {
        self.edit_input = value.into();
        self
    }

    pub fn prompt(mut self, value: impl Into<String>) -> Self {
        self.prompt = value.into();
        self
    }

    pub fn model(mut self, value: impl Into<String>) -> Self {
        self.model = value.into();
        self
    }

    pub fn role(mut self, value: impl Into<String>) -> Self {
        self.role = value.into();
        self
    }

    pub fn knob(mut self, value: KnobRange) -> Self {
        self.knob = value;
        self
    }

    pub fn batch_count(mut self, value: u32) -> Self {
        self.batch_count = value;
        self
    }

    pub fn title(mut self, value: impl Into<String>) -> Self {
        self.title = value.into();
        self
    }

    pub fn log_root(mut self, value: impl Into<PathBuf>) -> Self {
        self.log_root = value.into();
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = value;
        self
    }

    pub fn parse_policy(mut self, value: ParsePolicy) -> Self {
        self.parse_policy = value;
        self
    }

    pub fn build(self) -> Result<SweepConfig, SweepError> {
        let api_key = match (self.api_key, self.dry_run) {
            (Some(key), _) => key,
            (None, true) => SecretString::new(String::new()),
            (None, false) => return Err(SweepError::config("api key is required")),
        };

        require_path_component("knob name", &self.knob.name)?;
        require_path_component("title", &self.title)?;
        self.knob.validate()?;
        if !KNOWN_KNOBS.contains(&self.knob.name.as_str()) {
            tracing::warn!(
                knob = %self.knob.name,
                "knob is not one of {:?}; the endpoint may reject it",
                KNOWN_KNOBS
            );
        }

        if self.batch_count == 0 || self.batch_count > MAX_BATCH_COUNT {
            return Err(SweepError::config(format!(
                "batch count must be between 1 and {MAX_BATCH_COUNT}, got {}",
                self.batch_count
            )));
        }
        if self.timeout.is_zero() {
            return Err(SweepError::config("timeout must be greater than zero"));
        }

        let endpoint = match self.endpoint {
            EndpointKind::Chat => {
                if self.model.trim().is_empty() {
                    return Err(SweepError::config("model cannot be empty"));
                }
                Endpoint::Chat {
                    url: require_url(&self.chat_url)?,
                }
            }
            EndpointKind::Edit => {
                if self.edit_model.trim().is_empty() {
                    return Err(SweepError::config("edit model cannot be empty"));
                }
                Endpoint::Edit {
                    url: require_url(&self.edit_url)?,
                    model: self.edit_model,
                    input: self.edit_input,
                }
            }
        };

        Ok(SweepConfig {
            api_key,
            dry_run: self.dry_run,
            endpoint,
            prompt: self.prompt,
            model: self.model,
            role: self.role,
            knob: self.knob,
            batch_count: self.batch_count,
            title: self.title,
            log_root: self.log_root,
            timeout: self.timeout,
            parse_policy: self.parse_policy,
        })
    }
}

fn require_path_component(field: &str, value: &str) -> Result<(), SweepError> {
    if value.trim().is_empty() {
        return Err(SweepError::config(format!("{field} cannot be empty")));
    }
    if value == "." || value == ".." || value.contains(['/', '\\']) {
        return Err(SweepError::config(format!(
            "{field} '{value}' must be a single path component"
        )));
    }
    Ok(())
}

fn require_url(value: &str) -> Result<String, SweepError> {
    if value.trim().is_empty() {
        return Err(SweepError::config("endpoint url cannot be empty"));
    }
    Url::parse(value)
        .map_err(|err| SweepError::config(format!("invalid endpoint url '{value}': {err}")))?;
    Ok(value.to_string())
}
