use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tunesweep::{
    EndpointKind, KnobRange, ParsePolicy, SweepConfig, SweepError, DEFAULT_KNOB,
    DEFAULT_KNOB_INCREMENT, DEFAULT_KNOB_MAX, DEFAULT_KNOB_MIN,
};

use crate::cli::SweepArgs;

/// Fallback credential variable when neither the flag nor the file sets one.
const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Contents of a YAML settings file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    pub api_key: Option<String>,
    pub dry_run: Option<bool>,
    pub endpoint: Option<Selector>,
    pub chat_url: Option<String>,
    pub edit_url: Option<String>,
    pub prompt: Option<String>,
    pub model: Option<String>,
    pub role: Option<String>,
    pub edit_model: Option<String>,
    pub edit_input: Option<String>,
    pub knob: KnobSettings,
    pub batches: Option<u32>,
    pub title: Option<String>,
    pub log_root: Option<PathBuf>,
    pub on_parse_error: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KnobSettings {
    pub name: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub increment: Option<f64>,
}

/// `endpoint: 1` and `endpoint: chat` are both accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Selector {
    Number(u64),
    Name(String),
}

impl Selector {
    fn parse(&self) -> Result<EndpointKind, SweepError> {
        match self {
            Selector::Number(number) => number.to_string().parse(),
            Selector::Name(name) => name.parse(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }

    /// Loads the file named by `--config` (if any) and layers the flags on top.
    pub fn resolve(args: &SweepArgs) -> anyhow::Result<Self> {
        let settings = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(settings.with_overrides(args))
    }

    pub fn with_overrides(mut self, args: &SweepArgs) -> Self {
        fn set<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                slot.clone_from(value);
            }
        }

        set(&mut self.api_key, &args.api_key);
        if args.dry_run {
            self.dry_run = Some(true);
        }
        if let Some(endpoint) = &args.endpoint {
            self.endpoint = Some(Selector::Name(endpoint.clone()));
        }
        set(&mut self.knob.name, &args.knob);
        set(&mut self.knob.min, &args.min);
        set(&mut self.knob.max, &args.max);
        set(&mut self.knob.increment, &args.increment);
        set(&mut self.batches, &args.batches);
        set(&mut self.prompt, &args.prompt);
        set(&mut self.model, &args.model);
        set(&mut self.title, &args.title);
        set(&mut self.log_root, &args.log_root);
        set(&mut self.on_parse_error, &args.on_parse_error);
        set(&mut self.timeout_secs, &args.timeout_secs);
        self
    }

    pub fn into_config(self) -> Result<SweepConfig, SweepError> {
        self.into_config_with_env(|name| std::env::var(name).ok())
    }

    fn into_config_with_env(
        self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<SweepConfig, SweepError> {
        let mut builder = SweepConfig::builder();

        if let Some(api_key) = self.api_key.or_else(|| env(OPENAI_API_KEY_VAR)) {
            builder = builder.api_key(api_key);
        }
        if let Some(dry_run) = self.dry_run {
            builder = builder.dry_run(dry_run);
        }
        if let Some(selector) = &self.endpoint {
            builder = builder.endpoint(selector.parse()?);
        }
        if let Some(url) = self.chat_url {
            builder = builder.chat_url(url);
        }
        if let Some(url) = self.edit_url {
            builder = builder.edit_url(url);
        }
        if let Some(prompt) = self.prompt {
            builder = builder.prompt(prompt);
        }
        if let Some(model) = self.model {
            builder = builder.model(model);
        }
        if let Some(role) = self.role {
            builder = builder.role(role);
        }
        if let Some(edit_model) = self.edit_model {
            builder = builder.edit_model(edit_model);
        }
        if let Some(edit_input) = self.edit_input {
            builder = builder.edit_input(edit_input);
        }

        builder = builder.knob(KnobRange::new(
            self.knob.name.unwrap_or_else(|| DEFAULT_KNOB.to_string()),
            self.knob.min.unwrap_or(DEFAULT_KNOB_MIN),
            self.knob.max.unwrap_or(DEFAULT_KNOB_MAX),
            self.knob.increment.unwrap_or(DEFAULT_KNOB_INCREMENT),
        ));

        if let Some(batches) = self.batches {
            builder = builder.batch_count(batches);
        }
        if let Some(title) = self.title {
            builder = builder.title(title);
        }
        if let Some(log_root) = self.log_root {
            builder = builder.log_root(log_root);
        }
        if let Some(policy) = self.on_parse_error {
            builder = builder.parse_policy(policy.parse::<ParsePolicy>()?);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }
}
