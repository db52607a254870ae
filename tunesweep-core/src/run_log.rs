use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::knob::KnobValue;
use crate::SweepError;

/// Rule printed above each entry and between its header and the response.
pub const SEPARATOR: &str = "_______________________________________";

/// One append-only log file: `<title>/<knob>/<NN>-api-log_<knob>.txt`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LogTarget {
    title: String,
    knob: String,
    batch_prefix: String,
}

impl LogTarget {
    pub fn new(title: impl Into<String>, knob: impl Into<String>, batch: u32) -> Self {
        Self {
            title: title.into(),
            knob: knob.into(),
            batch_prefix: format!("{batch:02}"),
        }
    }

    pub fn batch_prefix(&self) -> &str {
        &self.batch_prefix
    }

    pub fn file_name(&self) -> String {
        format!("{}-api-log_{}.txt", self.batch_prefix, self.knob)
    }

    /// Path below the log root.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.title)
            .join(&self.knob)
            .join(self.file_name())
    }
}

/// Everything one sweep iteration records.
#[derive(Clone, Debug)]
pub struct LogEntry<'a> {
    pub prompt: &'a str,
    pub knob_name: &'a str,
    pub knob_value: KnobValue,
    pub endpoint_url: &'a str,
    pub model: &'a str,
    pub role: &'a str,
    pub text: &'a str,
}

impl LogEntry<'_> {
    /// The six blocks of an entry, in the order they are appended.
    pub fn blocks(&self) -> [String; 6] {
        [
            format!("{SEPARATOR}\nprompt: {}\n", self.prompt),
            format!("{}: {}\n", self.knob_name, self.knob_value),
            format!("endpoint: {}\n", self.endpoint_url),
            format!("model: {}\n", self.model),
            format!(
                "messages.role: {}\n\n\nobservations:\n{SEPARATOR}\n",
                self.role
            ),
            format!("\nresponse:\n\n{}\n\n\n\n", self.text),
        ]
    }

    pub fn render(&self) -> String {
        self.blocks().concat()
    }
}

pub trait LogWriter: Send + Sync {
    /// Appends `content` verbatim to the target, creating it if needed.
    fn append(&self, target: &LogTarget, content: &str) -> Result<(), SweepError>;
}

/// Writes each append straight to disk; no handle outlives a call.
#[derive(Clone, Debug)]
pub struct FileLogWriter {
    root: PathBuf,
}

impl FileLogWriter {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, target: &LogTarget) -> PathBuf {
        self.root.join(target.relative_path())
    }
}

impl LogWriter for FileLogWriter {
    fn append(&self, target: &LogTarget, content: &str) -> Result<(), SweepError> {
        let path = self.path_for(target);
        let write_error = |err: std::io::Error| SweepError::LogWrite {
            path: path.clone(),
            reason: err.to_string(),
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(write_error)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(write_error)?;
        file.write_all(content.as_bytes()).map_err(write_error)?;
        file.flush().map_err(write_error)?;
        Ok(())
    }
}
