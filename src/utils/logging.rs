//! Plain-text transcript logging for `/log` and `--log`.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};

use crate::core::message::{Message, Role};

/// Local time as used in `## ...` markers.
pub fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string()
}

pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    /// A path given at startup starts logging immediately.
    pub fn new(log_file: Option<String>) -> Self {
        let is_active = log_file.is_some();
        LoggingState {
            file_path: log_file,
            is_active,
        }
    }

    pub fn set_log_file(&mut self, path: String) -> std::io::Result<String> {
        // Fail early if the file cannot be created or appended to.
        OpenOptions::new().create(true).append(true).open(&path)?;

        self.file_path = Some(path.clone());
        self.is_active = true;

        Ok(format!("Logging enabled to: {path}"))
    }

    /// [`set_log_file`](Self::set_log_file) followed by a
    /// `## Logging started at <time>` marker.
    pub fn start(&mut self, path: String) -> std::io::Result<String> {
        let status = self.set_log_file(path)?;
        self.log_marker(&format!("Logging started at {}", timestamp()))?;
        Ok(status)
    }

    pub fn toggle_logging(&mut self, pause_message: &str) -> Result<String, String> {
        match self.file_path.clone() {
            Some(path) => {
                if self.is_active {
                    self.log_marker(pause_message).map_err(|e| e.to_string())?;
                    self.is_active = false;
                    Ok(format!("Logging paused (file: {path})"))
                } else {
                    self.is_active = true;
                    Ok(format!("Logging resumed to: {path}"))
                }
            }
            None => {
                Err("No log file specified. Use /log <filename> to enable logging first.".into())
            }
        }
    }

    /// User entries get a `You: ` prefix, assistant entries are written as-is,
    /// and the system prompt is never logged.
    pub fn log_message(&self, message: &Message) -> std::io::Result<()> {
        match message.role {
            Role::User => self.write_to_log(&format!("You: {}", message.content)),
            Role::Assistant => self.write_to_log(&message.content),
            Role::System => Ok(()),
        }
    }

    /// Session events such as start or pause, written as `## <text>`.
    pub fn log_marker(&self, text: &str) -> std::io::Result<()> {
        self.write_to_log(&format!("## {text}"))
    }

    fn write_to_log(&self, content: &str) -> std::io::Result<()> {
        let Some(file_path) = self.file_path.as_ref().filter(|_| self.is_active) else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        // Blank line between entries.
        writeln!(writer)?;

        writer.flush()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}
