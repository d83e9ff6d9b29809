//! Structured event journal, appended as JSON lines.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "event")]
pub enum LiveEvent {
    Birth {
        id: Uuid,
        species: String,
        tick: u64,
        timestamp: String,
    },
    Death {
        id: Uuid,
        species: String,
        #[serde(default)]
        cause: String,
        tick: u64,
        timestamp: String,
    },
    Depleted {
        id: Uuid,
        species: String,
        tick: u64,
        timestamp: String,
    },
    SeasonChanged {
        from: String,
        to: String,
        tick: u64,
        timestamp: String,
    },
    WeatherChanged {
        from: String,
        to: String,
        tick: u64,
        timestamp: String,
    },
    Extinction {
        tick: u64,
        timestamp: String,
    },
}

pub fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

pub struct HistoryLogger {
    live_file: Option<BufWriter<File>>,
    log_dir: String,
}

impl Default for HistoryLogger {
    fn default() -> Self {
        Self::new_dummy()
    }
}

impl HistoryLogger {
    pub fn new_at(dir: &str) -> anyhow::Result<Self> {
        if !std::path::Path::new(dir).exists() {
            std::fs::create_dir_all(dir)?;
        }
        let file_path = format!("{}/live.jsonl", dir);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        Ok(Self {
            live_file: Some(BufWriter::new(file)),
            log_dir: dir.to_string(),
        })
    }

    /// A logger that drops everything. Used by tests and headless tooling.
    pub fn new_dummy() -> Self {
        Self {
            live_file: None,
            log_dir: String::new(),
        }
    }

    pub fn log_event(&mut self, event: &LiveEvent) -> anyhow::Result<()> {
        if let Some(ref mut file) = self.live_file {
            let json = serde_json::to_string(event)?;
            writeln!(file, "{}", json)?;
            file.flush()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn log_dir(&self) -> &str {
        &self.log_dir
    }
}
