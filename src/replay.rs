//! JSONL trace recording and replay.
//!
//! A trace is the host-event stream the controller would have seen live:
//! one header line followed by event and key-message lines. The replay
//! runner feeds a trace through a fresh controller backed by a
//! [`SimulatedHost`] and reports the commands the controller issued, which
//! makes recorded misbehavior reproducible off-browser.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::control::{ControlMessage, TabEventController};
use crate::host::{HostCommand, HostEvent, SimulatedHost, TabHost};
use crate::keys::KeyMessage;

pub const TRACE_SCHEMA_VERSION: u32 = 1;

/// One recorded line of input to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEntry {
    Event { event: HostEvent },
    Keys { message: KeyMessage },
}

/// On-disk JSONL line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TraceJsonlLine {
    Header { schema_version: u32 },
    Entry { entry: TraceEntry },
}

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("could not read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("trace line {line} is malformed: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode trace: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("trace is missing its header line")]
    MissingHeader,

    #[error("unsupported trace schema version {0}")]
    UnsupportedSchema(u32),
}

/// A recorded host-event stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTrace {
    pub entries: Vec<TraceEntry>,
}

impl EventTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_event(&mut self, event: HostEvent) {
        self.entries.push(TraceEntry::Event { event });
    }

    pub fn push_keys(&mut self, message: KeyMessage) {
        self.entries.push(TraceEntry::Keys { message });
    }

    /// Reads a JSONL trace file. The header must appear before any entry.
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut entries = Vec::new();
        let mut header_seen = false;

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let parsed: TraceJsonlLine = serde_json::from_str(&line)
                .map_err(|source| TraceError::Malformed {
                    line: number + 1,
                    source,
                })?;

            match parsed {
                TraceJsonlLine::Header { schema_version } => {
                    if schema_version > TRACE_SCHEMA_VERSION {
                        return Err(TraceError::UnsupportedSchema(schema_version));
                    }
                    header_seen = true;
                }
                TraceJsonlLine::Entry { entry } => {
                    if !header_seen {
                        return Err(TraceError::MissingHeader);
                    }
                    entries.push(entry);
                }
            }
        }

        if !header_seen {
            return Err(TraceError::MissingHeader);
        }

        Ok(Self { entries })
    }

    /// Writes the trace as JSONL, header first.
    pub fn save(&self, path: &Path) -> Result<(), TraceError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let header = TraceJsonlLine::Header {
            schema_version: TRACE_SCHEMA_VERSION,
        };
        writeln!(writer, "{}", serde_json::to_string(&header)?)?;

        for entry in &self.entries {
            let line = TraceJsonlLine::Entry {
                entry: entry.clone(),
            };
            writeln!(writer, "{}", serde_json::to_string(&line)?)?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// Outcome of replaying a trace.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    /// Commands the controller issued, in order.
    pub commands: Vec<HostCommand>,
    /// Number of host events replayed.
    pub events: usize,
}

/// Replays a trace through a fresh controller and simulated host.
///
/// Each event is applied to the simulated browser model first, the way the
/// real browser had already acted before notifying the extension, then
/// handed to the controller. After the last entry the runner waits out the
/// debounce window so timer-dependent behavior settles.
pub async fn replay(trace: &EventTrace, settings: Settings) -> ReplayReport {
    let settle = Duration::from_millis(settings.active_changed_timeout_ms + 50);

    let host = Arc::new(SimulatedHost::new());
    let dyn_host: Arc<dyn TabHost> = host.clone();
    let mut controller = TabEventController::new(settings, dyn_host);

    let mut events = 0;
    for entry in &trace.entries {
        match entry {
            TraceEntry::Event { event } => {
                host.apply_event(event);
                controller
                    .handle_message(ControlMessage::Host(event.clone()))
                    .await;
                controller.drain_ready().await;
                events += 1;
            }
            TraceEntry::Keys { message } => {
                controller
                    .handle_message(ControlMessage::Key(*message))
                    .await;
            }
        }
    }

    // Let outstanding lookups and the debounce timer finish.
    tokio::time::sleep(settle).await;
    controller.drain_ready().await;

    ReplayReport {
        commands: host.take_commands(),
        events,
    }
}
