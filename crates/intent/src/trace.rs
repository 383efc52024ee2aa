//! Recorded input traces and their headless replay.
//!
//! A trace is a JSON document listing timestamped key, control, motion and
//! repaint events. Replay feeds them through a [`Session`] backed by a
//! [`RecordingSimulation`] and reports every command the engine would have
//! received, with the trace time it was dispatched at.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    Command, Control, GateConfig, GateState, MotionSample, RecordingSimulation, Repaint, Session,
};

/// Upper bound on generated repaint callbacks for one replay.
pub const MAX_SYNTHETIC_REPAINTS: u64 = 1_000_000;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse trace json at {json_path}: {source}")]
    Parse {
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("trace event {index} at {at_ms}ms is earlier than the previous event at {previous_ms}ms")]
    OutOfOrder {
        index: usize,
        at_ms: u64,
        previous_ms: u64,
    },
    #[error("repaint_every_ms must be greater than zero")]
    ZeroRepaintInterval,
    #[error("trace would generate {count} repaint callbacks (limit {limit})")]
    TooManyRepaints { count: u64, limit: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    Key { key: String },
    Control { control: Control },
    Motion { x: f32, y: f32 },
    Repaint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: TraceEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputTrace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repaint_every_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub events: Vec<TraceEntry>,
}

impl InputTrace {
    pub fn from_json_str(raw: &str) -> Result<Self, TraceError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize::<_, InputTrace>(&mut deserializer).map_err(|error| {
            let json_path = error.path().to_string();
            TraceError::Parse {
                json_path,
                source: error.into_inner(),
            }
        })
    }

    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let raw = fs::read_to_string(path).map_err(|source| TraceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn gate_config(&self) -> GateConfig {
        let defaults = GateConfig::default();
        GateConfig {
            tilt_threshold: self.threshold.unwrap_or(defaults.tilt_threshold),
            frame_interval: self
                .frame_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.frame_interval),
            ..defaults
        }
    }

    /// Explicit events merged with generated repaint callbacks, in replay order.
    ///
    /// Input events sort before a repaint callback sharing their timestamp.
    pub fn timeline(&self) -> Result<Vec<TraceEntry>, TraceError> {
        let mut previous_ms = 0u64;
        for (index, entry) in self.events.iter().enumerate() {
            if entry.at_ms < previous_ms {
                return Err(TraceError::OutOfOrder {
                    index,
                    at_ms: entry.at_ms,
                    previous_ms,
                });
            }
            previous_ms = entry.at_ms;
        }

        let mut timeline = self.events.clone();
        if let Some(every_ms) = self.repaint_every_ms {
            if every_ms == 0 {
                return Err(TraceError::ZeroRepaintInterval);
            }
            let end_ms = self.duration_ms.unwrap_or(previous_ms);
            let count = (end_ms / every_ms).saturating_add(1);
            if count > MAX_SYNTHETIC_REPAINTS {
                return Err(TraceError::TooManyRepaints {
                    count,
                    limit: MAX_SYNTHETIC_REPAINTS,
                });
            }
            timeline.extend((0..count).map(|step| TraceEntry {
                at_ms: step * every_ms,
                event: TraceEvent::Repaint,
            }));
        }

        timeline.sort_by_key(|entry| (entry.at_ms, matches!(entry.event, TraceEvent::Repaint)));
        Ok(timeline)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchRecord {
    pub at_ms: u64,
    pub command: Command,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplayReport {
    pub dispatched: Vec<DispatchRecord>,
    pub repaint_callbacks: u64,
    pub accepted_ticks: u64,
}

impl ReplayReport {
    pub fn commands(&self) -> Vec<Command> {
        self.dispatched.iter().map(|record| record.command).collect()
    }
}

pub fn replay(trace: &InputTrace) -> Result<ReplayReport, TraceError> {
    let timeline = trace.timeline()?;
    let base = Instant::now();
    let (mut session, _handle) =
        Session::with_simulation(trace.gate_config(), RecordingSimulation::default());

    let mut report = ReplayReport::default();
    collect_dispatched(&mut session, 0, &mut report);

    for entry in &timeline {
        match &entry.event {
            TraceEvent::Key { key } => {
                session.on_key(key);
            }
            TraceEvent::Control { control } => {
                session.on_control(*control);
            }
            TraceEvent::Motion { x, y } => {
                session.on_motion(MotionSample::new(*x, *y));
            }
            TraceEvent::Repaint => {
                report.repaint_callbacks += 1;
                let now = base + Duration::from_millis(entry.at_ms);
                if session.on_repaint(now) == Repaint::Continue(GateState::Due) {
                    report.accepted_ticks += 1;
                }
            }
        }
        collect_dispatched(&mut session, entry.at_ms, &mut report);
    }

    info!(
        events = timeline.len(),
        repaint_callbacks = report.repaint_callbacks,
        accepted_ticks = report.accepted_ticks,
        dispatched = report.dispatched.len(),
        "trace_replayed"
    );
    Ok(report)
}

fn collect_dispatched(
    session: &mut Session<RecordingSimulation>,
    at_ms: u64,
    report: &mut ReplayReport,
) {
    report.dispatched.extend(
        session
            .simulation_mut()
            .take_calls()
            .into_iter()
            .map(|command| DispatchRecord { at_ms, command }),
    );
}
