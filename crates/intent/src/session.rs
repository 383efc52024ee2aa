use std::error::Error as StdError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::discrete::command_for_key;
use crate::metrics::MetricsAccumulator;
use crate::{
    Command, CommandDispatcher, Control, Direction, FrameGate, GateState, IntentCoalescer,
    MetricsHandle, MotionSample, MotionSampler, SampleIntent, Simulation,
};

pub const DEFAULT_TILT_THRESHOLD: f32 = 2.0;
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub tilt_threshold: f32,
    pub frame_interval: Duration,
    pub metrics_log_interval: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            tilt_threshold: DEFAULT_TILT_THRESHOLD,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            metrics_log_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("simulation engine is unavailable: {0}")]
    SimulationUnavailable(#[source] Box<dyn StdError + Send + Sync>),
}

/// What a host shows the user about the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Initializing,
    Running,
    NotRunning { reason: String },
}

impl SessionStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, SessionStatus::Running)
    }

    pub fn message(&self) -> String {
        match self {
            SessionStatus::Initializing => "Initialize".to_string(),
            SessionStatus::Running => "Game is running".to_string(),
            SessionStatus::NotRunning { reason } => format!("Not running: {reason}"),
        }
    }
}

/// Cancellation handle for the repaint loop. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    cancelled: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            debug!("repaint_loop_cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Answer to a repaint callback: keep requesting callbacks, or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repaint {
    Continue(GateState),
    Stop,
}

/// The coalescing loop: owns the latch, the frame clock and the dispatcher.
///
/// Every entry point runs to completion and takes `&mut self`, so the sampler's
/// writes and the gate's drain can never interleave.
pub struct Session<S> {
    sampler: MotionSampler,
    coalescer: IntentCoalescer,
    gate: FrameGate,
    dispatcher: CommandDispatcher<S>,
    metrics: MetricsAccumulator,
    metrics_handle: MetricsHandle,
    handle: LoopHandle,
    accepted_ticks: u64,
}

impl<S: Simulation> Session<S> {
    /// Loads the simulation engine and issues `Initialize` before any tick can run.
    pub fn start<F, E>(config: GateConfig, load: F) -> Result<(Self, LoopHandle), SessionError>
    where
        F: FnOnce() -> Result<S, E>,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        let simulation = load().map_err(|err| SessionError::SimulationUnavailable(err.into()))?;
        Ok(Self::with_simulation(config, simulation))
    }

    pub fn with_simulation(config: GateConfig, simulation: S) -> (Self, LoopHandle) {
        let handle = LoopHandle::default();
        let mut session = Self {
            sampler: MotionSampler::new(config.tilt_threshold),
            coalescer: IntentCoalescer::default(),
            gate: FrameGate::new(config.frame_interval),
            dispatcher: CommandDispatcher::new(simulation),
            metrics: MetricsAccumulator::new(config.metrics_log_interval),
            metrics_handle: MetricsHandle::default(),
            handle: handle.clone(),
            accepted_ticks: 0,
        };
        session.dispatcher.dispatch(Command::Initialize);
        info!(
            tilt_threshold = session.sampler.threshold(),
            frame_interval_ms = config.frame_interval.as_millis() as u64,
            "session_started"
        );
        (session, handle)
    }

    /// Key press: dispatched immediately when the key is mapped.
    pub fn on_key(&mut self, key: &str) -> Option<Command> {
        let command = command_for_key(key)?;
        self.dispatch_discrete(command);
        Some(command)
    }

    /// Pointer activation of an on-screen control: dispatched immediately.
    pub fn on_control(&mut self, control: Control) -> Command {
        let command = control.command();
        self.dispatch_discrete(command);
        command
    }

    /// Continuous motion sample: only updates the latch.
    pub fn on_motion(&mut self, sample: MotionSample) -> SampleIntent {
        self.metrics.record_sample();
        self.sampler.apply(sample, &mut self.coalescer)
    }

    /// Repaint callback. The host requests the next callback only on `Continue`.
    pub fn on_repaint(&mut self, now: Instant) -> Repaint {
        if self.handle.is_cancelled() {
            return Repaint::Stop;
        }
        self.metrics.record_repaint();

        let state = match self.gate.try_tick(now, &mut self.coalescer) {
            None => GateState::Waiting,
            Some(intent) => {
                trace!(
                    vertical = ?Direction::from(intent.vertical),
                    horizontal = ?Direction::from(intent.horizontal),
                    "tick_accepted"
                );
                for command in intent.tick_commands() {
                    self.dispatcher.dispatch(command);
                }
                self.accepted_ticks = self.accepted_ticks.saturating_add(1);
                self.metrics.record_tick();
                GateState::Due
            }
        };

        if let Some(snapshot) = self.metrics.maybe_snapshot(now) {
            self.metrics_handle.publish(snapshot);
            debug!(
                repaints_per_sec = snapshot.repaints_per_sec,
                ticks_per_sec = snapshot.ticks_per_sec,
                samples_per_sec = snapshot.samples_per_sec,
                discrete_per_sec = snapshot.discrete_per_sec,
                "loop_metrics"
            );
        }

        Repaint::Continue(state)
    }

    pub fn gate_state(&self, now: Instant) -> GateState {
        self.gate.state(now)
    }

    pub fn accepted_ticks(&self) -> u64 {
        self.accepted_ticks
    }

    pub fn loop_handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn metrics_handle(&self) -> MetricsHandle {
        self.metrics_handle.clone()
    }

    pub fn simulation(&self) -> &S {
        self.dispatcher.simulation()
    }

    pub fn simulation_mut(&mut self) -> &mut S {
        self.dispatcher.simulation_mut()
    }

    fn dispatch_discrete(&mut self, command: Command) {
        self.metrics.record_discrete();
        self.dispatcher.dispatch(command);
    }
}
