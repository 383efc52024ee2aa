mod coalescer;
mod command;
mod discrete;
mod dispatch;
mod gate;
mod metrics;
pub mod offline;
mod sampler;
mod session;
mod sim;
pub mod trace;

pub use coalescer::{CoalescedIntent, IntentCoalescer};
pub use command::{AxisIntent, Command, Direction, Horizontal, Vertical};
pub use discrete::{command_for_key, Control};
pub use dispatch::CommandDispatcher;
pub use gate::{FrameGate, GateState};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use sampler::{MotionSample, MotionSampler, SampleIntent};
pub use session::{
    GateConfig, LoopHandle, Repaint, Session, SessionError, SessionStatus,
    DEFAULT_FRAME_INTERVAL, DEFAULT_TILT_THRESHOLD,
};
pub use sim::{RecordingSimulation, Simulation};
pub use trace::{replay, InputTrace, ReplayReport, TraceError};
