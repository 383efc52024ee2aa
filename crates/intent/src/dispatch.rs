use tracing::{trace, warn};

use crate::{Command, Simulation};

/// Single choke point between the input loop and the simulation engine.
///
/// Commands are forwarded in the order received, one call at a time. Nothing
/// is buffered, reordered or deduplicated, except that `Initialize` reaches
/// the engine at most once.
#[derive(Debug)]
pub struct CommandDispatcher<S> {
    simulation: S,
    initialized: bool,
    dispatched: u64,
}

impl<S: Simulation> CommandDispatcher<S> {
    pub fn new(simulation: S) -> Self {
        Self {
            simulation,
            initialized: false,
            dispatched: 0,
        }
    }

    pub fn dispatch(&mut self, command: Command) {
        trace!(command = command.name(), "dispatch");
        match command {
            Command::Initialize => {
                if self.initialized {
                    warn!("initialize already dispatched; ignoring repeat");
                    return;
                }
                self.initialized = true;
                self.simulation.initialize();
            }
            Command::MoveUp => self.simulation.move_up(),
            Command::MoveDown => self.simulation.move_down(),
            Command::MoveLeft => self.simulation.move_left(),
            Command::MoveRight => self.simulation.move_right(),
            Command::Teleport => self.simulation.teleport(),
            Command::PlaceObstacle => self.simulation.place_obstacle(),
            Command::Render => self.simulation.render_frame(),
        }
        self.dispatched = self.dispatched.saturating_add(1);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn dispatched_count(&self) -> u64 {
        self.dispatched
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut S {
        &mut self.simulation
    }

    pub fn into_simulation(self) -> S {
        self.simulation
    }
}
