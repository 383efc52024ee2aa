use crate::Command;

/// The turn-based simulation engine, as seen from the input loop.
///
/// Every call is fire-and-forget. Rejecting an illegal move, or failing in
/// any other way, is the engine's business and never reported back here.
pub trait Simulation {
    fn initialize(&mut self);
    fn move_up(&mut self);
    fn move_down(&mut self);
    fn move_left(&mut self);
    fn move_right(&mut self);
    fn teleport(&mut self);
    fn place_obstacle(&mut self);
    fn render_frame(&mut self);
}

impl<S: Simulation + ?Sized> Simulation for Box<S> {
    fn initialize(&mut self) {
        (**self).initialize();
    }

    fn move_up(&mut self) {
        (**self).move_up();
    }

    fn move_down(&mut self) {
        (**self).move_down();
    }

    fn move_left(&mut self) {
        (**self).move_left();
    }

    fn move_right(&mut self) {
        (**self).move_right();
    }

    fn teleport(&mut self) {
        (**self).teleport();
    }

    fn place_obstacle(&mut self) {
        (**self).place_obstacle();
    }

    fn render_frame(&mut self) {
        (**self).render_frame();
    }
}

/// Records every call in order. Used by tests and by trace replay.
#[derive(Debug, Clone, Default)]
pub struct RecordingSimulation {
    calls: Vec<Command>,
}

impl RecordingSimulation {
    pub fn calls(&self) -> &[Command] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.calls)
    }
}

impl Simulation for RecordingSimulation {
    fn initialize(&mut self) {
        self.calls.push(Command::Initialize);
    }

    fn move_up(&mut self) {
        self.calls.push(Command::MoveUp);
    }

    fn move_down(&mut self) {
        self.calls.push(Command::MoveDown);
    }

    fn move_left(&mut self) {
        self.calls.push(Command::MoveLeft);
    }

    fn move_right(&mut self) {
        self.calls.push(Command::MoveRight);
    }

    fn teleport(&mut self) {
        self.calls.push(Command::Teleport);
    }

    fn place_obstacle(&mut self) {
        self.calls.push(Command::PlaceObstacle);
    }

    fn render_frame(&mut self) {
        self.calls.push(Command::Render);
    }
}
