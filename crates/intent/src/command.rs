use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Teleport,
    PlaceObstacle,
    Render,
    Initialize,
}

impl Command {
    pub const fn name(self) -> &'static str {
        match self {
            Command::MoveUp => "move_up",
            Command::MoveDown => "move_down",
            Command::MoveLeft => "move_left",
            Command::MoveRight => "move_right",
            Command::Teleport => "teleport",
            Command::PlaceObstacle => "place_obstacle",
            Command::Render => "render",
            Command::Initialize => "initialize",
        }
    }
}

/// Vertical axis value of a latched intent. The empty axis is `None` at the use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertical {
    Up,
    Down,
}

/// Horizontal axis value of a latched intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizontal {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

/// One axis worth of intent, as written by the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisIntent {
    Vertical(Vertical),
    Horizontal(Horizontal),
}

impl From<Vertical> for Command {
    fn from(value: Vertical) -> Self {
        match value {
            Vertical::Up => Command::MoveUp,
            Vertical::Down => Command::MoveDown,
        }
    }
}

impl From<Horizontal> for Command {
    fn from(value: Horizontal) -> Self {
        match value {
            Horizontal::Left => Command::MoveLeft,
            Horizontal::Right => Command::MoveRight,
        }
    }
}

impl From<Vertical> for Direction {
    fn from(value: Vertical) -> Self {
        match value {
            Vertical::Up => Direction::Up,
            Vertical::Down => Direction::Down,
        }
    }
}

impl From<Horizontal> for Direction {
    fn from(value: Horizontal) -> Self {
        match value {
            Horizontal::Left => Direction::Left,
            Horizontal::Right => Direction::Right,
        }
    }
}

impl From<Option<Vertical>> for Direction {
    fn from(value: Option<Vertical>) -> Self {
        value.map_or(Direction::None, Direction::from)
    }
}

impl From<Option<Horizontal>> for Direction {
    fn from(value: Option<Horizontal>) -> Self {
        value.map_or(Direction::None, Direction::from)
    }
}
