use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::Command;

/// Maps a key identifier (as reported by a key-press event) to its command.
///
/// Identifiers are matched case-sensitively; anything outside the table is
/// not an error and yields `None`.
pub fn command_for_key(key: &str) -> Option<Command> {
    let command = match key {
        "Up" | "ArrowUp" => Command::MoveUp,
        "Down" | "ArrowDown" => Command::MoveDown,
        "Left" | "ArrowLeft" => Command::MoveLeft,
        "Right" | "ArrowRight" => Command::MoveRight,
        _ => {
            trace!(key, "key_unmapped");
            return None;
        }
    };
    Some(command)
}

/// A pointer-activated on-screen control. Each control is bound to one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Teleport,
    PlaceObstacle,
}

impl Control {
    pub const ALL: [Control; 6] = [
        Control::Up,
        Control::Down,
        Control::Left,
        Control::Right,
        Control::Teleport,
        Control::PlaceObstacle,
    ];

    pub const fn command(self) -> Command {
        match self {
            Control::Up => Command::MoveUp,
            Control::Down => Command::MoveDown,
            Control::Left => Command::MoveLeft,
            Control::Right => Command::MoveRight,
            Control::Teleport => Command::Teleport,
            Control::PlaceObstacle => Command::PlaceObstacle,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Control::Up => "up",
            Control::Down => "down",
            Control::Left => "left",
            Control::Right => "right",
            Control::Teleport => "teleport",
            Control::PlaceObstacle => "obstacle",
        }
    }
}
