use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use intent::Simulation;
use thiserror::Error;
use tracing::{debug, info};

const TELEPORT_STRIDE: usize = 7;

#[derive(Debug, Error)]
pub enum WalkerLoadError {
    #[error("failed to read maze file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("maze has no rows")]
    Empty,
    #[error("maze row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown maze tile {tile:?} at row {row}, column {column}")]
    UnknownTile {
        row: usize,
        column: usize,
        tile: char,
    },
    #[error("maze has no start cell ('@')")]
    MissingStart,
    #[error("maze has a second start cell at row {row}, column {column}")]
    DuplicateStart { row: usize, column: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Floor,
    Wall,
    Obstacle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

/// Turn-based grid walker standing in for the simulation engine.
///
/// Moves into walls or obstacles are rejected silently. `render_frame` only
/// bumps the frame serial; the host presents the walker when it changes.
#[derive(Debug, Clone)]
pub struct GridWalker {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    start: Cell,
    position: Cell,
    previous: Option<Cell>,
    teleport_cursor: usize,
    rejected_moves: u64,
    frame_serial: u64,
}

impl GridWalker {
    pub fn load(path: &Path) -> Result<Self, WalkerLoadError> {
        let raw = fs::read_to_string(path).map_err(|source| WalkerLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let walker = Self::parse(&raw)?;
        info!(
            path = %path.display(),
            width = walker.width,
            height = walker.height,
            "maze_loaded"
        );
        Ok(walker)
    }

    /// `#` wall, `.` floor, `@` start. Blank lines are skipped.
    pub fn parse(raw: &str) -> Result<Self, WalkerLoadError> {
        let mut tiles = Vec::new();
        let mut width = None;
        let mut height = 0usize;
        let mut start = None;

        for line in raw.lines().map(str::trim_end).filter(|line| !line.is_empty()) {
            let row = height;
            let mut found = 0usize;
            for (column, tile) in line.chars().enumerate() {
                let parsed = match tile {
                    '#' => Tile::Wall,
                    '.' => Tile::Floor,
                    '@' => {
                        if start.is_some() {
                            return Err(WalkerLoadError::DuplicateStart { row, column });
                        }
                        start = Some(Cell { x: column, y: row });
                        Tile::Floor
                    }
                    other => {
                        return Err(WalkerLoadError::UnknownTile {
                            row,
                            column,
                            tile: other,
                        })
                    }
                };
                tiles.push(parsed);
                found += 1;
            }

            let expected = *width.get_or_insert(found);
            if found != expected {
                return Err(WalkerLoadError::Ragged {
                    row,
                    expected,
                    found,
                });
            }
            height += 1;
        }

        let width = width.ok_or(WalkerLoadError::Empty)?;
        let start = start.ok_or(WalkerLoadError::MissingStart)?;
        Ok(Self {
            width,
            height,
            tiles,
            start,
            position: start,
            previous: None,
            teleport_cursor: 0,
            rejected_moves: 0,
            frame_serial: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn rejected_moves(&self) -> u64 {
        self.rejected_moves
    }

    pub fn frame_serial(&self) -> u64 {
        self.frame_serial
    }

    pub fn tile_at(&self, x: i64, y: i64) -> Option<Tile> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(y * self.width + x).copied()
    }

    fn step(&mut self, dx: i64, dy: i64) {
        let target_x = self.position.x as i64 + dx;
        let target_y = self.position.y as i64 + dy;
        match self.tile_at(target_x, target_y) {
            Some(Tile::Floor) => {
                self.previous = Some(self.position);
                self.position = Cell {
                    x: target_x as usize,
                    y: target_y as usize,
                };
            }
            _ => {
                self.rejected_moves = self.rejected_moves.saturating_add(1);
                debug!(x = target_x, y = target_y, "move_rejected");
            }
        }
    }

    fn free_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == Tile::Floor)
            .map(|(index, _)| Cell {
                x: index % self.width,
                y: index / self.width,
            })
    }
}

impl Simulation for GridWalker {
    fn initialize(&mut self) {
        for tile in &mut self.tiles {
            if *tile == Tile::Obstacle {
                *tile = Tile::Floor;
            }
        }
        self.position = self.start;
        self.previous = None;
        self.teleport_cursor = 0;
        self.rejected_moves = 0;
    }

    fn move_up(&mut self) {
        self.step(0, -1);
    }

    fn move_down(&mut self) {
        self.step(0, 1);
    }

    fn move_left(&mut self) {
        self.step(-1, 0);
    }

    fn move_right(&mut self) {
        self.step(1, 0);
    }

    fn teleport(&mut self) {
        let free = self.free_cells().count();
        if free == 0 {
            return;
        }
        self.teleport_cursor = (self.teleport_cursor + TELEPORT_STRIDE) % free;
        let target = self.free_cells().nth(self.teleport_cursor);
        if let Some(target) = target {
            self.previous = None;
            self.position = target;
        }
    }

    fn place_obstacle(&mut self) {
        let Some(cell) = self.previous.take() else {
            return;
        };
        if let Some(tile) = self.tiles.get_mut(cell.y * self.width + cell.x) {
            *tile = Tile::Obstacle;
        }
    }

    fn render_frame(&mut self) {
        self.frame_serial = self.frame_serial.wrapping_add(1);
    }
}
