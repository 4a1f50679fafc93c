//! Common types shared by the board model, the engine and the wire protocol.

use core::fmt;
use serde::{Deserialize, Serialize};

/// A cell coordinate on an N×N board, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // column letters cover every supported board size; anything
        // beyond that is an unvalidated peer coordinate
        if self.x < 26 {
            write!(f, "{}{}", (b'A' + self.x) as char, self.y as u16 + 1)
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}

/// Outcome of resolving a single shot against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotResult {
    /// Shot landed on open water.
    Miss,
    /// Shot damaged a ship that is still afloat.
    Hit,
    /// Shot sank a ship; other ships remain.
    Sank,
    /// Shot sank the last ship.
    GameOver,
}

/// Errors returned by board and engine operations.
#[derive(Debug, PartialEq, Eq)]
pub enum GameError {
    /// Configuration rejected before any board was built.
    InvalidConfig(&'static str),
    /// No legal placement found within the attempt budget.
    PlacementExhausted { decks: u8 },
    /// Ship does not fit entirely inside the board.
    ShipOutOfBounds,
    /// Placement would violate the 1-cell spacing buffer.
    PlacementConflict,
    /// Coordinate outside the board.
    OutOfBounds { x: u8, y: u8 },
    /// A ship-state cell without a ship handle.
    UnknownShipHit,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidConfig(reason) => write!(f, "invalid game configuration: {}", reason),
            GameError::PlacementExhausted { decks } => {
                write!(f, "no legal placement found for a {}-deck ship", decks)
            }
            GameError::ShipOutOfBounds => write!(f, "ship placement is out of bounds"),
            GameError::PlacementConflict => {
                write!(f, "ship placement conflicts with an already placed ship")
            }
            GameError::OutOfBounds { x, y } => write!(f, "position ({}, {}) is out of bounds", x, y),
            GameError::UnknownShipHit => write!(f, "ship cell has no owning ship"),
        }
    }
}
