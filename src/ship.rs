//! Ship entity: deck run, orientation and accumulated damage.

use serde::{Deserialize, Serialize};

use crate::common::{GameError, Position};

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A ship occupying `decks` consecutive cells from `origin` along
/// `orientation`. Owned exclusively by the board that placed it; cells
/// refer back to it by index, never by pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    decks: u8,
    origin: Position,
    orientation: Orientation,
    hits: u8,
}

impl Ship {
    /// Construct a ship, rejecting any run that does not fit entirely
    /// inside a `board_size`×`board_size` board.
    pub fn new(
        decks: u8,
        origin: Position,
        orientation: Orientation,
        board_size: u8,
    ) -> Result<Self, GameError> {
        if decks == 0 {
            return Err(GameError::InvalidConfig("ship must have at least one deck"));
        }
        let fits = match orientation {
            Orientation::Horizontal => origin.x.checked_add(decks).is_some_and(|end| end <= board_size),
            Orientation::Vertical => origin.y.checked_add(decks).is_some_and(|end| end <= board_size),
        };
        if origin.x >= board_size || origin.y >= board_size || !fits {
            return Err(GameError::ShipOutOfBounds);
        }
        Ok(Self {
            decks,
            origin,
            orientation,
            hits: 0,
        })
    }

    pub fn decks(&self) -> u8 {
        self.decks
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn hits(&self) -> u8 {
        self.hits
    }

    /// Record one hit. Saturates at `decks`.
    pub fn record_hit(&mut self) {
        self.hits = self.decks.min(self.hits + 1);
    }

    pub fn is_sunk(&self) -> bool {
        self.hits == self.decks
    }

    /// Positions of the ship's deck cells, in run order.
    pub fn deck_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.decks).map(move |i| match self.orientation {
            Orientation::Horizontal => Position::new(self.origin.x + i, self.origin.y),
            Orientation::Vertical => Position::new(self.origin.x, self.origin.y + i),
        })
    }

    /// The ship's deck cells plus a 1-cell buffer in all directions,
    /// diagonals included, clamped to the board. Must be entirely empty
    /// at placement time; marked useless once the ship sinks.
    pub fn exclusion_area(&self, board_size: u8) -> Vec<Position> {
        let (run_x, run_y) = match self.orientation {
            Orientation::Horizontal => (self.decks, 1),
            Orientation::Vertical => (1, self.decks),
        };
        let x_min = self.origin.x.saturating_sub(1);
        let y_min = self.origin.y.saturating_sub(1);
        let x_max = (self.origin.x + run_x).min(board_size - 1);
        let y_max = (self.origin.y + run_y).min(board_size - 1);

        let mut area = Vec::with_capacity((x_max - x_min + 1) as usize * (y_max - y_min + 1) as usize);
        for x in x_min..=x_max {
            for y in y_min..=y_max {
                area.push(Position::new(x, y));
            }
        }
        area
    }
}
