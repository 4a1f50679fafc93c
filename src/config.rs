//! Static game configuration: board size, fleet composition, turn rule.

use crate::common::GameError;
use crate::game::TurnRule;

/// Default board edge length.
pub const DEFAULT_BOARD_SIZE: u8 = 10;

/// Fresh random samples tried per ship before placement is declared
/// exhausted and reported as a configuration error.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

/// Largest supported deck count for a single ship.
pub const MAX_DECKS: u8 = 4;

/// One class of ship: how many deck cells it spans and how many of it
/// the fleet carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipClass {
    pub decks: u8,
    pub count: u8,
}

impl ShipClass {
    pub const fn new(decks: u8, count: u8) -> Self {
        Self { decks, count }
    }
}

/// Configuration supplied at engine construction. No other externally
/// tunable parameters exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub board_size: u8,
    pub fleet: Vec<ShipClass>,
    pub turn_rule: TurnRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            fleet: vec![
                ShipClass::new(4, 1),
                ShipClass::new(3, 2),
                ShipClass::new(2, 3),
                ShipClass::new(1, 4),
            ],
            turn_rule: TurnRule::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.board_size == 0 {
            return Err(GameError::InvalidConfig("board size must be at least 1"));
        }
        if self.board_size > 26 {
            return Err(GameError::InvalidConfig("board size must be at most 26"));
        }
        if self.fleet.is_empty() {
            return Err(GameError::InvalidConfig("fleet must contain at least one ship class"));
        }
        for class in &self.fleet {
            if class.decks == 0 || class.decks > MAX_DECKS {
                return Err(GameError::InvalidConfig("ship deck count must be between 1 and 4"));
            }
            if class.decks > self.board_size {
                return Err(GameError::InvalidConfig("ship is longer than the board edge"));
            }
            if class.count == 0 {
                return Err(GameError::InvalidConfig("ship class count must be at least 1"));
            }
        }
        Ok(())
    }

    /// Number of ships the fleet places.
    pub fn total_ships(&self) -> usize {
        self.fleet.iter().map(|c| c.count as usize).sum()
    }

    /// Total deck cells across the fleet.
    pub fn total_deck_cells(&self) -> usize {
        self.fleet
            .iter()
            .map(|c| c.decks as usize * c.count as usize)
            .sum()
    }
}
