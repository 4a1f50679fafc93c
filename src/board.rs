//! Game board: cell grid, ship placement, shot resolution and the
//! projection-sync contract.
//!
//! One `Board` type serves both roles. A *fleet board* is populated by
//! [`Board::with_random_fleet`] and resolves shots authoritatively via
//! [`Board::take_shot`]. A *projection board* starts empty and is only
//! ever mutated by [`Board::apply_shot`], mirroring cell-by-cell what the
//! remote side revealed. A projection never infers ship positions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::{GameError, Position, ShotResult};
use crate::config::{ShipClass, MAX_PLACEMENT_ATTEMPTS};
use crate::ship::{Orientation, Ship};

/// Handle from a cell back to the ship occupying it: an index into the
/// board's ship set.
pub type ShipId = usize;

/// Observable state of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Empty,
    /// Adjacent to a fully sunk ship; can never contain another ship.
    /// Kept distinct from `Empty` purely as a player hint.
    Useless,
    Ship,
    Hit,
    Miss,
}

/// A board cell. The `ship` back-reference is non-owning; ship lifetime
/// is tied to the board's ship set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    pub state: CellState,
    pub ship: Option<ShipId>,
}

/// One cell change carried by a [`Shot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedCell {
    pub position: Position,
    pub state: CellState,
}

/// Resolved shot: the outcome plus the complete and exact set of cell
/// changes a receiver must apply to keep its projection in sync. This is
/// the wire payload for state synchronization, not just a display hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shot {
    pub result: ShotResult,
    pub affected_cells: Vec<AffectedCell>,
}

#[derive(Debug)]
pub struct Board {
    size: u8,
    cells: Vec<Cell>,
    ships: Vec<Ship>,
    unsunk_ship_count: usize,
}

impl Board {
    /// An empty board: the starting point of an opponent projection.
    pub fn empty(size: u8) -> Self {
        let mut cells = Vec::with_capacity(size as usize * size as usize);
        for y in 0..size {
            for x in 0..size {
                cells.push(Cell {
                    position: Position::new(x, y),
                    state: CellState::Empty,
                    ship: None,
                });
            }
        }
        Self {
            size,
            cells,
            ships: Vec::new(),
            unsunk_ship_count: 0,
        }
    }

    /// A fleet board with every ship of `fleet` placed at a uniformly
    /// random legal position.
    pub fn with_random_fleet<R: Rng>(
        size: u8,
        fleet: &[ShipClass],
        rng: &mut R,
    ) -> Result<Self, GameError> {
        if size == 0 {
            return Err(GameError::InvalidConfig("board size must be at least 1"));
        }
        let mut board = Self::empty(size);
        board.place_fleet(fleet, rng)?;
        Ok(board)
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    /// Read-only snapshot of the grid, row-major (`y * size + x`).
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        if self.in_bounds(position) {
            Some(&self.cells[self.index(position)])
        } else {
            None
        }
    }

    /// Ships placed on this board. Empty for a projection.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn unsunk_ship_count(&self) -> usize {
        self.unsunk_ship_count
    }

    pub fn all_sunk(&self) -> bool {
        !self.ships.is_empty() && self.unsunk_ship_count == 0
    }

    /// Positions still worth shooting at, in scan order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .filter(|c| c.state == CellState::Empty)
            .map(|c| c.position)
    }

    fn in_bounds(&self, position: Position) -> bool {
        position.x < self.size && position.y < self.size
    }

    fn index(&self, position: Position) -> usize {
        position.y as usize * self.size as usize + position.x as usize
    }

    /// Whether the ship's entire exclusion area is currently empty. The
    /// buffer guarantees no two ships ever touch, even diagonally.
    pub fn can_place(&self, ship: &Ship) -> bool {
        ship.exclusion_area(self.size)
            .iter()
            .all(|&p| self.cells[self.index(p)].state == CellState::Empty)
    }

    /// Commit a single ship, validating spacing. Exposed for manual
    /// placement; random placement goes through [`Board::with_random_fleet`].
    pub fn place_ship(&mut self, ship: Ship) -> Result<ShipId, GameError> {
        if !self.can_place(&ship) {
            return Err(GameError::PlacementConflict);
        }
        let id = self.ships.len();
        for p in ship.deck_cells() {
            let i = self.index(p);
            self.cells[i].state = CellState::Ship;
            self.cells[i].ship = Some(id);
        }
        self.ships.push(ship);
        self.unsunk_ship_count += 1;
        Ok(id)
    }

    /// Place the whole fleet by rejection sampling: a random origin and a
    /// ~50/50 orientation per attempt, with a bounded attempt budget so a
    /// pathological configuration fails fast instead of spinning.
    fn place_fleet<R: Rng>(&mut self, fleet: &[ShipClass], rng: &mut R) -> Result<(), GameError> {
        for class in fleet {
            for _ in 0..class.count {
                self.place_one(class.decks, rng)?;
            }
        }
        log::debug!(
            "placed {} ships ({} deck cells)",
            self.ships.len(),
            self.ships.iter().map(|s| s.decks() as usize).sum::<usize>()
        );
        Ok(())
    }

    fn place_one<R: Rng>(&mut self, decks: u8, rng: &mut R) -> Result<ShipId, GameError> {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let origin = Position::new(rng.random_range(0..self.size), rng.random_range(0..self.size));
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let ship = match Ship::new(decks, origin, orientation, self.size) {
                Ok(ship) => ship,
                Err(_) => continue,
            };
            if self.can_place(&ship) {
                return self.place_ship(ship);
            }
        }
        Err(GameError::PlacementExhausted { decks })
    }

    /// Resolve a shot against this board (authoritative side).
    ///
    /// Re-shooting an already resolved cell is legal and never corrupts
    /// state: a spent cell resolves as a plain miss or hit and a sunk
    /// ship is never counted down twice. Callers are expected to filter
    /// non-empty targets at a higher layer.
    pub fn take_shot(&mut self, position: Position) -> Result<Shot, GameError> {
        if !self.in_bounds(position) {
            return Err(GameError::OutOfBounds {
                x: position.x,
                y: position.y,
            });
        }
        let i = self.index(position);
        match self.cells[i].state {
            CellState::Empty | CellState::Miss | CellState::Useless => {
                self.cells[i].state = CellState::Miss;
                Ok(Shot {
                    result: ShotResult::Miss,
                    affected_cells: vec![AffectedCell {
                        position,
                        state: CellState::Miss,
                    }],
                })
            }
            CellState::Hit => Ok(Shot {
                result: ShotResult::Hit,
                affected_cells: vec![AffectedCell {
                    position,
                    state: CellState::Hit,
                }],
            }),
            CellState::Ship => {
                let id = self.cells[i].ship.ok_or(GameError::UnknownShipHit)?;
                self.cells[i].state = CellState::Hit;
                self.ships[id].record_hit();
                if self.ships[id].is_sunk() {
                    self.unsunk_ship_count -= 1;
                    let result = if self.unsunk_ship_count == 0 {
                        ShotResult::GameOver
                    } else {
                        ShotResult::Sank
                    };
                    Ok(Shot {
                        result,
                        affected_cells: self.reveal_sunk_area(id),
                    })
                } else {
                    Ok(Shot {
                        result: ShotResult::Hit,
                        affected_cells: vec![AffectedCell {
                            position,
                            state: CellState::Hit,
                        }],
                    })
                }
            }
        }
    }

    /// Mark the sunk ship's buffer useless and collect the full
    /// exclusion-area cell set, so the shooter's view and the sync
    /// payload both reflect every newly revealed no-ship cell.
    fn reveal_sunk_area(&mut self, id: ShipId) -> Vec<AffectedCell> {
        let ship = self.ships[id];
        let area = ship.exclusion_area(self.size);
        let mut affected = Vec::with_capacity(area.len());
        for p in area {
            let i = self.index(p);
            if self.cells[i].state == CellState::Empty {
                self.cells[i].state = CellState::Useless;
            }
            affected.push(AffectedCell {
                position: p,
                state: self.cells[i].state,
            });
        }
        affected
    }

    /// Apply a remotely computed shot to this projection, cell by cell.
    /// The projection never recomputes outcomes locally; it only mirrors
    /// what the remote authoritative board revealed.
    pub fn apply_shot(&mut self, shot: &Shot) -> Result<(), GameError> {
        for cell in &shot.affected_cells {
            if !self.in_bounds(cell.position) {
                return Err(GameError::OutOfBounds {
                    x: cell.position.x,
                    y: cell.position.y,
                });
            }
        }
        for cell in &shot.affected_cells {
            let i = self.index(cell.position);
            self.cells[i].state = cell.state;
        }
        Ok(())
    }
}
