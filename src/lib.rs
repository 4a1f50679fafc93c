mod board;
mod common;
mod config;
mod game;
mod logging;
mod node;
mod player;
pub mod protocol;
mod render;
mod session;
mod ship;
pub mod transport;

pub use board::{AffectedCell, Board, Cell, CellState, ShipId, Shot};
pub use common::{GameError, Position, ShotResult};
pub use config::{GameConfig, ShipClass, DEFAULT_BOARD_SIZE, MAX_PLACEMENT_ATTEMPTS};
pub use game::{GameEngine, GameState, TurnRule};
pub use logging::init_logging;
pub use node::{GameNode, GameOutcome};
pub use player::{CliPlayer, Player, RandomPlayer};
pub use protocol::{Message, PROTOCOL_VERSION};
pub use render::{render_fleet, render_projection};
pub use session::{PeerSession, ReadyBarrier, SessionEvent, SessionRole};
pub use ship::{Orientation, Ship};
pub use transport::tcp::TcpTransport;
