//! Turn state machine over one authoritative fleet board and one
//! opponent projection.
//!
//! The asymmetry is the crux of keeping two distrustful peers
//! consistent: [`GameEngine::make_enemy_shot`] mutates the authoritative
//! board and *computes* an outcome, while
//! [`GameEngine::apply_hero_shot_result`] only *mirrors* a remotely
//! computed outcome into the projection. Each peer is the sole source of
//! truth for damage done to its own fleet.

use rand::Rng;

use crate::board::{Board, CellState, Shot};
use crate::common::{GameError, Position, ShotResult};
use crate::config::GameConfig;

/// Whose turn it is. `Hero` means the local player may shoot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Ship placement / readiness handshake in progress.
    Waiting,
    Hero,
    Enemy,
    GameOver,
}

/// How a non-terminal shot result moves the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnRule {
    /// Classic rule: the shooter keeps the turn on a hit or sink and
    /// only a miss passes it over.
    #[default]
    MissFlips,
    /// Rule variant: every shot passes the turn regardless of result.
    AlwaysFlips,
}

pub struct GameEngine {
    config: GameConfig,
    hero_board: Board,
    enemy_board: Board,
    state: GameState,
    initial_state: GameState,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let size = config.board_size;
        Ok(Self {
            config,
            hero_board: Board::empty(size),
            enemy_board: Board::empty(size),
            state: GameState::Waiting,
            initial_state: GameState::Waiting,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// The local fleet board (authoritative).
    pub fn hero_board(&self) -> &Board {
        &self.hero_board
    }

    /// The opponent projection, built solely from relayed shot outcomes.
    pub fn enemy_board(&self) -> &Board {
        &self.enemy_board
    }

    /// (Re)build both boards and remember who shoots first. The engine
    /// stays in `Waiting` until [`GameEngine::start_game`] commits the
    /// turn; boards from a previous game are discarded entirely.
    pub fn init_game<R: Rng>(&mut self, first_shot: bool, rng: &mut R) -> Result<(), GameError> {
        self.hero_board =
            Board::with_random_fleet(self.config.board_size, &self.config.fleet, rng)?;
        self.enemy_board = Board::empty(self.config.board_size);
        self.initial_state = if first_shot {
            GameState::Hero
        } else {
            GameState::Enemy
        };
        self.state = GameState::Waiting;
        Ok(())
    }

    /// Commit the pending initial turn.
    pub fn start_game(&mut self) {
        if self.state == GameState::Waiting {
            self.state = self.initial_state;
            log::debug!("game started, initial turn: {:?}", self.state);
        }
    }

    /// Discard and re-run placement for the local board. Usable only
    /// during the pre-game placement phase; ignored otherwise.
    pub fn replace_hero_ships<R: Rng>(&mut self, rng: &mut R) -> Result<(), GameError> {
        if self.state != GameState::Waiting {
            log::debug!("replace_hero_ships ignored outside placement phase");
            return Ok(());
        }
        self.hero_board =
            Board::with_random_fleet(self.config.board_size, &self.config.fleet, rng)?;
        Ok(())
    }

    /// Whether `position` is still a legal target on the projection.
    /// Callers filter shots through this before relaying them.
    pub fn is_valid_target(&self, position: Position) -> bool {
        self.enemy_board
            .cell(position)
            .is_some_and(|c| c.state == CellState::Empty)
    }

    /// Apply a remotely computed outcome of our own shot to the
    /// projection. Valid only while it is the hero's turn; an
    /// out-of-turn call is a silent no-op rather than an error, so a
    /// misbehaving peer cannot corrupt local state.
    pub fn apply_hero_shot_result(&mut self, shot: &Shot) {
        if self.state != GameState::Hero {
            log::debug!("hero shot result ignored out of turn");
            return;
        }
        if let Err(e) = self.enemy_board.apply_shot(shot) {
            log::warn!("dropping malformed shot result: {}", e);
            return;
        }
        self.advance_turn(shot.result, GameState::Enemy);
    }

    /// Resolve an opponent shot against the authoritative local board.
    /// Returns `None` when called out of turn or with an unusable
    /// target, signaling "rejected" to the relay layer.
    pub fn make_enemy_shot(&mut self, position: Position) -> Option<Shot> {
        if self.state != GameState::Enemy {
            log::debug!("enemy shot ignored out of turn");
            return None;
        }
        let shot = match self.hero_board.take_shot(position) {
            Ok(shot) => shot,
            Err(e) => {
                log::warn!("rejecting enemy shot: {}", e);
                return None;
            }
        };
        self.advance_turn(shot.result, GameState::Hero);
        Some(shot)
    }

    fn advance_turn(&mut self, result: ShotResult, pass_to: GameState) {
        match result {
            ShotResult::GameOver => self.state = GameState::GameOver,
            ShotResult::Miss => self.state = pass_to,
            ShotResult::Hit | ShotResult::Sank => {
                if self.config.turn_rule == TurnRule::AlwaysFlips {
                    self.state = pass_to;
                }
            }
        }
    }
}
