//! Orchestration: wires session events to engine calls and back.
//!
//! A `GameNode` owns one player, one engine and one peer session and
//! drives a full session lifecycle: handshake, ship placement,
//! readiness rendezvous, the shot relay loop and the terminal state.

use rand::rngs::SmallRng;

use crate::game::{GameEngine, GameState};
use crate::player::Player;
use crate::session::{PeerSession, SessionEvent};

/// How much retargeting we tolerate from a player implementation that
/// keeps naming already-resolved cells.
const MAX_TARGET_RETRIES: u32 = 100;

/// Terminal state of a session from the local point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Victory,
    Defeat,
    /// The peer disconnected mid-session. Routed to its own terminal
    /// state so the turn machine never silently hangs.
    PeerLeft,
}

pub struct GameNode {
    player: Box<dyn Player>,
    engine: GameEngine,
    session: PeerSession,
    shots_fired: usize,
}

impl GameNode {
    pub fn new(player: Box<dyn Player>, engine: GameEngine, session: PeerSession) -> Self {
        Self {
            player,
            engine,
            session,
            shots_fired: 0,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Shots this side has relayed to the peer.
    pub fn shots_fired(&self) -> usize {
        self.shots_fired
    }

    /// Drive one complete game session to its terminal state.
    pub async fn run(&mut self, rng: &mut SmallRng) -> anyhow::Result<GameOutcome> {
        let first_shot = self.session.handshake(rng).await?;

        // Ship placement phase. The engine owns randomized placement;
        // the player only approves or asks for a reshuffle.
        self.engine
            .init_game(first_shot, rng)
            .map_err(|e| anyhow::anyhow!(e))?;
        while self.player.wants_reshuffle(self.engine.hero_board()) {
            self.engine
                .replace_hero_ships(rng)
                .map_err(|e| anyhow::anyhow!(e))?;
        }

        // Readiness rendezvous: announce, then wait for the peer unless
        // its readiness already arrived and the barrier fired locally.
        if !self.session.send_game_ready().await? {
            match self.session.next_event().await? {
                SessionEvent::GameStarted => {}
                SessionEvent::Disconnected => return Ok(GameOutcome::PeerLeft),
                other => {
                    return Err(anyhow::anyhow!(
                        "unexpected event before game start: {:?}",
                        other
                    ))
                }
            }
        }
        self.engine.start_game();

        loop {
            match self.engine.state() {
                GameState::Hero => {
                    if let Some(outcome) = self.hero_turn(rng).await? {
                        return Ok(outcome);
                    }
                }
                GameState::Enemy => {
                    if let Some(outcome) = self.enemy_turn().await? {
                        return Ok(outcome);
                    }
                }
                GameState::GameOver => break,
                GameState::Waiting => {
                    return Err(anyhow::anyhow!("engine still waiting after game start"))
                }
            }
        }

        if self.engine.hero_board().all_sunk() {
            Ok(GameOutcome::Defeat)
        } else {
            Ok(GameOutcome::Victory)
        }
    }

    /// Our turn: pick a target, relay it, apply the relayed outcome.
    async fn hero_turn(&mut self, rng: &mut SmallRng) -> anyhow::Result<Option<GameOutcome>> {
        let mut target = self.player.select_target(rng, self.engine.enemy_board());
        let mut retries = 0;
        while !self.engine.is_valid_target(target) {
            retries += 1;
            if retries > MAX_TARGET_RETRIES {
                return Err(anyhow::anyhow!("player kept selecting resolved cells"));
            }
            log::debug!("target {} already resolved, asking again", target);
            target = self.player.select_target(rng, self.engine.enemy_board());
        }

        self.session.send_shot(target).await?;
        self.shots_fired += 1;

        loop {
            match self.session.next_event().await? {
                SessionEvent::ShotResolved { shot } => {
                    self.player.handle_shot_result(target, &shot);
                    self.engine.apply_hero_shot_result(&shot);
                    return Ok(None);
                }
                // A peer shot while we hold the turn is a protocol
                // violation; it gets no answer and we keep waiting.
                SessionEvent::ShotRequested { position } => {
                    log::warn!("rejected out-of-turn peer shot at {}", position);
                }
                SessionEvent::Disconnected => return Ok(Some(GameOutcome::PeerLeft)),
                other => {
                    return Err(anyhow::anyhow!("expected a shot result, got: {:?}", other))
                }
            }
        }
    }

    /// Peer's turn: resolve its shot against our fleet and relay the
    /// outcome. An out-of-turn or unusable shot is rejected locally and
    /// never answered.
    async fn enemy_turn(&mut self) -> anyhow::Result<Option<GameOutcome>> {
        loop {
            match self.session.next_event().await? {
                SessionEvent::ShotRequested { position } => {
                    match self.engine.make_enemy_shot(position) {
                        Some(shot) => {
                            self.player.handle_opponent_shot(position, &shot);
                            self.session.send_shot_result(shot).await?;
                        }
                        None => log::warn!("rejected peer shot at {}", position),
                    }
                    return Ok(None);
                }
                // A stray result while the peer holds the turn hits the
                // engine's out-of-turn guard and changes nothing.
                SessionEvent::ShotResolved { shot } => {
                    self.engine.apply_hero_shot_result(&shot);
                    log::warn!("ignored out-of-turn shot result");
                }
                SessionEvent::Disconnected => return Ok(Some(GameOutcome::PeerLeft)),
                other => return Err(anyhow::anyhow!("expected a shot, got: {:?}", other)),
            }
        }
    }
}
