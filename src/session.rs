//! Logical peer session over a supplied message channel: join/ready
//! handshake, readiness rendezvous, shot relay and disconnect detection.
//!
//! The session never touches game state. It translates wire messages
//! into typed [`SessionEvent`]s for the orchestration layer and relays
//! local actions back out, so the coupling between engine, session and
//! orchestration is statically checkable instead of routed through a
//! global event bus.

use rand::Rng;

use crate::board::Shot;
use crate::common::Position;
use crate::protocol::{Message, PROTOCOL_VERSION};
use crate::transport::Transport;

/// Which end of the channel this session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRole {
    /// Accepted the inbound connection; answers `join` with `ready`.
    Host,
    /// Established the outbound connection; flips the first-shot coin.
    Joiner,
}

/// Events the session surfaces to the orchestration layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Both sides finalized placement; the game may start.
    GameStarted,
    /// The peer relayed a shot at our fleet.
    ShotRequested { position: Position },
    /// The peer relayed the outcome of our shot.
    ShotResolved { shot: Shot },
    /// The peer left or the channel died. Fired at most once per
    /// session; all subsequent sends are no-ops.
    Disconnected,
}

/// 2-of-2 readiness rendezvous with a winner-fires-once rule: whichever
/// `record_*` call observes both flags set first wins and fires; every
/// later call reports `false`.
#[derive(Debug, Default)]
pub struct ReadyBarrier {
    local: bool,
    peer: bool,
    fired: bool,
}

impl ReadyBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear both flags. Called whenever a new ship-placement phase
    /// begins so leftover readiness from a prior game cannot leak in.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn record_local(&mut self) -> bool {
        self.local = true;
        self.try_fire()
    }

    pub fn record_peer(&mut self) -> bool {
        self.peer = true;
        self.try_fire()
    }

    pub fn is_complete(&self) -> bool {
        self.local && self.peer
    }

    fn try_fire(&mut self) -> bool {
        if self.local && self.peer && !self.fired {
            self.fired = true;
            true
        } else {
            false
        }
    }
}

pub struct PeerSession {
    transport: Box<dyn Transport>,
    role: SessionRole,
    barrier: ReadyBarrier,
    disconnected: bool,
    disconnect_event_fired: bool,
}

impl PeerSession {
    pub fn host(transport: Box<dyn Transport>) -> Self {
        Self::new(transport, SessionRole::Host)
    }

    pub fn join(transport: Box<dyn Transport>) -> Self {
        Self::new(transport, SessionRole::Joiner)
    }

    fn new(transport: Box<dyn Transport>, role: SessionRole) -> Self {
        Self {
            transport,
            role,
            barrier: ReadyBarrier::new(),
            disconnected: false,
            disconnect_event_fired: false,
        }
    }

    pub fn role(&self) -> SessionRole {
        self.role
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Run the role-appropriate side of the join/ready handshake and
    /// return whether the local player shoots first. The joiner's coin
    /// flip is drawn from `rng`; the host is told the flip and answers
    /// with its complement, so exactly one side hears "you shoot first".
    ///
    /// Entering the handshake begins a ship-placement phase, which
    /// resets the readiness rendezvous.
    pub async fn handshake<R: Rng>(&mut self, rng: &mut R) -> anyhow::Result<bool> {
        self.barrier.reset();
        match self.role {
            SessionRole::Host => self.host_handshake().await,
            SessionRole::Joiner => {
                let coin: bool = rng.random();
                self.join_handshake(coin).await
            }
        }
    }

    /// Host side: wait for `join`, echo the complement, proceed with the
    /// joiner's flip.
    pub async fn host_handshake(&mut self) -> anyhow::Result<bool> {
        let msg = self.transport.recv().await?;
        match msg {
            Message::Join {
                version,
                need_first_shot,
            } => {
                check_version(version)?;
                self.transport
                    .send(Message::Ready {
                        version: PROTOCOL_VERSION,
                        need_first_shot: !need_first_shot,
                    })
                    .await?;
                log::info!("peer joined, local first shot: {}", need_first_shot);
                Ok(need_first_shot)
            }
            other => Err(anyhow::anyhow!(
                "expected Join, got unexpected message: {:?}",
                other
            )),
        }
    }

    /// Joiner side: announce with the given coin flip, proceed with the
    /// flip the host hands back.
    pub async fn join_handshake(&mut self, coin: bool) -> anyhow::Result<bool> {
        self.transport
            .send(Message::Join {
                version: PROTOCOL_VERSION,
                need_first_shot: coin,
            })
            .await?;
        let msg = self.transport.recv().await?;
        match msg {
            Message::Ready {
                version,
                need_first_shot,
            } => {
                check_version(version)?;
                log::info!("host ready, local first shot: {}", need_first_shot);
                Ok(need_first_shot)
            }
            other => Err(anyhow::anyhow!(
                "expected Ready, got unexpected message: {:?}",
                other
            )),
        }
    }

    /// Announce local placement completion. Returns `true` in the rare
    /// case this side already saw the peer's readiness and the
    /// rendezvous fires here instead of in [`PeerSession::next_event`].
    pub async fn send_game_ready(&mut self) -> anyhow::Result<bool> {
        if self.send(Message::GameReady).await {
            Ok(self.barrier.record_local())
        } else {
            Ok(false)
        }
    }

    /// Relay a shot at the peer's fleet.
    pub async fn send_shot(&mut self, position: Position) -> anyhow::Result<()> {
        self.send(Message::TakeShot {
            x: position.x,
            y: position.y,
        })
        .await;
        Ok(())
    }

    /// Relay the locally computed outcome of the peer's shot.
    pub async fn send_shot_result(&mut self, shot: Shot) -> anyhow::Result<()> {
        self.send(Message::ShotResult { shot }).await;
        Ok(())
    }

    /// Send on the live channel. After a disconnect this is a no-op; a
    /// channel failure here marks the session disconnected so the event
    /// loop surfaces it through the usual single event.
    async fn send(&mut self, msg: Message) -> bool {
        if self.disconnected {
            return false;
        }
        match self.transport.send(msg).await {
            Ok(()) => true,
            Err(e) => {
                log::info!("channel failed on send: {}", e);
                self.disconnected = true;
                false
            }
        }
    }

    /// Announce an explicit close and end the session locally. The
    /// local side initiated the close, so no `Disconnected` event is
    /// delivered for it.
    pub async fn leave(&mut self) -> anyhow::Result<()> {
        if self.disconnected {
            return Ok(());
        }
        let _ = self.transport.send(Message::Leave).await;
        self.disconnected = true;
        self.disconnect_event_fired = true;
        Ok(())
    }

    /// Wait for the next session event.
    ///
    /// An explicit peer `leave` and a channel failure (on either the
    /// send or the receive path) converge on the same single
    /// `Disconnected` event; once it has fired, further calls return an
    /// error instead of a second event, even if both close paths
    /// trigger in the same tick. Out-of-place messages are dropped with
    /// a warning rather than thrown across the event boundary.
    pub async fn next_event(&mut self) -> anyhow::Result<SessionEvent> {
        loop {
            if self.disconnected {
                return self.deliver_disconnect();
            }
            match self.transport.recv().await {
                Ok(Message::GameReady) => {
                    if self.barrier.record_peer() {
                        return Ok(SessionEvent::GameStarted);
                    }
                    // Peer finished placement first; wait for our side.
                }
                Ok(Message::TakeShot { x, y }) => {
                    return Ok(SessionEvent::ShotRequested {
                        position: Position::new(x, y),
                    });
                }
                Ok(Message::ShotResult { shot }) => {
                    return Ok(SessionEvent::ShotResolved { shot });
                }
                Ok(Message::Leave) => {
                    log::info!("peer left the session");
                    self.disconnected = true;
                    return self.deliver_disconnect();
                }
                Ok(other) => {
                    log::warn!("dropping unexpected message: {:?}", other);
                }
                Err(e) => {
                    log::info!("channel failed: {}", e);
                    self.disconnected = true;
                    return self.deliver_disconnect();
                }
            }
        }
    }

    fn deliver_disconnect(&mut self) -> anyhow::Result<SessionEvent> {
        if self.disconnect_event_fired {
            return Err(anyhow::anyhow!("session closed"));
        }
        self.disconnect_event_fired = true;
        Ok(SessionEvent::Disconnected)
    }
}

fn check_version(version: u16) -> anyhow::Result<()> {
    if version != PROTOCOL_VERSION {
        return Err(anyhow::anyhow!(
            "protocol version mismatch: expected {}, got {}",
            PROTOCOL_VERSION,
            version
        ));
    }
    Ok(())
}
