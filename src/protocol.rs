//! Wire vocabulary exchanged between two peer sessions.

use serde::{Deserialize, Serialize};

use crate::board::Shot;

/// Bumped whenever the wire format changes incompatibly. The handshake
/// rejects a peer speaking a different version.
pub const PROTOCOL_VERSION: u16 = 1;

/// Messages relayed over the peer channel. The channel is assumed
/// ordered and reliable; the session does not defend against reordering
/// or duplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// Joiner announces presence. `need_first_shot` is the joiner's coin
    /// flip deciding who shoots first, so the two sides need no shared
    /// RNG seed.
    Join { version: u16, need_first_shot: bool },
    /// Host acknowledges the join, echoing the complement of the
    /// joiner's coin flip: exactly one side is told "you shoot first".
    Ready { version: u16, need_first_shot: bool },
    /// Local ship placement is finalized.
    GameReady,
    /// Shooter relays the target cell.
    TakeShot { x: u8, y: u8 },
    /// Cell owner relays the computed outcome back to the shooter.
    ShotResult { shot: Shot },
    /// Explicit session close.
    Leave,
}
