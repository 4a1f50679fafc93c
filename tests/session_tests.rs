use seabattle::transport::in_memory::InMemoryTransport;
use seabattle::transport::Transport;
use seabattle::{
    Message, PeerSession, Position, ReadyBarrier, SessionEvent, SessionRole, PROTOCOL_VERSION,
};

#[test]
fn test_ready_barrier_fires_exactly_once() {
    let mut barrier = ReadyBarrier::new();
    assert!(!barrier.record_local());
    assert!(barrier.record_peer());
    assert!(barrier.is_complete());

    // every later record reports false, whichever side repeats
    assert!(!barrier.record_peer());
    assert!(!barrier.record_local());

    // and the opposite arrival order fires on the local side
    barrier.reset();
    assert!(!barrier.record_peer());
    assert!(barrier.record_local());
    assert!(!barrier.record_local());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_handshake_complement_flip() -> anyhow::Result<()> {
    let (host_side, join_side) = InMemoryTransport::pair();
    let mut host = PeerSession::host(Box::new(host_side));
    let mut joiner = PeerSession::join(Box::new(join_side));
    assert_eq!(host.role(), SessionRole::Host);
    assert_eq!(joiner.role(), SessionRole::Joiner);

    let host_task = tokio::spawn(async move {
        let first = host.host_handshake().await.unwrap();
        (host, first)
    });
    let joiner_first = joiner.join_handshake(true).await?;
    let (_host, host_first) = host_task.await?;

    // joiner flipped true: the host proceeds as if the flip were true
    // and the joiner is handed the complement
    assert!(host_first);
    assert!(!joiner_first);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_handshake_complement_flip_false() -> anyhow::Result<()> {
    let (host_side, join_side) = InMemoryTransport::pair();
    let mut host = PeerSession::host(Box::new(host_side));
    let mut joiner = PeerSession::join(Box::new(join_side));

    let host_task = tokio::spawn(async move { host.host_handshake().await.unwrap() });
    let joiner_first = joiner.join_handshake(false).await?;
    let host_first = host_task.await?;

    assert!(!host_first);
    assert!(joiner_first);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_handshake_rejects_version_mismatch() -> anyhow::Result<()> {
    let (host_side, mut join_side) = InMemoryTransport::pair();
    let mut host = PeerSession::host(Box::new(host_side));

    join_side
        .send(Message::Join {
            version: PROTOCOL_VERSION + 1,
            need_first_shot: true,
        })
        .await?;
    assert!(host.host_handshake().await.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_readiness_rendezvous_each_side_starts_once() -> anyhow::Result<()> {
    let (host_side, join_side) = InMemoryTransport::pair();
    let mut host = PeerSession::host(Box::new(host_side));
    let mut joiner = PeerSession::join(Box::new(join_side));

    let host_task = tokio::spawn(async move {
        host.host_handshake().await.unwrap();
        let fired_on_send = host.send_game_ready().await.unwrap();
        let event = host.next_event().await.unwrap();
        (fired_on_send, event)
    });

    joiner.join_handshake(true).await?;
    let fired_on_send = joiner.send_game_ready().await?;
    assert!(!fired_on_send);
    assert_eq!(joiner.next_event().await?, SessionEvent::GameStarted);

    let (host_fired_on_send, host_event) = host_task.await?;
    assert!(!host_fired_on_send);
    assert_eq!(host_event, SessionEvent::GameStarted);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shot_relay_roundtrip() -> anyhow::Result<()> {
    let (host_side, join_side) = InMemoryTransport::pair();
    let mut host = PeerSession::host(Box::new(host_side));
    let mut joiner = PeerSession::join(Box::new(join_side));

    let host_task = tokio::spawn(async move {
        host.host_handshake().await.unwrap();
        host.send_shot(Position::new(3, 7)).await.unwrap();
        host.next_event().await.unwrap()
    });

    joiner.join_handshake(false).await?;
    match joiner.next_event().await? {
        SessionEvent::ShotRequested { position } => {
            assert_eq!(position, Position::new(3, 7));
            let shot = seabattle::Shot {
                result: seabattle::ShotResult::Miss,
                affected_cells: vec![seabattle::AffectedCell {
                    position,
                    state: seabattle::CellState::Miss,
                }],
            };
            joiner.send_shot_result(shot).await?;
        }
        other => panic!("expected a shot request, got {:?}", other),
    }

    match host_task.await? {
        SessionEvent::ShotResolved { shot } => {
            assert_eq!(shot.result, seabattle::ShotResult::Miss)
        }
        other => panic!("expected a shot result, got {:?}", other),
    }
    Ok(())
}

/// Explicit leave followed by the channel dying must produce exactly one
/// `Disconnected` event, never two.
#[tokio::test(flavor = "multi_thread")]
async fn test_disconnect_fires_once_for_both_close_paths() -> anyhow::Result<()> {
    let (host_side, join_side) = InMemoryTransport::pair();
    let mut host = PeerSession::host(Box::new(host_side));
    let mut joiner = PeerSession::join(Box::new(join_side));

    let host_task = tokio::spawn(async move {
        host.host_handshake().await.unwrap();
        // close message and channel teardown arrive back to back
        host.leave().await.unwrap();
        drop(host);
    });

    joiner.join_handshake(true).await?;
    assert_eq!(joiner.next_event().await?, SessionEvent::Disconnected);
    assert!(joiner.is_disconnected());

    // the second close path must not produce a second event
    assert!(joiner.next_event().await.is_err());

    host_task.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_disconnect_fires_once_on_silent_drop() -> anyhow::Result<()> {
    let (host_side, join_side) = InMemoryTransport::pair();
    let mut host = PeerSession::host(Box::new(host_side));
    let mut joiner = PeerSession::join(Box::new(join_side));

    let host_task = tokio::spawn(async move {
        host.host_handshake().await.unwrap();
        host
    });

    joiner.join_handshake(true).await?;
    let host = host_task.await?;
    drop(host);

    assert_eq!(joiner.next_event().await?, SessionEvent::Disconnected);
    assert!(joiner.next_event().await.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sends_after_disconnect_are_noops() -> anyhow::Result<()> {
    let (host_side, join_side) = InMemoryTransport::pair();
    let mut host = PeerSession::host(Box::new(host_side));
    let mut joiner = PeerSession::join(Box::new(join_side));

    let host_task = tokio::spawn(async move {
        host.host_handshake().await.unwrap();
        host.leave().await.unwrap();
    });

    joiner.join_handshake(true).await?;
    assert_eq!(joiner.next_event().await?, SessionEvent::Disconnected);

    // all sends must be swallowed without error once the session is dead
    joiner.send_shot(Position::new(0, 0)).await?;
    joiner
        .send_shot_result(seabattle::Shot {
            result: seabattle::ShotResult::Miss,
            affected_cells: vec![],
        })
        .await?;
    assert!(!joiner.send_game_ready().await?);
    joiner.leave().await?;

    host_task.await?;
    Ok(())
}
