use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::json;

use seabattle::transport::in_memory::InMemoryTransport;
use seabattle::{GameConfig, GameEngine, GameNode, GameOutcome, PeerSession, RandomPlayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <host_seed> <join_seed>", args[0]);
        std::process::exit(1);
    }
    let host_seed: u64 = args[1].parse()?;
    let join_seed: u64 = args[2].parse()?;

    let mut host_rng = SmallRng::seed_from_u64(host_seed);
    let mut join_rng = SmallRng::seed_from_u64(join_seed);

    let (host_side, join_side) = InMemoryTransport::pair();

    let host_future = async move {
        let engine = GameEngine::new(GameConfig::default()).map_err(|e| anyhow::anyhow!(e))?;
        let mut node = GameNode::new(
            Box::new(RandomPlayer::new()),
            engine,
            PeerSession::host(Box::new(host_side)),
        );
        let outcome = node.run(&mut host_rng).await?;
        Ok::<(GameOutcome, usize), anyhow::Error>((outcome, node.shots_fired()))
    };

    let join_future = async move {
        let engine = GameEngine::new(GameConfig::default()).map_err(|e| anyhow::anyhow!(e))?;
        let mut node = GameNode::new(
            Box::new(RandomPlayer::new()),
            engine,
            PeerSession::join(Box::new(join_side)),
        );
        let outcome = node.run(&mut join_rng).await?;
        Ok::<(GameOutcome, usize), anyhow::Error>((outcome, node.shots_fired()))
    };

    let (host_res, join_res) = tokio::try_join!(host_future, join_future)?;

    let winner = match (host_res.0, join_res.0) {
        (GameOutcome::Victory, GameOutcome::Defeat) => Some("host"),
        (GameOutcome::Defeat, GameOutcome::Victory) => Some("join"),
        _ => None,
    };

    let result = json!({
        "host": {"outcome": format!("{:?}", host_res.0), "shots": host_res.1},
        "join": {"outcome": format!("{:?}", join_res.0), "shots": join_res.1},
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
