use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::net::TcpListener;

use seabattle::transport::in_memory::InMemoryTransport;
use seabattle::{
    init_logging, CliPlayer, GameConfig, GameEngine, GameNode, GameOutcome, PeerSession, Player,
    RandomPlayer, TcpTransport,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Debug)]
enum PlayerType {
    Human,
    Random,
}

#[derive(Subcommand)]
enum Commands {
    /// Host a game: advertise a session id and wait for a peer to join.
    Host {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Fix RNG seed for reproducible games")]
        seed: Option<u64>,
    },
    /// Join a hosted game by its session id.
    Join {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Fix RNG seed for reproducible games")]
        seed: Option<u64>,
    },
    /// Play locally against a random opponent over an in-memory channel.
    Local {
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Fix RNG seed for reproducible games")]
        seed: Option<u64>,
    },
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

fn make_player(player: &PlayerType) -> Box<dyn Player> {
    match player {
        PlayerType::Human => Box::new(CliPlayer::new()),
        PlayerType::Random => Box::new(RandomPlayer::new()),
    }
}

fn print_outcome(outcome: GameOutcome) {
    match outcome {
        GameOutcome::Victory => println!("\nVictory! You sank the entire enemy fleet."),
        GameOutcome::Defeat => println!("\nDefeat. All your ships have been destroyed."),
        GameOutcome::PeerLeft => println!("\nYour opponent left the game."),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Host { bind, player, seed } => {
            let listener = TcpListener::bind(&bind).await?;
            let session_id = listener.local_addr()?.to_string();
            println!("Session id: {}", session_id);
            println!("Waiting for an opponent to join...");
            let (stream, addr) = listener.accept().await?;
            println!("Opponent connected from {}", addr);

            let session = PeerSession::host(Box::new(TcpTransport::new(stream)));
            let engine = GameEngine::new(GameConfig::default()).map_err(|e| anyhow::anyhow!(e))?;
            let mut node = GameNode::new(make_player(&player), engine, session);
            let mut rng = make_rng(seed);
            let outcome = node.run(&mut rng).await?;
            print_outcome(outcome);
        }
        Commands::Join {
            connect,
            player,
            seed,
        } => {
            println!("Joining session {}...", connect);
            let transport = TcpTransport::connect(&connect).await?;
            println!("Connected.");

            let session = PeerSession::join(Box::new(transport));
            let engine = GameEngine::new(GameConfig::default()).map_err(|e| anyhow::anyhow!(e))?;
            let mut node = GameNode::new(make_player(&player), engine, session);
            let mut rng = make_rng(seed);
            let outcome = node.run(&mut rng).await?;
            print_outcome(outcome);
        }
        Commands::Local { player, seed } => {
            let (host_side, join_side) = InMemoryTransport::pair();

            let engine = GameEngine::new(GameConfig::default()).map_err(|e| anyhow::anyhow!(e))?;
            let mut node = GameNode::new(
                make_player(&player),
                engine,
                PeerSession::host(Box::new(host_side)),
            );
            let mut rng = make_rng(seed);

            let opponent_engine =
                GameEngine::new(GameConfig::default()).map_err(|e| anyhow::anyhow!(e))?;
            let mut opponent = GameNode::new(
                Box::new(RandomPlayer::new()),
                opponent_engine,
                PeerSession::join(Box::new(join_side)),
            );
            let mut opponent_rng = make_rng(seed.map(|s| s.wrapping_add(1)));

            let opponent_task = tokio::spawn(async move {
                let _ = opponent.run(&mut opponent_rng).await;
            });

            let outcome = node.run(&mut rng).await?;
            print_outcome(outcome);
            opponent_task.await?;
        }
    }
    Ok(())
}
