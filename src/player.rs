//! Player trait and implementations: the local input source a game node
//! consults for placement approval and target selection.

use std::io::{self, BufRead, Write};

use rand::rngs::SmallRng;
use rand::Rng;

use crate::board::{Board, Shot};
use crate::common::{Position, ShotResult};
use crate::render::{render_fleet, render_projection};

/// Interface implemented by the different player types.
pub trait Player: Send {
    /// Called during the placement phase after each (re)placement.
    /// Return `true` to discard the layout and reshuffle.
    fn wants_reshuffle(&mut self, _fleet: &Board) -> bool {
        false
    }

    /// Choose the next target. Implementations must return a cell that
    /// is still `Empty` on the projection.
    fn select_target(&mut self, rng: &mut SmallRng, projection: &Board) -> Position;

    /// Outcome of our own last shot, as relayed by the peer.
    fn handle_shot_result(&mut self, _target: Position, _shot: &Shot) {}

    /// An opponent shot resolved against our fleet.
    fn handle_opponent_shot(&mut self, _target: Position, _shot: &Shot) {}
}

/// Automated player shooting uniformly at unexplored cells, like the
/// original demo opponent.
pub struct RandomPlayer;

impl RandomPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for RandomPlayer {
    fn select_target(&mut self, rng: &mut SmallRng, projection: &Board) -> Position {
        let open: Vec<Position> = projection.empty_positions().collect();
        // A game always ends before the projection runs out of cells.
        open[rng.random_range(0..open.len())]
    }
}

/// Interactive command-line player.
pub struct CliPlayer;

impl CliPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CliPlayer {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_coord(input: &str, board_size: u8) -> Result<Position, String> {
    let input = input.trim();
    if input.len() < 2 {
        return Err("need column letter and row number, e.g. B7".to_string());
    }
    let mut chars = input.chars();
    let col_ch = chars.next().ok_or("no column letter")?.to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("invalid column '{}'", col_ch));
    }
    let x = (col_ch as u8).wrapping_sub(b'A');
    if x >= board_size {
        return Err(format!("column '{}' out of bounds", col_ch));
    }
    let row_str: String = chars.collect();
    let row: u8 = row_str
        .parse()
        .map_err(|_| format!("invalid row '{}'", row_str))?;
    if row == 0 || row > board_size {
        return Err(format!("row {} out of bounds", row));
    }
    Ok(Position::new(x, row - 1))
}

fn prompt_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
    line
}

impl Player for CliPlayer {
    fn wants_reshuffle(&mut self, fleet: &Board) -> bool {
        println!("\nYour ships:");
        println!("{}", render_fleet(fleet));
        let answer = prompt_line("[enter] start game, [r] reshuffle ships: ");
        answer.trim().eq_ignore_ascii_case("r")
    }

    fn select_target(&mut self, _rng: &mut SmallRng, projection: &Board) -> Position {
        println!("\nOpponent waters:");
        println!("{}", render_projection(projection));
        loop {
            let line = prompt_line("Your shot (e.g. B7): ");
            match parse_coord(&line, projection.size()) {
                Ok(position) => {
                    if projection
                        .cell(position)
                        .is_some_and(|c| c.state == crate::board::CellState::Empty)
                    {
                        return position;
                    }
                    println!("{} was already resolved, pick another cell", position);
                }
                Err(reason) => println!("{}", reason),
            }
        }
    }

    fn handle_shot_result(&mut self, target: Position, shot: &Shot) {
        match shot.result {
            ShotResult::Miss => println!("{}: miss.", target),
            ShotResult::Hit => println!("{}: hit!", target),
            ShotResult::Sank => println!("{}: ship sunk!", target),
            ShotResult::GameOver => println!("{}: fleet destroyed!", target),
        }
    }

    fn handle_opponent_shot(&mut self, target: Position, shot: &Shot) {
        match shot.result {
            ShotResult::Miss => println!("Opponent shot {} and missed.", target),
            ShotResult::Hit => println!("Opponent hit your ship at {}!", target),
            ShotResult::Sank => println!("Opponent sank your ship at {}!", target),
            ShotResult::GameOver => println!("Opponent destroyed your fleet at {}.", target),
        }
    }
}
