//! Terminal rendering of board snapshots for the CLI player.

use std::fmt::Write;

use crate::board::{Board, CellState};

fn glyph(state: CellState, reveal_ships: bool) -> char {
    match state {
        CellState::Empty => '.',
        CellState::Useless => '*',
        CellState::Ship => {
            if reveal_ships {
                'S'
            } else {
                '.'
            }
        }
        CellState::Hit => 'X',
        CellState::Miss => 'o',
    }
}

fn render(board: &Board, reveal_ships: bool) -> String {
    let size = board.size();
    let mut out = String::new();
    let _ = write!(out, "    ");
    for x in 0..size {
        let _ = write!(out, " {}", (b'A' + x) as char);
    }
    let _ = writeln!(out);
    for y in 0..size {
        let _ = write!(out, " {:2} ", y + 1);
        for x in 0..size {
            let state = board
                .cell(crate::common::Position::new(x, y))
                .map(|c| c.state)
                .unwrap_or(CellState::Empty);
            let _ = write!(out, " {}", glyph(state, reveal_ships));
        }
        let _ = writeln!(out);
    }
    let _ = write!(
        out,
        "    Legend: {}X=hit  o=miss  *=no ship  .=water",
        if reveal_ships { "S=ship  " } else { "" }
    );
    out
}

/// The local fleet board, ships revealed.
pub fn render_fleet(board: &Board) -> String {
    render(board, true)
}

/// The opponent projection: only what relayed shots have revealed.
pub fn render_projection(board: &Board) -> String {
    render(board, false)
}
