use rand::rngs::SmallRng;
use rand::SeedableRng;
use seabattle::{
    Board, CellState, GameConfig, GameError, Orientation, Position, Ship, ShipClass, ShotResult,
};

fn pos(x: u8, y: u8) -> Position {
    Position::new(x, y)
}

#[test]
fn test_manual_place_and_sink() {
    let mut board = Board::empty(10);
    board
        .place_ship(Ship::new(2, pos(0, 0), Orientation::Horizontal, 10).unwrap())
        .unwrap();
    board
        .place_ship(Ship::new(1, pos(5, 5), Orientation::Horizontal, 10).unwrap())
        .unwrap();
    assert_eq!(board.unsunk_ship_count(), 2);

    let first = board.take_shot(pos(0, 0)).unwrap();
    assert_eq!(first.result, ShotResult::Hit);
    assert_eq!(first.affected_cells.len(), 1);
    assert_eq!(board.cell(pos(0, 0)).unwrap().state, CellState::Hit);

    let second = board.take_shot(pos(1, 0)).unwrap();
    assert_eq!(second.result, ShotResult::Sank);
    assert_eq!(board.unsunk_ship_count(), 1);

    // the sink reveals the whole exclusion area: x 0..=2, y 0..=1
    assert_eq!(second.affected_cells.len(), 6);
    assert_eq!(board.cell(pos(2, 0)).unwrap().state, CellState::Useless);
    assert_eq!(board.cell(pos(0, 1)).unwrap().state, CellState::Useless);
    assert_eq!(board.cell(pos(1, 1)).unwrap().state, CellState::Useless);
    assert_eq!(board.cell(pos(2, 1)).unwrap().state, CellState::Useless);
}

#[test]
fn test_last_ship_upgrades_sank_to_game_over() {
    let mut board = Board::empty(10);
    board
        .place_ship(Ship::new(1, pos(3, 3), Orientation::Vertical, 10).unwrap())
        .unwrap();

    let shot = board.take_shot(pos(3, 3)).unwrap();
    assert_eq!(shot.result, ShotResult::GameOver);
    assert!(board.all_sunk());
}

#[test]
fn test_miss_is_idempotent() {
    let mut board = Board::empty(10);
    board
        .place_ship(Ship::new(1, pos(9, 9), Orientation::Horizontal, 10).unwrap())
        .unwrap();

    let first = board.take_shot(pos(0, 0)).unwrap();
    let second = board.take_shot(pos(0, 0)).unwrap();
    assert_eq!(first.result, ShotResult::Miss);
    assert_eq!(second.result, ShotResult::Miss);
    assert_eq!(first.affected_cells, second.affected_cells);
    assert_eq!(board.cell(pos(0, 0)).unwrap().state, CellState::Miss);
}

#[test]
fn test_useless_cell_resolves_as_miss() {
    let mut board = Board::empty(10);
    board
        .place_ship(Ship::new(1, pos(0, 0), Orientation::Horizontal, 10).unwrap())
        .unwrap();
    board
        .place_ship(Ship::new(1, pos(5, 5), Orientation::Horizontal, 10).unwrap())
        .unwrap();

    board.take_shot(pos(0, 0)).unwrap();
    assert_eq!(board.cell(pos(1, 1)).unwrap().state, CellState::Useless);

    let shot = board.take_shot(pos(1, 1)).unwrap();
    assert_eq!(shot.result, ShotResult::Miss);
    assert_eq!(board.cell(pos(1, 1)).unwrap().state, CellState::Miss);
}

#[test]
fn test_reshooting_hit_cells_never_double_counts() {
    let mut board = Board::empty(10);
    board
        .place_ship(Ship::new(3, pos(0, 0), Orientation::Horizontal, 10).unwrap())
        .unwrap();
    board
        .place_ship(Ship::new(1, pos(5, 5), Orientation::Horizontal, 10).unwrap())
        .unwrap();

    board.take_shot(pos(0, 0)).unwrap();
    assert_eq!(board.ships()[0].hits(), 1);

    // re-shooting the damaged deck is a plain hit and adds no damage
    let again = board.take_shot(pos(0, 0)).unwrap();
    assert_eq!(again.result, ShotResult::Hit);
    assert_eq!(board.ships()[0].hits(), 1);

    board.take_shot(pos(1, 0)).unwrap();
    let sank = board.take_shot(pos(2, 0)).unwrap();
    assert_eq!(sank.result, ShotResult::Sank);
    assert_eq!(board.unsunk_ship_count(), 1);

    // a sunk ship's cells never re-decrement the counter
    let after = board.take_shot(pos(2, 0)).unwrap();
    assert_eq!(after.result, ShotResult::Hit);
    assert_eq!(board.unsunk_ship_count(), 1);
}

#[test]
fn test_spacing_buffer_rejects_adjacent_placement() {
    let mut board = Board::empty(10);
    board
        .place_ship(Ship::new(2, pos(0, 0), Orientation::Horizontal, 10).unwrap())
        .unwrap();

    // straight and diagonal neighbors are all inside the buffer
    for candidate in [pos(2, 0), pos(0, 1), pos(2, 1), pos(1, 1)] {
        let ship = Ship::new(1, candidate, Orientation::Horizontal, 10).unwrap();
        assert_eq!(board.place_ship(ship), Err(GameError::PlacementConflict));
    }

    // one cell past the buffer is legal
    let ship = Ship::new(1, pos(3, 0), Orientation::Horizontal, 10).unwrap();
    assert!(board.place_ship(ship).is_ok());
}

#[test]
fn test_ship_must_fit_inside_board() {
    assert_eq!(
        Ship::new(4, pos(7, 0), Orientation::Horizontal, 10).unwrap_err(),
        GameError::ShipOutOfBounds
    );
    assert_eq!(
        Ship::new(4, pos(0, 7), Orientation::Vertical, 10).unwrap_err(),
        GameError::ShipOutOfBounds
    );
    // a run ending exactly at the edge is legal
    assert!(Ship::new(4, pos(6, 0), Orientation::Horizontal, 10).is_ok());
    assert!(Ship::new(1, pos(9, 9), Orientation::Vertical, 10).is_ok());
}

#[test]
fn test_shot_out_of_bounds_is_an_error() {
    let mut board = Board::empty(10);
    assert_eq!(
        board.take_shot(pos(10, 0)).unwrap_err(),
        GameError::OutOfBounds { x: 10, y: 0 }
    );
}

#[test]
fn test_random_fleet_respects_spacing_and_totals() {
    let config = GameConfig::default();
    let mut rng = SmallRng::seed_from_u64(42);
    let board = Board::with_random_fleet(config.board_size, &config.fleet, &mut rng).unwrap();

    assert_eq!(board.ships().len(), config.total_ships());
    assert_eq!(board.unsunk_ship_count(), config.total_ships());

    let deck_cells = board
        .cells()
        .iter()
        .filter(|c| c.state == CellState::Ship)
        .count();
    assert_eq!(deck_cells, config.total_deck_cells());

    // no deck cell of one ship inside another ship's exclusion area
    for (id, ship) in board.ships().iter().enumerate() {
        for p in ship.exclusion_area(board.size()) {
            let cell = board.cell(p).unwrap();
            if cell.state == CellState::Ship {
                assert_eq!(cell.ship, Some(id), "ships touch around {}", p);
            }
        }
    }
}

#[test]
fn test_placement_exhaustion_fails_fast() {
    // Nine 2-deck ships with spacing buffers cannot fit a 4×4 board;
    // the attempt budget must turn that into an error, not a livelock.
    let fleet = [ShipClass::new(2, 9)];
    let mut rng = SmallRng::seed_from_u64(7);
    let err = Board::with_random_fleet(4, &fleet, &mut rng).unwrap_err();
    assert_eq!(err, GameError::PlacementExhausted { decks: 2 });
}

#[test]
fn test_config_validation() {
    let mut config = GameConfig::default();
    assert!(config.validate().is_ok());

    config.board_size = 0;
    assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

    config.board_size = 27;
    assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

    config = GameConfig::default();
    config.fleet = vec![];
    assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

    config.fleet = vec![ShipClass::new(5, 1)];
    assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

    config.fleet = vec![ShipClass::new(0, 1)];
    assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

    config.fleet = vec![ShipClass::new(4, 0)];
    assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
}
