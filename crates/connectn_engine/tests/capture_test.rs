//! Capture variants driven through real drops.

use connectn_engine::{Cell, Coord, Game, GameConfig, GameMode, MoveResult, Seat};

fn play_all(game: &mut Game, columns: &[usize]) {
    for &column in columns {
        let outcome = game.play(column).unwrap();
        assert!(
            outcome.captured.is_empty(),
            "unexpected capture at column {column}"
        );
    }
}

#[test]
fn test_adjacent_lone_cell_captured_when_enclosed() {
    let config = GameConfig::new(3, 5, 4, GameMode::AdjacentCapture).unwrap();
    let mut game = Game::new(config).unwrap();
    play_all(&mut game, &[0, 1, 0, 4, 1, 3, 2, 4]);

    let outcome = game.play(2).unwrap();
    assert_eq!(outcome.mover, Seat::One);
    assert_eq!(outcome.captured, vec![Coord::new(2, 1)]);
    assert_eq!(game.board().get(2, 1), Ok(Cell::Occupied(Seat::One)));
    assert_eq!(outcome.result, MoveResult::Continue { next: Seat::Two });
}

#[test]
fn test_adjacent_lone_cell_with_gap_survives() {
    let config = GameConfig::new(3, 5, 4, GameMode::AdjacentCapture).unwrap();
    let mut game = Game::new(config).unwrap();
    play_all(&mut game, &[0, 1, 0, 4, 1, 3, 2, 4]);

    let outcome = game.play(3).unwrap();
    assert!(outcome.captured.is_empty());
    assert_eq!(game.board().get(2, 1), Ok(Cell::Occupied(Seat::Two)));
}

#[test]
fn test_group_without_liberty_captured_in_full() {
    let config = GameConfig::new(3, 6, 5, GameMode::GroupCapture).unwrap();
    let mut game = Game::new(config).unwrap();
    play_all(&mut game, &[0, 1, 3, 2, 1, 5]);

    let outcome = game.play(2).unwrap();
    assert_eq!(outcome.captured, vec![Coord::new(2, 1), Coord::new(2, 2)]);
    for col in 0..4 {
        assert_eq!(game.board().get(2, col), Ok(Cell::Occupied(Seat::One)));
    }
    assert_eq!(game.board().get(2, 5), Ok(Cell::Occupied(Seat::Two)));
}

#[test]
fn test_group_with_liberty_untouched() {
    let config = GameConfig::new(3, 6, 5, GameMode::GroupCapture).unwrap();
    let mut game = Game::new(config).unwrap();
    play_all(&mut game, &[0, 1, 3, 2, 1, 5]);

    let outcome = game.play(4).unwrap();
    assert!(outcome.captured.is_empty());
    assert_eq!(game.board().get(2, 1), Ok(Cell::Occupied(Seat::Two)));
    assert_eq!(game.board().get(2, 2), Ok(Cell::Occupied(Seat::Two)));
}

#[test]
fn test_same_moves_in_classic_never_capture() {
    let config = GameConfig::new(3, 6, 5, GameMode::Classic).unwrap();
    let mut game = Game::new(config).unwrap();
    play_all(&mut game, &[0, 1, 3, 2, 1, 5, 2]);
    assert_eq!(game.board().get(2, 1), Ok(Cell::Occupied(Seat::Two)));
}
