//! Single-device hot-seat play.
//!
//! Both seats share one terminal. The same [`Game`] driver the server wraps
//! decides every move, so local and networked games agree move for move.

use connectn_engine::{Game, GameConfig, MoveResult, Outcome, Seat};
use std::io::{self, BufRead, Write};
use tracing::{info, instrument};

fn symbol(seat: Seat) -> char {
    match seat {
        Seat::One => 'X',
        Seat::Two => 'O',
    }
}

/// Plays one game on `input`/`output`.
///
/// Commands: a column number drops a piece, `r` restarts, `q` quits.
/// Returns the outcome, or `None` if the players quit or input ended.
#[instrument(skip(input, output))]
pub fn play_local<R: BufRead, W: Write>(
    config: GameConfig,
    mut input: R,
    mut output: W,
) -> io::Result<Option<Outcome>> {
    let mut game = Game::new(config).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut line = String::new();

    loop {
        writeln!(output, "\n{}\n", game.board().display())?;
        write!(
            output,
            "Player {} ({}), column 0-{} (r = restart, q = quit): ",
            game.to_move(),
            symbol(game.to_move()),
            config.cols() - 1
        )?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let column = match line.trim() {
            "q" => return Ok(None),
            "r" => {
                game.reset();
                writeln!(output, "New game.")?;
                continue;
            }
            other => match other.parse::<usize>() {
                Ok(column) => column,
                Err(_) => {
                    writeln!(output, "Enter a column number.")?;
                    continue;
                }
            },
        };

        let outcome = match game.play(column) {
            Ok(outcome) => outcome,
            Err(e) => {
                writeln!(output, "{}", e)?;
                continue;
            }
        };

        if !outcome.captured.is_empty() {
            let cells: Vec<String> = outcome.captured.iter().map(ToString::to_string).collect();
            writeln!(output, "Captured {}", cells.join(" "))?;
        }

        match outcome.result {
            MoveResult::Continue { .. } => {}
            MoveResult::Won(won) => {
                writeln!(output, "\n{}\n", game.board().display())?;
                writeln!(output, "Player {} wins!", won.seat)?;
                info!(winner = %won.seat, moves = game.history().len(), "Local game won");
                return Ok(game.outcome().cloned());
            }
            MoveResult::Draw => {
                writeln!(output, "\n{}\n", game.board().display())?;
                writeln!(output, "It's a draw!")?;
                info!(moves = game.history().len(), "Local game drawn");
                return Ok(game.outcome().cloned());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connectn_engine::GameMode;

    fn run(config: GameConfig, script: &str) -> (Option<Outcome>, String) {
        let mut out = Vec::new();
        let outcome = play_local(config, script.as_bytes(), &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_bottom_row_win() {
        let (outcome, transcript) = run(GameConfig::default(), "0\n0\n1\n1\n2\n2\n3\n");
        assert_eq!(outcome.and_then(|o| o.winner()), Some(Seat::One));
        assert!(transcript.contains("Player 1 wins!"));
    }

    #[test]
    fn test_bad_input_reprompts() {
        let (outcome, transcript) = run(GameConfig::default(), "x\n9\nq\n");
        assert!(outcome.is_none());
        assert!(transcript.contains("Enter a column number."));
        assert!(transcript.contains("Column 9 does not exist"));
    }

    #[test]
    fn test_restart_clears_board() {
        let config = GameConfig::new(3, 3, 3, GameMode::Classic).unwrap();
        let (outcome, transcript) = run(config, "0\nr\n");
        assert!(outcome.is_none());
        assert!(transcript.contains("New game."));
        assert!(transcript.trim_end().ends_with("Player 1 (X), column 0-2 (r = restart, q = quit):"));
    }
}
