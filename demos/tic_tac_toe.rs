extern crate minimax_lib;

use minimax_lib::agent::{MinimaxAgent, RandomAgent, play_match};
use minimax_lib::board::GameOutcome;
use minimax_lib::boards::tic_tac_toe::{initial_state, result};
use minimax_lib::minimax::MinimaxSearch;
use tracing_subscriber::EnvFilter;

const DEFAULT_SEED: u64 = 3819201;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // The first argument, if it is a number, seeds the random opponent
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    // Play a game: minimax as X, a random player as O
    let mut random = RandomAgent::from_seed(seed);
    let record = match play_match(initial_state(), &mut MinimaxAgent, &mut random) {
        Ok(record) => record,
        Err(error) => {
            eprintln!("The game could not be finished: {error}");
            std::process::exit(1);
        }
    };

    let mut board = initial_state();
    for action in &record.moves {
        board = match result(&board, *action) {
            Ok(board) => board,
            Err(error) => {
                eprintln!("Could not replay {action}: {error}");
                std::process::exit(1);
            }
        };
        println!("{action}:\n{board}\n");
    }

    let outcome = match record.outcome {
        GameOutcome::MaxWins => "X wins",
        GameOutcome::MinWins => "O wins",
        GameOutcome::Draw => "Draw",
        GameOutcome::InProgress => "Unfinished",
    };
    println!("{outcome} after {} moves", record.moves.len());
    assert_ne!(record.outcome, GameOutcome::MinWins);

    // Print the value of every reply to the first move
    let Some(&opening) = record.moves.first() else {
        return;
    };
    let Ok(board) = result(&initial_state(), opening) else {
        return;
    };
    let mut search = MinimaxSearch::new(board);
    match search.scored_moves() {
        Ok(scored) => {
            for scored_move in scored {
                println!("Reply: {} = {}", scored_move.b_move, scored_move.value);
            }
            println!("Searched {} boards", search.stats().nodes_visited);
        }
        Err(error) => eprintln!("Search failed: {error}"),
    }
}
