use crate::board::{Board, GameOutcome, Player};
use crate::minimax::MinimaxSearch;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, warn};

/// Something that picks moves: a search, a random player, or a human behind a front end.
pub trait Agent<T: Board> {
    /// Returns the move to play on `board`, or `None` if the agent has nothing to play.
    fn choose_move(&mut self, board: &T) -> Option<T::Move>;
}

/// An agent that always plays the minimax-optimal move.
#[derive(Debug, Default, Copy, Clone)]
pub struct MinimaxAgent;

impl<T: Board> Agent<T> for MinimaxAgent {
    fn choose_move(&mut self, board: &T) -> Option<T::Move> {
        match MinimaxSearch::new(board.clone()).best_move() {
            Ok(b_move) => b_move,
            Err(error) => {
                warn!(%error, "minimax agent could not search");
                None
            }
        }
    }
}

/// An agent that plays a uniformly random legal move.
#[derive(Debug, Clone)]
pub struct RandomAgent<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomAgent<R> {
    /// Creates an agent that draws its moves from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomAgent<StdRng> {
    /// Creates an agent that plays the same moves for the same seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<T: Board, R: Rng> Agent<T> for RandomAgent<R> {
    fn choose_move(&mut self, board: &T) -> Option<T::Move> {
        board.available_moves().choose(&mut self.rng).copied()
    }
}

/// A finished game.
#[derive(Debug, Clone)]
pub struct MatchRecord<T: Board> {
    /// Every move, in the order it was played.
    pub moves: Vec<T::Move>,
    pub final_board: T,
    pub outcome: GameOutcome,
}

/// Why a match ended before the game was over.
#[derive(Debug, Error)]
pub enum MatchError<E> {
    /// The agent to move had nothing to play.
    #[error("agent returned no move on a board that is still in progress")]
    NoMove,

    /// The board rejected the agent's move.
    #[error("agent played an illegal move: {0}")]
    IllegalMove(#[from] E),
}

/// Plays `board` to the end.
///
/// `max_agent` moves for the maximizing player and `min_agent` for the minimizing one.
pub fn play_match<T: Board>(
    board: T,
    max_agent: &mut dyn Agent<T>,
    min_agent: &mut dyn Agent<T>,
) -> Result<MatchRecord<T>, MatchError<T::Error>> {
    let mut board = board;
    let mut moves = Vec::new();

    while !board.is_terminal() {
        let player = board.current_player();
        let b_move = match player {
            Player::Max => max_agent.choose_move(&board),
            Player::Min => min_agent.choose_move(&board),
        }
        .ok_or(MatchError::NoMove)?;
        debug!(?player, ?b_move, "move played");
        board = board.result(&b_move)?;
        moves.push(b_move);
    }

    let outcome = board.outcome();
    debug!(?outcome, moves = moves.len(), "match finished");
    Ok(MatchRecord {
        moves,
        final_board: board,
        outcome,
    })
}
