use crate::board::{Board, Player};
use crate::cancel::{Cancellation, NeverCancelled};
use thiserror::Error;
use tracing::{debug, instrument, trace};

/// The main struct for running an exhaustive minimax search.
///
/// It holds the board to search from, the cancellation signal and the statistics of the last search.
/// Every node of the game tree below the board is visited, there is no pruning and no depth limit.
pub struct MinimaxSearch<T: Board, C: Cancellation = NeverCancelled> {
    board: T,
    cancellation: C,
    stats: SearchStats,
}

/// A builder for creating instances of `MinimaxSearch`.
pub struct MinimaxSearchBuilder<T: Board, C: Cancellation> {
    board: T,
    cancellation: C,
}

impl<T: Board> MinimaxSearchBuilder<T, NeverCancelled> {
    /// Creates a new builder with the given board state.
    pub fn new(board: T) -> Self {
        Self {
            board,
            cancellation: NeverCancelled,
        }
    }
}

impl<T: Board, C: Cancellation> MinimaxSearchBuilder<T, C> {
    /// Sets the signal that can stop the search early.
    pub fn with_cancellation<D: Cancellation>(
        self,
        cancellation: D,
    ) -> MinimaxSearchBuilder<T, D> {
        MinimaxSearchBuilder {
            board: self.board,
            cancellation,
        }
    }

    /// Builds the `MinimaxSearch` instance with the configured parameters.
    pub fn build(self) -> MinimaxSearch<T, C> {
        MinimaxSearch {
            board: self.board,
            cancellation: self.cancellation,
            stats: SearchStats::default(),
        }
    }
}

impl<T: Board> MinimaxSearch<T, NeverCancelled> {
    /// Creates a search that cannot be cancelled.
    pub fn new(board: T) -> Self {
        MinimaxSearchBuilder::new(board).build()
    }

    /// Returns a new builder for `MinimaxSearch`.
    pub fn builder(board: T) -> MinimaxSearchBuilder<T, NeverCancelled> {
        MinimaxSearchBuilder::new(board)
    }
}

impl<T: Board, C: Cancellation> MinimaxSearch<T, C> {
    /// Returns the board the search starts from.
    pub fn board(&self) -> &T {
        &self.board
    }

    /// Returns the statistics of the most recent search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Returns the optimal move for the player to move, or `None` if the game is over.
    ///
    /// The maximizer picks the move with the greatest value,
    /// the minimizer the one with the smallest.
    /// Ties go to the move that comes first in [`Board::available_moves`].
    #[instrument(level = "debug", skip_all)]
    pub fn best_move(&mut self) -> Result<Option<T::Move>, SearchError<T::Error>> {
        if self.board.is_terminal() {
            self.stats = SearchStats::default();
            return Ok(None);
        }

        let player = self.board.current_player();
        let mut best: Option<ScoredMove<T::Move>> = None;
        for candidate in self.scored_moves()? {
            let is_better = match best {
                None => true,
                Some(current) => match player {
                    Player::Max => candidate.value > current.value,
                    Player::Min => candidate.value < current.value,
                },
            };
            if is_better {
                best = Some(candidate);
            }
        }

        debug!(
            ?player,
            best = ?best,
            nodes_visited = self.stats.nodes_visited,
            "search finished"
        );
        Ok(best.map(|scored| scored.b_move))
    }

    /// Returns the minimax value of the board,
    /// the utility reached when both players play optimally.
    pub fn value(&mut self) -> Result<i8, SearchError<T::Error>> {
        if self.board.is_terminal() {
            self.stats = SearchStats::default();
            return Ok(self.board.utility());
        }

        let values = self.scored_moves()?.into_iter().map(|scored| scored.value);
        let value = match self.board.current_player() {
            Player::Max => values.max(),
            Player::Min => values.min(),
        };
        Ok(value.unwrap_or_else(|| self.board.utility()))
    }

    /// Returns every legal move from the board together with its minimax value,
    /// in the order of [`Board::available_moves`].
    pub fn scored_moves(&mut self) -> Result<Vec<ScoredMove<T::Move>>, SearchError<T::Error>> {
        self.stats = SearchStats::default();
        let player = self.board.current_player();
        let moves = self.board.available_moves();
        let mut scored = Vec::with_capacity(moves.len());

        for b_move in moves {
            let child = self.board.result(&b_move)?;
            let value = match player {
                Player::Max => self.min_value(child)?,
                Player::Min => self.max_value(child)?,
            };
            trace!(?b_move, value, "scored move");
            scored.push(ScoredMove { b_move, value });
        }

        Ok(scored)
    }

    /// The best value the maximizer can force from `state`.
    fn max_value(&mut self, state: T) -> Result<i8, SearchError<T::Error>> {
        if let Some(utility) = self.visit(&state)? {
            return Ok(utility);
        }

        let mut value = i8::MIN;
        for b_move in state.available_moves() {
            value = value.max(self.min_value(state.result(&b_move)?)?);
        }
        Ok(value)
    }

    /// The best value the minimizer can force from `state`.
    fn min_value(&mut self, state: T) -> Result<i8, SearchError<T::Error>> {
        if let Some(utility) = self.visit(&state)? {
            return Ok(utility);
        }

        let mut value = i8::MAX;
        for b_move in state.available_moves() {
            value = value.min(self.max_value(state.result(&b_move)?)?);
        }
        Ok(value)
    }

    /// Counts a visited node. Returns the utility if the node is a leaf.
    fn visit(&mut self, state: &T) -> Result<Option<i8>, SearchError<T::Error>> {
        if self.cancellation.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        self.stats.nodes_visited += 1;
        if state.is_terminal() {
            self.stats.terminal_nodes += 1;
            return Ok(Some(state.utility()));
        }
        Ok(None)
    }
}

/// A legal move and the minimax value of the board it leads to.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct ScoredMove<M> {
    pub b_move: M,
    pub value: i8,
}

/// Counters collected while searching.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub struct SearchStats {
    /// The number of boards below the root that were evaluated.
    pub nodes_visited: u64,
    /// How many of the visited boards were terminal.
    pub terminal_nodes: u64,
}

/// Why a search stopped without an answer.
#[derive(Debug, Error)]
pub enum SearchError<E> {
    /// The cancellation signal fired before the search finished.
    #[error("search was cancelled")]
    Cancelled,

    /// The board rejected one of the moves it generated itself.
    #[error("board rejected a generated move: {0}")]
    IllegalMove(#[from] E),
}
