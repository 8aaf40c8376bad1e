use std::fmt::Debug;

/// The central trait of the library, defining the interface for a game state.
///
/// To search a custom game with minimax, this trait must be implemented.
/// It provides the search engine with the necessary methods to understand and interact with the game logic.
///
/// Boards are treated as values: [`Board::result`] must never modify `self`, it returns a new,
/// independent board instead. The search relies on this to give every branch of the game tree its own state.
pub trait Board: Default + Clone {
    /// The type representing a move in the game. This could be a simple `u8` for a board position
    /// or a more complex struct for games with intricate actions.
    type Move: Copy + Debug;

    /// The error returned when a move cannot be applied to a board.
    type Error: std::error::Error + 'static;

    /// Returns the player whose turn it is to make a move.
    fn current_player(&self) -> Player;

    /// Returns `true` if the game is over.
    fn is_terminal(&self) -> bool;

    /// Returns the score of the board from the maximizing player's perspective.
    ///
    /// Only meaningful for terminal boards. Non-terminal boards score as a draw.
    fn utility(&self) -> i8;

    /// Returns a list of all legal moves available from the current state.
    ///
    /// The order of this list is the order in which the search explores moves,
    /// and so decides between moves of equal value.
    /// A terminal board has no legal moves.
    fn available_moves(&self) -> Vec<Self::Move>;

    /// Returns the board that results from the current player making the given move.
    fn result(&self, b_move: &Self::Move) -> Result<Self, Self::Error>;

    /// Returns the current outcome of the game.
    fn outcome(&self) -> GameOutcome {
        if !self.is_terminal() {
            return GameOutcome::InProgress;
        }

        match self.utility() {
            u if u > 0 => GameOutcome::MaxWins,
            u if u < 0 => GameOutcome::MinWins,
            _ => GameOutcome::Draw,
        }
    }
}

/// Represents the possible outcomes of a game.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum GameOutcome {
    /// The game is still ongoing.
    InProgress = 0,
    /// The maximizing player has won.
    MaxWins = 1,
    /// The minimizing player has won.
    MinWins = 2,
    /// The game has ended in a draw.
    Draw = 3,
}

/// Represents the players in the game from the perspective of the minimax search.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Player {
    /// The player trying to maximize the utility.
    Max = 1,
    /// The player trying to minimize the utility.
    Min = 2,
}

impl Player {
    /// Returns the other player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Max => Player::Min,
            Player::Min => Player::Max,
        }
    }
}
