use crate::board::{Board, Player};

/// Represents a single node in a fully expanded game tree.
///
/// Each node stores the state of the game, the move that led to it, and its minimax value.
#[derive(Debug, Clone)]
pub struct GameTreeNode<T: Board> {
    /// The game state that this node represents.
    pub board: T,
    /// The move that led to this node's state from its parent. `None` for the root node.
    pub prev_move: Option<T::Move>,
    /// The player whose turn it is in this node's game state.
    pub current_player: Player,
    /// The number of moves between the root and this node.
    pub depth: u8,
    /// The utility reached from this node when both players play optimally.
    pub value: i8,
}

impl<T: Board> GameTreeNode<T> {
    /// Creates a new, not yet scored node.
    pub fn new(board: T, prev_move: Option<T::Move>, depth: u8) -> Self {
        let current_player = board.current_player();
        GameTreeNode {
            board,
            prev_move,
            current_player,
            depth,
            value: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.board.is_terminal()
    }
}
