use crate::board::{Board, GameOutcome, Player};
use crate::game_tree_node::GameTreeNode;
use ego_tree::{NodeMut, NodeRef, Tree};
use tracing::{debug, instrument};

/// The complete game tree below a board, with every node scored by minimax.
///
/// Unlike [`MinimaxSearch`](crate::minimax::MinimaxSearch), which only keeps the values it needs,
/// this keeps every board in memory so the tree can be inspected afterwards.
pub struct GameTree<T: Board> {
    tree: Tree<GameTreeNode<T>>,
    node_count: usize,
}

/// The number of finished games in a tree, by outcome.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub struct OutcomeCounts {
    pub max_wins: usize,
    pub min_wins: usize,
    pub draws: usize,
}

impl<T: Board> GameTree<T> {
    /// Expands and scores every node reachable from `board`.
    #[instrument(level = "debug", skip_all)]
    pub fn build(board: T) -> Result<Self, T::Error> {
        let mut tree = Tree::new(GameTreeNode::new(board, None, 0));
        let mut node_count = 0;
        let value = expand(tree.root_mut(), &mut node_count)?;
        debug!(node_count, value, "game tree built");
        Ok(Self { tree, node_count })
    }

    /// Returns an immutable reference to the underlying tree.
    pub fn tree(&self) -> &Tree<GameTreeNode<T>> {
        &self.tree
    }

    /// Returns the node holding the board the tree was built from.
    pub fn root(&self) -> NodeRef<'_, GameTreeNode<T>> {
        self.tree.root()
    }

    /// The number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.node_count
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// The minimax value of the root.
    pub fn value(&self) -> i8 {
        self.root().value().value
    }

    /// Returns the optimal move from the root, breaking ties the same way as the search.
    pub fn best_move(&self) -> Option<T::Move> {
        best_child(self.root()).and_then(|child| child.value().prev_move)
    }

    /// Returns the moves of a game in which both players always play the best move.
    pub fn principal_variation(&self) -> Vec<T::Move> {
        let mut moves = Vec::new();
        let mut node = self.root();
        while let Some(child) = best_child(node) {
            if let Some(b_move) = child.value().prev_move {
                moves.push(b_move);
            }
            node = child;
        }
        moves
    }

    /// Counts the finished games in the tree.
    pub fn outcome_counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for node in self.tree.values().filter(|node| node.is_terminal()) {
            match node.board.outcome() {
                GameOutcome::MaxWins => counts.max_wins += 1,
                GameOutcome::MinWins => counts.min_wins += 1,
                GameOutcome::Draw => counts.draws += 1,
                GameOutcome::InProgress => {}
            }
        }
        counts
    }
}

/// Recursively appends the children of `node` and returns its minimax value.
fn expand<T: Board>(
    mut node: NodeMut<'_, GameTreeNode<T>>,
    node_count: &mut usize,
) -> Result<i8, T::Error> {
    *node_count += 1;
    let board = node.value().board.clone();
    if board.is_terminal() {
        let utility = board.utility();
        node.value().value = utility;
        return Ok(utility);
    }

    let player = board.current_player();
    let depth = node.value().depth + 1;
    let mut best: Option<i8> = None;
    for b_move in board.available_moves() {
        let child_board = board.result(&b_move)?;
        let child = node.append(GameTreeNode::new(child_board, Some(b_move), depth));
        let value = expand(child, node_count)?;
        best = Some(match (best, player) {
            (None, _) => value,
            (Some(best), Player::Max) => best.max(value),
            (Some(best), Player::Min) => best.min(value),
        });
    }

    let value = best.unwrap_or_else(|| board.utility());
    node.value().value = value;
    Ok(value)
}

/// The first child with the best value for the player to move at `node`.
fn best_child<T: Board>(
    node: NodeRef<'_, GameTreeNode<T>>,
) -> Option<NodeRef<'_, GameTreeNode<T>>> {
    let player = node.value().current_player;
    let mut best: Option<NodeRef<'_, GameTreeNode<T>>> = None;
    for child in node.children() {
        let is_better = match best {
            None => true,
            Some(current) => match player {
                Player::Max => child.value().value > current.value().value,
                Player::Min => child.value().value < current.value().value,
            },
        };
        if is_better {
            best = Some(child);
        }
    }
    best
}
