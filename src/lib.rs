//! A small and simple library for exhaustive minimax game tree search.
//!
//! This library provides a generic implementation of the minimax algorithm for two-player,
//! perfect-information games. Every node below the searched board is explored, so the move it
//! returns is optimal against an optimal opponent. The library ships with a tic-tac-toe board.
//!
//! # Example
//!
//! ```rust
//! use minimax_lib::boards::tic_tac_toe::{Action, initial_state, minimax, result};
//!
//! // Start from the empty board, X moves first
//! let board = initial_state();
//!
//! // Play the center
//! let board = result(&board, Action::new(1, 1)).unwrap();
//!
//! // Ask for the best reply for O
//! let best_move = minimax(&board);
//!
//! println!("The best move is: {:?}", best_move);
//! ```
//!
//! The search can also be configured and reused through [`minimax::MinimaxSearch`]:
//!
//! ```rust
//! use minimax_lib::boards::tic_tac_toe::initial_state;
//! use minimax_lib::cancel::CancellationToken;
//! use minimax_lib::minimax::MinimaxSearch;
//!
//! let token = CancellationToken::new();
//! let mut search = MinimaxSearch::builder(initial_state())
//!     .with_cancellation(token.clone())
//!     .build();
//!
//! let value = search.value().unwrap();
//! assert_eq!(value, 0);
//! ```

/// Self play between agents, see [`agent::play_match`].
pub mod agent;
/// Contains the `Board` trait and related enums that define the interface for a game.
pub mod board;
/// Contains pre-made implementations of the `Board` trait for common games.
pub mod boards;
/// Signals that stop a running search.
pub mod cancel;
/// A fully materialized and scored game tree.
pub mod game_tree;
/// Contains the `GameTreeNode` struct, which represents a node in the game tree.
pub mod game_tree_node;
/// The core module of the library, containing the `MinimaxSearch` implementation.
pub mod minimax;

pub use self::boards::tic_tac_toe::{
    actions, current_player, initial_state, minimax, result, terminal, utility, winner,
};
