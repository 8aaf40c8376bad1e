//! Built-in implementations of the `Board` trait.

/// Tic-tac-toe: the board, its rules, and a free-function API over them.
pub mod tic_tac_toe;
