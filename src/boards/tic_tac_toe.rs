use crate::board::{Board, Player};
use crate::minimax::MinimaxSearch;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// The number of rows and columns of the board.
pub const SIZE: usize = 3;

/// Every line that wins the game when a single mark fills it.
const LINES: [[(usize, usize); 3]; 8] = [
    // Rows
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    // Columns
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    // Diagonals
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// One of the two player symbols.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Returns the other mark.
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Returns the symbol drawn for this mark.
    pub fn to_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }

    /// Try to parse a [`Mark`] from a [`char`].
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'x' | 'X' => Some(Mark::X),
            'o' | 'O' => Some(Mark::O),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// The value of a single cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Marked(Mark),
}

impl Cell {
    /// A cell marked by X.
    pub const X: Cell = Cell::Marked(Mark::X);
    /// A cell marked by O.
    pub const O: Cell = Cell::Marked(Mark::O);

    /// Returns `true` if no mark has been placed in the cell.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Returns `.` for an empty cell, otherwise the mark's symbol.
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Marked(mark) => mark.to_char(),
        }
    }

    /// Try to parse a [`Cell`] from a [`char`].
    ///
    /// `.`, `_` and `-` are empty cells.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' | '_' | '-' => Some(Cell::Empty),
            c => Mark::from_char(c).map(Cell::Marked),
        }
    }
}

/// A move: the zero-based coordinates of the cell to mark.
///
/// Actions order row-major, which is the order moves are generated and searched in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Action {
    pub row: usize,
    pub col: usize,
}

impl Action {
    /// Creates the action that marks the cell at `row`, `col`.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    fn is_in_bounds(self) -> bool {
        self.row < SIZE && self.col < SIZE
    }
}

impl From<(usize, usize)> for Action {
    fn from((row, col): (usize, usize)) -> Self {
        Action::new(row, col)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Failed to parse an [`Action`] from a [`str`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid action, expected 'row,col'")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    /// Parses `"row,col"` or `"row col"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseActionError(s.to_string());
        let mut parts = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty());

        let row = parts.next().ok_or_else(invalid)?;
        let col = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        let row = row.parse().map_err(|_| invalid())?;
        let col = col.parse().map_err(|_| invalid())?;
        Ok(Action::new(row, col))
    }
}

/// The two ways a move can be illegal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IllegalMoveKind {
    CellOccupied,
    OutOfBounds,
}

/// An action that cannot be applied to a board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum IllegalMoveError {
    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },

    #[error("cell ({row}, {col}) is out of bounds")]
    OutOfBounds { row: usize, col: usize },
}

impl IllegalMoveError {
    /// Returns which rule the move broke, without the coordinates.
    pub fn kind(&self) -> IllegalMoveKind {
        match self {
            IllegalMoveError::CellOccupied { .. } => IllegalMoveKind::CellOccupied,
            IllegalMoveError::OutOfBounds { .. } => IllegalMoveKind::OutOfBounds,
        }
    }
}

/// A grid of cells that cannot be a tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidBoardError {
    #[error("expected 9 cells, got {0}")]
    InvalidLength(usize),

    #[error("'{0}' is not a valid tic-tac-toe cell")]
    InvalidChar(char),

    #[error("invalid mark counts: X={x}, O={o} (X must equal O or be ahead by one)")]
    InvalidMarkCounts { x: usize, o: usize },
}

/// A tic-tac-toe board: three rows of three cells.
///
/// Boards are small `Copy` values. Every move produces a new board, see [`result`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct TicTacToeBoard {
    rows: [[Cell; SIZE]; SIZE],
}

impl TicTacToeBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board from its rows.
    ///
    /// The rows must be reachable by alternating moves starting with X,
    /// ignoring whether a game would already have ended.
    pub fn from_rows(rows: [[Cell; SIZE]; SIZE]) -> Result<Self, InvalidBoardError> {
        let board = Self { rows };
        let x = count(&board, Mark::X);
        let o = count(&board, Mark::O);
        if x != o && x != o + 1 {
            return Err(InvalidBoardError::InvalidMarkCounts { x, o });
        }
        Ok(board)
    }

    /// Returns the cells, one array per row.
    pub fn rows(&self) -> &[[Cell; SIZE]; SIZE] {
        &self.rows
    }

    /// Returns the cell at `action`, or `None` if it is out of bounds.
    pub fn cell(&self, action: Action) -> Option<Cell> {
        self.rows.get(action.row)?.get(action.col).copied()
    }

    /// Iterates over all cells, top to bottom and left to right.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Action, Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, &cell)| (Action::new(row, col), cell))
        })
    }
}

impl fmt::Display for TicTacToeBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{}|{}|{}",
                row[0].to_char(),
                row[1].to_char(),
                row[2].to_char()
            )?;
        }
        Ok(())
    }
}

impl FromStr for TicTacToeBoard {
    type Err = InvalidBoardError;

    /// Parses nine cells, ignoring whitespace and `|`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '|')
            .map(|c| Cell::from_char(c).ok_or(InvalidBoardError::InvalidChar(c)))
            .collect::<Result<Vec<_>, _>>()?;

        if cells.len() != SIZE * SIZE {
            return Err(InvalidBoardError::InvalidLength(cells.len()));
        }

        let mut rows = [[Cell::Empty; SIZE]; SIZE];
        for (i, cell) in cells.into_iter().enumerate() {
            rows[i / SIZE][i % SIZE] = cell;
        }
        TicTacToeBoard::from_rows(rows)
    }
}

impl Board for TicTacToeBoard {
    type Move = Action;
    type Error = IllegalMoveError;

    fn current_player(&self) -> Player {
        match current_player(self) {
            Mark::X => Player::Max,
            Mark::O => Player::Min,
        }
    }

    fn is_terminal(&self) -> bool {
        terminal(self)
    }

    fn utility(&self) -> i8 {
        utility(self)
    }

    fn available_moves(&self) -> Vec<Self::Move> {
        actions(self).into_iter().collect()
    }

    fn result(&self, b_move: &Self::Move) -> Result<Self, Self::Error> {
        result(self, *b_move)
    }
}

fn count(board: &TicTacToeBoard, mark: Mark) -> usize {
    board
        .iter_cells()
        .filter(|&(_, cell)| cell == Cell::Marked(mark))
        .count()
}

/// Returns the starting state of the board.
pub fn initial_state() -> TicTacToeBoard {
    TicTacToeBoard::new()
}

/// Returns the mark of the player who has the next turn.
///
/// X moves first, so it is X's turn whenever X has not placed more marks than O.
pub fn current_player(board: &TicTacToeBoard) -> Mark {
    if count(board, Mark::X) <= count(board, Mark::O) {
        Mark::X
    } else {
        Mark::O
    }
}

/// Returns every legal action, or nothing if the game is over.
pub fn actions(board: &TicTacToeBoard) -> BTreeSet<Action> {
    if terminal(board) {
        return BTreeSet::new();
    }

    board
        .iter_cells()
        .filter(|(_, cell)| cell.is_empty())
        .map(|(action, _)| action)
        .collect()
}

/// Returns the board that results from the current player marking `action`.
///
/// The input board is left untouched.
pub fn result(
    board: &TicTacToeBoard,
    action: Action,
) -> Result<TicTacToeBoard, IllegalMoveError> {
    let Action { row, col } = action;
    if !action.is_in_bounds() {
        return Err(IllegalMoveError::OutOfBounds { row, col });
    }
    if !board.rows[row][col].is_empty() {
        return Err(IllegalMoveError::CellOccupied { row, col });
    }

    let mut new_board = *board;
    new_board.rows[row][col] = Cell::Marked(current_player(board));
    Ok(new_board)
}

/// Returns the winner of the game, if there is one.
///
/// X's lines are checked before O's.
pub fn winner(board: &TicTacToeBoard) -> Option<Mark> {
    [Mark::X, Mark::O].into_iter().find(|&mark| {
        LINES.iter().any(|line| {
            line.iter()
                .all(|&(row, col)| board.rows[row][col] == Cell::Marked(mark))
        })
    })
}

/// Returns `true` if the game is over, either won or drawn on a full board.
pub fn terminal(board: &TicTacToeBoard) -> bool {
    winner(board).is_some() || board.iter_cells().all(|(_, cell)| !cell.is_empty())
}

/// Returns 1 if X has won the game, -1 if O has won, 0 otherwise.
pub fn utility(board: &TicTacToeBoard) -> i8 {
    match winner(board) {
        Some(Mark::X) => 1,
        Some(Mark::O) => -1,
        None => 0,
    }
}

/// Returns the optimal action for the current player, or `None` if the game is over.
///
/// Among equally good actions the first one in row-major order is chosen.
pub fn minimax(board: &TicTacToeBoard) -> Option<Action> {
    match MinimaxSearch::new(*board).best_move() {
        Ok(action) => action,
        Err(error) => {
            warn!(%error, "minimax search failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::board::{Board, GameOutcome, Player};
    use crate::boards::tic_tac_toe::*;
    use std::collections::HashSet;

    fn parse_board(s: &str) -> TicTacToeBoard {
        s.parse().expect("invalid test board")
    }

    fn reachable_boards() -> HashSet<TicTacToeBoard> {
        let mut seen = HashSet::new();
        let mut stack = vec![initial_state()];
        while let Some(board) = stack.pop() {
            if !seen.insert(board) {
                continue;
            }
            for action in actions(&board) {
                stack.push(result(&board, action).expect("generated action is illegal"));
            }
        }
        seen
    }

    #[test]
    fn initial_state_is_empty_and_x_moves_first() {
        let board = initial_state();

        assert!(board.iter_cells().all(|(_, cell)| cell == Cell::Empty));
        assert_eq!(current_player(&board), Mark::X);
        assert_eq!(board.current_player(), Player::Max);
        assert_eq!(actions(&board).len(), 9);
    }

    #[test]
    fn players_alternate() {
        let board = initial_state();
        let board = result(&board, Action::new(1, 1)).unwrap();
        assert_eq!(current_player(&board), Mark::O);

        let board = result(&board, Action::new(0, 0)).unwrap();
        assert_eq!(current_player(&board), Mark::X);
        assert_eq!(board.cell(Action::new(1, 1)), Some(Cell::X));
        assert_eq!(board.cell(Action::new(0, 0)), Some(Cell::O));
    }

    #[test]
    fn actions_are_row_major() {
        let board = parse_board("X.. .O. ...");

        let actions: Vec<_> = actions(&board).into_iter().collect();

        assert_eq!(
            actions,
            vec![
                Action::new(0, 1),
                Action::new(0, 2),
                Action::new(1, 0),
                Action::new(1, 2),
                Action::new(2, 0),
                Action::new(2, 1),
                Action::new(2, 2),
            ]
        );
    }

    #[test]
    fn no_actions_exactly_when_terminal() {
        let boards = reachable_boards();
        assert_eq!(boards.len(), 5478);

        for board in boards {
            assert_eq!(actions(&board).is_empty(), terminal(&board), "{board}");
        }
    }

    #[test]
    fn result_marks_exactly_one_cell_for_current_player() {
        for board in reachable_boards() {
            let player = current_player(&board);
            for action in actions(&board) {
                let next = result(&board, action).unwrap();

                let changed: Vec<_> = board
                    .iter_cells()
                    .zip(next.iter_cells())
                    .filter(|((_, before), (_, after))| before != after)
                    .map(|((at, _), (_, after))| (at, after))
                    .collect();
                assert_eq!(changed, vec![(action, Cell::Marked(player))]);
            }
        }
    }

    #[test]
    fn result_does_not_modify_input() {
        // arrange
        let board = parse_board("XO. ... ...");
        let snapshot = *board.rows();

        // act
        let next = result(&board, Action::new(2, 2)).unwrap();

        // assert
        assert_eq!(*board.rows(), snapshot);
        assert_ne!(board, next);
        assert_eq!(board.cell(Action::new(2, 2)), Some(Cell::Empty));
    }

    #[test]
    fn result_rejects_occupied_cell() {
        let board = result(&initial_state(), Action::new(0, 0)).unwrap();

        let error = result(&board, Action::new(0, 0)).unwrap_err();

        assert_eq!(error.kind(), IllegalMoveKind::CellOccupied);
        assert_eq!(error, IllegalMoveError::CellOccupied { row: 0, col: 0 });
    }

    #[test]
    fn result_rejects_out_of_bounds_on_either_coordinate() {
        let board = initial_state();

        for action in [Action::new(3, 0), Action::new(0, 3), Action::new(7, 9)] {
            let error = result(&board, action).unwrap_err();
            assert_eq!(error.kind(), IllegalMoveKind::OutOfBounds);
        }
    }

    #[test]
    fn winner_checks_every_line() {
        let wins = [
            "XXX OO. ...",
            "OO. XXX ...",
            "OO. ... XXX",
            "XO. XO. X..",
            "OX. .XO .X.",
            "O.X .OX ..X",
            "XO. OX. ..X",
            "O.X .XO X..",
        ];

        for s in wins {
            let board = parse_board(s);
            assert_eq!(winner(&board), Some(Mark::X), "{s}");
            assert!(terminal(&board));
        }

        let board = parse_board("XX. OOO X..");
        assert_eq!(winner(&board), Some(Mark::O));
        assert_eq!(utility(&board), -1);
    }

    #[test]
    fn utility_of_known_boards() {
        let x_wins = ["XXX OO. ...", "XO. XO. X..", "XOO .X. ..X", "XOX OXO X.."];
        let o_wins = ["XX. OOO X..", "OXX .OX X.O", "X.O XO. OX."];
        let draws = ["XOX XOO OXX", "XXO OOX XOX", "OXO XXO XOX"];

        for s in x_wins {
            assert_eq!(utility(&parse_board(s)), 1, "{s}");
        }
        for s in o_wins {
            assert_eq!(utility(&parse_board(s)), -1, "{s}");
        }
        for s in draws {
            assert_eq!(utility(&parse_board(s)), 0, "{s}");
        }
    }

    #[test]
    fn utility_matches_lines_on_terminal_boards() {
        // scan rows, columns and diagonals by index instead of the line table
        fn line_owner(board: &TicTacToeBoard) -> Option<Mark> {
            let rows = board.rows();
            let mut lines = Vec::new();
            for i in 0..SIZE {
                lines.push([rows[i][0], rows[i][1], rows[i][2]]);
                lines.push([rows[0][i], rows[1][i], rows[2][i]]);
            }
            lines.push([rows[0][0], rows[1][1], rows[2][2]]);
            lines.push([rows[0][2], rows[1][1], rows[2][0]]);

            lines.into_iter().find_map(|line| match line {
                [Cell::Marked(a), Cell::Marked(b), Cell::Marked(c)] if a == b && b == c => {
                    Some(a)
                }
                _ => None,
            })
        }

        for board in reachable_boards().into_iter().filter(terminal) {
            let expected = match line_owner(&board) {
                Some(Mark::X) => 1,
                Some(Mark::O) => -1,
                None => 0,
            };
            assert_eq!(utility(&board), expected, "{board}");
        }
    }

    #[test]
    fn utility_of_non_terminal_board_is_zero() {
        assert_eq!(utility(&initial_state()), 0);
        assert_eq!(utility(&parse_board("XX. OO. ...")), 0);
    }

    #[test]
    fn empty_board_opens_in_corner_or_center() {
        let optimal = [
            Action::new(0, 0),
            Action::new(0, 2),
            Action::new(1, 1),
            Action::new(2, 0),
            Action::new(2, 2),
        ];

        let action = minimax(&initial_state()).unwrap();

        assert!(optimal.contains(&action), "{action}");
    }

    #[test]
    fn minimax_is_deterministic() {
        let board = parse_board("X.. ... ...");

        assert_eq!(minimax(&board), minimax(&board));
    }

    #[test]
    fn minimax_completes_top_row() {
        // O is to move here and must block
        let board = parse_board("XX. O.. ...");
        assert_eq!(minimax(&board), Some(Action::new(0, 2)));

        // X is to move and wins immediately
        let board = parse_board("XX. OO. ...");
        assert_eq!(current_player(&board), Mark::X);
        assert_eq!(minimax(&board), Some(Action::new(0, 2)));
    }

    #[test]
    fn minimax_blocks_for_o() {
        let board = parse_board("X.. .O. X..");
        assert_eq!(current_player(&board), Mark::O);

        assert_eq!(minimax(&board), Some(Action::new(1, 0)));
    }

    #[test]
    fn full_board_without_winner_is_a_draw() {
        let board = TicTacToeBoard::from_rows([
            [Cell::X, Cell::O, Cell::X],
            [Cell::X, Cell::O, Cell::O],
            [Cell::O, Cell::X, Cell::X],
        ])
        .unwrap();

        assert!(terminal(&board));
        assert_eq!(winner(&board), None);
        assert_eq!(utility(&board), 0);
        assert!(actions(&board).is_empty());
        assert_eq!(minimax(&board), None);
        assert_eq!(board.outcome(), GameOutcome::Draw);
    }

    #[test]
    fn top_row_of_x_wins() {
        let board = TicTacToeBoard::from_rows([
            [Cell::X, Cell::X, Cell::X],
            [Cell::O, Cell::O, Cell::Empty],
            [Cell::Empty, Cell::Empty, Cell::Empty],
        ])
        .unwrap();

        assert_eq!(winner(&board), Some(Mark::X));
        assert!(terminal(&board));
        assert_eq!(utility(&board), 1);
        assert!(actions(&board).is_empty());
        assert_eq!(board.outcome(), GameOutcome::MaxWins);
    }

    #[test]
    fn parse_and_display() {
        let board = parse_board("X|O|.\n.|X|.\n.|.|O");

        assert_eq!(board.to_string(), "X|O|.\n.|X|.\n.|.|O");
        assert_eq!(board.to_string().parse::<TicTacToeBoard>(), Ok(board));
    }

    #[test]
    fn parse_rejects_bad_boards() {
        assert_eq!(
            "XO.".parse::<TicTacToeBoard>(),
            Err(InvalidBoardError::InvalidLength(3))
        );
        assert_eq!(
            "XO. ..Z ...".parse::<TicTacToeBoard>(),
            Err(InvalidBoardError::InvalidChar('Z'))
        );
        assert_eq!(
            "XXX ... ...".parse::<TicTacToeBoard>(),
            Err(InvalidBoardError::InvalidMarkCounts { x: 3, o: 0 })
        );
        assert_eq!(
            "O.. ... ...".parse::<TicTacToeBoard>(),
            Err(InvalidBoardError::InvalidMarkCounts { x: 0, o: 1 })
        );
    }

    #[test]
    fn parse_action() {
        assert_eq!("1,2".parse::<Action>(), Ok(Action::new(1, 2)));
        assert_eq!(" 0 2 ".parse::<Action>(), Ok(Action::new(0, 2)));
        assert!("1".parse::<Action>().is_err());
        assert!("1,2,3".parse::<Action>().is_err());
        assert!("-1,2".parse::<Action>().is_err());
    }
}
