//! A 3×3 tic-tac-toe board, the reference `Game` implementation.

use std::fmt::{self, Display, Formatter};

use crate::{Game, Player, Status};

/// The eight lines that win the game.
const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A tic-tac-toe position. Cells are indexed 0 to 8, row by row.
///
/// `Player::First` plays `X`, `Player::Second` plays `O`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TicTacToe{
    cells: [Option<Player>; 9],
}

impl TicTacToe{
    /// An empty board.
    pub fn new() -> Self{
        TicTacToe { cells: [None; 9] }
    }

    /// A board with the given cells, row by row.
    pub fn from_cells(cells: [Option<Player>; 9]) -> Self{
        TicTacToe { cells }
    }

    /// Owner of `index`, `None` when empty or out of range.
    #[inline]
    pub fn cell(&self, index: usize) -> Option<Player>{
        self.cells.get(index).copied().flatten()
    }

    /// `true` when `index` is on the board and free.
    #[inline]
    pub fn is_free(&self, index: usize) -> bool{
        matches!(self.cells.get(index), Some(None))
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize{
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    fn has_line(&self, player: Player) -> bool{
        WINNING_LINES.iter().any(|line| line.iter().all(|&index| self.cells[index] == Some(player)))
    }
}

impl Game for TicTacToe{
    type Move = usize;

    /// A completed line wins even when it fills the last free cell.
    fn check_status(&self) -> Status{
        if self.has_line(Player::First){
            Status::Won(Player::First)
        }
        else if self.has_line(Player::Second){
            Status::Won(Player::Second)
        }
        else if self.cells.iter().all(Option::is_some){
            Status::Draw
        }
        else{
            Status::InProgress
        }
    }

    fn empty_places(&self) -> Vec<usize>{
        (0..self.cells.len()).filter(|&index| self.cells[index].is_none()).collect()
    }

    fn perform_move(&mut self, action: usize, player: Player){
        debug_assert!(self.is_free(action), "cell {} is not free", action);
        self.cells[action] = Some(player);
    }
}

impl Display for TicTacToe{
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result{
        let symbol = |cell: Option<Player>| match cell {
            Some(Player::First) => 'X',
            Some(Player::Second) => 'O',
            None => '-',
        };

        for row in self.cells.chunks(3){
            writeln!(fmt, "{} {} {}", symbol(row[0]), symbol(row[1]), symbol(row[2]))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Option<Player> = Some(Player::First);
    const O: Option<Player> = Some(Player::Second);
    const E: Option<Player> = None;

    #[test]
    fn test_empty_board(){
        let board = TicTacToe::new();

        assert_eq!(board.check_status(), Status::InProgress);
        assert_eq!(board.empty_places(), (0..9).collect::<Vec<_>>());
        assert_eq!(board.occupied(), 0);
    }

    #[test]
    fn test_perform_move(){
        let mut board = TicTacToe::new();
        board.perform_move(4, Player::Second);

        assert_eq!(board.cell(4), Some(Player::Second));
        assert!(!board.is_free(4));
        assert!(!board.is_free(9));
        assert_eq!(board.empty_places(), vec![0, 1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn test_every_line_wins(){
        for line in WINNING_LINES{
            let mut board = TicTacToe::new();
            for index in line{
                board.perform_move(index, Player::Second);
            }
            assert_eq!(board.check_status(), Status::Won(Player::Second));
        }
    }

    #[test]
    fn test_win_on_full_board_is_not_a_draw(){
        let board = TicTacToe::from_cells([
            X, O, X,
            O, X, O,
            O, X, X,
        ]);
        assert_eq!(board.check_status(), Status::Won(Player::First));
    }

    #[test]
    fn test_draw(){
        let board = TicTacToe::from_cells([
            X, O, X,
            X, O, O,
            O, X, X,
        ]);
        assert_eq!(board.check_status(), Status::Draw);
        assert!(board.empty_places().is_empty());
    }

    #[test]
    fn test_in_progress(){
        let board = TicTacToe::from_cells([
            X, O, X,
            E, O, E,
            E, X, E,
        ]);
        assert_eq!(board.check_status(), Status::InProgress);
        assert_eq!(board.empty_places(), vec![3, 5, 6, 8]);
    }

    #[test]
    fn test_clone_is_independent(){
        let board = TicTacToe::new();
        let mut copy = board.clone();
        copy.perform_move(0, Player::First);

        assert_eq!(board.cell(0), None);
        assert_eq!(copy.cell(0), Some(Player::First));
    }

    #[test]
    fn test_display(){
        let board = TicTacToe::from_cells([
            X, E, E,
            E, O, E,
            E, E, X,
        ]);
        assert_eq!(board.to_string(), "X - -\n- O -\n- - X\n");
    }
}
