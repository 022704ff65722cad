//! Module defining the game contract consumed by the search engine.

use std::fmt::Debug;

use rand::{seq::IndexedRandom, Rng};

/// One of the two seats of a two-player game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player{
    /// The player who moves first from an empty board.
    First,
    /// The player who replies.
    Second,
}

impl Player{
    /// Returns the other seat.
    ///
    /// # Examples
    /// ```rust
    /// use uct_engine::Player;
    /// assert_eq!(Player::First.opponent(), Player::Second);
    /// assert_eq!(Player::Second.opponent(), Player::First);
    /// ```
    #[inline]
    pub fn opponent(self) -> Player{
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

/// Outcome reported by a game position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status{
    /// The game can continue.
    InProgress,
    /// The game is over and nobody won.
    Draw,
    /// The game is over and the given player won.
    Won(Player),
}

impl Status{
    /// `true` for `Draw` and `Won(_)`.
    #[inline]
    pub fn is_terminal(&self) -> bool{
        !matches!(self, Status::InProgress)
    }

    /// The winning player, if any.
    #[inline]
    pub fn winner(&self) -> Option<Player>{
        match self {
            Status::Won(player) => Some(*player),
            _ => None,
        }
    }
}

/// Trait defining the interface for a game that can be searched.
///
/// Implementations hold one position of a two-player, perfect-information,
/// zero-sum game. The engine never inspects the position itself: everything it
/// needs goes through these methods.
///
/// `Clone` must produce a fully independent deep copy. Every node of the search
/// tree owns its own snapshot and nodes never share mutable state.
pub trait Game: Clone{
    /// Identifier of a legal move (a cell index, a column, ...).
    type Move: Copy + Debug + PartialEq;

    /// Reports whether the game is still running, drawn, or won.
    ///
    /// Must be a pure function of the position.
    ///
    /// # Examples
    /// ```rust
    /// use uct_engine::{tictactoe::TicTacToe, Game, Status};
    /// assert_eq!(TicTacToe::new().check_status(), Status::InProgress);
    /// ```
    fn check_status(&self) -> Status;

    /// Enumerates every legal move from this position.
    ///
    /// The sequence is empty if and only if the game cannot continue. Its order
    /// must be deterministic: the engine creates children in this order and
    /// breaks ties by it.
    fn empty_places(&self) -> Vec<Self::Move>;

    /// Applies `action` for `player`, mutating the position in place.
    ///
    /// The behavior for an illegal move is implementation-defined.
    fn perform_move(&mut self, action: Self::Move, player: Player);

    /// Applies one uniformly random legal move for `player`.
    ///
    /// # Returns
    /// The move that was played, or `None` when no legal move exists, in which
    /// case the position is left untouched.
    ///
    /// # Examples
    /// ```rust
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use uct_engine::{tictactoe::TicTacToe, Game, Player};
    /// let mut rng = StdRng::seed_from_u64(3);
    /// let mut board = TicTacToe::new();
    /// let played = board.random_play(Player::First, &mut rng).unwrap();
    /// assert_eq!(board.cell(played), Some(Player::First));
    /// ```
    fn random_play<R: Rng + ?Sized>(&mut self, player: Player, rng: &mut R) -> Option<Self::Move>{
        let action = *self.empty_places().choose(rng)?;
        self.perform_move(action, player);
        Some(action)
    }
}
