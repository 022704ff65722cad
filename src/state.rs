//! Search statistics attached to one game snapshot.

use crate::{Game, Player};

/// A game snapshot plus the MCTS bookkeeping gathered for it.
///
/// `last_player` is the player whose move produced this snapshot, not the
/// player to move next.
#[derive(Clone, Debug)]
pub struct SearchState<G: Game>{
    board: G,
    last_player: Player,
    visit_count: u64,
    score: f64
}

impl<G: Game> SearchState<G>{
    /// Wraps `board` with zeroed statistics.
    #[inline]
    pub fn new(board: G, last_player: Player) -> Self{
        SearchState { board, last_player, visit_count: 0, score: 0.0 }
    }

    /// The position this state describes.
    #[inline]
    pub fn board(&self) -> &G{
        &self.board
    }

    /// The player who made the move leading to `board`.
    #[inline]
    pub fn last_player(&self) -> Player{
        self.last_player
    }

    /// Number of playouts that went through this state.
    #[inline]
    pub fn visit_count(&self) -> u64{
        self.visit_count
    }

    /// Sum of the rewards credited to `last_player` by those playouts.
    #[inline]
    pub fn score(&self) -> f64{
        self.score
    }

    /// Mean reward per visit, `0.0` when never visited.
    #[inline]
    pub fn average_score(&self) -> f64{
        if self.visit_count != 0 { self.score / self.visit_count as f64 } else { 0.0 }
    }

    /// Derives the state reached when `player` plays `action` from here.
    ///
    /// The snapshot is copied before the move so this state is left untouched,
    /// and the new state starts with zeroed statistics.
    pub fn next_state(&self, action: G::Move, player: Player) -> Self{
        let mut board = self.board.clone();
        board.perform_move(action, player);
        SearchState::new(board, player)
    }

    /// Counts one playout through this state and credits `reward` when its
    /// winner is the player who produced the state. Draws add no score.
    #[inline]
    pub fn record_visit(&mut self, winner: Option<Player>, reward: f64){
        self.visit_count += 1;
        if winner == Some(self.last_player){
            self.score += reward;
        }
    }
}
