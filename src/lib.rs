//! A Rust library providing a generic Monte Carlo Tree Search (MCTS) engine
//! for two-player, perfect-information, zero-sum games.
//!
//! Any turn-based game plugs in by implementing the small `Game` trait. For
//! each decision the engine builds a fresh tree, runs a fixed number of UCT
//! iterations (selection, expansion, random playout, backpropagation) and
//! commits to the most visited move.
//!
//! # Modules
//! - `game`: The `Game` trait, players and game status.
//! - `tree`: The owning tree structure with weak parent links.
//! - `state`: Per-node search statistics.
//! - `node`: UCT scoring, selection, expansion and final-move choice.
//! - `search_tree`: The tree built for one decision.
//! - `mcts`: The single-threaded engine.
//! - `parallel`: A root-parallel engine running independent trees on a thread pool.
//! - `tictactoe`: A reference 3×3 board.
//! - `utils`: Random source helpers.
//! - `test_utils`: Small games used by the tests.
//!
//! # Examples
//! ```rust
//! use uct_engine::{tictactoe::TicTacToe, Game, Mcts, MctsConfig, MctsError, Player, Status};
//!
//! fn main() -> Result<(), MctsError> {
//!     let mut mcts = Mcts::from_config(&MctsConfig { seed: Some(7), ..MctsConfig::DEFAULT });
//!     let mut board = TicTacToe::new();
//!     let mut player = Player::First;
//!
//!     // Let the engine play both sides until the game is decided.
//!     while board.check_status() == Status::InProgress {
//!         board = mcts.find_next_move(&board, player, 500)?;
//!         player = player.opponent();
//!     }
//!
//!     println!("{}", board);
//!     assert!(board.check_status().is_terminal());
//!     Ok(())
//! }
//! ```

mod game;
mod tree;
mod state;
mod node;
mod search_tree;
mod mcts;
mod parallel;
pub mod tictactoe;
pub mod utils;

#[doc(hidden)]
pub mod test_utils;

pub use game::*;
pub use tree::*;
pub use state::*;
pub use node::*;
pub use search_tree::*;
pub use mcts::*;
pub use parallel::*;
