//! Implementation of the Monte Carlo Tree Search (MCTS) engine.
//!
//! Each call to `Mcts::search` builds a fresh tree for the position, runs a
//! fixed number of iterations of selection, expansion, random playout and
//! backpropagation, then commits to the most visited root child. Trees are
//! never reused across calls.

use std::rc::Rc;

use rand::{rngs::StdRng, Rng};

use crate::{utils, Game, Player, SearchNode, SearchNodeRef, SearchTree, Status, UCT_EXPLORATION};

/// Represents possible errors that can occur during MCTS operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MctsError{
    /// A UCT value was requested for a node without a parent. Roots are never
    /// ranked against siblings.
    #[error("UCT value requested for a node without a parent")]
    MissingParent,
    /// A child was requested from a node that has none.
    #[error("node has no children to choose from")]
    NoChildren,
    /// The search cannot start because the position is already decided.
    #[error("search cannot start from a finished game ({0:?})")]
    SearchAlreadyOver(Status),
    /// The iteration budget must be at least one.
    #[error("iteration count must be positive")]
    InvalidIterationCount,
    /// A parallel search needs at least one worker.
    #[error("worker count must be positive")]
    InvalidWorkerCount,
    /// The game reported `InProgress` but had no legal move to play.
    #[error("game reported an in-progress status with no legal move")]
    StalledPlayout
}

/// Configuration parameters for an MCTS engine.
#[derive(Clone, Debug, PartialEq)]
pub struct MctsConfig{
    /// Weight of the exploration term of the UCT formula.
    pub exploration_coef: f64,
    /// Score credited to every node whose last player won a playout.
    pub win_reward: f64,
    /// Seed of the random source.
    ///
    /// `Some(value)` makes searches reproducible: the same seed, position and
    /// iteration count always produce the same move. `None` seeds from the
    /// current time.
    pub seed: Option<u64>
}

impl MctsConfig{
    /// The default configuration.
    ///
    /// - `exploration_coef`: `UCT_EXPLORATION` (1.41).
    /// - `win_reward`: `10.0`.
    /// - `seed`: `None`.
    pub const DEFAULT: MctsConfig = MctsConfig{
        exploration_coef: UCT_EXPLORATION,
        win_reward: 10.0,
        seed: None
    };
}

impl Default for MctsConfig{
    fn default() -> Self{
        MctsConfig::DEFAULT
    }
}

/// Outcome of a search: the committed move and what the tree knew about it.
#[derive(Clone, Debug)]
pub struct SearchResult<G: Game>{
    /// Position after the chosen move.
    pub board: G,
    /// The chosen move.
    pub action: G::Move,
    /// Visits of the chosen root child.
    pub visit_count: u64,
    /// Accumulated score of the chosen root child.
    pub score: f64,
    /// Iterations that were run.
    pub iterations: usize
}

/// The Monte Carlo Tree Search engine.
///
/// The engine owns its random source, so consecutive searches continue the
/// same random sequence.
#[derive(Debug)]
pub struct Mcts{
    config: MctsConfig,
    rng: StdRng
}

impl Mcts{
    /// Creates an engine with `MctsConfig::DEFAULT`.
    #[inline]
    pub fn new() -> Self{
        Self::from_config(&MctsConfig::DEFAULT)
    }

    /// Creates an engine from a specified configuration.
    #[inline]
    pub fn from_config(config: &MctsConfig) -> Self{
        Mcts {
            config: config.clone(),
            rng: utils::rng_from_seed(config.seed)
        }
    }

    /// The configuration the engine was built with.
    #[inline]
    pub fn config(&self) -> &MctsConfig{
        &self.config
    }

    /// Searches for `player`'s next move and returns the resulting position.
    ///
    /// # Returns
    /// `Err(MctsError::SearchAlreadyOver(_))` if `board` is already decided,
    /// `Err(MctsError::InvalidIterationCount)` if `num_iterations` is zero.
    ///
    /// # Examples
    /// ```rust
    /// use uct_engine::{tictactoe::TicTacToe, Mcts, MctsConfig, MctsError, Player};
    ///
    /// fn main() -> Result<(), MctsError> {
    ///     let mut mcts = Mcts::from_config(&MctsConfig { seed: Some(1), ..MctsConfig::DEFAULT });
    ///     let next = mcts.find_next_move(&TicTacToe::new(), Player::First, 200)?;
    ///     assert_eq!(next.occupied(), 1);
    ///     Ok(())
    /// }
    /// ```
    pub fn find_next_move<G: Game>(&mut self, board: &G, player: Player, num_iterations: usize) -> Result<G, MctsError>{
        self.search(board, player, num_iterations).map(|result| result.board)
    }

    /// Like `find_next_move`, but also reports the chosen move and its statistics.
    pub fn search<G: Game>(&mut self, board: &G, player: Player, num_iterations: usize) -> Result<SearchResult<G>, MctsError>{
        let tree = self.grow_tree(board, player, num_iterations)?;

        let winner = tree.winner_child()?;
        let winner = winner.borrow();
        let data = winner.get();
        let action = data.action().ok_or(MctsError::NoChildren)?;

        log::debug!(
            "search for {:?}: {} iterations, {} nodes, chose {:?} ({} visits, score {})",
            player,
            num_iterations,
            tree.node_count(),
            action,
            data.state().visit_count(),
            data.state().score()
        );

        Ok(SearchResult {
            board: data.state().board().clone(),
            action,
            visit_count: data.state().visit_count(),
            score: data.state().score(),
            iterations: num_iterations
        })
    }

    /// Builds a tree for `player` to move from `board` and runs
    /// `num_iterations` iterations on it.
    pub fn grow_tree<G: Game>(&mut self, board: &G, player: Player, num_iterations: usize) -> Result<SearchTree<G>, MctsError>{
        if num_iterations == 0{
            return Err(MctsError::InvalidIterationCount);
        }

        let status = board.check_status();
        if status.is_terminal(){
            return Err(MctsError::SearchAlreadyOver(status));
        }

        let tree = SearchTree::new(board.clone(), player);
        for iteration in 0..num_iterations{
            self.iterate(&tree, iteration)?;
        }
        Ok(tree)
    }

    /// Performs one full iteration: selection, expansion, simulation and
    /// backpropagation.
    fn iterate<G: Game>(&mut self, tree: &SearchTree<G>, iteration: usize) -> Result<(), MctsError>{
        let promising = tree.select_leaf(self.config.exploration_coef)?;

        let expandable = {
            let node = promising.borrow();
            node.is_leaf() && node.get().state().board().check_status() == Status::InProgress
        };
        if expandable{
            SearchNode::expand(&promising);
        }

        let node_to_explore = {
            let node = promising.borrow();
            match node.child_count() {
                0 => Rc::clone(&promising),
                count => Rc::clone(&node.children()[self.rng.random_range(0..count)])
            }
        };

        let status = simulate_random_playout(&node_to_explore, &mut self.rng)?;

        if log::log_enabled!(log::Level::Trace){
            log::trace!(
                "iteration {}: explored {:?}, playout ended {:?}",
                iteration,
                node_to_explore.borrow().get().action(),
                status
            );
        }

        backpropagation(&node_to_explore, status.winner(), self.config.win_reward);
        Ok(())
    }
}

impl Default for Mcts{
    fn default() -> Self{
        Self::new()
    }
}

/// Plays uniformly random moves from `node`'s position until the game ends.
///
/// Players alternate starting with the opponent of the node's last player. The
/// playout works on a copy of the snapshot and never touches the tree. A node
/// whose game is already decided reports its status without playing.
///
/// # Returns
/// The terminal status, or `Err(MctsError::StalledPlayout)` if the game claims
/// to be in progress while offering no move.
pub fn simulate_random_playout<G: Game, R: Rng + ?Sized>(node: &SearchNodeRef<G>, rng: &mut R) -> Result<Status, MctsError>{
    let (mut board, mut player) = {
        let node = node.borrow();
        let state = node.get().state();
        (state.board().clone(), state.last_player().opponent())
    };

    loop {
        let status = board.check_status();
        if status.is_terminal(){
            return Ok(status);
        }

        if board.random_play(player, rng).is_none(){
            return Err(MctsError::StalledPlayout);
        }
        player = player.opponent();
    }
}

/// Walks from `node` up to the root, counting one visit everywhere and
/// crediting `reward` to the nodes whose last player is `winner`.
pub fn backpropagation<G: Game>(node: &SearchNodeRef<G>, winner: Option<Player>, reward: f64){
    let mut current_ref_opt = Some(Rc::clone(node));

    while let Some(current_ref) = current_ref_opt{
        let current = &mut *current_ref.borrow_mut();
        current.get_mut().state_mut().record_visit(winner, reward);
        current_ref_opt = current.get_parent();
    }
}
