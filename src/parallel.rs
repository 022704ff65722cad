//! Root-parallel search.
//!
//! Several engines grow private trees from the same position on a `rayon`
//! pool, each with its own seed. Their root statistics are summed per move and
//! the most visited move is played. Trees never cross threads, so no node needs
//! locking.

use rayon::prelude::*;

use crate::{utils, ChildStatistics, Game, Mcts, MctsConfig, MctsError, Player};

/// Configuration parameters for a `ParallelMcts` engine.
#[derive(Clone, Debug, PartialEq)]
pub struct ParallelMctsConfig{
    /// Configuration shared by every worker. Its seed, when set, is the base
    /// from which worker seeds are derived.
    pub mcts: MctsConfig,
    /// Number of independent trees.
    pub workers: usize
}

impl ParallelMctsConfig{
    /// `MctsConfig::DEFAULT` with one worker per available core.
    pub fn with_available_parallelism() -> Self{
        ParallelMctsConfig {
            mcts: MctsConfig::DEFAULT,
            workers: std::thread::available_parallelism().map(usize::from).unwrap_or(1)
        }
    }
}

/// Summed root statistics of all workers, in the root's move order.
pub type MergedStatistics<M> = Vec<ChildStatistics<M>>;

/// A root-parallel MCTS engine.
#[derive(Debug)]
pub struct ParallelMcts{
    config: ParallelMctsConfig
}

impl ParallelMcts{
    /// Creates an engine from a specified configuration.
    ///
    /// # Returns
    /// `Err(MctsError::InvalidWorkerCount)` when `config.workers` is zero.
    pub fn from_config(config: &ParallelMctsConfig) -> Result<Self, MctsError>{
        if config.workers == 0{
            return Err(MctsError::InvalidWorkerCount);
        }
        Ok(ParallelMcts { config: config.clone() })
    }

    /// Number of independent trees grown per search.
    #[inline]
    pub fn workers(&self) -> usize{
        self.config.workers
    }

    /// Searches for `player`'s next move with `num_iterations` iterations
    /// shared between the workers, and returns the resulting position.
    ///
    /// With a fixed seed the result does not depend on thread scheduling.
    pub fn find_next_move<G>(&self, board: &G, player: Player, num_iterations: usize) -> Result<G, MctsError>
    where
        G: Game + Sync,
        G::Move: Send
    {
        let statistics = self.root_statistics(board, player, num_iterations)?;

        let mut best: Option<&ChildStatistics<G::Move>> = None;
        for candidate in statistics.iter(){
            if best.map_or(true, |current| candidate.visit_count > current.visit_count){
                best = Some(candidate);
            }
        }
        let best = best.ok_or(MctsError::NoChildren)?;

        log::debug!(
            "parallel search for {:?}: {} workers, {} iterations, chose {:?} ({} visits)",
            player,
            self.config.workers,
            num_iterations,
            best.action,
            best.visit_count
        );

        let mut next = board.clone();
        next.perform_move(best.action, player);
        Ok(next)
    }

    /// Runs every worker and sums their root statistics per move.
    pub fn root_statistics<G>(&self, board: &G, player: Player, num_iterations: usize) -> Result<MergedStatistics<G::Move>, MctsError>
    where
        G: Game + Sync,
        G::Move: Send
    {
        if num_iterations == 0{
            return Err(MctsError::InvalidIterationCount);
        }

        let base_seed = self.config.mcts.seed.unwrap_or_else(utils::time_seed);
        let workers = self.config.workers.min(num_iterations);
        let shares: Vec<(usize, usize)> = (0..workers)
            .map(|index| (index, num_iterations / workers + usize::from(index < num_iterations % workers)))
            .collect();

        let results: Vec<Result<Vec<ChildStatistics<G::Move>>, MctsError>> = shares
            .par_iter()
            .map(|&(index, iterations)| {
                let config = MctsConfig { seed: Some(utils::worker_seed(base_seed, index)), ..self.config.mcts.clone() };
                let tree = Mcts::from_config(&config).grow_tree(board, player, iterations)?;
                Ok(tree.root_statistics())
            })
            .collect();

        let mut merged: MergedStatistics<G::Move> = Vec::new();
        for result in results{
            for statistics in result?{
                match merged.iter_mut().find(|entry| entry.action == statistics.action){
                    Some(entry) => {
                        entry.visit_count += statistics.visit_count;
                        entry.score += statistics.score;
                    }
                    None => merged.push(statistics)
                }
            }
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{test_utils::Countdown, tictactoe::TicTacToe, Status};

    fn engine(workers: usize, seed: u64) -> ParallelMcts{
        ParallelMcts::from_config(&ParallelMctsConfig {
            mcts: MctsConfig { seed: Some(seed), ..MctsConfig::DEFAULT },
            workers
        }).unwrap()
    }

    #[test]
    fn test_zero_workers_is_rejected(){
        let config = ParallelMctsConfig { mcts: MctsConfig::DEFAULT, workers: 0 };
        assert_matches!(ParallelMcts::from_config(&config), Err(MctsError::InvalidWorkerCount));
    }

    #[test]
    fn test_available_parallelism_has_a_worker(){
        assert!(ParallelMctsConfig::with_available_parallelism().workers >= 1);
    }

    #[test]
    fn test_iterations_are_shared_between_workers() -> Result<(), MctsError>{
        let statistics = engine(4, 1).root_statistics(&TicTacToe::new(), Player::First, 403)?;

        assert_eq!(statistics.len(), 9);
        let visits: u64 = statistics.iter().map(|s| s.visit_count).sum();
        assert_eq!(visits, 403);
        let actions: Vec<usize> = statistics.iter().map(|s| s.action).collect();
        assert_eq!(actions, (0..9).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn test_more_workers_than_iterations() -> Result<(), MctsError>{
        let statistics = engine(8, 1).root_statistics(&TicTacToe::new(), Player::First, 3)?;

        let visits: u64 = statistics.iter().map(|s| s.visit_count).sum();
        assert_eq!(visits, 3);
        Ok(())
    }

    #[test]
    fn test_parallel_is_deterministic() -> Result<(), MctsError>{
        let board = TicTacToe::new();
        let first = engine(3, 77).find_next_move(&board, Player::First, 600)?;
        let second = engine(3, 77).find_next_move(&board, Player::First, 600)?;

        assert_eq!(first, second);
        assert_eq!(first.occupied(), 1);
        Ok(())
    }

    #[test]
    fn test_parallel_finds_countdown_win() -> Result<(), MctsError>{
        let next = engine(4, 5).find_next_move(&Countdown::new(4), Player::First, 2000)?;
        assert_eq!(next.stones(), 3);
        assert_eq!(next.check_status(), Status::InProgress);
        Ok(())
    }

    #[test]
    fn test_parallel_rejects_finished_board(){
        assert_matches!(
            engine(2, 0).find_next_move(&Countdown::new(0), Player::First, 10),
            Err(MctsError::SearchAlreadyOver(Status::Draw))
        );
        assert_matches!(
            engine(2, 0).find_next_move(&TicTacToe::new(), Player::First, 0),
            Err(MctsError::InvalidIterationCount)
        );
    }
}
