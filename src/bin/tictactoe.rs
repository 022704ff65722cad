use std::io::{self, BufRead, Write};

use clap::Parser;
use flexi_logger::Logger;
use log::info;
use uct_engine::{
    tictactoe::TicTacToe, Game, Mcts, MctsConfig, MctsError, ParallelMcts, ParallelMctsConfig, Player, Status,
};

#[derive(Parser, Debug)]
#[command(name = "tictactoe", about = "Play tic-tac-toe against a Monte Carlo Tree Search engine")]
struct Config{
    /// Number of search iterations per engine move
    #[arg(short = 'i', long, default_value_t = 1000)]
    iterations: usize,

    /// Seed of the engine's random source (time-based when omitted)
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Exploration constant of the UCT formula
    #[arg(short = 'c', long, default_value_t = 1.41)]
    exploration: f64,

    /// Worker threads; more than one runs independent trees in parallel
    #[arg(short = 't', long, default_value_t = 1)]
    threads: usize,

    /// Let the human play X and move first
    #[arg(long, default_value_t = false)]
    human_first: bool,

    /// Let the engine play both sides
    #[arg(long, default_value_t = false)]
    self_play: bool,
}

enum Engine{
    Single(Mcts),
    Parallel(ParallelMcts),
}

impl Engine{
    fn from_config(config: &Config) -> Result<Self, MctsError>{
        let mcts = MctsConfig {
            exploration_coef: config.exploration,
            seed: config.seed,
            ..MctsConfig::DEFAULT
        };

        if config.threads > 1{
            let parallel = ParallelMctsConfig { mcts, workers: config.threads };
            Ok(Engine::Parallel(ParallelMcts::from_config(&parallel)?))
        }
        else{
            Ok(Engine::Single(Mcts::from_config(&mcts)))
        }
    }

    fn play(&mut self, board: &TicTacToe, player: Player, iterations: usize) -> Result<TicTacToe, MctsError>{
        match self {
            Engine::Single(mcts) => mcts.find_next_move(board, player, iterations),
            Engine::Parallel(mcts) => mcts.find_next_move(board, player, iterations),
        }
    }
}

/// Reads cells from `input` until the human names a free one.
///
/// Returns `None` when the input is exhausted.
fn read_human_move(board: &TicTacToe, input: &mut impl BufRead) -> io::Result<Option<usize>>{
    let mut line = String::new();
    loop {
        print!("your move (0-8): ");
        io::stdout().flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0{
            return Ok(None);
        }

        match line.trim().parse::<usize>() {
            Ok(index) if board.is_free(index) => return Ok(Some(index)),
            Ok(index) => println!("cell {} is not available", index),
            Err(_) => println!("expected a cell number between 0 and 8"),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>>{
    let config = Config::parse();
    let _logger = Logger::try_with_env_or_str("info")?.start()?;

    let mut engine = Engine::from_config(&config)?;
    let human = match (config.self_play, config.human_first) {
        (true, _) => None,
        (false, true) => Some(Player::First),
        (false, false) => Some(Player::Second),
    };
    info!(
        "starting game: {} iterations per move, {} thread(s), human plays {:?}",
        config.iterations, config.threads, human
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut board = TicTacToe::new();
    let mut player = Player::First;

    while board.check_status() == Status::InProgress{
        if Some(player) == human{
            match read_human_move(&board, &mut input)? {
                Some(index) => board.perform_move(index, player),
                None => {
                    info!("input closed, leaving the game");
                    return Ok(());
                }
            }
        }
        else{
            board = engine.play(&board, player, config.iterations)?;
        }

        player = player.opponent();
        print!("{}", board);
        println!("#########");
    }

    match board.check_status() {
        Status::Won(Player::First) => println!("X wins"),
        Status::Won(Player::Second) => println!("O wins"),
        _ => println!("draw"),
    }
    println!("Game over");
    Ok(())
}
