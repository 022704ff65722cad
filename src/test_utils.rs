//! Test utilities for the MCTS implementation

use crate::{Game, Player, Status};

/// A take-away game: players alternately remove one or two stones and whoever
/// takes the last stone wins. Leaving a multiple of three is a winning move.
#[derive(Clone, Debug, PartialEq)]
pub struct Countdown{
    stones: u8,
    last_mover: Option<Player>,
}

impl Countdown{
    /// A pile of `stones` that nobody has touched yet.
    pub fn new(stones: u8) -> Self{
        Countdown { stones, last_mover: None }
    }

    /// Stones left on the pile.
    pub fn stones(&self) -> u8{
        self.stones
    }
}

impl Game for Countdown{
    type Move = u8;

    fn check_status(&self) -> Status{
        match (self.stones, self.last_mover) {
            (0, Some(player)) => Status::Won(player),
            (0, None) => Status::Draw,
            _ => Status::InProgress,
        }
    }

    fn empty_places(&self) -> Vec<u8>{
        (1..=2).filter(|take| *take <= self.stones).collect()
    }

    fn perform_move(&mut self, action: u8, player: Player){
        self.stones -= action;
        self.last_mover = Some(player);
    }
}

/// A broken game that claims to be running but never offers a move.
#[derive(Clone, Debug)]
pub struct Stalled;

impl Game for Stalled{
    type Move = ();

    fn check_status(&self) -> Status{
        Status::InProgress
    }

    fn empty_places(&self) -> Vec<()>{
        Vec::new()
    }

    fn perform_move(&mut self, _action: (), _player: Player) {}
}

/// Utility function to compare floats with tolerance
pub fn approx_eq(a: f64, b: f64) -> bool{
    (a - b).abs() < 1e-8
}
