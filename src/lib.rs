use thiserror::Error;

mod board;
mod engine;
pub mod selector;
mod session;
pub mod setup;

pub use board::{Board, Player, Square};
pub use engine::{GameConfig, GameEngine, GameMode, Outcome, Placement, MAX_INDEX};
pub use selector::{MoveSelector, RandomSelector};
pub use session::{Session, Step};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid board size: {0:?} is not a number!")]
    InvalidSizeFormat(String),

    #[error("your input is not a digit!")]
    NotDigit(String),

    #[error("input a digit between 0 and {0}!")]
    OutOfRange(usize),

    #[error("square {0} is already taken!")]
    CellTaken(usize),
}
