use tracing::{debug, info, warn};

use crate::board::{Board, Player};
use crate::selector::{MoveSelector, RandomSelector};
use crate::Error;

const DEFAULT_BOARD_SIZE: &str = "3";
const DEFAULT_FIRST_NAME: &str = "Player 1";
const DEFAULT_SECOND_NAME: &str = "Player 2";

/// Highest index accepted by [`GameEngine::validate_input`], whatever the
/// board size.
pub const MAX_INDEX: usize = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameMode {
    Pvp,
    Pve,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    PlayerWin(Player),
    Draw,
}

impl Outcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, Outcome::Continue)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub index: usize,
    pub player: Player,
    pub by_computer: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub mode: GameMode,
    pub board_size: usize,
    pub player1: String,
    pub player2: String,
}

impl GameConfig {
    /// Name defaults are both keyed on `name1` being empty: an empty `name2`
    /// next to a non-empty `name1` is kept as is.
    pub fn new(mode: GameMode, board_size: &str, name1: &str, name2: &str) -> Result<Self, Error> {
        let board_size = parse_board_size(board_size)?;
        let (player1, player2) = if name1.is_empty() {
            (DEFAULT_FIRST_NAME, DEFAULT_SECOND_NAME)
        } else {
            (name1, name2)
        };
        Ok(Self {
            mode,
            board_size,
            player1: player1.to_string(),
            player2: player2.to_string(),
        })
    }

    pub fn name(&self, player: Player) -> &str {
        match player {
            Player::First => &self.player1,
            Player::Second => &self.player2,
        }
    }
}

fn parse_board_size(input: &str) -> Result<usize, Error> {
    let input = if input.is_empty() {
        DEFAULT_BOARD_SIZE
    } else {
        input
    };
    if !is_digits(input) {
        return Err(Error::InvalidSizeFormat(input.to_string()));
    }
    input
        .parse::<usize>()
        .map_err(|_| Error::InvalidSizeFormat(input.to_string()))
}

fn is_digits(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Clone, Debug)]
pub struct GameEngine<S = RandomSelector> {
    config: GameConfig,
    board: Board,
    turn: Player,
    moves: Vec<Placement>,
    selector: S,
}

impl GameEngine {
    /// Builds a game whose computer opponent (if any) draws from a randomly
    /// seeded [`RandomSelector`].
    pub fn new(mode: GameMode, board_size: &str, name1: &str, name2: &str) -> Result<Self, Error> {
        Self::with_selector(
            mode,
            board_size,
            name1,
            name2,
            RandomSelector::from_entropy(),
        )
    }
}

impl<S: MoveSelector> GameEngine<S> {
    pub fn with_selector(
        mode: GameMode,
        board_size: &str,
        name1: &str,
        name2: &str,
        selector: S,
    ) -> Result<Self, Error> {
        let config = GameConfig::new(mode, board_size, name1, name2)?;
        let board = Board::new(config.board_size)
            .ok_or_else(|| Error::InvalidSizeFormat(board_size.to_string()))?;
        info!(
            mode = ?config.mode,
            size = config.board_size,
            player1 = %config.player1,
            player2 = %config.player2,
            "new game"
        );
        Ok(Self {
            config,
            board,
            turn: Player::First,
            moves: Vec::new(),
            selector,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn moves(&self) -> &[Placement] {
        &self.moves
    }

    /// Name and mark of the player whose turn it is.
    pub fn current_player(&self) -> (&str, char) {
        (self.config.name(self.turn), self.turn.mark())
    }

    /// Parses a raw move. Only ASCII digits are accepted, the value must lie
    /// in `0..=MAX_INDEX`, and the square must still be empty.
    pub fn validate_input(&self, input: &str) -> Result<usize, Error> {
        if !is_digits(input) {
            return Err(Error::NotDigit(input.to_string()));
        }
        // all-digit input only fails to parse when it overflows
        let index = match input.parse::<usize>() {
            Ok(index) if index <= MAX_INDEX => index,
            _ => return Err(Error::OutOfRange(self.board.len())),
        };
        if index >= self.board.len() {
            return Err(Error::OutOfRange(self.board.len()));
        }
        if !self.board.is_valid_move(index) {
            return Err(Error::CellTaken(index));
        }
        Ok(index)
    }

    /// Plays `index` for the current player. In PvE the computer answers
    /// straight away unless the human move ended the game.
    ///
    /// An index that is not an empty square is ignored.
    pub fn make_turn(&mut self, index: usize) -> Outcome {
        let player = self.turn;
        if !self.board.mark(index, player) {
            warn!(index, ?player, "square unavailable, move ignored");
            return Outcome::Continue;
        }
        match self.placed(index, false) {
            Outcome::Continue => {}
            outcome => return outcome,
        }
        match self.config.mode {
            GameMode::Pvp => Outcome::Continue,
            GameMode::Pve => self.computer_move(),
        }
    }

    /// Plays a square picked by the selector for the current player.
    pub fn computer_move(&mut self) -> Outcome {
        let empty = self.board.empty_squares();
        let Some(&fallback) = empty.first() else {
            info!("no squares left for the computer");
            return Outcome::Draw;
        };
        let index = match self.selector.select(&empty) {
            Some(index) if empty.contains(&index) => index,
            picked => {
                warn!(?picked, fallback, "selector picked an unavailable square");
                fallback
            }
        };
        self.board.mark(index, self.turn);
        self.placed(index, true)
    }

    /// Records a mark just set at `index` and settles the turn.
    fn placed(&mut self, index: usize, by_computer: bool) -> Outcome {
        let player = self.turn;
        self.moves.push(Placement {
            index,
            player,
            by_computer,
        });
        debug!(index, ?player, by_computer, "placed");

        if self.check_for_winner(player).is_some() {
            info!(?player, name = %self.config.name(player), "player wins");
            return Outcome::PlayerWin(player);
        }
        if self.free_cells() == 0 {
            info!("board full, draw");
            return Outcome::Draw;
        }
        self.turn = self.change_player();
        debug!(turn = ?self.turn, "turn passed");
        Outcome::Continue
    }

    /// Highlights and returns the first complete line held by `player`.
    pub fn check_for_winner(&mut self, player: Player) -> Option<[usize; 3]> {
        let line = self.board.winning_line(player)?;
        self.board.highlight(line);
        Some(line)
    }

    /// Number of empty squares left.
    pub fn free_cells(&self) -> usize {
        self.board.free_cells()
    }

    pub fn change_player(&self) -> Player {
        self.turn.swap()
    }

    /// Re-derives the game state from the board. A highlighted line means the
    /// player to move has won, since the turn is never passed after a win.
    pub fn outcome(&self) -> Outcome {
        if self.board.has_highlight() {
            Outcome::PlayerWin(self.turn)
        } else if self.free_cells() == 0 {
            Outcome::Draw
        } else {
            Outcome::Continue
        }
    }
}
