//! The menu that runs before a game: mode, names, board size.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, warn};

use crate::engine::{GameEngine, GameMode};
use crate::selector::MoveSelector;

pub const COMPUTER_NAME: &str = "Big brother";

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("wrong game mode: {0:?}")]
    InvalidMode(String),

    #[error(transparent)]
    Game(#[from] crate::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Raw menu answers, validated only when the game is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Setup {
    pub mode: GameMode,
    pub board_size: String,
    pub name1: String,
    pub name2: String,
}

impl Setup {
    pub fn build<S: MoveSelector>(&self, selector: S) -> Result<GameEngine<S>, SetupError> {
        let game = GameEngine::with_selector(
            self.mode,
            &self.board_size,
            &self.name1,
            &self.name2,
            selector,
        )?;
        Ok(game)
    }
}

/// `pvp` or `pve`, in any case.
pub fn parse_mode(input: &str) -> Result<GameMode, SetupError> {
    if input.eq_ignore_ascii_case("pvp") {
        Ok(GameMode::Pvp)
    } else if input.eq_ignore_ascii_case("pve") {
        Ok(GameMode::Pve)
    } else {
        warn!(input, "unknown game mode");
        Err(SetupError::InvalidMode(input.to_string()))
    }
}

/// Asks the menu questions on `output` and reads one answer per line from
/// `input`. A closed input reads as empty answers.
pub fn set_up_play<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Setup, SetupError> {
    let mode = parse_mode(&ask(input, output, "Choose game mode (PVE, PVP) -> ")?)?;
    let (name1, name2) = match mode {
        GameMode::Pvp => (
            ask(input, output, "Hi, Player #1. Please, enter your name -> ")?,
            ask(input, output, "Hi, Player #2. Please, enter your name -> ")?,
        ),
        GameMode::Pve => (
            ask(input, output, "Hi, Player. Please, enter your name -> ")?,
            COMPUTER_NAME.to_string(),
        ),
    };
    let board_size = ask(input, output, "Choose play board size, 3 for default -> ")?;
    let setup = Setup {
        mode,
        board_size,
        name1,
        name2,
    };
    debug!(?setup, "menu answered");
    Ok(setup)
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
    output.write_all(prompt.as_bytes())?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed = line.strip_suffix('\n').unwrap_or(&line);
    let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{Error, RandomSelector};

    fn run(answers: &str) -> (Result<Setup, SetupError>, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let setup = set_up_play(&mut input, &mut output);
        (setup, String::from_utf8(output).unwrap())
    }

    #[test]
    fn modes_ignore_case() {
        for input in ["pvp", "PVP", "PvP"] {
            assert_eq!(parse_mode(input).unwrap(), GameMode::Pvp);
        }
        for input in ["pve", "PVE", "pVe"] {
            assert_eq!(parse_mode(input).unwrap(), GameMode::Pve);
        }
        assert!(matches!(parse_mode("eve"), Err(SetupError::InvalidMode(_))));
        assert!(matches!(parse_mode(" pvp"), Err(SetupError::InvalidMode(_))));
    }

    #[test]
    fn pvp_asks_for_two_names() {
        let (setup, output) = run("PVP\nMike\nKate\n3\n");
        assert_eq!(
            setup.unwrap(),
            Setup {
                mode: GameMode::Pvp,
                board_size: "3".into(),
                name1: "Mike".into(),
                name2: "Kate".into(),
            }
        );
        assert!(output.contains("Player #2"));
    }

    #[test]
    fn pve_plays_big_brother() {
        let (setup, output) = run("pve\r\nAnn\r\n\r\n");
        let setup = setup.unwrap();
        assert_eq!(setup.name1, "Ann");
        assert_eq!(setup.name2, COMPUTER_NAME);
        assert_eq!(setup.board_size, "");
        assert!(!output.contains("Player #2"));

        let game = setup.build(RandomSelector::new(1)).unwrap();
        assert_eq!(game.config().board_size, 3);
        assert_eq!(game.config().player2, COMPUTER_NAME);
    }

    #[test]
    fn wrong_mode_stops_the_menu() {
        let (setup, output) = run("chess\nMike\n");
        assert!(matches!(setup, Err(SetupError::InvalidMode(mode)) if mode == "chess"));
        assert_eq!(output, "Choose game mode (PVE, PVP) -> ");
    }

    #[test]
    fn bad_board_size_fails_on_build() {
        let (setup, _) = run("pvp\na\nb\nbig\n");
        let err = setup.unwrap().build(RandomSelector::new(1)).unwrap_err();
        assert!(matches!(
            err,
            SetupError::Game(Error::InvalidSizeFormat(size)) if size == "big"
        ));
    }

    #[test]
    fn closed_input_reads_empty() {
        let (setup, _) = run("pvp\n");
        let setup = setup.unwrap();
        assert_eq!(setup.name1, "");
        assert_eq!(setup.board_size, "");
    }
}
