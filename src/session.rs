use sodium::{Cell, CellLoop, SodiumCtx, Stream};

use crate::engine::{GameEngine, Outcome, Placement};
use crate::Error;

/// What a single accepted move did: the squares filled (the human move and,
/// in PvE, the computer's answer), where that left the game, and the game
/// itself after the move.
#[derive(Clone, Debug)]
pub struct Step {
    pub placed: Vec<Placement>,
    pub outcome: Outcome,
    pub engine: GameEngine,
}

/// Reactive wiring of a game around a stream of raw input lines.
///
/// Build it inside a transaction. Lines arriving after the game is over are
/// dropped.
pub struct Session {
    pub engine: Cell<GameEngine>,
    pub steps: Stream<Step>,
    pub outcome: Stream<Outcome>,
    pub errors: Stream<Error>,
}

impl Session {
    pub fn new(ctx: &SodiumCtx, kb_input: &Stream<String>, game: GameEngine) -> Session {
        let engine_cell_loop: CellLoop<GameEngine> = ctx.new_cell_loop();
        let engine_cell_fwd = engine_cell_loop.cell();

        let playing_cell =
            engine_cell_fwd.map(|engine: &GameEngine| !engine.outcome().is_over());
        let input = kb_input.gate(&playing_cell);

        let (valid_move_stream, error_stream) = input
            .snapshot(&engine_cell_fwd, |line: &String, engine: &GameEngine| {
                engine.validate_input(line)
            })
            .split_res();

        let step_stream = valid_move_stream.snapshot(
            &engine_cell_fwd,
            |index: &usize, engine: &GameEngine| {
                let mut engine = engine.clone();
                let played = engine.moves().len();
                let outcome = engine.make_turn(*index);
                let placed = engine.moves()[played..].to_vec();
                Step {
                    placed,
                    outcome,
                    engine,
                }
            },
        );

        let engine_cell = step_stream
            .map(|step: &Step| step.engine.clone())
            .hold(game);
        engine_cell_loop.loop_(&engine_cell);

        let outcome_stream = step_stream
            .map(|step: &Step| step.outcome)
            .filter(|outcome: &Outcome| outcome.is_over());

        Session {
            engine: engine_cell,
            steps: step_stream,
            outcome: outcome_stream,
            errors: error_stream,
        }
    }

    pub fn is_over(&self) -> bool {
        self.engine.sample().outcome().is_over()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use sodium::StreamSink;

    use super::*;
    use crate::{GameMode, Player, RandomSelector, Square};

    struct Harness {
        kb_input: StreamSink<String>,
        session: Session,
        errors: Arc<Mutex<Vec<Error>>>,
        outcomes: Arc<Mutex<Vec<Outcome>>>,
        _listeners: Vec<sodium::Listener>,
        _ctx: SodiumCtx,
    }

    impl Harness {
        fn new(mode: GameMode) -> Harness {
            let ctx = SodiumCtx::new();
            let game =
                GameEngine::with_selector(mode, "3", "Mike", "Kate", RandomSelector::new(11))
                    .unwrap();
            let kb_input: StreamSink<String> = ctx.new_stream_sink();
            let session = ctx.transaction(|| Session::new(&ctx, &kb_input.stream(), game.clone()));

            let errors = Arc::new(Mutex::new(Vec::new()));
            let outcomes = Arc::new(Mutex::new(Vec::new()));
            let listeners = vec![
                session.errors.listen({
                    let errors = errors.clone();
                    move |err: &Error| errors.lock().unwrap().push(err.clone())
                }),
                session.outcome.listen({
                    let outcomes = outcomes.clone();
                    move |outcome: &Outcome| outcomes.lock().unwrap().push(*outcome)
                }),
            ];
            Harness {
                kb_input,
                session,
                errors,
                outcomes,
                _listeners: listeners,
                _ctx: ctx,
            }
        }

        fn send(&self, lines: &[&str]) {
            for line in lines {
                self.kb_input.send(line.to_string());
            }
        }
    }

    #[test]
    fn valid_lines_advance_the_game() {
        let h = Harness::new(GameMode::Pvp);
        h.send(&["0", "3"]);
        let engine = h.session.engine.sample();
        assert_eq!(engine.board().get(0), Some(Square::Marked(Player::First)));
        assert_eq!(engine.board().get(3), Some(Square::Marked(Player::Second)));
        assert_eq!(engine.turn(), Player::First);
        assert!(h.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn bad_lines_become_errors_without_consuming_the_turn() {
        let h = Harness::new(GameMode::Pvp);
        h.send(&["0", "zero", "12", "0"]);
        assert_eq!(
            *h.errors.lock().unwrap(),
            vec![
                Error::NotDigit("zero".into()),
                Error::OutOfRange(9),
                Error::CellTaken(0),
            ]
        );
        assert_eq!(h.session.engine.sample().turn(), Player::Second);
        assert_eq!(h.session.engine.sample().free_cells(), 8);
    }

    #[test]
    fn win_ends_the_session() {
        let h = Harness::new(GameMode::Pvp);
        h.send(&["0", "3", "1", "4", "2"]);
        assert!(h.session.is_over());
        assert_eq!(
            *h.outcomes.lock().unwrap(),
            vec![Outcome::PlayerWin(Player::First)]
        );

        // further input is ignored
        h.send(&["5", "x"]);
        assert_eq!(h.session.engine.sample().free_cells(), 4);
        assert!(h.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn draw_ends_the_session() {
        let h = Harness::new(GameMode::Pvp);
        h.send(&["0", "3", "4", "1", "5", "2", "6", "8", "7"]);
        assert_eq!(*h.outcomes.lock().unwrap(), vec![Outcome::Draw]);
        assert_eq!(h.session.engine.sample().free_cells(), 0);
    }

    #[test]
    fn pve_steps_include_the_computer_answer() {
        let h = Harness::new(GameMode::Pve);
        let steps = Arc::new(Mutex::new(Vec::new()));
        let _listener = h.session.steps.listen({
            let steps = steps.clone();
            move |step: &Step| steps.lock().unwrap().push(step.clone())
        });
        h.send(&["4"]);
        let steps = steps.lock().unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].outcome, Outcome::Continue);
        assert_eq!(steps[0].placed.len(), 2);
        assert!(!steps[0].placed[0].by_computer);
        assert!(steps[0].placed[1].by_computer);
        assert_ne!(steps[0].placed[1].index, 4);
        assert_eq!(steps[0].engine.free_cells(), 7);
    }
}
