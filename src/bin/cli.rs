use std::io::{self, BufRead, Write};

use clap::Parser;
use sodium::{SodiumCtx, StreamSink};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tictac::setup::{self, SetupError};
use tictac::{Error, GameEngine, Outcome, RandomSelector, Session, Step};

/// Tic-tac-toe on the console, against a friend or the computer
#[derive(Parser, Debug)]
#[command(name = "tictac", version, long_about = None)]
struct Cli {
    /// Seed for the computer opponent (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error), logged to stderr
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), SetupError> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let mut stdin = io::stdin().lock();
    let setup = match setup::set_up_play(&mut stdin, &mut io::stdout()) {
        Ok(setup) => setup,
        Err(SetupError::InvalidMode(_)) => {
            println!("Wrong game mode!");
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    let selector = match cli.seed {
        Some(seed) => RandomSelector::new(seed),
        None => RandomSelector::from_entropy(),
    };
    info!(seed = selector.seed(), "opponent seeded");
    let game = setup.build(selector)?;

    if game.outcome().is_over() {
        println!("Game over: Draw!");
        return Ok(());
    }

    let ctx = SodiumCtx::new();

    let (kb_input, session, _listeners) = ctx.transaction(|| {
        let mut listeners = Vec::new();
        let kb_input: StreamSink<String> = ctx.new_stream_sink();

        let session = Session::new(&ctx, &kb_input.stream(), game.clone());

        listeners.push(session.errors.listen({
            let engine = session.engine.clone();
            move |err: &Error| {
                println!("{}", err);
                if let Err(err) = show_turn(&engine.sample()) {
                    warn!(%err, "failed to show the board");
                }
            }
        }));

        listeners.push(session.steps.listen(|step: &Step| {
            for placement in step.placed.iter().filter(|p| p.by_computer) {
                println!(
                    "Enemy turn: - {} -> {}",
                    placement.index,
                    placement.player.mark()
                );
            }
            match step.outcome {
                Outcome::Continue => {
                    if let Err(err) = show_turn(&step.engine) {
                        warn!(%err, "failed to show the board");
                    }
                }
                Outcome::PlayerWin(player) => {
                    println!("Game over: {} wins!", step.engine.config().name(player));
                    print!("{}", step.engine.board());
                }
                Outcome::Draw => println!("Game over: Draw!"),
            }
        }));

        (kb_input, session, listeners)
    });

    show_turn(&game)?;
    for line in stdin.lines() {
        kb_input.send(line?);
        if session.is_over() {
            break;
        }
    }
    if !session.is_over() {
        info!("input closed mid-game");
    }
    Ok(())
}

fn show_turn(game: &GameEngine) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", game.board())?;
    let (name, mark) = game.current_player();
    write!(stdout, "{}, your turn: - {} -> ", name, mark)?;
    stdout.flush()
}
