use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use slide_2048::config::Config;
use slide_2048::engine::{Command, Game};
use slide_2048::frontend::{InputTranslator, KeyTranslator, Renderer, TextRenderer};

#[derive(Debug, Parser)]
#[command(name = "slide-2048", about = "Play 2048 in the terminal, one command per line")]
struct Args {
    /// Seed for a reproducible game (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print engine events as JSON lines on stderr
    #[arg(long)]
    events: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_toml(path)
            .map_err(|e| anyhow::anyhow!("failed to load {}: {e}", path.display()))?,
        None => Config::default(),
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!("starting with seed {:?}", args.seed);

    let mut game = Game::new(config, rng);
    let mut screen = TextRenderer::new(io::stdout().lock());
    screen.render(game.grid(), game.phase(), game.score())?;
    eprintln!("keys: w/a/s/d or h/j/k/l to move, enter to start, c continue, n new, q quit");

    for line in io::stdin().lock().lines() {
        let line = line?;
        let Some(command) = KeyTranslator.translate(&line) else {
            eprintln!("unrecognised input: {line:?}");
            continue;
        };
        if command == Command::Quit {
            break;
        }
        game.submit(command);
        game.settle();

        if args.events {
            for event in game.drain_events() {
                eprintln!("{}", serde_json::to_string(&event)?);
            }
        } else {
            game.drain_events();
        }
        screen.render(game.grid(), game.phase(), game.score())?;
    }
    Ok(())
}
