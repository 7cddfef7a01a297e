use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use slide_2048::config::Config;
use slide_2048::engine::{Game, GamePhase, Move};

/// Direction preference: hug the bottom-left corner, go up only when forced.
const PREFERENCE: [Move; 4] = [Move::Down, Move::Left, Move::Right, Move::Up];

#[derive(Debug, Parser)]
#[command(name = "autoplay", about = "Headless 2048 games with a fixed corner policy")]
struct Args {
    /// Number of independent games to play
    #[arg(long, default_value_t = 64)]
    games: u64,

    /// Base seed; game i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop a game after this many moves
    #[arg(long)]
    max_moves: Option<u64>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy)]
struct Outcome {
    score: u64,
    highest: u32,
    moves: u64,
    won: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.games == 0 {
        anyhow::bail!("--games must be at least 1");
    }

    let pb = if !args.quiet {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:40}] {pos}/{len} games")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let outcomes: Vec<Outcome> = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let outcome = play_one(args.seed.wrapping_add(i), args.max_moves);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            outcome
        })
        .collect();
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let elapsed = start.elapsed().as_secs_f64().max(1e-6);
    let total_moves: u64 = outcomes.iter().map(|o| o.moves).sum();
    let mean_score = outcomes.iter().map(|o| o.score as f64).sum::<f64>() / outcomes.len() as f64;
    let max_score = outcomes.iter().map(|o| o.score).max().unwrap_or(0);
    let wins = outcomes.iter().filter(|o| o.won).count();
    let mut highest: BTreeMap<u32, usize> = BTreeMap::new();
    for o in &outcomes {
        *highest.entry(o.highest).or_default() += 1;
    }

    println!(
        "Games: {} | wins: {} | mean score: {:.1} | max score: {} | moves/sec: {:.1}",
        outcomes.len(),
        wins,
        mean_score,
        max_score,
        total_moves as f64 / elapsed
    );
    for (tile, count) in highest.iter().rev() {
        println!("  highest {:>6}: {}", tile, count);
    }
    Ok(())
}

fn play_one(seed: u64, max_moves: Option<u64>) -> Outcome {
    let mut game = Game::new(Config::default(), StdRng::seed_from_u64(seed));
    game.start_new_game();
    let mut moves = 0u64;
    let mut won = false;

    loop {
        match game.phase() {
            GamePhase::Win => {
                won = true;
                game.choose_continue();
            }
            GamePhase::Game => {}
            GamePhase::Lose | GamePhase::Title => break,
        }
        if max_moves.is_some_and(|limit| moves >= limit) {
            break;
        }
        let moved = PREFERENCE.iter().any(|&dir| game.handle_move(dir));
        game.settle();
        game.drain_events();
        if !moved {
            // Nothing could shift; the settle above has run the end check.
            if game.phase() == GamePhase::Game {
                break;
            }
            continue;
        }
        moves += 1;
    }

    let highest = game.grid().map_or(0, |g| g.highest_value());
    debug!("seed {seed}: score {} highest {highest} after {moves} moves", game.score());
    Outcome { score: game.score(), highest, moves, won }
}
