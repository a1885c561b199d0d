//! Flappy Gates entry point
//!
//! Headless native driver: builds a session from settings and flags, runs it
//! at a fixed rate (or flat out), and prints the leaderboard at the end.

use std::io::BufRead;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;

use flappy_gates::audio::{AudioTrigger, LogSink};
use flappy_gates::driver::{Command, CommandQueue, FixedStep, run_frame};
use flappy_gates::persistence::{PersistenceEvent, ScoreRecorder};
use flappy_gates::sim::{GameEvent, TickInput};
use flappy_gates::{
    Collaborators, ConfigError, Difficulty, GameError, GameSession, HighScoreEntry, JsonScoreStore,
    SessionConfig, Settings, StoreError,
};

#[derive(Parser, Debug)]
#[command(name = "flappy-gates")]
#[command(about = "Fly through the gates; one point per gate, one crash ends the run")]
struct Args {
    /// Player name recorded with the score
    #[arg(short, long)]
    username: Option<String>,

    /// Easy, Medium or Hard (defaults to the settings file)
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Gate placement seed (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long, default_value_t = 60_000)]
    ticks: u64,

    /// Let the demo pilot fly
    #[arg(long)]
    autopilot: bool,

    /// Read j/r/q commands from stdin
    #[arg(long)]
    manual: bool,

    /// Pace ticks in real time instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Settings file
    #[arg(long, default_value = Settings::DEFAULT_FILE)]
    settings: PathBuf,

    /// Leaderboard file (overrides the settings file)
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Print the leaderboard and exit
    #[arg(long)]
    list_scores: bool,
}

fn main() {
    env_logger::init();
    log::info!("Flappy Gates (native) starting...");

    if let Err(e) = run(Args::parse()) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), GameError> {
    let settings = Settings::load(&args.settings)?;
    settings.validate()?;

    let scores_path = args.scores.clone().unwrap_or_else(|| settings.scores_path.clone());
    let recorder = open_recorder(scores_path)?;

    if args.list_scores {
        print_leaderboard(recorder.list_high_scores());
        return Ok(());
    }

    let username = args.username.clone().ok_or(ConfigError::EmptyUsername)?;
    let seed = args.seed.unwrap_or_else(clock_seed);
    let config = SessionConfig::new(username, args.difficulty.or(Some(settings.difficulty)))?
        .with_seed(seed)
        .with_tick_rate(settings.tick_rate_hz);

    let mut audio = AudioTrigger::spawn(Box::new(LogSink {
        asset_dir: settings.sound_dir.clone(),
    }))?;
    audio.set_master_volume(settings.master_volume);
    audio.set_sfx_volume(settings.sfx_volume);
    audio.set_muted(settings.muted);

    let mut session = GameSession::new(
        config,
        Collaborators {
            audio,
            scores: recorder,
        },
    )?;
    log::info!("Seed: {seed}");

    let commands = CommandQueue::new();
    if args.manual {
        spawn_stdin_reader(&commands)?;
    }
    let input = TickInput {
        idle_mode: args.autopilot,
        ..Default::default()
    };

    if args.realtime {
        run_realtime(&mut session, &commands, &input, &args, settings.tick_rate_hz);
    } else {
        run_flat_out(&mut session, &commands, &input, &args);
    }

    let snap = session.snapshot();
    println!();
    println!("=== RUN RESULTS ===");
    println!("  Player:     {}", session.username());
    println!("  Score:      {}", snap.score);
    println!("  High score: {}", snap.high_score);
    println!("  Game over:  {}", snap.is_game_over);

    // Listing goes through the worker after any pending record, so the
    // outcome of this run's record is ready to poll afterwards
    let board = session.collaborators().scores.list_high_scores();
    for event in session.collaborators().scores.poll_events() {
        match event {
            PersistenceEvent::Recorded { rank, .. } => println!("  Rank:       #{rank}"),
            PersistenceEvent::Failed { error, .. } => println!("  (score not saved: {error})"),
        }
    }
    print_leaderboard(board);
    Ok(())
}

/// Storage problems only disable saving; the game still runs
fn open_recorder(path: PathBuf) -> Result<ScoreRecorder, GameError> {
    match JsonScoreStore::open(path) {
        Ok(store) => Ok(ScoreRecorder::spawn(Box::new(store))?),
        Err(e) => {
            log::warn!("High scores unavailable ({e}); scores will not be saved");
            Ok(ScoreRecorder::disabled())
        }
    }
}

fn run_flat_out(session: &mut GameSession, commands: &CommandQueue, input: &TickInput, args: &Args) {
    for _ in 0..args.ticks {
        if commands.drain_into(session).is_break() {
            break;
        }
        let events = session.tick_with(input);
        log_events(&events);
        if session.is_game_over() && !args.manual {
            break;
        }
    }
}

fn run_realtime(
    session: &mut GameSession,
    commands: &CommandQueue,
    input: &TickInput,
    args: &Args,
    tick_rate_hz: u32,
) {
    let mut step = FixedStep::new(tick_rate_hz);
    let mut last = Instant::now();
    while session.snapshot().tick < args.ticks {
        let now = Instant::now();
        let elapsed = now.duration_since(last).as_secs_f32();
        last = now;

        if run_frame(session, commands, &mut step, input, elapsed).is_break() {
            break;
        }
        if session.is_game_over() && !args.manual {
            break;
        }
        thread::sleep(Duration::from_secs_f32(step.time_to_next_tick()));
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::Scored { score } => log::info!("Gate cleared, score {score}"),
            GameEvent::GameOver { score, high_score } => {
                println!("Game over! Score {score} (best {high_score})");
            }
            _ => {}
        }
    }
}

fn spawn_stdin_reader(commands: &CommandQueue) -> std::io::Result<()> {
    let tx = commands.sender();
    thread::Builder::new().name("stdin".into()).spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match Command::parse(&line) {
                Some(command) => {
                    if tx.send(command).is_err() || command == Command::Quit {
                        return;
                    }
                }
                None => println!("commands: j (jump), r (restart), q (quit)"),
            }
        }
        let _ = tx.send(Command::Quit);
    })?;
    Ok(())
}

fn print_leaderboard(board: Result<Vec<HighScoreEntry>, StoreError>) {
    println!();
    println!("=== HIGH SCORES ===");
    match board {
        Ok(entries) if entries.is_empty() => println!("  (none yet)"),
        Ok(entries) => {
            for (i, entry) in entries.iter().enumerate() {
                println!("  {:>3}. {:<20} {:>6}", i + 1, entry.username, entry.score);
            }
        }
        Err(e) => println!("  unavailable: {e}"),
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
