use clap::Parser;
use std::path::PathBuf;
use tactics_battle::rosters::{create_prefab_battle, get_prefab_rosters};
use tactics_battle::{BattleResult, BattleSettings, Difficulty, LogVerbosity};
use tracing::{info, warn};

/// Run an AI-vs-AI battle between two prefab rosters and print the log.
#[derive(Parser, Debug)]
#[command(name = "tactics-battle", version)]
struct Args {
    /// Roster fighting on the player side
    #[arg(long, default_value = "vanguard")]
    players: String,

    /// Roster fighting on the enemy side
    #[arg(long, default_value = "goblin_raiders")]
    enemies: String,

    /// AI tier used by every combatant
    #[arg(short, long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// Fixed RNG seed for a reproducible battle
    #[arg(short, long)]
    seed: Option<u64>,

    /// RON settings file; flags given on the command line take precedence
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Log detail
    #[arg(short, long, value_enum)]
    verbosity: Option<VerbosityArg>,

    /// Stop after this many actions if nobody has won
    #[arg(long, default_value = "200")]
    max_turns: u32,

    /// List the available rosters and exit
    #[arg(long)]
    list: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum VerbosityArg {
    /// Damage, defeats and the result only
    Quiet,
    Normal,
    /// Also shows events that normally print nothing
    Verbose,
}

impl From<VerbosityArg> for LogVerbosity {
    fn from(arg: VerbosityArg) -> Self {
        match arg {
            VerbosityArg::Quiet => LogVerbosity::Quiet,
            VerbosityArg::Normal => LogVerbosity::Normal,
            VerbosityArg::Verbose => LogVerbosity::Verbose,
        }
    }
}

fn main() -> BattleResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.list {
        for roster in get_prefab_rosters() {
            println!("{:<16} {} - {}", roster.id, roster.name, roster.description);
        }
        return Ok(());
    }

    let mut settings = match &args.settings {
        Some(path) => BattleSettings::load(path)?,
        None => BattleSettings::default(),
    };
    if let Some(difficulty) = args.difficulty {
        settings.difficulty = difficulty.into();
    }
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(verbosity) = args.verbosity {
        settings.verbosity = verbosity.into();
    }

    let verbosity = settings.verbosity;
    let mut battle = create_prefab_battle(settings, &args.players, &args.enemies)?;
    info!(players = %args.players, enemies = %args.enemies, "Battle started");

    let mut actions = 0;
    while actions < args.max_turns && battle.take_ai_turn().is_some() {
        actions += 1;
    }
    if !battle.status().is_over() {
        warn!(max_turns = args.max_turns, "Battle stopped before a winner was decided");
    }

    for line in battle.log().render(verbosity) {
        println!("{}", line);
    }
    println!();
    println!("Result: {} after {} rounds", battle.status(), battle.turn_number());

    Ok(())
}
