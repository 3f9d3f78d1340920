//! Headless jigsaw puzzle front end.
//!
//! Cuts puzzles, inspects save files, plays puzzles with a scripted player
//! and manages the challenge progress and leaderboard stores.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use jigsaw_cli::{
    DEFAULT_STEP_MILLIS,
    autoplay::autoplay,
    clock,
    manifest::CropManifest,
    setup::{PuzzleSetup, challenge_config},
    store::{DataDir, save_json},
};
use jigsaw_core::GridSize;
use jigsaw_game::{
    Category, ChallengeLevel, ImageRef, ImportStrategy, LeaderboardEntry, SaveData, Session,
};
use jigsaw_generator::{PieceGenerator, PieceMode, ShapeSeed, SourceImage};

#[derive(Debug, Parser)]
#[command(name = "jigsaw", version, about)]
struct Cli {
    /// Directory holding challenge progress and the leaderboard
    #[arg(long, default_value = ".jigsaw", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Cut and scatter a puzzle, printing the starting layout
    Generate {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Write the starting layout as a save file
        #[arg(long)]
        save: Option<PathBuf>,
        /// Write the crop jobs for every piece texture
        #[arg(long)]
        crops: Option<PathBuf>,
    },
    /// Load a save file and report its state
    Inspect {
        /// Save file to read
        file: PathBuf,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Assemble a puzzle with the scripted player
    Autoplay {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Play a challenge level instead of a normal puzzle
        #[arg(long)]
        challenge: Option<u8>,
        /// Simulated milliseconds per command
        #[arg(long, default_value_t = DEFAULT_STEP_MILLIS)]
        step_ms: u64,
        /// Write the final layout as a save file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Show or change challenge progress
    Challenge {
        #[command(subcommand)]
        action: ChallengeAction,
    },
    /// Show, export or import best times
    Leaderboard {
        #[command(subcommand)]
        action: LeaderboardAction,
    },
}

#[derive(Debug, Subcommand)]
enum ChallengeAction {
    /// List levels with their state
    Status,
    /// Unlock and complete every level
    UnlockAll,
}

#[derive(Debug, Subcommand)]
enum LeaderboardAction {
    /// Print the best times per category
    Show,
    /// Write the leaderboard to a file
    Export { file: PathBuf },
    /// Read a leaderboard file into the store
    Import {
        file: PathBuf,
        /// Discard the stored entries instead of merging
        #[arg(long)]
        replace: bool,
    },
}

#[derive(Debug, Clone, Args)]
struct ImageArgs {
    /// Source image width in pixels
    #[arg(long, default_value_t = 1024)]
    image_width: u32,
    /// Source image height in pixels
    #[arg(long, default_value_t = 768)]
    image_height: u32,
}

impl ImageArgs {
    fn source(&self) -> SourceImage {
        SourceImage {
            width: self.image_width,
            height: self.image_height,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct PuzzleArgs {
    /// Image identifier
    #[arg(long, default_value = "sample")]
    image_key: String,
    /// Image display name
    #[arg(long, default_value = "Sample")]
    image_name: String,
    #[command(flatten)]
    image: ImageArgs,
    /// Number of columns
    #[arg(long, default_value_t = 4, value_parser = grid_side())]
    cols: u16,
    /// Number of rows
    #[arg(long, default_value_t = 3, value_parser = grid_side())]
    rows: u16,
    /// Piece shape
    #[arg(long, value_enum, default_value_t = ModeArg::Rect)]
    mode: ModeArg,
    /// Start pieces at random quarter turns
    #[arg(long)]
    rotate: bool,
    /// Shape seed; random when omitted
    #[arg(long)]
    seed: Option<ShapeSeed>,
}

impl PuzzleArgs {
    fn setup(&self) -> PuzzleSetup {
        PuzzleSetup {
            image: ImageRef {
                key: self.image_key.clone(),
                name: self.image_name.clone(),
            },
            source: self.image.source(),
            grid: GridSize::new(self.cols, self.rows),
            mode: self.mode.into(),
            rotate: self.rotate,
        }
    }

    fn seed(&self) -> ShapeSeed {
        self.seed.unwrap_or_else(ShapeSeed::random)
    }
}

fn grid_side() -> clap::builder::RangedI64ValueParser<u16> {
    clap::value_parser!(u16).range(i64::from(GridSize::MIN)..=i64::from(GridSize::MAX))
}

#[derive(Debug, Clone, Copy, ValueEnum, derive_more::Display)]
enum ModeArg {
    #[display("rect")]
    Rect,
    #[display("quad")]
    Quad,
}

impl From<ModeArg> for PieceMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Rect => Self::Rect,
            ModeArg::Quad => Self::Quad,
        }
    }
}

fn main() -> Result<()> {
    better_panic::install();
    env_logger::init();

    let cli = Cli::parse();
    let data = DataDir::new(cli.data_dir);
    match cli.command {
        Command::Generate {
            puzzle,
            save,
            crops,
        } => generate(&puzzle, save.as_deref(), crops.as_deref()),
        Command::Inspect { file, image } => inspect(&file, &image),
        Command::Autoplay {
            puzzle,
            challenge,
            step_ms,
            save,
        } => run_autoplay(
            &data,
            &puzzle,
            challenge,
            Duration::from_millis(step_ms),
            save.as_deref(),
        ),
        Command::Challenge { action } => challenge_command(&data, &action),
        Command::Leaderboard { action } => leaderboard_command(&data, action),
    }
}

fn generate(puzzle: &PuzzleArgs, save: Option<&Path>, crops: Option<&Path>) -> Result<()> {
    let config = puzzle.setup().session_config();
    let seed = puzzle.seed();
    let session = if let Some(path) = crops {
        let mut manifest = CropManifest::default();
        let Ok(generated) = PieceGenerator::new().generate(
            puzzle.image.source(),
            &config.partition_config(),
            seed,
            &mut manifest,
        );
        fs::write(path, manifest.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("wrote {} crop jobs to {}", manifest.len(), path.display());
        Session::from_generated(config, generated)
    } else {
        Session::new(config, seed)
    };

    print_layout(&session);
    if let Some(path) = save {
        save_json(path, &session.export_state())?;
        println!("saved to {}", path.display());
    }
    Ok(())
}

fn print_layout(session: &Session) {
    let config = session.config();
    println!(
        "{}x{} {} puzzle, {}x{} px, seed {}",
        config.grid.cols(),
        config.grid.rows(),
        config.mode.as_str(),
        config.puzzle_width,
        config.puzzle_height,
        session.seed(),
    );
    for pos in session.board().stack() {
        let Some(piece) = session.board().piece(*pos) else {
            continue;
        };
        let bounds = piece.world_bounds();
        println!(
            "  {:>5}  at ({:>7.1}, {:>7.1})  rot {}  box {:.0}x{:.0}",
            pos.to_string(),
            piece.position().x,
            piece.position().y,
            piece.rotation(),
            bounds.width(),
            bounds.height(),
        );
    }
}

fn inspect(file: &Path, image: &ImageArgs) -> Result<()> {
    let text =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let save = SaveData::from_json(&text)
        .with_context(|| format!("Invalid save file {}", file.display()))?;
    // Grid, cut style and image come from the save.
    let base = PuzzleSetup {
        image: ImageRef::default(),
        source: image.source(),
        grid: GridSize::new(2, 2),
        mode: PieceMode::Rect,
        rotate: false,
    }
    .session_config();
    let session = Session::from_save(&save, base)
        .with_context(|| format!("Cannot restore {}", file.display()))?;

    print_layout(&session);
    let board = session.board();
    let mut sizes: Vec<_> = board.groups().iter().map(|g| g.len()).collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    println!("image: {} ({})", session.config().image.name, session.config().image.key);
    println!("status: {}", session.status());
    println!("time: {:.2}s", session.timer().seconds());
    println!("groups: {} {sizes:?}", board.groups().len());
    Ok(())
}

fn run_autoplay(
    data: &DataDir,
    puzzle: &PuzzleArgs,
    challenge: Option<u8>,
    step: Duration,
    save: Option<&Path>,
) -> Result<()> {
    let config = match challenge {
        Some(level) => {
            let progress = data.load_progress();
            let Some(level) = ChallengeLevel::get(level) else {
                bail!("no challenge level {level}");
            };
            if !progress.is_unlocked(level.level) {
                bail!("challenge level {} is locked", level.level);
            }
            challenge_config(&level, puzzle.image.source())
        }
        None => puzzle.setup().session_config(),
    };
    let mut session = Session::new(config, puzzle.seed());
    let report = autoplay(&mut session, step)?;
    println!(
        "{} drags, {} turns, {} events: {}",
        report.drags,
        report.turns,
        report.events.len(),
        session.status()
    );

    if let Some(elapsed) = report.solved_in() {
        record_win(data, &session, elapsed)?;
    } else if session.status().is_failed() {
        println!("time is up");
    }
    if let Some(path) = save {
        save_json(path, &session.export_state())?;
        println!("saved to {}", path.display());
    }
    Ok(())
}

fn record_win(data: &DataDir, session: &Session, elapsed: f64) -> Result<()> {
    let config = session.config();
    if let Some(rules) = config.challenge {
        let mut progress = data.load_progress();
        progress.mark_completed(rules.level);
        data.save_progress(&progress)?;
        println!("challenge level {} completed in {elapsed:.2}s", rules.level);
        match progress.next_level() {
            Some(next) => println!("next level: {next}"),
            None => println!("all levels completed"),
        }
        return Ok(());
    }

    let mut leaderboard = data.load_leaderboard();
    let category = leaderboard.add(LeaderboardEntry {
        time: elapsed,
        image_key: config.image.key.clone(),
        image_name: config.image.name.clone(),
        rows: config.grid.rows(),
        cols: config.grid.cols(),
        date_iso: clock::now_iso(),
    });
    data.save_leaderboard(&leaderboard)?;
    let rank = leaderboard
        .entries(category)
        .iter()
        .position(|entry| entry.time.total_cmp(&elapsed).is_eq());
    match rank {
        Some(rank) => println!("solved in {elapsed:.2}s, #{} in {category}", rank + 1),
        None => println!("solved in {elapsed:.2}s"),
    }
    Ok(())
}

fn challenge_command(data: &DataDir, action: &ChallengeAction) -> Result<()> {
    let mut progress = data.load_progress();
    if let ChallengeAction::UnlockAll = action {
        progress.unlock_all();
        data.save_progress(&progress)?;
    }
    for level in ChallengeLevel::all() {
        let state = if progress.is_completed(level.level) {
            "completed"
        } else if progress.is_unlocked(level.level) {
            "unlocked"
        } else {
            "locked"
        };
        println!(
            "level {}: {}x{} {}, {:.0}s  [{state}]",
            level.level,
            level.grid.cols(),
            level.grid.rows(),
            level.mode.as_str(),
            level.time_limit,
        );
    }
    Ok(())
}

fn leaderboard_command(data: &DataDir, action: LeaderboardAction) -> Result<()> {
    match action {
        LeaderboardAction::Show => {
            let leaderboard = data.load_leaderboard();
            for category in Category::ALL {
                println!("{category}");
                for (rank, entry) in leaderboard.entries(category).iter().enumerate() {
                    println!(
                        "  {}. {:>8.2}s  {}x{}  {}  {}",
                        rank + 1,
                        entry.time,
                        entry.cols,
                        entry.rows,
                        entry.image_name,
                        entry.date_iso,
                    );
                }
            }
        }
        LeaderboardAction::Export { file } => {
            data.export_leaderboard(&file, clock::now_iso())?;
            println!("exported to {}", file.display());
        }
        LeaderboardAction::Import { file, replace } => {
            let strategy = if replace {
                ImportStrategy::Replace
            } else {
                ImportStrategy::Merge
            };
            data.import_leaderboard(&file, strategy)?;
            println!("imported {}", file.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_side_is_range_checked() {
        let args = ["jigsaw", "generate", "--cols", "30", "--rows", "2"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Generate { puzzle, .. } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!((puzzle.cols, puzzle.rows), (30, 2));

        assert!(Cli::try_parse_from(["jigsaw", "generate", "--cols", "31"]).is_err());
        assert!(Cli::try_parse_from(["jigsaw", "autoplay", "--rows", "1"]).is_err());
    }
}
