#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates and inspects treasure hunt boards.

mod board_file;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use treasure_hunt_system_maze_generation::{GenerationError, MazeGenerator, MazeParameters};
use treasure_hunt_world::{Board, BoardQuery};

/// Treasure hunt board tooling.
#[derive(Parser, Debug)]
#[command(name = "treasure-hunt", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a random maze and write it as a board file.
    Generate(GenerateArgs),
    /// Load a board file and print a summary of it.
    Inspect {
        /// Board file to read.
        file: PathBuf,
    },
}

/// Flags override values loaded from `--config`, which override the defaults.
#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// TOML file with generation parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board name, also used for the default output file.
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Board width including the border.
    #[arg(short = 'w', long)]
    width: Option<u32>,

    /// Board height including the border.
    #[arg(long)]
    height: Option<u32>,

    /// Number of treasures to place.
    #[arg(short = 't', long = "treasures")]
    treasure_count: Option<u32>,

    /// Percentage of branching candidates that are carved.
    #[arg(short = 'b', long = "branch")]
    branch_factor: Option<u32>,

    /// Percentage of uncarved interior squares left open.
    #[arg(short = 'o', long = "open")]
    open_factor: Option<u32>,

    /// Step budget of the board.
    #[arg(short = 's', long = "steps")]
    max_steps: Option<u32>,

    /// Seed for reproducible boards; omitted seeds draw from the OS.
    #[arg(long)]
    seed: Option<u64>,

    /// Destination file; defaults to `<name>.csv`.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl GenerateArgs {
    fn parameters(&self) -> Result<MazeParameters> {
        let mut parameters = match &self.config {
            Some(path) => load_parameters(path)?,
            None => MazeParameters::default(),
        };
        if let Some(name) = &self.name {
            parameters.name = name.clone();
        }
        let overrides = [
            (self.width, &mut parameters.width),
            (self.height, &mut parameters.height),
            (self.treasure_count, &mut parameters.treasure_count),
            (self.branch_factor, &mut parameters.branch_factor),
            (self.open_factor, &mut parameters.open_factor),
            (self.max_steps, &mut parameters.max_steps),
        ];
        for (flag, value) in overrides {
            if let Some(flag) = flag {
                *value = flag;
            }
        }
        Ok(parameters)
    }

    fn output_path(&self, parameters: &MazeParameters) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(&parameters.name).with_extension(board_file::EXTENSION)
        })
    }
}

/// Entry point for the treasure hunt command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate(&args),
        Command::Inspect { file } => inspect(&file),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_parameters(path: &Path) -> Result<MazeParameters> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read generator config at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse generator config at {}", path.display()))
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let parameters = args.parameters()?;
    let mut generator = match args.seed {
        Some(seed) => MazeGenerator::from_seed(seed),
        None => MazeGenerator::from_entropy(),
    };
    let layout = generator
        .generate_layout(&parameters)
        .context("failed to generate maze")?;
    let board = Board::from_layout(&layout)
        .map_err(GenerationError::from)
        .context("generated maze is not playable")?;

    let contents = board_file::encode(&layout);
    let path = args.output_path(&parameters);
    fs::write(&path, &contents)
        .with_context(|| format!("failed to write board file {}", path.display()))?;

    info!(
        path = %path.display(),
        treasures = board.initial_treasure_count(),
        "board written"
    );
    print!("{contents}");
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read board file {}", path.display()))?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    let layout = board_file::decode(&name, &contents)
        .with_context(|| format!("failed to decode board file {}", path.display()))?;
    let board = Board::from_layout(&layout)
        .with_context(|| format!("board file {} is not playable", path.display()))?;

    println!("{}", summary(&board));
    println!("{board}");
    Ok(())
}

fn summary<B: BoardQuery + ?Sized>(board: &B) -> String {
    let treasures: Vec<String> = board
        .treasures()
        .into_iter()
        .map(|square| square.location().to_string())
        .collect();
    format!(
        "board: {}\nsize: {}x{}\nstart: {}\nmax steps: {}\ntreasures ({}): {}\nscore: {}",
        board.name(),
        board.width(),
        board.height(),
        board.starting_location(),
        board.max_steps(),
        treasures.len(),
        treasures.join(" "),
        board.score(),
    )
}
