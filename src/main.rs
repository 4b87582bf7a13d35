mod app;
mod config;
mod controller;
mod engine;
mod error;
mod grid;
mod input;
mod settings;
mod terminal;

use clap::{Args, Parser, Subcommand};
use config::{SimConfig, Speed};
use controller::Controller;
use error::Result;
use grid::Grid;
use settings::Settings;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "termlife")]
#[command(author = "Terminal Art Generator")]
#[command(version)]
#[command(about = "termlife: Conway's Game of Life in the terminal", long_about = None)]
struct Cli {
    /// Append logs to this file (filter with RUST_LOG, default "info")
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive simulator
    Play {
        #[command(flatten)]
        grid: GridArgs,

        /// Start running immediately
        #[arg(short, long)]
        autostart: bool,
    },

    /// Evolve a grid without a UI and print the final generation
    Print {
        #[command(flatten)]
        grid: GridArgs,

        /// Number of generations to evolve
        #[arg(short, long, default_value = "1")]
        generations: u64,

        /// Read the initial grid from a text file ('#' alive, '.' dead)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GridArgs {
    /// Number of rows (0-100, larger values are clamped)
    #[arg(short, long)]
    rows: Option<String>,

    /// Number of columns (0-100, larger values are clamped)
    #[arg(short, long)]
    cols: Option<String>,

    /// Generation speed
    #[arg(long, value_enum)]
    speed: Option<Speed>,

    /// Fill the grid randomly (~20% alive) before starting
    #[arg(long)]
    random: bool,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,
}

impl GridArgs {
    /// Layer command-line flags over the settings-derived config
    fn config(&self, base: SimConfig) -> Result<SimConfig> {
        let mut config = base;
        if let Some(rows) = &self.rows {
            config.dimensions.rows = input::parse_size_field(rows)?;
        }
        if let Some(cols) = &self.cols {
            config.dimensions.cols = input::parse_size_field(cols)?;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let base = Settings::load()
        .apply(&SimConfig::default())
        .unwrap_or_else(|err| {
            warn!(%err, "invalid settings, using defaults");
            SimConfig::default()
        });

    match cli.command {
        Commands::Play { grid, autostart } => {
            let mut controller = Controller::new(grid.config(base)?);
            if grid.random {
                controller.randomize()?;
            }
            if autostart {
                controller.start(Instant::now());
            }
            app::run(controller)?;
        }
        Commands::Print {
            grid,
            generations,
            input,
        } => {
            let config = grid.config(base)?;
            let mut controller = match input {
                Some(path) => {
                    let initial: Grid = fs::read_to_string(path)?.parse()?;
                    Controller::with_grid(config, initial)?
                }
                None => Controller::new(config),
            };
            if grid.random {
                controller.randomize()?;
            }
            for _ in 0..generations {
                controller.step();
            }
            print!("{}", controller.grid());
        }
    }

    Ok(())
}
