//! Simulation controller
//!
//! Owns the current generation and the run/pause state machine. Ticks are
//! cooperative: the front-end calls [`Controller::poll`] with the current time
//! and sleeps until [`Controller::next_deadline`]. Each scheduled tick records
//! the run epoch and grid size it was scheduled under; `stop` and `resize` bump
//! the epoch, so a tick from an earlier run can never fire.

use crate::config::{SimConfig, Speed};
use crate::engine;
use crate::error::{Error, Result};
use crate::grid::{Dimensions, Grid, MAX_DIMENSION};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Read-only view of the controller state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationState {
    pub running: bool,
    pub speed: Speed,
    pub tick_interval: Duration,
    pub dimensions: Dimensions,
    pub generation: u64,
}

#[derive(Clone, Copy, Debug)]
struct PendingTick {
    due: Instant,
    epoch: u64,
    dimensions: Dimensions,
}

pub struct Controller {
    config: SimConfig,
    grid: Grid,
    back: Grid,          // scratch buffer the engine writes into
    running: bool,
    speed: Speed,
    epoch: u64,
    pending: Option<PendingTick>,
    generation: u64,
    rng: StdRng,
}

impl Controller {
    pub fn new(config: SimConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0) // Fallback seed for misconfigured system clocks
        });
        let Dimensions { rows, cols } = config.dimensions;

        Self {
            grid: Grid::empty(rows, cols),
            back: Grid::empty(rows, cols),
            running: false,
            speed: config.speed,
            epoch: 0,
            pending: None,
            generation: 0,
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    /// Controller seeded with an initial generation instead of an empty grid
    pub fn with_grid(config: SimConfig, grid: Grid) -> Result<Self> {
        let dims = grid.dimensions();
        if dims.rows > MAX_DIMENSION || dims.cols > MAX_DIMENSION {
            return Err(Error::InvalidDimension(format!(
                "{dims} exceeds the {MAX_DIMENSION}x{MAX_DIMENSION} limit"
            )));
        }
        let mut controller = Self::new(SimConfig {
            dimensions: dims,
            ..config
        });
        controller.grid = grid;
        Ok(controller)
    }

    /// Current generation
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> SimulationState {
        SimulationState {
            running: self.running,
            speed: self.speed,
            tick_interval: self.tick_interval(),
            dimensions: self.grid.dimensions(),
            generation: self.generation,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_interval(&self) -> Duration {
        self.config.presets.interval(self.speed)
    }

    /// Idle -> Running. The first tick is due immediately.
    pub fn start(&mut self, now: Instant) {
        if self.running {
            debug!("start ignored, already running");
            return;
        }
        self.running = true;
        self.epoch += 1;
        self.schedule(now);
        info!(epoch = self.epoch, speed = %self.speed, "simulation started");
    }

    /// Running -> Idle. Any pending tick becomes stale.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.halt();
        info!(generation = self.generation, "simulation stopped");
    }

    pub fn toggle_running(&mut self, now: Instant) {
        if self.running {
            self.stop();
        } else {
            self.start(now);
        }
    }

    /// Fire the pending tick if it is due. Returns true if a generation advanced.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(tick) = self.pending else {
            return false;
        };
        if tick.due > now {
            return false;
        }
        self.pending = None;

        if tick.epoch != self.epoch || tick.dimensions != self.grid.dimensions() {
            debug!(tick_epoch = tick.epoch, epoch = self.epoch, "discarding stale tick");
            return false;
        }

        self.advance();
        if self.running {
            self.schedule(now + self.tick_interval());
        }
        true
    }

    /// When the next live tick is due, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending
            .filter(|tick| tick.epoch == self.epoch)
            .map(|tick| tick.due)
    }

    /// Advance exactly one generation without touching the schedule
    pub fn step(&mut self) {
        self.advance();
        debug!(generation = self.generation, "manual step");
    }

    /// Takes effect from the next scheduled tick on
    pub fn set_speed(&mut self, speed: Speed) {
        if self.speed != speed {
            self.speed = speed;
            info!(%speed, interval_ms = self.config.presets.interval_ms(speed), "speed changed");
        }
    }

    /// Replace the grid with a random one of the same size. Does not pause.
    pub fn randomize(&mut self) -> Result<()> {
        let Dimensions { rows, cols } = self.grid.dimensions();
        self.grid = Grid::random(rows, cols, self.config.alive_probability, &mut self.rng)?;
        self.generation = 0;
        info!(alive = self.grid.alive_count(), "grid randomized");
        Ok(())
    }

    pub fn clear(&mut self) {
        let Dimensions { rows, cols } = self.grid.dimensions();
        self.grid = Grid::empty(rows, cols);
        self.generation = 0;
        info!("grid cleared");
    }

    /// Flip a single cell. On error the grid is left as it was.
    pub fn toggle_cell(&mut self, row: i64, col: i64) -> Result<()> {
        self.grid = self.grid.toggle(row, col)?;
        debug!(row, col, "cell toggled");
        Ok(())
    }

    /// Stop and replace the grid with an empty one of the new size.
    /// Sizes are clamped to [0, 100]; negative sizes are rejected untouched.
    pub fn resize(&mut self, rows: i64, cols: i64) -> Result<Dimensions> {
        let dimensions = Dimensions::clamped(rows, cols)?;
        self.halt();
        self.grid = Grid::empty(dimensions.rows, dimensions.cols);
        self.back = Grid::empty(dimensions.rows, dimensions.cols);
        self.generation = 0;
        info!(%dimensions, "grid resized");
        Ok(dimensions)
    }

    fn halt(&mut self) {
        self.running = false;
        self.epoch += 1;
    }

    fn schedule(&mut self, due: Instant) {
        self.pending = Some(PendingTick {
            due,
            epoch: self.epoch,
            dimensions: self.grid.dimensions(),
        });
    }

    fn advance(&mut self) {
        engine::step_into(&self.grid, &mut self.back);
        std::mem::swap(&mut self.grid, &mut self.back);
        self.generation += 1;
    }
}
