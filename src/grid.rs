//! Fixed-size grid of binary cells
//!
//! Cells are stored row-major in a flat buffer. Edges are hard: there is no
//! wrap-around, so the grid has exactly `rows * cols` cells and nothing else.

use crate::error::{Error, Result};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Largest row or column count accepted by a resize
pub const MAX_DIMENSION: usize = 100;

/// Grid size as (rows, cols)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

impl Dimensions {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Validate a caller-supplied size. Negative values are rejected,
    /// anything above `MAX_DIMENSION` is clamped down to it.
    pub fn clamped(rows: i64, cols: i64) -> Result<Self> {
        Ok(Self {
            rows: clamp_axis("rows", rows)?,
            cols: clamp_axis("cols", cols)?,
        })
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

fn clamp_axis(axis: &str, value: i64) -> Result<usize> {
    if value < 0 {
        return Err(Error::InvalidDimension(format!("{axis} must not be negative, got {value}")));
    }
    Ok((value as u64).min(MAX_DIMENSION as u64) as usize)
}

/// A generation of the automaton
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// All-dead grid
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Grid where each cell is independently alive with `alive_probability`
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        alive_probability: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&alive_probability) {
            return Err(Error::InvalidProbability(alive_probability));
        }
        let cells = (0..rows * cols)
            .map(|_| rng.gen_bool(alive_probability))
            .collect();
        Ok(Self { rows, cols, cells })
    }

    /// Empty grid with the listed (row, col) cells brought to life
    pub fn from_live_cells(rows: usize, cols: usize, live: &[(usize, usize)]) -> Result<Self> {
        let mut grid = Self::empty(rows, cols);
        for &(row, col) in live {
            grid.set(row, col, true)?;
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.rows, self.cols)
    }

    /// Cell state, or None when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        (row < self.rows && col < self.cols).then(|| self.cells[self.index(row, col)])
    }

    /// Overwrite a single cell in place
    pub fn set(&mut self, row: usize, col: usize, alive: bool) -> Result<()> {
        let (row, col) = self.checked(row as i64, col as i64)?;
        let idx = self.index(row, col);
        self.cells[idx] = alive;
        Ok(())
    }

    /// Copy of this grid with the cell at (row, col) flipped
    pub fn toggle(&self, row: i64, col: i64) -> Result<Grid> {
        let (row, col) = self.checked(row, col)?;
        let mut next = self.clone();
        let idx = next.index(row, col);
        next.cells[idx] = !next.cells[idx];
        Ok(next)
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&alive| alive)
    }

    /// Rows as slices, top to bottom
    pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        (0..self.rows).map(move |row| &self.cells[row * self.cols..(row + 1) * self.cols])
    }

    pub(crate) fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn checked(&self, row: i64, col: i64) -> Result<(usize, usize)> {
        let in_rows = row >= 0 && (row as u64) < self.rows as u64;
        let in_cols = col >= 0 && (col as u64) < self.cols as u64;
        if in_rows && in_cols {
            Ok((row as usize, col as usize))
        } else {
            Err(Error::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
}

/// Text form: one line per row, `#` alive, `.` dead
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            let line: String = row.iter().map(|&alive| if alive { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = Error;

    /// Parse the text form. Blank lines are skipped; `#`, `O` and `*` are alive.
    fn from_str(s: &str) -> Result<Self> {
        let lines: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let cols = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        let mut cells = Vec::with_capacity(lines.len() * cols);

        for (row, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != cols {
                return Err(Error::Parse(format!(
                    "row {row} has {width} cells, expected {cols}"
                )));
            }
            for ch in line.chars() {
                cells.push(match ch {
                    '#' | 'O' | '*' => true,
                    '.' => false,
                    other => return Err(Error::Parse(format!("unexpected cell character {other:?}"))),
                });
            }
        }

        Ok(Self {
            rows: lines.len(),
            cols,
            cells,
        })
    }
}
