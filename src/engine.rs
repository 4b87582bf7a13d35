//! Conway's Game of Life transition
//!
//! Every cell of the output is computed from the same input generation.
//! Neighbors outside the grid do not exist: edge cells see 5 candidates and
//! corner cells see 3.

use crate::grid::Grid;

/// Relative offsets of the 8 neighbors
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (0, 1),
    (0, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
    (-1, -1),
    (1, 0),
    (-1, 0),
];

/// Compute the next generation as a freshly allocated grid
pub fn step(grid: &Grid) -> Grid {
    let mut next = Grid::empty(grid.rows(), grid.cols());
    step_into(grid, &mut next);
    next
}

/// Compute the next generation of `src` into `dst`, reusing its buffer.
///
/// `dst` is reshaped to `src`'s dimensions if they differ.
pub fn step_into(src: &Grid, dst: &mut Grid) {
    if dst.dimensions() != src.dimensions() {
        *dst = Grid::empty(src.rows(), src.cols());
    }

    let cols = src.cols();
    let cells = src.cells();
    let out = dst.cells_mut();

    for row in 0..src.rows() {
        for col in 0..cols {
            let neighbors = live_neighbors(src, row, col);
            let alive = cells[row * cols + col];
            out[row * cols + col] = next_state(alive, neighbors);
        }
    }
}

/// Number of live in-bounds neighbors of (row, col)
pub fn live_neighbors(grid: &Grid, row: usize, col: usize) -> u8 {
    let mut count = 0u8;
    for (dr, dc) in NEIGHBOR_OFFSETS {
        let (Some(r), Some(c)) = (row.checked_add_signed(dr), col.checked_add_signed(dc)) else {
            continue;
        };
        if grid.get(r, c) == Some(true) {
            count += 1;
        }
    }
    count
}

#[inline]
fn next_state(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Grid {
        text.parse().unwrap()
    }

    #[test]
    fn dead_grid_stays_dead() {
        let grid = Grid::empty(6, 9);
        assert_eq!(step(&grid), grid);
    }

    #[test]
    fn isolated_cell_dies() {
        let grid = Grid::from_live_cells(5, 5, &[(2, 2)]).unwrap();
        assert!(step(&grid).is_empty());
    }

    #[test]
    fn blinker_has_period_two() {
        let vertical = parse(
            "
            .....
            ..#..
            ..#..
            ..#..
            .....
            ",
        );
        let horizontal = parse(
            "
            .....
            .....
            .###.
            .....
            .....
            ",
        );

        let once = step(&vertical);
        assert_eq!(once, horizontal);
        assert_ne!(once, vertical);
        assert_eq!(step(&once), vertical);
    }

    #[test]
    fn block_is_stable() {
        let block = parse(
            "
            ....
            .##.
            .##.
            ....
            ",
        );
        assert_eq!(step(&block), block);
    }

    #[test]
    fn block_in_corner_is_stable() {
        let block = parse(
            "
            ##.
            ##.
            ...
            ",
        );
        assert_eq!(step(&block), block);
    }

    #[test]
    fn corner_counts_only_in_bounds_neighbors() {
        let grid = parse(
            "
            ##.
            ##.
            ...
            ",
        );
        assert_eq!(live_neighbors(&grid, 0, 0), 3);

        let full = parse(
            "
            ###
            ###
            ###
            ",
        );
        assert_eq!(live_neighbors(&full, 0, 0), 3);
        assert_eq!(live_neighbors(&full, 0, 1), 5);
        assert_eq!(live_neighbors(&full, 1, 1), 8);
    }

    #[test]
    fn edges_do_not_wrap() {
        // A horizontal line touching both side walls would survive on a torus
        let grid = parse(
            "
            ...
            ###
            ...
            ",
        );
        let next = step(&grid);
        assert_eq!(next, parse(".#.\n.#.\n.#."));
    }

    #[test]
    fn birth_requires_exactly_three() {
        let grid = parse(
            "
            #.#
            ...
            #..
            ",
        );
        // (1, 1) has 3 live neighbors, (1, 0) has 2
        let next = step(&grid);
        assert_eq!(next.get(1, 1), Some(true));
        assert_eq!(next.get(1, 0), Some(false));
    }

    #[test]
    fn overcrowded_cell_dies() {
        let grid = parse(
            "
            ###
            ###
            ...
            ",
        );
        // (0, 1) and (1, 1) each have 5 live neighbors
        let next = step(&grid);
        assert_eq!(next.get(0, 1), Some(false));
        assert_eq!(next.get(1, 1), Some(false));
        assert_eq!(next.get(0, 0), Some(true));
    }

    #[test]
    fn input_is_untouched() {
        let grid = parse(".#.\n.#.\n.#.");
        let before = grid.clone();
        let _ = step(&grid);
        assert_eq!(grid, before);
    }

    #[test]
    fn step_is_deterministic() {
        let grid = parse(
            "
            .#..#
            ##.#.
            ..###
            #....
            ",
        );
        assert_eq!(step(&grid), step(&grid));
    }

    #[test]
    fn step_into_reshapes_stale_buffer() {
        let src = parse(".#.\n.#.\n.#.");
        let mut dst = Grid::empty(10, 10);
        step_into(&src, &mut dst);
        assert_eq!(dst, step(&src));
    }

    #[test]
    fn degenerate_grids() {
        assert_eq!(step(&Grid::empty(0, 0)), Grid::empty(0, 0));
        assert_eq!(step(&Grid::empty(0, 5)), Grid::empty(0, 5));
        let line = Grid::from_live_cells(1, 3, &[(0, 0), (0, 1), (0, 2)]).unwrap();
        assert_eq!(step(&line), Grid::from_live_cells(1, 3, &[(0, 1)]).unwrap());
    }
}
