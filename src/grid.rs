use core::fmt;

use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::error::OutOfBounds;
use crate::tag::Tag;

/// Identifies a cell within a grid, row-major. Immutable once a cell exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Coord {
        Coord { row, col }
    }

    /// Manhattan distance, the A* heuristic. Admissible and consistent for
    /// 4-directional unit-cost movement.
    pub fn manhattan_distance(&self, other: &Coord) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// [Grid] owns all cells as a flat row-major [Tag] vector and derives
/// 4-neighbor adjacency on demand; algorithms hold only [Coord] values, never
/// references into the storage. It also maintains connected components over
/// non-blocked cells in a [UnionFind] structure with a dirty flag, so callers
/// can cheaply pre-check [reachable](Self::reachable) without running a
/// search.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Tag>,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl Grid {
    /// Allocates a `rows x cols` grid of [Default](Tag::Default) cells.
    pub fn new(rows: usize, cols: usize) -> Grid {
        let mut grid = Grid {
            rows,
            cols,
            cells: vec![Tag::Default; rows * cols],
            components: UnionFind::new(rows * cols),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    fn ix(&self, coord: Coord) -> usize {
        coord.row * self.cols + coord.col
    }

    fn checked_ix(&self, coord: Coord) -> Result<usize, OutOfBounds> {
        if self.in_bounds(coord) {
            Ok(self.ix(coord))
        } else {
            Err(OutOfBounds {
                coord,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// The tag currently carried by the cell at `coord`.
    pub fn tag(&self, coord: Coord) -> Result<Tag, OutOfBounds> {
        self.checked_ix(coord).map(|ix| self.cells[ix])
    }

    pub(crate) fn raw_tag(&self, coord: Coord) -> Tag {
        self.cells[self.ix(coord)]
    }

    /// Direct tag mutation. Does not enforce the single-start/single-goal
    /// invariant; that is a caller responsibility (use
    /// [place_start](Self::place_start) / [place_goal](Self::place_goal) for
    /// the vacate-then-assign semantics). Blocking a cell flags the connected
    /// components as dirty; unblocking joins the cell to its open neighbours
    /// in place.
    pub fn set_tag(&mut self, coord: Coord, tag: Tag) -> Result<(), OutOfBounds> {
        let ix = self.checked_ix(coord)?;
        let old = self.cells[ix];
        if old == tag {
            return Ok(());
        }
        if tag == Tag::Blocked {
            self.components_dirty = true;
            self.cells[ix] = tag;
        } else if old == Tag::Blocked {
            self.cells[ix] = tag;
            for n in self.neighbors_of(coord) {
                let n_ix = self.ix(n);
                self.components.union(ix, n_ix);
            }
        } else {
            self.cells[ix] = tag;
        }
        Ok(())
    }

    /// Engine-internal mutation; transitions must be legal per
    /// [Tag::may_become] and never involve [Blocked](Tag::Blocked).
    pub(crate) fn apply(&mut self, coord: Coord, tag: Tag) {
        let ix = self.ix(coord);
        debug_assert!(self.cells[ix].may_become(tag));
        debug_assert!(tag != Tag::Blocked && self.cells[ix] != Tag::Blocked);
        self.cells[ix] = tag;
    }

    /// Clears any prior [Start](Tag::Start) cell back to
    /// [Default](Tag::Default), then tags `coord` as the start.
    pub fn place_start(&mut self, coord: Coord) -> Result<(), OutOfBounds> {
        self.place_endpoint(coord, Tag::Start)
    }

    /// Clears any prior [Goal](Tag::Goal) cell back to
    /// [Default](Tag::Default), then tags `coord` as the goal.
    pub fn place_goal(&mut self, coord: Coord) -> Result<(), OutOfBounds> {
        self.place_endpoint(coord, Tag::Goal)
    }

    fn place_endpoint(&mut self, coord: Coord, tag: Tag) -> Result<(), OutOfBounds> {
        // Validate before vacating the old endpoint so a failed placement
        // leaves the grid untouched.
        self.checked_ix(coord)?;
        if let Some(prev) = self.find_tag(tag) {
            let prev_ix = self.ix(prev);
            self.cells[prev_ix] = Tag::Default;
        }
        self.set_tag(coord, tag)
    }

    /// The first cell (row-major) carrying `tag`, if any.
    pub fn find_tag(&self, tag: Tag) -> Option<Coord> {
        self.cells.iter().position(|&t| t == tag).map(|ix| Coord {
            row: ix / self.cols,
            col: ix % self.cols,
        })
    }

    pub fn start(&self) -> Option<Coord> {
        self.find_tag(Tag::Start)
    }

    pub fn goal(&self) -> Option<Coord> {
        self.find_tag(Tag::Goal)
    }

    /// The in-bounds, non-blocked neighbors of `coord` in the deterministic
    /// order down, up, right, left. Derived fresh on every call so a blocked
    /// or unblocked cell is reflected immediately; nothing is cached. An
    /// out-of-bounds `coord` has no neighbors.
    pub fn neighbors_of(&self, coord: Coord) -> SmallVec<[Coord; 4]> {
        let mut neighbors = SmallVec::new();
        if !self.in_bounds(coord) {
            return neighbors;
        }
        let Coord { row, col } = coord;
        if row + 1 < self.rows {
            neighbors.push(Coord::new(row + 1, col));
        }
        if row > 0 {
            neighbors.push(Coord::new(row - 1, col));
        }
        if col + 1 < self.cols {
            neighbors.push(Coord::new(row, col + 1));
        }
        if col > 0 {
            neighbors.push(Coord::new(row, col - 1));
        }
        neighbors.retain(|n| !self.raw_tag(*n).blocks_movement());
        neighbors
    }

    /// Returns every cell to [Default](Tag::Default), clearing start, goal and
    /// blocked cells alike, and discards derived component data.
    pub fn reset(&mut self) {
        self.cells.fill(Tag::Default);
        self.generate_components();
    }

    /// Clears exploration state ([Frontier](Tag::Frontier),
    /// [Visited](Tag::Visited), [Path](Tag::Path)) back to
    /// [Default](Tag::Default) while keeping blocked cells and endpoints, so
    /// the same board can be searched again.
    pub fn clear_exploration(&mut self) {
        for tag in &mut self.cells {
            if tag.is_exploration() {
                *tag = Tag::Default;
            }
        }
    }

    /// Checks whether two cells are on the same connected component. Call
    /// [update](Self::update) first if cells were blocked since the last
    /// regeneration. This is a caller convenience; the search engine never
    /// consults it, so the exploration trace of an unreachable goal is a real
    /// (failing) search.
    pub fn reachable(&self, a: Coord, b: Coord) -> bool {
        if !self.in_bounds(a) || !self.in_bounds(b) {
            return false;
        }
        self.components.equiv(self.ix(a), self.ix(b))
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("components are dirty: regenerating");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up open grid neighbours
    /// to the same components.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.rows * self.cols);
        self.components_dirty = false;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let coord = Coord::new(row, col);
                if self.raw_tag(coord).blocks_movement() {
                    continue;
                }
                let ix = self.ix(coord);
                // Unioning with the down and right neighbors covers every
                // 4-connected open pair once.
                for n in [Coord::new(row + 1, col), Coord::new(row, col + 1)] {
                    if self.in_bounds(n) && !self.raw_tag(n).blocks_movement() {
                        let n_ix = self.ix(n);
                        self.components.union(ix, n_ix);
                    }
                }
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                write!(f, "{}", self.raw_tag(Coord::new(row, col)).glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_default() {
        let grid = Grid::new(3, 4);
        for row in 0..3 {
            for col in 0..4 {
                assert_eq!(grid.tag(Coord::new(row, col)), Ok(Tag::Default));
            }
        }
    }

    #[test]
    fn set_tag_out_of_bounds() {
        let mut grid = Grid::new(3, 3);
        let err = grid.set_tag(Coord::new(3, 0), Tag::Blocked).unwrap_err();
        assert_eq!(
            err,
            OutOfBounds {
                coord: Coord::new(3, 0),
                rows: 3,
                cols: 3
            }
        );
        assert!(grid.tag(Coord::new(0, 3)).is_err());
    }

    #[test]
    fn place_start_vacates_previous() {
        let mut grid = Grid::new(3, 3);
        grid.place_start(Coord::new(0, 0)).unwrap();
        grid.place_start(Coord::new(2, 2)).unwrap();
        assert_eq!(grid.tag(Coord::new(0, 0)), Ok(Tag::Default));
        assert_eq!(grid.tag(Coord::new(2, 2)), Ok(Tag::Start));
        assert_eq!(grid.start(), Some(Coord::new(2, 2)));
    }

    #[test]
    fn failed_placement_leaves_grid_untouched() {
        let mut grid = Grid::new(3, 3);
        grid.place_goal(Coord::new(1, 1)).unwrap();
        assert!(grid.place_goal(Coord::new(5, 5)).is_err());
        assert_eq!(grid.goal(), Some(Coord::new(1, 1)));
    }

    #[test]
    fn neighbor_order_is_down_up_right_left() {
        let grid = Grid::new(3, 3);
        let neighbors = grid.neighbors_of(Coord::new(1, 1));
        assert_eq!(
            neighbors.as_slice(),
            [
                Coord::new(2, 1),
                Coord::new(0, 1),
                Coord::new(1, 2),
                Coord::new(1, 0)
            ]
        );
    }

    #[test]
    fn corner_has_two_neighbors() {
        let grid = Grid::new(3, 3);
        let neighbors = grid.neighbors_of(Coord::new(0, 0));
        assert_eq!(neighbors.as_slice(), [Coord::new(1, 0), Coord::new(0, 1)]);
    }

    #[test]
    fn blocked_cells_are_not_neighbors() {
        let mut grid = Grid::new(3, 3);
        grid.set_tag(Coord::new(2, 1), Tag::Blocked).unwrap();
        grid.set_tag(Coord::new(1, 0), Tag::Blocked).unwrap();
        let neighbors = grid.neighbors_of(Coord::new(1, 1));
        assert_eq!(neighbors.as_slice(), [Coord::new(0, 1), Coord::new(1, 2)]);
    }

    #[test]
    fn blocking_reflects_immediately() {
        // A stale neighbor cache would miss a block placed between calls.
        let mut grid = Grid::new(2, 2);
        assert_eq!(grid.neighbors_of(Coord::new(0, 0)).len(), 2);
        grid.set_tag(Coord::new(1, 0), Tag::Blocked).unwrap();
        assert_eq!(
            grid.neighbors_of(Coord::new(0, 0)).as_slice(),
            [Coord::new(0, 1)]
        );
        grid.set_tag(Coord::new(1, 0), Tag::Default).unwrap();
        assert_eq!(grid.neighbors_of(Coord::new(0, 0)).len(), 2);
    }

    #[test]
    fn out_of_bounds_has_no_neighbors() {
        let grid = Grid::new(2, 2);
        assert!(grid.neighbors_of(Coord::new(9, 9)).is_empty());
    }

    #[test]
    fn neighbor_symmetry() {
        let mut grid = Grid::new(4, 5);
        grid.set_tag(Coord::new(1, 1), Tag::Blocked).unwrap();
        grid.set_tag(Coord::new(2, 3), Tag::Blocked).unwrap();
        for row in 0..4 {
            for col in 0..5 {
                let a = Coord::new(row, col);
                if grid.tag(a).unwrap().blocks_movement() {
                    continue;
                }
                for b in grid.neighbors_of(a) {
                    assert!(
                        grid.neighbors_of(b).contains(&a),
                        "{b} is a neighbor of {a} but not vice versa"
                    );
                }
            }
        }
    }

    #[test]
    fn reset_restores_everything() {
        let mut grid = Grid::new(3, 3);
        grid.place_start(Coord::new(0, 0)).unwrap();
        grid.place_goal(Coord::new(2, 2)).unwrap();
        grid.set_tag(Coord::new(1, 1), Tag::Blocked).unwrap();
        grid.reset();
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(grid.tag(Coord::new(row, col)), Ok(Tag::Default));
            }
        }
        // Nothing is blocked, so the center has all four geometric neighbors.
        assert_eq!(grid.neighbors_of(Coord::new(1, 1)).len(), 4);
        assert!(grid.reachable(Coord::new(0, 0), Coord::new(2, 2)));
    }

    #[test]
    fn clear_exploration_keeps_board() {
        let mut grid = Grid::new(2, 3);
        grid.place_start(Coord::new(0, 0)).unwrap();
        grid.set_tag(Coord::new(0, 1), Tag::Blocked).unwrap();
        grid.apply(Coord::new(1, 0), Tag::Frontier);
        grid.apply(Coord::new(1, 1), Tag::Frontier);
        grid.apply(Coord::new(1, 1), Tag::Visited);
        grid.clear_exploration();
        assert_eq!(grid.tag(Coord::new(0, 0)), Ok(Tag::Start));
        assert_eq!(grid.tag(Coord::new(0, 1)), Ok(Tag::Blocked));
        assert_eq!(grid.tag(Coord::new(1, 0)), Ok(Tag::Default));
        assert_eq!(grid.tag(Coord::new(1, 1)), Ok(Tag::Default));
    }

    /// Tests whether cells are correctly mapped to different connected
    /// components.
    #[test]
    fn component_generation() {
        // .#.
        // .#.
        let mut grid = Grid::new(2, 3);
        grid.set_tag(Coord::new(0, 1), Tag::Blocked).unwrap();
        grid.set_tag(Coord::new(1, 1), Tag::Blocked).unwrap();
        grid.update();
        assert!(grid.reachable(Coord::new(0, 0), Coord::new(1, 0)));
        assert!(!grid.reachable(Coord::new(0, 0), Coord::new(0, 2)));
        assert!(!grid.reachable(Coord::new(0, 0), Coord::new(0, 1)));
    }

    #[test]
    fn unblocking_rejoins_components() {
        // .#.      ...
        // .#.  ->  .#.
        let mut grid = Grid::new(2, 3);
        grid.set_tag(Coord::new(0, 1), Tag::Blocked).unwrap();
        grid.set_tag(Coord::new(1, 1), Tag::Blocked).unwrap();
        grid.update();
        assert!(!grid.reachable(Coord::new(0, 0), Coord::new(0, 2)));
        grid.set_tag(Coord::new(0, 1), Tag::Default).unwrap();
        assert!(grid.reachable(Coord::new(0, 0), Coord::new(0, 2)));
    }

    #[test]
    fn display_renders_glyphs() {
        let mut grid = Grid::new(2, 2);
        grid.place_start(Coord::new(0, 0)).unwrap();
        grid.set_tag(Coord::new(1, 1), Tag::Blocked).unwrap();
        assert_eq!(format!("{grid}"), "S.\n.#\n");
    }
}
