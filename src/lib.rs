//! # grid_stepsearch
//!
//! A grid-based path search engine with observable, stepwise execution.
//! Implements [breadth-first search](https://en.wikipedia.org/wiki/Breadth-first_search)
//! and [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) with the
//! [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry)
//! heuristic on a uniform-cost 4-connected grid. A search is driven as a lazy
//! iterator of [StepEvent]s, one tag transition per step, so an external loop
//! can redraw, throttle or cancel between steps without the core knowing
//! anything about rendering. Pre-computes
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! so callers can check reachability without flood-filling.
//!
//! ```
//! use grid_stepsearch::{find_path, Coord, Grid, Tag, Variant};
//!
//! let mut grid = Grid::new(5, 5);
//! grid.set_tag(Coord::new(1, 1), Tag::Blocked).unwrap();
//! let path = find_path(
//!     &mut grid,
//!     Coord::new(0, 0),
//!     Coord::new(4, 4),
//!     Variant::AStarStrict,
//! )
//! .unwrap();
//! assert_eq!(path.unwrap().len(), 9);
//! ```

pub mod error;
pub mod grid;
pub mod path;
pub mod search;
pub mod tag;

use log::error;

pub use crate::error::{Endpoint, Error, InvalidEndpoints, NoPath, OutOfBounds, Result};
pub use crate::grid::{Coord, Grid};
pub use crate::search::{
    run, run_to_completion, PredecessorMap, SearchResult, SearchRun, StepEvent, Variant,
};
pub use crate::tag::Tag;

/// Runs a search to completion and reconstructs the route on success. Returns
/// `Ok(None)` when the goal is unreachable; that is an expected outcome, not
/// an error. The returned path is start-to-goal inclusive, so its length is
/// the step count plus one.
pub fn find_path(
    grid: &mut Grid,
    start: Coord,
    goal: Coord,
    variant: Variant,
) -> Result<Option<Vec<Coord>>> {
    match search::run(grid, start, goal, variant)?.finish() {
        SearchResult::Found { predecessors } => {
            let found = path::reconstruct(grid, &predecessors, start, goal).map_err(|e| {
                error!("search reported success but reconstruction failed: {e}");
                e
            })?;
            Ok(Some(found))
        }
        SearchResult::NotFound => Ok(None),
    }
}
