//! Walks a predecessor map backward from the goal, marking the route on the
//! grid as it goes.

use itertools::unfold;
use log::{debug, warn};

use crate::error::NoPath;
use crate::grid::{Coord, Grid};
use crate::search::{PredecessorMap, StepEvent};
use crate::tag::Tag;

/// Reconstructs the route recorded in `predecessors`, tagging every
/// intermediate cell [Path](Tag::Path) (the endpoints keep their own tags)
/// and returning the full path in start-to-goal order.
///
/// Fails with [NoPath] if the chain does not reach a predecessor-free root
/// within `rows * cols` steps (a cycle means the map is corrupt, not that no
/// route exists) or if that root is not `start`.
pub fn reconstruct(
    grid: &mut Grid,
    predecessors: &PredecessorMap,
    start: Coord,
    goal: Coord,
) -> Result<Vec<Coord>, NoPath> {
    reconstruct_with(grid, predecessors, start, goal, |_| {})
}

/// Like [reconstruct], but invokes `on_step` for every tag transition so a
/// driving loop can redraw the route cell by cell (goal toward start, the
/// order in which cells are tagged).
pub fn reconstruct_with(
    grid: &mut Grid,
    predecessors: &PredecessorMap,
    start: Coord,
    goal: Coord,
    mut on_step: impl FnMut(StepEvent),
) -> Result<Vec<Coord>, NoPath> {
    let limit = grid.rows() * grid.cols();
    let mut chain: Vec<Coord> = unfold(Some(goal), |state| {
        let current = (*state)?;
        *state = predecessors.get(&current).copied();
        Some(current)
    })
    .take(limit)
    .collect();

    let Some(&root) = chain.last() else {
        return Err(NoPath::CycleDetected { goal, limit });
    };
    if predecessors.contains_key(&root) {
        // The guard truncated the walk: the map loops back on itself.
        warn!("predecessor walk from {goal} exceeded {limit} steps");
        return Err(NoPath::CycleDetected { goal, limit });
    }
    if root != start {
        warn!("predecessor chain from {goal} roots at {root}, not {start}");
        return Err(NoPath::WrongRoot { goal, root, start });
    }

    let interior = chain.len().saturating_sub(2);
    for &coord in chain.iter().skip(1).take(interior) {
        grid.apply(coord, Tag::Path);
        on_step(StepEvent {
            coord,
            tag: Tag::Path,
        });
    }
    debug!(
        "reconstructed a {} step path from {start} to {goal}",
        chain.len() - 1
    );
    chain.reverse();
    Ok(chain)
}
