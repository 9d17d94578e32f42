//! The stepwise search engine. A run is a lazy [StepEvent] iterator: every
//! call to `next` performs exactly one discrete tag mutation on the grid and
//! hands control back, so a driving loop can redraw (or count, or cancel)
//! between steps without the engine knowing anything about presentation.

mod frontier;

use core::fmt;
use std::mem;

use fxhash::{FxBuildHasher, FxHashMap, FxHashSet};
use indexmap::IndexMap;
use log::info;
use smallvec::SmallVec;

use crate::error::{Endpoint, InvalidEndpoints};
use crate::grid::{Coord, Grid};
use crate::search::frontier::Frontier;
use crate::tag::Tag;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Records for each discovered cell which cell discovered it first along the
/// currently-best-known route. Absent entries mean "no predecessor recorded";
/// the start never has one. Insertion-ordered, so iterating it replays
/// discovery order.
pub type PredecessorMap = FxIndexMap<Coord, Coord>;

/// The algorithm a run executes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    /// FIFO frontier, no heuristic.
    BreadthFirst,
    /// True priority order on fScore.
    #[default]
    AStarStrict,
    /// Reproduces the reference exploration trace, which pops the open list
    /// FIFO-by-insertion and scans it linearly for membership. Kept for
    /// compatibility testing; still optimal on a unit-cost 4-grid.
    AStarFifoCompatible,
}

impl Variant {
    fn uses_heuristic(self) -> bool {
        !matches!(self, Variant::BreadthFirst)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Variant::BreadthFirst => "bfs",
            Variant::AStarStrict => "astar",
            Variant::AStarFifoCompatible => "astar-fifo",
        })
    }
}

/// One observable tag transition: a neighbor entering the frontier, a cell
/// closing as visited, or (during reconstruction) a cell joining the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepEvent {
    pub coord: Coord,
    pub tag: Tag,
}

/// How a run ended. An exhausted frontier is a legitimate outcome, not an
/// error, so callers cannot mistake it for a crash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchResult {
    Found { predecessors: PredecessorMap },
    NotFound,
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found { .. })
    }

    pub fn predecessors(&self) -> Option<&PredecessorMap> {
        match self {
            SearchResult::Found { predecessors } => Some(predecessors),
            SearchResult::NotFound => None,
        }
    }
}

enum Phase {
    /// Dequeue the next frontier node.
    Pop,
    /// Relax the remaining neighbors of the dequeued node, then close it.
    Expand {
        current: Coord,
        neighbors: SmallVec<[Coord; 4]>,
        next: usize,
    },
    Done,
}

/// Starts a search. Validates the endpoint preconditions, then returns the
/// run as a lazy iterator; drive it with [SearchRun::next] or drain it with
/// [SearchRun::finish].
pub fn run(
    grid: &mut Grid,
    start: Coord,
    goal: Coord,
    variant: Variant,
) -> Result<SearchRun<'_>, InvalidEndpoints> {
    for (endpoint, coord) in [(Endpoint::Start, start), (Endpoint::Goal, goal)] {
        if !grid.in_bounds(coord) {
            return Err(InvalidEndpoints::OutsideGrid {
                endpoint,
                coord,
                rows: grid.rows(),
                cols: grid.cols(),
            });
        }
        if grid.raw_tag(coord).blocks_movement() {
            return Err(InvalidEndpoints::BlockedEndpoint { endpoint, coord });
        }
    }
    if start == goal {
        return Err(InvalidEndpoints::StartEqualsGoal(start));
    }

    let mut search = SearchRun {
        grid,
        start,
        goal,
        variant,
        frontier: Frontier::for_variant(variant),
        visited: FxHashSet::default(),
        predecessors: PredecessorMap::default(),
        g_score: FxHashMap::default(),
        f_score: FxHashMap::default(),
        phase: Phase::Pop,
        outcome: None,
    };
    if variant.uses_heuristic() {
        let h = start.manhattan_distance(&goal) as u32;
        search.g_score.insert(start, 0);
        search.f_score.insert(start, h);
        search.frontier.enqueue(start, 0, h);
    } else {
        search.visited.insert(start);
        search.frontier.enqueue(start, 0, 0);
    }
    Ok(search)
}

/// Convenience wrapper that drains all step events and returns the outcome.
pub fn run_to_completion(
    grid: &mut Grid,
    start: Coord,
    goal: Coord,
    variant: Variant,
) -> Result<SearchResult, InvalidEndpoints> {
    Ok(run(grid, start, goal, variant)?.finish())
}

/// One in-flight search. Holds the frontier, visited set, predecessor map and
/// (for A*) the gScore/fScore maps for the duration of the run; all of it is
/// dropped with the run. The grid is borrowed mutably for the whole run, so
/// no concurrent search can share it and every step boundary leaves it in a
/// consistent, inspectable state. Dropping the run mid-iteration is
/// cancellation: the grid keeps the partial-exploration snapshot.
pub struct SearchRun<'g> {
    grid: &'g mut Grid,
    start: Coord,
    goal: Coord,
    variant: Variant,
    frontier: Frontier,
    visited: FxHashSet<Coord>,
    predecessors: PredecessorMap,
    g_score: FxHashMap<Coord, u32>,
    f_score: FxHashMap<Coord, u32>,
    phase: Phase,
    outcome: Option<SearchResult>,
}

impl SearchRun<'_> {
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// The outcome, once the event sequence is exhausted.
    pub fn outcome(&self) -> Option<&SearchResult> {
        self.outcome.as_ref()
    }

    /// The best known distance from the start for a discovered cell. `None`
    /// for undiscovered cells (conceptually infinite) and for BFS runs.
    pub fn g_score(&self, coord: Coord) -> Option<u32> {
        self.g_score.get(&coord).copied()
    }

    /// gScore plus the Manhattan estimate to the goal, the priority strict A*
    /// pops by. `None` for undiscovered cells and for BFS runs.
    pub fn f_score(&self, coord: Coord) -> Option<u32> {
        self.f_score.get(&coord).copied()
    }

    /// Drains the remaining step events and returns the outcome.
    pub fn finish(mut self) -> SearchResult {
        while self.next().is_some() {}
        self.outcome
            .take()
            .expect("an exhausted run always has an outcome")
    }

    /// Tags a newly discovered cell as frontier, unless it is an endpoint or
    /// already open. Emits an event only for an actual transition.
    fn open_event(&mut self, coord: Coord) -> Option<StepEvent> {
        let old = self.grid.raw_tag(coord);
        if old.is_endpoint() || old == Tag::Frontier {
            return None;
        }
        self.grid.apply(coord, Tag::Frontier);
        Some(StepEvent {
            coord,
            tag: Tag::Frontier,
        })
    }

    /// Considers `neighbor` as reached via `current`. Returns the tag
    /// transition event if one occurred; bookkeeping may happen without one.
    fn relax(&mut self, current: Coord, neighbor: Coord) -> Option<StepEvent> {
        match self.variant {
            Variant::BreadthFirst => {
                if !self.visited.insert(neighbor) {
                    return None;
                }
                self.predecessors.insert(neighbor, current);
                self.frontier.enqueue(neighbor, 0, 0);
                self.open_event(neighbor)
            }
            Variant::AStarStrict | Variant::AStarFifoCompatible => {
                let tentative = self.g_score[&current] + 1;
                let known = self.g_score.get(&neighbor).copied().unwrap_or(u32::MAX);
                if tentative >= known {
                    return None;
                }
                self.predecessors.insert(neighbor, current);
                let f = tentative + neighbor.manhattan_distance(&self.goal) as u32;
                self.g_score.insert(neighbor, tentative);
                self.f_score.insert(neighbor, f);
                if self.variant == Variant::AStarFifoCompatible
                    && self.frontier.contains(neighbor)
                {
                    // Scores improved in place; the queued entry stands.
                    return None;
                }
                self.frontier.enqueue(neighbor, tentative, f);
                self.open_event(neighbor)
            }
        }
    }

    /// Closes an expanded cell. The start keeps its tag, and a cell re-opened
    /// and re-expanded is not re-announced.
    fn close_event(&mut self, current: Coord) -> Option<StepEvent> {
        let tag = self.grid.raw_tag(current);
        if current == self.start || tag.is_endpoint() || tag == Tag::Visited {
            return None;
        }
        self.grid.apply(current, Tag::Visited);
        Some(StepEvent {
            coord: current,
            tag: Tag::Visited,
        })
    }
}

impl Iterator for SearchRun<'_> {
    type Item = StepEvent;

    fn next(&mut self) -> Option<StepEvent> {
        loop {
            match mem::replace(&mut self.phase, Phase::Pop) {
                Phase::Done => {
                    self.phase = Phase::Done;
                    return None;
                }
                Phase::Pop => {
                    let Some((current, popped_g)) = self.frontier.dequeue() else {
                        info!("frontier exhausted without reaching {}", self.goal);
                        self.outcome = Some(SearchResult::NotFound);
                        self.phase = Phase::Done;
                        return None;
                    };
                    if current == self.goal {
                        self.outcome = Some(SearchResult::Found {
                            predecessors: mem::take(&mut self.predecessors),
                        });
                        self.phase = Phase::Done;
                        return None;
                    }
                    // The heap may hold entries superseded by a later, better
                    // relaxation; skip them.
                    if self.variant == Variant::AStarStrict && popped_g > self.g_score[&current] {
                        continue;
                    }
                    let neighbors = self.grid.neighbors_of(current);
                    self.phase = Phase::Expand {
                        current,
                        neighbors,
                        next: 0,
                    };
                }
                Phase::Expand {
                    current,
                    neighbors,
                    mut next,
                } => {
                    while next < neighbors.len() {
                        let neighbor = neighbors[next];
                        next += 1;
                        if let Some(event) = self.relax(current, neighbor) {
                            self.phase = Phase::Expand {
                                current,
                                neighbors,
                                next,
                            };
                            return Some(event);
                        }
                    }
                    // All neighbors relaxed; close the expanded cell.
                    self.phase = Phase::Pop;
                    if let Some(event) = self.close_event(current) {
                        return Some(event);
                    }
                }
            }
        }
    }
}
