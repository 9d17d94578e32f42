use core::fmt;

use thiserror::Error;

use crate::grid::Coord;

/// Convenient result alias for the crate's top-level operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type. Individual operations return the narrow
/// error they can actually produce; this aggregates them for callers using
/// convenience entry points like [find_path](crate::find_path).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    #[error(transparent)]
    InvalidEndpoints(#[from] InvalidEndpoints),

    #[error(transparent)]
    NoPath(#[from] NoPath),
}

/// A coordinate outside the grid. A programmer error: surfaced immediately,
/// never retried.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("coordinate {coord} lies outside the {rows}x{cols} grid")]
pub struct OutOfBounds {
    pub coord: Coord,
    pub rows: usize,
    pub cols: usize,
}

/// Which endpoint of a search request a precondition failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Endpoint::Start => "start",
            Endpoint::Goal => "goal",
        })
    }
}

/// A search precondition violated before the run starts. The caller must fix
/// the grid state before retrying.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidEndpoints {
    #[error("start and goal are both {0}")]
    StartEqualsGoal(Coord),

    #[error("{endpoint} {coord} lies outside the {rows}x{cols} grid")]
    OutsideGrid {
        endpoint: Endpoint,
        coord: Coord,
        rows: usize,
        cols: usize,
    },

    #[error("{endpoint} {coord} is blocked")]
    BlockedEndpoint { endpoint: Endpoint, coord: Coord },
}

/// Predecessor-map corruption detected during reconstruction. When the search
/// reported success this indicates an engine bug; it is logged and surfaced,
/// never silently swallowed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NoPath {
    #[error("predecessor walk from {goal} did not reach a root within {limit} steps")]
    CycleDetected { goal: Coord, limit: usize },

    #[error("predecessor chain from {goal} roots at {root} instead of start {start}")]
    WrongRoot {
        goal: Coord,
        root: Coord,
        start: Coord,
    },
}
