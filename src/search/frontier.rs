use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use crate::grid::Coord;
use crate::search::Variant;

/// Entry in the strict A* open heap.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OpenEntry {
    pub f: u32,
    pub g: u32,
    pub coord: Coord,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f.eq(&other.f) && self.g.eq(&other.g)
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // First orders per estimated total cost, then creates a subordering
        // on gScore so that among equal estimates the deeper node pops first.
        match other.f.cmp(&self.f) {
            Ordering::Equal => self.g.cmp(&other.g),
            s => s,
        }
    }
}

/// The open set. BFS and the FIFO-compatible A* keep insertion order; strict
/// A* pops the lowest fScore first.
#[derive(Clone, Debug)]
pub(crate) enum Frontier {
    Queue(VecDeque<Coord>),
    Heap(BinaryHeap<OpenEntry>),
}

impl Frontier {
    pub fn for_variant(variant: Variant) -> Frontier {
        match variant {
            Variant::BreadthFirst | Variant::AStarFifoCompatible => {
                Frontier::Queue(VecDeque::new())
            }
            Variant::AStarStrict => Frontier::Heap(BinaryHeap::new()),
        }
    }

    /// `g` and `f` are ignored by the queue form.
    pub fn enqueue(&mut self, coord: Coord, g: u32, f: u32) {
        match self {
            Frontier::Queue(queue) => queue.push_back(coord),
            Frontier::Heap(heap) => heap.push(OpenEntry { f, g, coord }),
        }
    }

    /// Removes the next node together with the gScore it was enqueued under
    /// (meaningful only for the heap form, which may hold superseded
    /// duplicates).
    pub fn dequeue(&mut self) -> Option<(Coord, u32)> {
        match self {
            Frontier::Queue(queue) => queue.pop_front().map(|coord| (coord, 0)),
            Frontier::Heap(heap) => heap.pop().map(|entry| (entry.coord, entry.g)),
        }
    }

    /// Linear membership scan, matching the reference open-list behaviour of
    /// the FIFO-compatible variant.
    pub fn contains(&self, coord: Coord) -> bool {
        match self {
            Frontier::Queue(queue) => queue.contains(&coord),
            Frontier::Heap(heap) => heap.iter().any(|entry| entry.coord == coord),
        }
    }
}
