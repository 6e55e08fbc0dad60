use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt::{self, Debug, Formatter};

use fnv::FnvHashSet;

use crate::state::State;

use super::heuristic::Evaluator;

/// Open list of the graph search.
///
/// Every implementation keeps a set of its states in sync with the ordered structure
/// so `contains` doesn't have to scan.
pub trait Frontier<'a> {
    fn add(&mut self, state: &'a State<'a>);

    /// `None` when empty.
    fn pop(&mut self) -> Option<&'a State<'a>>;

    fn is_empty(&self) -> bool;

    fn len(&self) -> usize;

    fn contains(&self, state: &State<'a>) -> bool;

    fn name(&self) -> String;
}

/// Breadth-first.
#[derive(Debug, Default)]
pub struct Fifo<'a> {
    queue: VecDeque<&'a State<'a>>,
    set: FnvHashSet<&'a State<'a>>,
}

impl<'a> Fifo<'a> {
    pub fn new() -> Self {
        Fifo::default()
    }
}

impl<'a> Frontier<'a> for Fifo<'a> {
    fn add(&mut self, state: &'a State<'a>) {
        self.queue.push_back(state);
        self.set.insert(state);
    }

    fn pop(&mut self) -> Option<&'a State<'a>> {
        let state = self.queue.pop_front()?;
        self.set.remove(state);
        Some(state)
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn contains(&self, state: &State<'a>) -> bool {
        self.set.contains(state)
    }

    fn name(&self) -> String {
        "breadth-first search".to_string()
    }
}

/// Depth-first.
#[derive(Debug, Default)]
pub struct Lifo<'a> {
    stack: Vec<&'a State<'a>>,
    set: FnvHashSet<&'a State<'a>>,
}

impl<'a> Lifo<'a> {
    pub fn new() -> Self {
        Lifo::default()
    }
}

impl<'a> Frontier<'a> for Lifo<'a> {
    fn add(&mut self, state: &'a State<'a>) {
        self.stack.push(state);
        self.set.insert(state);
    }

    fn pop(&mut self) -> Option<&'a State<'a>> {
        let state = self.stack.pop()?;
        self.set.remove(state);
        Some(state)
    }

    fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    fn len(&self) -> usize {
        self.stack.len()
    }

    fn contains(&self, state: &State<'a>) -> bool {
        self.set.contains(state)
    }

    fn name(&self) -> String {
        "depth-first search".to_string()
    }
}

struct Entry<'a> {
    f: u64,
    seq: u64,
    state: &'a State<'a>,
}

impl PartialEq for Entry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for Entry<'_> {}

impl PartialOrd for Entry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // intentionally reversed for BinaryHeap
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Lowest `f` first, ties in insertion order.
pub struct BestFirst<'a> {
    heap: BinaryHeap<Entry<'a>>,
    set: FnvHashSet<&'a State<'a>>,
    evaluator: Evaluator,
    next_seq: u64,
}

impl<'a> BestFirst<'a> {
    pub fn new(evaluator: Evaluator) -> Self {
        BestFirst {
            heap: BinaryHeap::new(),
            set: FnvHashSet::default(),
            evaluator,
            next_seq: 0,
        }
    }
}

impl<'a> Frontier<'a> for BestFirst<'a> {
    fn add(&mut self, state: &'a State<'a>) {
        let f = self.evaluator.f(state);
        self.heap.push(Entry {
            f,
            seq: self.next_seq,
            state,
        });
        self.next_seq += 1;
        self.set.insert(state);
    }

    fn pop(&mut self) -> Option<&'a State<'a>> {
        let entry = self.heap.pop()?;
        self.set.remove(entry.state);
        Some(entry.state)
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn contains(&self, state: &State<'a>) -> bool {
        self.set.contains(state)
    }

    fn name(&self) -> String {
        format!("best-first search using {}", self.evaluator)
    }
}

impl Debug for BestFirst<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} states", self.name(), self.len())
    }
}
