/*

Leg search: uniform-cost search over (cell, heading) states.

    g(n) = accumulated motion cost from the leg's initial state to n

Initialize:
    - frontier holding the initial state, g = 0
    - best-known cost per (cell, heading)
    - closed set of expanded (cell, heading) keys

Loop:
    - pop the frontier entry with the lowest g
    - skip it if its key is already closed
    - if its cell is the target, return it
    - close its key
    - for each successor (one advance, three rotations):
        - skip if the successor's key is closed
        - skip if a cost <= g(successor) is already known for its key
        - record g(successor) and push it

*/

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::grid::{Cell, Grid};
use crate::heading::Heading;
use crate::motion::CostModel;
use crate::state::RobotState;

/// Result of a leg search with metadata.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Terminal state at the target cell, if one was reached.
    pub state: Option<RobotState>,
    /// Number of states expanded.
    pub nodes_explored: usize,
}

impl SearchResult {
    fn success(state: RobotState, nodes_explored: usize) -> Self {
        Self {
            state: Some(state),
            nodes_explored,
        }
    }

    fn failure(nodes_explored: usize) -> Self {
        Self {
            state: None,
            nodes_explored,
        }
    }

    /// Returns true if the target was reached.
    pub fn is_success(&self) -> bool {
        self.state.is_some()
    }

    /// Returns the terminal state if the target was reached.
    pub fn into_state(self) -> Option<RobotState> {
        self.state
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Some(state) => write!(
                f,
                "SearchResult {{ success: true, motions: {}, cost: {}, nodes_explored: {} }}",
                state.motions().len(),
                state.cost(),
                self.nodes_explored
            ),
            None => write!(
                f,
                "SearchResult {{ success: false, nodes_explored: {} }}",
                self.nodes_explored
            ),
        }
    }
}

/// Frontier entry. `seq` is the insertion order and the state's arena index.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct Entry {
    cost: OrderedFloat<f64>,
    motions: usize,
    cell: Cell,
    heading: Heading,
    seq: usize,
}

// BinaryHeap is a max-heap, so every comparison is flipped. Ties on cost go to
// fewer motions, then the smaller (row, col, heading), then insertion order,
// which makes the search fully deterministic.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.motions.cmp(&self.motions))
            .then_with(|| other.cell.cmp(&self.cell))
            .then_with(|| other.heading.cmp(&self.heading))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Frontier {
    heap: BinaryHeap<Entry>,
    arena: Vec<Option<RobotState>>,
}

impl Frontier {
    fn new() -> Self {
        Frontier {
            heap: BinaryHeap::new(),
            arena: Vec::new(),
        }
    }

    fn push(&mut self, state: RobotState) {
        let seq = self.arena.len();
        self.heap.push(Entry {
            cost: OrderedFloat(state.cost()),
            motions: state.motions().len(),
            cell: state.cell(),
            heading: state.heading(),
            seq,
        });
        self.arena.push(Some(state));
    }

    fn pop(&mut self) -> Option<RobotState> {
        while let Some(entry) = self.heap.pop() {
            if let Some(state) = self.arena[entry.seq].take() {
                return Some(state);
            }
        }
        None
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Finds the cheapest way to reach `target` from `initial`.
///
/// # Arguments
/// * `initial` - State the leg starts from; its motion history is carried over.
/// * `target` - Cell to reach, with any heading.
/// * `grid` - Course grid.
/// * `costs` - Motion cost model.
///
/// # Returns
/// * `Option<RobotState>` - The terminal state whose motion list extends
///   `initial`'s, or `None` if `target` is unreachable.
pub fn search(
    initial: &RobotState,
    target: Cell,
    grid: &Grid,
    costs: &CostModel,
) -> Option<RobotState> {
    search_detailed(initial, target, grid, costs).into_state()
}

/// Same as [`search`], but also reports how many states were expanded.
pub fn search_detailed(
    initial: &RobotState,
    target: Cell,
    grid: &Grid,
    costs: &CostModel,
) -> SearchResult {
    let mut nodes_explored = 0;

    if !grid.contains(initial.cell()) || !grid.contains(target) {
        return SearchResult::failure(nodes_explored);
    }

    let mut frontier = Frontier::new();
    let mut best: HashMap<(Cell, Heading), OrderedFloat<f64>> = HashMap::new();
    let mut closed: HashSet<(Cell, Heading)> = HashSet::new();

    best.insert(initial.key(), OrderedFloat(initial.cost()));
    frontier.push(initial.clone());

    while let Some(current) = frontier.pop() {
        if !closed.insert(current.key()) {
            continue;
        }
        nodes_explored += 1;

        if current.cell() == target {
            debug!(
                %target,
                cost = current.cost(),
                motions = current.motions().len() - initial.motions().len(),
                nodes_explored,
                "Leg search reached target"
            );
            return SearchResult::success(current, nodes_explored);
        }

        for next in current.successors(grid, costs) {
            let key = next.key();
            if closed.contains(&key) {
                continue;
            }
            let cost = OrderedFloat(next.cost());
            if best.get(&key).is_some_and(|known| *known <= cost) {
                continue;
            }
            best.insert(key, cost);
            frontier.push(next);
        }
        trace!(state = %current, frontier = frontier.len(), "Expanded state");
    }

    debug!(%target, nodes_explored, "Leg search exhausted frontier");
    SearchResult::failure(nodes_explored)
}
