//! Multi-waypoint planning: chains leg searches over every visiting order and
//! keeps the cheapest complete plan.

#![warn(missing_docs)]

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use itertools::Itertools;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::{CellRole, PlanError};
use crate::grid::{Cell, Grid};
use crate::heading::Heading;
use crate::motion::{CostModel, Motion};
use crate::search::search_detailed;
use crate::state::RobotState;

/// A complete, costed motion sequence: start, every waypoint, then the end
/// cell with the required heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Motions in execution order.
    pub motions: Vec<Motion>,
    /// Sum of all motion costs.
    pub cost: f64,
    /// Waypoints in the order they are visited.
    pub order: Vec<Cell>,
    /// For each entry of `order`, the number of motions executed when that
    /// waypoint is reached.
    pub arrivals: Vec<usize>,
    /// Final cell.
    pub end: Cell,
    /// Final heading.
    pub end_heading: Heading,
}

impl Plan {
    /// Number of motions.
    pub fn len(&self) -> usize {
        self.motions.len()
    }

    /// Whether the plan needs no motion at all.
    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Plan {{ motions: {}, cost: {:.1}, order: [{}] }}",
            self.motions.len(),
            self.cost,
            self.order.iter().join(", ")
        )?;
        for (i, motion) in self.motions.iter().enumerate() {
            writeln!(f, "{i:3}: {motion}")?;
        }
        Ok(())
    }
}

/// Outcome of chaining legs for one visiting order.
enum Chain {
    Complete(Plan),
    Unreachable(Cell),
}

/// The multi-waypoint planner.
///
/// Every permutation of the waypoints is evaluated, which is intended for the
/// handful of waypoints a course carries.
#[derive(Debug, Clone)]
pub struct Planner {
    costs: CostModel,
    deadline: Option<Duration>,
    parallel: bool,
}

impl Planner {
    /// Creates a sequential planner with no deadline.
    pub fn new(costs: CostModel) -> Self {
        Planner {
            costs,
            deadline: None,
            parallel: false,
        }
    }

    /// Gives up (returning no plan) once `deadline` has elapsed since `plan` was called.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Evaluates permutations on worker threads when `parallel` is true.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The cost model in use.
    pub fn costs(&self) -> &CostModel {
        &self.costs
    }

    /// Plans start -> all `waypoints` (any order) -> `end` facing `end_heading`.
    ///
    /// # Arguments
    /// * `start` - Initial robot state; any motions it already carries are kept.
    /// * `waypoints` - Cells that must each be visited.
    /// * `end` - Final cell.
    /// * `end_heading` - Required heading at `end`.
    /// * `grid` - Course grid.
    ///
    /// # Returns
    /// * `Ok(Some(plan))` - The cheapest plan; ties go to the first order in
    ///   permutation order.
    /// * `Ok(None)` - Some target is unreachable, or the deadline expired.
    ///
    /// # Errors
    /// Returns `PlanError` for malformed input: cells outside the grid or an
    /// invalid cost model.
    pub fn plan(
        &self,
        start: &RobotState,
        waypoints: &[Cell],
        end: Cell,
        end_heading: Heading,
        grid: &Grid,
    ) -> Result<Option<Plan>, PlanError> {
        self.costs.validate()?;
        grid.check(start.cell(), CellRole::Start)?;
        grid.check(end, CellRole::End)?;
        for waypoint in waypoints {
            grid.check(*waypoint, CellRole::Waypoint)?;
        }

        let started = Instant::now();
        let deadline = self.deadline.map(|d| started + d);
        debug!(
            start = %start,
            waypoints = waypoints.len(),
            %end,
            %end_heading,
            parallel = self.parallel,
            "Planning started"
        );

        let best = if self.parallel {
            self.plan_parallel(start, waypoints, end, end_heading, grid, deadline)
        } else {
            self.plan_sequential(start, waypoints, end, end_heading, grid, deadline)
        };

        if let Some(plan) = &best {
            info!(
                cost = plan.cost,
                motions = plan.motions.len(),
                order = %plan.order.iter().join(" -> "),
                elapsed = ?started.elapsed(),
                "Selected plan"
            );
        }
        Ok(best)
    }

    fn plan_sequential(
        &self,
        start: &RobotState,
        waypoints: &[Cell],
        end: Cell,
        end_heading: Heading,
        grid: &Grid,
        deadline: Option<Instant>,
    ) -> Option<Plan> {
        let mut best: Option<Plan> = None;

        for order in waypoints.iter().copied().permutations(waypoints.len()) {
            if expired(deadline) {
                warn!("Planning deadline expired");
                return None;
            }
            match self.chain_order(start, &order, end, end_heading, grid) {
                Chain::Complete(plan) => {
                    if best.as_ref().is_none_or(|b| plan.cost < b.cost) {
                        best = Some(plan);
                    }
                }
                Chain::Unreachable(target) => {
                    warn!(%target, "Target unreachable; no plan exists");
                    return None;
                }
            }
        }

        best
    }

    fn plan_parallel(
        &self,
        start: &RobotState,
        waypoints: &[Cell],
        end: Cell,
        end_heading: Heading,
        grid: &Grid,
        deadline: Option<Instant>,
    ) -> Option<Plan> {
        // Orders are handed out one at a time so memory stays flat however
        // many waypoints there are.
        let orders = Mutex::new(
            waypoints
                .iter()
                .copied()
                .permutations(waypoints.len())
                .enumerate(),
        );
        let total = (1..=waypoints.len())
            .try_fold(1usize, |acc, k| acc.checked_mul(k))
            .unwrap_or(usize::MAX);
        let workers = std::thread::available_parallelism()
            .map_or(1, |n| n.get())
            .min(total);

        // Best (permutation index, plan) so far; the index keeps ties identical
        // to the sequential result.
        let best: Mutex<Option<(usize, Plan)>> = Mutex::new(None);
        let abort = AtomicBool::new(false);
        let timed_out = AtomicBool::new(false);

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let orders = &orders;
                let best = &best;
                let abort = &abort;
                let timed_out = &timed_out;
                scope.spawn(move || {
                    loop {
                        if abort.load(Ordering::Relaxed) {
                            return;
                        }
                        if expired(deadline) {
                            timed_out.store(true, Ordering::Relaxed);
                            abort.store(true, Ordering::Relaxed);
                            return;
                        }
                        let Some((index, order)) = orders.lock().next() else {
                            return;
                        };
                        match self.chain_order(start, &order, end, end_heading, grid) {
                            Chain::Complete(plan) => {
                                let mut guard = best.lock();
                                let better = guard.as_ref().is_none_or(|(i, b)| {
                                    plan.cost < b.cost || (plan.cost == b.cost && index < *i)
                                });
                                if better {
                                    *guard = Some((index, plan));
                                }
                            }
                            Chain::Unreachable(target) => {
                                warn!(%target, "Target unreachable; no plan exists");
                                abort.store(true, Ordering::Relaxed);
                                return;
                            }
                        }
                    }
                });
            }
        });

        if abort.load(Ordering::Relaxed) {
            if timed_out.load(Ordering::Relaxed) {
                warn!("Planning deadline expired");
            }
            return None;
        }
        best.into_inner().map(|(_, plan)| plan)
    }

    /// Chains leg searches for one fixed visiting `order`, then turns to
    /// `end_heading` in place.
    ///
    /// Returns `None` if any leg is unreachable. Inputs are not validated.
    pub fn chain(
        &self,
        start: &RobotState,
        order: &[Cell],
        end: Cell,
        end_heading: Heading,
        grid: &Grid,
    ) -> Option<Plan> {
        match self.chain_order(start, order, end, end_heading, grid) {
            Chain::Complete(plan) => Some(plan),
            Chain::Unreachable(_) => None,
        }
    }

    fn chain_order(
        &self,
        start: &RobotState,
        order: &[Cell],
        end: Cell,
        end_heading: Heading,
        grid: &Grid,
    ) -> Chain {
        let mut state = start.clone();
        let mut arrivals = Vec::with_capacity(order.len());

        for &target in order.iter().chain(std::iter::once(&end)) {
            let result = search_detailed(&state, target, grid, &self.costs);
            let explored = result.nodes_explored;
            match result.into_state() {
                Some(next) => state = next,
                None => return Chain::Unreachable(target),
            }
            if arrivals.len() < order.len() {
                arrivals.push(state.motions().len());
            }
            debug!(%target, explored, cost = state.cost(), "Leg complete");
        }
        let state = state.turn_to(end_heading, &self.costs);

        Chain::Complete(Plan {
            cost: state.cost(),
            motions: state.motions().to_vec(),
            order: order.to_vec(),
            arrivals,
            end: state.cell(),
            end_heading: state.heading(),
        })
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}
