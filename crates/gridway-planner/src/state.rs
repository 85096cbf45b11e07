//! Robot state snapshots and their one-motion successors.

#![warn(missing_docs)]

use core::fmt;

use crate::grid::{Cell, Grid};
use crate::heading::Heading;
use crate::motion::{CostModel, Motion};

/// An immutable snapshot of the robot during planning: where it is, which way
/// it faces, and the motions (with their summed cost) that brought it here.
///
/// States are never mutated; every transition produces a new state.
#[derive(Debug, Clone)]
pub struct RobotState {
    cell: Cell,
    heading: Heading,
    motions: Vec<Motion>,
    cost: f64,
}

impl RobotState {
    /// Initial state: no motions, zero cost.
    pub fn new(cell: Cell, heading: Heading) -> Self {
        RobotState {
            cell,
            heading,
            motions: Vec::new(),
            cost: 0.0,
        }
    }

    /// Current cell.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Current heading.
    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Motions executed so far, oldest first.
    pub fn motions(&self) -> &[Motion] {
        &self.motions
    }

    /// Summed cost of `motions`.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Dedup key used by the leg search.
    pub fn key(&self) -> (Cell, Heading) {
        (self.cell, self.heading)
    }

    /// The child state reached by appending `motion`.
    pub fn transition(&self, motion: Motion) -> RobotState {
        let mut motions = Vec::with_capacity(self.motions.len() + 1);
        motions.extend_from_slice(&self.motions);
        motions.push(motion);
        RobotState {
            cell: motion.cell(),
            heading: motion.heading(),
            motions,
            cost: self.cost + motion.cost(),
        }
    }

    /// Every state one motion away: an advance along the current heading if
    /// the next cell is on the grid, plus a rotation to each other heading.
    /// Successors are produced in `Heading::ALL` order.
    pub fn successors(&self, grid: &Grid, costs: &CostModel) -> Vec<RobotState> {
        let mut next = Vec::with_capacity(Heading::ALL.len());
        for heading in Heading::ALL {
            if heading == self.heading {
                if let Some(ahead) = grid.neighbor(self.cell, heading) {
                    let motion = costs.make_advance(grid.color_at(ahead), ahead, heading);
                    next.push(self.transition(motion));
                }
            } else {
                let angle = self.heading.rotation_to(heading);
                next.push(self.transition(costs.make_rotate(angle, self.cell, heading)));
            }
        }
        next
    }

    /// Turns in place to face `heading`. Returns an identical state when the
    /// robot already faces that way.
    pub fn turn_to(&self, heading: Heading, costs: &CostModel) -> RobotState {
        if heading == self.heading {
            return self.clone();
        }
        let angle = self.heading.rotation_to(heading);
        self.transition(costs.make_rotate(angle, self.cell, heading))
    }
}

/// States compare equal when position, heading and accumulated cost match;
/// the motion history is ignored.
impl PartialEq for RobotState {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell && self.heading == other.heading && self.cost == other.cost
    }
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} {} {}) after {} motions, cost {:.1}",
            self.cell.row,
            self.cell.col,
            self.heading,
            self.motions.len(),
            self.cost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::LaneColor;
    use crate::motion::MotionKind;

    #[test]
    fn test_initial_state() {
        let state = RobotState::new(Cell::new(2, 0), Heading::North);
        assert!(state.motions().is_empty());
        assert_eq!(state.cost(), 0.0);
        assert_eq!(state.key(), (Cell::new(2, 0), Heading::North));
    }

    #[test]
    fn test_transition_does_not_mutate_parent() {
        let costs = CostModel::default();
        let parent = RobotState::new(Cell::new(2, 0), Heading::North);
        let child = parent.transition(costs.make_advance(None, Cell::new(1, 0), Heading::North));

        assert_eq!(parent.motions().len(), 0);
        assert_eq!(child.motions().len(), 1);
        assert_eq!(child.cell(), Cell::new(1, 0));
        assert_eq!(child.cost(), 30.0);
    }

    #[test]
    fn test_successors_at_corner() {
        let costs = CostModel::default();
        let grid = Grid::new(4, 4).unwrap();
        // Facing north from the top-left corner: no advance, three rotations
        let state = RobotState::new(Cell::new(0, 0), Heading::North);
        let next = state.successors(&grid, &costs);
        assert_eq!(next.len(), 3);
        assert!(next.iter().all(|s| s.cell() == Cell::new(0, 0)));
        let headings: Vec<Heading> = next.iter().map(RobotState::heading).collect();
        assert_eq!(headings, vec![Heading::East, Heading::South, Heading::West]);
        assert_eq!(next[1].cost(), 185.0);
    }

    #[test]
    fn test_advance_reads_destination_color() {
        let costs = CostModel::default();
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set_color(Cell::new(1, 0), Some(LaneColor::Red)).unwrap();
        grid.set_color(Cell::new(2, 0), Some(LaneColor::Blue)).unwrap();

        let state = RobotState::new(Cell::new(2, 0), Heading::North);
        let advance = state
            .successors(&grid, &costs)
            .into_iter()
            .find(|s| s.heading() == Heading::North)
            .unwrap();
        assert_eq!(advance.cell(), Cell::new(1, 0));
        assert_eq!(
            advance.motions()[0].kind(),
            MotionKind::Advance { color: Some(LaneColor::Red) }
        );
    }

    #[test]
    fn test_turn_to() {
        let costs = CostModel::default();
        let state = RobotState::new(Cell::new(1, 3), Heading::North);
        assert_eq!(state.turn_to(Heading::North, &costs), state);

        let turned = state.turn_to(Heading::East, &costs);
        assert_eq!(turned.heading(), Heading::East);
        assert_eq!(turned.cell(), Cell::new(1, 3));
        assert_eq!(turned.motions()[0].kind(), MotionKind::Rotate { angle: 90 });
    }

    #[test]
    fn test_equality_includes_cost() {
        let costs = CostModel::default();
        let a = RobotState::new(Cell::new(0, 0), Heading::North);
        // Full loop of four quarter turns: same place and heading, higher cost
        let b = (0..4).fold(a.clone(), |s, _| {
            let next = s.heading().rotated(90);
            s.turn_to(next, &costs)
        });
        assert_eq!(a.key(), b.key());
        assert_ne!(a, b);
    }
}
