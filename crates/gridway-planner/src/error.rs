//! This module defines the error types used by the `gridway-planner` crate.

#![warn(missing_docs)]

use core::fmt;

use crate::grid::Cell;

/// Which planner input a rejected cell came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    /// The robot's starting cell.
    Start,
    /// The required final cell.
    End,
    /// A mandatory waypoint.
    Waypoint,
    /// A lane-colour table entry.
    Color,
}

impl fmt::Display for CellRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellRole::Start => write!(f, "start"),
            CellRole::End => write!(f, "end"),
            CellRole::Waypoint => write!(f, "waypoint"),
            CellRole::Color => write!(f, "colour"),
        }
    }
}

/// Error type for malformed planner input.
///
/// An unreachable target is not an error: searches report it by returning
/// `None`. These variants are raised before any search begins.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// A grid with zero rows or columns, or an inconsistent colour table.
    #[error("Invalid grid dimensions: {0}")]
    InvalidDimensions(&'static str),
    /// A cell outside the grid.
    #[error("Invalid {role} cell {cell}: outside the {rows}x{cols} grid")]
    OutOfBounds {
        /// Which input the cell came from.
        role: CellRole,
        /// The offending cell.
        cell: Cell,
        /// Grid row count.
        rows: usize,
        /// Grid column count.
        cols: usize,
    },
    /// A negative or non-finite cost constant.
    #[error("Invalid cost model: {0}")]
    InvalidCost(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanError::OutOfBounds {
            role: CellRole::Waypoint,
            cell: Cell::new(4, 1),
            rows: 4,
            cols: 4,
        };
        assert_eq!(
            err.to_string(),
            "Invalid waypoint cell (4 1): outside the 4x4 grid"
        );
        assert_eq!(
            PlanError::InvalidCost("must be finite").to_string(),
            "Invalid cost model: must be finite"
        );
    }
}
