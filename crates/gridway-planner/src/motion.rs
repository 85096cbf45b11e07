//! Motion primitives and the cost model used to price them.

#![warn(missing_docs)]

use core::fmt;

use crate::error::PlanError;
use crate::grid::{Cell, LaneColor};
use crate::heading::Heading;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunable execution costs. Costs approximate execution time, so only their
/// relative size matters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CostModel {
    /// Cost of line-tracing forward by one cell.
    pub advance: f64,
    /// Fixed part of any in-place rotation.
    pub rotate_base: f64,
    /// Additional rotation cost per degree turned.
    pub rotate_per_degree: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            advance: 30.0,
            rotate_base: 5.0,
            rotate_per_degree: 1.0,
        }
    }
}

impl CostModel {
    /// Construct a validated cost model.
    ///
    /// # Errors
    ///
    /// Returns `Err(PlanError::InvalidCost)` if any constant is negative or not finite.
    pub fn new(advance: f64, rotate_base: f64, rotate_per_degree: f64) -> Result<Self, PlanError> {
        let model = CostModel {
            advance,
            rotate_base,
            rotate_per_degree,
        };
        model.validate()?;
        Ok(model)
    }

    /// Checks the monotonicity precondition: every motion must cost at least zero.
    ///
    /// # Errors
    ///
    /// Returns `Err(PlanError::InvalidCost)` if any constant is negative or not finite.
    pub fn validate(&self) -> Result<(), PlanError> {
        let constants = [self.advance, self.rotate_base, self.rotate_per_degree];
        if constants.iter().any(|c| !c.is_finite()) {
            return Err(PlanError::InvalidCost("costs must be finite"));
        }
        if constants.iter().any(|c| *c < 0.0) {
            return Err(PlanError::InvalidCost("costs must not be negative"));
        }
        Ok(())
    }

    /// Cost of one advance.
    pub fn advance_cost(&self) -> f64 {
        self.advance
    }

    /// Cost of turning in place by `angle` degrees.
    pub fn rotate_cost(&self, angle: i32) -> f64 {
        self.rotate_base + self.rotate_per_degree * f64::from(angle.unsigned_abs())
    }

    /// Builds an advance into `to`, arriving with `heading`.
    pub fn make_advance(&self, color: Option<LaneColor>, to: Cell, heading: Heading) -> Motion {
        Motion {
            kind: MotionKind::Advance { color },
            cell: to,
            heading,
            cost: self.advance_cost(),
        }
    }

    /// Builds an in-place rotation at `at` by `angle` degrees, ending with `heading`.
    pub fn make_rotate(&self, angle: i32, at: Cell, heading: Heading) -> Motion {
        Motion {
            kind: MotionKind::Rotate { angle },
            cell: at,
            heading,
            cost: self.rotate_cost(angle),
        }
    }
}

/// What a motion does.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MotionKind {
    /// Move one cell forward along the current heading, tracing a lane of `color`.
    Advance {
        /// Lane colour of the destination cell.
        color: Option<LaneColor>,
    },
    /// Turn in place; positive is clockwise. Always ±90 or 180.
    Rotate {
        /// Signed rotation in degrees.
        angle: i32,
    },
}

/// One atomic, priced robot motion together with the state it leads to.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Motion {
    kind: MotionKind,
    cell: Cell,
    heading: Heading,
    cost: f64,
}

impl Motion {
    /// The motion kind and its parameters.
    pub fn kind(&self) -> MotionKind {
        self.kind
    }

    /// Cell the robot occupies after the motion.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Heading after the motion.
    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Execution cost.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Whether this is an advance.
    pub fn is_advance(&self) -> bool {
        matches!(self.kind, MotionKind::Advance { .. })
    }

    /// Destination annotation, e.g. `(1 3 E)`.
    pub fn annotation(&self) -> String {
        format!("({} {} {})", self.cell.row, self.cell.col, self.heading)
    }
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MotionKind::Advance { color: Some(color) } => {
                write!(f, "advance[{color}] -> {}", self.annotation())
            }
            MotionKind::Advance { color: None } => write!(f, "advance -> {}", self.annotation()),
            MotionKind::Rotate { angle } => write!(f, "rotate[{angle:+}] -> {}", self.annotation()),
        }
    }
}
