//! Compass headings on the course grid.

#![warn(missing_docs)]

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the four grid-aligned directions the robot can face.
///
/// The discriminants give the fixed clockwise cyclic order
/// `North -> East -> South -> West -> North`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Heading {
    /// Towards row 0.
    North = 0,
    /// Towards increasing column.
    East = 1,
    /// Towards increasing row.
    South = 2,
    /// Towards column 0.
    West = 3,
}

impl Heading {
    /// All headings in cyclic order. Successor generation iterates this array,
    /// so it also fixes the expansion order of the leg search.
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Position of this heading in the cyclic order.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Heading at `index` in the cyclic order, wrapping modulo 4.
    pub const fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Heading::North,
            1 => Heading::East,
            2 => Heading::South,
            _ => Heading::West,
        }
    }

    /// Unit `(d_row, d_col)` displacement of one forward step.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Heading::North => (-1, 0),
            Heading::East => (0, 1),
            Heading::South => (1, 0),
            Heading::West => (0, -1),
        }
    }

    /// Applies one forward step to `(row, col)`.
    ///
    /// No bounds checking is done here; the result may lie outside the grid
    /// (including negative coordinates) and the caller decides whether it is usable.
    pub const fn forward_cell(self, row: isize, col: isize) -> (isize, isize) {
        let (d_row, d_col) = self.offset();
        (row + d_row, col + d_col)
    }

    /// Shortest signed rotation in degrees that turns `self` into `to`.
    ///
    /// Positive values are clockwise, negative values counter-clockwise. A half
    /// turn is reported as `+180`, so the result is always one of
    /// `0, 90, 180, -90`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridway_planner::Heading;
    ///
    /// assert_eq!(Heading::North.rotation_to(Heading::East), 90);
    /// assert_eq!(Heading::North.rotation_to(Heading::West), -90);
    /// assert_eq!(Heading::North.rotation_to(Heading::South), 180);
    /// ```
    pub const fn rotation_to(self, to: Heading) -> i32 {
        let d = (to.index() + 4 - self.index()) % 4;
        if d <= 2 {
            d as i32 * 90
        } else {
            -((4 - d) as i32) * 90
        }
    }

    /// Heading reached after turning by `angle` degrees (a multiple of 90,
    /// clockwise positive).
    pub const fn rotated(self, angle: i32) -> Heading {
        let quarter_turns = angle.div_euclid(90).rem_euclid(4) as u8;
        Heading::from_index(self.index() + quarter_turns)
    }

    /// Single-letter name used in command annotations.
    pub const fn short_name(self) -> &'static str {
        match self {
            Heading::North => "N",
            Heading::East => "E",
            Heading::South => "S",
            Heading::West => "W",
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_from_north() {
        assert_eq!(Heading::North.rotation_to(Heading::East), 90);
        assert_eq!(Heading::North.rotation_to(Heading::West), -90);
        assert_eq!(Heading::North.rotation_to(Heading::South), 180);
    }

    #[test]
    fn test_rotation_to_self_is_zero() {
        for h in Heading::ALL {
            assert_eq!(h.rotation_to(h), 0);
        }
    }

    #[test]
    fn test_rotation_is_shortest_and_consistent() {
        for from in Heading::ALL {
            for to in Heading::ALL {
                let angle = from.rotation_to(to);
                assert!(angle.abs() <= 180);
                assert_eq!(from.rotated(angle), to, "{from} -> {to} via {angle}");
            }
        }
        // Wrap-around cases
        assert_eq!(Heading::West.rotation_to(Heading::North), 90);
        assert_eq!(Heading::East.rotation_to(Heading::North), -90);
        assert_eq!(Heading::South.rotation_to(Heading::West), 90);
        assert_eq!(Heading::West.rotation_to(Heading::South), -90);
    }

    #[test]
    fn test_forward_cell() {
        assert_eq!(Heading::North.forward_cell(2, 0), (1, 0));
        assert_eq!(Heading::South.forward_cell(2, 0), (3, 0));
        assert_eq!(Heading::East.forward_cell(2, 0), (2, 1));
        // Leaving the grid is the caller's problem
        assert_eq!(Heading::West.forward_cell(2, 0), (2, -1));
    }

    #[test]
    fn test_index_round_trip() {
        for h in Heading::ALL {
            assert_eq!(Heading::from_index(h.index()), h);
        }
        assert_eq!(Heading::from_index(5), Heading::East);
    }
}
