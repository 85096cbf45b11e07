//! The course grid: cells, lane colours and waypoint flags.

#![warn(missing_docs)]

use core::fmt;

use crate::error::{CellRole, PlanError};
use crate::heading::Heading;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A grid cell addressed by `(row, col)`, row 0 being the northern edge.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    /// Row index (north to south).
    pub row: usize,
    /// Column index (west to east).
    pub col: usize,
}

impl Cell {
    /// Creates a new `Cell`.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.row, self.col)
    }
}

/// Colour of the lane the robot line-traces along when entering a cell.
///
/// The planner never interprets the colour; it is copied onto advance motions
/// so the execution layer knows which line to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum LaneColor {
    /// Red lane.
    Red,
    /// Green lane.
    Green,
    /// Blue lane.
    Blue,
    /// Yellow lane.
    Yellow,
}

impl LaneColor {
    /// Upper-case name as written into command records.
    pub const fn as_str(self) -> &'static str {
        match self {
            LaneColor::Red => "RED",
            LaneColor::Green => "GREEN",
            LaneColor::Blue => "BLUE",
            LaneColor::Yellow => "YELLOW",
        }
    }
}

impl fmt::Display for LaneColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The course grid handed to the planner: dimensions, per-cell lane colour and
/// waypoint flags. Every cell is traversable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// Row-major lane colours.
    colors: Vec<Option<LaneColor>>,
    /// Row-major waypoint flags.
    waypoints: Vec<bool>,
}

impl Grid {
    /// Creates an uncoloured grid with no waypoints.
    ///
    /// # Errors
    /// Returns `PlanError::InvalidDimensions` if `rows` or `cols` is zero or
    /// the cell count overflows.
    pub fn new(rows: usize, cols: usize) -> Result<Self, PlanError> {
        if rows == 0 || cols == 0 {
            return Err(PlanError::InvalidDimensions("rows and columns must be non-zero"));
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(PlanError::InvalidDimensions("grid dimensions too large"))?;

        Ok(Grid {
            rows,
            cols,
            colors: vec![None; len],
            waypoints: vec![false; len],
        })
    }

    /// Creates a grid whose shape and lane colours come from a row-major table.
    ///
    /// # Errors
    /// Returns `PlanError::InvalidDimensions` if the table is empty or ragged.
    pub fn from_colors(table: &[Vec<Option<LaneColor>>]) -> Result<Self, PlanError> {
        let rows = table.len();
        let cols = table.first().map_or(0, Vec::len);
        if table.iter().any(|row| row.len() != cols) {
            return Err(PlanError::InvalidDimensions("colour table rows differ in length"));
        }

        let mut grid = Grid::new(rows, cols)?;
        grid.colors = table.iter().flatten().copied().collect();
        Ok(grid)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether `cell` lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    fn index(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }

    /// Validates that `cell` is inside the grid, naming `role` in the error.
    ///
    /// # Errors
    /// Returns `PlanError::OutOfBounds` if it is not.
    pub fn check(&self, cell: Cell, role: CellRole) -> Result<(), PlanError> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(PlanError::OutOfBounds {
                role,
                cell,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Lane colour of `cell`, `None` if uncoloured or outside the grid.
    pub fn color_at(&self, cell: Cell) -> Option<LaneColor> {
        if self.contains(cell) {
            self.colors[self.index(cell)]
        } else {
            None
        }
    }

    /// Sets the lane colour of `cell`.
    ///
    /// # Errors
    /// Returns `PlanError::OutOfBounds` if `cell` is outside the grid.
    pub fn set_color(&mut self, cell: Cell, color: Option<LaneColor>) -> Result<(), PlanError> {
        self.check(cell, CellRole::Color)?;
        let i = self.index(cell);
        self.colors[i] = color;
        Ok(())
    }

    /// Flags `cell` as a mandatory waypoint.
    ///
    /// # Errors
    /// Returns `PlanError::OutOfBounds` if `cell` is outside the grid.
    pub fn set_waypoint(&mut self, cell: Cell) -> Result<(), PlanError> {
        self.check(cell, CellRole::Waypoint)?;
        let i = self.index(cell);
        self.waypoints[i] = true;
        Ok(())
    }

    /// Whether `cell` is flagged as a waypoint.
    pub fn is_waypoint(&self, cell: Cell) -> bool {
        self.contains(cell) && self.waypoints[self.index(cell)]
    }

    /// All waypoint cells in row-major order.
    pub fn waypoints(&self) -> Vec<Cell> {
        self.waypoints
            .iter()
            .enumerate()
            .filter(|(_, flagged)| **flagged)
            .map(|(i, _)| Cell::new(i / self.cols, i % self.cols))
            .collect()
    }

    /// The cell one step ahead of `cell` when facing `heading`, or `None` if
    /// that step leaves the grid.
    pub fn neighbor(&self, cell: Cell, heading: Heading) -> Option<Cell> {
        let (row, col) = heading.forward_cell(cell.row as isize, cell.col as isize);
        if row < 0 || col < 0 {
            return None;
        }
        let next = Cell::new(row as usize, col as usize);
        self.contains(next).then_some(next)
    }
}

impl fmt::Display for Grid {
    /// One line per row; waypoints are upper-case colour initials, other cells
    /// lower-case, uncoloured cells `.` (or `*` for an uncoloured waypoint).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid ({}x{})", self.rows, self.cols)?;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = Cell::new(row, col);
                let symbol = match (self.color_at(cell), self.is_waypoint(cell)) {
                    (Some(color), true) => color.as_str()[..1].to_string(),
                    (Some(color), false) => color.as_str()[..1].to_lowercase(),
                    (None, true) => "*".to_string(),
                    (None, false) => ".".to_string(),
                };
                write!(f, "{symbol} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(4, 3).unwrap();
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 3);
        assert!(grid.waypoints().is_empty());
        assert_eq!(grid.color_at(Cell::new(0, 0)), None);
    }

    #[test]
    fn test_invalid_creation() {
        assert!(matches!(Grid::new(0, 4), Err(PlanError::InvalidDimensions(_))));
        assert!(matches!(Grid::new(4, 0), Err(PlanError::InvalidDimensions(_))));
        assert!(matches!(Grid::from_colors(&[]), Err(PlanError::InvalidDimensions(_))));

        let ragged = vec![vec![None, None], vec![None]];
        assert!(matches!(
            Grid::from_colors(&ragged),
            Err(PlanError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_colors_from_table() {
        use LaneColor::*;
        let table = vec![vec![Some(Red), Some(Yellow)], vec![Some(Blue), None]];
        let grid = Grid::from_colors(&table).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.color_at(Cell::new(0, 1)), Some(Yellow));
        assert_eq!(grid.color_at(Cell::new(1, 0)), Some(Blue));
        assert_eq!(grid.color_at(Cell::new(1, 1)), None);
        // Out of bounds reads as uncoloured
        assert_eq!(grid.color_at(Cell::new(2, 0)), None);
    }

    #[test]
    fn test_waypoints_row_major() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set_waypoint(Cell::new(3, 3)).unwrap();
        grid.set_waypoint(Cell::new(0, 3)).unwrap();
        grid.set_waypoint(Cell::new(0, 0)).unwrap();
        assert_eq!(
            grid.waypoints(),
            vec![Cell::new(0, 0), Cell::new(0, 3), Cell::new(3, 3)]
        );
        assert!(grid.is_waypoint(Cell::new(0, 3)));
        assert!(!grid.is_waypoint(Cell::new(1, 3)));

        assert!(matches!(
            grid.set_waypoint(Cell::new(4, 0)),
            Err(PlanError::OutOfBounds { role: CellRole::Waypoint, .. })
        ));
    }

    #[test]
    fn test_neighbor_respects_bounds() {
        let grid = Grid::new(3, 3).unwrap();
        let corner = Cell::new(0, 0);
        assert_eq!(grid.neighbor(corner, Heading::North), None);
        assert_eq!(grid.neighbor(corner, Heading::West), None);
        assert_eq!(grid.neighbor(corner, Heading::East), Some(Cell::new(0, 1)));
        assert_eq!(grid.neighbor(corner, Heading::South), Some(Cell::new(1, 0)));
        assert_eq!(grid.neighbor(Cell::new(2, 2), Heading::South), None);
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::from_colors(&[vec![Some(LaneColor::Red), None]]).unwrap();
        grid.set_waypoint(Cell::new(0, 0)).unwrap();
        let rendered = format!("{grid}");
        assert!(rendered.contains("Grid (1x2)"));
        assert!(rendered.contains("R . "));
    }
}
