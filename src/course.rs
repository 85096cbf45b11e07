use anyhow::Context;
use gridway_planner::{Cell, Grid, Heading, LaneColor, RobotState};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{CourseSettings, PoseSetting};

/// Which side of the field the robot runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Course {
    Left,
    Right,
}

/// Lane colours of the left course's 4x4 block area, row 0 at the top.
const LEFT_COLORS: [[LaneColor; 4]; 4] = {
    use LaneColor::*;
    [
        [Red, Red, Yellow, Yellow],
        [Red, Red, Yellow, Yellow],
        [Blue, Blue, Green, Green],
        [Blue, Blue, Green, Green],
    ]
};

impl Course {
    /// Lane colour of `cell`. The right course mirrors the left one's columns,
    /// and larger grids repeat the 4x4 table.
    pub fn color_at(self, cell: Cell) -> LaneColor {
        let (r, c) = (cell.row % 4, cell.col % 4);
        match self {
            Course::Left => LEFT_COLORS[r][c],
            Course::Right => LEFT_COLORS[r][3 - c],
        }
    }

    pub fn default_start(self) -> (Cell, Heading) {
        match self {
            Course::Left => (Cell::new(2, 0), Heading::North),
            Course::Right => (Cell::new(2, 3), Heading::North),
        }
    }

    pub fn default_end(self) -> (Cell, Heading) {
        match self {
            Course::Left => (Cell::new(1, 3), Heading::East),
            Course::Right => (Cell::new(1, 0), Heading::West),
        }
    }

    /// Builds the coloured `size x size` grid with the given block cells
    /// marked as waypoints.
    pub fn build_grid(self, size: usize, blocks: &[[usize; 2]]) -> anyhow::Result<Grid> {
        let table: Vec<Vec<Option<LaneColor>>> = (0..size)
            .map(|row| {
                (0..size)
                    .map(|col| Some(self.color_at(Cell::new(row, col))))
                    .collect()
            })
            .collect();
        let mut grid = Grid::from_colors(&table)
            .with_context(|| format!("Failed to build a {size}x{size} course grid"))?;

        for &[row, col] in blocks {
            let cell = Cell::new(row, col);
            grid.set_waypoint(cell)
                .with_context(|| format!("Block at {cell} is not on the course"))?;
        }
        Ok(grid)
    }
}

fn pose(setting: Option<PoseSetting>, fallback: (Cell, Heading)) -> (Cell, Heading) {
    setting.map_or(fallback, |p| (Cell::new(p.row, p.col), p.heading))
}

/// Everything the planner needs for one run, resolved from the course settings.
#[derive(Debug, Clone)]
pub struct CourseLayout {
    pub grid: Grid,
    pub start: RobotState,
    pub end: Cell,
    pub end_heading: Heading,
}

impl CourseLayout {
    pub fn build(settings: &CourseSettings) -> anyhow::Result<Self> {
        let side = settings.side;
        let grid = side.build_grid(settings.size, &settings.blocks)?;
        let (start_cell, start_heading) = pose(settings.start, side.default_start());
        let (end, end_heading) = pose(settings.end, side.default_end());

        info!(
            "{:?} course: start {} {}, end {} {}, {} blocks",
            side,
            start_cell,
            start_heading,
            end,
            end_heading,
            settings.blocks.len()
        );
        debug!("Course grid:\n{}", grid);

        Ok(CourseLayout {
            grid,
            start: RobotState::new(start_cell, start_heading),
            end,
            end_heading,
        })
    }
}
