#![doc = "Motion planning for a wheeled robot on a discrete grid course."]
#![doc = ""]
#![doc = "The planner visits a set of mandatory waypoint cells in the cheapest order and"]
#![doc = "finishes on a required cell and heading. It is a pure library: the course grid"]
#![doc = "comes from the caller and the result is an ordered list of command records."]

pub mod command;
pub mod error;
pub mod grid;
pub mod heading;
pub mod motion;
pub mod planner;
pub mod search;
pub mod state;

pub use command::{CommandFile, CommandFormat, CommandKind, CommandRecord, HeadingCorrection, emit, render};
pub use error::{CellRole, PlanError};
pub use grid::{Cell, Grid, LaneColor};
pub use heading::Heading;
pub use motion::{CostModel, Motion, MotionKind};
pub use planner::{Plan, Planner};
pub use search::{SearchResult, search, search_detailed};
pub use state::RobotState;
