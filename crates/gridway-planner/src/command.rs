//! Command records handed to the execution layer.
//!
//! Every motion becomes one [`CommandRecord`]; [`render`] turns a whole plan
//! into the line-oriented command file the robot reads, optionally adding the
//! auxiliary lines the execution layer expects around each motion.

#![warn(missing_docs)]

use core::fmt;

use crate::grid::LaneColor;
use crate::motion::{Motion, MotionKind};
use crate::planner::Plan;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Command tag of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Line-trace to the next intersection (`CC`).
    Advance,
    /// Quarter turn clockwise (`IR`).
    RotateRight,
    /// Quarter turn counter-clockwise (`IL`).
    RotateLeft,
    /// Half turn (`BR`).
    RotateBack,
}

impl CommandKind {
    /// Two-letter tag that starts the record's line.
    pub const fn tag(self) -> &'static str {
        match self {
            CommandKind::Advance => "CC",
            CommandKind::RotateRight => "IR",
            CommandKind::RotateLeft => "IL",
            CommandKind::RotateBack => "BR",
        }
    }
}

/// Sense of an in-place rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationSense {
    /// Positive angles.
    Clockwise,
    /// Negative angles, written `anticlockwise`.
    Counterclockwise,
}

impl fmt::Display for RotationSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationSense::Clockwise => f.write_str("clockwise"),
            RotationSense::Counterclockwise => f.write_str("anticlockwise"),
        }
    }
}

/// One serialised motion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    /// Record tag.
    pub kind: CommandKind,
    /// Lane colour to trace, advances only.
    pub color: Option<LaneColor>,
    /// Unsigned rotation in degrees, rotations only.
    pub angle: Option<u32>,
    /// Rotation sense, rotations only.
    pub sense: Option<RotationSense>,
    /// Destination state for humans reading the file, e.g. `(1 3 E)`.
    pub comment: String,
}

impl CommandRecord {
    /// Tag of this record's kind.
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }
}

impl From<&Motion> for CommandRecord {
    fn from(motion: &Motion) -> Self {
        serialize(motion)
    }
}

impl fmt::Display for CommandRecord {
    /// `CC,RED,(1 0 N),` for advances, `IR,90,clockwise,(0 0 E),` for rotations.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},", self.tag())?;
        if self.kind == CommandKind::Advance {
            match self.color {
                Some(color) => write!(f, "{color},")?,
                None => write!(f, "NONE,")?,
            }
        }
        if let Some(angle) = self.angle {
            write!(f, "{angle},")?;
        }
        if let Some(sense) = self.sense {
            write!(f, "{sense},")?;
        }
        write!(f, "{},", self.comment)
    }
}

/// Serialises a single motion.
pub fn serialize(motion: &Motion) -> CommandRecord {
    let comment = motion.annotation();
    match motion.kind() {
        MotionKind::Advance { color } => CommandRecord {
            kind: CommandKind::Advance,
            color,
            angle: None,
            sense: None,
            comment,
        },
        MotionKind::Rotate { angle } => {
            let kind = if angle.unsigned_abs() == 180 {
                CommandKind::RotateBack
            } else if angle > 0 {
                CommandKind::RotateRight
            } else {
                CommandKind::RotateLeft
            };
            let sense = if angle >= 0 {
                RotationSense::Clockwise
            } else {
                RotationSense::Counterclockwise
            };
            CommandRecord {
                kind,
                color: None,
                angle: Some(angle.unsigned_abs()),
                sense: Some(sense),
                comment,
            }
        }
    }
}

/// Maps a plan's motions to records, in execution order.
pub fn emit(plan: &Plan) -> Vec<CommandRecord> {
    plan.motions.iter().map(serialize).collect()
}

/// Heading correction the robot runs after every rotation (`XR` line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeadingCorrection {
    /// Gyro angle to settle on, in degrees.
    pub target_angle: i32,
    /// Motor PWM used while correcting.
    pub pwm: u32,
}

/// Optional auxiliary lines written around the motion records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CommandFormat {
    /// Precede each advance with an `IS` (straight through the intersection) line.
    pub in_cross_straight: bool,
    /// Emit a `BT` line whenever a waypoint is reached.
    pub mark_waypoints: bool,
    /// Follow each rotation with an `XR` line.
    pub heading_correction: Option<HeadingCorrection>,
}

/// The complete command file for a plan, rendered through `Display`.
///
/// Each motion record is one line. When `format` asks for them, an `IS` line
/// precedes every advance, an `XR` line follows every rotation, and a `BT`
/// line marks each waypoint where a block is thrown. The last waypoint's block
/// is carried to the goal, so it gets no `BT` line.
#[derive(Debug, Clone, Copy)]
pub struct CommandFile<'a> {
    plan: &'a Plan,
    format: &'a CommandFormat,
}

impl<'a> CommandFile<'a> {
    /// Pairs a plan with the output options.
    pub fn new(plan: &'a Plan, format: &'a CommandFormat) -> Self {
        CommandFile { plan, format }
    }

    fn write_markers(&self, f: &mut fmt::Formatter<'_>, position: usize) -> fmt::Result {
        if !self.format.mark_waypoints {
            return Ok(());
        }
        let thrown = self.plan.order.len().saturating_sub(1);
        for (cell, _) in self
            .plan
            .order
            .iter()
            .zip(&self.plan.arrivals)
            .take(thrown)
            .filter(|(_, arrival)| **arrival == position)
        {
            writeln!(f, "BT,waypoint,{cell},")?;
        }
        Ok(())
    }
}

impl fmt::Display for CommandFile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let records = emit(self.plan);
        for (i, record) in records.iter().enumerate() {
            self.write_markers(f, i)?;
            if record.kind == CommandKind::Advance && self.format.in_cross_straight {
                writeln!(f, "IS,in-cross straight,")?;
            }
            writeln!(f, "{record}")?;
            if record.kind != CommandKind::Advance {
                if let Some(correction) = self.format.heading_correction {
                    writeln!(
                        f,
                        "XR,{},{},heading correction,",
                        correction.target_angle, correction.pwm
                    )?;
                }
            }
        }
        self.write_markers(f, records.len())
    }
}

/// Renders the full command file for `plan`. Every line ends with `\n`.
pub fn render(plan: &Plan, format: &CommandFormat) -> String {
    CommandFile::new(plan, format).to_string()
}
