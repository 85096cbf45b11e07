mod config;
mod course;
mod output;

use std::time::Duration;

use anyhow::Context;
use gridway_planner::{Planner, render};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::course::CourseLayout;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Gridway planner started.");

    let override_path = std::env::args().nth(1);
    let settings = config::load_settings(override_path.as_deref())
        .context("Failed to load configuration")?;

    match run(&settings).await {
        Ok(()) => {
            info!("Planning run finished successfully.");
            Ok(())
        }
        Err(e) => {
            error!("Planning run failed: {:?}", e);
            Err(e)
        }
    }
}

/// Plans the configured course and replaces the command file. On any failure
/// the previous command file is left as it was.
async fn run(settings: &Settings) -> anyhow::Result<()> {
    let Some(text) = plan_commands(settings).await? else {
        warn!(
            "No plan found, leaving {} untouched",
            settings.output.path.display()
        );
        anyhow::bail!("No plan found for the configured course");
    };
    output::write_commands(&settings.output.path, &text).await
}

/// Returns the rendered command file, or `None` when some target is
/// unreachable or the deadline expired.
async fn plan_commands(settings: &Settings) -> anyhow::Result<Option<String>> {
    let layout = CourseLayout::build(&settings.course)?;

    let mut planner = Planner::new(settings.costs).parallel(settings.planner.parallel);
    if let Some(ms) = settings.planner.deadline_ms {
        planner = planner.with_deadline(Duration::from_millis(ms));
    }

    // The permutation search is CPU-bound; keep it off the async workers.
    let plan = tokio::task::spawn_blocking(move || {
        let waypoints = layout.grid.waypoints();
        planner.plan(
            &layout.start,
            &waypoints,
            layout.end,
            layout.end_heading,
            &layout.grid,
        )
    })
    .await
    .context("Planner task failed")?
    .context("Invalid planning input")?;

    Ok(plan.map(|plan| {
        info!("Planned {} motions, cost {:.1}", plan.len(), plan.cost);
        render(&plan, &settings.output.format())
    }))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::config::settings_from_str;

    const LEFT_COMMANDS: &str = "\
IS,in-cross straight,
CC,RED,(1 0 N),
IS,in-cross straight,
CC,RED,(0 0 N),
BT,waypoint,(0 0),
IR,90,clockwise,(0 0 E),
XR,0,100,heading correction,
IS,in-cross straight,
CC,RED,(0 1 E),
IS,in-cross straight,
CC,YELLOW,(0 2 E),
IS,in-cross straight,
CC,YELLOW,(0 3 E),
BT,waypoint,(0 3),
IR,90,clockwise,(0 3 S),
XR,0,100,heading correction,
IS,in-cross straight,
CC,YELLOW,(1 3 S),
IS,in-cross straight,
CC,GREEN,(2 3 S),
IS,in-cross straight,
CC,GREEN,(3 3 S),
BR,180,clockwise,(3 3 N),
XR,0,100,heading correction,
IS,in-cross straight,
CC,GREEN,(2 3 N),
IS,in-cross straight,
CC,YELLOW,(1 3 N),
IR,90,clockwise,(1 3 E),
XR,0,100,heading correction,
";

    const RIGHT_COMMANDS: &str = "\
BR,180,clockwise,(2 3 S),
XR,0,100,heading correction,
IS,in-cross straight,
CC,BLUE,(3 3 S),
BT,waypoint,(3 3),
BR,180,clockwise,(3 3 N),
XR,0,100,heading correction,
IS,in-cross straight,
CC,BLUE,(2 3 N),
IS,in-cross straight,
CC,RED,(1 3 N),
IS,in-cross straight,
CC,RED,(0 3 N),
BT,waypoint,(0 3),
IL,90,anticlockwise,(0 3 W),
XR,0,100,heading correction,
IS,in-cross straight,
CC,RED,(0 2 W),
IS,in-cross straight,
CC,YELLOW,(0 1 W),
IS,in-cross straight,
CC,YELLOW,(0 0 W),
IL,90,anticlockwise,(0 0 S),
XR,0,100,heading correction,
IS,in-cross straight,
CC,YELLOW,(1 0 S),
IR,90,clockwise,(1 0 W),
XR,0,100,heading correction,
";

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("gridway-main-{}", std::process::id()))
            .join(format!("{name}.txt"))
    }

    fn settings(course: &str, planner: &str, path: &Path) -> Settings {
        settings_from_str(&format!(
            r#"
            [course]
            {course}

            [planner]
            {planner}

            [output]
            path = "{}"
            in_cross_straight = true
            mark_waypoints = true
            heading_correction = {{ target_angle = 0, pwm = 100 }}
            "#,
            path.display()
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_left_course_commands() {
        let path = scratch_file("left");
        let settings = settings(
            r#"side = "left"
            blocks = [[3, 3], [0, 3], [0, 0]]"#,
            "",
            &path,
        );

        run(&settings).await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), LEFT_COMMANDS);
    }

    #[tokio::test]
    async fn test_right_course_commands() {
        let path = scratch_file("right");
        let settings = settings(
            r#"side = "right"
            blocks = [[3, 3], [0, 3], [0, 0]]"#,
            "parallel = true",
            &path,
        );

        run(&settings).await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), RIGHT_COMMANDS);
    }

    #[tokio::test]
    async fn test_parallel_matches_sequential() {
        let course = r#"side = "left"
            blocks = [[3, 3], [0, 3], [0, 0]]"#;
        let path = scratch_file("unused");
        let sequential = plan_commands(&settings(course, "", &path)).await.unwrap();
        let parallel = plan_commands(&settings(course, "parallel = true", &path))
            .await
            .unwrap();
        assert_eq!(sequential.as_deref(), Some(LEFT_COMMANDS));
        assert_eq!(sequential, parallel);
    }

    #[tokio::test]
    async fn test_failures_leave_previous_file() {
        let path = scratch_file("failures");
        output::write_commands(&path, "CC,RED,(1 0 N),\n").await.unwrap();

        let cases = [
            // block outside the course
            (r#"side = "left"
            blocks = [[4, 1]]"#, ""),
            // start outside the course
            (r#"side = "left"
            start = { row = 9, col = 0, heading = "north" }"#, ""),
            // deadline already expired
            (r#"side = "left"
            blocks = [[0, 3], [3, 3]]"#, "deadline_ms = 0"),
        ];
        for (course, planner) in cases {
            assert!(run(&settings(course, planner, &path)).await.is_err());
            assert_eq!(
                tokio::fs::read_to_string(&path).await.unwrap(),
                "CC,RED,(1 0 N),\n"
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_costs_are_rejected() {
        let path = scratch_file("costs");
        let mut settings = settings(r#"side = "left""#, "", &path);
        settings.costs.advance = -1.0;
        let err = plan_commands(&settings).await.unwrap_err();
        assert!(format!("{err:#}").contains("Invalid planning input"));
    }
}
