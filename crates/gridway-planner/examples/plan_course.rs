use gridway_planner::{
    Cell, CommandFormat, CostModel, Grid, Heading, LaneColor, Planner, RobotState, render,
};

fn main() {
    // Lane colours of a 4x4 block area, row 0 at the top
    use LaneColor::*;
    let colors = vec![
        vec![Some(Red), Some(Red), Some(Yellow), Some(Yellow)],
        vec![Some(Red), Some(Red), Some(Yellow), Some(Yellow)],
        vec![Some(Blue), Some(Blue), Some(Green), Some(Green)],
        vec![Some(Blue), Some(Blue), Some(Green), Some(Green)],
    ];
    let mut grid = Grid::from_colors(&colors).unwrap();
    for cell in [Cell::new(0, 3), Cell::new(3, 3)] {
        grid.set_waypoint(cell).unwrap();
    }

    let start = RobotState::new(Cell::new(2, 0), Heading::North);
    let end = Cell::new(1, 3);
    let end_heading = Heading::East;

    println!("{grid}");
    println!("Start: {start}, End: {end} facing {end_heading}");

    let planner = Planner::new(CostModel::default());
    match planner.plan(&start, &grid.waypoints(), end, end_heading, &grid) {
        Ok(Some(plan)) => {
            println!("\n{plan}");
            println!("Commands:");
            print!("{}", render(&plan, &CommandFormat::default()));
        }
        Ok(None) => println!("\nNo plan found."),
        Err(e) => println!("\nInvalid input: {e}"),
    }
}
