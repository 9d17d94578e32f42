use grid_stepsearch::{find_path, Coord, Grid, Tag, Variant};

// In this example a path is found on a grid with shape
// S . # . .
// . . # . .
// . . # . .
// . . # . .
// . . . . G
// S marks the start
// G marks the goal
fn main() {
    let mut grid = Grid::new(5, 5);
    for row in 0..4 {
        grid.set_tag(Coord::new(row, 2), Tag::Blocked).unwrap();
    }
    grid.place_start(Coord::new(0, 0)).unwrap();
    grid.place_goal(Coord::new(4, 4)).unwrap();
    if let Some(path) = find_path(
        &mut grid,
        Coord::new(0, 0),
        Coord::new(4, 4),
        Variant::AStarStrict,
    )
    .unwrap()
    {
        println!("A path has been found:");
        for coord in path {
            println!("{coord}");
        }
        println!("{grid}");
    }
}
