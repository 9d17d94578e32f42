use grid_stepsearch::{path, search, Coord, Grid, SearchResult, Tag, Variant};

// Drives a search one step at a time, reprinting the grid after every tag
// transition the way an interactive visualizer would redraw it.
fn main() {
    let mut grid = Grid::new(8, 8);
    for row in 1..7 {
        grid.set_tag(Coord::new(row, 4), Tag::Blocked).unwrap();
    }
    let start = Coord::new(3, 1);
    let goal = Coord::new(4, 6);
    grid.place_start(start).unwrap();
    grid.place_goal(goal).unwrap();

    let mut search = search::run(&mut grid, start, goal, Variant::BreadthFirst).unwrap();
    let mut steps = 0;
    while let Some(event) = search.next() {
        steps += 1;
        println!("step {steps}: {} -> {:?}", event.coord, event.tag);
    }
    let outcome = search.finish();
    println!("\nexploration after {steps} steps:\n{grid}");

    if let SearchResult::Found { predecessors } = outcome {
        let route = path::reconstruct_with(&mut grid, &predecessors, start, goal, |event| {
            println!("path cell {}", event.coord);
        })
        .unwrap();
        println!("\nroute of {} steps:\n{grid}", route.len() - 1);
    } else {
        println!("no route exists");
    }
}
