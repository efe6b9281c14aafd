use skirmish::path::{build_distance_field, find_path, within_earshot, Cell};
use skirmish::sim::Arena;

#[test]
fn paths_route_around_the_standard_pillars() {
    let arena = Arena::standard();
    let walkable = |c: Cell| arena.is_walkable(c);
    let blocked = |_: Cell| false;
    // Start and goal on either side of the x = 7 pillar column.
    let path = find_path(Cell::new(6, 3), Cell::new(8, 3), &walkable, &blocked)
        .expect("pillars never seal off the arena");
    assert!(path.cells.iter().all(|&c| arena.is_walkable(c)));
    assert_eq!(path.cells.last(), Some(&Cell::new(8, 3)));
    // Slipping diagonally past the pillar keeps the Chebyshev-optimal cost.
    assert_eq!(path.cost, 2);
}

#[test]
fn occupied_cells_block_travel_but_not_the_goal() {
    let arena = Arena::open(8, 3);
    let walkable = |c: Cell| arena.is_walkable(c);
    let sentry = Cell::new(4, 1);
    let blocked = move |c: Cell| c == sentry;
    let path = find_path(Cell::new(0, 1), sentry, &walkable, &blocked)
        .expect("goal cell is exempt from occupancy");
    assert_eq!(path.cells.last(), Some(&sentry));
    assert!(path.cells[..path.cells.len() - 1].iter().all(|&c| c != sentry));
}

#[test]
fn diagonal_movement_costs_the_same_as_cardinal() {
    let arena = Arena::open(10, 10);
    let walkable = |c: Cell| arena.is_walkable(c);
    let blocked = |_: Cell| false;
    let diagonal = find_path(Cell::new(0, 0), Cell::new(5, 5), &walkable, &blocked).unwrap();
    assert_eq!(diagonal.cost, 5);
    assert_eq!(diagonal.cells.len(), 5);
}

#[test]
fn unreachable_goals_return_none() {
    let mut arena = Arena::open(7, 7);
    for y in 0..7 {
        arena.add_wall(Cell::new(3, y));
    }
    let walkable = |c: Cell| arena.is_walkable(c);
    let blocked = |_: Cell| false;
    assert!(find_path(Cell::new(0, 3), Cell::new(6, 3), &walkable, &blocked).is_none());
}

#[test]
fn distance_fields_measure_walking_distance_not_straight_lines() {
    let mut arena = Arena::open(11, 5);
    for y in 0..4 {
        // Wall with a gap at the bottom row.
        arena.add_wall(Cell::new(5, y));
    }
    let walkable = |c: Cell| arena.is_walkable(c);
    let source = Cell::new(4, 0);
    let field = build_distance_field(&[source], &walkable);
    let listener = Cell::new(6, 0);
    // Adjacent as the crow flies, but the walk goes down and around.
    assert!(field.distance(listener) > listener.euclidean(source));
    assert!(!within_earshot(&field, source, listener));
}

#[test]
fn earshot_holds_on_open_floor() {
    let arena = Arena::open(12, 12);
    let walkable = |c: Cell| arena.is_walkable(c);
    let source = Cell::new(2, 2);
    let field = build_distance_field(&[source], &walkable);
    assert!(within_earshot(&field, source, Cell::new(7, 2)));
    assert!(within_earshot(&field, source, Cell::new(6, 6)));
}
