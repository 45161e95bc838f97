use chainfall_core::engine::{Visited, flood_fill, place_pair, resolve_chains};
use chainfall_core::model::action::{ActionChoice, Placement, Rotation};
use chainfall_core::model::cell::{Cell, Colour};
use chainfall_core::model::grid::{Grid, HEIGHT, WIDTH};
use chainfall_core::model::queue::{BlockPair, NextQueue};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn random_grid(rng: &mut SmallRng) -> Grid {
    let mut grid = Grid::empty();
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let cell = match rng.gen_range(0..8u8) {
                0..=1 => Cell::Empty,
                2 => Cell::Skull,
                digit => Cell::Block(Colour::from_digit(digit - 2).expect("digit in range")),
            };
            grid.set(x, y, cell);
        }
    }
    grid
}

#[test]
fn gravity_is_idempotent() {
    let mut rng = SmallRng::seed_from_u64(20261018);
    for _ in 0..200 {
        let mut once = random_grid(&mut rng);
        let filled = once.filled_count();
        once.apply_gravity();
        let mut twice = once;
        twice.apply_gravity();
        assert_eq!(once, twice);
        assert_eq!(once.filled_count(), filled);

        for x in 0..WIDTH {
            let mut seen_filled = false;
            for y in 0..HEIGHT {
                let filled = once.get(x, y).is_filled();
                assert!(!(seen_filled && !filled), "hole under a block in column {x}");
                seen_filled |= filled;
            }
        }
    }
}

#[test]
fn straight_run_of_four_clears_with_adjacent_skulls() {
    let mut grid = Grid::empty();
    for x in 1..5 {
        grid.set(x, 11, Cell::Block(Colour::Yellow));
    }
    grid.set(0, 11, Cell::Skull);
    grid.set(2, 10, Cell::Skull);
    grid.set(5, 10, Cell::Skull);

    let mut visited = Visited::new();
    let component = flood_fill(&mut grid, 1, 11, &mut visited).expect("run found");

    assert_eq!(component.size, 4);
    assert!(component.cleared());
    assert_eq!(component.skulls_cleared, 2);
    for x in 0..5 {
        assert_eq!(grid.get(x, 11), Cell::Empty);
    }
    assert_eq!(grid.get(2, 10), Cell::Empty);
    // diagonal to the run, so it stays
    assert_eq!(grid.get(5, 10), Cell::Skull);
}

#[test]
fn chain_resolution_is_deterministic() {
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..50 {
        let mut base = random_grid(&mut rng);
        base.apply_gravity();
        let mut a = base;
        let mut b = base;
        let report_a = resolve_chains(&mut a);
        let report_b = resolve_chains(&mut b);
        assert_eq!(report_a, report_b);
        assert_eq!(a, b);
    }
}

#[test]
fn resolved_board_has_no_clearable_group() {
    let mut rng = SmallRng::seed_from_u64(99);
    for _ in 0..50 {
        let mut grid = random_grid(&mut rng);
        grid.apply_gravity();
        resolve_chains(&mut grid);
        let again = resolve_chains(&mut grid.clone());
        assert_eq!(again.chain_count(), 0);
    }
}

#[test]
fn vertical_pair_on_empty_board_does_not_clear() {
    let queue = NextQueue::uniform(BlockPair::new(Colour::Green, Colour::Green));
    let mut grid = Grid::empty();
    let landing = grid.landing_rows();
    place_pair(&mut grid, Placement::new(0, Rotation::Up), queue.pair_at(0), &landing)
        .expect("empty board has room");

    let report = resolve_chains(&mut grid);
    assert_eq!(grid.filled_count(), 2);
    assert_eq!(report.chain_count(), 0);
    assert_eq!(report.first_scan, vec![2]);
    assert_eq!(report.skulls_cleared(), 0);
}

#[test]
fn fourth_block_on_a_stack_of_three_clears_it() {
    let mut grid = Grid::empty();
    for y in 9..HEIGHT {
        grid.set(2, y, Cell::Block(Colour::Pink));
    }
    let pair = BlockPair::new(Colour::Pink, Colour::Blue);
    let landing = grid.landing_rows();
    place_pair(&mut grid, Placement::new(2, Rotation::Up), pair, &landing).expect("room");

    let report = resolve_chains(&mut grid);
    assert_eq!(report.chain_count(), 1);
    assert_eq!(report.steps[0].groups.len(), 1);
    assert_eq!(report.steps[0].groups[0].size, 4);
    assert_eq!(report.steps[0].groups[0].colour, Colour::Pink);
    // the attached blue half settles to the floor of the emptied column
    assert_eq!(grid.get(2, 11), Cell::Block(Colour::Blue));
    assert_eq!(grid.filled_count(), 1);
}

#[test]
fn rightmost_column_only_offers_three_rotations() {
    let rotations: Vec<Rotation> = ActionChoice::all()
        .map(|choice| choice.placement())
        .filter(|placement| placement.column == WIDTH - 1)
        .map(|placement| placement.rotation)
        .collect();
    assert_eq!(rotations.len(), 3);
    assert!(!rotations.contains(&Rotation::Right));
}
