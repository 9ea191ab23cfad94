mod common;

use common::{live_cells, UniverseBuilder};

#[test]
fn test_blinker_has_period_two() {
    let mut universe = UniverseBuilder::new(6, 6)
        .with_cells(&[(2, 1), (2, 2), (2, 3)])
        .build();
    let start = live_cells(&universe);

    universe.tick();
    assert_eq!(live_cells(&universe), vec![(1, 2), (2, 2), (3, 2)]);
    universe.tick();
    assert_eq!(live_cells(&universe), start);

    for _ in 0..20 {
        universe.tick();
    }
    assert_eq!(live_cells(&universe), start);
    assert_eq!(universe.live_count(), 3);
}

#[test]
fn test_block_is_still_life() {
    let mut universe = UniverseBuilder::new(8, 8).with_block(3, 3, 2, 2).build();
    let start = live_cells(&universe);
    for _ in 0..10 {
        universe.tick();
        assert_eq!(live_cells(&universe), start);
    }
    assert_eq!(universe.metrics().stagnation, 10);
}

#[test]
fn test_blinker_wraps_across_columns() {
    let mut universe = UniverseBuilder::new(6, 6)
        .with_cells(&[(2, 5), (2, 0), (2, 1)])
        .build();
    universe.tick();
    assert_eq!(live_cells(&universe), vec![(1, 0), (2, 0), (3, 0)]);
}

#[test]
fn test_blinker_wraps_across_rows() {
    let mut universe = UniverseBuilder::new(6, 6)
        .with_cells(&[(0, 2), (0, 3), (0, 4)])
        .build();
    universe.tick();
    assert_eq!(live_cells(&universe), vec![(0, 3), (1, 3), (5, 3)]);
}

#[test]
fn test_glider_returns_home_on_torus() {
    let glider = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
    let mut universe = UniverseBuilder::new(8, 8).with_cells(&glider).build();
    let start = live_cells(&universe);

    for tick in 1..=32 {
        universe.tick();
        assert_eq!(universe.live_count(), 5, "Glider lost cells at tick {tick}");
    }
    assert_eq!(live_cells(&universe), start);
}

#[test]
fn test_classic_mode_has_no_invaders_or_weapons() {
    let mut universe = UniverseBuilder::new(10, 10).with_block(2, 2, 3, 3).build();
    for _ in 0..15 {
        universe.tick();
    }
    assert!(universe.invader().iter().all(|&v| v == 0));
    assert!(universe.weapons().iter().all(|w| *w == Default::default()));
    assert!(universe.active_events().is_empty());
}
