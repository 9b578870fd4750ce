//! Wave lifetime and first-visit behaviour.

use proptest::prelude::*;
use std::collections::HashMap;
use textsplash::color::ColorPair;
use textsplash::grid::Grid;
use textsplash::wave::{Wave, WaveParams};

const FLASH: ColorPair = ColorPair::new(0, 11);

fn filled(width: usize, height: usize) -> Grid {
    let mut grid = Grid::new(width, height).expect("valid geometry");
    grid.fill('#', ColorPair::TRANSPARENT);
    grid
}

fn params(max_distance: u32, speed: f64, fade_time: f64) -> WaveParams {
    WaveParams {
        max_distance,
        speed,
        fade_time,
        ..WaveParams::default()
    }
}

proptest! {
    // fade_time * speed stays above the two-hop overshoot, so the fade window
    // is what decides when the wave ends.
    #[test]
    fn wave_finishes_after_travel_and_fade(
        max_distance in 0u32..50,
        speed in 10.0f64..40.0,
        fade_time in 0.3f64..2.0,
        start in 0.0f64..100.0,
        epsilon in 0.01f64..1.0,
    ) {
        let mut grid = filled(12, 8);
        let mut wave = Wave::new(5, 3, start, params(max_distance, speed, fade_time));
        let now = start + f64::from(max_distance) / speed + fade_time + epsilon;
        let outcome = wave.step(&mut grid, now, || FLASH, |_| {});
        prop_assert!(outcome.done);
    }

    #[test]
    fn wave_is_done_once_its_lifetime_has_passed(
        max_distance in 0u32..50,
        speed in 0.5f64..40.0,
        fade_time in 0.0f64..2.0,
        start in 0.0f64..100.0,
        epsilon in 0.01f64..1.0,
    ) {
        let mut grid = filled(12, 8);
        let params = params(max_distance, speed, fade_time);
        let mut wave = Wave::new(5, 3, start, params);
        let now = start + params.lifetime() + epsilon;
        prop_assert!(wave.is_finished_at(now));
        let done = wave.step(&mut grid, now, || FLASH, |_| {}).done;
        prop_assert!(done);
    }

    #[test]
    fn wave_runs_while_the_front_travels(
        max_distance in 1u32..50,
        speed in 0.5f64..40.0,
        fade_time in 0.0f64..2.0,
        start in 0.0f64..100.0,
        progress in 0.0f64..0.999,
    ) {
        let mut grid = filled(12, 8);
        let mut wave = Wave::new(5, 3, start, params(max_distance, speed, fade_time));
        let now = start + progress * f64::from(max_distance) / speed;
        let outcome = wave.step(&mut grid, now, || FLASH, |_| {});
        prop_assert!(!outcome.done);
    }

    #[test]
    fn lit_cells_are_never_blank(gaps in prop::collection::vec(any::<bool>(), 40), t in 0.0f64..1.0) {
        let mut grid = Grid::new(8, 5).expect("valid geometry");
        for (i, gap) in gaps.iter().enumerate() {
            let ch = if *gap { ' ' } else { '#' };
            grid.put((i % 8) as i32, (i / 8) as i32, ch, ColorPair::TRANSPARENT);
        }
        let mut wave = Wave::new(0, 0, 0.0, params(20, 10.0, 0.6));
        wave.step(&mut grid, t, || FLASH, |_| {});
        for cell in grid.cells() {
            if cell.ch == ' ' {
                prop_assert_eq!((cell.background, cell.foreground), (0, 0));
            }
        }
    }
}

#[test]
fn first_visit_fires_once_per_cell() {
    let mut grid = filled(9, 9);
    let mut wave = Wave::new(4, 4, 0.0, params(4, 10.0, 0.6));
    let mut visits: HashMap<(usize, usize), usize> = HashMap::new();

    let mut frame = 0;
    loop {
        let now = f64::from(frame) * 0.01;
        let outcome = wave.step(&mut grid, now, || FLASH, |visit| {
            *visits.entry((visit.x, visit.y)).or_default() += 1;
        });
        if outcome.done {
            break;
        }
        frame += 1;
        assert!(frame < 1000, "wave never finished");
    }

    assert_eq!(visits.len(), 81);
    assert!(visits.values().all(|count| *count == 1));
}

#[test]
fn waves_tunnel_through_blank_gaps() {
    let mut grid = Grid::new(7, 1).expect("valid geometry");
    grid.print(0, 0, "#   #  ", ColorPair::TRANSPARENT);
    let mut wave = Wave::new(0, 0, 0.0, params(10, 10.0, 0.6));
    let mut reached = Vec::new();

    wave.step(&mut grid, 0.45, || FLASH, |visit| reached.push((visit.x, visit.distance)));

    assert!(reached.contains(&(4, 4)));
    assert_eq!(grid.colors_at(4, 0), Some(FLASH));
    assert_eq!(grid.colors_at(2, 0), Some(ColorPair::TRANSPARENT));
}

#[test]
fn origin_off_grid_finishes_immediately() {
    let mut grid = filled(4, 4);
    let mut wave = Wave::new(-1, 2, 0.0, WaveParams::default());
    assert!(wave.step(&mut grid, 0.0, || FLASH, |_| {}).done);
}
