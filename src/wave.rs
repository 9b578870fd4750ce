//! Expanding colour waves.
//!
//! A wave spreads from its origin one hop per `1 / speed` seconds over the
//! 8-connected grid, lights every non-blank glyph it reaches with a flickering
//! bright colour, then lets each glyph settle back to a rest colour.

use crate::color::ColorPair;
use crate::flicker::FlickerHold;
use crate::grid::{is_blank, Grid};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// How long after the front passes a cell it keeps the front colour.
const WAVE_FRONT_THICKNESS: f64 = 1.0;

/// The front must travel this many hops beyond `max_distance` before the wave
/// may finish.
const FRONT_OVERSHOOT: f64 = 2.0;

const MIN_SPEED: f64 = 0.001;

const NEIGHBOURS: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

// ============================================================================
// PARAMETERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    /// Maximum hop distance from the origin.
    pub max_distance: u32,
    /// Hops travelled per second.
    pub speed: f64,
    /// Seconds a cell stays lit after the front reaches it.
    pub fade_time: f64,
    /// Colour a cell returns to once its fade is over.
    pub rest_color: ColorPair,
    /// Minimum time a lit cell keeps one colour before re-rolling.
    pub color_hold_ms: u64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            max_distance: 100,
            speed: 10.0,
            fade_time: 0.6,
            rest_color: ColorPair::WHITE,
            color_hold_ms: 40,
        }
    }
}

impl WaveParams {
    /// Replace values that would break the timing maths.
    fn sanitized(mut self) -> Self {
        if !(self.speed >= MIN_SPEED) {
            self.speed = MIN_SPEED;
        }
        if !(self.fade_time >= 0.0) {
            self.fade_time = 0.0;
        }
        self
    }

    /// Seconds until the wave is guaranteed to report done.
    pub fn lifetime(&self) -> f64 {
        let front_exit = (f64::from(self.max_distance) + FRONT_OVERSHOOT) / self.speed;
        let fade_out = f64::from(self.max_distance) / self.speed + self.fade_time;
        front_exit.max(fade_out)
    }
}

/// Per-wave replacements for the configured defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaveOverrides {
    pub max_distance: Option<u32>,
    pub speed: Option<f64>,
    pub fade_time: Option<f64>,
    pub rest_color: Option<ColorPair>,
    pub color_hold_ms: Option<u64>,
}

impl WaveOverrides {
    pub fn apply(&self, base: WaveParams) -> WaveParams {
        WaveParams {
            max_distance: self.max_distance.unwrap_or(base.max_distance),
            speed: self.speed.unwrap_or(base.speed),
            fade_time: self.fade_time.unwrap_or(base.fade_time),
            rest_color: self.rest_color.unwrap_or(base.rest_color),
            color_hold_ms: self.color_hold_ms.unwrap_or(base.color_hold_ms),
        }
    }
}

// ============================================================================
// WAVE
// ============================================================================

/// A cell reached by the front for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellVisit {
    pub x: usize,
    pub y: usize,
    pub distance: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub done: bool,
}

#[derive(Debug, Clone)]
pub struct Wave {
    origin: (i32, i32),
    start_time: f64,
    params: WaveParams,
    hold: FlickerHold<(usize, usize)>,
    visited: HashSet<(usize, usize)>,
}

impl Wave {
    pub fn new(x: i32, y: i32, start_time: f64, params: WaveParams) -> Self {
        let params = params.sanitized();
        Self {
            origin: (x, y),
            start_time,
            hold: FlickerHold::new(params.color_hold_ms),
            params,
            visited: HashSet::new(),
        }
    }

    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn params(&self) -> &WaveParams {
        &self.params
    }

    /// Whether the front has left `max_distance` and every cell has faded.
    pub fn is_finished_at(&self, now: f64) -> bool {
        let elapsed = now - self.start_time;
        let max = f64::from(self.params.max_distance);
        elapsed * self.params.speed > max + FRONT_OVERSHOOT
            && elapsed > max / self.params.speed + self.params.fade_time
    }

    /// Advance to `now`, colouring every active cell of `grid`.
    ///
    /// `color_fn` rolls a new flicker colour; `on_first_visit` fires at most once
    /// per cell over the whole life of the wave, when the front first reaches it.
    /// Blank cells are never coloured, but the search still walks through them,
    /// so a wave reaches glyphs on the far side of a gap.
    pub fn step<C, H>(&mut self, grid: &mut Grid, now: f64, mut color_fn: C, mut on_first_visit: H) -> StepOutcome
    where
        C: FnMut() -> ColorPair,
        H: FnMut(CellVisit),
    {
        let Some(origin_index) = grid.index_of(self.origin.0, self.origin.1) else {
            return StepOutcome { done: true };
        };
        if self.is_finished_at(now) {
            return StepOutcome { done: true };
        }

        let elapsed = now - self.start_time;
        let front = elapsed * self.params.speed;
        let width = grid.width();
        let mut seen = vec![false; grid.len()];
        let mut queue = VecDeque::new();
        seen[origin_index] = true;
        queue.push_back((origin_index, 0u32));

        while let Some((index, distance)) = queue.pop_front() {
            // Distances come out of the queue in order; nothing further can be lit.
            if f64::from(distance) > front {
                break;
            }
            let (x, y) = (index % width, index / width);

            if !is_blank(grid.chars()[index]) {
                let since_front = elapsed - f64::from(distance) / self.params.speed;
                if since_front <= self.params.fade_time {
                    if since_front < WAVE_FRONT_THICKNESS && self.visited.insert((x, y)) {
                        on_first_visit(CellVisit { x, y, distance });
                    }
                    let held = self.hold.color_for((x, y), now, &mut color_fn);
                    grid.set_colors(index, self.settle(held, since_front));
                }
            }

            if distance < self.params.max_distance {
                for (dx, dy) in NEIGHBOURS {
                    if let Some(next) = grid.index_of(x as i32 + dx, y as i32 + dy) {
                        if !seen[next] {
                            seen[next] = true;
                            queue.push_back((next, distance + 1));
                        }
                    }
                }
            }
        }

        StepOutcome { done: false }
    }

    /// The held flicker colour, or the rest colour once the fade has run out.
    fn settle(&self, held: ColorPair, since_front: f64) -> ColorPair {
        if since_front < WAVE_FRONT_THICKNESS {
            return held;
        }
        let progress = ((since_front - WAVE_FRONT_THICKNESS)
            / (self.params.fade_time - WAVE_FRONT_THICKNESS))
            .min(1.0);
        if progress < 1.0 {
            held
        } else {
            self.params.rest_color
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLASH: ColorPair = ColorPair::new(0, 12);

    fn params() -> WaveParams {
        WaveParams {
            max_distance: 10,
            speed: 10.0,
            fade_time: 0.6,
            rest_color: ColorPair::WHITE,
            color_hold_ms: 40,
        }
    }

    fn filled(width: usize, height: usize, ch: char) -> Grid {
        let mut grid = Grid::new(width, height).expect("valid geometry");
        grid.fill(ch, ColorPair::TRANSPARENT);
        grid
    }

    fn lit(grid: &Grid) -> Vec<(usize, usize)> {
        grid.cells()
            .filter(|c| c.foreground == FLASH.foreground)
            .map(|c| (c.x, c.y))
            .collect()
    }

    #[test]
    fn origin_lights_first() {
        let mut grid = filled(5, 5, '#');
        let mut wave = Wave::new(2, 2, 0.0, params());
        let outcome = wave.step(&mut grid, 0.0, || FLASH, |_| {});
        assert!(!outcome.done);
        assert_eq!(lit(&grid), vec![(2, 2)]);
    }

    #[test]
    fn front_spreads_diagonally() {
        let mut grid = filled(5, 5, '#');
        let mut wave = Wave::new(2, 2, 0.0, params());
        wave.step(&mut grid, 0.1, || FLASH, |_| {});
        assert_eq!(lit(&grid).len(), 9);
    }

    #[test]
    fn blank_cells_stay_uncoloured_but_are_crossed() {
        let mut grid = filled(7, 1, ' ');
        grid.put(0, 0, '#', ColorPair::TRANSPARENT);
        grid.put(6, 0, '#', ColorPair::TRANSPARENT);
        let mut wave = Wave::new(0, 0, 0.0, params());
        wave.step(&mut grid, 0.65, || FLASH, |_| {});
        assert_eq!(lit(&grid), vec![(6, 0)]);
        assert_eq!(grid.colors_at(3, 0), Some(ColorPair::TRANSPARENT));
    }

    #[test]
    fn max_distance_bounds_the_search() {
        let mut grid = filled(20, 1, '#');
        let mut wave = Wave::new(0, 0, 0.0, WaveParams { max_distance: 3, fade_time: 5.0, ..params() });
        wave.step(&mut grid, 1.0, || FLASH, |_| {});
        assert_eq!(lit(&grid), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn cells_past_the_fade_are_left_alone() {
        let mut grid = filled(10, 1, '#');
        let mut wave = Wave::new(0, 0, 0.0, params());
        // front at 9.5 hops; cells 0..=3 were reached more than 0.6s ago.
        wave.step(&mut grid, 0.95, || FLASH, |_| {});
        let lit = lit(&grid);
        assert_eq!(lit.first(), Some(&(4, 0)));
        assert_eq!(lit.last(), Some(&(9, 0)));
    }

    #[test]
    fn long_fade_returns_to_rest_colour() {
        let mut grid = filled(3, 1, '#');
        let mut wave = Wave::new(0, 0, 0.0, WaveParams { fade_time: 2.0, ..params() });
        wave.step(&mut grid, 1.5, || FLASH, |_| {});
        assert_eq!(grid.colors_at(0, 0), Some(FLASH));
        let mut grid = filled(3, 1, '#');
        wave.step(&mut grid, 2.0, || FLASH, |_| {});
        assert_eq!(grid.colors_at(0, 0), Some(ColorPair::WHITE));
    }

    #[test]
    fn held_colour_survives_short_frames() {
        let mut grid = filled(1, 1, '#');
        let mut wave = Wave::new(0, 0, 0.0, params());
        let mut rolls = 0u8;
        let mut roll = || {
            rolls += 1;
            ColorPair::new(0, 10 + rolls)
        };
        wave.step(&mut grid, 0.00, &mut roll, |_| {});
        wave.step(&mut grid, 0.02, &mut roll, |_| {});
        wave.step(&mut grid, 0.04, &mut roll, |_| {});
        assert_eq!(grid.colors_at(0, 0), Some(ColorPair::new(0, 11)));
        wave.step(&mut grid, 0.05, &mut roll, |_| {});
        assert_eq!(grid.colors_at(0, 0), Some(ColorPair::new(0, 12)));
    }

    #[test]
    fn off_grid_origin_finishes_immediately() {
        let mut grid = filled(3, 3, '#');
        let mut wave = Wave::new(5, 0, 0.0, params());
        assert!(wave.step(&mut grid, 0.0, || FLASH, |_| {}).done);
    }

    #[test]
    fn first_visit_reports_distance() {
        let mut grid = filled(4, 1, '#');
        let mut wave = Wave::new(0, 0, 0.0, params());
        let mut visits = Vec::new();
        wave.step(&mut grid, 0.25, || FLASH, |v| visits.push(v));
        assert_eq!(
            visits,
            vec![
                CellVisit { x: 0, y: 0, distance: 0 },
                CellVisit { x: 1, y: 0, distance: 1 },
                CellVisit { x: 2, y: 0, distance: 2 },
            ]
        );
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let base = params();
        let merged = WaveOverrides {
            speed: Some(3.0),
            ..WaveOverrides::default()
        }
        .apply(base);
        assert_eq!(merged.speed, 3.0);
        assert_eq!(merged.max_distance, base.max_distance);
    }

    #[test]
    fn non_positive_speed_is_sanitized() {
        let wave = Wave::new(0, 0, 0.0, WaveParams { speed: 0.0, fade_time: f64::NAN, ..params() });
        assert_eq!(wave.params().speed, MIN_SPEED);
        assert_eq!(wave.params().fade_time, 0.0);
    }
}
