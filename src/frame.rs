//! Per-frame compositing of every animation layer onto one grid.

use crate::config::{Config, InitialWavesConfig};
use crate::effects::{EffectsManager, VisitHook};
use crate::grid::{Grid, GridError};
use crate::name::NameAnimator;
use crate::noise::NoiseSource;
use crate::scroll_sign::ScrollSign;
use crate::wave::{CellVisit, WaveOverrides};
use rand::Rng;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Owns the grid and drives the animators in a fixed order each tick:
/// noise, banner, scroll sign, then waves.
///
/// Times passed in are seconds on the caller's clock; the driver measures
/// animation time from the last (re)start.
pub struct FrameDriver<R> {
    grid: Grid,
    previous_background: Vec<u8>,
    previous_foreground: Vec<u8>,
    noise: NoiseSource,
    name: NameAnimator,
    sign: ScrollSign,
    effects: EffectsManager,
    initial_waves: InitialWavesConfig,
    epoch: f64,
    rng: R,
}

impl<R: Rng> FrameDriver<R> {
    pub fn new(config: &Config, width: usize, height: usize, rng: R) -> Result<Self, GridError> {
        let grid = Grid::new(width, height)?;
        let general = &config.general;
        let mut driver = Self {
            previous_background: Vec::with_capacity(grid.len()),
            previous_foreground: Vec::with_capacity(grid.len()),
            noise: NoiseSource::from_art(&general.art),
            name: NameAnimator::new(&general.art, config.name, general.seed, general.settled_color),
            sign: ScrollSign::new(config.scroll_sign.clone(), width, height),
            effects: EffectsManager::new(config.effects),
            initial_waves: config.initial_waves.clone(),
            epoch: 0.0,
            grid,
            rng,
        };
        driver.schedule_initial_waves();
        tracing::info!(width, height, "animation session started");
        Ok(driver)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn effects(&self) -> &EffectsManager {
        &self.effects
    }

    /// Animation time for a clock reading.
    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.epoch
    }

    /// Composite one frame at clock time `now`.
    pub fn tick(&mut self, now: f64) {
        let t = self.elapsed(now);

        self.previous_background.clear();
        self.previous_background.extend_from_slice(self.grid.backgrounds());
        self.previous_foreground.clear();
        self.previous_foreground.extend_from_slice(self.grid.foregrounds());

        let Self {
            grid,
            previous_background,
            previous_foreground,
            noise,
            name,
            sign,
            effects,
            rng,
            ..
        } = self;

        isolate("noise", || noise.fill(grid, rng));
        isolate("name", || {
            name.update(grid, t, previous_background, previous_foreground, rng)
        });
        isolate("scroll sign", || sign.update(grid, t, rng));
        isolate("effects", || effects.update(grid, t, rng));
    }

    /// Reallocate the grid and relayout everything that depends on its size.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), GridError> {
        self.grid.resize(width, height)?;
        self.sign.resize(width, height);
        tracing::info!(width, height, "grid resized");
        Ok(())
    }

    /// Start a wave at a cell, e.g. under the mouse.
    pub fn click(&mut self, x: i32, y: i32, now: f64) {
        let t = self.elapsed(now);
        self.effects.start_default(x, y, t);
    }

    /// Replay the whole animation from clock time `now`.
    pub fn restart(&mut self, now: f64) {
        self.epoch = now;
        self.effects.clear();
        self.sign.reset();
        self.schedule_initial_waves();
        tracing::info!("animation restarted");
    }

    fn schedule_initial_waves(&mut self) {
        let (width, height) = (self.grid.width(), self.grid.height());
        let (origin_x, origin_y) = self.name.content_origin(width, height);
        let to_grid = move |rel_x: i32, rel_y: i32| {
            (
                (origin_x + rel_x).clamp(0, width as i32 - 1),
                (origin_y + rel_y).clamp(0, height as i32 - 1),
            )
        };

        let config = &self.initial_waves;
        let start_of = |at_secs: f64| at_secs - config.delay_secs;

        if !config.chain {
            for wave in &config.waves {
                let (x, y) = to_grid(wave.x, wave.y);
                self.effects.start_default(x, y, start_of(wave.at_secs));
            }
            return;
        }

        let Some((first, rest)) = config.waves.split_first() else {
            return;
        };
        let triggers: Vec<((i32, i32), (i32, i32))> = rest
            .iter()
            .filter_map(|wave| {
                let [tx, ty] = wave.trigger?;
                Some((to_grid(tx, ty), to_grid(wave.x, wave.y)))
            })
            .collect();
        let hook: VisitHook = Box::new(move |visit: CellVisit| {
            let cell = (visit.x as i32, visit.y as i32);
            triggers
                .iter()
                .find(|(trigger, _)| *trigger == cell)
                .map(|&(_, origin)| {
                    tracing::debug!(x = origin.0, y = origin.1, "chained wave triggered");
                    origin
                })
        });
        let (x, y) = to_grid(first.x, first.y);
        self.effects
            .start(x, y, start_of(first.at_secs), WaveOverrides::default(), Some(hook));
    }
}

impl<R> std::fmt::Debug for FrameDriver<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDriver")
            .field("width", &self.grid.width())
            .field("height", &self.grid.height())
            .field("epoch", &self.epoch)
            .field("effects", &self.effects)
            .finish()
    }
}

/// Run one animation layer, logging a panic instead of letting it take the
/// other layers down with it.
fn isolate(component: &str, f: impl FnOnce()) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(f)) {
        tracing::error!(component, "animation layer panicked: {}", panic_message(&*payload));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
