use crate::color::random_bright;
use crate::grid::Grid;
use crate::wave::{CellVisit, Wave, WaveOverrides, WaveParams};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Called the first time a wave reaches a cell. Returning a coordinate chains a
/// new wave from there, starting on the current frame.
pub type VisitHook = Box<dyn FnMut(CellVisit) -> Option<(i32, i32)>>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Defaults for every new wave.
    pub wave: WaveParams,
    /// Upper bound on concurrently running waves (0 = unbounded).
    pub max_waves: usize,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            wave: WaveParams::default(),
            max_waves: 64,
        }
    }
}

struct ActiveWave {
    wave: Wave,
    hook: Option<VisitHook>,
}

/// Owns every running wave and advances them once per frame.
pub struct EffectsManager {
    config: EffectsConfig,
    waves: Vec<ActiveWave>,
}

impl EffectsManager {
    pub fn new(config: EffectsConfig) -> Self {
        Self {
            config,
            waves: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    /// Origins and start times of the running waves, oldest first.
    pub fn active(&self) -> impl Iterator<Item = (i32, i32, f64)> + '_ {
        self.waves.iter().map(|active| {
            let (x, y) = active.wave.origin();
            (x, y, active.wave.start_time())
        })
    }

    /// Start a wave at `(x, y)` using the configured defaults.
    pub fn start_default(&mut self, x: i32, y: i32, start_time: f64) {
        self.start(x, y, start_time, WaveOverrides::default(), None);
    }

    pub fn start(
        &mut self,
        x: i32,
        y: i32,
        start_time: f64,
        overrides: WaveOverrides,
        hook: Option<VisitHook>,
    ) {
        let params = overrides.apply(self.config.wave);
        tracing::debug!(x, y, start_time, "wave started");
        self.waves.push(ActiveWave {
            wave: Wave::new(x, y, start_time, params),
            hook,
        });
        self.enforce_limit();
    }

    /// Drop every wave.
    pub fn clear(&mut self) {
        self.waves.clear();
    }

    /// Step every wave to `now`, dropping the finished ones and starting any
    /// waves chained from first-visit hooks.
    pub fn update<R: Rng + ?Sized>(&mut self, grid: &mut Grid, now: f64, rng: &mut R) {
        let mut chained = Vec::new();
        self.waves.retain_mut(|active| {
            let ActiveWave { wave, hook } = active;
            let outcome = wave.step(
                grid,
                now,
                || random_bright(rng),
                |visit| {
                    if let Some(origin) = hook.as_mut().and_then(|hook| hook(visit)) {
                        chained.push(origin);
                    }
                },
            );
            if outcome.done {
                let (x, y) = wave.origin();
                tracing::debug!(x, y, now, "wave finished");
            }
            !outcome.done
        });

        for (x, y) in chained {
            self.start_default(x, y, now);
        }
    }

    fn enforce_limit(&mut self) {
        let max = self.config.max_waves;
        if max == 0 || self.waves.len() <= max {
            return;
        }
        let excess = self.waves.len() - max;
        tracing::warn!(excess, max, "too many waves, dropping the oldest");
        self.waves.drain(..excess);
    }
}

impl std::fmt::Debug for EffectsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectsManager")
            .field("config", &self.config)
            .field("waves", &self.waves.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorPair;
    use rand::{rngs::StdRng, SeedableRng};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn config() -> EffectsConfig {
        EffectsConfig {
            wave: WaveParams {
                max_distance: 4,
                speed: 10.0,
                fade_time: 0.6,
                ..WaveParams::default()
            },
            max_waves: 3,
        }
    }

    fn grid() -> Grid {
        let mut grid = Grid::new(10, 3).expect("valid geometry");
        grid.fill('#', ColorPair::TRANSPARENT);
        grid
    }

    #[test]
    fn finished_waves_are_removed() {
        let mut effects = EffectsManager::new(config());
        let mut rng = StdRng::seed_from_u64(1);
        effects.start_default(1, 1, 0.0);
        effects.start_default(5, 1, 0.5);
        effects.update(&mut grid(), 0.3, &mut rng);
        assert_eq!(effects.len(), 2);
        // first wave lives until 0.4 + 0.6 = 1.0s
        effects.update(&mut grid(), 1.05, &mut rng);
        assert_eq!(effects.len(), 1);
        effects.update(&mut grid(), 2.0, &mut rng);
        assert!(effects.is_empty());
    }

    #[test]
    fn limit_evicts_oldest() {
        let mut effects = EffectsManager::new(config());
        for x in 0..5 {
            effects.start_default(x, 0, f64::from(x));
        }
        let origins: Vec<i32> = effects.active().map(|(x, _, _)| x).collect();
        assert_eq!(origins, vec![2, 3, 4]);
    }

    #[test]
    fn hooks_chain_new_waves() {
        let mut effects = EffectsManager::new(config());
        let mut rng = StdRng::seed_from_u64(1);
        let fired = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&fired);
        effects.start(
            0,
            0,
            0.0,
            WaveOverrides::default(),
            Some(Box::new(move |visit: CellVisit| {
                seen.borrow_mut().push((visit.x, visit.y));
                (visit.x == 2 && visit.y == 0).then_some((9, 2))
            })),
        );
        effects.update(&mut grid(), 0.25, &mut rng);
        assert!(fired.borrow().contains(&(2, 0)));
        assert_eq!(effects.len(), 2);
        let chained = effects.active().nth(1).expect("chained wave");
        assert_eq!(chained, (9, 2, 0.25));
    }

    #[test]
    fn overrides_apply_per_wave() {
        let mut effects = EffectsManager::new(config());
        let mut rng = StdRng::seed_from_u64(1);
        effects.start(
            0,
            0,
            0.0,
            WaveOverrides {
                max_distance: Some(50),
                ..WaveOverrides::default()
            },
            None,
        );
        effects.update(&mut grid(), 1.5, &mut rng);
        assert_eq!(effects.len(), 1);
    }
}
