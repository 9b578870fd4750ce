use crate::color::{random_bright, ColorPair};
use crate::grid::Grid;
use crate::mask::ShuffleOrder;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameAnimConfig {
    /// Seconds before the first character appears.
    pub reveal_offset_secs: f64,
    /// Characters revealed per second.
    pub reveal_speed: f64,
    /// Reveal steps a character flashes before it takes the previous frame's colour.
    pub lag_1: i64,
    /// Reveal steps before a character settles on the steady colour.
    pub lag_2: i64,
    /// Vertical placement, 0.0 = top, 1.0 = bottom.
    pub start_row_factor: f64,
}

impl Default for NameAnimConfig {
    fn default() -> Self {
        Self {
            reveal_offset_secs: 0.3,
            reveal_speed: 500.0,
            lag_1: 150,
            lag_2: 250,
            start_row_factor: 3.0 / 8.0,
        }
    }
}

// ============================================================================
// ART BLOCK
// ============================================================================

/// The banner art with a one-cell blank frame around it.
///
/// Every line is padded with a leading and trailing space (and right-padded to
/// the widest line), and a blank row is added above and below, so edge glyphs
/// always have neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameArt {
    width: usize,
    height: usize,
    merged: Vec<char>,
}

impl NameArt {
    pub fn new(art: &str) -> Self {
        let lines: Vec<Vec<char>> = art.lines().map(|line| line.chars().collect()).collect();
        let content_width = lines.iter().map(Vec::len).max().unwrap_or(0);
        let width = content_width + 2;
        let height = lines.len() + 2;

        let mut merged = Vec::with_capacity(width * height);
        merged.extend(std::iter::repeat(' ').take(width));
        for line in &lines {
            merged.push(' ');
            merged.extend_from_slice(line);
            merged.extend(std::iter::repeat(' ').take(width - 1 - line.len()));
        }
        merged.extend(std::iter::repeat(' ').take(width));

        Self {
            width,
            height,
            merged,
        }
    }

    /// Padded line length.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Line count including the two padding rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Rows of real art, without the padding rows.
    pub fn art_rows(&self) -> usize {
        self.height - 2
    }

    pub fn merged(&self) -> &[char] {
        &self.merged
    }

    pub fn len(&self) -> usize {
        self.merged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// A space with no visible neighbour inside the real art rows. Drawing these
    /// would paint a halo of blank cells around the banner.
    pub fn is_isolated_space(&self, index: usize) -> bool {
        if self.merged.get(index) != Some(&' ') {
            return false;
        }
        let (col, row) = ((index % self.width) as i64, (index / self.width) as i64);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (c, r) = (col + dx, row + dy);
                if c < 0 || c >= self.width as i64 || r < 1 || r > self.art_rows() as i64 {
                    continue;
                }
                if self.merged[(c + r * self.width as i64) as usize] != ' ' {
                    return false;
                }
            }
        }
        true
    }
}

// ============================================================================
// ANIMATOR
// ============================================================================

/// Reveal counts for the three layers at one instant, each within `[0, len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealCounts {
    pub base: usize,
    pub lagged: usize,
    pub very_lagged: usize,
}

#[derive(Debug, Clone)]
pub struct NameAnimator {
    art: NameArt,
    order: ShuffleOrder,
    drawable: Vec<bool>,
    config: NameAnimConfig,
    settled_color: ColorPair,
}

impl NameAnimator {
    pub fn new(art: &str, config: NameAnimConfig, seed: u64, settled_color: ColorPair) -> Self {
        let art = NameArt::new(art);
        let order = ShuffleOrder::new(art.len(), seed);
        let drawable = (0..art.len()).map(|i| !art.is_isolated_space(i)).collect();
        Self {
            art,
            order,
            drawable,
            config,
            settled_color,
        }
    }

    pub fn art(&self) -> &NameArt {
        &self.art
    }

    pub fn settled_color(&self) -> ColorPair {
        self.settled_color
    }

    pub fn reveal_counts(&self, t: f64) -> RevealCounts {
        let len = self.art.len() as i64;
        let raw = ((t - self.config.reveal_offset_secs) * self.config.reveal_speed).floor();
        // Saturating float-to-int keeps absurd times from wrapping around.
        let base = raw as i64;
        let clamp = |count: i64| count.clamp(0, len) as usize;
        RevealCounts {
            base: clamp(base),
            lagged: clamp(base.saturating_sub(self.config.lag_1)),
            very_lagged: clamp(base.saturating_sub(self.config.lag_2)),
        }
    }

    /// Screen position of the padded block's top-left cell.
    pub fn placement(&self, grid_width: usize, grid_height: usize) -> (i32, i32) {
        let spare_rows = grid_height as f64 - self.art.art_rows() as f64;
        let row = (spare_rows * self.config.start_row_factor).floor() as i32;
        let col = (grid_width as i64 - self.art.width() as i64).div_euclid(2) as i32;
        (col, row)
    }

    /// Screen position of the first real art character.
    pub fn content_origin(&self, grid_width: usize, grid_height: usize) -> (i32, i32) {
        let (col, row) = self.placement(grid_width, grid_height);
        (col + 1, row + 1)
    }

    /// Draw the revealed part of the banner for time `t` (seconds since start).
    ///
    /// Freshly revealed glyphs flash a random bright colour, glyphs past the first
    /// lag keep whatever colour the previous frame showed at their cell, and
    /// glyphs past the second lag settle on the steady colour.
    pub fn update<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        t: f64,
        previous_background: &[u8],
        previous_foreground: &[u8],
        rng: &mut R,
    ) {
        let counts = self.reveal_counts(t);
        if counts.base == 0 {
            return;
        }
        let (start_col, start_row) = self.placement(grid.width(), grid.height());
        let width = self.art.width();

        for (i, &ch) in self.art.merged().iter().enumerate() {
            if !self.order.is_revealed(i, counts.base) || !self.drawable[i] {
                continue;
            }
            let x = start_col + (i % width) as i32;
            let y = start_row + (i / width) as i32;

            let color = if self.order.is_revealed(i, counts.very_lagged) {
                self.settled_color
            } else if self.order.is_revealed(i, counts.lagged) {
                grid.index_of(x, y)
                    .and_then(|at| {
                        Some(ColorPair::new(
                            *previous_background.get(at)?,
                            *previous_foreground.get(at)?,
                        ))
                    })
                    .unwrap_or(self.settled_color)
            } else {
                random_bright(rng)
            };
            grid.put(x, y, ch, color);
        }
    }
}
