//! The boxed "scroll down" prompt that draws itself one cell at a time.
//!
//! Every drawing step lives in one ordered sequence: first the cells of the box
//! are cleared, then the border is traced clockwise from the top-left corner,
//! then the text slots follow. A single step counter walks that sequence. Once
//! the border is complete the counter has to run on for a pause before the text
//! types itself in, with the most recent characters flashing.

use crate::color::{random_bright, ColorPair};
use crate::flicker::FlickerHold;
use crate::grid::{BorderGlyphs, Grid};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollSignConfig {
    pub text: String,
    /// Row of the text line as a fraction of the grid height.
    pub start_row_factor: f64,
    /// Extra box width around the text (split evenly left and right).
    pub box_width_padding: usize,
    pub box_height: usize,
    pub color: ColorPair,
    pub start_delay_secs: f64,
    pub total_delay_secs: f64,
    /// Sequence steps per second.
    pub reveal_speed: f64,
    pub border: BorderGlyphs,
    /// Trailing window of freshly typed characters that flash.
    pub flash_threshold: usize,
    /// The pause before the text lasts `floor(text_len * pause_factor) + pause_flat` steps.
    pub pause_factor: f64,
    pub pause_flat: usize,
    pub flash_hold_ms: u64,
}

impl Default for ScrollSignConfig {
    fn default() -> Self {
        Self {
            text: "Scroll down to learn more".to_string(),
            start_row_factor: 5.0 / 6.0,
            box_width_padding: 4,
            box_height: 3,
            color: ColorPair::WHITE,
            start_delay_secs: 3.1,
            total_delay_secs: 6.25,
            reveal_speed: 70.0,
            border: BorderGlyphs::default(),
            flash_threshold: 15,
            pause_factor: 2.0,
            pause_flat: 4,
            flash_hold_ms: 40,
        }
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignStep {
    pub x: i32,
    pub y: i32,
    pub ch: char,
}

/// Draw order of the sign for one grid size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollSignLayout {
    grid_size: (usize, usize),
    steps: Vec<SignStep>,
    clear_end: usize,
    border_end: usize,
}

impl ScrollSignLayout {
    pub fn compute(grid_width: usize, grid_height: usize, config: &ScrollSignConfig) -> Self {
        let text: Vec<char> = config.text.chars().collect();
        let text_row = (grid_height as f64 * config.start_row_factor).floor() as i32;
        let text_col = (grid_width as i64 - text.len() as i64).div_euclid(2) as i32;

        let box_x = text_col - (config.box_width_padding / 2) as i32;
        let box_y = text_row - 1;
        let box_w = (text.len() + config.box_width_padding) as i32;
        let box_h = config.box_height as i32;
        let glyphs = &config.border;

        let mut steps = Vec::new();
        let mut push = |x: i32, y: i32, ch: char| steps.push(SignStep { x, y, ch });

        for row in 0..box_h {
            for col in 0..box_w {
                push(box_x + col, box_y + row, ' ');
            }
        }
        let clear_end = (box_w * box_h).max(0) as usize;

        let horizontal = |i: i32, left: char, fill: char, right: char| {
            if i == 0 {
                left
            } else if i == box_w - 1 {
                right
            } else {
                fill
            }
        };
        for i in 0..box_w {
            push(box_x + i, box_y, horizontal(i, glyphs.top_left, glyphs.top, glyphs.top_right));
        }
        for i in 1..box_h - 1 {
            push(box_x + box_w - 1, box_y + i, glyphs.right);
        }
        for i in (0..box_w).rev() {
            push(
                box_x + i,
                box_y + box_h - 1,
                horizontal(i, glyphs.bottom_left, glyphs.bottom, glyphs.bottom_right),
            );
        }
        for i in (1..box_h - 1).rev() {
            push(box_x, box_y + i, glyphs.left);
        }

        for (i, &ch) in text.iter().enumerate() {
            push(text_col + i as i32, text_row, ch);
        }
        let border_end = steps.len() - text.len();

        Self {
            grid_size: (grid_width, grid_height),
            steps,
            clear_end,
            border_end,
        }
    }

    pub fn grid_size(&self) -> (usize, usize) {
        self.grid_size
    }

    pub fn steps(&self) -> &[SignStep] {
        &self.steps
    }

    /// End of the box-clearing stage.
    pub fn clear_end(&self) -> usize {
        self.clear_end
    }

    /// End of the border stage; text slots follow.
    pub fn border_end(&self) -> usize {
        self.border_end
    }

    pub fn text_len(&self) -> usize {
        self.steps.len() - self.border_end
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

// ============================================================================
// ANIMATOR
// ============================================================================

#[derive(Debug, Clone)]
pub struct ScrollSign {
    config: ScrollSignConfig,
    layout: ScrollSignLayout,
    flicker: FlickerHold<usize>,
}

impl ScrollSign {
    pub fn new(config: ScrollSignConfig, grid_width: usize, grid_height: usize) -> Self {
        let layout = ScrollSignLayout::compute(grid_width, grid_height, &config);
        Self {
            flicker: FlickerHold::new(config.flash_hold_ms),
            config,
            layout,
        }
    }

    pub fn layout(&self) -> &ScrollSignLayout {
        &self.layout
    }

    /// Rebuild the draw order for new grid dimensions and forget all flashes.
    pub fn resize(&mut self, grid_width: usize, grid_height: usize) {
        self.layout = ScrollSignLayout::compute(grid_width, grid_height, &self.config);
        self.flicker.clear();
        tracing::debug!(grid_width, grid_height, steps = self.layout.len(), "scroll sign relaid out");
    }

    /// Forget every held flash colour, e.g. when the clock is rewound.
    pub fn reset(&mut self) {
        self.flicker.clear();
    }

    /// Steps of the sequence unlocked at time `t`. Not capped at the sequence
    /// length: text keeps typing for as long as the count grows.
    pub fn reveal_steps(&self, t: f64) -> usize {
        let effective = t - self.config.start_delay_secs - self.config.total_delay_secs;
        let steps = (effective * self.config.reveal_speed).floor();
        if steps > 0.0 {
            steps as usize
        } else {
            0
        }
    }

    /// Steps the box stands empty between the border and the first character.
    pub fn pause_steps(&self) -> usize {
        ((self.layout.text_len() as f64 * self.config.pause_factor).floor() as usize)
            .saturating_add(self.config.pause_flat)
    }

    pub fn update<R: Rng + ?Sized>(&mut self, grid: &mut Grid, t: f64, rng: &mut R) {
        if self.layout.grid_size() != (grid.width(), grid.height()) {
            self.resize(grid.width(), grid.height());
        }
        let steps = self.reveal_steps(t);
        self.draw(grid, steps, t, rng);
    }

    /// Draw the sign as it looks after `reveal_steps` steps.
    pub fn draw<R: Rng + ?Sized>(&mut self, grid: &mut Grid, reveal_steps: usize, now: f64, rng: &mut R) {
        let border_end = self.layout.border_end();
        let text_start = border_end.saturating_add(self.pause_steps());
        let visible = reveal_steps.min(self.layout.len());

        for i in 0..visible {
            let step = self.layout.steps()[i];
            let mut ch = step.ch;
            let mut color = self.config.color;

            if i >= border_end {
                let char_index = i - border_end;
                let typed = reveal_steps.saturating_sub(text_start);
                if reveal_steps < text_start {
                    ch = ' ';
                } else if char_index < typed {
                    if typed < char_index.saturating_add(self.config.flash_threshold) {
                        color = self.flicker.color_for(char_index, now, || random_bright(rng));
                    }
                } else {
                    self.flicker.forget(&char_index);
                    ch = ' ';
                }
            }

            grid.put(step.x, step.y, ch, color);
        }
    }
}
