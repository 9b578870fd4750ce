use crate::color::ColorPair;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("invalid grid geometry {width}x{height}: both dimensions must be non-zero")]
    InvalidGeometry { width: usize, height: usize },
}

// ============================================================================
// BORDER GLYPHS
// ============================================================================

/// Glyphs for the eight parts of a box outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderGlyphs {
    pub top_left: char,
    pub top: char,
    pub top_right: char,
    pub left: char,
    pub right: char,
    pub bottom_left: char,
    pub bottom: char,
    pub bottom_right: char,
}

impl Default for BorderGlyphs {
    fn default() -> Self {
        Self {
            top_left: '╔',
            top: '═',
            top_right: '╗',
            left: '║',
            right: '║',
            bottom_left: '╚',
            bottom: '═',
            bottom_right: '╝',
        }
    }
}

// ============================================================================
// GRID
// ============================================================================

/// One cell as seen by a rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub ch: char,
    pub background: u8,
    pub foreground: u8,
}

/// Whether a glyph counts as empty space for reveal and wave purposes.
pub fn is_blank(ch: char) -> bool {
    ch == '\0' || ch.is_whitespace()
}

/// Fixed-size character buffer with parallel background/foreground colour buffers.
///
/// Cell `i` lives at `(i % width, i / width)`. All writes clip silently: text
/// running off the edge is expected while animating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    chars: Vec<char>,
    background: Vec<u8>,
    foreground: Vec<u8>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidGeometry { width, height });
        }
        let len = width * height;
        Ok(Self {
            width,
            height,
            chars: vec![' '; len],
            background: vec![0; len],
            foreground: vec![0; len],
        })
    }

    /// Reallocate for new dimensions. Contents are blanked.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), GridError> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Buffer index for signed coordinates, `None` when off-grid.
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then(|| x + y * self.width)
    }

    pub fn char_at(&self, x: i32, y: i32) -> Option<char> {
        self.index_of(x, y).map(|i| self.chars[i])
    }

    pub fn colors_at(&self, x: i32, y: i32) -> Option<ColorPair> {
        self.index_of(x, y)
            .map(|i| ColorPair::new(self.background[i], self.foreground[i]))
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn backgrounds(&self) -> &[u8] {
        &self.background
    }

    pub fn foregrounds(&self) -> &[u8] {
        &self.foreground
    }

    /// Overwrite only the colours of one cell, leaving its glyph alone.
    pub fn set_colors(&mut self, index: usize, color: ColorPair) {
        if index < self.len() {
            self.background[index] = color.background;
            self.foreground[index] = color.foreground;
        }
    }

    /// Refill every cell with one glyph and colour pair.
    pub fn fill(&mut self, ch: char, color: ColorPair) {
        self.chars.fill(ch);
        self.background.fill(color.background);
        self.foreground.fill(color.foreground);
    }

    /// Refill every cell, asking `glyph` for each character.
    pub fn fill_with(&mut self, mut glyph: impl FnMut() -> char, color: ColorPair) {
        for ch in &mut self.chars {
            *ch = glyph();
        }
        self.background.fill(color.background);
        self.foreground.fill(color.foreground);
    }

    /// Write `text` left to right from `(x, y)`. Columns off-grid are skipped;
    /// a row off-grid makes the whole call a no-op.
    pub fn print(&mut self, x: i32, y: i32, text: &str, color: ColorPair) {
        if y < 0 || y as usize >= self.height {
            return;
        }
        let row_start = y as usize * self.width;
        for (offset, ch) in text.chars().enumerate() {
            let column = i64::from(x) + offset as i64;
            if column < 0 {
                continue;
            }
            if column as usize >= self.width {
                break;
            }
            let i = row_start + column as usize;
            self.chars[i] = ch;
            self.background[i] = color.background;
            self.foreground[i] = color.foreground;
        }
    }

    /// Write a single glyph, clipping like [`Grid::print`].
    pub fn put(&mut self, x: i32, y: i32, ch: char, color: ColorPair) {
        if let Some(i) = self.index_of(x, y) {
            self.chars[i] = ch;
            self.background[i] = color.background;
            self.foreground[i] = color.foreground;
        }
    }

    /// Draw a box outline. The interior is left untouched.
    ///
    /// Degenerate sizes: nothing is drawn for `w <= 0` or `h <= 0`; `w == 1`
    /// draws only the left-hand glyph of each line; `h == 1` draws only the top
    /// line and `h == 2` the top and bottom lines.
    pub fn print_box(&mut self, x: i32, y: i32, w: i32, h: i32, glyphs: &BorderGlyphs, color: ColorPair) {
        if w <= 0 || h <= 0 {
            return;
        }
        // Edges are worked out in i64 so boxes reaching past i32::MAX still clip.
        let (left, top) = (i64::from(x), i64::from(y));
        let right = left + i64::from(w) - 1;
        let bottom = top + i64::from(h) - 1;

        self.horizontal_line(left, right, top, [glyphs.top_left, glyphs.top, glyphs.top_right], color);
        for row in (top + 1).max(0)..bottom.min(self.height as i64) {
            self.put_wide(left, row, glyphs.left, color);
            if w > 1 {
                self.put_wide(right, row, glyphs.right, color);
            }
        }
        if h > 1 {
            self.horizontal_line(
                left,
                right,
                bottom,
                [glyphs.bottom_left, glyphs.bottom, glyphs.bottom_right],
                color,
            );
        }
    }

    /// One box edge from `left` to `right` inclusive, visiting only on-grid columns.
    fn horizontal_line(&mut self, left: i64, right: i64, y: i64, [start, fill, end]: [char; 3], color: ColorPair) {
        for column in left.max(0)..=right.min(self.width as i64 - 1) {
            let ch = if column == left {
                start
            } else if column == right {
                end
            } else {
                fill
            };
            self.put_wide(column, y, ch, color);
        }
    }

    fn put_wide(&mut self, x: i64, y: i64, ch: char, color: ColorPair) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.put(x, y, ch, color);
        }
    }

    /// Replace every in-bounds cell of the rectangle with `f(char, background, foreground)`.
    /// Rows and columns off the grid are skipped, never clamped.
    pub fn process_box<F>(&mut self, x: i32, y: i32, w: i32, h: i32, mut f: F)
    where
        F: FnMut(char, u8, u8) -> (char, u8, u8),
    {
        for row in y..y.saturating_add(h.max(0)) {
            for column in x..x.saturating_add(w.max(0)) {
                let Some(i) = self.index_of(column, row) else {
                    continue;
                };
                let (ch, background, foreground) =
                    f(self.chars[i], self.background[i], self.foreground[i]);
                self.chars[i] = ch;
                self.background[i] = background;
                self.foreground[i] = foreground;
            }
        }
    }

    /// Read-only iteration in buffer order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.len()).map(move |i| Cell {
            x: i % self.width,
            y: i / self.width,
            ch: self.chars[i],
            background: self.background[i],
            foreground: self.foreground[i],
        })
    }

    /// The glyphs of one row as a string.
    pub fn row_text(&self, y: usize) -> String {
        if y >= self.height {
            return String::new();
        }
        self.chars[y * self.width..(y + 1) * self.width].iter().collect()
    }
}
