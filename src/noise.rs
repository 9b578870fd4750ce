use crate::color::ColorPair;
use crate::grid::Grid;
use rand::seq::SliceRandom;
use rand::Rng;

/// Random glyph field drawn behind everything else.
///
/// Glyphs are the distinct non-whitespace characters of the banner art, written
/// in transparent colours so they only show up when a wave lights them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseSource {
    glyphs: Vec<char>,
}

impl NoiseSource {
    pub fn from_art(art: &str) -> Self {
        let mut glyphs = Vec::new();
        for ch in art.chars().filter(|c| !c.is_whitespace()) {
            if !glyphs.contains(&ch) {
                glyphs.push(ch);
            }
        }
        Self { glyphs }
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.glyphs.choose(rng).copied().unwrap_or(' ')
    }

    pub fn fill<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) {
        grid.fill_with(|| self.sample(rng), ColorPair::TRANSPARENT);
    }
}
