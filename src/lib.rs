//! Character-grid splash animation: a banner that materialises through a
//! shuffled reveal, a self-drawing "scroll down" sign, and colour waves that
//! ripple across the glyphs.
//!
//! Everything renders into one [`grid::Grid`] per frame. [`frame::FrameDriver`]
//! runs the layers in order and [`render::GridView`] puts the result on a
//! terminal.

pub mod color;
pub mod config;
pub mod effects;
pub mod flicker;
pub mod frame;
pub mod grid;
pub mod keys;
pub mod mask;
pub mod name;
pub mod noise;
pub mod render;
pub mod scroll_sign;
pub mod wave;
