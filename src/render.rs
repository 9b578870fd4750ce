use crate::color::{palette_color, TRANSPARENT};
use crate::grid::Grid;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

// ============================================================================
// UI RENDERING
// ============================================================================

/// Blits a [`Grid`] into a ratatui frame, one terminal cell per grid cell.
///
/// Cells with a transparent foreground render as blanks, which hides the noise
/// field until a wave colours it. Anything outside `area` is clipped.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    grid: &'a Grid,
}

impl<'a> GridView<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }
}

impl Widget for GridView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        for cell in self.grid.cells() {
            let (Ok(x), Ok(y)) = (u16::try_from(cell.x), u16::try_from(cell.y)) else {
                continue;
            };
            if x >= area.width || y >= area.height {
                continue;
            }
            let Some(target) = buf.cell_mut((area.x + x, area.y + y)) else {
                continue;
            };
            let ch = if cell.foreground == TRANSPARENT { ' ' } else { cell.ch };
            target
                .set_char(ch)
                .set_fg(palette_color(cell.foreground))
                .set_bg(palette_color(cell.background));
        }
    }
}

/// Render a grid as newline-separated rows.
///
/// With `include_hidden` false, cells whose foreground is transparent come out
/// as spaces, matching what the terminal shows.
pub fn to_plain_text(grid: &Grid, include_hidden: bool) -> String {
    let mut out = String::with_capacity(grid.len() + grid.height());
    for cell in grid.cells() {
        if cell.x == 0 && cell.y > 0 {
            out.push('\n');
        }
        if include_hidden || cell.foreground != TRANSPARENT {
            out.push(cell.ch);
        } else {
            out.push(' ');
        }
    }
    out
}
