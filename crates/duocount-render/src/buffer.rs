#![forbid(unsafe_code)]

//! Row-major cell grid.
//!
//! Out-of-bounds writes are silently clipped so widgets never have to
//! pre-validate their areas against the viewport.

use duocount_core::geometry::Rect;
use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, CellFlags};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Write one cell; no-op outside the grid.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(slot) = self.get_mut(x, y) {
            *slot = cell;
        }
    }

    /// Draw `text` starting at `(x, y)`, stopping before column `max_x`.
    ///
    /// Wide characters occupy two cells; one that would straddle `max_x` is
    /// dropped rather than split. Zero-width characters are skipped. Returns
    /// the column after the last drawn cell.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, flags: CellFlags, max_x: u16) -> u16 {
        let limit = max_x.min(self.width);
        let mut col = x;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            if col.saturating_add(w) > limit {
                break;
            }
            self.set(col, y, Cell::from_char(ch).with_flags(flags));
            if w == 2 {
                self.set(col + 1, y, Cell::continuation().with_flags(flags));
            }
            col += w;
        }
        col
    }

    /// Apply `flags` to every cell in `area` without touching content.
    pub fn set_flags_area(&mut self, area: Rect, flags: CellFlags) {
        let Some(area) = area.intersection(&self.bounds()) else {
            return;
        };
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if let Some(cell) = self.get_mut(x, y) {
                    cell.flags |= flags;
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Plain text of row `y` with trailing blanks trimmed.
    pub fn row_text(&self, y: u16) -> String {
        let mut line = String::with_capacity(usize::from(self.width));
        for x in 0..self.width {
            let Some(cell) = self.get(x, y) else { break };
            if cell.is_continuation() {
                continue;
            }
            line.push(cell.as_char().unwrap_or(' '));
        }
        line.truncate(line.trim_end().len());
        line
    }

    /// All rows as plain text.
    pub fn to_lines(&self) -> Vec<String> {
        (0..self.height).map(|y| self.row_text(y)).collect()
    }
}
