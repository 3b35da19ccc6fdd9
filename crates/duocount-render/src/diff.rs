#![forbid(unsafe_code)]

//! Cell-level change detection between two buffers.

use crate::buffer::Buffer;

/// Positions that differ between two buffers, in row-major order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferDiff {
    changes: Vec<(u16, u16)>,
}

impl BufferDiff {
    /// Compare `old` against `new`.
    ///
    /// When dimensions differ every cell of `new` is reported, since the old
    /// positions no longer line up.
    pub fn compute(old: &Buffer, new: &Buffer) -> Self {
        if old.width() != new.width() || old.height() != new.height() {
            return Self::full(new);
        }
        let mut changes = Vec::new();
        for y in 0..new.height() {
            for x in 0..new.width() {
                if old.get(x, y) != new.get(x, y) {
                    changes.push((x, y));
                }
            }
        }
        Self { changes }
    }

    /// Every cell of `buf`.
    pub fn full(buf: &Buffer) -> Self {
        let mut changes = Vec::with_capacity(usize::from(buf.width()) * usize::from(buf.height()));
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                changes.push((x, y));
            }
        }
        Self { changes }
    }

    #[inline]
    pub fn changes(&self) -> &[(u16, u16)] {
        &self.changes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Cell, CellFlags};

    #[test]
    fn identical_buffers_have_no_changes() {
        let a = Buffer::new(4, 2);
        assert!(BufferDiff::compute(&a, &a.clone()).is_empty());
    }

    #[test]
    fn reports_changed_cells_row_major() {
        let old = Buffer::new(4, 2);
        let mut new = old.clone();
        new.set(3, 0, Cell::from_char('x'));
        new.set(0, 1, Cell::from_char('y'));
        let diff = BufferDiff::compute(&old, &new);
        assert_eq!(diff.changes(), &[(3, 0), (0, 1)]);
    }

    #[test]
    fn flag_change_counts_as_change() {
        let old = Buffer::new(2, 1);
        let mut new = old.clone();
        new.set_flags_area(new.bounds(), CellFlags::REVERSE);
        assert_eq!(BufferDiff::compute(&old, &new).len(), 2);
    }

    #[test]
    fn resize_reports_full_grid() {
        let old = Buffer::new(2, 2);
        let new = Buffer::new(3, 2);
        assert_eq!(BufferDiff::compute(&old, &new).len(), 6);
    }
}
