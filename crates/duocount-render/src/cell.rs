#![forbid(unsafe_code)]

//! A single grid cell.

use bitflags::bitflags;

bitflags! {
    /// Text attributes carried per cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        const BOLD      = 0b0001;
        const UNDERLINE = 0b0010;
        const REVERSE   = 0b0100;
        const DIM       = 0b1000;
    }
}

/// One cell of the render grid.
///
/// `ch == None` marks either an empty cell or the trailing half of a wide
/// character; the `continuation` flag tells the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    ch: Option<char>,
    continuation: bool,
    pub flags: CellFlags,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        ch: None,
        continuation: false,
        flags: CellFlags::empty(),
    };

    #[inline]
    pub const fn from_char(ch: char) -> Self {
        Self {
            ch: Some(ch),
            continuation: false,
            flags: CellFlags::empty(),
        }
    }

    /// Placeholder occupying the second column of a wide glyph.
    #[inline]
    pub const fn continuation() -> Self {
        Self {
            ch: None,
            continuation: true,
            flags: CellFlags::empty(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_flags(mut self, flags: CellFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub const fn as_char(&self) -> Option<char> {
        self.ch
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.ch.is_none() && !self.continuation
    }

    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.continuation
    }
}
