#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, diffs, and frames.
//!
//! # Role in duocount
//! `duocount-render` is the deterministic drawing surface. A model's `view()`
//! writes into a [`frame::Frame`]; the frame's [`buffer::Buffer`] is diffed
//! against the previous one and handed to a presenter, while its hit grid is
//! kept so pointer presses can be resolved to controls.

pub mod buffer;
pub mod cell;
pub mod diff;
pub mod frame;

pub use buffer::Buffer;
pub use cell::{Cell, CellFlags};
pub use diff::BufferDiff;
pub use frame::{Frame, HitData, HitGrid, HitId, HitRegion};
