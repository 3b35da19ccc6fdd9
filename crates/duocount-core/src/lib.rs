#![forbid(unsafe_code)]

//! Core: canonical input events and geometry.
//!
//! # Role in duocount
//! `duocount-core` is the input layer. It defines the normalized event types
//! the runtime consumes and the rectangle math shared by rendering, widgets
//! and hit testing.
//!
//! # How it fits in the system
//! The runtime (`duocount-runtime`) feeds `Event` values into application
//! models. The render kernel (`duocount-render`) only depends on the geometry
//! half of this crate, so input handling and drawing stay independent.

pub mod event;
pub mod geometry;

pub use event::{
    Activation, Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
pub use geometry::{Rect, Sides};
