#![forbid(unsafe_code)]

//! Language codes and display strings for duocount.
//!
//! Provides the two supported [`Language`]s and the [`LabelBundle`] record
//! the application renders from, with one hardcoded bundle per language.
//!
//! # How it fits in the system
//! The content provider in `duocount-app` serves `LabelBundle::builtin` for
//! the requested language after a delay; widgets only ever see the resolved
//! strings. This crate does not depend on rendering or runtime.

pub mod labels;
pub mod language;

pub use labels::LabelBundle;
pub use language::{Language, LanguageParseError};
