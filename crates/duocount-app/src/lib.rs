#![forbid(unsafe_code)]

//! duocount: a bilingual counter.
//!
//! The app shows a title, a link that toggles between English and
//! Portuguese, and a counter moved by ±1 and ±5 buttons. Display strings
//! come from a [`ContentProvider`] after a simulated network delay; while a
//! fetch is outstanding the screen shows `Loading...`.
//!
//! # Key Components
//!
//! - [`CounterApp`] - the [`Model`](duocount_runtime::Model) that owns [`AppState`]
//! - [`CounterUpdate`] - parsed counter requests
//! - [`MockContentProvider`] - static two-language table with a delay
//! - [`AppConfig`] - TOML/JSON configuration
//! - [`Session`] - scripted headless driver used by the `duocount` binary

pub mod app;
#[cfg(feature = "headless")]
pub mod cli;
pub mod config;
pub mod content;
#[cfg(feature = "headless")]
pub mod logging;
pub mod script;
pub mod session;
pub mod state;
pub mod update;
pub mod view;

pub use app::{CounterApp, FetchTag, Msg, StaleContentPolicy};
pub use config::{AppConfig, ConfigError, ViewportConfig};
pub use content::{ContentProvider, Fetch, MockContentProvider};
pub use session::{Session, SessionError, SessionSummary};
pub use state::{AppState, Phase, StatePatch, StateSnapshot};
pub use update::CounterUpdate;
