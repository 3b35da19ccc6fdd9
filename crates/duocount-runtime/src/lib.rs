#![forbid(unsafe_code)]

//! duocount runtime
//!
//! # Key Components
//!
//! - [`Model`] - Trait for application state and behavior
//! - [`Cmd`] - Commands for side effects
//! - [`Task`] - A deferred unit of work that resolves to a message
//! - [`TaskQueue`] - Deadline-ordered queue of pending tasks
//! - [`CancellationSource`] / [`CancellationToken`] - Cooperative cancellation
//!
//! # Role in duocount
//! `duocount-runtime` defines the contract between an application and
//! whatever drives it. It owns no clock and no event loop. A host (see
//! `duocount-web`) advances time and feeds events; it then executes the
//! returned commands and pops due tasks from the queue.

pub mod cancellation;
pub mod effect;
pub mod program;
pub mod task_queue;

pub use cancellation::{CancellationSource, CancellationToken};
pub use program::{Cmd, Model, Task};
pub use task_queue::{DueTask, TaskQueue};
