#![forbid(unsafe_code)]

//! Elm-style model/update/view contract.
//!
//! The model separates state (`update`) from rendering (`view`) and
//! describes side effects as [`Cmd`] values the host executes. Deferred work,
//! such as a content fetch that resolves after a delay, is a [`Task`]: the
//! host parks it in a [`TaskQueue`](crate::TaskQueue) and feeds the resulting
//! message back into `update` once the deadline passes.
//!
//! # Example
//!
//! ```
//! use duocount_core::event::Event;
//! use duocount_render::frame::Frame;
//! use duocount_runtime::program::{Cmd, Model, Task};
//! use web_time::Duration;
//!
//! struct Greeter {
//!     greeting: Option<&'static str>,
//! }
//!
//! enum Msg {
//!     Loaded(&'static str),
//!     Ignored,
//! }
//!
//! impl From<Event> for Msg {
//!     fn from(_: Event) -> Self {
//!         Msg::Ignored
//!     }
//! }
//!
//! impl Model for Greeter {
//!     type Message = Msg;
//!
//!     fn init(&mut self) -> Cmd<Msg> {
//!         Cmd::task(Task::new("greeting", Duration::from_millis(50), || Msg::Loaded("hi")))
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         if let Msg::Loaded(text) = msg {
//!             self.greeting = Some(text);
//!         }
//!         Cmd::none()
//!     }
//!
//!     fn view(&self, _frame: &mut Frame) {}
//! }
//! ```

use std::fmt;

use duocount_core::event::Event;
use duocount_render::frame::Frame;
use web_time::Duration;

use crate::cancellation::CancellationToken;

/// Application state and behavior.
pub trait Model: Sized {
    /// Messages that drive state transitions.
    ///
    /// Must be convertible from input events.
    type Message: From<Event> + Send + 'static;

    /// Called once when the program starts. Return commands for initial side
    /// effects such as loading data.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// The state transition function.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state to a frame.
    fn view(&self, frame: &mut Frame);
}

/// A deferred computation that resolves to a message after `delay`.
pub struct Task<M> {
    label: &'static str,
    delay: Duration,
    token: Option<CancellationToken>,
    run: Box<dyn FnOnce() -> M + Send>,
}

impl<M> Task<M> {
    /// `label` names the task in logs and effect counters.
    pub fn new<F>(label: &'static str, delay: Duration, run: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self {
            label,
            delay,
            token: None,
            run: Box::new(run),
        }
    }

    /// Skip the task if `token` is cancelled by the time it comes due.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Consume the task and produce its message.
    pub fn run(self) -> M {
        (self.run)()
    }
}

impl<M> fmt::Debug for Task<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("label", &self.label)
            .field("delay", &self.delay)
            .field("cancellable", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

/// Side effects for the host to execute.
///
/// Returned from `init()` and `update()`.
#[derive(Debug)]
pub enum Cmd<M> {
    /// No operation.
    None,
    /// Stop the program.
    Quit,
    /// Execute several commands; order is not significant.
    Batch(Vec<Cmd<M>>),
    /// Execute commands in order.
    Sequence(Vec<Cmd<M>>),
    /// Feed a message straight back into `update`.
    Msg(M),
    /// Append a line to the host's log output.
    Log(String),
    /// Schedule deferred work.
    Task(Task<M>),
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    #[inline]
    pub fn task(task: Task<M>) -> Self {
        Self::Task(task)
    }

    /// Collapse empty and single-element batches.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    /// Collapse empty and single-element sequences.
    pub fn sequence(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Sequence(cmds),
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short name used in effect logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Quit => "quit",
            Self::Batch(_) => "batch",
            Self::Sequence(_) => "sequence",
            Self::Msg(_) => "msg",
            Self::Log(_) => "log",
            Self::Task(_) => "task",
        }
    }
}

impl<M> Default for Cmd<M> {
    fn default() -> Self {
        Self::None
    }
}
