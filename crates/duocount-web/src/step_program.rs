#![forbid(unsafe_code)]

//! Host-driven executor for a [`Model`].
//!
//! `StepProgram` never blocks and never reads wall-clock time. Each call to
//! [`StepProgram::step`] does one bounded unit of work:
//!
//! 1. drain queued events, turning primary presses on a registered hit
//!    region into [`Event::Activate`];
//! 2. deliver every task whose deadline is at or before the clock;
//! 3. render if anything changed.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use duocount_core::event::Event;
//! use duocount_render::frame::Frame;
//! use duocount_runtime::{Cmd, Model, Task};
//! use duocount_web::step_program::StepProgram;
//!
//! #[derive(Default)]
//! struct Ping {
//!     pongs: u32,
//! }
//!
//! enum Msg {
//!     Pong,
//!     Input,
//! }
//!
//! impl From<Event> for Msg {
//!     fn from(_: Event) -> Self {
//!         Msg::Input
//!     }
//! }
//!
//! impl Model for Ping {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Pong => {
//!                 self.pongs += 1;
//!                 Cmd::none()
//!             }
//!             Msg::Input => Cmd::task(Task::new("pong", Duration::from_millis(10), || Msg::Pong)),
//!         }
//!     }
//!
//!     fn view(&self, _frame: &mut Frame) {}
//! }
//!
//! let mut program = StepProgram::new(Ping::default(), 10, 1);
//! program.init().unwrap();
//! program.push_event(Event::Tick);
//! program.step().unwrap();
//! assert_eq!(program.model().pongs, 0);
//!
//! program.advance_time(Duration::from_millis(10));
//! program.step().unwrap();
//! assert_eq!(program.model().pongs, 1);
//! ```

use core::fmt;
use core::time::Duration;

use duocount_core::event::{Activation, Event};
use duocount_render::buffer::Buffer;
use duocount_render::diff::BufferDiff;
use duocount_render::frame::{Frame, HitGrid};
use duocount_runtime::effect;
use duocount_runtime::{Cmd, Model, TaskQueue};

use crate::{DeterministicClock, WebEventSource, WebOutputs, WebPresenter};

/// Misuse of the step API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepError {
    /// `step` was called before `init`.
    NotInitialized,
    /// `init` was called twice.
    AlreadyInitialized,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "program stepped before init"),
            Self::AlreadyInitialized => write!(f, "program already initialized"),
        }
    }
}

impl std::error::Error for StepError {}

/// What one [`StepProgram::step`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// `false` once the model returned `Cmd::Quit`.
    pub running: bool,
    pub rendered: bool,
    pub events_processed: u32,
    /// Deferred tasks delivered during this step.
    pub tasks_run: u32,
    /// Frames rendered so far, including this step's.
    pub frame_idx: u64,
}

/// Deterministic, host-driven program executor.
pub struct StepProgram<M: Model> {
    model: M,
    clock: DeterministicClock,
    events: WebEventSource,
    presenter: WebPresenter,
    tasks: TaskQueue<M::Message>,
    prev_buffer: Option<Buffer>,
    hit_grid: Option<HitGrid>,
    /// Set when the model changed since `hit_grid` was built.
    hit_stale: bool,
    size: (u16, u16),
    initialized: bool,
    running: bool,
    dirty: bool,
    frame_idx: u64,
}

impl<M: Model> StepProgram<M> {
    pub fn new(model: M, width: u16, height: u16) -> Self {
        Self {
            model,
            clock: DeterministicClock::new(),
            events: WebEventSource::new(width, height),
            presenter: WebPresenter::new(),
            tasks: TaskQueue::new(),
            prev_buffer: None,
            hit_grid: None,
            hit_stale: false,
            size: (width, height),
            initialized: false,
            running: true,
            dirty: true,
            frame_idx: 0,
        }
    }

    /// Run `Model::init`, execute its commands and render the first frame.
    pub fn init(&mut self) -> Result<(), StepError> {
        if self.initialized {
            return Err(StepError::AlreadyInitialized);
        }
        self.initialized = true;
        tracing::debug!(
            target: "duocount.web",
            width = self.size.0,
            height = self.size.1,
            "program init"
        );
        let cmd = self.model.init();
        self.execute_cmd(cmd);
        self.render();
        Ok(())
    }

    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Queue an event for the next step.
    pub fn push_event(&mut self, event: Event) {
        self.events.push_event(event);
    }

    /// Advance the deterministic clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Move the clock to `now`. Earlier times are ignored.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Request a new viewport size; applied on the next step.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.events.set_size(width, height);
        self.events.push_event(Event::Resize { width, height });
    }

    /// Process pending events and due tasks, rendering if anything changed.
    pub fn step(&mut self) -> Result<StepResult, StepError> {
        if !self.initialized {
            return Err(StepError::NotInitialized);
        }
        let mut events_processed = 0u32;
        let mut tasks_run = 0u32;

        while self.running {
            let Some(event) = self.events.read_event() else {
                break;
            };
            events_processed += 1;
            self.handle_event(event);
        }

        let now = self.clock.now();
        while self.running {
            let Some(due) = self.tasks.pop_due(now) else {
                break;
            };
            tasks_run += 1;
            let msg = due.resolve(now);
            self.dispatch(msg);
        }

        let rendered = self.running && self.dirty;
        if rendered {
            self.render();
        }

        if events_processed > 0 || tasks_run > 0 {
            tracing::trace!(
                target: "duocount.web",
                events_processed,
                tasks_run,
                rendered,
                "step"
            );
        }

        Ok(StepResult {
            running: self.running,
            rendered,
            events_processed,
            tasks_run,
            frame_idx: self.frame_idx,
        })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub const fn outputs(&self) -> &WebOutputs {
        self.presenter.outputs()
    }

    pub fn take_outputs(&mut self) -> WebOutputs {
        self.presenter.take_outputs()
    }

    pub const fn size(&self) -> (u16, u16) {
        self.size
    }

    pub const fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    /// Hit grid of the last rendered or hit-tested view.
    pub fn hit_grid(&self) -> Option<&HitGrid> {
        self.hit_grid.as_ref()
    }

    /// Tasks still waiting for their deadline.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.tasks.next_deadline()
    }

    fn handle_event(&mut self, event: Event) {
        let event = match event {
            Event::Resize { width, height } => {
                self.size = (width, height);
                self.dirty = true;
                event
            }
            Event::Mouse(mouse) if mouse.is_primary_press() => {
                let (x, y) = mouse.position();
                // An earlier event this step may have changed what is on screen.
                if self.hit_stale {
                    self.refresh_hit_grid();
                }
                match self.hit_grid.as_ref().and_then(|g| g.hit_test(x, y)) {
                    Some((id, _, data)) => {
                        tracing::debug!(target: "duocount.web", id = id.id(), x, y, "activation");
                        Event::Activate(Activation::new(id.id()).with_data(data))
                    }
                    None => event,
                }
            }
            other => other,
        };
        self.dispatch(M::Message::from(event));
    }

    fn dispatch(&mut self, msg: M::Message) {
        self.dirty = true;
        self.hit_stale = true;
        let cmd = self.model.update(msg);
        self.execute_cmd(cmd);
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        if cmd.is_none() {
            return;
        }
        effect::trace_command_effect(cmd.kind(), || match cmd {
            Cmd::None => {}
            Cmd::Quit => {
                tracing::debug!(target: "duocount.web", "quit requested");
                self.running = false;
            }
            Cmd::Batch(cmds) | Cmd::Sequence(cmds) => {
                for cmd in cmds {
                    if !self.running {
                        break;
                    }
                    self.execute_cmd(cmd);
                }
            }
            Cmd::Msg(msg) => self.dispatch(msg),
            Cmd::Log(line) => self.presenter.write_log(&line),
            Cmd::Task(task) => {
                self.tasks.schedule(self.clock.now(), task);
            }
        });
    }

    /// Rebuild the hit grid from the current view without presenting it.
    fn refresh_hit_grid(&mut self) {
        let (width, height) = self.size;
        let mut frame = Frame::with_hit_grid(width, height);
        self.model.view(&mut frame);
        self.hit_grid = frame.hit_grid;
        self.hit_stale = false;
    }

    fn render(&mut self) {
        let (width, height) = self.size;
        let mut frame = Frame::with_hit_grid(width, height);
        self.model.view(&mut frame);

        let Frame { buffer, hit_grid } = frame;
        let full_repaint = self
            .prev_buffer
            .as_ref()
            .is_none_or(|prev| prev.width() != width || prev.height() != height);
        let diff = self
            .prev_buffer
            .as_ref()
            .filter(|_| !full_repaint)
            .map(|prev| BufferDiff::compute(prev, &buffer));
        self.presenter.present_ui(&buffer, diff.as_ref(), full_repaint);

        self.prev_buffer = Some(buffer);
        self.hit_grid = hit_grid;
        self.hit_stale = false;
        self.frame_idx += 1;
        self.dirty = false;
    }
}

impl<M: Model + fmt::Debug> fmt::Debug for StepProgram<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepProgram")
            .field("model", &self.model)
            .field("now", &self.clock.now())
            .field("size", &self.size)
            .field("running", &self.running)
            .field("pending_tasks", &self.tasks.len())
            .field("frame_idx", &self.frame_idx)
            .finish_non_exhaustive()
    }
}
