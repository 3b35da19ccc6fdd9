#![forbid(unsafe_code)]

//! A scripted headless session: [`CounterApp`] on a [`StepProgram`].

use std::fmt;
use std::io::{self, BufRead, Write};

use duocount_web::step_program::{StepError, StepProgram, StepResult};
use web_time::Duration;

use crate::app::CounterApp;
use crate::config::AppConfig;
use crate::script::{self, ScriptCommand, ScriptError};

#[derive(Debug)]
pub enum SessionError {
    Io(io::Error),
    Script { line: usize, source: ScriptError },
    Step(StepError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Script { line, source } => write!(f, "script line {line}: {source}"),
            Self::Step(e) => write!(f, "runtime error: {e}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Script { source, .. } => Some(source),
            Self::Step(e) => Some(e),
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<StepError> for SessionError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

/// Counts reported when a script finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSummary {
    pub commands: usize,
    pub frames: u64,
    pub elapsed_ms: u64,
    pub counter: i64,
}

pub struct Session {
    program: StepProgram<CounterApp>,
    logs_written: usize,
}

impl Session {
    /// Mount the app described by `config` and render its first frame.
    pub fn new(config: &AppConfig) -> Result<Self, StepError> {
        let mut program = StepProgram::new(
            CounterApp::from_config(config),
            config.viewport.width,
            config.viewport.height,
        );
        program.init()?;
        Ok(Self {
            program,
            logs_written: 0,
        })
    }

    pub fn program(&self) -> &StepProgram<CounterApp> {
        &self.program
    }

    pub fn app(&self) -> &CounterApp {
        self.program.model()
    }

    /// Apply one command, writing any new log lines (and the frame, for
    /// `print`) to `out`. Returns `false` once the session should stop.
    pub fn apply(&mut self, command: ScriptCommand, out: &mut impl Write) -> Result<bool, SessionError> {
        let result = match command {
            ScriptCommand::Quit => return Ok(false),
            ScriptCommand::Print => {
                self.write_frame(out)?;
                return Ok(self.program.is_running());
            }
            ScriptCommand::Wait(ms) => {
                self.program.advance_time(Duration::from_millis(ms));
                self.program.step()?
            }
            other => {
                if let Some(event) = other.event() {
                    self.program.push_event(event);
                }
                self.program.step()?
            }
        };
        self.flush_logs(out)?;
        Ok(result.running)
    }

    /// Run `input` line by line until it ends, a `quit` command, or the app
    /// itself quits.
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> Result<SessionSummary, SessionError> {
        let mut commands = 0;
        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            let command = script::parse_line(&line).map_err(|source| SessionError::Script {
                line: idx + 1,
                source,
            })?;
            let Some(command) = command else {
                continue;
            };
            commands += 1;
            tracing::debug!(target: "duocount.app", ?command, "script command");
            if !self.apply(command, &mut out)? {
                break;
            }
        }
        out.flush()?;
        Ok(self.summary(commands))
    }

    fn summary(&self, commands: usize) -> SessionSummary {
        SessionSummary {
            commands,
            frames: self.program.frame_idx(),
            elapsed_ms: u64::try_from(self.program.now().as_millis()).unwrap_or(u64::MAX),
            counter: self.app().state().counter,
        }
    }

    fn write_frame(&self, out: &mut impl Write) -> io::Result<()> {
        let now_ms = self.program.now().as_millis();
        writeln!(out, "--- frame {} @ {now_ms}ms ---", self.program.frame_idx())?;
        for line in self.program.outputs().last_lines() {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    fn flush_logs(&mut self, out: &mut impl Write) -> io::Result<()> {
        let logs = &self.program.outputs().logs;
        for line in logs.iter().skip(self.logs_written) {
            writeln!(out, "log: {line}")?;
        }
        self.logs_written = logs.len();
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("program", &self.program)
            .field("logs_written", &self.logs_written)
            .finish()
    }
}
