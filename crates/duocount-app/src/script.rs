#![forbid(unsafe_code)]

//! Line-oriented driver script for the headless binary.
//!
//! ```text
//! # comments and blank lines are skipped
//! wait 1000
//! click 0 3
//! activate 4
//! key l
//! print
//! quit
//! ```

use std::fmt;

use duocount_core::event::{Activation, Event};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCommand {
    /// Left press at a cell.
    Click { x: u16, y: u16 },
    /// Activate a control by hit id.
    Activate(u32),
    /// Press a character key.
    Key(char),
    /// Advance the clock by this many milliseconds.
    Wait(u64),
    /// Print the current frame.
    Print,
    Quit,
}

impl ScriptCommand {
    /// Input event for commands that inject one.
    pub fn event(&self) -> Option<Event> {
        match *self {
            Self::Click { x, y } => Some(Event::click(x, y)),
            Self::Activate(id) => Some(Event::Activate(Activation::new(id))),
            Self::Key(c) => Some(Event::char(c)),
            Self::Wait(_) | Self::Print | Self::Quit => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    UnknownCommand(String),
    MissingArgument { command: &'static str },
    InvalidArgument { command: &'static str, value: String },
    TrailingInput { command: &'static str },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(word) => write!(f, "unknown command: {word}"),
            Self::MissingArgument { command } => write!(f, "{command}: missing argument"),
            Self::InvalidArgument { command, value } => {
                write!(f, "{command}: invalid argument {value:?}")
            }
            Self::TrailingInput { command } => write!(f, "{command}: unexpected trailing input"),
        }
    }
}

impl std::error::Error for ScriptError {}

/// Parse one script line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let command = match head.to_ascii_lowercase().as_str() {
        "click" => ScriptCommand::Click {
            x: arg(&mut words, "click")?,
            y: arg(&mut words, "click")?,
        },
        "activate" => ScriptCommand::Activate(arg(&mut words, "activate")?),
        "key" => {
            let word = words.next().ok_or(ScriptError::MissingArgument { command: "key" })?;
            let mut chars = word.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => ScriptCommand::Key(c),
                _ => {
                    return Err(ScriptError::InvalidArgument {
                        command: "key",
                        value: word.to_owned(),
                    });
                }
            }
        }
        "wait" => ScriptCommand::Wait(arg(&mut words, "wait")?),
        "print" => ScriptCommand::Print,
        "quit" => ScriptCommand::Quit,
        _ => return Err(ScriptError::UnknownCommand(head.to_owned())),
    };
    if words.next().is_some() {
        return Err(ScriptError::TrailingInput {
            command: command_name(&command),
        });
    }
    Ok(Some(command))
}

fn arg<'a, T: std::str::FromStr>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<T, ScriptError> {
    let word = words.next().ok_or(ScriptError::MissingArgument { command })?;
    word.parse().map_err(|_| ScriptError::InvalidArgument {
        command,
        value: word.to_owned(),
    })
}

fn command_name(command: &ScriptCommand) -> &'static str {
    match command {
        ScriptCommand::Click { .. } => "click",
        ScriptCommand::Activate(_) => "activate",
        ScriptCommand::Key(_) => "key",
        ScriptCommand::Wait(_) => "wait",
        ScriptCommand::Print => "print",
        ScriptCommand::Quit => "quit",
    }
}
