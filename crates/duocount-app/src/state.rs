#![forbid(unsafe_code)]

//! Application state and its shallow-merge reducer.

use duocount_i18n::{LabelBundle, Language};
use serde::{Deserialize, Serialize};

/// Whether content for the current language has arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
        }
    }
}

/// The single piece of mutable state the controller owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub language: Language,
    /// `None` until the fetch for `language` resolves.
    pub content: Option<LabelBundle>,
    pub counter: i64,
}

/// A partial state update. Present fields override, absent ones are kept.
///
/// `content` is doubly optional so a patch can clear content
/// (`Some(None)`) as well as leave it alone (`None`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePatch {
    pub language: Option<Language>,
    pub content: Option<Option<LabelBundle>>,
    pub counter: Option<i64>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    #[must_use]
    pub fn content(mut self, content: Option<LabelBundle>) -> Self {
        self.content = Some(content);
        self
    }

    #[must_use]
    pub fn counter(mut self, counter: i64) -> Self {
        self.counter = Some(counter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.language.is_none() && self.content.is_none() && self.counter.is_none()
    }
}

impl AppState {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        if self.content.is_some() {
            Phase::Ready
        } else {
            Phase::Loading
        }
    }

    /// Pure reducer: `self` with `patch` applied.
    #[must_use]
    pub fn merged(mut self, patch: StatePatch) -> Self {
        self.merge(patch);
        self
    }

    /// Apply `patch` in place.
    pub fn merge(&mut self, patch: StatePatch) {
        let StatePatch {
            language,
            content,
            counter,
        } = patch;
        if let Some(language) = language {
            self.language = language;
        }
        if let Some(content) = content {
            self.content = content;
        }
        if let Some(counter) = counter {
            self.counter = counter;
        }
    }

    /// Serializable view for hosts.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            language: self.language.code().to_owned(),
            phase: self.phase().as_str().to_owned(),
            counter: self.counter,
            content: self.content.as_ref().map(ContentSnapshot::from),
        }
    }
}

/// JSON shape of [`AppState`] handed to hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub language: String,
    pub phase: String,
    pub counter: i64,
    pub content: Option<ContentSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSnapshot {
    pub title: String,
    pub increment: String,
    pub decrease: String,
    pub change_language: String,
}

impl From<&LabelBundle> for ContentSnapshot {
    fn from(labels: &LabelBundle) -> Self {
        Self {
            title: labels.title().to_owned(),
            increment: labels.increment().to_owned(),
            decrease: labels.decrease().to_owned(),
            change_language: labels.change_language().to_owned(),
        }
    }
}
