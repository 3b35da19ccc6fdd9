#![forbid(unsafe_code)]

//! The counter application: controller, messages, and fetch bookkeeping.
//!
//! # State machine
//!
//! ```text
//!            init / change_language
//!   Loading ─────────────────────────► (fetch in flight)
//!      ▲                                      │ ContentLoaded (tag matches)
//!      │ change_language                      ▼
//!      └──────────────────────────────────  Ready
//! ```
//!
//! Every fetch carries a [`FetchTag`]. Issuing a new fetch cancels the one in
//! flight, and a result whose tag is not the current request is dropped on
//! arrival. [`StaleContentPolicy::Overwrite`] turns both off.

use duocount_core::event::{Activation, Event, KeyCode};
use duocount_i18n::{LabelBundle, Language};
use duocount_render::frame::Frame;
use duocount_runtime::{CancellationSource, Cmd, Model};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::content::{ContentProvider, MockContentProvider};
use crate::state::{AppState, StatePatch};
use crate::update::CounterUpdate;
use crate::view::{self, ids};

/// Task label for content fetches.
pub const FETCH_TASK_LABEL: &str = "content.fetch";

/// How a fetch result that no longer matches the current request is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleContentPolicy {
    /// Cancel superseded fetches and drop their results.
    #[default]
    Discard,
    /// Let every fetch run to completion; the last one to resolve wins,
    /// even when it is for a language that is no longer selected.
    Overwrite,
}

/// Identifies one content request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTag {
    pub language: Language,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    ChangeLanguage,
    ChangeCounter(CounterUpdate),
    ContentLoaded { tag: FetchTag, labels: LabelBundle },
    Quit,
    Ignored,
}

impl From<Activation> for Msg {
    fn from(activation: Activation) -> Self {
        match activation.id {
            ids::CHANGE_LANGUAGE => Self::ChangeLanguage,
            ids::DECREASE_ONE => Self::ChangeCounter(CounterUpdate::Decrease { quantity: None }),
            ids::INCREASE_ONE => Self::ChangeCounter(CounterUpdate::Increase { quantity: None }),
            ids::INCREASE_FIVE => Self::ChangeCounter(CounterUpdate::increase(5)),
            ids::DECREASE_FIVE => Self::ChangeCounter(CounterUpdate::decrease(5)),
            _ => Self::Ignored,
        }
    }
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Activate(activation) => activation.into(),
            Event::Key(key) if !key.is_actionable() => Self::Ignored,
            Event::Key(key) if key.ctrl() && key.is_char('c') => Self::Quit,
            Event::Key(key) => match key.code {
                KeyCode::Char('+') => Self::ChangeCounter(CounterUpdate::Increase { quantity: None }),
                KeyCode::Char('-') => Self::ChangeCounter(CounterUpdate::Decrease { quantity: None }),
                KeyCode::Char(']') => Self::ChangeCounter(CounterUpdate::increase(5)),
                KeyCode::Char('[') => Self::ChangeCounter(CounterUpdate::decrease(5)),
                KeyCode::Char('l') => Self::ChangeLanguage,
                KeyCode::Char('q') | KeyCode::Escape => Self::Quit,
                _ => Self::Ignored,
            },
            _ => Self::Ignored,
        }
    }
}

/// Root model. Owns the application state and the content provider.
pub struct CounterApp {
    state: AppState,
    provider: Box<dyn ContentProvider>,
    policy: StaleContentPolicy,
    generation: u64,
    in_flight: Option<(FetchTag, CancellationSource)>,
    fetches_issued: u64,
}

impl CounterApp {
    pub fn new() -> Self {
        Self::with_provider(MockContentProvider::new())
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_provider(MockContentProvider::new().with_delay(config.fetch_delay()))
            .with_stale_policy(config.stale_content)
            .with_language(config.initial_language)
    }

    pub fn with_provider(provider: impl ContentProvider + 'static) -> Self {
        Self {
            state: AppState::default(),
            provider: Box::new(provider),
            policy: StaleContentPolicy::default(),
            generation: 0,
            in_flight: None,
            fetches_issued: 0,
        }
    }

    #[must_use]
    pub fn with_stale_policy(mut self, policy: StaleContentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Language used at mount. Has no effect once a fetch was issued.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        if self.fetches_issued == 0 {
            self.state.language = language;
        }
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn stale_policy(&self) -> StaleContentPolicy {
        self.policy
    }

    /// Total fetches issued, including the one at mount.
    pub fn fetches_issued(&self) -> u64 {
        self.fetches_issued
    }

    /// Tag of the request whose result will be accepted next, if any.
    pub fn pending_fetch(&self) -> Option<FetchTag> {
        self.in_flight.as_ref().map(|(tag, _)| *tag)
    }

    pub fn merge_state(&mut self, patch: StatePatch) {
        self.state.merge(patch);
    }

    /// Toggle the language, clear content, and request the new bundle.
    pub fn change_language(&mut self) -> Cmd<Msg> {
        let from = self.state.language;
        let to = from.toggled();
        self.merge_state(StatePatch::new().language(to).content(None));
        tracing::info!(target: "duocount.app", %from, %to, "language changed");
        Cmd::batch(vec![
            Cmd::log(format!("language {from} -> {to}")),
            self.request_content(),
        ])
    }

    pub fn change_counter(&mut self, update: CounterUpdate) {
        let before = self.state.counter;
        let after = update.apply(before);
        tracing::debug!(
            target: "duocount.app",
            kind = update.kind(),
            quantity = update.quantity(),
            before,
            after,
            "counter update"
        );
        self.merge_state(StatePatch::new().counter(after));
    }

    fn request_content(&mut self) -> Cmd<Msg> {
        if self.policy == StaleContentPolicy::Discard
            && let Some((superseded, source)) = self.in_flight.take()
        {
            source.cancel();
            tracing::debug!(
                target: "duocount.app",
                language = %superseded.language,
                generation = superseded.generation,
                "superseded fetch cancelled"
            );
        }

        self.generation = self.generation.saturating_add(1);
        self.fetches_issued = self.fetches_issued.saturating_add(1);
        let tag = FetchTag {
            language: self.state.language,
            generation: self.generation,
        };
        let source = CancellationSource::new();
        let task = self
            .provider
            .fetch_labels(tag.language)
            .into_task(FETCH_TASK_LABEL, move |labels| Msg::ContentLoaded { tag, labels })
            .with_cancellation(source.token());
        self.in_flight = Some((tag, source));
        Cmd::task(task)
    }

    fn content_loaded(&mut self, tag: FetchTag, labels: LabelBundle) {
        let current = self.pending_fetch();
        if current == Some(tag) {
            self.in_flight = None;
        } else if self.policy == StaleContentPolicy::Discard {
            tracing::debug!(
                target: "duocount.app",
                language = %tag.language,
                generation = tag.generation,
                current_generation = self.generation,
                "stale content discarded"
            );
            return;
        }
        tracing::info!(
            target: "duocount.app",
            language = %tag.language,
            generation = tag.generation,
            "content loaded"
        );
        self.merge_state(StatePatch::new().content(Some(labels)));
    }
}

impl Default for CounterApp {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CounterApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterApp")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("generation", &self.generation)
            .field("pending_fetch", &self.pending_fetch())
            .field("fetches_issued", &self.fetches_issued)
            .finish_non_exhaustive()
    }
}

impl Model for CounterApp {
    type Message = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        tracing::info!(target: "duocount.app", language = %self.state.language, "mounted");
        self.request_content()
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::ChangeLanguage => self.change_language(),
            Msg::ChangeCounter(update) => {
                self.change_counter(update);
                Cmd::none()
            }
            Msg::ContentLoaded { tag, labels } => {
                self.content_loaded(tag, labels);
                Cmd::none()
            }
            Msg::Quit => Cmd::quit(),
            Msg::Ignored => Cmd::none(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        view::render(&self.state, frame);
    }
}
