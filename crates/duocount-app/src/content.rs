#![forbid(unsafe_code)]

//! Content provider: resolves the label bundle for a language after a delay.
//!
//! Fetches are deferred values, not futures. A [`Fetch`] carries its delay
//! and a loader; the controller turns it into a runtime [`Task`] so the
//! host clock decides when it resolves.

use std::fmt;

use duocount_i18n::{LabelBundle, Language};
use duocount_runtime::Task;
use web_time::Duration;

/// A value that becomes available `delay` after it was requested.
pub struct Fetch<T> {
    language: Language,
    delay: Duration,
    load: Box<dyn FnOnce() -> T + Send>,
}

impl<T: Send + 'static> Fetch<T> {
    pub fn new<F>(language: Language, delay: Duration, load: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self {
            language,
            delay,
            load: Box::new(load),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Resolve immediately, ignoring the delay.
    pub fn resolve(self) -> T {
        (self.load)()
    }

    /// Schedule the fetch as a task whose message wraps the loaded value.
    pub fn into_task<M, F>(self, label: &'static str, wrap: F) -> Task<M>
    where
        F: FnOnce(T) -> M + Send + 'static,
    {
        let load = self.load;
        Task::new(label, self.delay, move || wrap(load()))
    }
}

impl<T> fmt::Debug for Fetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetch")
            .field("language", &self.language)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

/// Source of display strings.
pub trait ContentProvider: Send {
    /// Request the label bundle for `language`.
    fn fetch_labels(&self, language: Language) -> Fetch<LabelBundle>;
}

/// Static two-language table served after a fixed artificial delay.
#[derive(Debug, Clone)]
pub struct MockContentProvider {
    delay: Duration,
    english: LabelBundle,
    portuguese: LabelBundle,
}

impl MockContentProvider {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

    /// The built-in table with the default delay.
    pub fn new() -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
            english: LabelBundle::builtin(Language::English),
            portuguese: LabelBundle::builtin(Language::Portuguese),
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn bundle(&self, language: Language) -> &LabelBundle {
        match language {
            Language::English => &self.english,
            Language::Portuguese => &self.portuguese,
        }
    }
}

impl Default for MockContentProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentProvider for MockContentProvider {
    fn fetch_labels(&self, language: Language) -> Fetch<LabelBundle> {
        let bundle = self.bundle(language).clone();
        tracing::debug!(
            target: "duocount.app",
            language = %language,
            delay_ms = self.delay.as_millis() as u64,
            "content fetch issued"
        );
        Fetch::new(language, self.delay, move || bundle)
    }
}
