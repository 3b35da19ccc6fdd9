#![forbid(unsafe_code)]

//! Effect observability.
//!
//! Every command the host executes and every deferred [`Task`](crate::Task)
//! transition goes through one of these helpers, which emit an `effect.*`
//! span plus a debug event under the `duocount.effect` target and bump a
//! process-wide monotonic counter.

use std::sync::atomic::{AtomicU64, Ordering};
use web_time::Instant;

// ---------------------------------------------------------------------------
// Monotonic counters
// ---------------------------------------------------------------------------

static EFFECTS_COMMAND_TOTAL: AtomicU64 = AtomicU64::new(0);
static TASKS_SCHEDULED_TOTAL: AtomicU64 = AtomicU64::new(0);
static TASKS_COMPLETED_TOTAL: AtomicU64 = AtomicU64::new(0);
static TASKS_CANCELLED_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Total command effects executed.
#[must_use]
pub fn effects_command_total() -> u64 {
    EFFECTS_COMMAND_TOTAL.load(Ordering::Relaxed)
}

#[must_use]
pub fn tasks_scheduled_total() -> u64 {
    TASKS_SCHEDULED_TOTAL.load(Ordering::Relaxed)
}

#[must_use]
pub fn tasks_completed_total() -> u64 {
    TASKS_COMPLETED_TOTAL.load(Ordering::Relaxed)
}

#[must_use]
pub fn tasks_cancelled_total() -> u64 {
    TASKS_CANCELLED_TOTAL.load(Ordering::Relaxed)
}

// ---------------------------------------------------------------------------
// Command effects
// ---------------------------------------------------------------------------

/// Run `f` inside an `effect.command` span, recording how long it took.
pub fn trace_command_effect<F, R>(command_type: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    EFFECTS_COMMAND_TOTAL.fetch_add(1, Ordering::Relaxed);

    let start = Instant::now();
    let _span = tracing::debug_span!(
        "effect.command",
        command_type = %command_type,
        duration_us = tracing::field::Empty,
    )
    .entered();

    let result = f();
    let duration_us = start.elapsed().as_micros() as u64;
    tracing::Span::current().record("duration_us", duration_us);

    tracing::debug!(
        target: "duocount.effect",
        command_type = %command_type,
        duration_us = duration_us,
        "command effect completed"
    );

    result
}

// ---------------------------------------------------------------------------
// Task lifecycle
// ---------------------------------------------------------------------------

/// A task entered the queue, due `delay_ms` after `now_ms`.
pub fn record_task_scheduled(label: &str, now_ms: u64, delay_ms: u64) {
    TASKS_SCHEDULED_TOTAL.fetch_add(1, Ordering::Relaxed);

    let _span = tracing::debug_span!(
        "effect.task",
        label = %label,
        phase = "scheduled",
        due_ms = now_ms.saturating_add(delay_ms),
    )
    .entered();

    tracing::debug!(
        target: "duocount.effect",
        label = %label,
        delay_ms = delay_ms,
        "task scheduled"
    );
}

/// A task came due and its message was produced.
pub fn record_task_completed(label: &str, lateness_ms: u64) {
    TASKS_COMPLETED_TOTAL.fetch_add(1, Ordering::Relaxed);

    let _span = tracing::debug_span!(
        "effect.task",
        label = %label,
        phase = "completed",
        lateness_ms = lateness_ms,
    )
    .entered();

    tracing::debug!(
        target: "duocount.effect",
        label = %label,
        lateness_ms = lateness_ms,
        "task completed"
    );
}

/// A task was dropped because its token was cancelled.
pub fn record_task_cancelled(label: &str) {
    TASKS_CANCELLED_TOTAL.fetch_add(1, Ordering::Relaxed);

    let _span = tracing::debug_span!("effect.task", label = %label, phase = "cancelled").entered();

    tracing::info!(
        target: "duocount.effect",
        label = %label,
        "task cancelled before delivery"
    );
}
