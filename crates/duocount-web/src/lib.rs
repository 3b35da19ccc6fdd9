#![forbid(unsafe_code)]

//! `duocount-web` provides the host-driven backend that runs a duocount model.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS, a test, or the
//!   headless binary) pushes input events and size changes.
//! - **Deterministic time**: the host advances a monotonic clock explicitly,
//!   and deferred tasks fire against that clock only.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! [`step_program::StepProgram`] ties these pieces to a
//! [`Model`](duocount_runtime::Model).

pub mod step_program;

use core::time::Duration;
use std::collections::VecDeque;

use duocount_core::event::Event;
use duocount_render::buffer::Buffer;
use duocount_render::cell::Cell;
use duocount_render::diff::BufferDiff;

const WEB_PATCH_CELL_BYTES: u64 = 8;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Going backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// Host-driven event source.
///
/// The host is responsible for pushing [`Event`] values and updating size.
#[derive(Debug, Clone)]
pub struct WebEventSource {
    size: (u16, u16),
    queue: VecDeque<Event>,
}

impl WebEventSource {
    /// Create a new event source with an initial size.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: (width, height),
            queue: VecDeque::new(),
        }
    }

    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Update the current size.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.size = (width, height);
    }

    /// Push a canonical event into the queue.
    pub fn push_event(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn read_event(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}

/// Captured presentation outputs for host consumption.
#[derive(Debug, Default, Clone)]
pub struct WebOutputs {
    /// Log lines written by `Cmd::Log`.
    pub logs: Vec<String>,
    /// Last fully-rendered buffer presented.
    pub last_buffer: Option<Buffer>,
    /// Last emitted incremental/full patch runs in row-major order.
    pub last_patches: Vec<WebPatchRun>,
    /// Aggregate patch accounting for the last present.
    pub last_patch_stats: Option<WebPatchStats>,
    /// Whether the last present requested a full repaint.
    pub last_full_repaint_hint: bool,
}

impl WebOutputs {
    /// Text rows of the last presented buffer, trailing blanks trimmed.
    pub fn last_lines(&self) -> Vec<String> {
        self.last_buffer
            .as_ref()
            .map(Buffer::to_lines)
            .unwrap_or_default()
    }
}

/// One patch cell payload: the glyph codepoint (0 for blank) and style bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebPatchCell {
    pub glyph: u32,
    pub attrs: u32,
}

/// One contiguous run of changed cells starting at linear `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebPatchRun {
    pub offset: u32,
    pub cells: Vec<WebPatchCell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebPatchStats {
    pub dirty_cells: u32,
    pub patch_count: u32,
    pub bytes_uploaded: u64,
}

/// Presenter that captures buffers and logs for the host.
#[derive(Debug, Default, Clone)]
pub struct WebPresenter {
    outputs: WebOutputs,
}

impl WebPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get captured outputs.
    #[must_use]
    pub const fn outputs(&self) -> &WebOutputs {
        &self.outputs
    }

    /// Take captured outputs, leaving empty defaults.
    pub fn take_outputs(&mut self) -> WebOutputs {
        std::mem::take(&mut self.outputs)
    }

    pub fn write_log(&mut self, text: &str) {
        self.outputs.logs.push(text.to_owned());
    }

    /// Record `buf` as the presented frame.
    ///
    /// With a diff and no repaint hint only the changed cells are emitted;
    /// otherwise the whole buffer goes out as a single run.
    pub fn present_ui(&mut self, buf: &Buffer, diff: Option<&BufferDiff>, full_repaint_hint: bool) {
        let patches = build_patch_runs(buf, diff, full_repaint_hint);
        let stats = patch_batch_stats(&patches);
        self.outputs.last_buffer = Some(buf.clone());
        self.outputs.last_patches = patches;
        self.outputs.last_patch_stats = Some(stats);
        self.outputs.last_full_repaint_hint = full_repaint_hint;
    }
}

#[must_use]
fn cell_to_patch(cell: &Cell) -> WebPatchCell {
    WebPatchCell {
        glyph: cell.as_char().map_or(0, u32::from),
        attrs: u32::from(cell.flags.bits()),
    }
}

fn patch_at(buffer: &Buffer, x: u16, y: u16) -> WebPatchCell {
    buffer.get(x, y).map_or(cell_to_patch(&Cell::EMPTY), cell_to_patch)
}

#[must_use]
fn full_buffer_patch(buffer: &Buffer) -> WebPatchRun {
    let cols = buffer.width();
    let rows = buffer.height();
    let mut cells = Vec::with_capacity(usize::from(cols) * usize::from(rows));
    for y in 0..rows {
        for x in 0..cols {
            cells.push(patch_at(buffer, x, y));
        }
    }
    WebPatchRun { offset: 0, cells }
}

#[must_use]
fn diff_to_patches(buffer: &Buffer, diff: &BufferDiff) -> Vec<WebPatchRun> {
    let cols = u32::from(buffer.width());
    let mut patches: Vec<WebPatchRun> = Vec::new();
    let mut prev_offset: Option<u32> = None;

    for &(x, y) in diff.changes() {
        let offset = u32::from(y) * cols + u32::from(x);
        if prev_offset == Some(offset) {
            continue;
        }
        let cell = patch_at(buffer, x, y);
        let contiguous = prev_offset.is_some_and(|prev| offset == prev + 1);
        prev_offset = Some(offset);
        if contiguous && let Some(run) = patches.last_mut() {
            run.cells.push(cell);
            continue;
        }
        patches.push(WebPatchRun {
            offset,
            cells: vec![cell],
        });
    }
    patches
}

#[must_use]
fn build_patch_runs(
    buffer: &Buffer,
    diff: Option<&BufferDiff>,
    full_repaint_hint: bool,
) -> Vec<WebPatchRun> {
    if full_repaint_hint {
        return vec![full_buffer_patch(buffer)];
    }
    match diff {
        Some(dirty) => diff_to_patches(buffer, dirty),
        None => vec![full_buffer_patch(buffer)],
    }
}

#[must_use]
fn patch_batch_stats(patches: &[WebPatchRun]) -> WebPatchStats {
    let dirty_cells_u64 = patches
        .iter()
        .map(|patch| patch.cells.len() as u64)
        .sum::<u64>();
    WebPatchStats {
        dirty_cells: dirty_cells_u64.min(u64::from(u32::MAX)) as u32,
        patch_count: patches.len().min(u32::MAX as usize) as u32,
        bytes_uploaded: dirty_cells_u64.saturating_mul(WEB_PATCH_CELL_BYTES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duocount_render::cell::CellFlags;

    use pretty_assertions::assert_eq;

    #[test]
    fn deterministic_clock_advances_monotonically() {
        let mut c = DeterministicClock::new();
        assert_eq!(c.now(), Duration::ZERO);

        c.advance(Duration::from_millis(10));
        c.advance(Duration::from_millis(5));
        assert_eq!(c.now(), Duration::from_millis(15));

        // Going backwards is a no-op.
        c.set(Duration::from_millis(3));
        assert_eq!(c.now(), Duration::from_millis(15));

        c.set(Duration::MAX);
        c.advance(Duration::from_secs(1));
        assert_eq!(c.now(), Duration::MAX);
    }

    #[test]
    fn web_event_source_fifo_queue() {
        let mut ev = WebEventSource::new(80, 24);
        assert_eq!(ev.size(), (80, 24));
        assert_eq!(ev.pending(), 0);

        ev.push_event(Event::Tick);
        ev.push_event(Event::Resize {
            width: 100,
            height: 40,
        });
        assert_eq!(ev.pending(), 2);
        assert_eq!(ev.read_event(), Some(Event::Tick));
        assert_eq!(
            ev.drain_events().collect::<Vec<_>>(),
            vec![Event::Resize {
                width: 100,
                height: 40,
            }]
        );
        assert_eq!(ev.read_event(), None);
    }

    #[test]
    fn presenter_captures_logs_and_last_buffer() {
        let mut p = WebPresenter::new();
        p.write_log("hello");
        p.write_log("world");

        let buf = Buffer::new(2, 2);
        p.present_ui(&buf, None, true);

        let outputs = p.take_outputs();
        assert_eq!(outputs.logs, vec!["hello", "world"]);
        assert!(outputs.last_full_repaint_hint);
        assert_eq!(outputs.last_buffer.map(|b| b.width()), Some(2));
        assert_eq!(outputs.last_patches.len(), 1);
        let stats = outputs.last_patch_stats.expect("stats should be present");
        assert_eq!(stats.patch_count, 1);
        assert_eq!(stats.dirty_cells, 4);
        assert_eq!(stats.bytes_uploaded, 32);
    }

    #[test]
    fn presenter_emits_incremental_patch_runs_from_diff() {
        let mut presenter = WebPresenter::new();
        let old = Buffer::new(6, 2);
        presenter.present_ui(&old, None, true);

        let mut next = Buffer::new(6, 2);
        next.set(2, 0, Cell::from_char('A'));
        next.set(3, 0, Cell::from_char('B').with_flags(CellFlags::BOLD));
        next.set(0, 1, Cell::from_char('C'));
        let diff = BufferDiff::compute(&old, &next);
        presenter.present_ui(&next, Some(&diff), false);

        let outputs = presenter.take_outputs();
        assert!(!outputs.last_full_repaint_hint);
        assert_eq!(outputs.last_patches.len(), 2);
        assert_eq!(outputs.last_patches[0].offset, 2);
        assert_eq!(
            outputs.last_patches[0].cells,
            vec![
                WebPatchCell {
                    glyph: 'A' as u32,
                    attrs: 0
                },
                WebPatchCell {
                    glyph: 'B' as u32,
                    attrs: u32::from(CellFlags::BOLD.bits())
                },
            ]
        );
        assert_eq!(outputs.last_patches[1].offset, 6);
        assert_eq!(outputs.last_patches[1].cells.len(), 1);
        let stats = outputs.last_patch_stats.expect("stats should be present");
        assert_eq!(stats.dirty_cells, 3);
    }

    #[test]
    fn empty_diff_emits_no_runs() {
        let mut presenter = WebPresenter::new();
        let buf = Buffer::new(3, 1);
        let diff = BufferDiff::compute(&buf, &buf);
        presenter.present_ui(&buf, Some(&diff), false);
        assert!(presenter.outputs().last_patches.is_empty());
        assert_eq!(
            presenter.outputs().last_patch_stats.map(|s| s.dirty_cells),
            Some(0)
        );
    }

    #[test]
    fn last_lines_reads_presented_text() {
        let mut presenter = WebPresenter::new();
        assert!(presenter.outputs().last_lines().is_empty());
        let mut buf = Buffer::new(4, 2);
        buf.set_string(0, 1, "hi", CellFlags::empty(), 4);
        presenter.present_ui(&buf, None, true);
        assert_eq!(presenter.outputs().last_lines(), vec!["", "hi"]);
    }
}
