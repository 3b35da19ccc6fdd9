#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping `StepProgram<CounterApp>`.
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here.

use core::time::Duration;

use duocount::{AppConfig, CounterApp, CounterUpdate};
use duocount_core::event::{Activation, Event};
use duocount_web::WebPatchStats;
use duocount_web::step_program::{StepProgram, StepResult};

/// Platform-independent counter runner wrapping `StepProgram<CounterApp>`.
pub struct RunnerCore {
    inner: StepProgram<CounterApp>,
    /// Runner-level diagnostics (misuse, rejected input).
    runner_logs: Vec<String>,
    /// Presenter log lines already handed to the host.
    logs_taken: usize,
}

/// Patch runs flattened for upload: `spans` holds `[offset, len]` pairs,
/// `cells` holds `[glyph, attrs]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatPatches {
    pub spans: Vec<u32>,
    pub cells: Vec<u32>,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl RunnerCore {
    /// Runner with default settings and the given viewport.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self::with_app(CounterApp::new(), cols, rows)
    }

    /// Runner built from a JSON [`AppConfig`].
    pub fn from_config_json(json: &str) -> Result<Self, String> {
        let config = AppConfig::from_json_str(json).map_err(|e| e.to_string())?;
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(errors.join("; "));
        }
        Ok(Self::with_app(
            CounterApp::from_config(&config),
            config.viewport.width,
            config.viewport.height,
        ))
    }

    fn with_app(app: CounterApp, cols: u16, rows: u16) -> Self {
        Self {
            inner: StepProgram::new(app, cols, rows),
            runner_logs: Vec::new(),
            logs_taken: 0,
        }
    }

    /// Initialize the model and render the first frame. Repeat calls are
    /// ignored.
    pub fn init(&mut self) {
        if self.inner.is_initialized() {
            return;
        }
        if let Err(err) = self.inner.init() {
            self.runner_logs.push(format!("runner_init_error: {err}"));
        }
    }

    /// Advance the deterministic clock by `dt_ms` milliseconds.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        // NaN, infinite, and negative deltas are dropped.
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        let max_secs = Duration::MAX.as_secs_f64();
        let secs = (dt_ms / 1000.0).min(max_secs);
        let duration = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);
        self.inner.advance_time(duration);
    }

    /// Set the deterministic clock to absolute nanoseconds. The clock never
    /// moves backwards.
    pub fn set_time_ns(&mut self, ts_ns: f64) {
        let nanos = if !ts_ns.is_finite() || ts_ns <= 0.0 {
            0
        } else {
            ts_ns.min(u64::MAX as f64) as u64
        };
        self.inner.set_time(Duration::from_nanos(nanos));
    }

    /// Queue a primary press at a cell.
    pub fn push_click(&mut self, x: u16, y: u16) {
        self.inner.push_event(Event::click(x, y));
    }

    /// Queue a key press of a single character.
    pub fn push_key(&mut self, c: char) {
        self.inner.push_event(Event::char(c));
    }

    /// Queue activation of a control by hit id.
    pub fn activate(&mut self, id: u32) {
        self.inner.push_event(Event::Activate(Activation::new(id)));
    }

    /// Apply a JSON counter update (`{"type": "increase", "quantity": 5}`)
    /// immediately; the frame reflects it after the next step.
    ///
    /// Returns `false` for malformed input or an unknown type; the counter is
    /// left unchanged in that case.
    pub fn push_counter_update(&mut self, json: &str) -> bool {
        let Some(update) = CounterUpdate::from_json(json) else {
            self.runner_logs.push(format!("rejected_counter_update: {json}"));
            return false;
        };
        self.inner.model_mut().change_counter(update);
        // Marks the program dirty so the next step re-renders.
        self.inner.push_event(Event::Tick);
        true
    }

    /// Resize the viewport. Applied on the next step.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.inner.resize(cols, rows);
    }

    /// Process pending events and due tasks, rendering if dirty.
    pub fn step(&mut self) -> StepResult {
        if !self.inner.is_initialized() {
            self.init();
        }
        match self.inner.step() {
            Ok(result) => result,
            Err(err) => {
                self.runner_logs.push(format!("runner_step_error: {err}"));
                StepResult {
                    running: self.inner.is_running(),
                    rendered: false,
                    events_processed: 0,
                    tasks_run: 0,
                    frame_idx: self.inner.frame_idx(),
                }
            }
        }
    }

    /// Text rows of the last rendered frame joined with `\n`.
    pub fn frame_text(&self) -> String {
        self.inner.outputs().last_lines().join("\n")
    }

    /// Application state as JSON.
    pub fn state_json(&self) -> String {
        let snapshot = self.inner.model().state().snapshot();
        serde_json::to_string(&snapshot).unwrap_or_else(|e| {
            serde_json::json!({ "error": e.to_string() }).to_string()
        })
    }

    /// Patch runs from the last present, flattened.
    pub fn flat_patches(&self) -> FlatPatches {
        let mut flat = FlatPatches::default();
        for run in &self.inner.outputs().last_patches {
            flat.spans.push(run.offset);
            flat.spans.push(u32::try_from(run.cells.len()).unwrap_or(u32::MAX));
            for cell in &run.cells {
                flat.cells.push(cell.glyph);
                flat.cells.push(cell.attrs);
            }
        }
        flat
    }

    pub fn patch_stats(&self) -> Option<WebPatchStats> {
        self.inner.outputs().last_patch_stats
    }

    /// Log lines not yet taken: app logs first, then runner diagnostics.
    pub fn take_logs(&mut self) -> Vec<String> {
        let app_logs = &self.inner.outputs().logs;
        let mut logs: Vec<String> = app_logs.iter().skip(self.logs_taken).cloned().collect();
        self.logs_taken = app_logs.len();
        logs.append(&mut self.runner_logs);
        logs
    }

    /// Current frame index (monotonic, 0-based).
    pub fn frame_idx(&self) -> u64 {
        self.inner.frame_idx()
    }

    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    /// Milliseconds until the next live fetch resolves, if any. Superseded
    /// fetches are not counted.
    pub fn next_deadline_ms(&self) -> Option<f64> {
        let deadline = self.inner.next_deadline()?;
        let remaining = deadline.saturating_sub(self.inner.now());
        Some(remaining.as_secs_f64() * 1000.0)
    }
}
