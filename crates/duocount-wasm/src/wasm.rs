#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the CounterRunner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly types.
//! Only compiled on `wasm32` targets.

use js_sys::{Array, Object, Reflect, Uint32Array};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::runner_core::RunnerCore;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

/// Browser runner for the duocount counter.
///
/// Host-driven: JavaScript owns the loop, pushing input and advancing time
/// each animation frame, then calling `step`.
#[wasm_bindgen]
pub struct CounterRunner {
    inner: RunnerCore,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl CounterRunner {
    /// Create a runner with the given viewport (cols, rows).
    #[wasm_bindgen(constructor)]
    pub fn new(cols: u16, rows: u16) -> Self {
        install_panic_hook();
        Self {
            inner: RunnerCore::new(cols, rows),
        }
    }

    /// Create a runner from a JSON config object. Throws on invalid config.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<CounterRunner, JsValue> {
        install_panic_hook();
        RunnerCore::from_config_json(json)
            .map(|inner| Self { inner })
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Mount the app and render the first frame.
    pub fn init(&mut self) {
        self.inner.init();
    }

    /// Advance the deterministic clock by `dt_ms` milliseconds.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) {
        self.inner.advance_time_ms(dt_ms);
    }

    /// Set the deterministic clock to absolute nanoseconds (replay mode).
    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&mut self, ts_ns: f64) {
        self.inner.set_time_ns(ts_ns);
    }

    /// Queue a primary press at cell `(x, y)`.
    #[wasm_bindgen(js_name = pushClick)]
    pub fn push_click(&mut self, x: u16, y: u16) {
        self.inner.push_click(x, y);
    }

    /// Queue a key press. Only the first character of `key` is used.
    #[wasm_bindgen(js_name = pushKey)]
    pub fn push_key(&mut self, key: &str) -> bool {
        match key.chars().next() {
            Some(c) => {
                self.inner.push_key(c);
                true
            }
            None => false,
        }
    }

    /// Queue activation of a control by hit id.
    pub fn activate(&mut self, id: u32) {
        self.inner.activate(id);
    }

    /// Apply `{ type, quantity }`. Returns `false` if it was rejected.
    #[wasm_bindgen(js_name = pushCounterUpdate)]
    pub fn push_counter_update(&mut self, json: &str) -> bool {
        self.inner.push_counter_update(json)
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.inner.resize(cols, rows);
    }

    /// Process pending input and timers.
    /// Returns `{ running, rendered, events_processed, tasks_run, frame_idx }`.
    pub fn step(&mut self) -> JsValue {
        let result = self.inner.step();
        let obj = Object::new();
        set_js(&obj, "running", result.running.into());
        set_js(&obj, "rendered", result.rendered.into());
        set_js(&obj, "events_processed", result.events_processed.into());
        set_js(&obj, "tasks_run", result.tasks_run.into());
        set_js(&obj, "frame_idx", JsValue::from_f64(result.frame_idx as f64));
        obj.into()
    }

    /// Last rendered frame as newline-separated text rows.
    #[wasm_bindgen(js_name = frameText)]
    pub fn frame_text(&self) -> String {
        self.inner.frame_text()
    }

    /// `{ language, phase, counter, content }` as a JSON string.
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> String {
        self.inner.state_json()
    }

    /// Last patch batch: `{ spans: Uint32Array, cells: Uint32Array }`.
    pub fn patches(&self) -> JsValue {
        let flat = self.inner.flat_patches();
        let obj = Object::new();
        set_js(&obj, "spans", Uint32Array::from(flat.spans.as_slice()).into());
        set_js(&obj, "cells", Uint32Array::from(flat.cells.as_slice()).into());
        obj.into()
    }

    /// Patch upload stats: `{ dirty_cells, patch_count, bytes_uploaded }`, or `null`.
    #[wasm_bindgen(js_name = patchStats)]
    pub fn patch_stats(&self) -> JsValue {
        match self.inner.patch_stats() {
            Some(stats) => {
                let obj = Object::new();
                set_js(&obj, "dirty_cells", stats.dirty_cells.into());
                set_js(&obj, "patch_count", stats.patch_count.into());
                set_js(
                    &obj,
                    "bytes_uploaded",
                    JsValue::from_f64(stats.bytes_uploaded as f64),
                );
                obj.into()
            }
            None => JsValue::NULL,
        }
    }

    /// Log lines produced since the last call.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&mut self) -> Array {
        let arr = Array::new();
        for log in self.inner.take_logs() {
            arr.push(&JsValue::from_str(&log));
        }
        arr
    }

    /// Milliseconds until the next pending fetch, or `undefined`.
    #[wasm_bindgen(js_name = nextDeadlineMs)]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.inner.next_deadline_ms()
    }

    #[wasm_bindgen(js_name = frameIdx)]
    pub fn frame_idx(&self) -> f64 {
        self.inner.frame_idx() as f64
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }
}
