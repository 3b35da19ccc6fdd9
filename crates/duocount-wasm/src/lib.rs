#![forbid(unsafe_code)]

//! WASM runner for the duocount counter app.
//!
//! This crate provides [`CounterRunner`], a `wasm-bindgen`-exported struct
//! that wraps `duocount_web::step_program::StepProgram<CounterApp>` and
//! exposes it to JavaScript for host-driven execution.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::CounterRunner;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;

#[cfg(test)]
mod tests {
    use crate::runner_core::RunnerCore;
    use duocount::view::ids;
    use pretty_assertions::assert_eq;

    fn state(core: &RunnerCore) -> serde_json::Value {
        serde_json::from_str(&core.state_json()).expect("state json should parse")
    }

    fn ready_core() -> RunnerCore {
        let mut core = RunnerCore::new(48, 8);
        core.init();
        core.advance_time_ms(1000.0);
        core.step();
        core
    }

    #[test]
    fn init_renders_loading_frame() {
        let mut core = RunnerCore::new(48, 8);
        core.init();
        assert_eq!(core.frame_idx(), 1);
        assert_eq!(core.frame_text().lines().next(), Some("Loading..."));
        let json = state(&core);
        assert_eq!(json["phase"], "loading");
        assert_eq!(json["language"], "en");
        assert_eq!(json["counter"], 0);
    }

    #[test]
    fn step_before_init_initializes() {
        let mut core = RunnerCore::new(48, 8);
        let result = core.step();
        assert!(result.running);
        assert!(core.frame_idx() >= 1);
        assert!(core.take_logs().is_empty());
    }

    #[test]
    fn content_arrives_after_delay() {
        let mut core = RunnerCore::new(48, 8);
        core.init();
        core.advance_time_ms(999.0);
        assert_eq!(core.step().tasks_run, 0);
        assert_eq!(state(&core)["phase"], "loading");
        let remaining = core.next_deadline_ms().expect("fetch pending");
        assert!((remaining - 1.0).abs() < 1e-9);

        core.advance_time_ms(1.0);
        let result = core.step();
        assert_eq!(result.tasks_run, 1);
        assert!(result.rendered);
        let json = state(&core);
        assert_eq!(json["content"]["title"], "Tests example");
        assert!(core.frame_text().starts_with("Tests example\nChange Language"));
        assert_eq!(core.next_deadline_ms(), None);
    }

    #[test]
    fn clicks_and_activations() {
        let mut core = ready_core();
        core.push_click(22, 3);
        core.activate(ids::INCREASE_FIVE);
        core.activate(ids::DECREASE_ONE);
        let result = core.step();
        assert_eq!(result.events_processed, 3);
        assert_eq!(state(&core)["counter"], 5);
    }

    #[test]
    fn counter_update_json() {
        let mut core = ready_core();
        assert!(core.push_counter_update(r#"{"type":"increase","quantity":5}"#));
        assert!(core.push_counter_update(r#"{"type":"decrease"}"#));
        assert!(!core.push_counter_update(r#"{"type":"double"}"#));
        assert!(!core.push_counter_update("{"));
        assert!(core.step().rendered);
        assert_eq!(state(&core)["counter"], 4);
        assert!(core.frame_text().contains(" 4 "));

        let logs = core.take_logs();
        assert_eq!(logs.len(), 2);
        assert!(logs[0].starts_with("rejected_counter_update"));
    }

    #[test]
    fn unknown_counter_update_type_leaves_counter() {
        let mut core = ready_core();
        assert!(core.push_counter_update(r#"{"type":"increase","quantity":2}"#));
        core.step();
        assert!(!core.push_counter_update(r#"{"type":"reset"}"#));
        assert!(!core.push_counter_update(r#"{"type":"reset","quantity":9}"#));
        core.step();
        assert_eq!(state(&core)["counter"], 2);
        assert_eq!(
            core.take_logs(),
            vec![
                r#"rejected_counter_update: {"type":"reset"}"#.to_string(),
                r#"rejected_counter_update: {"type":"reset","quantity":9}"#.to_string(),
            ]
        );
    }

    #[test]
    fn deadline_tracks_latest_fetch_after_toggle() {
        let mut core = RunnerCore::new(48, 8);
        core.init();
        core.advance_time_ms(100.0);
        core.activate(ids::CHANGE_LANGUAGE);
        core.step();
        let remaining = core.next_deadline_ms().expect("pt fetch pending");
        assert!((remaining - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn language_toggle_logs_once() {
        let mut core = ready_core();
        core.activate(ids::CHANGE_LANGUAGE);
        core.step();
        assert_eq!(state(&core)["language"], "pt");
        assert_eq!(state(&core)["content"], serde_json::Value::Null);
        assert_eq!(core.take_logs(), vec!["language en -> pt".to_string()]);
        assert!(core.take_logs().is_empty());

        core.advance_time_ms(1000.0);
        core.step();
        assert_eq!(state(&core)["content"]["increment"], "Somar");
    }

    #[test]
    fn noisy_time_input_is_ignored() {
        let mut core = RunnerCore::new(48, 8);
        core.init();
        core.advance_time_ms(f64::NAN);
        core.advance_time_ms(-50.0);
        core.advance_time_ms(f64::INFINITY);
        core.step();
        assert_eq!(state(&core)["phase"], "loading");

        core.set_time_ns(1_000_000_000.0);
        core.step();
        assert_eq!(state(&core)["phase"], "ready");
    }

    #[test]
    fn resize_repaints_whole_buffer() {
        let mut core = ready_core();
        core.resize(30, 6);
        let result = core.step();
        assert!(result.rendered);
        let stats = core.patch_stats().expect("stats after render");
        assert_eq!(stats.patch_count, 1);
        assert_eq!(stats.dirty_cells, 30 * 6);
        let flat = core.flat_patches();
        assert_eq!(flat.spans, vec![0, 180]);
        assert_eq!(flat.cells.len(), 360);
        assert_eq!(core.frame_text().lines().count(), 6);
    }

    #[test]
    fn incremental_patches_after_counter_change() {
        let mut core = ready_core();
        core.activate(ids::INCREASE_ONE);
        core.step();
        let flat = core.flat_patches();
        // Only the digit cell changes: 0 -> 1.
        assert_eq!(flat.spans, vec![3 * 48 + 16, 1]);
        assert_eq!(flat.cells[0], u32::from('1'));
    }

    #[test]
    fn config_json() {
        let core = RunnerCore::from_config_json(
            r#"{"initial_language":"pt","fetch_delay_ms":10,"viewport":{"width":40,"height":6}}"#,
        )
        .expect("valid config");
        assert_eq!(state(&core)["language"], "pt");

        assert!(RunnerCore::from_config_json(r#"{"viewport":{"width":0}}"#).is_err());
        assert!(RunnerCore::from_config_json(r#"{"initial_language":"de"}"#).is_err());
    }

    #[test]
    fn quit_key_stops_runner() {
        let mut core = ready_core();
        core.push_key('q');
        assert!(!core.step().running);
        assert!(!core.is_running());
    }
}
