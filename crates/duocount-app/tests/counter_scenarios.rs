#![forbid(unsafe_code)]

use core::time::Duration;

use duocount::view::{LOADING_TEXT, ids};
use duocount::{CounterApp, CounterUpdate, Msg, Phase, StaleContentPolicy, StatePatch};
use duocount_core::event::{Activation, Event};
use duocount_i18n::{LabelBundle, Language};
use duocount_runtime::Model;
use duocount_web::step_program::StepProgram;
use pretty_assertions::assert_eq;

fn mounted(app: CounterApp) -> StepProgram<CounterApp> {
    let mut program = StepProgram::new(app, 48, 8);
    program.init().expect("init");
    program
}

fn title(program: &StepProgram<CounterApp>) -> Option<String> {
    program
        .model()
        .state()
        .content
        .as_ref()
        .map(|labels| labels.title().to_owned())
}

fn screen(program: &StepProgram<CounterApp>) -> Vec<String> {
    program.outputs().last_lines()
}

fn advance_to(program: &mut StepProgram<CounterApp>, ms: u64) {
    program.set_time(Duration::from_millis(ms));
    program.step().expect("step");
}

fn activate(program: &mut StepProgram<CounterApp>, id: u32) {
    program.push_event(Event::Activate(Activation::new(id)));
    program.step().expect("step");
}

#[test]
fn mounts_in_loading_state() {
    let program = mounted(CounterApp::new());
    let state = program.model().state();
    assert_eq!(state.language, Language::English);
    assert_eq!(state.content, None);
    assert_eq!(state.counter, 0);
    assert_eq!(state.phase(), Phase::Loading);
    assert_eq!(screen(&program)[0], LOADING_TEXT);
    assert_eq!(program.model().fetches_issued(), 1);
}

#[test]
fn counter_scenario() {
    let mut app = CounterApp::new();
    app.update(Msg::ChangeCounter(CounterUpdate::Increase { quantity: None }));
    assert_eq!(app.state().counter, 1);
    app.update(Msg::ChangeCounter(CounterUpdate::increase(5)));
    assert_eq!(app.state().counter, 6);
    app.update(Msg::ChangeCounter(CounterUpdate::decrease(5)));
    assert_eq!(app.state().counter, 1);
}

#[test]
fn unknown_update_type_is_noop() {
    assert_eq!(CounterUpdate::parse("reset", Some(1)), None);
    assert_eq!(CounterUpdate::from_json(r#"{"type":"reset","quantity":1}"#), None);

    let mut program = mounted(CounterApp::new());
    program.model_mut().merge_state(StatePatch::new().counter(3));
    for update in [r#"{"type":"reset"}"#, r#"{"quantity":2}"#, "not json"]
        .into_iter()
        .filter_map(CounterUpdate::from_json)
    {
        program.model_mut().change_counter(update);
    }
    program.push_event(Event::char('x'));
    program.step().expect("step");
    assert_eq!(program.model().state().counter, 3);
}

#[test]
fn english_content_after_delay() {
    let mut program = mounted(CounterApp::new());
    advance_to(&mut program, 999);
    assert_eq!(title(&program), None);
    assert_eq!(screen(&program)[0], LOADING_TEXT);

    advance_to(&mut program, 1000);
    assert_eq!(title(&program).as_deref(), Some("Tests example"));
    assert_eq!(program.model().state().phase(), Phase::Ready);
    assert_eq!(screen(&program)[0], "Tests example");
    assert_eq!(screen(&program)[3], "[ Decrease ]    0     [ Increment ]");
}

#[test]
fn switching_to_portuguese() {
    let mut program = mounted(CounterApp::new());
    advance_to(&mut program, 1000);

    // Click the change-language link.
    program.push_event(Event::click(3, 1));
    program.step().expect("step");
    let state = program.model().state();
    assert_eq!(state.language, Language::Portuguese);
    assert_eq!(state.content, None);
    assert_eq!(screen(&program)[0], LOADING_TEXT);
    assert_eq!(program.outputs().logs, vec!["language en -> pt".to_string()]);

    advance_to(&mut program, 1999);
    assert_eq!(title(&program), None);
    advance_to(&mut program, 2000);
    assert_eq!(title(&program).as_deref(), Some("Exemplo de tests"));
    assert_eq!(screen(&program)[1], "Trocar lingua");
    assert!(screen(&program)[3].starts_with("[ Diminuir ]"));
}

#[test]
fn two_toggles_round_trip() {
    let mut program = mounted(CounterApp::new());
    advance_to(&mut program, 1000);
    let issued = program.model().fetches_issued();

    activate(&mut program, ids::CHANGE_LANGUAGE);
    advance_to(&mut program, 2000);
    activate(&mut program, ids::CHANGE_LANGUAGE);
    advance_to(&mut program, 3000);

    assert_eq!(program.model().state().language, Language::English);
    assert_eq!(program.model().fetches_issued(), issued + 2);
    assert_eq!(title(&program).as_deref(), Some("Tests example"));
}

#[test]
fn buttons_drive_counter_through_clicks() {
    let mut program = mounted(CounterApp::new());
    advance_to(&mut program, 1000);

    for (x, y) in [(22, 3), (22, 3), (0, 5), (10, 5), (5, 3)] {
        program.push_event(Event::click(x, y));
    }
    let result = program.step().expect("step");
    assert_eq!(result.events_processed, 5);
    assert!(result.rendered);
    // +1 +1 +5 -5 -1
    assert_eq!(program.model().state().counter, 1);
    assert!(screen(&program)[3].contains(" 1 "));

    // The counter field itself is not clickable.
    program.push_event(Event::click(16, 3));
    program.step().expect("step");
    assert_eq!(program.model().state().counter, 1);
}

#[test]
fn clicks_after_language_change_miss_hidden_buttons() {
    let mut program = mounted(CounterApp::new());
    advance_to(&mut program, 1000);

    // Language link, then where [ Increment ] was drawn, in one step.
    program.push_event(Event::click(3, 1));
    program.push_event(Event::click(22, 3));
    program.push_event(Event::click(0, 5));
    let result = program.step().expect("step");
    assert_eq!(result.events_processed, 3);

    let state = program.model().state();
    assert_eq!(state.language, Language::Portuguese);
    assert_eq!(state.content, None);
    assert_eq!(state.counter, 0);
    assert_eq!(screen(&program)[0], LOADING_TEXT);
    assert_eq!(program.frame_idx(), 3);
}

#[test]
fn keyboard_shortcuts() {
    let mut program = mounted(CounterApp::new());
    for c in ['+', ']', ']', '-', '['] {
        program.push_event(Event::char(c));
    }
    program.step().expect("step");
    assert_eq!(program.model().state().counter, 5);

    program.push_event(Event::char('l'));
    program.step().expect("step");
    assert_eq!(program.model().state().language, Language::Portuguese);

    program.push_event(Event::char('q'));
    let result = program.step().expect("step");
    assert!(!result.running);
}

#[test]
fn stale_fetch_discarded_by_default() {
    let mut program = mounted(CounterApp::new());
    advance_to(&mut program, 100);
    activate(&mut program, ids::CHANGE_LANGUAGE);
    advance_to(&mut program, 200);
    activate(&mut program, ids::CHANGE_LANGUAGE);
    assert_eq!(program.model().state().language, Language::English);

    // Superseded fetches were cancelled and never resolve.
    advance_to(&mut program, 1000);
    assert_eq!(title(&program), None);
    advance_to(&mut program, 1100);
    assert_eq!(title(&program), None);
    assert_eq!(screen(&program)[0], LOADING_TEXT);

    advance_to(&mut program, 1200);
    assert_eq!(title(&program).as_deref(), Some("Tests example"));
    assert_eq!(program.pending_tasks(), 0);
}

#[test]
fn overwrite_policy_lets_stale_content_through() {
    let app = CounterApp::new().with_stale_policy(StaleContentPolicy::Overwrite);
    let mut program = mounted(app);
    advance_to(&mut program, 100);
    activate(&mut program, ids::CHANGE_LANGUAGE);
    advance_to(&mut program, 200);
    activate(&mut program, ids::CHANGE_LANGUAGE);

    advance_to(&mut program, 1000);
    assert_eq!(title(&program).as_deref(), Some("Tests example"));

    // The Portuguese fetch issued at t=100 lands while English is selected.
    advance_to(&mut program, 1100);
    assert_eq!(program.model().state().language, Language::English);
    assert_eq!(title(&program).as_deref(), Some("Exemplo de tests"));

    advance_to(&mut program, 1200);
    assert_eq!(title(&program).as_deref(), Some("Tests example"));
}

#[test]
fn counter_survives_language_change() {
    let mut program = mounted(CounterApp::new());
    advance_to(&mut program, 1000);
    activate(&mut program, ids::INCREASE_FIVE);
    activate(&mut program, ids::CHANGE_LANGUAGE);
    advance_to(&mut program, 2000);
    let state = program.model().state();
    assert_eq!(state.counter, 5);
    assert_eq!(state.content, Some(LabelBundle::builtin(Language::Portuguese)));
}
