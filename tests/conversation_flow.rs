//! End-to-end conversation tests over the bundled museum script.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use flowbot::adapters::ai::MockClassifier;
use flowbot::domain::conversation::{ConversationEngine, EngineSettings, InputEvent};
use flowbot::domain::script::ScriptRegistry;

const MUSEUM_SCRIPT: &str = include_str!("../scripts/museum.dsl");

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn engine(classifier: MockClassifier) -> ConversationEngine {
    let loaded = ScriptRegistry::load(MUSEUM_SCRIPT).expect("bundled script should load");
    assert!(loaded.warnings.is_empty(), "bundled script has duplicate steps");
    ConversationEngine::new(
        Arc::new(loaded.registry),
        Arc::new(classifier),
        EngineSettings::default(),
    )
}

#[test]
fn bundled_script_has_no_dangling_targets() {
    let loaded = ScriptRegistry::load(MUSEUM_SCRIPT).unwrap();
    let registry = loaded.registry;

    for name in registry.step_names() {
        let step = registry.get(name).unwrap();
        let mut targets: Vec<&str> = step.branches().map(|(_, t)| t).collect();
        targets.extend(step.default_target());
        targets.extend(step.silence_target());
        for target in targets {
            assert!(
                registry.contains(target),
                "step '{}' references undefined step '{}'",
                name,
                target
            );
        }
    }
}

#[tokio::test]
async fn ticket_enquiry_walks_the_scripted_path() {
    let engine = engine(MockClassifier::new());
    let (mut session, opening) = engine.start(at(0));

    assert_eq!(opening.current_step, "welcome");
    assert_eq!(opening.messages.len(), 2);
    assert!(!opening.ended);

    let turn = engine
        .process(&mut session, InputEvent::user_text("我想买门票", at(5)))
        .await;
    assert_eq!(turn.current_step, "ticketProc");
    assert!(turn.messages[0].contains("成人票60元"));

    let turn = engine
        .process(&mut session, InputEvent::user_text("要一张学生票", at(10)))
        .await;
    assert_eq!(turn.current_step, "studentProc");

    let turn = engine
        .process(&mut session, InputEvent::user_text("没有", at(15)))
        .await;
    assert_eq!(turn.current_step, "exitProc");
    assert!(turn.ended);
    assert!(turn.messages[0].contains("再见"));
}

#[tokio::test]
async fn unmatched_text_lands_in_the_fallback_step() {
    let engine = engine(MockClassifier::new());
    let (mut session, _) = engine.start(at(0));

    let turn = engine
        .process(&mut session, InputEvent::user_text("嗯嗯嗯", at(5)))
        .await;

    assert_eq!(turn.current_step, "defaultProc");
    assert!(turn.messages[0].contains("没有听清"));
    assert!(!turn.ended);
}

#[tokio::test]
async fn classifier_answer_routes_free_form_text() {
    let classifier = MockClassifier::new().with_answer(Some("开放时间"));
    let engine = engine(classifier);
    let (mut session, _) = engine.start(at(0));

    let turn = engine
        .process(&mut session, InputEvent::user_text("几点关门呀", at(5)))
        .await;

    assert_eq!(turn.current_step, "timeProc");
    assert!(turn.messages[0].contains("8:30"));
}

#[tokio::test]
async fn silence_escalates_through_reminder_to_goodbye() {
    let engine = engine(MockClassifier::new());
    let (mut session, _) = engine.start(at(0));

    // Below both thresholds: nothing happens.
    let turn = engine.process(&mut session, InputEvent::idle_tick(at(5))).await;
    assert!(turn.no_op);
    assert_eq!(turn.current_step, "welcome");

    // Soft timeout: reminder step speaks once.
    let turn = engine.process(&mut session, InputEvent::idle_tick(at(12))).await;
    assert_eq!(turn.current_step, "silenceProc");
    assert_eq!(turn.silence_count, 1);
    assert!(turn.messages[0].contains("还在线吗"));

    // Hard timeout measured from the original silence span: the reminder
    // step's silence edge leads to the scripted goodbye.
    let turn = engine.process(&mut session, InputEvent::idle_tick(at(31))).await;
    assert_eq!(turn.current_step, "exitProc");
    assert!(turn.ended);
}

#[tokio::test]
async fn answering_the_reminder_resumes_the_flow() {
    let engine = engine(MockClassifier::new());
    let (mut session, _) = engine.start(at(0));

    engine.process(&mut session, InputEvent::idle_tick(at(12))).await;
    let turn = engine
        .process(&mut session, InputEvent::user_text("门票", at(14)))
        .await;

    assert_eq!(turn.current_step, "ticketProc");
    assert_eq!(turn.silence_count, 0);
    // A fresh silence span: the full hard timeout is available again.
    assert_eq!(turn.remaining_total_silence_secs, 30.0);
}

#[tokio::test]
async fn exit_phrase_ends_from_any_step() {
    let engine = engine(MockClassifier::new());
    let (mut session, _) = engine.start(at(0));

    engine
        .process(&mut session, InputEvent::user_text("游玩攻略", at(5)))
        .await;
    let turn = engine
        .process(&mut session, InputEvent::user_text("再见", at(10)))
        .await;

    assert_eq!(turn.current_step, "exitProc");
    assert!(turn.ended);
}
