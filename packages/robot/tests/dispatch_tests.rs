//! Dispatch tests for the robot crate
//!
//! This tests:
//! - Registration validation and dedup
//! - Handler ordering and failure propagation
//! - Batch processing under both failure policies

use ripple_editor::{DocumentEditor, TextFormat};
use ripple_model::{Blip, BlipId, Context, OperationKind, Wavelet};
use ripple_robot::{
    Batch, ConfigurationError, Event, EventKind, FailurePolicy, Robot, RobotError, RobotProfile,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const WAVELET: &str = "example.com!conv+root";

fn context() -> (Context, BlipId) {
    let root = BlipId::confirmed("b+root");
    let mut ctx = Context::new();
    ctx.insert_wavelet(Wavelet::new(WAVELET, "example.com!w+abc").with_root_blip(root.clone()));
    ctx.insert_blip(Blip::new(root.clone(), "example.com!w+abc", WAVELET).with_content("hi"));
    (ctx, root)
}

fn append(event: &Event, ctx: &mut Context, text: &str) -> Result<(), RobotError> {
    let id = event
        .blip_id()
        .cloned()
        .ok_or_else(|| RobotError::handler("event has no blip"))?;
    DocumentEditor::open(ctx, &id)?.append_text(text, TextFormat::Plain)?;
    Ok(())
}

fn robot() -> Robot {
    Robot::builder(RobotProfile::default())
        .capability("first", |event, ctx| append(event, ctx, " one"))
        .capability("second", |event, ctx| append(event, ctx, " two"))
        .capability("broken", |_, _| Err(RobotError::handler("boom")))
        .build()
}

#[test]
fn test_registration_errors_leave_table_untouched() {
    let mut robot = robot();

    let err = robot.register_handler("BLIP_EXPLODED", "first").unwrap_err();
    assert_eq!(err.to_string(), "Unknown event: BLIP_EXPLODED");

    let err = robot.register_handler("BLIP_SUBMITTED", "third").unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidHandler(ref name) if name == "third"));

    assert_eq!(robot.handled_kinds().count(), 0);
}

#[test]
fn test_unhandled_kind_is_noop() {
    let robot = robot();
    let (mut ctx, root) = context();

    let event = Event::new(EventKind::DocumentChanged, "fred@example.com").on_blip(root.clone());
    robot.handle_event(&event, &mut ctx).unwrap();

    assert!(ctx.operations().is_empty());
    assert_eq!(ctx.blip_count(), 1);
    assert_eq!(ctx.blip(&root).unwrap().content, "hi");
    assert!(ctx.blip(&root).unwrap().child_blip_ids.is_empty());
}

#[test]
fn test_handlers_run_in_registration_order() {
    let mut robot = robot();
    robot.register_handler("BLIP_SUBMITTED", "second").unwrap();
    robot.register_handler("BLIP_SUBMITTED", "first").unwrap();
    robot.register_handler("BLIP_SUBMITTED", "second").unwrap();

    let (mut ctx, root) = context();
    let event = Event::new(EventKind::BlipSubmitted, "fred@example.com").on_blip(root.clone());
    robot.handle_event(&event, &mut ctx).unwrap();

    // Each handler sees the previous handler's edits
    assert_eq!(ctx.blip(&root).unwrap().content, "hi two one");
    let texts: Vec<_> = ctx.operations().iter().filter_map(|op| op.text()).collect();
    assert_eq!(texts, vec![" two", " one"]);
}

#[test]
fn test_failure_skips_remaining_handlers() {
    let mut robot = robot();
    robot.register(EventKind::BlipSubmitted, "first").unwrap();
    robot.register(EventKind::BlipSubmitted, "broken").unwrap();
    robot.register(EventKind::BlipSubmitted, "second").unwrap();

    let (mut ctx, root) = context();
    let event = Event::new(EventKind::BlipSubmitted, "fred@example.com").on_blip(root);
    let err = robot.handle_event(&event, &mut ctx).unwrap_err();

    assert!(matches!(err, RobotError::Handler(ref msg) if msg == "boom"));
    assert_eq!(ctx.operations().len(), 1);
    assert_eq!(ctx.operations()[0].text(), Some(" one"));
}

#[test]
fn test_editor_errors_propagate() {
    let mut robot = robot();
    robot.register(EventKind::BlipSubmitted, "first").unwrap();

    let (mut ctx, _) = context();
    let event = Event::new(EventKind::BlipSubmitted, "fred@example.com")
        .on_blip(BlipId::confirmed("b+missing"));

    let err = robot.handle_event(&event, &mut ctx).unwrap_err();
    assert!(matches!(err, RobotError::Editor(_)));
}

#[test]
fn test_handlers_are_shared_state_safe() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut robot = Robot::builder(RobotProfile::default())
        .capability("wavelet_self_added", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .build();
    assert_eq!(robot.register_conventional_handlers(), 1);

    let robot = Arc::new(robot);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let robot = Arc::clone(&robot);
            std::thread::spawn(move || {
                let mut ctx = Context::new();
                let event = Event::new(EventKind::WaveletSelfAdded, "fred@example.com");
                robot.handle_event(&event, &mut ctx).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

fn batch() -> Batch {
    let json = r#"{
        "wavelets": [{
            "id": "example.com!conv+root",
            "waveId": "example.com!w+abc",
            "rootBlipId": "b+root"
        }],
        "blips": [{
            "blipId": "b+root",
            "waveId": "example.com!w+abc",
            "waveletId": "example.com!conv+root",
            "content": "hi"
        }],
        "events": [
            {"type": "BLIP_SUBMITTED", "properties": {"blipId": "b+root"}},
            {"type": "DOCUMENT_CHANGED", "properties": {"blipId": "b+root"}},
            {"type": "BLIP_SUBMITTED", "properties": {"blipId": "b+root"}}
        ]
    }"#;
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_process_batch_abort_keeps_earlier_operations() {
    let mut robot = robot();
    robot.register(EventKind::BlipSubmitted, "first").unwrap();
    robot.register(EventKind::DocumentChanged, "broken").unwrap();

    let outcome = robot.process_batch(batch(), FailurePolicy::Abort);

    assert!(!outcome.is_clean());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].index, 1);
    assert_eq!(outcome.failures[0].kind, EventKind::DocumentChanged);
    assert_eq!(outcome.operations.len(), 1);
    assert_eq!(outcome.operations[0].kind, OperationKind::DocumentAppend);
}

#[test]
fn test_process_batch_continue_runs_every_event() {
    let mut robot = robot();
    robot.register(EventKind::BlipSubmitted, "first").unwrap();
    robot.register(EventKind::DocumentChanged, "broken").unwrap();

    let outcome = robot.process_batch(batch(), FailurePolicy::Continue);

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.operations.len(), 2);
    assert!(outcome.operations.iter().all(|op| op.kind == OperationKind::DocumentAppend));
}

#[test]
fn test_process_clean_batch() {
    let mut robot = robot();
    robot.register(EventKind::BlipSubmitted, "second").unwrap();

    let outcome = robot.process_batch(batch(), FailurePolicy::Abort);
    assert!(outcome.is_clean());

    let json = serde_json::to_value(&outcome.operations).unwrap();
    assert_eq!(json[0]["type"], "DOCUMENT_APPEND");
    assert_eq!(json[0]["blipId"], "b+root");
    assert_eq!(json[0]["property"], " two");
}

#[test]
fn test_unknown_event_kinds_do_not_block_batch() {
    let mut robot = robot();
    robot.register(EventKind::BlipSubmitted, "first").unwrap();

    let json = r#"{
        "wavelets": [{"id": "example.com!conv+root", "waveId": "example.com!w+abc", "rootBlipId": "b+root"}],
        "blips": [{"blipId": "b+root", "waveId": "example.com!w+abc",
                   "waveletId": "example.com!conv+root", "content": "hi"}],
        "events": [
            {"type": "WAVELET_TAGS_CHANGED", "properties": {"blipId": "b+root"}},
            {"type": "BLIP_SUBMITTED", "properties": {"blipId": "b+root"}}
        ]
    }"#;
    let batch: Batch = serde_json::from_str(json).unwrap();
    assert_eq!(batch.events.len(), 1);

    let outcome = robot.process_batch(batch, FailurePolicy::Abort);
    assert!(outcome.is_clean());
    assert_eq!(outcome.operations.len(), 1);
    assert_eq!(outcome.operations[0].text(), Some(" one"));
}
