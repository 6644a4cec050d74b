//! Integration tests for the single in-flight analysis rule.

mod common;

use mediaguard_app::AppError;
use mediaguard_contract::parse_result_document;
use mediaguard_core::InputMode;
use mediaguard_lifecycle::{LifecycleError, LifecycleState};
use mediaguard_ui::ViewPhase;

#[test]
fn single_flight_tests_second_begin_is_a_noop_while_loading() {
    let (mut controller, transport) = common::controller();
    controller
        .select_file(common::image_blob())
        .expect("file upload should be enabled");

    let _pending = controller.begin_analysis().expect("idle should start");
    assert!(matches!(
        controller.begin_analysis(),
        Err(AppError::Lifecycle(LifecycleError::Busy))
    ));
    assert!(matches!(
        controller.analyze(),
        Err(AppError::Lifecycle(LifecycleError::Busy))
    ));
    assert_eq!(controller.state(), &LifecycleState::Loading);
    assert!(transport.requests().is_empty());
}

#[test]
fn single_flight_tests_input_changes_are_blocked_while_loading() {
    let (mut controller, _transport) = common::controller();
    controller
        .select_file(common::image_blob())
        .expect("file upload should be enabled");
    let _pending = controller.begin_analysis().expect("idle should start");

    assert!(matches!(
        controller.select_url("https://youtu.be/x"),
        Err(AppError::Lifecycle(LifecycleError::Busy))
    ));
    assert!(matches!(
        controller.set_mode(InputMode::UrlSubmission),
        Err(AppError::Lifecycle(LifecycleError::Busy))
    ));
    assert_eq!(controller.input().mode, InputMode::FileUpload);

    let view = controller.view();
    assert_eq!(view.phase, ViewPhase::Loading);
    assert_eq!(view.trigger_label, "Analyzing...");
    assert!(!view.trigger_enabled);
}

#[test]
fn single_flight_tests_worker_thread_completion_is_applied() {
    let (mut controller, transport) = common::controller();
    transport.push_ok(common::fixture("video-result"));
    controller
        .select_file(common::video_blob())
        .expect("file upload should be enabled");

    let pending = controller.begin_analysis().expect("idle should start");
    let client = controller.client().clone();
    let request = pending.request().clone();
    let token = pending.token().clone();
    let outcome = std::thread::spawn(move || client.dispatch(&request, &token))
        .join()
        .expect("worker should not panic");

    controller
        .complete_analysis(pending, outcome)
        .expect("in-flight ticket should complete");
    assert_eq!(
        controller.result().and_then(|result| result.probability),
        Some(82.0)
    );
}

#[test]
fn single_flight_tests_stale_completion_is_rejected() {
    let (mut controller, _transport) = common::controller();
    controller
        .select_file(common::image_blob())
        .expect("file upload should be enabled");

    let first = controller.begin_analysis().expect("idle should start");
    let late_copy = first.clone();
    controller
        .complete_analysis(first, Err(mediaguard_dispatch::DispatchError::Cancelled))
        .expect("first completion should apply");

    let second = controller.begin_analysis().expect("failed should restart");
    let document = parse_result_document(b"{}").expect("empty object should decode");
    assert!(matches!(
        controller.complete_analysis(late_copy, Ok(document)),
        Err(AppError::Lifecycle(LifecycleError::StaleTicket(1)))
    ));
    assert_eq!(controller.state(), &LifecycleState::Loading);
    assert_eq!(second.ticket().generation(), 2);
}
