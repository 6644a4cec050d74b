//! Integration tests for health and service information probes.

mod common;

use mediaguard_dispatch::{DispatchError, Operation, RequestBody};

#[test]
fn service_probe_tests_health_reports_healthy() {
    let (controller, transport) = common::controller();
    transport.push_ok(common::fixture("health"));

    let health = controller.client().health().expect("health should parse");
    assert!(health.is_healthy());
    assert_eq!(health.service.as_deref(), Some("deepfake-detection"));

    let requests = transport.requests();
    assert_eq!(requests[0].operation, Operation::Health);
    assert_eq!(requests[0].url.as_str(), "http://localhost:8000/health");
    assert_eq!(requests[0].body, RequestBody::Empty);
}

#[test]
fn service_probe_tests_service_info_lists_methods() {
    let (controller, transport) = common::controller();
    transport.push_ok(common::fixture("service-info"));

    let info = controller
        .client()
        .service_info()
        .expect("service info should parse");
    assert_eq!(info.service, "Deepfake Detection API");
    assert_eq!(info.ai_enabled, Some(true));
    assert!(info.detection_methods.iter().any(|method| method == "ml_model"));
    assert_eq!(transport.requests()[0].url.as_str(), "http://localhost:8000/");
}

#[test]
fn service_probe_tests_non_success_probe_is_an_error() {
    let (controller, transport) = common::controller();
    transport.push_status(503, "Service Unavailable", "");

    let error = controller.client().health().expect_err("503 should fail");
    assert_eq!(
        error,
        DispatchError::AnalysisFailed {
            status: 503,
            message: "health probe failed: 503 Service Unavailable".to_string(),
        }
    );
}
