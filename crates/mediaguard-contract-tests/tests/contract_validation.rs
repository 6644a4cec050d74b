//! Validates contract fixtures against frozen JSON schemas.

use mediaguard_contract::{
    ResultVariant, error_detail, parse_health, parse_result_document, parse_service_info,
};
use mediaguard_contract_tests::{compile_validator, fixture_path, load_json, validation_errors};
use mediaguard_core::AnalysisRequest;
use mediaguard_dispatch::{RequestBody, plan_request};
use serde_json::json;

fn fixture_bytes(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).expect("fixture should be readable")
}

#[test]
fn result_fixtures_match_schema() {
    let validator = compile_validator("analysis-result");
    for name in ["image-result", "video-result", "url-result"] {
        let fixture = load_json(&fixture_path(name));
        assert_eq!(
            validation_errors(&validator, &fixture),
            Vec::<String>::new(),
            "{name} fixture should validate against schema"
        );
    }
}

#[test]
fn probe_fixtures_match_schema() {
    for name in ["health", "service-info", "error-detail"] {
        let validator = compile_validator(name);
        let fixture = load_json(&fixture_path(name));
        assert!(
            validator.is_valid(&fixture),
            "{name} fixture should validate against schema"
        );
    }
}

#[test]
fn url_request_fixture_matches_schema() {
    let validator = compile_validator("url-analysis-request");
    let fixture = load_json(&fixture_path("url-analysis-request"));
    assert!(
        validator.is_valid(&fixture),
        "url request fixture should validate against schema"
    );
}

#[test]
fn planned_url_body_matches_request_schema() {
    let validator = compile_validator("url-analysis-request");
    let request = AnalysisRequest::Url {
        url: "https://www.youtube.com/watch?v=abc123".to_string(),
        sample_rate: mediaguard_core::DEFAULT_SAMPLE_RATE,
    };

    let (_, body) = plan_request(&request);
    let RequestBody::Json(body) = body else {
        panic!("url request should plan a json body");
    };
    assert!(
        validator.is_valid(&body),
        "planned body should validate: {:?}",
        validation_errors(&validator, &body)
    );
    assert_eq!(body, load_json(&fixture_path("url-analysis-request")));
}

#[test]
fn schema_rejects_mixed_method_record() {
    let validator = compile_validator("analysis-result");
    let document = json!({
        "method_breakdown": {
            "ml_model": { "average_score": "high" }
        }
    });
    assert!(!validator.is_valid(&document));
}

#[test]
fn schema_rejects_url_request_without_sample_rate() {
    let validator = compile_validator("url-analysis-request");
    assert!(!validator.is_valid(&json!({ "url": "https://youtu.be/x" })));
}

#[test]
fn fixtures_decode_with_client_contract() {
    let image = parse_result_document(&fixture_bytes("image-result"))
        .expect("image fixture should decode");
    assert_eq!(image.variant(), ResultVariant::Image);

    let video = parse_result_document(&fixture_bytes("video-result"))
        .expect("video fixture should decode");
    assert_eq!(video.variant(), ResultVariant::Video);

    let url = parse_result_document(&fixture_bytes("url-result"))
        .expect("url fixture should decode");
    assert_eq!(url.source.as_deref(), Some("youtube"));

    let health = parse_health(&fixture_bytes("health")).expect("health should decode");
    assert!(health.is_healthy());

    let info = parse_service_info(&fixture_bytes("service-info")).expect("info should decode");
    assert_eq!(info.detection_methods.len(), 4);

    assert_eq!(
        error_detail(&fixture_bytes("error-detail")).as_deref(),
        Some("Could not download video: unsupported URL")
    );
}

#[test]
fn schema_valid_integral_floats_decode() {
    let validator = compile_validator("analysis-result");
    let document = json!({
        "overall_analysis": { "deepfake_probability": 82 },
        "statistics": { "suspicious_frame_count": 12.0 },
        "video_info": { "total_frames": 300.0 },
        "suspicious_segments": [{ "frame": 45.0, "timestamp": 1.5, "confidence": 0.9 }]
    });
    assert_eq!(validation_errors(&validator, &document), Vec::<String>::new());

    let decoded = parse_result_document(document.to_string().as_bytes())
        .expect("schema-valid document should decode");
    let statistics = decoded.statistics.expect("statistics should decode");
    assert_eq!(statistics.suspicious_frame_count, Some(12));
    assert_eq!(decoded.suspicious_segments.expect("segments")[0].frame, Some(45));
}
