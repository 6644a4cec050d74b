//! Integration tests for alternate-location field precedence.

mod common;

use serde_json::json;

#[test]
fn result_precedence_tests_overall_analysis_wins_over_analysis() {
    let (mut controller, transport) = common::controller();
    let body = json!({
        "analysis": {
            "deepfake_probability": 10,
            "verdict": "LIKELY AUTHENTIC",
            "risk_level": "MINIMAL"
        },
        "overall_analysis": {
            "deepfake_probability": 90,
            "verdict": "HIGHLY LIKELY FAKE"
        }
    });
    transport.push_ok(body.to_string());

    controller
        .select_file(common::image_blob())
        .expect("file upload should be enabled");
    controller.analyze().expect("analysis should run");

    let result = controller.result().expect("analysis should succeed");
    assert_eq!(result.probability, Some(90.0));
    assert_eq!(result.verdict.as_deref(), Some("HIGHLY LIKELY FAKE"));
    // Resolved per field: overall_analysis has no risk level.
    assert_eq!(result.risk_level.as_deref(), Some("MINIMAL"));
    assert_eq!(result.confidence, None);
}

#[test]
fn result_precedence_tests_missing_summaries_render_placeholders() {
    let (mut controller, transport) = common::controller();
    transport.push_ok("{}");

    controller
        .select_file(common::image_blob())
        .expect("file upload should be enabled");
    controller.analyze().expect("analysis should run");

    let view = controller.view();
    let mediaguard_ui::ViewPhase::Results(results) = &view.phase else {
        panic!("empty object should still succeed");
    };
    assert_eq!(results.probability, "N/A");
    assert_eq!(results.risk.text, "N/A RISK");
    assert_eq!(results.risk.color, "#6b7280");
    assert_eq!(results.verdict.color, "#6b7280");
}

#[test]
fn result_precedence_tests_partial_video_sections_render_na() {
    let (mut controller, transport) = common::controller();
    let body = json!({
        "overall_analysis": { "deepfake_probability": 0 },
        "statistics": { "mean_score": 0.0 },
        "video_info": { "duration_seconds": 12.5 }
    });
    transport.push_ok(body.to_string());

    controller
        .select_file(common::video_blob())
        .expect("file upload should be enabled");
    controller.analyze().expect("analysis should run");

    let result = controller.result().expect("analysis should succeed");
    let stats = result.video_stats.as_ref().expect("statistics present");
    assert_eq!(stats.mean_score, Some(0.0));
    assert_eq!(stats.max_score, None);
    assert_eq!(stats.suspicious_frame_count, None);
    let info = result.video_info.as_ref().expect("video info present");
    assert_eq!(info.fps, None);
    assert_eq!(info.total_frames, None);

    let view = controller.view();
    let mediaguard_ui::ViewPhase::Results(results) = &view.phase else {
        panic!("partial video document should still succeed");
    };
    assert_eq!(results.probability, "0%");
    assert_eq!(results.video_badge.as_deref(), Some("12.5s | N/A FPS"));
    let values: Vec<(&str, &str)> = results
        .stats
        .iter()
        .map(|stat| (stat.label, stat.value.as_str()))
        .collect();
    assert_eq!(
        values,
        [
            ("Mean Score", "0"),
            ("Max Score", "N/A"),
            ("Min Score", "N/A"),
            ("Score Variance", "N/A"),
            ("Suspicious Frames", "N/A"),
        ]
    );
    assert!(results.details.is_empty());
}
