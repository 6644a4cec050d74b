#![warn(missing_docs)]
//! # mediaguard-contract
//!
//! ## Purpose
//! Defines the wire shapes returned by the media-authentication service and
//! lenient parsers for them.
//!
//! ## Responsibilities
//! - Parse image and video result documents into one [`RawResultDocument`].
//! - Tag documents as image or video results ([`ResultVariant`]).
//! - Classify each method breakdown entry as a video-style or image-style
//!   record ([`MethodRecord`]).
//! - Parse service probe documents and structured error bodies.
//!
//! ## Data flow
//! Response body bytes -> [`parse_result_document`] -> result normalizer.
//!
//! ## Ownership and lifetimes
//! Parsed values are owned so they can outlive the transport buffer.
//!
//! ## Error model
//! Only bodies that are not JSON objects fail with [`AnalysisContractError`].
//! Every documented field is optional; absence is represented with `None`,
//! never with a sentinel value. A field of an unexpected JSON type reads as
//! absent, and counts accept integral floats (`12.0`).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Key of the method breakdown field that marks a video-style record.
pub const VIDEO_STYLE_MARKER: &str = "average_score";

/// Overall scores block (`analysis` for images, `overall_analysis` for videos).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Deepfake probability in [0, 100].
    #[serde(default, deserialize_with = "lenient::number")]
    pub deepfake_probability: Option<f64>,
    /// Backend verdict label.
    #[serde(default, deserialize_with = "lenient::text")]
    pub verdict: Option<String>,
    /// Backend risk tier label.
    #[serde(default, deserialize_with = "lenient::text")]
    pub risk_level: Option<String>,
    /// Backend confidence score.
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence_score: Option<f64>,
}

/// Video metadata reported for video results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Clip duration in seconds.
    #[serde(default, deserialize_with = "lenient::number")]
    pub duration_seconds: Option<f64>,
    /// Frames per second.
    #[serde(default, deserialize_with = "lenient::number")]
    pub fps: Option<f64>,
    /// Total frames in the clip.
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_frames: Option<u64>,
    /// Frames the backend sampled.
    #[serde(default, deserialize_with = "lenient::count")]
    pub frames_analyzed: Option<u64>,
}

/// Per-frame score statistics reported for video results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Mean frame score.
    #[serde(default, deserialize_with = "lenient::number")]
    pub mean_score: Option<f64>,
    /// Highest frame score.
    #[serde(default, deserialize_with = "lenient::number")]
    pub max_score: Option<f64>,
    /// Lowest frame score.
    #[serde(default, deserialize_with = "lenient::number")]
    pub min_score: Option<f64>,
    /// Variance of frame scores.
    #[serde(default, deserialize_with = "lenient::number")]
    pub score_variance: Option<f64>,
    /// Number of frames flagged as suspicious.
    #[serde(default, deserialize_with = "lenient::count")]
    pub suspicious_frame_count: Option<u64>,
}

/// One flagged video frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousSegment {
    /// Frame index within the clip.
    #[serde(default, deserialize_with = "lenient::count")]
    pub frame: Option<u64>,
    /// Frame timestamp in seconds.
    #[serde(default, deserialize_with = "lenient::number")]
    pub timestamp: Option<f64>,
    /// Detection confidence in [0, 1].
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence: Option<f64>,
}

/// Result document as returned by any of the three analysis operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResultDocument {
    /// Uploaded file name, or the video title for URL analyses.
    #[serde(default, deserialize_with = "lenient::text")]
    pub filename: Option<String>,
    /// Origin marker (`youtube` for URL analyses).
    #[serde(default, deserialize_with = "lenient::text")]
    pub source: Option<String>,
    /// Submitted URL for URL analyses.
    #[serde(default, deserialize_with = "lenient::text")]
    pub url: Option<String>,
    /// Source duration reported by the downloader, in seconds.
    #[serde(default, deserialize_with = "lenient::number")]
    pub duration: Option<f64>,
    /// Top-level scores block (image results).
    #[serde(default, deserialize_with = "lenient::block")]
    pub analysis: Option<AnalysisSummary>,
    /// Alternate scores block (video results).
    #[serde(default, deserialize_with = "lenient::block")]
    pub overall_analysis: Option<AnalysisSummary>,
    /// Per-method records keyed by method name, in document order.
    #[serde(default, deserialize_with = "lenient::object")]
    pub method_breakdown: Option<Map<String, Value>>,
    /// Video metadata.
    #[serde(default, deserialize_with = "lenient::block")]
    pub video_info: Option<VideoInfo>,
    /// Video score statistics.
    #[serde(default, deserialize_with = "lenient::block")]
    pub statistics: Option<Statistics>,
    /// Flagged frames, most suspicious first.
    #[serde(default, deserialize_with = "lenient::list")]
    pub suspicious_segments: Option<Vec<SuspiciousSegment>>,
}

/// Result document tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultVariant {
    /// Single-image result.
    Image,
    /// Video result (file or URL).
    Video,
}

impl RawResultDocument {
    /// Tags the document: any video-only section makes it a video result.
    pub fn variant(&self) -> ResultVariant {
        if self.statistics.is_some() || self.video_info.is_some() {
            ResultVariant::Video
        } else {
            ResultVariant::Image
        }
    }

    /// Returns method breakdown entries in document order.
    ///
    /// A missing breakdown yields an empty list.
    pub fn method_records(&self) -> Vec<(String, MethodRecord)> {
        self.method_breakdown
            .iter()
            .flat_map(|breakdown| breakdown.iter())
            .map(|(name, value)| (name.clone(), MethodRecord::from_value(value)))
            .collect()
    }
}

/// Method record aggregated over sampled video frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoMethodRecord {
    /// Mean method score across frames.
    pub average_score: Option<f64>,
    /// Backend weight of this method.
    pub weight: Option<f64>,
    /// Backend contribution in percent.
    pub contribution: Option<f64>,
    /// Suspicious flag, when the backend sends one.
    pub suspicious: Option<bool>,
    /// Free-text details, when the backend sends them.
    pub details: Option<String>,
}

/// Method record for one analyzed image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageMethodRecord {
    /// Method score.
    pub score: Option<f64>,
    /// Suspicious flag.
    pub suspicious: Option<bool>,
    /// Free-text details.
    pub details: Option<String>,
}

/// One method breakdown entry, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodRecord {
    /// Record carrying `average_score`.
    Video(VideoMethodRecord),
    /// Any other record.
    Image(ImageMethodRecord),
}

impl MethodRecord {
    /// Classifies a raw breakdown value.
    ///
    /// The record is video-style iff the `average_score` key is present,
    /// whatever its value and whatever other keys accompany it. Fields with an
    /// unexpected JSON type read as absent.
    pub fn from_value(value: &Value) -> Self {
        let number = |key: &str| value.get(key).and_then(Value::as_f64);
        let flag = value.get("suspicious").and_then(Value::as_bool);
        let details = value
            .get("details")
            .and_then(Value::as_str)
            .map(str::to_string);

        if value.get(VIDEO_STYLE_MARKER).is_some() {
            Self::Video(VideoMethodRecord {
                average_score: number(VIDEO_STYLE_MARKER),
                weight: number("weight"),
                contribution: number("contribution"),
                suspicious: flag,
                details,
            })
        } else {
            Self::Image(ImageMethodRecord {
                score: number("score"),
                suspicious: flag,
                details,
            })
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Health label (`healthy` when up).
    pub status: String,
    /// Service identifier.
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    /// Returns `true` when the service reports itself healthy.
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name.
    pub service: String,
    /// Service version.
    #[serde(default)]
    pub version: Option<String>,
    /// Operational status label.
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the learned detector is loaded.
    #[serde(default)]
    pub ai_enabled: Option<bool>,
    /// Detection methods the backend runs.
    #[serde(default)]
    pub detection_methods: Vec<String>,
    /// Advertised accuracy band.
    #[serde(default)]
    pub accuracy: Option<String>,
}

mod lenient {
    //! Field decoders that read unexpected JSON types as absent.

    use super::*;

    fn raw<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
        Option::<Value>::deserialize(deserializer)
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(raw(deserializer)?.as_ref().and_then(Value::as_f64))
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        Ok(raw(deserializer)?.as_ref().and_then(|value| {
            value.as_u64().or_else(|| {
                value
                    .as_f64()
                    .filter(|number| {
                        number.fract() == 0.0 && *number >= 0.0 && *number <= u64::MAX as f64
                    })
                    .map(|number| number as u64)
            })
        }))
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(raw(deserializer)?
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    pub fn object<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Map<String, Value>>, D::Error> {
        Ok(match raw(deserializer)? {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        })
    }

    pub fn block<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match raw(deserializer)? {
            Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
            _ => None,
        })
    }

    /// Non-object entries are skipped; a non-array reads as absent.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match raw(deserializer)? {
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .filter(Value::is_object)
                    .filter_map(|item| serde_json::from_value(item).ok())
                    .collect(),
            ),
            _ => None,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// Parses a result document body.
///
/// # Errors
/// Returns [`AnalysisContractError::Decode`] for invalid JSON and
/// [`AnalysisContractError::InvalidContract`] when the body is not a JSON
/// object.
pub fn parse_result_document(raw: &[u8]) -> Result<RawResultDocument, AnalysisContractError> {
    let value: Value = serde_json::from_slice(raw)?;
    if !value.is_object() {
        return Err(AnalysisContractError::InvalidContract(
            "result document is not a JSON object".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// Parses a `GET /health` body.
///
/// # Errors
/// Returns [`AnalysisContractError::Decode`] for invalid JSON.
pub fn parse_health(raw: &[u8]) -> Result<HealthStatus, AnalysisContractError> {
    Ok(serde_json::from_slice(raw)?)
}

/// Parses a `GET /` body.
///
/// # Errors
/// Returns [`AnalysisContractError::Decode`] for invalid JSON.
/// Returns [`AnalysisContractError::InvalidContract`] when `service` is blank.
pub fn parse_service_info(raw: &[u8]) -> Result<ServiceInfo, AnalysisContractError> {
    let parsed: ServiceInfo = serde_json::from_slice(raw)?;
    if parsed.service.trim().is_empty() {
        return Err(AnalysisContractError::InvalidContract(
            "service is empty".to_string(),
        ));
    }
    Ok(parsed)
}

/// Extracts the structured `detail` message from an error body, if any.
///
/// Returns `None` for non-JSON bodies, missing or empty details. Non-string
/// details are rendered as compact JSON.
pub fn error_detail(raw: &[u8]) -> Option<String> {
    let body: ErrorBody = serde_json::from_slice(raw).ok()?;
    let detail = match body.detail? {
        Value::String(text) => text,
        Value::Null => return None,
        other => other.to_string(),
    };
    (!detail.is_empty()).then_some(detail)
}

/// Contract parsing errors.
#[derive(Debug, Error)]
pub enum AnalysisContractError {
    /// JSON decode failure.
    #[error("result decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Parsed payload violates contract invariants.
    #[error("result contract violation: {0}")]
    InvalidContract(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for document tagging and record classification.

    use super::*;
    use serde_json::json;

    #[test]
    fn average_score_marks_video_style_even_with_image_fields() {
        let record = MethodRecord::from_value(&json!({
            "average_score": 0.7,
            "weight": 0.45,
            "contribution": 31.5,
            "suspicious": false,
            "score": 0.1
        }));
        match record {
            MethodRecord::Video(video) => {
                assert_eq!(video.average_score, Some(0.7));
                assert_eq!(video.suspicious, Some(false));
            }
            MethodRecord::Image(_) => panic!("record should be video-style"),
        }
    }

    #[test]
    fn null_average_score_still_counts_as_present() {
        let record = MethodRecord::from_value(&json!({ "average_score": null, "score": 0.5 }));
        assert!(matches!(
            record,
            MethodRecord::Video(VideoMethodRecord {
                average_score: None,
                ..
            })
        ));
    }

    #[test]
    fn preserves_breakdown_order() {
        let raw = br#"{"method_breakdown":{"zeta":{"score":0.1},"alpha":{"score":0.2}}}"#;
        let document = parse_result_document(raw).expect("document should parse");
        let names: Vec<String> = document
            .method_records()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(document.variant(), ResultVariant::Image);
    }

    #[test]
    fn rejects_non_object_bodies() {
        assert!(matches!(
            parse_result_document(b"[1,2]"),
            Err(AnalysisContractError::InvalidContract(_))
        ));
        assert!(matches!(
            parse_result_document(b"<html>"),
            Err(AnalysisContractError::Decode(_))
        ));
    }

    #[test]
    fn integral_float_counts_are_accepted() {
        let raw = br#"{
            "overall_analysis": {"deepfake_probability": 82},
            "video_info": {"total_frames": 300.0, "frames_analyzed": 10},
            "statistics": {"suspicious_frame_count": 12.0},
            "suspicious_segments": [{"frame": 45.0, "timestamp": 1.5, "confidence": 0.88}]
        }"#;
        let document = parse_result_document(raw).expect("integral floats should decode");

        let statistics = document.statistics.expect("statistics present");
        assert_eq!(statistics.suspicious_frame_count, Some(12));
        let info = document.video_info.expect("video info present");
        assert_eq!(info.total_frames, Some(300));
        let segments = document.suspicious_segments.expect("segments present");
        assert_eq!(segments[0].frame, Some(45));
    }

    #[test]
    fn wrongly_typed_fields_read_as_absent() {
        let raw = br#"{
            "filename": 3,
            "analysis": {"deepfake_probability": 40, "risk_level": 7, "verdict": "SUSPICIOUS"},
            "overall_analysis": "n/a",
            "statistics": {"suspicious_frame_count": 2.5, "mean_score": "high"},
            "suspicious_segments": [{"frame": -1, "timestamp": 2.0}, 5],
            "method_breakdown": []
        }"#;
        let document = parse_result_document(raw).expect("document should still decode");

        assert_eq!(document.filename, None);
        let analysis = document.analysis.as_ref().expect("analysis present");
        assert_eq!(analysis.deepfake_probability, Some(40.0));
        assert_eq!(analysis.risk_level, None);
        assert_eq!(analysis.verdict.as_deref(), Some("SUSPICIOUS"));
        assert_eq!(document.overall_analysis, None);
        assert_eq!(document.statistics, Some(Statistics::default()));
        let segments = document.suspicious_segments.as_ref().expect("segments present");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].frame, None);
        assert_eq!(segments[0].timestamp, Some(2.0));
        assert!(document.method_records().is_empty());
    }

    #[test]
    fn extracts_error_detail() {
        assert_eq!(
            error_detail(br#"{"detail":"Failed to download video"}"#),
            Some("Failed to download video".to_string())
        );
        assert_eq!(error_detail(br#"{"detail":""}"#), None);
        assert_eq!(error_detail(b"Bad Gateway"), None);
    }
}
