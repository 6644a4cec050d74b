#![warn(missing_docs)]
//! # mediaguard-normalize
//!
//! ## Purpose
//! Reconciles the image and video result shapes into one display model.
//!
//! ## Responsibilities
//! - Resolve each overall score field independently, alternate block first.
//! - Normalize video-style and image-style method records to one shape.
//! - Carry video-only sections through without inventing zero values.
//!
//! ## Data flow
//! [`RawResultDocument`] -> [`normalize`] -> [`NormalizedResult`] -> lifecycle
//! state and presentation.
//!
//! ## Error model
//! Normalization is total. Every missing field resolves to a documented
//! fallback or to `None`; nothing here fails.

use mediaguard_contract::{
    AnalysisSummary, MethodRecord, RawResultDocument, ResultVariant, SuspiciousSegment,
};
use serde::Serialize;

/// Weight assumed for image-style records, which carry no backend weighting.
pub const IMAGE_METHOD_WEIGHT: f64 = 0.2;

/// Score above which an image-style record without a flag is suspicious.
pub const SUSPICIOUS_SCORE_THRESHOLD: f64 = 0.6;

/// Detail text shown when a record has none.
pub const NO_DETAILS_PLACEHOLDER: &str = "No details available";

/// Shape a method record arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MethodStyle {
    /// Aggregated over video frames (`average_score`, `weight`, `contribution`).
    Video,
    /// Single-image record (`score`, `suspicious`, `details`).
    Image,
}

/// One detection method in uniform shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedMethod {
    /// Raw breakdown key.
    pub key: String,
    /// Human-readable method name.
    pub name: String,
    /// Method score, 0 when the record has none.
    pub score: f64,
    /// Score exactly as reported, `None` when the record has none.
    pub reported_score: Option<f64>,
    /// Method weight in [0, 1].
    pub weight: f64,
    /// Contribution to the overall score, in percent.
    pub contribution_percent: f64,
    /// Whether this method flagged the media.
    pub is_suspicious: bool,
    /// Backend details or [`NO_DETAILS_PLACEHOLDER`].
    pub detail_text: String,
    /// Record shape as received.
    pub style: MethodStyle,
}

/// Video score statistics; each value is `None` when not reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoStats {
    /// Mean frame score.
    pub mean_score: Option<f64>,
    /// Highest frame score.
    pub max_score: Option<f64>,
    /// Lowest frame score.
    pub min_score: Option<f64>,
    /// Variance of frame scores.
    pub score_variance: Option<f64>,
    /// Number of flagged frames.
    pub suspicious_frame_count: Option<u64>,
}

/// Video metadata; each value is `None` when not reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoDetails {
    /// Clip duration in seconds.
    pub duration_seconds: Option<f64>,
    /// Frames per second.
    pub fps: Option<f64>,
    /// Total frames in the clip.
    pub total_frames: Option<u64>,
    /// Frames the backend sampled.
    pub frames_analyzed: Option<u64>,
}

/// One flagged frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Segment {
    /// Frame index within the clip.
    pub frame_index: Option<u64>,
    /// Frame timestamp in seconds.
    pub timestamp_seconds: Option<f64>,
    /// Detection confidence in [0, 1].
    pub confidence: Option<f64>,
}

/// Where the analyzed media came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaSource {
    /// File name or video title.
    pub filename: Option<String>,
    /// Origin marker (`youtube` for URL analyses).
    pub origin: Option<String>,
    /// Submitted URL.
    pub url: Option<String>,
    /// Duration reported by the downloader.
    pub duration_seconds: Option<f64>,
}

impl MediaSource {
    fn is_empty(&self) -> bool {
        self.filename.is_none()
            && self.origin.is_none()
            && self.url.is_none()
            && self.duration_seconds.is_none()
    }
}

/// Unified display model for one analysis.
///
/// Built fresh from each successful response and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResult {
    /// Image or video result.
    pub variant: ResultVariant,
    /// Deepfake probability in [0, 100].
    pub probability: Option<f64>,
    /// Verdict label.
    pub verdict: Option<String>,
    /// Risk tier label.
    pub risk_level: Option<String>,
    /// Backend confidence score.
    pub confidence: Option<f64>,
    /// Per-method breakdown in document order.
    pub methods: Vec<NormalizedMethod>,
    /// Video statistics, present only when the document has them.
    pub video_stats: Option<VideoStats>,
    /// Video metadata, present only when the document has it.
    pub video_info: Option<VideoDetails>,
    /// Flagged frames in document order.
    pub segments: Vec<Segment>,
    /// Media origin, present when any origin field is reported.
    pub source: Option<MediaSource>,
}

/// Returns the first present value, alternate location before top level.
///
/// Every overall score field goes through this one function so the
/// precedence rule stays in a single place.
pub fn resolve_field<T>(
    alternate: Option<&AnalysisSummary>,
    top_level: Option<&AnalysisSummary>,
    field: impl Fn(&AnalysisSummary) -> Option<T>,
) -> Option<T> {
    alternate
        .and_then(&field)
        .or_else(|| top_level.and_then(&field))
}

/// Converts a raw breakdown key into a display name.
///
/// Splits on `_` and upper-cases the first character of each segment:
/// `noise_analysis` becomes `Noise Analysis`.
pub fn display_name(key: &str) -> String {
    key.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Normalizes one method record.
pub fn normalize_method(key: &str, record: &MethodRecord) -> NormalizedMethod {
    let (reported_score, weight, contribution, suspicious, details, style) = match record {
        MethodRecord::Video(video) => (
            video.average_score,
            video.weight.unwrap_or(0.0),
            video.contribution,
            video.suspicious,
            video.details.clone(),
            MethodStyle::Video,
        ),
        MethodRecord::Image(image) => (
            image.score,
            IMAGE_METHOD_WEIGHT,
            None,
            image.suspicious,
            image.details.clone(),
            MethodStyle::Image,
        ),
    };
    let score = reported_score.unwrap_or(0.0);

    NormalizedMethod {
        key: key.to_string(),
        name: display_name(key),
        score,
        reported_score,
        weight,
        contribution_percent: contribution.unwrap_or(score * weight * 100.0),
        is_suspicious: suspicious.unwrap_or(score > SUSPICIOUS_SCORE_THRESHOLD),
        detail_text: details.unwrap_or_else(|| NO_DETAILS_PLACEHOLDER.to_string()),
        style,
    }
}

/// Normalizes a raw result document.
pub fn normalize(document: &RawResultDocument) -> NormalizedResult {
    let alternate = document.overall_analysis.as_ref();
    let top_level = document.analysis.as_ref();

    if alternate.is_none() && top_level.is_none() {
        tracing::debug!("result document carries no scores block");
    }

    let methods = document
        .method_records()
        .iter()
        .map(|(key, record)| normalize_method(key, record))
        .collect();

    let video_stats = document.statistics.as_ref().map(|stats| VideoStats {
        mean_score: stats.mean_score,
        max_score: stats.max_score,
        min_score: stats.min_score,
        score_variance: stats.score_variance,
        suspicious_frame_count: stats.suspicious_frame_count,
    });

    let video_info = document.video_info.as_ref().map(|info| VideoDetails {
        duration_seconds: info.duration_seconds,
        fps: info.fps,
        total_frames: info.total_frames,
        frames_analyzed: info.frames_analyzed,
    });

    let segments = document
        .suspicious_segments
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(normalize_segment)
        .collect();

    let source = MediaSource {
        filename: document.filename.clone(),
        origin: document.source.clone(),
        url: document.url.clone(),
        duration_seconds: document.duration,
    };

    NormalizedResult {
        variant: document.variant(),
        probability: resolve_field(alternate, top_level, |s| s.deepfake_probability),
        verdict: resolve_field(alternate, top_level, |s| s.verdict.clone()),
        risk_level: resolve_field(alternate, top_level, |s| s.risk_level.clone()),
        confidence: resolve_field(alternate, top_level, |s| s.confidence_score),
        methods,
        video_stats,
        video_info,
        segments,
        source: (!source.is_empty()).then_some(source),
    }
}

fn normalize_segment(segment: &SuspiciousSegment) -> Segment {
    Segment {
        frame_index: segment.frame,
        timestamp_seconds: segment.timestamp,
        confidence: segment.confidence,
    }
}
