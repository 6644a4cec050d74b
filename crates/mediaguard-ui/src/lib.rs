#![warn(missing_docs)]
//! # mediaguard-ui
//!
//! ## Purpose
//! Derives presentation attributes from normalized results and renders the
//! current phase as text.
//!
//! ## Responsibilities
//! - Map risk levels, verdicts, and scores to display colors.
//! - Project input and lifecycle state into a [`ViewModel`].
//! - Render a [`ViewModel`] for a terminal.
//!
//! ## Data flow
//! [`InputState`] + [`LifecycleState`] -> [`project_view`] -> [`ViewModel`]
//! -> [`render_text`].
//!
//! ## Ownership and lifetimes
//! The view model owns all strings so renderers never borrow from the
//! controller.
//!
//! ## Error model
//! Color and label mapping is total; unknown inputs map to neutral values.

use mediaguard_core::{FeatureFlags, InputMode, InputState};
use mediaguard_lifecycle::LifecycleState;
use mediaguard_normalize::{NormalizedMethod, NormalizedResult, Segment};

/// Red, used for critical risk, fake verdicts and high scores.
pub const COLOR_RED: &str = "#dc2626";
/// Orange, used for high risk.
pub const COLOR_ORANGE: &str = "#ea580c";
/// Amber, used for medium risk, suspicious verdicts and mid scores.
pub const COLOR_AMBER: &str = "#f59e0b";
/// Lime, used for low risk.
pub const COLOR_LIME: &str = "#84cc16";
/// Green, used for minimal risk, authentic verdicts and low scores.
pub const COLOR_GREEN: &str = "#22c55e";
/// Neutral gray for unknown values.
pub const COLOR_NEUTRAL: &str = "#6b7280";

/// Method score above which the bar is red.
pub const METHOD_HIGH_SEVERITY: f64 = 0.6;
/// Method score above which the bar is amber.
pub const METHOD_MEDIUM_SEVERITY: f64 = 0.4;
/// Segment confidence above which the badge is red.
pub const SEGMENT_HIGH_SEVERITY: f64 = 0.75;

const NOT_AVAILABLE: &str = "N/A";
const BAR_CELLS: usize = 20;

/// Maps a risk tier to its color by exact match.
pub fn risk_color(risk_level: Option<&str>) -> &'static str {
    match risk_level {
        Some("CRITICAL") => COLOR_RED,
        Some("HIGH") => COLOR_ORANGE,
        Some("MEDIUM") => COLOR_AMBER,
        Some("LOW") => COLOR_LIME,
        Some("MINIMAL") => COLOR_GREEN,
        _ => COLOR_NEUTRAL,
    }
}

/// Maps a verdict to its color by keyword, first match wins:
/// `AUTHENTIC`, then `SUSPICIOUS`, then `FAKE`.
pub fn verdict_color(verdict: Option<&str>) -> &'static str {
    let Some(verdict) = verdict else {
        return COLOR_NEUTRAL;
    };

    if verdict.contains("AUTHENTIC") {
        COLOR_GREEN
    } else if verdict.contains("SUSPICIOUS") {
        COLOR_AMBER
    } else if verdict.contains("FAKE") {
        COLOR_RED
    } else {
        COLOR_NEUTRAL
    }
}

/// Maps a method score to its bar color.
pub fn method_severity_color(score: f64) -> &'static str {
    if score > METHOD_HIGH_SEVERITY {
        COLOR_RED
    } else if score > METHOD_MEDIUM_SEVERITY {
        COLOR_AMBER
    } else {
        COLOR_GREEN
    }
}

/// Maps a segment confidence to its badge color.
pub fn segment_severity_color(confidence: f64) -> &'static str {
    if confidence > SEGMENT_HIGH_SEVERITY {
        COLOR_RED
    } else {
        COLOR_AMBER
    }
}

/// Returns bar width in percent for a score in [0, 1], clamped.
pub fn score_bar_width(score: f64) -> f64 {
    (score * 100.0).clamp(0.0, 100.0)
}

/// Static header strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Page title.
    pub title: String,
    /// Page subtitle.
    pub subtitle: String,
}

/// Text with a color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Display text.
    pub text: String,
    /// Hex color.
    pub color: &'static str,
}

/// Selected file summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfoView {
    /// File name.
    pub name: String,
    /// Size label (`1.25 MB`).
    pub size: String,
    /// Kind label (`IMAGE` / `VIDEO`).
    pub kind: String,
}

/// One labelled statistic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatView {
    /// Label.
    pub label: &'static str,
    /// Value or `N/A`.
    pub value: String,
}

/// One method card.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodView {
    /// Display name.
    pub name: String,
    /// Weight label (`45% weight`).
    pub weight: String,
    /// Bar width in percent.
    pub bar_width: f64,
    /// Bar color.
    pub bar_color: &'static str,
    /// Score label.
    pub score: String,
    /// Contribution label.
    pub contribution: String,
}

/// One suspicious segment row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentView {
    /// Time and frame label.
    pub position: String,
    /// Confidence badge.
    pub confidence: Badge,
}

/// One per-method detail card (image results).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    /// Display name.
    pub name: String,
    /// `SUSPICIOUS` or `NORMAL`.
    pub status: &'static str,
    /// Score label.
    pub score: String,
    /// Detail text.
    pub text: String,
}

/// Rendered results section.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    /// Source label (file name or video title).
    pub source: Option<String>,
    /// Duration/FPS badge for video results.
    pub video_badge: Option<String>,
    /// Probability label (`82%`).
    pub probability: String,
    /// Ring color around the probability.
    pub probability_color: &'static str,
    /// Verdict badge.
    pub verdict: Badge,
    /// Risk badge.
    pub risk: Badge,
    /// Confidence label.
    pub confidence: String,
    /// Video statistics (empty for image results).
    pub stats: Vec<StatView>,
    /// Method cards.
    pub methods: Vec<MethodView>,
    /// Suspicious segment rows.
    pub segments: Vec<SegmentView>,
    /// Detail cards, image results only.
    pub details: Vec<DetailView>,
}

/// Phase shown below the input card.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewPhase {
    /// Nothing to show.
    Idle,
    /// Request in flight.
    Loading,
    /// Last request failed.
    Error(String),
    /// Last request succeeded.
    Results(Box<ResultsView>),
}

/// Complete screen projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    /// Header strings.
    pub header: Header,
    /// Whether mode tabs are shown (both modes enabled).
    pub show_mode_tabs: bool,
    /// Active mode.
    pub mode: InputMode,
    /// Selected file summary.
    pub file_info: Option<FileInfoView>,
    /// URL text in URL mode.
    pub url: Option<String>,
    /// Trigger button label.
    pub trigger_label: &'static str,
    /// Whether the trigger button accepts clicks.
    pub trigger_enabled: bool,
    /// Current phase.
    pub phase: ViewPhase,
}

/// Projects input and lifecycle state into a view model.
pub fn project_view(
    header: &Header,
    flags: FeatureFlags,
    input: &InputState,
    state: &LifecycleState,
) -> ViewModel {
    let loading = matches!(state, LifecycleState::Loading);
    let (trigger_label, file_info, url) = match input.mode {
        InputMode::FileUpload => (
            if loading { "Analyzing..." } else { "Start Analysis" },
            input.file.as_ref().map(|selected| FileInfoView {
                name: selected.blob.file_name.clone(),
                size: format!("{:.2} MB", selected.blob.size_mb()),
                kind: selected.kind.label().to_string(),
            }),
            None,
        ),
        InputMode::UrlSubmission => (
            if loading {
                "Downloading & Analyzing..."
            } else {
                "Analyze YouTube Video"
            },
            None,
            Some(input.url.clone()),
        ),
    };

    let phase = match state {
        LifecycleState::Idle => ViewPhase::Idle,
        LifecycleState::Loading => ViewPhase::Loading,
        LifecycleState::Failed(message) => ViewPhase::Error(message.clone()),
        LifecycleState::Succeeded(result) => ViewPhase::Results(Box::new(project_results(result))),
    };

    ViewModel {
        header: header.clone(),
        show_mode_tabs: flags.both_enabled(),
        mode: input.mode,
        file_info,
        url,
        trigger_label,
        trigger_enabled: !loading && input.is_ready(),
        phase,
    }
}

/// Projects one normalized result into its results section.
pub fn project_results(result: &NormalizedResult) -> ResultsView {
    let risk_level = result.risk_level.as_deref();
    let verdict = result.verdict.as_deref();

    let video_badge = result.video_info.as_ref().map(|info| {
        format!(
            "{}s | {} FPS",
            number_or_na(info.duration_seconds),
            number_or_na(info.fps)
        )
    });

    let stats = result
        .video_stats
        .as_ref()
        .map(|stats| {
            vec![
                StatView {
                    label: "Mean Score",
                    value: number_or_na(stats.mean_score),
                },
                StatView {
                    label: "Max Score",
                    value: number_or_na(stats.max_score),
                },
                StatView {
                    label: "Min Score",
                    value: number_or_na(stats.min_score),
                },
                StatView {
                    label: "Score Variance",
                    value: number_or_na(stats.score_variance),
                },
                StatView {
                    label: "Suspicious Frames",
                    value: stats
                        .suspicious_frame_count
                        .map_or_else(|| NOT_AVAILABLE.to_string(), |count| count.to_string()),
                },
            ]
        })
        .unwrap_or_default();

    let details = if result.video_stats.is_none() {
        result.methods.iter().map(project_detail).collect()
    } else {
        Vec::new()
    };

    ResultsView {
        source: result.source.as_ref().and_then(|source| source.filename.clone()),
        video_badge,
        probability: result
            .probability
            .map_or_else(|| NOT_AVAILABLE.to_string(), |value| format!("{value}%")),
        probability_color: risk_color(risk_level),
        verdict: Badge {
            text: verdict.unwrap_or(NOT_AVAILABLE).to_string(),
            color: verdict_color(verdict),
        },
        risk: Badge {
            text: format!("{} RISK", risk_level.unwrap_or(NOT_AVAILABLE)),
            color: risk_color(risk_level),
        },
        confidence: number_or_na(result.confidence),
        stats,
        methods: result.methods.iter().map(project_method).collect(),
        segments: result.segments.iter().map(project_segment).collect(),
        details,
    }
}

fn project_method(method: &NormalizedMethod) -> MethodView {
    MethodView {
        name: method.name.clone(),
        weight: format!("{:.0}% weight", method.weight * 100.0),
        bar_width: score_bar_width(method.score),
        bar_color: method_severity_color(method.score),
        score: format!("Score: {:.3}", method.score),
        contribution: format!("Contribution: {:.1}%", method.contribution_percent),
    }
}

fn project_segment(segment: &Segment) -> SegmentView {
    let timestamp = segment
        .timestamp_seconds
        .map_or_else(|| NOT_AVAILABLE.to_string(), |seconds| format!("{seconds:.2}s"));
    let frame = segment
        .frame_index
        .map_or_else(|| NOT_AVAILABLE.to_string(), |frame| frame.to_string());
    let confidence = segment.confidence.unwrap_or(0.0);

    SegmentView {
        position: format!("{timestamp} (Frame {frame})"),
        confidence: Badge {
            text: segment.confidence.map_or_else(
                || format!("{NOT_AVAILABLE} confidence"),
                |value| format!("{:.1}% confidence", value * 100.0),
            ),
            color: segment_severity_color(confidence),
        },
    }
}

fn project_detail(method: &NormalizedMethod) -> DetailView {
    DetailView {
        name: method.name.clone(),
        status: if method.is_suspicious {
            "SUSPICIOUS"
        } else {
            "NORMAL"
        },
        score: method.reported_score.map_or_else(
            || format!("Score: {NOT_AVAILABLE}"),
            |score| format!("Score: {score:.3}"),
        ),
        text: method.detail_text.clone(),
    }
}

fn number_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |value| value.to_string())
}

fn bar(width_percent: f64) -> String {
    let filled = ((width_percent / 100.0) * BAR_CELLS as f64).round() as usize;
    let filled = filled.min(BAR_CELLS);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_CELLS - filled))
}

/// Renders a view model as plain terminal text.
pub fn render_text(view: &ViewModel) -> String {
    let mut lines = vec![view.header.title.clone(), view.header.subtitle.clone(), String::new()];

    if view.show_mode_tabs {
        let (upload, url) = match view.mode {
            InputMode::FileUpload => ("[Upload File]", " YouTube URL "),
            InputMode::UrlSubmission => (" Upload File ", "[YouTube URL]"),
        };
        lines.push(format!("{upload} {url}"));
    }

    if let Some(file) = &view.file_info {
        lines.push(format!("Selected: {}", file.name));
        lines.push(format!("Size: {}", file.size));
        lines.push(format!("Type: {}", file.kind));
    }
    if let Some(url) = &view.url {
        lines.push(format!("URL: {url}"));
    }

    match &view.phase {
        ViewPhase::Idle => {}
        ViewPhase::Loading => {
            lines.push(String::new());
            lines.push("Analyzing Media...".to_string());
        }
        ViewPhase::Error(message) => {
            lines.push(String::new());
            lines.push("Analysis Failed".to_string());
            lines.push(message.clone());
        }
        ViewPhase::Results(results) => render_results(results, &mut lines),
    }

    lines.join("\n")
}

fn render_results(results: &ResultsView, lines: &mut Vec<String>) {
    lines.push(String::new());
    lines.push("Analysis Results".to_string());
    if let Some(source) = &results.source {
        lines.push(format!("Source: {source}"));
    }
    if let Some(badge) = &results.video_badge {
        lines.push(badge.clone());
    }
    lines.push(format!(
        "Deepfake Probability: {} [{}]",
        results.probability, results.probability_color
    ));
    lines.push(format!("Verdict: {} [{}]", results.verdict.text, results.verdict.color));
    lines.push(format!("Risk: {} [{}]", results.risk.text, results.risk.color));
    lines.push(format!("Confidence Score: {}", results.confidence));

    if !results.stats.is_empty() {
        lines.push(String::new());
        for stat in &results.stats {
            lines.push(format!("{}: {}", stat.label, stat.value));
        }
    }

    if !results.methods.is_empty() {
        lines.push(String::new());
        lines.push("Detection Method Analysis".to_string());
        for method in &results.methods {
            lines.push(format!("  {} ({})", method.name, method.weight));
            lines.push(format!(
                "    {} [{}] {} | {}",
                bar(method.bar_width),
                method.bar_color,
                method.score,
                method.contribution
            ));
        }
    }

    if !results.segments.is_empty() {
        lines.push(String::new());
        lines.push("Suspicious Segments Detected".to_string());
        for segment in &results.segments {
            lines.push(format!(
                "  {} {} [{}]",
                segment.position, segment.confidence.text, segment.confidence.color
            ));
        }
    }

    if !results.details.is_empty() {
        lines.push(String::new());
        lines.push("Detailed Analysis".to_string());
        for detail in &results.details {
            lines.push(format!("  {} [{}] {}", detail.name, detail.status, detail.score));
            lines.push(format!("    {}", detail.text));
        }
    }
}
