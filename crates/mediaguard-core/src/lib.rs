#![warn(missing_docs)]
//! # mediaguard-core
//!
//! ## Purpose
//! Defines the input data model and the input collector used across the
//! `mediaguard` workspace.
//!
//! ## Responsibilities
//! - Represent selected media blobs and classify them as image or video.
//! - Track which input mode (file upload or URL submission) is active.
//! - Enforce feature-flag gating so only enabled modes are selectable.
//! - Turn the active input into one owned [`AnalysisRequest`].
//!
//! ## Data flow
//! User selects a file or types a URL -> [`InputCollector`] updates its
//! [`InputState`] -> [`InputCollector::to_request`] produces an
//! [`AnalysisRequest`] for the dispatcher.
//!
//! ## Ownership and lifetimes
//! Media bytes are owned (`Vec<u8>`) so a request can outlive the collector
//! state that produced it.
//!
//! ## Error model
//! Disabled modes, missing input, and empty URLs are reported as
//! [`CoreError`] variants.
//!
//! ## Example
//! ```rust
//! use mediaguard_core::{FeatureFlags, InputCollector, InputMode, MediaBlob, MediaKind};
//!
//! let mut collector = InputCollector::new(FeatureFlags::new(true, true)).unwrap();
//! collector
//!     .select_file(MediaBlob::new("clip.mp4", "video/mp4", vec![0; 8]))
//!     .unwrap();
//! assert_eq!(collector.state().mode, InputMode::FileUpload);
//! assert_eq!(collector.state().file.as_ref().unwrap().kind, MediaKind::Video);
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Fixed frame sampling rate sent with every URL submission.
pub const DEFAULT_SAMPLE_RATE: u32 = 30;

/// Media classification derived from the declared media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Video stream.
    Video,
}

impl MediaKind {
    /// Classifies a declared media type: `video/*` is a video, anything else
    /// (including an empty type) is treated as an image.
    pub fn classify(media_type: &str) -> Self {
        if media_type.starts_with("video/") {
            Self::Video
        } else {
            Self::Image
        }
    }

    /// Upper-case label used in file info panels.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Image => "IMAGE",
            Self::Video => "VIDEO",
        }
    }
}

/// One local media file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlob {
    /// File name as presented to the backend.
    pub file_name: String,
    /// Declared media type (for example `image/png`).
    pub media_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl MediaBlob {
    /// Creates a blob from owned parts.
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Returns the classified media kind.
    pub fn kind(&self) -> MediaKind {
        MediaKind::classify(&self.media_type)
    }

    /// Returns blob size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Returns blob size in mebibytes.
    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0 / 1024.0
    }

    /// Returns hex-encoded SHA-256 digest of the blob bytes.
    ///
    /// Used to correlate log lines with a selected file without logging its
    /// contents.
    pub fn digest_hex(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

/// A selected file together with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Media blob to upload.
    pub blob: MediaBlob,
    /// Classification computed at selection time.
    pub kind: MediaKind,
}

/// Active input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    /// Local file upload.
    FileUpload,
    /// Remote video URL submission.
    UrlSubmission,
}

/// Startup feature flags gating which input modes are selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// File upload mode is enabled.
    pub file_upload: bool,
    /// URL submission mode is enabled.
    pub url_submission: bool,
}

impl FeatureFlags {
    /// Creates a flag set.
    pub fn new(file_upload: bool, url_submission: bool) -> Self {
        Self {
            file_upload,
            url_submission,
        }
    }

    /// Returns `true` when `mode` is enabled.
    pub fn allows(&self, mode: InputMode) -> bool {
        match mode {
            InputMode::FileUpload => self.file_upload,
            InputMode::UrlSubmission => self.url_submission,
        }
    }

    /// Returns the mode the collector starts in.
    ///
    /// # Errors
    /// Returns [`CoreError::NoInputModeEnabled`] when both flags are off.
    pub fn initial_mode(&self) -> Result<InputMode, CoreError> {
        if self.file_upload {
            Ok(InputMode::FileUpload)
        } else if self.url_submission {
            Ok(InputMode::UrlSubmission)
        } else {
            Err(CoreError::NoInputModeEnabled)
        }
    }

    /// Returns `true` when the user may toggle between both modes.
    pub fn both_enabled(&self) -> bool {
        self.file_upload && self.url_submission
    }
}

/// Snapshot of the collector's current input.
///
/// Invariant: at most one of `file` and `url` carries a value, and it belongs
/// to the active `mode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    /// Active input mode.
    pub mode: InputMode,
    /// Selected file (file upload mode only).
    pub file: Option<SelectedFile>,
    /// Raw URL text (URL submission mode only).
    pub url: String,
}

impl InputState {
    /// Returns `true` when the active mode has something to analyze.
    pub fn is_ready(&self) -> bool {
        match self.mode {
            InputMode::FileUpload => self.file.is_some(),
            InputMode::UrlSubmission => !self.url.is_empty(),
        }
    }
}

/// Owned request handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    /// Upload a local file.
    File {
        /// Image or video, selects the backend operation.
        kind: MediaKind,
        /// Bytes and declared type.
        blob: MediaBlob,
    },
    /// Submit a remote video URL.
    Url {
        /// URL text exactly as entered.
        url: String,
        /// Frame sampling rate requested from the backend.
        sample_rate: u32,
    },
}

impl AnalysisRequest {
    /// Returns the input mode this request belongs to.
    pub fn mode(&self) -> InputMode {
        match self {
            Self::File { .. } => InputMode::FileUpload,
            Self::Url { .. } => InputMode::UrlSubmission,
        }
    }
}

/// Feature-flag aware input collector.
#[derive(Debug, Clone)]
pub struct InputCollector {
    flags: FeatureFlags,
    state: InputState,
}

impl InputCollector {
    /// Creates a collector in the first enabled mode.
    ///
    /// # Errors
    /// Returns [`CoreError::NoInputModeEnabled`] when both modes are disabled.
    pub fn new(flags: FeatureFlags) -> Result<Self, CoreError> {
        let mode = flags.initial_mode()?;
        Ok(Self {
            flags,
            state: InputState {
                mode,
                file: None,
                url: String::new(),
            },
        })
    }

    /// Returns current input snapshot.
    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Returns configured feature flags.
    pub fn flags(&self) -> FeatureFlags {
        self.flags
    }

    /// Requests a mode switch and returns the mode actually in effect.
    ///
    /// A disabled mode is never entered; the collector stays in the only
    /// enabled mode. Entering a different mode clears the other mode's value.
    pub fn set_mode(&mut self, mode: InputMode) -> InputMode {
        if !self.flags.allows(mode) || self.state.mode == mode {
            return self.state.mode;
        }

        self.state.mode = mode;
        match mode {
            InputMode::FileUpload => self.state.url.clear(),
            InputMode::UrlSubmission => self.state.file = None,
        }
        mode
    }

    /// Selects a local file, switching to file upload mode.
    ///
    /// # Errors
    /// Returns [`CoreError::ModeDisabled`] when file upload is disabled.
    pub fn select_file(&mut self, blob: MediaBlob) -> Result<&InputState, CoreError> {
        self.enter(InputMode::FileUpload)?;
        let kind = blob.kind();
        self.state.file = Some(SelectedFile { blob, kind });
        Ok(&self.state)
    }

    /// Stores URL text verbatim, switching to URL submission mode.
    ///
    /// # Errors
    /// Returns [`CoreError::ModeDisabled`] when URL submission is disabled.
    pub fn select_url(&mut self, text: impl Into<String>) -> Result<&InputState, CoreError> {
        self.enter(InputMode::UrlSubmission)?;
        self.state.url = text.into();
        Ok(&self.state)
    }

    /// Builds the request for the active mode.
    ///
    /// # Errors
    /// Returns [`CoreError::NoFileSelected`] or [`CoreError::EmptyUrl`] when
    /// the active mode has no value yet.
    pub fn to_request(&self) -> Result<AnalysisRequest, CoreError> {
        match self.state.mode {
            InputMode::FileUpload => {
                let selected = self.state.file.as_ref().ok_or(CoreError::NoFileSelected)?;
                Ok(AnalysisRequest::File {
                    kind: selected.kind,
                    blob: selected.blob.clone(),
                })
            }
            InputMode::UrlSubmission => {
                if self.state.url.is_empty() {
                    return Err(CoreError::EmptyUrl);
                }
                Ok(AnalysisRequest::Url {
                    url: self.state.url.clone(),
                    sample_rate: DEFAULT_SAMPLE_RATE,
                })
            }
        }
    }

    fn enter(&mut self, mode: InputMode) -> Result<(), CoreError> {
        if !self.flags.allows(mode) {
            return Err(CoreError::ModeDisabled(mode));
        }
        self.set_mode(mode);
        Ok(())
    }
}

/// Error type for input validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Neither file upload nor URL submission is enabled.
    #[error("no input mode is enabled; enable file upload or URL submission")]
    NoInputModeEnabled,
    /// Requested mode is disabled by feature flags.
    #[error("input mode {0:?} is disabled")]
    ModeDisabled(InputMode),
    /// File mode is active but nothing was selected.
    #[error("no file selected")]
    NoFileSelected,
    /// URL mode is active but the URL text is empty.
    #[error("url is empty")]
    EmptyUrl,
}
