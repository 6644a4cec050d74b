#![warn(missing_docs)]
//! # mediaguard-app
//!
//! ## Purpose
//! Wires configuration, input collection, dispatch, normalization, and
//! presentation for `mediaguard`.
//!
//! ## Responsibilities
//! - Build [`AppConfig`] once from environment-style settings.
//! - Own the single active analysis through [`AnalysisController`].
//! - Load local media files with a declared media type.
//! - Initialise structured logging for the binary.
//!
//! ## Data flow
//! CLI/env -> [`AppConfig`] -> [`AnalysisController`] (input collector ->
//! dispatcher -> normalizer -> lifecycle) -> view projection.
//!
//! ## Ownership and lifetimes
//! The controller exclusively owns input and lifecycle state and replaces the
//! lifecycle state wholesale on every transition.
//!
//! ## Error model
//! Subsystem errors are wrapped in [`AppError`]. Analysis failures are not
//! errors here; they land in the lifecycle `Failed` state.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use mediaguard_contract::RawResultDocument;
use mediaguard_core::{
    AnalysisRequest, CoreError, FeatureFlags, InputCollector, InputMode, InputState, MediaBlob,
};
use mediaguard_dispatch::{
    AnalysisClient, AnalysisTransport, CancellationToken, DispatchError, HttpTransport,
};
use mediaguard_lifecycle::{LifecycleError, LifecycleState, RequestLifecycle, RequestTicket};
use mediaguard_normalize::{NormalizedResult, normalize};
use mediaguard_ui::{Header, ViewModel, project_view};
use thiserror::Error;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("MEDIAGUARD_VERSION");

/// Environment key for the API base location.
pub const ENV_API_URL: &str = "MEDIAGUARD_API_URL";
/// Environment key for the display title.
pub const ENV_APP_TITLE: &str = "MEDIAGUARD_APP_TITLE";
/// Environment key for the display subtitle.
pub const ENV_APP_SUBTITLE: &str = "MEDIAGUARD_APP_SUBTITLE";
/// Environment key enabling file upload mode.
pub const ENV_ENABLE_FILE_UPLOAD: &str = "MEDIAGUARD_ENABLE_FILE_UPLOAD";
/// Environment key enabling URL submission mode.
pub const ENV_ENABLE_URL: &str = "MEDIAGUARD_ENABLE_URL";
/// Environment key for the optional transport timeout in seconds.
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "MEDIAGUARD_REQUEST_TIMEOUT_SECS";

/// Default API base location.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Default display title.
pub const DEFAULT_APP_TITLE: &str = "Deepfake Detection Platform";
/// Default display subtitle.
pub const DEFAULT_APP_SUBTITLE: &str = "Advanced AI-Powered Media Authentication";
/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,mediaguard=debug";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Startup configuration, read once and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// API base location.
    pub api_url: String,
    /// Display title and subtitle.
    pub header: Header,
    /// Enabled input modes.
    pub flags: FeatureFlags,
    /// Transport timeout; `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

impl AppConfig {
    /// Reads configuration from process environment.
    ///
    /// # Errors
    /// See [`AppConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    ///
    /// Semantics:
    /// - Unset or blank strings fall back to defaults.
    /// - Mode flags are enabled only by `true` (case-insensitive).
    /// - Mode flags are not checked here; analysis entry points call
    ///   [`AppConfig::require_input_mode`].
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidApiUrl`] for an unusable base location
    /// and [`ConfigError::InvalidTimeout`] for a timeout that is not a
    /// positive whole number of seconds.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let text = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let flags = FeatureFlags::new(
            flag_enabled(lookup(ENV_ENABLE_FILE_UPLOAD).as_deref()),
            flag_enabled(lookup(ENV_ENABLE_URL).as_deref()),
        );

        let api_url = text(ENV_API_URL, DEFAULT_API_URL);
        mediaguard_dispatch::validate_api_base(&api_url)
            .map_err(|error| ConfigError::InvalidApiUrl(error.to_string()))?;

        let request_timeout = match lookup(ENV_REQUEST_TIMEOUT_SECS)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
        {
            Some(raw) => {
                let seconds = raw
                    .parse::<u64>()
                    .ok()
                    .filter(|seconds| *seconds > 0)
                    .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
                Some(Duration::from_secs(seconds))
            }
            None => None,
        };

        Ok(Self {
            api_url,
            header: Header {
                title: text(ENV_APP_TITLE, DEFAULT_APP_TITLE),
                subtitle: text(ENV_APP_SUBTITLE, DEFAULT_APP_SUBTITLE),
            },
            flags,
            request_timeout,
        })
    }

    /// Checks that at least one input mode is enabled.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoInputModeEnabled`] when both mode flags are
    /// off.
    pub fn require_input_mode(&self) -> Result<InputMode, ConfigError> {
        self.flags
            .initial_mode()
            .map_err(|_| ConfigError::NoInputModeEnabled)
    }
}

/// Builds a client for the service probes over the HTTP transport.
///
/// Probes need no input mode, so the mode flags are not checked.
///
/// # Errors
/// Returns [`AppError::Dispatch`] for an invalid API base or a transport
/// build failure.
pub fn probe_client(config: &AppConfig) -> Result<AnalysisClient, AppError> {
    let transport = HttpTransport::new(config.request_timeout)?;
    Ok(AnalysisClient::new(config.api_url.clone(), Arc::new(transport))?)
}

/// Parses a mode flag: only `true` (case-insensitive, trimmed) enables it.
pub fn flag_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}

/// Initialises `tracing` output on stderr.
///
/// `RUST_LOG` overrides [`DEFAULT_LOG_FILTER`]. Repeated calls are ignored.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("tracing init warning: {error}");
    }
}

/// Reads a local file and declares its media type from the extension.
///
/// Unknown extensions are declared `application/octet-stream` and therefore
/// classified as images.
///
/// # Errors
/// Returns [`AppError::ReadMedia`] when the file cannot be read.
pub fn load_media_file(path: &Path) -> Result<MediaBlob, AppError> {
    let bytes = std::fs::read(path).map_err(|source| AppError::ReadMedia {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = mime_guess::from_path(path).first_or_octet_stream();

    Ok(MediaBlob::new(file_name, media_type.essence_str(), bytes))
}

/// One started analysis awaiting its outcome.
#[derive(Debug, Clone)]
pub struct PendingAnalysis {
    ticket: RequestTicket,
    request: AnalysisRequest,
    token: CancellationToken,
}

impl PendingAnalysis {
    /// Returns the request to dispatch.
    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }

    /// Returns the cancellation token for this dispatch.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns the lifecycle ticket.
    pub fn ticket(&self) -> RequestTicket {
        self.ticket
    }
}

/// Top-level controller owning the single active analysis.
pub struct AnalysisController {
    header: Header,
    input: InputCollector,
    lifecycle: RequestLifecycle,
    client: AnalysisClient,
}

impl AnalysisController {
    /// Creates a controller over an arbitrary transport.
    ///
    /// # Errors
    /// Returns [`AppError::Core`] when no mode is enabled and
    /// [`AppError::Dispatch`] for an invalid API base.
    pub fn new(config: &AppConfig, transport: Arc<dyn AnalysisTransport>) -> Result<Self, AppError> {
        let input = InputCollector::new(config.flags)?;
        let client = AnalysisClient::new(config.api_url.clone(), transport)?;
        tracing::debug!(
            api_base = client.base(),
            mode = ?input.state().mode,
            "analysis controller ready"
        );
        Ok(Self {
            header: config.header.clone(),
            input,
            lifecycle: RequestLifecycle::new(),
            client,
        })
    }

    /// Creates a controller over the HTTP transport.
    ///
    /// # Errors
    /// Same as [`AnalysisController::new`], plus transport build failures.
    pub fn with_http(config: &AppConfig) -> Result<Self, AppError> {
        let transport = HttpTransport::new(config.request_timeout)?;
        Self::new(config, Arc::new(transport))
    }

    /// Returns the current input snapshot.
    pub fn input(&self) -> &InputState {
        self.input.state()
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> &LifecycleState {
        self.lifecycle.state()
    }

    /// Returns the last successful result, if any.
    pub fn result(&self) -> Option<&NormalizedResult> {
        self.lifecycle.result()
    }

    /// Returns the analysis client (for probes).
    pub fn client(&self) -> &AnalysisClient {
        &self.client
    }

    /// Selects a local file and clears any previous outcome.
    ///
    /// # Errors
    /// Returns [`AppError::Lifecycle`] while loading and [`AppError::Core`]
    /// when file upload is disabled.
    pub fn select_file(&mut self, blob: MediaBlob) -> Result<(), AppError> {
        self.ensure_idle()?;
        let state = self.input.select_file(blob)?;
        if let Some(selected) = &state.file {
            tracing::debug!(
                file_name = %selected.blob.file_name,
                kind = selected.kind.label(),
                "file selected"
            );
        }
        self.lifecycle.clear_outcome();
        Ok(())
    }

    /// Stores URL text and clears any previous outcome.
    ///
    /// # Errors
    /// Returns [`AppError::Lifecycle`] while loading and [`AppError::Core`]
    /// when URL submission is disabled.
    pub fn select_url(&mut self, text: impl Into<String>) -> Result<(), AppError> {
        self.ensure_idle()?;
        self.input.select_url(text)?;
        self.lifecycle.clear_outcome();
        Ok(())
    }

    /// Switches input mode and clears any previous outcome.
    ///
    /// Returns the mode in effect, which stays unchanged when `mode` is
    /// disabled.
    ///
    /// # Errors
    /// Returns [`AppError::Lifecycle`] while loading.
    pub fn set_mode(&mut self, mode: InputMode) -> Result<InputMode, AppError> {
        self.ensure_idle()?;
        let effective = self.input.set_mode(mode);
        self.lifecycle.clear_outcome();
        Ok(effective)
    }

    /// Enters `Loading` for the current input.
    ///
    /// # Errors
    /// Returns [`AppError::Lifecycle`] with [`LifecycleError::Busy`] while a
    /// request is in flight (state is left untouched), or [`AppError::Core`]
    /// when the active mode has no input.
    pub fn begin_analysis(&mut self) -> Result<PendingAnalysis, AppError> {
        self.ensure_idle()?;
        let request = self.input.to_request()?;
        let ticket = self.lifecycle.begin()?;
        tracing::debug!(
            generation = ticket.generation(),
            mode = ?request.mode(),
            "analysis pending"
        );
        Ok(PendingAnalysis {
            ticket,
            request,
            token: CancellationToken::new(),
        })
    }

    /// Applies a dispatch outcome to the lifecycle.
    ///
    /// # Errors
    /// Returns [`AppError::Lifecycle`] when `pending` is not the in-flight
    /// request.
    pub fn complete_analysis(
        &mut self,
        pending: PendingAnalysis,
        outcome: Result<RawResultDocument, DispatchError>,
    ) -> Result<(), AppError> {
        match outcome {
            Ok(document) => self.lifecycle.succeed(pending.ticket, normalize(&document))?,
            Err(error) => self.lifecycle.fail(pending.ticket, error.to_string())?,
        }
        Ok(())
    }

    /// Runs one analysis to completion on the calling thread.
    ///
    /// # Errors
    /// Same as [`AnalysisController::begin_analysis`]. Dispatch failures are
    /// reported through the returned `Failed` state.
    pub fn analyze(&mut self) -> Result<&LifecycleState, AppError> {
        let pending = self.begin_analysis()?;
        let outcome = self.client.dispatch(pending.request(), pending.token());
        self.complete_analysis(pending, outcome)?;
        Ok(self.lifecycle.state())
    }

    /// Projects current state for rendering.
    pub fn view(&self) -> ViewModel {
        project_view(
            &self.header,
            self.input.flags(),
            self.input.state(),
            self.lifecycle.state(),
        )
    }

    fn ensure_idle(&self) -> Result<(), AppError> {
        if self.lifecycle.is_loading() {
            return Err(AppError::Lifecycle(LifecycleError::Busy));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Both input modes are disabled.
    #[error(
        "no analysis path is usable: set MEDIAGUARD_ENABLE_FILE_UPLOAD=true or MEDIAGUARD_ENABLE_URL=true"
    )]
    NoInputModeEnabled,
    /// API base location is unusable.
    #[error("invalid MEDIAGUARD_API_URL: {0}")]
    InvalidApiUrl(String),
    /// Timeout is not a positive whole number of seconds.
    #[error("invalid MEDIAGUARD_REQUEST_TIMEOUT_SECS: '{0}'")]
    InvalidTimeout(String),
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Input model error.
    #[error("input error: {0}")]
    Core(#[from] CoreError),
    /// Dispatcher setup or probe error.
    #[error("{0}")]
    Dispatch(#[from] DispatchError),
    /// Illegal lifecycle transition.
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),
    /// Local media file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    ReadMedia {
        /// File path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// JSON output encoding failed.
    #[error("output encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
