#![warn(missing_docs)]
//! # mediaguard-dispatch
//!
//! ## Purpose
//! Maps analysis requests onto backend operations and interprets responses.
//!
//! ## Responsibilities
//! - Choose the operation and payload encoding for each input mode.
//! - Validate the configured API base location.
//! - Execute requests through an injectable [`AnalysisTransport`].
//! - Turn non-success responses into user-facing failure messages.
//! - Expose an explicit [`CancellationToken`] for every dispatch.
//!
//! ## Data flow
//! [`AnalysisRequest`] -> [`plan_request`] -> [`AnalysisTransport::execute`]
//! -> [`TransportResponse`] -> [`parse_result_document`] -> normalizer.
//!
//! ## Ownership and lifetimes
//! Transport requests own their payload bytes so transports may hand them to
//! worker threads.
//!
//! ## Error model
//! All failures are [`DispatchError`] values whose `Display` output is the
//! message shown to the user. Nothing is retried.
//!
//! ## Security and privacy notes
//! Media bytes are never logged; file uploads are identified by digest.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use mediaguard_contract::{
    HealthStatus, RawResultDocument, ServiceInfo, error_detail, parse_health,
    parse_result_document, parse_service_info,
};
use mediaguard_core::{AnalysisRequest, MediaKind};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Multipart field name carrying the uploaded file.
pub const FILE_FIELD_NAME: &str = "file";

/// Message used when a URL analysis fails without a structured detail.
pub const GENERIC_FAILURE_MESSAGE: &str = "Analysis failed";

/// Backend operations consumed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Analyze one uploaded image.
    AnalyzeImage,
    /// Analyze one uploaded video.
    AnalyzeVideo,
    /// Download and analyze a remote video.
    AnalyzeYoutube,
    /// Liveness probe.
    Health,
    /// Service description probe.
    ServiceInfo,
}

impl Operation {
    /// Returns the path appended to the API base.
    pub fn path(&self) -> &'static str {
        match self {
            Self::AnalyzeImage => "/analyze/image",
            Self::AnalyzeVideo => "/analyze/video",
            Self::AnalyzeYoutube => "/analyze/youtube",
            Self::Health => "/health",
            Self::ServiceInfo => "/",
        }
    }

    /// Returns a stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AnalyzeImage => "analyze-image",
            Self::AnalyzeVideo => "analyze-video",
            Self::AnalyzeYoutube => "analyze-youtube",
            Self::Health => "health",
            Self::ServiceInfo => "service-info",
        }
    }
}

/// File part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// File name sent with the part.
    pub file_name: String,
    /// Declared media type of the part.
    pub media_type: String,
    /// File bytes.
    pub bytes: Vec<u8>,
}

/// Request body encodings.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `multipart/form-data` with one file part (POST).
    Multipart(FilePart),
    /// `application/json` body (POST).
    Json(Value),
    /// No body (GET).
    Empty,
}

/// Fully resolved request handed to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// Operation being invoked.
    pub operation: Operation,
    /// Absolute endpoint URL.
    pub url: Url,
    /// Encoded body.
    pub body: RequestBody,
}

/// Raw transport response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// HTTP reason phrase (may be empty).
    pub status_text: String,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstract transport used by the analysis client.
pub trait AnalysisTransport: Send + Sync {
    /// Executes one request and returns the raw response.
    ///
    /// Implementations return `Ok` for every HTTP response, whatever its
    /// status, and [`DispatchError::Transport`] for network faults.
    fn execute(&self, request: &TransportRequest) -> Result<TransportResponse, DispatchError>;
}

/// Cooperative cancellation flag shared between a caller and a dispatch.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates an uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Maps an analysis request to its operation and encoded body.
pub fn plan_request(request: &AnalysisRequest) -> (Operation, RequestBody) {
    match request {
        AnalysisRequest::File { kind, blob } => {
            let operation = match kind {
                MediaKind::Image => Operation::AnalyzeImage,
                MediaKind::Video => Operation::AnalyzeVideo,
            };
            let part = FilePart {
                field: FILE_FIELD_NAME.to_string(),
                file_name: blob.file_name.clone(),
                media_type: blob.media_type.clone(),
                bytes: blob.bytes.clone(),
            };
            (operation, RequestBody::Multipart(part))
        }
        AnalysisRequest::Url { url, sample_rate } => {
            let body = serde_json::json!({
                "url": url,
                "sample_rate": sample_rate,
            });
            (Operation::AnalyzeYoutube, RequestBody::Json(body))
        }
    }
}

/// Builds the user-facing message for a non-success response.
///
/// File uploads report the status text. URL analyses prefer the structured
/// `detail` field of the body and fall back to a generic message.
pub fn failure_message(operation: Operation, response: &TransportResponse) -> String {
    match operation {
        Operation::AnalyzeYoutube => {
            error_detail(&response.body).unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
        }
        Operation::AnalyzeImage | Operation::AnalyzeVideo => {
            format!("{GENERIC_FAILURE_MESSAGE}: {}", response.status_text)
        }
        Operation::Health | Operation::ServiceInfo => format!(
            "{} probe failed: {} {}",
            operation.name(),
            response.status,
            response.status_text
        ),
    }
}

/// Validates the configured API base location.
///
/// # Errors
/// Returns [`DispatchError::InvalidEndpoint`] when the value is not an
/// absolute `http`/`https` URL with a host.
pub fn validate_api_base(base: &str) -> Result<Url, DispatchError> {
    let parsed = Url::parse(base)
        .map_err(|error| DispatchError::InvalidEndpoint(format!("invalid api url: {error}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DispatchError::InvalidEndpoint(
            "api url must use http or https".to_string(),
        ));
    }

    if parsed.host_str().is_none() {
        return Err(DispatchError::InvalidEndpoint(
            "api url must include a host".to_string(),
        ));
    }

    Ok(parsed)
}

/// Analysis client that resolves endpoints and interprets responses.
#[derive(Clone)]
pub struct AnalysisClient {
    base: String,
    transport: Arc<dyn AnalysisTransport>,
}

impl AnalysisClient {
    /// Creates a validated client.
    ///
    /// # Errors
    /// Returns [`DispatchError::InvalidEndpoint`] for an unusable base URL.
    pub fn new(
        base: impl Into<String>,
        transport: Arc<dyn AnalysisTransport>,
    ) -> Result<Self, DispatchError> {
        let base = base.into();
        validate_api_base(&base)?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            transport,
        })
    }

    /// Returns the configured API base without trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns the absolute URL of `operation`.
    ///
    /// The operation path is appended to the base verbatim, so a base with a
    /// path prefix keeps it.
    ///
    /// # Errors
    /// Returns [`DispatchError::InvalidEndpoint`] when the joined URL is invalid.
    pub fn endpoint(&self, operation: Operation) -> Result<Url, DispatchError> {
        let joined = format!("{}{}", self.base, operation.path());
        Url::parse(&joined)
            .map_err(|error| DispatchError::InvalidEndpoint(format!("{joined}: {error}")))
    }

    /// Submits one analysis request and parses the result document.
    ///
    /// # Errors
    /// - [`DispatchError::Cancelled`] when `token` fires before sending or
    ///   before the response is interpreted.
    /// - [`DispatchError::Transport`] for network faults.
    /// - [`DispatchError::AnalysisFailed`] for non-2xx responses.
    /// - [`DispatchError::MalformedResponse`] when the body is not a result
    ///   document.
    pub fn dispatch(
        &self,
        request: &AnalysisRequest,
        token: &CancellationToken,
    ) -> Result<RawResultDocument, DispatchError> {
        let (operation, body) = plan_request(request);
        let url = self.endpoint(operation)?;

        match request {
            AnalysisRequest::File { blob, .. } => tracing::info!(
                operation = operation.name(),
                file_name = %blob.file_name,
                size_bytes = blob.size_bytes(),
                digest = %blob.digest_hex(),
                "dispatching analysis"
            ),
            AnalysisRequest::Url { sample_rate, .. } => tracing::info!(
                operation = operation.name(),
                sample_rate = *sample_rate,
                "dispatching analysis"
            ),
        }

        let response = self.send(operation, url, body, token)?;
        parse_result_document(&response.body).map_err(|error| {
            tracing::warn!(operation = operation.name(), %error, "malformed result document");
            DispatchError::MalformedResponse(error.to_string())
        })
    }

    /// Calls `GET /health`.
    ///
    /// # Errors
    /// Same classes as [`AnalysisClient::dispatch`].
    pub fn health(&self) -> Result<HealthStatus, DispatchError> {
        let response = self.probe(Operation::Health)?;
        parse_health(&response.body)
            .map_err(|error| DispatchError::MalformedResponse(error.to_string()))
    }

    /// Calls `GET /`.
    ///
    /// # Errors
    /// Same classes as [`AnalysisClient::dispatch`].
    pub fn service_info(&self) -> Result<ServiceInfo, DispatchError> {
        let response = self.probe(Operation::ServiceInfo)?;
        parse_service_info(&response.body)
            .map_err(|error| DispatchError::MalformedResponse(error.to_string()))
    }

    fn probe(&self, operation: Operation) -> Result<TransportResponse, DispatchError> {
        let url = self.endpoint(operation)?;
        self.send(operation, url, RequestBody::Empty, &CancellationToken::new())
    }

    fn send(
        &self,
        operation: Operation,
        url: Url,
        body: RequestBody,
        token: &CancellationToken,
    ) -> Result<TransportResponse, DispatchError> {
        if token.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }

        let started = Instant::now();
        let request = TransportRequest {
            operation,
            url,
            body,
        };
        let response = self.transport.execute(&request).inspect_err(|error| {
            tracing::warn!(operation = operation.name(), %error, "transport failure");
        })?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if token.is_cancelled() {
            tracing::info!(operation = operation.name(), elapsed_ms, "response discarded after cancel");
            return Err(DispatchError::Cancelled);
        }

        if !response.is_success() {
            let message = failure_message(operation, &response);
            tracing::warn!(
                operation = operation.name(),
                status = response.status,
                elapsed_ms,
                %message,
                "operation rejected"
            );
            return Err(DispatchError::AnalysisFailed {
                status: response.status,
                message,
            });
        }

        tracing::info!(
            operation = operation.name(),
            status = response.status,
            elapsed_ms,
            body_bytes = response.body.len(),
            "operation completed"
        );
        Ok(response)
    }
}

/// Blocking HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Creates a transport.
    ///
    /// `timeout` of `None` leaves requests unbounded.
    ///
    /// # Errors
    /// Returns [`DispatchError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(timeout: Option<Duration>) -> Result<Self, DispatchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| DispatchError::Transport(error.to_string()))?;
        Ok(Self { client })
    }
}

impl AnalysisTransport for HttpTransport {
    fn execute(&self, request: &TransportRequest) -> Result<TransportResponse, DispatchError> {
        let url = request.url.clone();
        let builder = match &request.body {
            RequestBody::Multipart(part) => {
                let file = reqwest::blocking::multipart::Part::bytes(part.bytes.clone())
                    .file_name(part.file_name.clone())
                    .mime_str(&part.media_type)
                    .map_err(|error| {
                        DispatchError::Transport(format!(
                            "invalid media type '{}': {error}",
                            part.media_type
                        ))
                    })?;
                let form = reqwest::blocking::multipart::Form::new().part(part.field.clone(), file);
                self.client.post(url).multipart(form)
            }
            RequestBody::Json(body) => self.client.post(url).json(body),
            RequestBody::Empty => self.client.get(url),
        };

        let response = builder
            .send()
            .map_err(|error| DispatchError::Transport(error.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .map_err(|error| DispatchError::Transport(error.to_string()))?;

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.to_vec(),
        })
    }
}

/// Dispatch errors. `Display` output is the user-facing message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// API base or joined endpoint is unusable.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Backend answered with a non-2xx status.
    #[error("{message}")]
    AnalysisFailed {
        /// HTTP status code.
        status: u16,
        /// Message derived from the response.
        message: String,
    },
    /// Network-level failure.
    #[error("network error: {0}")]
    Transport(String),
    /// Success body is not a result document.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// Dispatch was cancelled by its token.
    #[error("analysis was cancelled")]
    Cancelled,
}
