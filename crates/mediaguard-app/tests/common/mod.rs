//! Shared fixtures for app integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use mediaguard_app::{AnalysisController, AppConfig};
use mediaguard_core::{FeatureFlags, MediaBlob};
use mediaguard_dispatch::{AnalysisTransport, DispatchError, TransportRequest, TransportResponse};
use mediaguard_ui::Header;

/// Transport that replays queued responses and records every request.
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<TransportResponse, DispatchError>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    /// Creates a transport with no queued responses.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues one response.
    pub fn push(&self, response: Result<TransportResponse, DispatchError>) {
        self.responses
            .lock()
            .expect("responses lock should not be poisoned")
            .push_back(response);
    }

    /// Queues a 200 response with `body`.
    pub fn push_ok(&self, body: impl Into<Vec<u8>>) {
        self.push(Ok(TransportResponse {
            status: 200,
            status_text: "OK".to_string(),
            body: body.into(),
        }));
    }

    /// Queues a non-2xx response.
    pub fn push_status(&self, status: u16, status_text: &str, body: impl Into<Vec<u8>>) {
        self.push(Ok(TransportResponse {
            status,
            status_text: status_text.to_string(),
            body: body.into(),
        }));
    }

    /// Returns every request executed so far.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .expect("requests lock should not be poisoned")
            .clone()
    }
}

impl AnalysisTransport for ScriptedTransport {
    fn execute(&self, request: &TransportRequest) -> Result<TransportResponse, DispatchError> {
        self.requests
            .lock()
            .expect("requests lock should not be poisoned")
            .push(request.clone());
        self.responses
            .lock()
            .expect("responses lock should not be poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(DispatchError::Transport("no scripted response".to_string())))
    }
}

/// Config with both input modes enabled.
#[allow(dead_code)]
pub fn config() -> AppConfig {
    config_with_flags(FeatureFlags::new(true, true))
}

/// Config with the given flags and a local API base.
#[allow(dead_code)]
pub fn config_with_flags(flags: FeatureFlags) -> AppConfig {
    AppConfig {
        api_url: "http://localhost:8000".to_string(),
        header: Header {
            title: "Deepfake Detection Platform".to_string(),
            subtitle: "Advanced AI-Powered Media Authentication".to_string(),
        },
        flags,
        request_timeout: None,
    }
}

/// Builds a controller over a fresh scripted transport.
#[allow(dead_code)]
pub fn controller() -> (AnalysisController, Arc<ScriptedTransport>) {
    let transport = ScriptedTransport::new();
    let controller = AnalysisController::new(&config(), transport.clone())
        .expect("controller should build from test config");
    (controller, transport)
}

/// Reads one contract fixture body.
#[allow(dead_code)]
pub fn fixture(name: &str) -> Vec<u8> {
    let path = format!(
        "{}/../../contracts/fixtures/{name}.valid.json",
        env!("CARGO_MANIFEST_DIR")
    );
    std::fs::read(&path).expect("contract fixture should be readable")
}

/// Small video blob.
#[allow(dead_code)]
pub fn video_blob() -> MediaBlob {
    MediaBlob::new("interview.mp4", "video/mp4", vec![0_u8; 2048])
}

/// Small image blob.
#[allow(dead_code)]
pub fn image_blob() -> MediaBlob {
    MediaBlob::new("portrait.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}
