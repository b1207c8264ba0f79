//! Transport with canned responses keyed by URL; records every request.

use fetchguard_core::fetch_head::{FetchError, HopRequest, HopResponse, HopTransport};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Arc<HashMap<String, HopResponse>>,
    requests: Arc<Mutex<Vec<HopRequest>>>,
}

impl ScriptedTransport {
    pub fn new(script: &[(&str, HopResponse)]) -> Self {
        let responses = script
            .iter()
            .map(|(url, resp)| (url.to_string(), resp.clone()))
            .collect();
        Self {
            responses: Arc::new(responses),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<HopRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

impl HopTransport for ScriptedTransport {
    fn head(&self, req: &HopRequest) -> Result<HopResponse, FetchError> {
        self.requests.lock().unwrap().push(req.clone());
        self.responses
            .get(&req.url)
            .cloned()
            .ok_or_else(|| FetchError::Transport(format!("unscripted request to {}", req.url)))
    }
}

pub fn redirect(status: u32, location: &str) -> HopResponse {
    HopResponse {
        status,
        location: Some(location.to_string()),
        ..HopResponse::default()
    }
}

pub fn ok(content_type: &str, len: u64) -> HopResponse {
    HopResponse {
        status: 200,
        location: None,
        content_type: Some(content_type.to_string()),
        content_length: Some(len),
    }
}

pub fn status(code: u32) -> HopResponse {
    HopResponse {
        status: code,
        ..HopResponse::default()
    }
}
