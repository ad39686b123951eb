//! Test doubles for the API capability, the rate limiter and the log output.

use crate::throttle::RateLimiter;
use crate::youtube_api::client::{ListRequest, YouTubeApi};
use serde_json::Value;
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Answers `list` calls from a fixed script, in call order, and records every request.
#[derive(Debug, Default)]
pub(crate) struct ScriptedApi {
    script: Mutex<VecDeque<Result<Value, String>>>,
    requests: Mutex<Vec<ListRequest>>,
}

impl ScriptedApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, response: Value) -> Self {
        self.script.lock().unwrap().push_back(Ok(response));
        self
    }

    pub(crate) fn fail(self, message: &str) -> Self {
        self.script.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub(crate) fn requests(&self) -> Vec<ListRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

impl YouTubeApi for ScriptedApi {
    async fn list(&self, request: &ListRequest) -> eyre::Result<Value> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(eyre::eyre!(message)),
            None => Err(eyre::eyre!("no scripted response for {}", request.resource)),
        }
    }
}

/// Never sleeps, just counts.
#[derive(Debug, Default)]
pub(crate) struct CountingLimiter(AtomicUsize);

impl CountingLimiter {
    pub(crate) fn waits(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl RateLimiter for CountingLimiter {
    async fn wait_before_next_call(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Log lines written while this is alive, on the current thread.
pub(crate) struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
    _guard: tracing::subscriber::DefaultGuard,
}

impl CapturedLogs {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub(crate) fn capture_logs() -> CapturedLogs {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = Arc::clone(&buffer);
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || CaptureWriter(Arc::clone(&writer)))
        .finish();
    CapturedLogs {
        buffer,
        _guard: tracing::subscriber::set_default(subscriber),
    }
}
