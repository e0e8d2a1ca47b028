// Test mocks for the pipeline's trait boundaries.
//
// MockFetcher (ContentFetcher) — HashMap-based URL→response with
//   scripted failures and a call log for retry assertions.
// FixedEmbedder / OversizeEmbedder / FailingEmbedder (TextEmbedder) —
//   deterministic vectors and scripted provider failures.
//
// The in-memory ProfileStore in `store` doubles as the test store.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use ai_client::EmbedError;
use kindred_common::types::RawRecord;

use crate::traits::{ContentFetcher, TextEmbedder};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

enum FetchScript {
    Succeed(RawRecord),
    AlwaysFail,
    /// Fail the first N attempts, then succeed.
    FailTimes(u32, RawRecord),
}

/// Scripted content fetcher. Unregistered URLs fail. Records every
/// call so tests can assert attempt counts and livecrawl flags.
#[derive(Default)]
pub struct MockFetcher {
    scripts: HashMap<String, FetchScript>,
    calls: Mutex<Vec<(String, bool)>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, url: &str, record: RawRecord) -> Self {
        self.scripts
            .insert(url.to_string(), FetchScript::Succeed(record));
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.scripts
            .insert(url.to_string(), FetchScript::AlwaysFail);
        self
    }

    pub fn failing_times(mut self, url: &str, times: u32, record: RawRecord) -> Self {
        self.scripts
            .insert(url.to_string(), FetchScript::FailTimes(times, record));
        self
    }

    /// Number of fetch attempts made against a URL.
    pub fn attempts(&self, url: &str) -> u32 {
        self.calls
            .lock()
            .expect("mock lock")
            .iter()
            .filter(|(u, _)| u == url)
            .count() as u32
    }

    /// The livecrawl flag of each attempt against a URL, in order.
    pub fn livecrawl_flags(&self, url: &str) -> Vec<bool> {
        self.calls
            .lock()
            .expect("mock lock")
            .iter()
            .filter(|(u, _)| u == url)
            .map(|(_, livecrawl)| *livecrawl)
            .collect()
    }
}

#[async_trait]
impl ContentFetcher for MockFetcher {
    async fn fetch(&self, url: &str, livecrawl: bool) -> Result<RawRecord> {
        let attempt = {
            let mut calls = self.calls.lock().expect("mock lock");
            calls.push((url.to_string(), livecrawl));
            calls.iter().filter(|(u, _)| u == url).count() as u32
        };

        match self.scripts.get(url) {
            Some(FetchScript::Succeed(record)) => Ok(record.clone()),
            Some(FetchScript::AlwaysFail) => bail!("scripted failure for {url}"),
            Some(FetchScript::FailTimes(times, record)) => {
                if attempt <= *times {
                    bail!("scripted transient failure for {url}")
                }
                Ok(record.clone())
            }
            None => bail!("no script registered for {url}"),
        }
    }
}

/// Convenience raw record with a given text blob.
pub fn raw_record(url: &str, text: &str) -> RawRecord {
    RawRecord {
        url: url.to_string(),
        title: None,
        author: None,
        text: Some(text.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Embedders
// ---------------------------------------------------------------------------

/// Returns the same vector for every input.
pub struct FixedEmbedder {
    vector: Vec<f32>,
    calls: Mutex<u32>,
    last_input: Mutex<Option<String>>,
}

impl FixedEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            calls: Mutex::new(0),
            last_input: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().expect("mock lock")
    }

    pub fn last_input(&self) -> Option<String> {
        self.last_input.lock().expect("mock lock").clone()
    }
}

#[async_trait]
impl TextEmbedder for FixedEmbedder {
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbedError> {
        *self.calls.lock().expect("mock lock") += 1;
        *self.last_input.lock().expect("mock lock") = Some(text.to_string());
        Ok(self.vector.clone())
    }
}

/// Rejects any input longer than `max_chars` as ContextTooLarge,
/// mimicking the provider's context-window behavior.
pub struct OversizeEmbedder {
    vector: Vec<f32>,
    max_chars: usize,
    calls: Mutex<u32>,
    last_input: Mutex<Option<String>>,
}

impl OversizeEmbedder {
    pub fn new(vector: Vec<f32>, max_chars: usize) -> Self {
        Self {
            vector,
            max_chars,
            calls: Mutex::new(0),
            last_input: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().expect("mock lock")
    }

    pub fn last_input(&self) -> Option<String> {
        self.last_input.lock().expect("mock lock").clone()
    }
}

#[async_trait]
impl TextEmbedder for OversizeEmbedder {
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbedError> {
        *self.calls.lock().expect("mock lock") += 1;
        if text.chars().count() > self.max_chars {
            return Err(EmbedError::ContextTooLarge);
        }
        *self.last_input.lock().expect("mock lock") = Some(text.to_string());
        Ok(self.vector.clone())
    }
}

/// Always fails with a non-recoverable provider error.
pub struct FailingEmbedder;

#[async_trait]
impl TextEmbedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> std::result::Result<Vec<f32>, EmbedError> {
        Err(EmbedError::Api {
            status: 500,
            message: "scripted provider failure".to_string(),
        })
    }
}
