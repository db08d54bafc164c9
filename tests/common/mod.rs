#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::HeaderMap;
use tygia::bank::BankClients;
use tygia::error::{RateError, Result};
use tygia::http::{HttpFetch, HttpResponse};
use tygia::proxy::ProxyFetcher;

/// In-memory upstream: answers registered URLs, fails everything else
/// with a transport error, and records every request.
#[derive(Default)]
pub struct ScriptedHttp {
    responses: Mutex<HashMap<String, HttpResponse>>,
    requests: Mutex<Vec<(String, HeaderMap)>>,
}

impl ScriptedHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: impl Into<String>, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.into(), HttpResponse::new(status, body));
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn headers_of(&self, index: usize) -> HeaderMap {
        self.requests.lock().unwrap()[index].1.clone()
    }
}

#[async_trait]
impl HttpFetch for ScriptedHttp {
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<HttpResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), headers.clone()));

        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| RateError::Transport {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn proxy(http: &Arc<ScriptedHttp>) -> ProxyFetcher {
    ProxyFetcher::new(http.clone()).with_backoff(Duration::ZERO)
}

pub fn clients(http: &Arc<ScriptedHttp>) -> BankClients {
    BankClients::new(http.clone(), proxy(http))
}

pub fn techcombank_doc(entries: serde_json::Value) -> String {
    serde_json::json!({ "exchangeRate": { "data": entries } }).to_string()
}
