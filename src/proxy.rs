//! Relay-based fetching for upstreams that refuse direct requests.
//!
//! Each round tries every relay in order and returns the first 2xx response.
//! Failed rounds are followed by a fixed backoff; once all rounds are spent
//! the call fails with [`RateError::FetchExhausted`].

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, REFERER, USER_AGENT};

use crate::error::{RateError, Result};
use crate::http::{HttpFetch, HttpResponse};

pub const DEFAULT_ROUNDS: u32 = 2;
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(400);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125 Safari/537.36";
const BROWSER_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
const BIDV_REFERER: &str = "https://bidv.com.vn/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relay {
    /// Pass-through relay, fast but strict.
    CorsProxy,
    /// Wrapping relay, slower but more tolerant.
    AllOrigins,
}

impl Relay {
    pub const ORDER: [Relay; 2] = [Relay::CorsProxy, Relay::AllOrigins];

    pub fn wrap(&self, target: &str) -> String {
        let encoded = urlencoding::encode(target);
        match self {
            Relay::CorsProxy => format!("https://corsproxy.io/?{}", encoded),
            Relay::AllOrigins => format!("https://api.allorigins.win/raw?url={}", encoded),
        }
    }
}

/// Header set that upstream anti-bot checks expect from a browser.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(REFERER, HeaderValue::from_static(BIDV_REFERER));
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers
}

#[derive(Clone)]
pub struct ProxyFetcher {
    http: Arc<dyn HttpFetch>,
    relays: Vec<Relay>,
    rounds: u32,
    backoff: Duration,
    headers: HeaderMap,
}

impl ProxyFetcher {
    pub fn new(http: Arc<dyn HttpFetch>) -> Self {
        Self {
            http,
            relays: Relay::ORDER.to_vec(),
            rounds: DEFAULT_ROUNDS,
            backoff: DEFAULT_BACKOFF,
            headers: browser_headers(),
        }
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub async fn fetch(&self, target: &str) -> Result<HttpResponse> {
        let mut attempts = 0;

        for round in 1..=self.rounds {
            for relay in &self.relays {
                attempts += 1;
                match self.http.get(&relay.wrap(target), &self.headers).await {
                    Ok(resp) if resp.is_success() => return Ok(resp),
                    Ok(resp) => debug!("{:?} answered {} for {}", relay, resp.status, target),
                    Err(e) => debug!("{:?} failed for {}: {}", relay, target, e),
                }
            }

            if round < self.rounds {
                tokio::time::sleep(self.backoff).await;
            }
        }

        warn!("all relays failed for {} after {} attempts", target, attempts);
        Err(RateError::FetchExhausted {
            url: target.to_string(),
            attempts,
        })
    }
}
