use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;

/// Shared HTTP client for all scrapers: browser-like default headers, a
/// per-client timeout and a small bounded retry loop with linear backoff
/// plus jitter on transport errors.
pub struct HttpClient {
    http: Client,
    retries: u32,
}

impl HttpClient {
    pub fn new(timeout_secs: u64, retries: u32) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            ),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("nl-NL,nl;q=0.9,en;q=0.6"),
        );

        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpClient { http, retries })
    }

    /// GET returning the response body as JSON. `Ok(None)` covers empty
    /// responses (204/304/404) and non-success statuses.
    pub async fn get_json(
        &self,
        url: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        self.execute(url, headers, || {
            self.http.request(Method::GET, url).query(params)
        })
        .await
    }

    /// POST with a JSON body, returning the response body as JSON.
    pub async fn post_json(
        &self,
        url: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        self.execute(url, headers, || {
            self.http.request(Method::POST, url).json(body)
        })
        .await
    }

    async fn execute(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        build: impl Fn() -> RequestBuilder,
    ) -> Result<Option<Value>> {
        let mut last_err = None;

        for attempt in 0..=self.retries {
            if attempt > 0 {
                let jitter_ms = rand::thread_rng().gen_range(0..250);
                let backoff = Duration::from_millis(500 * attempt as u64 + jitter_ms);
                debug!("Retrying {} in {:?} (attempt {})", url, backoff, attempt + 1);
                tokio::time::sleep(backoff).await;
            }

            let mut request = build();
            for &(name, value) in headers {
                request = request.header(name, value);
            }

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    last_err = Some(anyhow::Error::from(e));
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                return match response.json::<Value>().await {
                    Ok(json) => Ok(Some(json)),
                    Err(e) => {
                        debug!("Non-JSON body from {}: {}", url, e);
                        Ok(None)
                    }
                };
            }
            if matches!(
                status,
                StatusCode::NO_CONTENT | StatusCode::NOT_MODIFIED | StatusCode::NOT_FOUND
            ) {
                return Ok(None);
            }
            debug!("Request to {} returned {}", url, status);
            return Ok(None);
        }

        Err(last_err
            .unwrap_or_else(|| anyhow::anyhow!("request failed"))
            .context(format!("request to {url} failed after retries")))
    }
}
