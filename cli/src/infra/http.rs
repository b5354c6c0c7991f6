//! `reqwest`-backed implementation of the `HttpProbe` port.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::application::ports::HttpProbe;
use crate::domain::probe::{MAX_BODY_SNIPPET, ProbeResult, snippet_from_bytes};

/// HTTP probe with one shared connection pool.
///
/// Redirects are followed, so a site that redirects to HTTPS reports the
/// final status.
pub struct ReqwestProbe {
    client: reqwest::Client,
}

impl ReqwestProbe {
    /// Build the probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("site-doctor/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("cannot build HTTP client")?;
        Ok(Self { client })
    }
}

impl HttpProbe for ReqwestProbe {
    async fn get(&self, url: &str, timeout: Duration) -> Result<ProbeResult> {
        tracing::debug!(%url, timeout_secs = timeout.as_secs(), "http get");
        let started = Instant::now();
        let mut response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        let status_code = response.status().as_u16();
        let response_time = started.elapsed();
        // Stop reading once the snippet is full; a body that fails
        // mid-stream still leaves a usable status code.
        let mut body = Vec::new();
        while body.len() < MAX_BODY_SNIPPET {
            match response.chunk().await {
                Ok(Some(chunk)) => body.extend_from_slice(&chunk),
                Ok(None) | Err(_) => break,
            }
        }
        Ok(ProbeResult {
            status_code,
            response_time,
            body_snippet: snippet_from_bytes(&body),
        })
    }
}
