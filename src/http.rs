//! Shared HTTP plumbing for the provider clients
//!
//! Builds a `reqwest` client wrapped in `reqwest-middleware` with request
//! tracing, and maps transport and decoding failures onto [`LookupError`].
//! Requests are not retried.

use crate::LookupError;
use http::Extensions;
use reqwest::{Client, Request, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Logs method, redacted URL, status and latency of every outbound request
pub struct RequestTracing;

#[async_trait::async_trait]
impl Middleware for RequestTracing {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let method = req.method().clone();
        let url = redact(req.url().as_str()).to_string();
        let started = Instant::now();

        let result = next.run(req, extensions).await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(response) => debug!(
                "{} {} -> {} in {:.3}s",
                method,
                url,
                response.status(),
                elapsed
            ),
            Err(e) => warn!("{} {} failed after {:.3}s: {}", method, url, elapsed, e),
        }
        result
    }
}

/// Build the middleware-wrapped client used by all providers
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<ClientWithMiddleware, LookupError> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| LookupError::network(format!("Failed to create HTTP client: {e}")))?;

    Ok(ClientBuilder::new(client).with(RequestTracing).build())
}

/// GET `url` and decode the JSON body.
///
/// Transport failures and non-success statuses are [`LookupError::Network`];
/// a body that does not decode into `T` is [`LookupError::Parse`].
pub async fn get_json<T: DeserializeOwned>(
    client: &ClientWithMiddleware,
    url: &str,
) -> Result<T, LookupError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::network(format!(
            "{} returned HTTP {}",
            redact(url),
            status
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| LookupError::network(format!("Failed to read response body: {e}")))?;

    serde_json::from_str(&body)
        .map_err(|e| LookupError::parse(format!("Unexpected response from {}: {e}", redact(url))))
}

/// Strip the API key query parameter before a URL reaches the logs
fn redact(url: &str) -> &str {
    url.split("appid=").next().unwrap_or(url)
}
