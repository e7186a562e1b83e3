//! Remote translation and speech calls with exponential backoff.
//!
//! Both Google endpoints the narrator depends on are unauthenticated and
//! rate-limited, so every call goes through a retry decorator. The design is
//! trait-based:
//! - [`RemoteCall`]: one async text-in call against a remote service
//! - [`RetryCall`]: decorator adding retry logic to any `RemoteCall`
//! - [`TranslateCall`] / [`SpeechCall`]: the two concrete endpoints
//!
//! # Retry Strategy
//!
//! - Maximum 5 retry attempts
//! - Exponential backoff starting at 1 second
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use rand::{rng, Rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Retry attempts used by the narrator's remote calls.
pub const MAX_RETRIES: usize = 5;

/// Initial backoff delay for the narrator's remote calls.
pub const BASE_DELAY: StdDuration = StdDuration::from_secs(1);

/// One async call taking a piece of text and returning a service response.
///
/// Implementors are cheap, borrow their HTTP client, and do exactly one
/// request per invocation; resilience is layered on by [`RetryCall`].
pub trait RemoteCall {
    /// The type of response the service yields.
    type Response;

    /// Send `text` to the service and return its response.
    async fn call(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Decorator that adds exponential backoff retry logic to any [`RemoteCall`].
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryCall<T> {
    /// The underlying call to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
}

impl<T> RetryCall<T>
where
    T: RemoteCall,
{
    /// Wrap an existing [`RemoteCall`] implementation.
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryCall<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryCall")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> RemoteCall for RetryCall<T>
where
    T: RemoteCall + fmt::Debug,
{
    type Response = T::Response;

    #[instrument(level = "debug", skip_all)]
    async fn call(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.call(text).await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "call() exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "call() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Text translation via the unauthenticated Google Translate endpoint.
///
/// The endpoint answers a nested JSON array whose first element lists the
/// translated segments; the segments are concatenated in order.
#[derive(Debug)]
pub struct TranslateCall<'a> {
    /// Shared HTTP client.
    pub client: &'a reqwest::Client,
    /// Base endpoint, normally `https://translate.googleapis.com/translate_a/single`.
    pub endpoint: &'a str,
    /// BCP 47 target language tag, e.g. `hi`.
    pub target_lang: &'a str,
}

impl<'a> RemoteCall for TranslateCall<'a> {
    type Response = String;

    async fn call(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let response = self
            .client
            .get(self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "en"),
                ("tl", self.target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(format!("translate endpoint returned status {}", response.status()).into());
        }

        parse_translation(&response.text().await?)
    }
}

/// Pull the translated text out of the endpoint's nested-array body and
/// concatenate its segments in order.
fn parse_translation(body: &str) -> Result<String, Box<dyn Error>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let segments = value
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or("unexpected translation response shape")?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(piece) = segment.get(0).and_then(|p| p.as_str()) {
            translated.push_str(piece);
        }
    }
    if translated.is_empty() {
        return Err("empty translation response".into());
    }
    Ok(translated)
}

/// Speech synthesis via the unauthenticated Google TTS endpoint.
///
/// Returns raw MP3 bytes for one chunk of text. The endpoint rejects long
/// inputs, so callers chunk the script first (see `narrator::tts`).
#[derive(Debug)]
pub struct SpeechCall<'a> {
    /// Shared HTTP client.
    pub client: &'a reqwest::Client,
    /// Base endpoint, normally `https://translate.google.com/translate_tts`.
    pub endpoint: &'a str,
    /// BCP 47 speech language tag, e.g. `hi`.
    pub lang: &'a str,
}

impl<'a> RemoteCall for SpeechCall<'a> {
    type Response = Vec<u8>;

    async fn call(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let response = self
            .client
            .get(self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.lang),
                ("q", text),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(format!("tts endpoint returned status {}", response.status()).into());
        }
        Ok(response.bytes().await?.to_vec())
    }
}
