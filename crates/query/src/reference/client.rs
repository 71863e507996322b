use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use noahs_core::zodiac::{ChineseZodiac, SignWindow, ZodiacSign};
use tracing::{debug, instrument};
use url::Url;

use super::{ReferenceError, SIGN_ARTICLE, ZodiacReference, parse_animal_years, parse_sign_window};
use crate::config::HttpConfig;

/// First retry delay; doubles on every further attempt.
const BACKOFF_BASE: Duration = Duration::from_millis(250);

/// Client for the encyclopedia articles holding the zodiac tables.
///
/// Documents are cached for the lifetime of the client, so several puzzles
/// sharing a page fetch it once.
#[derive(Clone)]
pub struct ReferenceClient {
    inner: Arc<ReferenceClientInner>,
}

struct ReferenceClientInner {
    client: reqwest::Client,
    base_url: Url,
    retries: u32,
    cache: Cache<String, Arc<str>>,
}

impl std::fmt::Debug for ReferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("retries", &self.inner.retries)
            .finish_non_exhaustive()
    }
}

impl ReferenceClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &HttpConfig) -> Result<Self, ReferenceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("noahs-query/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(Duration::from_secs(3600))
            .build();

        Ok(Self {
            inner: Arc::new(ReferenceClientInner {
                client,
                base_url: config.base_url.clone(),
                retries: config.retries,
                cache,
            }),
        })
    }

    /// URL of the article titled `title`.
    ///
    /// # Errors
    ///
    /// Returns an error if the title does not form a valid URL.
    pub fn article_url(&self, title: &str) -> Result<Url, ReferenceError> {
        Ok(self.inner.base_url.join(title)?)
    }

    /// Fetch an article body, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted, or the first
    /// non-transient one.
    #[instrument(skip(self))]
    pub async fn fetch(&self, title: &str) -> Result<Arc<str>, ReferenceError> {
        let url = self.article_url(title)?;
        let key = url.to_string();

        if let Some(body) = self.inner.cache.get(&key).await {
            debug!("Cache hit for reference document");
            return Ok(body);
        }

        let mut attempt = 0;
        loop {
            match self.fetch_once(&url).await {
                Ok(body) => {
                    let body: Arc<str> = Arc::from(body);
                    self.inner.cache.insert(key, Arc::clone(&body)).await;
                    return Ok(body);
                }
                Err(e) if e.is_transient() && attempt < self.inner.retries => {
                    let delay = BACKOFF_BASE * 2_u32.saturating_pow(attempt);
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis(),
                        "Reference fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<String, ReferenceError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReferenceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched reference document");
        Ok(body)
    }

    /// Tropical date window of `sign`.
    ///
    /// # Errors
    ///
    /// Returns an error if the article cannot be fetched or parsed.
    #[instrument(skip(self), fields(sign = %sign))]
    pub async fn sign_window(&self, sign: ZodiacSign) -> Result<SignWindow, ReferenceError> {
        let html = self.fetch(SIGN_ARTICLE).await?;
        parse_sign_window(&html, SIGN_ARTICLE, sign)
    }

    /// Start years of `animal`.
    ///
    /// # Errors
    ///
    /// Returns an error if the article cannot be fetched or parsed.
    #[instrument(skip(self), fields(animal = %animal))]
    pub async fn animal_years(
        &self,
        animal: ChineseZodiac,
    ) -> Result<BTreeSet<i32>, ReferenceError> {
        let title = animal.article_title();
        let html = self.fetch(&title).await?;
        parse_animal_years(&html, &title)
    }

    /// Both halves of a zodiac lookup.
    ///
    /// # Errors
    ///
    /// Returns the first fetch or parse error.
    pub async fn lookup(
        &self,
        sign: ZodiacSign,
        animal: ChineseZodiac,
    ) -> Result<ZodiacReference, ReferenceError> {
        let window = self.sign_window(sign).await?;
        let animal_years = self.animal_years(animal).await?;
        tracing::info!(
            %sign,
            %animal,
            window_start = %window.start,
            window_end = %window.end,
            years = animal_years.len(),
            "Fetched zodiac reference"
        );
        Ok(ZodiacReference {
            sign,
            animal,
            window,
            animal_years,
        })
    }
}
