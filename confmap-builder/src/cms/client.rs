///! ButterCMS content API client

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Url};

use super::types::{CollectionResponse, RawConference};
use crate::config::CmsConfig;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_SECONDS: u64 = 2;
const REQUEST_TIMEOUT_SECONDS: u64 = 60;

pub struct CmsClient {
    client: Client,
    api_base: String,
    api_key: String,
    preview: bool,
}

impl CmsClient {
    pub fn new(config: &CmsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .user_agent(concat!("confmap-builder/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            preview: config.preview,
        })
    }

    /// Content endpoint for `key`; `test=1` asks for draft content.
    /// Carries the token, so never log it.
    pub fn collection_url(&self, key: &str) -> Result<Url> {
        let test = if self.preview { "1" } else { "0" };
        Url::parse_with_params(
            &format!("{}/v2/content/", self.api_base),
            &[("keys", key), ("auth_token", self.api_key.as_str()), ("test", test)],
        )
        .with_context(|| format!("Invalid CMS api_base '{}'", self.api_base))
    }

    /// Fetch every item of the collection `key`, retrying transient failures
    pub async fn fetch_collection(&self, key: &str) -> Result<Vec<RawConference>> {
        if self.api_key.is_empty() {
            anyhow::bail!("No CMS API key configured (set BUTTER_CMS_API_KEY)");
        }

        let url = self.collection_url(key)?;

        for attempt in 1..=MAX_RETRIES {
            if attempt > 1 {
                let delay = Duration::from_secs(RETRY_DELAY_SECONDS * attempt as u64);
                tracing::debug!(
                    "Retrying collection '{}' after {:?} (attempt {}/{})",
                    key,
                    delay,
                    attempt,
                    MAX_RETRIES
                );
                tokio::time::sleep(delay).await;
            }

            match self.fetch_attempt(&url, key).await {
                Ok(items) => {
                    tracing::info!("Fetched {} items from collection '{}'", items.len(), key);
                    return Ok(items);
                }
                Err(e) if attempt == MAX_RETRIES => {
                    tracing::error!(
                        "Failed to fetch collection '{}' after {} attempts: {:#}",
                        key,
                        MAX_RETRIES,
                        e
                    );
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!("Attempt {}/{} failed for '{}': {:#}", attempt, MAX_RETRIES, key, e);
                }
            }
        }

        Err(anyhow::anyhow!(
            "Failed to fetch collection '{}' after {} attempts",
            key,
            MAX_RETRIES
        ))
    }

    /// Errors are stripped of the request URL so the token stays out of the logs
    async fn fetch_attempt(&self, url: &Url, key: &str) -> Result<Vec<RawConference>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to send request for '{}'", key))?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error {} for '{}'", response.status(), key);
        }

        let body: CollectionResponse = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to parse JSON response for '{}'", key))?;

        Ok(body.take_collection(key))
    }
}
