//! Headless driver that loads pages over plain HTTP.
//!
//! No JavaScript runs: the "document" is whatever the server returns. Good
//! enough for server-rendered applications and for smoke-checking a page
//! mapping against a live deployment.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Node};
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::Driver;
use crate::errors::{NavError, Result};

pub const ABOUT_BLANK: &str = "about:blank";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
struct LoadedDocument {
    url: String,
    text: String,
}

pub struct HttpDriver {
    client: reqwest::Client,
    document: RwLock<Option<LoadedDocument>>,
    poll_interval: Duration,
}

impl HttpDriver {
    /// Build a driver whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NavError::Http)?;
        Ok(Self {
            client,
            document: RwLock::new(None),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Interval between re-fetches while waiting for text.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    async fn fetch(&self, url: &str) -> Result<LoadedDocument> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NavError::Navigation(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            return Err(NavError::Navigation(format!(
                "GET {} returned {}",
                url, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| NavError::Navigation(format!("reading {} failed: {}", url, e)))?;

        Ok(LoadedDocument {
            url: final_url,
            text: visible_text(&body),
        })
    }
}

#[async_trait]
impl Driver for HttpDriver {
    async fn visit(&self, url: &str) -> Result<()> {
        let document = self.fetch(url).await?;
        tracing::debug!(url, final_url = %document.url, "Loaded document");
        *self.document.write().await = Some(document);
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self
            .document
            .read()
            .await
            .as_ref()
            .map(|d| d.url.clone())
            .unwrap_or_else(|| ABOUT_BLANK.to_string()))
    }

    async fn is_text_present(&self, text: &str, wait_time: Duration) -> Result<bool> {
        let needle = collapse_whitespace(text.split_whitespace());
        let deadline = Instant::now().checked_add(wait_time);
        loop {
            let url = match self.document.read().await.as_ref() {
                None => return Ok(false),
                Some(doc) if doc.text.contains(&needle) => return Ok(true),
                Some(doc) => doc.url.clone(),
            };

            let now = Instant::now();
            if deadline.is_some_and(|d| now >= d) {
                return Ok(false);
            }
            let pause = deadline.map_or(self.poll_interval, |d| self.poll_interval.min(d - now));
            tokio::time::sleep(pause).await;

            let refreshed = self.fetch(&url).await?;
            *self.document.write().await = Some(refreshed);
        }
    }
}

/// Text a user would see: every text node outside `script`, `style` and
/// `noscript`, whitespace collapsed.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut chunks: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| e.name()))
            .is_some_and(|name| matches!(name, "script" | "style" | "noscript"));
        if !hidden {
            chunks.extend(text.split_whitespace());
        }
    }

    collapse_whitespace(chunks)
}

fn collapse_whitespace<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    words.into_iter().collect::<Vec<_>>().join(" ")
}
