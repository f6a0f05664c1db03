//! Browser driver abstraction.
//!
//! Navigation never talks to a browser directly: it only asks a page for its
//! [`DriverHandle`] and calls [`Driver::visit`]. Consecutive pages share the
//! same handle; the physical browser session belongs to whoever created it.

pub mod http;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::Result;

pub use http::HttpDriver;

#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate the browser to `url`.
    async fn visit(&self, url: &str) -> Result<()>;

    /// URL of the document currently loaded.
    async fn current_url(&self) -> Result<String>;

    /// Whether `text` appears in the current document within `wait_time`.
    async fn is_text_present(&self, text: &str, wait_time: Duration) -> Result<bool>;

    async fn maximize_window(&self) -> Result<()> {
        Ok(())
    }
}

/// Shared handle to a driver; cloned into every page object.
pub type DriverHandle = Arc<dyn Driver>;

/// Supplies a driver when no current page exists yet.
#[async_trait]
pub trait BrowserProvider: Send + Sync {
    async fn browser(&self) -> Result<DriverHandle>;
}

/// A provider that always hands out the same, already opened driver.
#[derive(Clone)]
pub struct SharedBrowser {
    driver: DriverHandle,
}

impl SharedBrowser {
    pub fn new(driver: DriverHandle) -> Self {
        Self { driver }
    }
}

#[async_trait]
impl BrowserProvider for SharedBrowser {
    async fn browser(&self) -> Result<DriverHandle> {
        Ok(self.driver.clone())
    }
}
