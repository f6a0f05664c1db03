use std::any::Any;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::{Page, PageKwargs};
use crate::driver::DriverHandle;
use crate::errors::{NavError, Result};
use crate::navigation::NavigationHandle;

/// Registry key of [`BasePage`].
pub const BASE_PAGE_PATH: &str = "pomnav.pages.BasePage";

pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(10);

const URL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Generic page object with no page-specific readiness condition.
pub struct BasePage {
    driver: DriverHandle,
    kwargs: PageKwargs,
    navigation: Option<NavigationHandle>,
}

impl BasePage {
    pub fn new(driver: DriverHandle, kwargs: PageKwargs) -> Self {
        Self {
            driver,
            kwargs,
            navigation: None,
        }
    }

    /// Constructor registered under [`BASE_PAGE_PATH`].
    pub fn construct(driver: DriverHandle, kwargs: PageKwargs) -> Result<Box<dyn Page>> {
        Ok(Box::new(Self::new(driver, kwargs)))
    }

    pub fn kwargs(&self) -> &PageKwargs {
        &self.kwargs
    }

    pub fn timeout(&self) -> Duration {
        self.kwargs.timeout.unwrap_or(DEFAULT_PAGE_TIMEOUT)
    }

    pub async fn current_url(&self) -> Result<String> {
        self.driver.current_url().await
    }

    /// Whether `text` shows up within the page timeout.
    pub async fn has_text(&self, text: &str) -> Result<bool> {
        self.driver.is_text_present(text, self.timeout()).await
    }

    /// Wait until the driver has left `url`.
    pub async fn wait_for_url_change(&self, url: &str) -> Result<&Self> {
        let timeout = self.timeout();
        // `None` when the timeout is too far out to represent: poll forever.
        let deadline = Instant::now().checked_add(timeout);
        loop {
            if self.current_url().await? != url {
                return Ok(self);
            }
            let now = Instant::now();
            if deadline.is_some_and(|d| now >= d) {
                return Err(NavError::ReadinessTimeout {
                    page: format!("url change from {}", url),
                    timeout,
                });
            }
            let pause = deadline.map_or(URL_POLL_INTERVAL, |d| URL_POLL_INTERVAL.min(d - now));
            tokio::time::sleep(pause).await;
        }
    }
}

#[async_trait]
impl Page for BasePage {
    fn driver(&self) -> &DriverHandle {
        &self.driver
    }

    fn base_url(&self) -> Option<&str> {
        self.kwargs.base_url.as_deref()
    }

    fn navigation(&self) -> Option<&NavigationHandle> {
        self.navigation.as_ref()
    }

    fn set_navigation(&mut self, navigation: NavigationHandle) {
        self.navigation = Some(navigation);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Driver;
    use crate::test_utils::MockDriver;
    use std::sync::Arc;

    fn page_with(driver: Arc<MockDriver>, kwargs: PageKwargs) -> BasePage {
        BasePage::new(driver, kwargs)
    }

    #[tokio::test]
    async fn test_open_visits_base_url() {
        let driver = Arc::new(MockDriver::new());
        let page = page_with(
            driver.clone(),
            PageKwargs::new().base_url("https://example.com/home"),
        );
        page.open().await.unwrap();
        assert_eq!(driver.visits(), vec!["https://example.com/home".to_string()]);
    }

    #[tokio::test]
    async fn test_open_without_base_url_fails() {
        let driver = Arc::new(MockDriver::new());
        let page = page_with(driver.clone(), PageKwargs::new());
        assert!(matches!(page.open().await, Err(NavError::Config(_))));
        assert!(driver.visits().is_empty());
    }

    #[tokio::test]
    async fn test_has_text_uses_page_timeout() {
        let driver = Arc::new(MockDriver::new().with_text("Welcome"));
        let page = page_with(
            driver.clone(),
            PageKwargs::new().timeout(Duration::from_secs(3)),
        );
        assert!(page.has_text("Welcome").await.unwrap());
        assert!(!page.has_text("Goodbye").await.unwrap());
        assert_eq!(driver.last_wait_time(), Some(Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn test_wait_for_url_change_returns_once_moved() {
        let driver = Arc::new(MockDriver::new());
        driver.visit("https://example.com/next").await.unwrap();
        let page = page_with(driver, PageKwargs::new());
        assert!(page
            .wait_for_url_change("https://example.com/login")
            .await
            .is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_url_change_times_out() {
        let driver = Arc::new(MockDriver::new());
        driver.visit("https://example.com/login").await.unwrap();
        let page = page_with(driver, PageKwargs::new().timeout(Duration::from_secs(1)));
        let result = page.wait_for_url_change("https://example.com/login").await;
        assert!(matches!(result, Err(NavError::ReadinessTimeout { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_url_change_unbounded_timeout_keeps_polling() {
        let driver = Arc::new(MockDriver::new());
        driver.visit("https://example.com/login").await.unwrap();
        let page = page_with(driver, PageKwargs::new().timeout(Duration::MAX));
        let outer = tokio::time::timeout(
            Duration::from_secs(1),
            page.wait_for_url_change("https://example.com/login"),
        )
        .await;
        assert!(outer.is_err());
    }

    #[test]
    fn test_downcast_from_trait_object() {
        let page: Box<dyn Page> =
            BasePage::construct(Arc::new(MockDriver::new()), PageKwargs::new()).unwrap();
        assert!(page.downcast_ref::<BasePage>().is_some());
    }
}
