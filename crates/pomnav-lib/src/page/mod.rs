//! Page objects: the contract every page class implements, the keyword
//! configuration they are built with, and the stock [`BasePage`].

pub mod base;
pub mod kwargs;

use std::any::Any;

use async_trait::async_trait;

use crate::driver::DriverHandle;
use crate::errors::{NavError, Result};
use crate::navigation::NavigationHandle;

pub use base::{BasePage, BASE_PAGE_PATH};
pub use kwargs::PageKwargs;

/// A page or view of the application under test.
///
/// Implementors are constructed through a [`crate::registry::PageRegistry`]
/// from a driver handle and a [`PageKwargs`].
#[async_trait]
pub trait Page: Send + Sync + 'static {
    fn driver(&self) -> &DriverHandle;

    /// Absolute URL this page was built for, if any.
    fn base_url(&self) -> Option<&str>;

    /// Back-reference to the navigation currently holding this page.
    fn navigation(&self) -> Option<&NavigationHandle>;

    fn set_navigation(&mut self, navigation: NavigationHandle);

    /// Block until the page is usable. Navigation bounds this call with
    /// the configured timeout.
    async fn wait_for_page_to_load(&self) -> Result<()> {
        Ok(())
    }

    /// Visit `base_url` and wait for the page to load.
    async fn open(&self) -> Result<()> {
        let url = self
            .base_url()
            .ok_or_else(|| NavError::Config("page has no base_url to open".to_string()))?
            .to_string();
        self.driver().visit(&url).await?;
        self.wait_for_page_to_load().await
    }

    fn as_any(&self) -> &dyn Any;
}

impl<'a> dyn Page + 'a {
    /// Downcast to a concrete page type.
    pub fn downcast_ref<T: Page>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}
