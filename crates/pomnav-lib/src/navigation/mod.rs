//! Current-page tracking.
//!
//! A [`Navigation`] owns the page object a test is currently looking at and
//! everything needed to build the next one. Transitions resolve a class,
//! build the page, optionally drive the browser, wait for readiness and only
//! then replace the current page and page id together. A failed transition
//! leaves both untouched.

mod handle;

use std::sync::Arc;
use std::time::Duration;

use crate::config::mapping::{lookup_page, PageMappings};
use crate::config::variables::CredentialsMapping;
use crate::driver::{BrowserProvider, DriverHandle};
use crate::errors::{NavError, Result};
use crate::page::{Page, PageKwargs};
use crate::registry::{PageClass, PageRegistry};
use crate::resolver::{get_page_url, join_url, resolve_page_class};

pub use handle::NavigationHandle;

pub const DEFAULT_READINESS_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration fixed for the lifetime of a navigation. Shared with page
/// objects through [`NavigationHandle`].
pub(crate) struct NavigationContext {
    registry: Arc<PageRegistry>,
    default_page_class: PageClass,
    page_mappings: PageMappings,
    credentials_mapping: CredentialsMapping,
    skin: String,
    skin_base_url: String,
    default_kwargs: PageKwargs,
    browser: Option<Arc<dyn BrowserProvider>>,
    readiness_timeout: Duration,
}

pub struct Navigation {
    context: Arc<NavigationContext>,
    page: Option<Box<dyn Page>>,
    page_id: Option<String>,
}

impl Navigation {
    pub fn builder(
        registry: Arc<PageRegistry>,
        default_page_class: PageClass,
        skin: &str,
        skin_base_url: &str,
    ) -> NavigationBuilder {
        NavigationBuilder {
            registry,
            default_page_class,
            skin: skin.to_string(),
            skin_base_url: skin_base_url.to_string(),
            page: None,
            page_mappings: PageMappings::new(),
            credentials_mapping: CredentialsMapping::new(),
            default_kwargs: PageKwargs::new(),
            browser: None,
            readiness_timeout: DEFAULT_READINESS_TIMEOUT,
        }
    }

    pub fn page(&self) -> Option<&dyn Page> {
        self.page.as_deref()
    }

    pub fn page_mut(&mut self) -> Option<&mut (dyn Page + 'static)> {
        self.page.as_deref_mut()
    }

    /// Id of the current page; `None` before the first transition or after
    /// a transition that landed on an undeclared page.
    pub fn page_id(&self) -> Option<&str> {
        self.page_id.as_deref()
    }

    pub fn skin(&self) -> &str {
        &self.context.skin
    }

    pub fn skin_base_url(&self) -> &str {
        &self.context.skin_base_url
    }

    pub fn page_mappings(&self) -> &PageMappings {
        &self.context.page_mappings
    }

    pub fn credentials_mapping(&self) -> &CredentialsMapping {
        &self.context.credentials_mapping
    }

    pub fn default_page_class(&self) -> &PageClass {
        &self.context.default_page_class
    }

    pub fn default_kwargs(&self) -> &PageKwargs {
        &self.context.default_kwargs
    }

    /// Non-owning handle given to every page this navigation holds.
    pub fn handle(&self) -> NavigationHandle {
        NavigationHandle::new(&self.context)
    }

    /// Replace the current page and page id, pointing the page back at this
    /// navigation.
    pub fn set_page(&mut self, page: Option<Box<dyn Page>>, page_id: Option<&str>) {
        match page {
            Some(page) => {
                self.commit(page, page_id.map(str::to_string));
            }
            None => {
                self.page = None;
                self.page_id = page_id.map(str::to_string);
            }
        }
    }

    /// Default kwargs overlaid with `call` (call-site keys win).
    pub fn merge_kwargs(&self, call: &PageKwargs) -> PageKwargs {
        self.context.default_kwargs.merged(call)
    }

    pub fn get_page_url(&self, page_id: Option<&str>) -> Result<&str> {
        get_page_url(&self.context.skin, &self.context.page_mappings, page_id)
    }

    /// Page class for `page_id`, with `fallback` (else the default page
    /// class) as the last resort.
    pub fn get_page_class(
        &self,
        page_id: Option<&str>,
        fallback: Option<&PageClass>,
    ) -> Result<PageClass> {
        let fallback = fallback.unwrap_or(&self.context.default_page_class);
        resolve_page_class(
            &self.context.registry,
            &self.context.skin,
            &self.context.page_mappings,
            page_id,
            Some(fallback),
            None,
        )
    }

    /// Build, without committing, the page object for `page_id`.
    ///
    /// The driver is taken from the current page; before the first page
    /// exists it comes from the browser provider.
    pub async fn get_page_instance(
        &self,
        page_id: Option<&str>,
        fallback: Option<&PageClass>,
        kwargs: &PageKwargs,
    ) -> Result<Box<dyn Page>> {
        let kwargs = self.merge_kwargs(kwargs);
        let class = self.get_page_class(page_id, fallback)?;
        let driver = self.driver().await?;
        tracing::debug!(page_id, class = class.path(), "Building page instance");
        class.instantiate(driver, kwargs)
    }

    /// Drive the browser to `page_id` and make it the current page.
    pub async fn visit_page(&mut self, page_id: &str, kwargs: PageKwargs) -> Result<&dyn Page> {
        let url = join_url(&self.context.skin_base_url, self.get_page_url(Some(page_id))?)?;
        let page = self.get_page_instance(Some(page_id), None, &kwargs).await?;
        page.driver().visit(&url).await?;
        self.await_readiness(page.as_ref(), Some(page_id), &kwargs)
            .await?;
        tracing::info!(page_id, url = %url, "Visited page");
        Ok(self.commit(page, Some(page_id.to_string())))
    }

    /// Make `page_id` the current page without driving the browser, for
    /// when the browser already moved on its own.
    pub async fn update_page(&mut self, page_id: &str, kwargs: PageKwargs) -> Result<&dyn Page> {
        let page = self.get_page_instance(Some(page_id), None, &kwargs).await?;
        self.await_readiness(page.as_ref(), Some(page_id), &kwargs)
            .await?;
        tracing::info!(page_id, "Updated page");
        Ok(self.commit(page, Some(page_id.to_string())))
    }

    /// Follow the declared `action` of the current page.
    ///
    /// When the current page declares no such action the browser is assumed
    /// to be on a page with no id: a `fallback` (else default) page is built
    /// and the page id becomes `None`.
    pub async fn action_performed(
        &mut self,
        action: &str,
        fallback: Option<&PageClass>,
        kwargs: PageKwargs,
    ) -> Result<&dyn Page> {
        let current = self
            .page_id
            .as_deref()
            .ok_or_else(|| NavError::NoCurrentPageId(action.to_string()))?;
        let target = lookup_page(&self.context.page_mappings, current)?
            .actions
            .get(action)
            .cloned();

        match target {
            Some(target) => {
                tracing::debug!(action, from = current, to = %target, "Action leads to page");
                self.update_page(&target, kwargs).await
            }
            None => {
                tracing::debug!(action, from = current, "Action leads off the page mappings");
                let page = self.get_page_instance(None, fallback, &kwargs).await?;
                self.await_readiness(page.as_ref(), None, &kwargs).await?;
                Ok(self.commit(page, None))
            }
        }
    }

    /// Username and password of `user_id`.
    pub fn get_credentials(&self, user_id: &str) -> Result<(&str, &str)> {
        self.context
            .credentials_mapping
            .get(user_id)
            .map(|c| (c.username.as_str(), c.password.as_str()))
            .ok_or_else(|| NavError::UnknownUser(user_id.to_string()))
    }

    async fn driver(&self) -> Result<DriverHandle> {
        if let Some(page) = &self.page {
            return Ok(page.driver().clone());
        }
        match &self.context.browser {
            Some(provider) => provider.browser().await,
            None => Err(NavError::NoBrowser),
        }
    }

    async fn await_readiness(
        &self,
        page: &dyn Page,
        page_id: Option<&str>,
        kwargs: &PageKwargs,
    ) -> Result<()> {
        let timeout = self
            .merge_kwargs(kwargs)
            .timeout
            .unwrap_or(self.context.readiness_timeout);

        match tokio::time::timeout(timeout, page.wait_for_page_to_load()).await {
            Ok(result) => result,
            Err(_) => {
                let page = page_id.unwrap_or("<unknown>").to_string();
                tracing::warn!(page = %page, ?timeout, "Page not ready in time");
                Err(NavError::ReadinessTimeout { page, timeout })
            }
        }
    }

    fn commit(&mut self, mut page: Box<dyn Page>, page_id: Option<String>) -> &dyn Page {
        page.set_navigation(self.handle());
        self.page_id = page_id;
        &**self.page.insert(page)
    }
}

pub struct NavigationBuilder {
    registry: Arc<PageRegistry>,
    default_page_class: PageClass,
    skin: String,
    skin_base_url: String,
    page: Option<Box<dyn Page>>,
    page_mappings: PageMappings,
    credentials_mapping: CredentialsMapping,
    default_kwargs: PageKwargs,
    browser: Option<Arc<dyn BrowserProvider>>,
    readiness_timeout: Duration,
}

impl NavigationBuilder {
    /// Initial current page (with no page id).
    pub fn page(mut self, page: Box<dyn Page>) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_mappings(mut self, page_mappings: PageMappings) -> Self {
        self.page_mappings = page_mappings;
        self
    }

    pub fn credentials(mut self, credentials_mapping: CredentialsMapping) -> Self {
        self.credentials_mapping = credentials_mapping;
        self
    }

    /// Kwargs every page is built with, below per-call kwargs.
    pub fn default_kwargs(mut self, kwargs: PageKwargs) -> Self {
        self.default_kwargs = kwargs;
        self
    }

    pub fn browser(mut self, provider: Arc<dyn BrowserProvider>) -> Self {
        self.browser = Some(provider);
        self
    }

    /// Bound on `wait_for_page_to_load` when the kwargs carry no timeout.
    pub fn readiness_timeout(mut self, timeout: Duration) -> Self {
        self.readiness_timeout = timeout;
        self
    }

    pub fn build(self) -> Navigation {
        let context = NavigationContext {
            registry: self.registry,
            default_page_class: self.default_page_class,
            page_mappings: self.page_mappings,
            credentials_mapping: self.credentials_mapping,
            skin: self.skin,
            skin_base_url: self.skin_base_url,
            default_kwargs: self.default_kwargs,
            browser: self.browser,
            readiness_timeout: self.readiness_timeout,
        };
        let mut navigation = Navigation {
            context: Arc::new(context),
            page: None,
            page_id: None,
        };
        navigation.set_page(self.page, None);
        navigation
    }
}
