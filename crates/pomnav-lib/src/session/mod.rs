//! Per-test wiring: turns a skin, a variables file and a navigation file
//! into a ready [`Navigation`] sitting on the skin's home page.

use std::sync::Arc;
use std::time::Duration;

use crate::config::mapping::{PageMappings, ProjectConfig};
use crate::config::settings::Settings;
use crate::config::variables::{CredentialsMapping, Variables};
use crate::config::load_document;
use crate::driver::{DriverHandle, SharedBrowser};
use crate::errors::{NavError, Result};
use crate::navigation::{Navigation, DEFAULT_READINESS_TIMEOUT};
use crate::page::{Page, PageKwargs};
use crate::registry::{PageClass, PageRegistry};
use crate::resolver::{resolve_page_class, PageFactory};

pub struct Session {
    registry: Arc<PageRegistry>,
    skin: String,
    variables: Variables,
    project: ProjectConfig,
    default_kwargs: PageKwargs,
    readiness_timeout: Duration,
}

impl Session {
    pub fn new(
        registry: Arc<PageRegistry>,
        skin: &str,
        variables: Variables,
        project: ProjectConfig,
    ) -> Self {
        Self {
            registry,
            skin: skin.to_string(),
            variables,
            project,
            default_kwargs: PageKwargs::new(),
            readiness_timeout: DEFAULT_READINESS_TIMEOUT,
        }
    }

    /// Load the navigation file and the variables file named by `settings`.
    pub async fn load(registry: Arc<PageRegistry>, settings: &Settings) -> Result<Self> {
        let variables_path = settings.variables_path.as_ref().ok_or_else(|| {
            NavError::Config(
                "no variables file configured (set POMNAV_VARIABLES or pass --variables)"
                    .to_string(),
            )
        })?;
        let project: ProjectConfig = load_document(&settings.config_path).await?;
        for issue in project.validate() {
            tracing::warn!(config = %settings.config_path.display(), "{}", issue);
        }
        let variables = Variables::from_file(variables_path).await?;

        Ok(Self::new(registry, &settings.skin, variables, project)
            .readiness_timeout(settings.readiness_timeout))
    }

    pub fn default_kwargs(mut self, kwargs: PageKwargs) -> Self {
        self.default_kwargs = kwargs;
        self
    }

    pub fn readiness_timeout(mut self, timeout: Duration) -> Self {
        self.readiness_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<PageRegistry> {
        &self.registry
    }

    pub fn skin(&self) -> &str {
        &self.skin
    }

    pub fn skin_base_url(&self) -> Result<&str> {
        self.variables.skin_base_url(&self.skin)
    }

    pub fn credentials_mapping(&self) -> Result<&CredentialsMapping> {
        self.variables.credentials_mapping(&self.skin)
    }

    pub fn page_mappings(&self) -> &PageMappings {
        &self.project.page_mappings
    }

    /// Default page class of the skin, from the `default_pages` table.
    pub fn default_page_class(&self) -> Result<PageClass> {
        resolve_page_class(
            &self.registry,
            &self.skin,
            &self.project.page_mappings,
            None,
            None,
            Some(&self.project.default_pages),
        )
    }

    /// The default page built for the skin base URL and opened.
    pub async fn base_page(&self, browser: DriverHandle) -> Result<Box<dyn Page>> {
        let default_page_class = self.default_page_class()?;
        let factory = PageFactory {
            registry: &self.registry,
            base_url: self.skin_base_url()?,
            default_page_class: &default_page_class,
            page_mappings: &self.project.page_mappings,
            skin: &self.skin,
        };
        let page = factory.create(browser, None, self.default_kwargs.clone())?;

        let timeout = self.default_kwargs.timeout.unwrap_or(self.readiness_timeout);
        tokio::time::timeout(timeout, page.open())
            .await
            .map_err(|_| NavError::ReadinessTimeout {
                page: default_page_class.path().to_string(),
                timeout,
            })??;
        Ok(page)
    }

    /// [`Session::base_page`] with the browser window maximized.
    pub async fn page_instance(&self, browser: DriverHandle) -> Result<Box<dyn Page>> {
        let page = self.base_page(browser).await?;
        page.driver().maximize_window().await?;
        Ok(page)
    }

    /// A navigation wrapping [`Session::page_instance`].
    pub async fn navigation(&self, browser: DriverHandle) -> Result<Navigation> {
        let page = self.page_instance(browser.clone()).await?;
        let navigation = Navigation::builder(
            self.registry.clone(),
            self.default_page_class()?,
            &self.skin,
            self.skin_base_url()?,
        )
        .page(page)
        .page_mappings(self.project.page_mappings.clone())
        .credentials(self.credentials_mapping()?.clone())
        .default_kwargs(self.default_kwargs.clone())
        .browser(Arc::new(SharedBrowser::new(browser)))
        .readiness_timeout(self.readiness_timeout)
        .build();

        tracing::info!(skin = %self.skin, "Navigation ready");
        Ok(navigation)
    }
}

/// Reason to skip a test on `skin`, if the test opted out of it.
pub fn skip_reason(skin: &str, skip_skins: &[&str]) -> Option<String> {
    skip_skins
        .contains(&skin)
        .then(|| format!("skipped on this skin: {}", skin))
}
