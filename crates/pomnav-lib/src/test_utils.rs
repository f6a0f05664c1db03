//! Shared test doubles: a recording [`MockDriver`] and a [`MockPage`] whose
//! readiness is chosen through its kwargs.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::driver::{Driver, DriverHandle};
use crate::errors::{NavError, Result};
use crate::navigation::NavigationHandle;
use crate::page::{Page, PageKwargs};
use crate::registry::PageClass;

#[derive(Default)]
struct DriverState {
    visits: Vec<String>,
    current_url: Option<String>,
    texts: Vec<String>,
    last_wait_time: Option<Duration>,
    maximized: bool,
    fail_visits: bool,
}

/// Driver that records every call instead of talking to a browser.
#[derive(Default)]
pub struct MockDriver {
    state: Mutex<DriverState>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `text` part of every document.
    pub fn with_text(self, text: &str) -> Self {
        self.state.lock().unwrap().texts.push(text.to_string());
        self
    }

    /// Make every `visit` fail.
    pub fn failing(self) -> Self {
        self.state.lock().unwrap().fail_visits = true;
        self
    }

    pub fn visits(&self) -> Vec<String> {
        self.state.lock().unwrap().visits.clone()
    }

    pub fn last_wait_time(&self) -> Option<Duration> {
        self.state.lock().unwrap().last_wait_time
    }

    pub fn maximized(&self) -> bool {
        self.state.lock().unwrap().maximized
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn visit(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_visits {
            return Err(NavError::Navigation(format!("browser crashed loading {}", url)));
        }
        state.visits.push(url.to_string());
        state.current_url = Some(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .current_url
            .clone()
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn is_text_present(&self, text: &str, wait_time: Duration) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.last_wait_time = Some(wait_time);
        Ok(state.texts.iter().any(|t| t.contains(text)))
    }

    async fn maximize_window(&self) -> Result<()> {
        self.state.lock().unwrap().maximized = true;
        Ok(())
    }
}

/// Page whose `wait_for_page_to_load` succeeds, fails or never returns
/// depending on the `readiness` kwarg (`"ready"`, `"fail"`, `"hang"`).
pub struct MockPage {
    class_path: String,
    driver: DriverHandle,
    kwargs: PageKwargs,
    navigation: Option<NavigationHandle>,
    waits: AtomicUsize,
}

impl MockPage {
    pub fn new(class_path: &str, driver: DriverHandle, kwargs: PageKwargs) -> Self {
        Self {
            class_path: class_path.to_string(),
            driver,
            kwargs,
            navigation: None,
            waits: AtomicUsize::new(0),
        }
    }

    pub fn class_path(&self) -> &str {
        &self.class_path
    }

    pub fn kwargs(&self) -> &PageKwargs {
        &self.kwargs
    }

    pub fn wait_calls(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Page for MockPage {
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

    async fn wait_for_page_to_load(&self) -> Result<()> {
        self.waits.fetch_add(1, Ordering::SeqCst);
        match self.kwargs.get("readiness").and_then(|v| v.as_str()) {
            Some("fail") => Err(NavError::Application(format!(
                "{} reported an error",
                self.class_path
            ))),
            Some("hang") => {
                std::future::pending::<()>().await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A class building [`MockPage`]s tagged with `path`.
pub fn mock_class(path: &str) -> PageClass {
    let tag = path.to_string();
    PageClass::new(path, move |driver, kwargs| {
        Ok(Box::new(MockPage::new(&tag, driver, kwargs)) as Box<dyn Page>)
    })
}

/// Like [`mock_class`], also recording the kwargs of every construction.
pub fn counting_class(path: &str) -> (PageClass, Arc<Mutex<Vec<PageKwargs>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = calls.clone();
    let tag = path.to_string();
    let class = PageClass::new(path, move |driver, kwargs: PageKwargs| {
        recorded.lock().unwrap().push(kwargs.clone());
        Ok(Box::new(MockPage::new(&tag, driver, kwargs)) as Box<dyn Page>)
    });
    (class, calls)
}

/// Session over a small three-page site served at `base_url` for skin1.
pub fn sample_session(base_url: &str) -> crate::session::Session {
    use crate::config::mapping::{PageMapping, ProjectConfig};
    use crate::config::variables::{Credentials, SkinVariables, Variables};
    use crate::page::BASE_PAGE_PATH;
    use crate::registry::PageRegistry;

    let mut registry = PageRegistry::with_defaults();
    registry.register_class(mock_class("app.pages.Login")).unwrap();

    let mut project = ProjectConfig::default();
    project
        .default_pages
        .insert("skin1".to_string(), BASE_PAGE_PATH.to_string());
    project
        .page_mappings
        .insert("HomePage".to_string(), PageMapping::with_path("/home"));
    project.page_mappings.insert(
        "AnotherPage".to_string(),
        PageMapping::with_path("/example").action("back", "HomePage"),
    );
    project.page_mappings.insert(
        "LoginPage".to_string(),
        PageMapping::with_path("/login").page_class("skin1", "app.pages.Login"),
    );

    let mut variables = Variables::default();
    let mut skin = SkinVariables {
        base_url: base_url.to_string(),
        credentials: Default::default(),
    };
    skin.credentials
        .insert("Administrator".to_string(), Credentials::new("admin", "pwd"));
    variables.skins.insert("skin1".to_string(), skin);

    crate::session::Session::new(Arc::new(registry), "skin1", variables, project)
}
