//! Page class registry.
//!
//! Mapping files name page classes by dotted path (`app.pages.HomePage`).
//! The host registers a constructor under each path at startup and the
//! resolver looks them up here.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::driver::DriverHandle;
use crate::errors::{NavError, Result};
use crate::page::{BasePage, Page, PageKwargs, BASE_PAGE_PATH};

pub type PageConstructor =
    dyn Fn(DriverHandle, PageKwargs) -> Result<Box<dyn Page>> + Send + Sync;

/// A resolved page class: its dotted path and the constructor behind it.
///
/// Two classes are equal when their paths are equal.
#[derive(Clone)]
pub struct PageClass {
    path: String,
    constructor: Arc<PageConstructor>,
}

impl PageClass {
    pub fn new<F>(path: &str, constructor: F) -> Self
    where
        F: Fn(DriverHandle, PageKwargs) -> Result<Box<dyn Page>> + Send + Sync + 'static,
    {
        Self {
            path: path.to_string(),
            constructor: Arc::new(constructor),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn instantiate(&self, driver: DriverHandle, kwargs: PageKwargs) -> Result<Box<dyn Page>> {
        (self.constructor)(driver, kwargs)
    }
}

impl fmt::Debug for PageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageClass").field("path", &self.path).finish()
    }
}

impl fmt::Display for PageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl PartialEq for PageClass {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for PageClass {}

/// Dotted path to page class.
#[derive(Default)]
pub struct PageRegistry {
    classes: BTreeMap<String, PageClass>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding [`BasePage`] under [`BASE_PAGE_PATH`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.classes.insert(
            BASE_PAGE_PATH.to_string(),
            PageClass::new(BASE_PAGE_PATH, BasePage::construct),
        );
        registry
    }

    /// Register `constructor` under `path`. Fails on a malformed path or a
    /// path that is already taken.
    pub fn register<F>(&mut self, path: &str, constructor: F) -> Result<()>
    where
        F: Fn(DriverHandle, PageKwargs) -> Result<Box<dyn Page>> + Send + Sync + 'static,
    {
        self.register_class(PageClass::new(path, constructor))
    }

    pub fn register_class(&mut self, class: PageClass) -> Result<()> {
        validate_dotted_path(class.path())?;
        if self.classes.contains_key(class.path()) {
            return Err(NavError::Config(format!(
                "duplicate page class path: {}",
                class.path()
            )));
        }
        tracing::debug!(path = class.path(), "Registered page class");
        self.classes.insert(class.path().to_string(), class);
        Ok(())
    }

    /// Resolve a dotted path, walking it segment by segment so the error
    /// names the first segment nothing is registered under.
    pub fn resolve(&self, path: &str) -> Result<PageClass> {
        validate_dotted_path(path)?;
        if let Some(class) = self.classes.get(path) {
            return Ok(class.clone());
        }

        let mut prefix = String::with_capacity(path.len());
        let mut last = path;
        for segment in path.split('.') {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(segment);
            last = segment;
            if !self.has_prefix(&prefix) {
                return Err(NavError::Resolution {
                    path: path.to_string(),
                    segment: segment.to_string(),
                });
            }
        }

        // Every segment is a namespace of some class but the path itself
        // names no class.
        Err(NavError::Resolution {
            path: path.to_string(),
            segment: last.to_string(),
        })
    }

    pub fn contains(&self, path: &str) -> bool {
        self.classes.contains_key(path)
    }

    /// Registered paths in sorted order.
    pub fn paths(&self) -> Vec<&str> {
        self.classes.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn has_prefix(&self, prefix: &str) -> bool {
        self.classes.keys().any(|key| {
            key == prefix
                || (key.starts_with(prefix) && key.as_bytes().get(prefix.len()) == Some(&b'.'))
        })
    }
}

/// Non-empty segments of ASCII letters, digits and `_`, none starting with
/// a digit.
pub fn validate_dotted_path(path: &str) -> Result<()> {
    let well_formed = !path.is_empty()
        && path.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if well_formed {
        Ok(())
    } else {
        Err(NavError::Config(format!("malformed dotted path: '{}'", path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_class, MockDriver};

    #[test]
    fn test_with_defaults_has_base_page() {
        let registry = PageRegistry::with_defaults();
        assert!(registry.contains(BASE_PAGE_PATH));
        assert_eq!(registry.resolve(BASE_PAGE_PATH).unwrap().path(), BASE_PAGE_PATH);
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut registry = PageRegistry::new();
        registry.register_class(mock_class("app.pages.Home")).unwrap();
        let result = registry.register_class(mock_class("app.pages.Home"));
        assert!(matches!(result, Err(NavError::Config(msg)) if msg.contains("duplicate")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_malformed_path_fails() {
        let mut registry = PageRegistry::new();
        for bad in ["", "app..Home", ".Home", "app.1Home", "app.Ho-me"] {
            assert!(
                matches!(registry.register_class(mock_class(bad)), Err(NavError::Config(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resolve_reports_missing_module_segment() {
        let mut registry = PageRegistry::new();
        registry.register_class(mock_class("app.pages.Home")).unwrap();

        match registry.resolve("app.views.Home") {
            Err(NavError::Resolution { path, segment }) => {
                assert_eq!(path, "app.views.Home");
                assert_eq!(segment, "views");
            }
            other => panic!("Expected NavError::Resolution, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_reports_missing_class_segment() {
        let mut registry = PageRegistry::new();
        registry.register_class(mock_class("app.pages.Home")).unwrap();

        match registry.resolve("app.pages.Missing") {
            Err(NavError::Resolution { segment, .. }) => assert_eq!(segment, "Missing"),
            other => panic!("Expected NavError::Resolution, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_namespace_is_not_a_class() {
        let mut registry = PageRegistry::new();
        registry.register_class(mock_class("app.pages.Home")).unwrap();
        assert!(matches!(
            registry.resolve("app.pages"),
            Err(NavError::Resolution { segment, .. }) if segment == "pages"
        ));
    }

    #[test]
    fn test_prefix_match_respects_segment_boundary() {
        let mut registry = PageRegistry::new();
        registry.register_class(mock_class("application.Home")).unwrap();
        assert!(matches!(
            registry.resolve("app.Home"),
            Err(NavError::Resolution { segment, .. }) if segment == "app"
        ));
    }

    #[test]
    fn test_instantiate_passes_kwargs() {
        let registry = PageRegistry::with_defaults();
        let class = registry.resolve(BASE_PAGE_PATH).unwrap();
        let page = class
            .instantiate(
                Arc::new(MockDriver::new()),
                PageKwargs::new().base_url("https://example.com/x"),
            )
            .unwrap();
        assert_eq!(page.base_url(), Some("https://example.com/x"));
    }

    #[test]
    fn test_paths_are_sorted() {
        let mut registry = PageRegistry::new();
        registry.register_class(mock_class("b.Page")).unwrap();
        registry.register_class(mock_class("a.Page")).unwrap();
        assert_eq!(registry.paths(), vec!["a.Page", "b.Page"]);
    }
}
