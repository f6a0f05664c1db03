//! Page URL and page class resolution.
//!
//! Class precedence for a page id, most specific first:
//!
//! 1. `page_class.<skin>` of the page mapping
//! 2. `page_class.fallback` of the page mapping
//! 3. the caller's fallback class
//! 4. the default page class of the skin
//!
//! Without a page id only 3 and 4 apply.

use url::Url;

use crate::config::mapping::{lookup_page, DefaultPageClasses, PageMappings, ROOT_PATH};
use crate::driver::DriverHandle;
use crate::errors::{NavError, Result};
use crate::page::{Page, PageKwargs};
use crate::registry::{PageClass, PageRegistry};

/// URL path of `page_id`, `/` when there is no page id or the page has no
/// `path`. An unknown page id is an error.
pub fn get_page_url<'a>(
    _skin: &str,
    page_mappings: &'a PageMappings,
    page_id: Option<&str>,
) -> Result<&'a str> {
    match page_id {
        None => Ok(ROOT_PATH),
        Some(id) => Ok(lookup_page(page_mappings, id)?.path_or_root()),
    }
}

/// Resolve the page class for `page_id` under `skin`.
///
/// The base fallback (`fallback`, else `default_pages[skin]`) is computed
/// first, so a skin without any default fails even when the page mapping
/// would have matched. A class path found in the mapping that does not
/// resolve is an error, never a silent fallback.
pub fn resolve_page_class(
    registry: &PageRegistry,
    skin: &str,
    page_mappings: &PageMappings,
    page_id: Option<&str>,
    fallback: Option<&PageClass>,
    default_pages: Option<&DefaultPageClasses>,
) -> Result<PageClass> {
    let base_fallback = match fallback {
        Some(class) => class.clone(),
        None => {
            let dotted = default_pages
                .and_then(|defaults| defaults.get(skin))
                .ok_or_else(|| {
                    NavError::Config(format!(
                        "no fallback class and no default page class for skin '{}'",
                        skin
                    ))
                })?;
            registry.resolve(dotted)?
        }
    };

    let page_id = match page_id {
        Some(id) if !id.is_empty() => id,
        _ => return Ok(base_fallback),
    };

    match lookup_page(page_mappings, page_id)?.class_for_skin(skin) {
        Some(dotted) => {
            tracing::debug!(page_id, skin, class = dotted, "Page class from mapping");
            registry.resolve(dotted)
        }
        None => Ok(base_fallback),
    }
}

/// Resolve `path` against `base` the way a browser resolves a link.
pub fn join_url(base: &str, path: &str) -> Result<String> {
    Ok(Url::parse(base)?.join(path)?.to_string())
}

/// Builds page objects rooted at a base URL.
pub struct PageFactory<'a> {
    pub registry: &'a PageRegistry,
    pub base_url: &'a str,
    pub default_page_class: &'a PageClass,
    pub page_mappings: &'a PageMappings,
    pub skin: &'a str,
}

impl PageFactory<'_> {
    /// Instantiate the page for `page_id`.
    ///
    /// Without a page id the default class is built for `base_url` itself.
    /// Otherwise the class is resolved with the default class as fallback
    /// and built for `base_url` joined with the page path. The computed URL
    /// replaces any `base_url` in `kwargs`.
    pub fn create(
        &self,
        browser: DriverHandle,
        page_id: Option<&str>,
        kwargs: PageKwargs,
    ) -> Result<Box<dyn Page>> {
        let (class, url) = match page_id {
            None => (self.default_page_class.clone(), self.base_url.to_string()),
            Some(id) => {
                let path = lookup_page(self.page_mappings, id)?.path_or_root();
                let class = resolve_page_class(
                    self.registry,
                    self.skin,
                    self.page_mappings,
                    Some(id),
                    Some(self.default_page_class),
                    None,
                )?;
                (class, join_url(self.base_url, path)?)
            }
        };

        tracing::debug!(class = class.path(), url = %url, "Building page");
        let mut kwargs = kwargs;
        kwargs.base_url = Some(url);
        class.instantiate(browser, kwargs)
    }
}
