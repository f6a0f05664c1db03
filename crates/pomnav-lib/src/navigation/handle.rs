use std::fmt;
use std::sync::{Arc, Weak};

use super::{Navigation, NavigationContext};
use crate::config::mapping::lookup_page;
use crate::config::variables::Credentials;
use crate::errors::{NavError, Result};
use crate::resolver::{get_page_url, join_url};

/// Back-reference from a page object to the navigation holding it.
///
/// Lookup only: it reads the navigation's configuration and never keeps
/// the navigation alive. Every lookup fails once the navigation is gone.
#[derive(Clone)]
pub struct NavigationHandle {
    context: Weak<NavigationContext>,
}

impl NavigationHandle {
    pub(super) fn new(context: &Arc<NavigationContext>) -> Self {
        Self {
            context: Arc::downgrade(context),
        }
    }

    /// Whether this handle refers to `navigation`.
    pub fn points_to(&self, navigation: &Navigation) -> bool {
        std::ptr::eq(self.context.as_ptr(), Arc::as_ptr(&navigation.context))
    }

    pub fn is_alive(&self) -> bool {
        self.context.strong_count() > 0
    }

    pub fn skin(&self) -> Result<String> {
        Ok(self.upgrade()?.skin.clone())
    }

    /// Absolute URL of `page_id` under the navigation's skin.
    pub fn page_url(&self, page_id: &str) -> Result<String> {
        let context = self.upgrade()?;
        let path = get_page_url(&context.skin, &context.page_mappings, Some(page_id))?;
        join_url(&context.skin_base_url, path)
    }

    /// Target page id of `action` declared on `page_id`, if any.
    pub fn action_target(&self, page_id: &str, action: &str) -> Result<Option<String>> {
        let context = self.upgrade()?;
        Ok(lookup_page(&context.page_mappings, page_id)?
            .actions
            .get(action)
            .cloned())
    }

    pub fn credentials(&self, user_id: &str) -> Result<Credentials> {
        self.upgrade()?
            .credentials_mapping
            .get(user_id)
            .cloned()
            .ok_or_else(|| NavError::UnknownUser(user_id.to_string()))
    }

    fn upgrade(&self) -> Result<Arc<NavigationContext>> {
        self.context
            .upgrade()
            .ok_or_else(|| NavError::Application("navigation no longer exists".to_string()))
    }
}

impl fmt::Debug for NavigationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
