use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{NavError, Result};

/// Key of the cross-skin entry in a `page_class` table.
pub const FALLBACK_KEY: &str = "fallback";

/// Path used when a page id is absent or declares no `path`.
pub const ROOT_PATH: &str = "/";

/// Declarative description of one page id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Skin name (or `fallback`) to dotted class path.
    #[serde(
        default,
        rename = "page_class",
        alias = "pageClass",
        skip_serializing_if = "Option::is_none"
    )]
    pub page_class: Option<BTreeMap<String, String>>,
    /// Action name to target page id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, String>,
}

impl PageMapping {
    pub fn with_path(path: &str) -> Self {
        Self {
            path: Some(path.to_string()),
            ..Self::default()
        }
    }

    pub fn page_class(mut self, skin: &str, dotted: &str) -> Self {
        self.page_class
            .get_or_insert_with(BTreeMap::new)
            .insert(skin.to_string(), dotted.to_string());
        self
    }

    pub fn action(mut self, name: &str, target: &str) -> Self {
        self.actions.insert(name.to_string(), target.to_string());
        self
    }

    /// The declared path, or `/`.
    pub fn path_or_root(&self) -> &str {
        self.path.as_deref().unwrap_or(ROOT_PATH)
    }

    /// The class path declared for `skin`, else the `fallback` entry.
    pub fn class_for_skin(&self, skin: &str) -> Option<&str> {
        let table = self.page_class.as_ref()?;
        table
            .get(skin)
            .or_else(|| table.get(FALLBACK_KEY))
            .map(String::as_str)
    }
}

/// Page id to page description.
pub type PageMappings = BTreeMap<String, PageMapping>;

/// Skin to dotted path of the page class used when nothing more specific
/// applies.
pub type DefaultPageClasses = BTreeMap<String, String>;

/// Strict page-id lookup.
pub fn lookup_page<'a>(mappings: &'a PageMappings, page_id: &str) -> Result<&'a PageMapping> {
    mappings
        .get(page_id)
        .ok_or_else(|| NavError::UnknownPage(page_id.to_string()))
}

/// On-disk navigation file: the default page class per skin plus the page
/// mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub default_pages: DefaultPageClasses,
    #[serde(default)]
    pub page_mappings: PageMappings,
}

impl ProjectConfig {
    /// Check that every action targets a declared page id.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for (page_id, mapping) in &self.page_mappings {
            for (action, target) in &mapping.actions {
                if !self.page_mappings.contains_key(target) {
                    issues.push(format!(
                        "{}: action '{}' targets unknown page id '{}'",
                        page_id, action, target
                    ));
                }
            }
        }
        if self.default_pages.is_empty() {
            issues.push("no default page class declared for any skin".to_string());
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_for_skin_prefers_skin_entry() {
        let mapping = PageMapping::with_path("/")
            .page_class("skin1", "app.Skin1Home")
            .page_class(FALLBACK_KEY, "app.Home");
        assert_eq!(mapping.class_for_skin("skin1"), Some("app.Skin1Home"));
        assert_eq!(mapping.class_for_skin("skin2"), Some("app.Home"));
    }

    #[test]
    fn test_class_for_skin_without_table() {
        let mapping = PageMapping::with_path("/");
        assert_eq!(mapping.class_for_skin("skin1"), None);
    }

    #[test]
    fn test_path_defaults_to_root() {
        assert_eq!(PageMapping::default().path_or_root(), "/");
    }

    #[test]
    fn test_camel_case_page_class_alias() {
        let mapping: PageMapping =
            serde_json::from_str(r#"{"path": "/x", "pageClass": {"skin1": "app.X"}}"#).unwrap();
        assert_eq!(mapping.class_for_skin("skin1"), Some("app.X"));
    }

    #[test]
    fn test_lookup_unknown_page() {
        let mappings = PageMappings::new();
        assert!(matches!(
            lookup_page(&mappings, "Nowhere"),
            Err(NavError::UnknownPage(id)) if id == "Nowhere"
        ));
    }

    #[test]
    fn test_project_config_from_yaml() {
        let yaml = "
default_pages:
  skin1: pomnav.pages.BasePage
page_mappings:
  HomePage:
    path: /home
  AnotherPage:
    path: /example
    actions:
      back: HomePage
";
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.page_mappings.len(), 2);
        assert_eq!(
            config.page_mappings["AnotherPage"].actions.get("back").map(String::as_str),
            Some("HomePage")
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_dangling_action() {
        let mut config = ProjectConfig::default();
        config
            .default_pages
            .insert("skin1".into(), "pomnav.pages.BasePage".into());
        config.page_mappings.insert(
            "AnotherPage".into(),
            PageMapping::with_path("/x").action("back", "HomePage"),
        );
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("HomePage"));
    }
}
