//! Navigation configuration: page mappings, per-skin variables and the
//! process settings that locate them.

pub mod mapping;
pub mod settings;
pub mod variables;

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::errors::{NavError, Result};

pub use mapping::{DefaultPageClasses, PageMapping, PageMappings, ProjectConfig};
pub use settings::Settings;
pub use variables::{Credentials, CredentialsMapping, SkinVariables, Variables};

/// Load a JSON or YAML document from disk.
///
/// `.yaml` and `.yml` files go through `serde_yaml`; everything else is
/// parsed as JSON.
pub async fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        NavError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    tracing::debug!(path = %path.display(), "Loaded configuration document");
    parse_document(path, &contents)
}

/// Parse `contents` using the format implied by `path`'s extension.
pub fn parse_document<T: DeserializeOwned>(path: &Path, contents: &str) -> Result<T> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(contents)?),
        _ => Ok(serde_json::from_str(contents)?),
    }
}
