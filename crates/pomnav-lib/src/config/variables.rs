use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{NavError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

/// User id to credentials.
pub type CredentialsMapping = BTreeMap<String, Credentials>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinVariables {
    pub base_url: String,
    #[serde(default)]
    pub credentials: CredentialsMapping,
}

/// Contents of a variables file, keyed by skin.
///
/// ```yaml
/// skins:
///   skin1:
///     base_url: https://skin1.example.com
///     credentials:
///       Administrator:
///         username: admin
///         password: pwd
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variables {
    #[serde(default)]
    pub skins: BTreeMap<String, SkinVariables>,
}

impl Variables {
    pub async fn from_file(path: &Path) -> Result<Self> {
        super::load_document(path).await
    }

    pub fn skin(&self, skin: &str) -> Result<&SkinVariables> {
        self.skins
            .get(skin)
            .ok_or_else(|| NavError::UnknownSkin(skin.to_string()))
    }

    pub fn skin_base_url(&self, skin: &str) -> Result<&str> {
        Ok(self.skin(skin)?.base_url.as_str())
    }

    pub fn credentials_mapping(&self, skin: &str) -> Result<&CredentialsMapping> {
        Ok(&self.skin(skin)?.credentials)
    }
}
