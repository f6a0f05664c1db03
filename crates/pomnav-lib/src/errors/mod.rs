use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot resolve page class '{path}': segment '{segment}' not found")]
    Resolution { path: String, segment: String },

    #[error("Unknown page id: {0}")]
    UnknownPage(String),

    #[error("Unknown skin: {0}")]
    UnknownSkin(String),

    #[error("Unknown user id: {0}")]
    UnknownUser(String),

    #[error("No current page id, cannot look up action '{0}'")]
    NoCurrentPageId(String),

    #[error("No browser available to build the first page")]
    NoBrowser,

    #[error("Page {page} not ready after {timeout:?}")]
    ReadinessTimeout { page: String, timeout: Duration },

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Application(String),
}

pub type Result<T> = std::result::Result<T, NavError>;

impl NavError {
    /// True for failed keyed lookups (page ids, skins, users, actions).
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            NavError::UnknownPage(_)
                | NavError::UnknownSkin(_)
                | NavError::UnknownUser(_)
                | NavError::NoCurrentPageId(_)
        )
    }

    /// True for errors caused by bad mapping or class configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            NavError::Config(_) | NavError::Resolution { .. } | NavError::Url(_)
        )
    }
}

/// Logs a fatal error and exits the process with code 1.
///
/// This function never returns (`-> !`). It is intended for unrecoverable
/// errors during initialization.
pub fn handle_fatal(err: NavError) -> ! {
    tracing::error!("Fatal error: {}", err);
    std::process::exit(1)
}

/// Maps a `NavError` to user-friendly CLI output with actionable suggestions.
pub fn handle_command_error(err: &NavError) {
    use crate::output;

    match err {
        NavError::UnknownPage(id) => {
            output::error(&format!("Unknown page id: {}", id));
            output::info("Run `pomnav pages` to list the configured page ids.");
        }
        NavError::UnknownSkin(skin) => {
            output::error(&format!("Unknown skin: {}", skin));
            output::info("Check the `skins` section of your variables file.");
        }
        NavError::UnknownUser(user) => {
            output::error(&format!("Unknown user id: {}", user));
            output::info("Check the credentials of the selected skin in your variables file.");
        }
        NavError::Resolution { path, segment } => {
            output::error(&format!("Cannot resolve page class '{}'", path));
            output::info(&format!(
                "No page class is registered under '{}'. Check `page_class` entries and `default_pages`.",
                segment
            ));
        }
        NavError::Config(msg) => {
            output::error(&format!("Configuration error: {}", msg));
        }
        NavError::ReadinessTimeout { page, timeout } => {
            output::error(&format!("Page {} not ready after {:?}", page, timeout));
            output::info("Raise the page timeout or check that the page actually loads.");
        }
        NavError::Http(e) => {
            output::error(&format!("Network error: {}", e));
            output::info("Check your internet connection and the skin base URL.");
        }
        NavError::Io(e) => {
            output::error(&format!("File error: {}", e));
        }
        _ => {
            output::error(&format!("{}", err));
        }
    }

    if crate::logger::is_verbose() {
        output::warning(&format!("{:?}", err));
    }
}
