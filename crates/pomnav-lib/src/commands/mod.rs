pub mod credentials;
pub mod pages;
pub mod render;
pub mod resolve;
pub mod url_cmd;
pub mod version;
pub mod visit;

use std::sync::Arc;

use clap::ArgMatches;

use crate::cli::CommandRegistry;
use crate::config::settings::Settings;
use crate::errors::{NavError, Result};
use crate::registry::PageRegistry;
use crate::session::Session;

/// Register every `pomnav` subcommand.
pub fn register_commands(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(version::version_meta())?;
    registry.register(url_cmd::url_meta())?;
    registry.register(resolve::resolve_meta())?;
    registry.register(pages::pages_meta())?;
    registry.register(credentials::credentials_meta())?;
    registry.register(visit::visit_meta())?;
    registry.register(render::render_meta())?;
    Ok(())
}

/// Run subcommand `name`. Commands that read the navigation or variables
/// files load a [`Session`] from `settings` first.
pub async fn dispatch_command(
    name: &str,
    matches: &ArgMatches,
    settings: &Settings,
    page_registry: Arc<PageRegistry>,
) -> Result<()> {
    match name {
        "version" => version::handle_version(matches),
        "render" => render::handle_render(matches).await,
        "url" | "resolve" | "pages" | "credentials" | "visit" => {
            let session = Session::load(page_registry, settings).await?;
            tracing::debug!(
                command = name,
                skin = session.skin(),
                config = %settings.config_path.display(),
                "Session loaded"
            );
            match name {
                "url" => url_cmd::handle_url(matches, &session),
                "resolve" => resolve::handle_resolve(matches, &session),
                "pages" => pages::handle_pages(matches, &session),
                "credentials" => credentials::handle_credentials(matches, &session),
                _ => visit::handle_visit(matches, &session, settings.readiness_timeout).await,
            }
        }
        _ => Err(NavError::Application(format!("Unknown command: {}", name))),
    }
}
