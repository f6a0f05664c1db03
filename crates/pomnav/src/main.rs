use std::sync::Arc;

use pomnav_lib::cli::{apply_overrides, create_root_command, is_verbose, CommandRegistry};
use pomnav_lib::commands::{dispatch_command, register_commands};
use pomnav_lib::config::settings::Settings;
use pomnav_lib::errors::{handle_command_error, handle_fatal, NavError};
use pomnav_lib::registry::PageRegistry;

#[tokio::main]
async fn main() {
    // Build the root command with every subcommand attached
    let mut registry = CommandRegistry::new(create_root_command());
    if let Err(e) = register_commands(&mut registry) {
        handle_fatal(e);
    }
    let mut root = registry.build_root();
    let matches = root.clone().get_matches();

    // Logger and verbose mode follow the parsed flags
    let verbose = matches
        .subcommand()
        .map_or_else(|| is_verbose(&matches), |(_, sub)| is_verbose(sub));
    pomnav_lib::logger::init(verbose);
    pomnav_lib::logger::set_verbose(verbose);

    // Environment settings (POMNAV_*), read once the logger can report bad values
    let base_settings = Settings::get();

    let pages = Arc::new(PageRegistry::with_defaults());

    match matches.subcommand() {
        Some((name, sub_matches)) => {
            let settings = apply_overrides(base_settings, sub_matches);
            tracing::debug!(command = name, skin = %settings.skin, "Executing command");
            if let Err(e) = dispatch_command(name, sub_matches, &settings, pages).await {
                handle_command_error(&e);
                std::process::exit(1);
            }
        }
        None => {
            if let Err(e) = root.print_help().map_err(|e| {
                NavError::Application(format!("Failed to print help: {e}"))
            }) {
                handle_fatal(e);
            }
        }
    }
}
