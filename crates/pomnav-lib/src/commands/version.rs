//! `version` command: display the application version.

use clap::{ArgMatches, Command};

use crate::cli::{wants_json, CommandBuilder, CommandCategory, CommandMeta};
use crate::errors::Result;
use crate::output;

/// Build the `version` clap command.
pub fn version_command() -> Command {
    Command::new("version")
        .about("Show version information")
        .aliases(["V"])
}

/// Build the `CommandMeta` for registry registration.
pub fn version_meta() -> CommandMeta {
    CommandBuilder::from_clap(version_command())
        .category(CommandCategory::Core)
        .build()
}

/// Handle the `version` command.
pub fn handle_version(matches: &ArgMatches) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    if wants_json(matches) {
        output::json(&serde_json::json!({ "name": "pomnav", "version": version }))
    } else {
        println!("pomnav version {}", version);
        Ok(())
    }
}
