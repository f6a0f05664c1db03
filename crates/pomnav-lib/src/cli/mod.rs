pub mod registry;

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::config::settings::Settings;

pub use registry::{CommandBuilder, CommandCategory, CommandMeta, CommandRegistry};

/// Creates the root clap Command with the global flags shared by every
/// subcommand.
///
/// `--skin`, `--variables` and `--config` override the `POMNAV_*`
/// environment settings. `--verbose` is suppressed when `--json` is set to
/// keep JSON output clean.
pub fn create_root_command() -> Command {
    Command::new("pomnav")
        .about("Page object navigation toolkit")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Output in JSON format"),
        )
        .arg(
            Arg::new("skin")
                .long("skin")
                .global(true)
                .value_name("SKIN")
                .help("Skin to run against (default: $POMNAV_SKIN or skin1)"),
        )
        .arg(
            Arg::new("variables")
                .long("variables")
                .global(true)
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Variables file with skins, base URLs and credentials"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Navigation file with default pages and page mappings"),
        )
}

/// Returns whether verbose mode is active based on parsed matches.
pub fn is_verbose(matches: &ArgMatches) -> bool {
    let verbose = matches.get_flag("verbose");
    let json = matches.get_flag("json");
    verbose && !json
}

/// Whether `--json` was given, for matches of commands built without the
/// root's global flags as well.
pub fn wants_json(matches: &ArgMatches) -> bool {
    matches
        .try_get_one::<bool>("json")
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

/// `base` with the global flags found in `matches` applied.
pub fn apply_overrides(base: &Settings, matches: &ArgMatches) -> Settings {
    let mut settings = base.clone();
    if let Some(skin) = matches.get_one::<String>("skin") {
        settings.skin = skin.clone();
    }
    if let Some(path) = matches.get_one::<PathBuf>("variables") {
        settings.variables_path = Some(path.clone());
    }
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        settings.config_path = path.clone();
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_command_has_verbose_flag() {
        let cmd = create_root_command();
        let matches = cmd.try_get_matches_from(["pomnav", "--verbose"]).unwrap();
        assert!(matches.get_flag("verbose"));
    }

    #[test]
    fn test_verbose_suppressed_with_json() {
        let cmd = create_root_command();
        let matches = cmd
            .try_get_matches_from(["pomnav", "--verbose", "--json"])
            .unwrap();
        assert!(!is_verbose(&matches));
    }

    #[test]
    fn test_short_verbose_flag() {
        let cmd = create_root_command();
        let matches = cmd.try_get_matches_from(["pomnav", "-v"]).unwrap();
        assert!(is_verbose(&matches));
    }

    #[test]
    fn test_no_flags_keep_settings() {
        let cmd = create_root_command();
        let matches = cmd.try_get_matches_from(["pomnav"]).unwrap();
        assert!(!is_verbose(&matches));
        let base = Settings::default();
        assert_eq!(apply_overrides(&base, &matches), base);
    }

    #[test]
    fn test_overrides_from_flags() {
        let cmd = create_root_command();
        let matches = cmd
            .try_get_matches_from([
                "pomnav",
                "--skin",
                "skin2",
                "--variables",
                "vars.yaml",
                "--config",
                "nav.json",
            ])
            .unwrap();
        let settings = apply_overrides(&Settings::default(), &matches);
        assert_eq!(settings.skin, "skin2");
        assert_eq!(settings.variables_path, Some(PathBuf::from("vars.yaml")));
        assert_eq!(settings.config_path, PathBuf::from("nav.json"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cmd = create_root_command().subcommand(Command::new("pages"));
        let matches = cmd
            .try_get_matches_from(["pomnav", "pages", "--skin", "skin3", "--json"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<String>("skin").map(String::as_str), Some("skin3"));
        assert!(sub.get_flag("json"));
        assert!(wants_json(sub));
    }

    #[test]
    fn test_wants_json_without_global_flag() {
        let matches = Command::new("bare").try_get_matches_from(["bare"]).unwrap();
        assert!(!wants_json(&matches));
    }
}
