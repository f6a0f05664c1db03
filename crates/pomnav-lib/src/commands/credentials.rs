//! `credentials` command: look up a user of the selected skin.

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::cli::{wants_json, CommandBuilder, CommandCategory, CommandMeta};
use crate::config::variables::Credentials;
use crate::errors::{NavError, Result};
use crate::output;
use crate::session::Session;

const MASK: &str = "********";

pub fn credentials_command() -> Command {
    Command::new("credentials")
        .about("Show the credentials of a user id")
        .aliases(["creds"])
        .arg(
            Arg::new("user_id")
                .value_name("USER_ID")
                .required(true)
                .help("User id from the skin's credentials"),
        )
        .arg(
            Arg::new("show-password")
                .long("show-password")
                .action(ArgAction::SetTrue)
                .help("Print the password instead of a mask"),
        )
}

pub fn credentials_meta() -> CommandMeta {
    CommandBuilder::from_clap(credentials_command())
        .category(CommandCategory::Lookup)
        .build()
}

pub fn lookup_credentials(session: &Session, user_id: &str, show_password: bool) -> Result<Credentials> {
    let found = session
        .credentials_mapping()?
        .get(user_id)
        .ok_or_else(|| NavError::UnknownUser(user_id.to_string()))?;
    let password = if show_password { found.password.as_str() } else { MASK };
    Ok(Credentials::new(&found.username, password))
}

pub fn handle_credentials(matches: &ArgMatches, session: &Session) -> Result<()> {
    let user_id = matches
        .get_one::<String>("user_id")
        .map(String::as_str)
        .unwrap_or_default();
    let credentials = lookup_credentials(session, user_id, matches.get_flag("show-password"))?;

    if wants_json(matches) {
        return output::json(&credentials);
    }
    output::field("username", &credentials.username);
    output::field("password", &credentials.password);
    Ok(())
}
