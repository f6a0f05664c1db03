//! `url` command: absolute URL of a page id for the selected skin.
//!
//! Named `url_cmd` to avoid conflict with the `url` crate.

use clap::{Arg, ArgMatches, Command};

use crate::cli::{wants_json, CommandBuilder, CommandCategory, CommandMeta};
use crate::errors::Result;
use crate::output;
use crate::resolver::{get_page_url, join_url};
use crate::session::Session;

pub fn url_command() -> Command {
    Command::new("url")
        .about("Print the absolute URL of a page")
        .arg(
            Arg::new("page_id")
                .value_name("PAGE_ID")
                .required(true)
                .help("Page id declared in the page mappings"),
        )
}

pub fn url_meta() -> CommandMeta {
    CommandBuilder::from_clap(url_command())
        .category(CommandCategory::Lookup)
        .build()
}

pub fn page_url(session: &Session, page_id: &str) -> Result<String> {
    let path = get_page_url(session.skin(), session.page_mappings(), Some(page_id))?;
    join_url(session.skin_base_url()?, path)
}

pub fn handle_url(matches: &ArgMatches, session: &Session) -> Result<()> {
    let page_id = matches
        .get_one::<String>("page_id")
        .map(String::as_str)
        .unwrap_or_default();
    let url = page_url(session, page_id)?;

    if wants_json(matches) {
        output::json(&serde_json::json!({ "page_id": page_id, "url": url }))
    } else {
        println!("{}", url);
        Ok(())
    }
}
