//! `resolve` command: which page class a page id is built with.

use clap::{Arg, ArgMatches, Command};

use crate::cli::{wants_json, CommandBuilder, CommandCategory, CommandMeta};
use crate::errors::Result;
use crate::output;
use crate::resolver::resolve_page_class;
use crate::session::Session;

pub fn resolve_command() -> Command {
    Command::new("resolve")
        .about("Print the page class a page id resolves to")
        .arg(
            Arg::new("page_id")
                .value_name("PAGE_ID")
                .help("Page id; omit for the skin's default page class"),
        )
}

pub fn resolve_meta() -> CommandMeta {
    CommandBuilder::from_clap(resolve_command())
        .category(CommandCategory::Lookup)
        .build()
}

/// Dotted path of the class `page_id` is built with, the skin default
/// acting as fallback.
pub fn resolve_class(session: &Session, page_id: Option<&str>) -> Result<String> {
    let default_class = session.default_page_class()?;
    let class = resolve_page_class(
        session.registry(),
        session.skin(),
        session.page_mappings(),
        page_id,
        Some(&default_class),
        None,
    )?;
    Ok(class.path().to_string())
}

pub fn handle_resolve(matches: &ArgMatches, session: &Session) -> Result<()> {
    let page_id = matches.get_one::<String>("page_id").map(String::as_str);
    let class = resolve_class(session, page_id)?;

    if wants_json(matches) {
        output::json(&serde_json::json!({
            "skin": session.skin(),
            "page_id": page_id,
            "class": class,
        }))
    } else {
        println!("{}", class);
        Ok(())
    }
}
