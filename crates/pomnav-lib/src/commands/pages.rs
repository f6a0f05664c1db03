//! `pages` command: every declared page id with its path, class and actions.

use std::collections::BTreeMap;

use clap::{ArgMatches, Command};
use serde::Serialize;

use crate::cli::{wants_json, CommandBuilder, CommandCategory, CommandMeta};
use crate::errors::Result;
use crate::output;
use crate::session::Session;

use super::resolve::resolve_class;

pub fn pages_command() -> Command {
    Command::new("pages")
        .about("List the page ids of the navigation file")
        .aliases(["ls"])
}

pub fn pages_meta() -> CommandMeta {
    CommandBuilder::from_clap(pages_command())
        .category(CommandCategory::Lookup)
        .build()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    pub page_id: String,
    pub path: String,
    pub class: String,
    pub actions: BTreeMap<String, String>,
}

/// One summary per page id, sorted by page id.
pub fn summarize(session: &Session) -> Result<Vec<PageSummary>> {
    session
        .page_mappings()
        .iter()
        .map(|(page_id, mapping)| {
            Ok(PageSummary {
                page_id: page_id.clone(),
                path: mapping.path_or_root().to_string(),
                class: resolve_class(session, Some(page_id))?,
                actions: mapping.actions.clone(),
            })
        })
        .collect()
}

pub fn handle_pages(matches: &ArgMatches, session: &Session) -> Result<()> {
    let pages = summarize(session)?;

    if wants_json(matches) {
        return output::json(&pages);
    }
    if pages.is_empty() {
        output::warning("No page mappings configured");
        return Ok(());
    }
    for page in &pages {
        println!("{:<20} {:<24} {}", page.page_id, page.path, page.class);
        for (action, target) in &page.actions {
            println!("  {} -> {}", action, target);
        }
    }
    Ok(())
}
