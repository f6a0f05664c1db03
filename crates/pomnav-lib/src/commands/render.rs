//! `render` command: fill `$name` placeholders of a template file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::Value;

use crate::cli::{wants_json, CommandBuilder, CommandCategory, CommandMeta};
use crate::errors::{NavError, Result};
use crate::output;
use crate::page::kwargs::{parse_scalar, split_pair};
use crate::parametrizer::Parametrizer;

pub fn render_command() -> Command {
    Command::new("render")
        .about("Substitute $name placeholders in a template file")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Template file"),
        )
        .arg(
            Arg::new("var")
                .long("var")
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Placeholder value; JSON scalars keep their type"),
        )
}

pub fn render_meta() -> CommandMeta {
    CommandBuilder::from_clap(render_command())
        .category(CommandCategory::Template)
        .build()
}

/// Placeholder mapping from `KEY=VALUE` pairs.
pub fn parse_vars<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Result<BTreeMap<String, Value>> {
    pairs
        .into_iter()
        .map(|pair| {
            let (key, raw) = split_pair(pair).map_err(NavError::Config)?;
            Ok((key.to_string(), parse_scalar(raw)))
        })
        .collect()
}

pub async fn handle_render(matches: &ArgMatches) -> Result<()> {
    let path = matches
        .get_one::<PathBuf>("file")
        .ok_or_else(|| NavError::Config("no template file given".to_string()))?;
    let vars = parse_vars(
        matches
            .get_many::<String>("var")
            .into_iter()
            .flatten()
            .map(String::as_str),
    )?;
    let template = tokio::fs::read_to_string(path).await?;
    let parametrizer = Parametrizer::new(vars);

    if wants_json(matches) {
        output::json(&parametrizer.json_loads(&template)?)
    } else {
        print!("{}", parametrizer.parametrize(&template));
        Ok(())
    }
}
