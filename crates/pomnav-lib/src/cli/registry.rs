use clap::Command;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::errors::{NavError, Result};

/// Command groups shown in help listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    Core,
    Lookup,
    Browser,
    Template,
}

impl CommandCategory {
    /// Returns all category variants in display order.
    pub fn all() -> &'static [CommandCategory] {
        &[
            CommandCategory::Core,
            CommandCategory::Lookup,
            CommandCategory::Browser,
            CommandCategory::Template,
        ]
    }
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandCategory::Core => write!(f, "core"),
            CommandCategory::Lookup => write!(f, "lookup"),
            CommandCategory::Browser => write!(f, "browser"),
            CommandCategory::Template => write!(f, "template"),
        }
    }
}

/// Metadata for a registered command.
#[derive(Debug, Clone)]
pub struct CommandMeta {
    pub name: String,
    pub category: CommandCategory,
    pub description: String,
    pub command: Command,
}

/// Collects subcommands before they are attached to the root command.
pub struct CommandRegistry {
    commands: HashMap<String, CommandMeta>,
    root: Command,
}

impl CommandRegistry {
    pub fn new(root: Command) -> Self {
        Self {
            commands: HashMap::new(),
            root,
        }
    }

    /// Registers a command. Returns an error if a command with the same name already exists.
    pub fn register(&mut self, meta: CommandMeta) -> Result<()> {
        if self.commands.contains_key(&meta.name) {
            return Err(NavError::Application(format!(
                "duplicate command name: {}",
                meta.name
            )));
        }
        self.commands.insert(meta.name.clone(), meta);
        Ok(())
    }

    /// Returns all commands in the given category, sorted by name.
    pub fn get_by_category(&self, cat: CommandCategory) -> Vec<&CommandMeta> {
        let mut cmds: Vec<_> = self
            .commands
            .values()
            .filter(|m| m.category == cat)
            .collect();
        cmds.sort_by(|a, b| a.name.cmp(&b.name));
        cmds
    }

    /// Consumes the registry and builds the final clap Command, subcommands
    /// ordered by category then name.
    pub fn build_root(self) -> Command {
        let mut root = self.root.clone();
        for cat in CommandCategory::all() {
            for meta in self.get_by_category(*cat) {
                root = root.subcommand(meta.command.clone());
            }
        }
        root
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns a sorted list of all registered command names.
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Builder for constructing `CommandMeta` instances.
pub struct CommandBuilder {
    category: Option<CommandCategory>,
    command: Command,
}

impl CommandBuilder {
    /// Creates a builder from an existing clap Command.
    pub fn from_clap(cmd: Command) -> Self {
        Self {
            category: None,
            command: cmd,
        }
    }

    pub fn category(mut self, cat: CommandCategory) -> Self {
        self.category = Some(cat);
        self
    }

    /// Builds the `CommandMeta`. Defaults category to `Core` if not set.
    pub fn build(self) -> CommandMeta {
        let description = self
            .command
            .get_about()
            .map(|s| s.to_string())
            .unwrap_or_default();
        CommandMeta {
            name: self.command.get_name().to_string(),
            category: self.category.unwrap_or(CommandCategory::Core),
            description,
            command: self.command,
        }
    }
}
