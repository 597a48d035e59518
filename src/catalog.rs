//! Git command reference catalog.
//!
//! The catalog is compiled in (`data/commands.toml`), parsed once at startup,
//! and read-only afterwards. `search` implements the reference page's filter:
//! case-insensitive substring match over command title, description, and
//! example code, with empty categories dropped from the result.

use serde::Deserialize;

use crate::error::AppError;

const EMBEDDED_CATALOG: &str = include_str!("../data/commands.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct CommandExample {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Command {
    pub id: String,
    pub title: String,
    pub description: String,
    pub syntax: String,
    #[serde(default)]
    pub examples: Vec<CommandExample>,
    #[serde(default)]
    pub tips: Vec<String>,
}

impl Command {
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .examples
                .iter()
                .any(|ex| ex.code.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandCategory {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, rename = "command")]
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    #[serde(rename = "category")]
    categories: Vec<CommandCategory>,
}

impl Catalog {
    /// Parse the embedded catalog data.
    pub fn load() -> Result<Self, AppError> {
        toml::from_str(EMBEDDED_CATALOG).map_err(|e| AppError::Catalog(e.to_string()))
    }

    pub fn categories(&self) -> &[CommandCategory] {
        &self.categories
    }

    /// Filter the catalog by a free-text term. An empty term returns every
    /// category; otherwise a category survives only if at least one of its
    /// commands matches.
    pub fn search(&self, term: &str) -> Vec<CommandCategory> {
        let needle = term.trim().to_lowercase();
        self.categories
            .iter()
            .filter_map(|category| {
                let commands: Vec<Command> = category
                    .commands
                    .iter()
                    .filter(|c| needle.is_empty() || c.matches(&needle))
                    .cloned()
                    .collect();
                if commands.is_empty() {
                    None
                } else {
                    Some(CommandCategory {
                        id: category.id.clone(),
                        title: category.title.clone(),
                        description: category.description.clone(),
                        commands,
                    })
                }
            })
            .collect()
    }
}
