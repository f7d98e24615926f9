//! Output formatting utilities

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use treestore_core::Item;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Table,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            other => Err(format!("invalid format '{}', expected json or table", other)),
        }
    }
}

/// Format a list of items
pub fn format_items(items: &[&Item], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Table => Ok(render_table(items)),
    }
}

/// Format a single lookup result; a miss renders as `null` or an empty table
pub fn format_item(item: Option<&Item>, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&item)?),
        OutputFormat::Table => Ok(render_table(item.as_slice())),
    }
}

fn render_table(items: &[&Item]) -> String {
    let rows: Vec<[String; 3]> = items
        .iter()
        .map(|item| {
            let fields = if item.extra.is_empty() {
                String::new()
            } else {
                serde_json::Value::Object(item.extra.clone()).to_string()
            };
            [
                item.id.as_ref().map_or_else(|| "-".to_string(), |id| id.to_string()),
                item.parent.as_ref().map_or_else(|| "-".to_string(), |id| id.to_string()),
                fields,
            ]
        })
        .collect();

    let id_width = rows.iter().map(|r| r[0].len()).max().unwrap_or(0).max("ID".len());
    let parent_width = rows.iter().map(|r| r[1].len()).max().unwrap_or(0).max("PARENT".len());

    let mut out = format!("{:<id_width$}  {:<parent_width$}  FIELDS", "ID", "PARENT");
    for [id, parent, fields] in &rows {
        out.push('\n');
        out.push_str(format!("{:<id_width$}  {:<parent_width$}  {}", id, parent, fields).trim_end());
    }
    out
}
