//! Command handlers for the CLI
//!
//! This module implements the model-forge commands: parsing a definition
//! file, importing a folder, saving parsed models to the store, and listing
//! what is stored.

use crate::config::Config;
use crate::error::{ModelForgeError, Result};
use crate::parser::{parse_model_definition, Dialect, ParseOutcome};
use crate::store::ModelStore;
use crate::sync;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Command types
#[derive(Debug, Clone, PartialEq)]
pub enum CommandType {
    /// Parse a model definition file and print the schema JSON
    Parse {
        path: String,
        dialect: Option<Dialect>,
    },
    /// Parse a file and upsert the resulting models into the store
    Save {
        path: String,
        dialect: Option<Dialect>,
    },
    /// Import every schema source file in a folder
    Import { folder: String },
    /// List stored models
    Models,
    /// Delete a stored model by id
    Delete { id: i64 },
    /// Show persistent settings, or set one of them
    Config {
        key: Option<String>,
        value: Option<String>,
    },
    /// Show help message
    Help,
}

/// Parsed command
#[derive(Debug, Clone)]
pub struct Command {
    /// The type of command
    pub command_type: CommandType,
}

impl Command {
    /// Parse a command from program arguments
    pub fn parse(args: &[String]) -> Result<Self> {
        let cmd = args.first().map(|s| s.as_str()).unwrap_or("help");

        match cmd {
            "parse" | "save" => {
                let path = args.get(1).cloned().ok_or_else(|| {
                    ModelForgeError::InvalidCommandSyntax {
                        command: cmd.to_string(),
                        expected: format!("{} <file> [dialect]", cmd),
                    }
                })?;
                let dialect = parse_dialect_arg(args.get(2))?;
                let command_type = if cmd == "parse" {
                    CommandType::Parse { path, dialect }
                } else {
                    CommandType::Save { path, dialect }
                };
                Ok(Command { command_type })
            }
            "import" => {
                let folder = args.get(1).cloned().ok_or_else(|| {
                    ModelForgeError::InvalidCommandSyntax {
                        command: cmd.to_string(),
                        expected: "import <folder>".to_string(),
                    }
                })?;
                Ok(Command {
                    command_type: CommandType::Import { folder },
                })
            }
            "models" | "list" => Ok(Command {
                command_type: CommandType::Models,
            }),
            "delete" => {
                let id = args
                    .get(1)
                    .and_then(|s| s.parse::<i64>().ok())
                    .ok_or_else(|| ModelForgeError::InvalidCommandSyntax {
                        command: cmd.to_string(),
                        expected: "delete <model_id>".to_string(),
                    })?;
                Ok(Command {
                    command_type: CommandType::Delete { id },
                })
            }
            "config" => Ok(Command {
                command_type: CommandType::Config {
                    key: args.get(1).cloned(),
                    value: args.get(2).cloned(),
                },
            }),
            "help" | "--help" | "-h" => Ok(Command {
                command_type: CommandType::Help,
            }),
            _ => Err(ModelForgeError::UnknownCommand(cmd.to_string())),
        }
    }
}

/// An explicit dialect argument; "auto" and absence both mean detection.
fn parse_dialect_arg(arg: Option<&String>) -> Result<Option<Dialect>> {
    match arg.map(|s| s.as_str()) {
        None | Some("auto") => Ok(None),
        Some(name) => Dialect::from_str(name).map(Some),
    }
}

/// Handle a command and return the output text
pub async fn handle_command(command: &Command, config: &Config) -> Result<String> {
    match &command.command_type {
        CommandType::Parse { path, dialect } => {
            let content = fs::read_to_string(path)?;
            let mut outcome = parse_model_definition(&content, *dialect);
            apply_page_size(&mut outcome, config);
            Ok(serde_json::to_string_pretty(&outcome)?)
        }
        CommandType::Save { path, dialect } => {
            let content = fs::read_to_string(path)?;
            let mut outcome = parse_model_definition(&content, *dialect);
            apply_page_size(&mut outcome, config);
            let store = ModelStore::connect(&config.database_url).await?;

            let mut lines = Vec::new();
            for schema in outcome.into_schemas() {
                let id = store.upsert(&schema).await?;
                lines.push(format!("✓ saved {} (id {})", schema.name, id));
            }
            Ok(lines.join("\n"))
        }
        CommandType::Import { folder } => {
            let mut report = sync::import_folder(Path::new(folder))?;
            let store = ModelStore::connect(&config.database_url).await?;
            for imported in &mut report.models {
                imported.schema.base_props.page_size = config.page_size;
                store.upsert(&imported.schema).await?;
            }
            Ok(report.message())
        }
        CommandType::Models => {
            let store = ModelStore::connect(&config.database_url).await?;
            let models = store.list().await?;
            if models.is_empty() {
                return Ok("No models stored".to_string());
            }
            let lines: Vec<String> = models
                .iter()
                .map(|m| format!("{:>4}  {}", m.id, m.schema.format_summary()))
                .collect();
            Ok(lines.join("\n"))
        }
        CommandType::Delete { id } => {
            let store = ModelStore::connect(&config.database_url).await?;
            store.delete(*id).await?;
            Ok(format!("✓ deleted model {}", id))
        }
        CommandType::Config { key, value } => {
            handle_config(config, key.as_deref(), value.as_deref())
        }
        CommandType::Help => Ok(help_text()),
    }
}

/// Stamp the configured page size onto every parsed schema.
fn apply_page_size(outcome: &mut ParseOutcome, config: &Config) {
    match outcome {
        ParseOutcome::Single(schema) => schema.base_props.page_size = config.page_size,
        ParseOutcome::Multiple(schemas) => {
            for schema in schemas {
                schema.base_props.page_size = config.page_size;
            }
        }
    }
}

/// Show the current settings, or update one key and persist the file.
fn handle_config(config: &Config, key: Option<&str>, value: Option<&str>) -> Result<String> {
    let (key, value) = match (key, value) {
        (None, _) => {
            return toml::to_string_pretty(config).map_err(|e| {
                ModelForgeError::Config(format!("Failed to serialize config: {}", e))
            });
        }
        (Some(key), Some(value)) => (key, value),
        (Some(_), None) => {
            return Err(ModelForgeError::InvalidCommandSyntax {
                command: "config".to_string(),
                expected: "config [<key> <value>]".to_string(),
            });
        }
    };

    let mut updated = config.clone();
    match key {
        "database_url" => updated.database_url = value.to_string(),
        "page_size" => {
            updated.page_size = value.parse().map_err(|_| {
                ModelForgeError::InvalidInput(format!("page_size must be a number, got {}", value))
            })?;
        }
        other => {
            return Err(ModelForgeError::InvalidInput(format!(
                "Unknown config key: {}. Supported: database_url, page_size",
                other
            )));
        }
    }
    updated.save()?;
    Ok(format!("✓ set {} = {}", key, value))
}

fn help_text() -> String {
    [
        "model-forge - normalize model definitions into admin schemas",
        "",
        "Usage:",
        "  model-forge parse <file> [dialect]   Parse a definition and print schema JSON",
        "  model-forge save <file> [dialect]    Parse a definition and store the models",
        "  model-forge import <folder>          Import every schema source file in a folder",
        "  model-forge models                   List stored models",
        "  model-forge delete <model_id>        Delete a stored model",
        "  model-forge config [<key> <value>]   Show or update settings",
        "  model-forge help                     Show this message",
        "",
        "Dialects: auto (default), python, sql, json, list",
    ]
    .join("\n")
}
