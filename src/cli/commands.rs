//! # Command Handler
//!
//! Parses one command line and runs it against a `FrecencyStore`.
//!
//! ## Supported Commands
//!
//! | Command              | Description                                  |
//! |----------------------|----------------------------------------------|
//! | `visit PATH [VALUE]` | Add VALUE (default 1) to the score of PATH   |
//! | `get PATH`           | Print the current score of PATH (0 if none)  |
//! | `del PATH`           | Remove PATH                                  |
//! | `list [LIMIT]`       | Print `score<TAB>path`, highest first        |
//! | `sync`               | Flush the shared segment                     |
//! | `save`               | Write the text checkpoint now                |
//! | `help`               | Show usage                                   |
//!
//! Command names are case-insensitive. Paths are taken as raw bytes and
//! printed lossily.

use std::ffi::OsStr;

use eyre::{bail, eyre, Result, WrapErr};

use crate::config::DEFAULT_VISIT_VALUE;
use crate::store::{DeleteOutcome, FrecencyStore};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Visit { path: Vec<u8>, value: f64 },
    Get { path: Vec<u8> },
    Del { path: Vec<u8> },
    List { limit: Option<usize> },
    Sync,
    Save,
    Help,
    Version,
}

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    Output(String),
    Error(String),
}

impl Command {
    pub fn parse<S: AsRef<OsStr>>(parts: &[S]) -> Result<Self> {
        let Some((name, args)) = parts.split_first() else {
            return Ok(Command::Help);
        };
        let args: Vec<&OsStr> = args.iter().map(|arg| arg.as_ref()).collect();
        let name = name.as_ref();

        let command = match name.to_str().map(str::to_lowercase).as_deref() {
            Some("visit") => match args[..] {
                [path] => Command::Visit {
                    path: path_bytes(path),
                    value: DEFAULT_VISIT_VALUE,
                },
                [path, value] => {
                    let value: f64 = text(value)
                        .and_then(|v| v.parse().map_err(Into::into))
                        .wrap_err_with(|| {
                            format!("Invalid visit value: {}", value.to_string_lossy())
                        })?;
                    if !(value.is_finite() && value > 0.0) {
                        bail!("Visit value must be a positive number, got {}", value);
                    }
                    Command::Visit {
                        path: path_bytes(path),
                        value,
                    }
                }
                _ => bail!("Usage: visit PATH [VALUE]"),
            },
            Some("get") => match args[..] {
                [path] => Command::Get {
                    path: path_bytes(path),
                },
                _ => bail!("Usage: get PATH"),
            },
            Some("del" | "delete") => match args[..] {
                [path] => Command::Del {
                    path: path_bytes(path),
                },
                _ => bail!("Usage: del PATH"),
            },
            Some("list") => match args[..] {
                [] => Command::List { limit: None },
                [limit] => Command::List {
                    limit: Some(
                        text(limit)
                            .and_then(|l| l.parse().map_err(Into::into))
                            .wrap_err_with(|| {
                                format!("Invalid limit: {}", limit.to_string_lossy())
                            })?,
                    ),
                },
                _ => bail!("Usage: list [LIMIT]"),
            },
            Some("sync") if args.is_empty() => Command::Sync,
            Some("save") if args.is_empty() => Command::Save,
            Some("help") => Command::Help,
            _ => bail!(
                "Unknown command: {}. Run with --help for usage.",
                name.to_string_lossy()
            ),
        };

        Ok(command)
    }
}

fn path_bytes(path: &OsStr) -> Vec<u8> {
    path.as_encoded_bytes().to_vec()
}

fn text(arg: &OsStr) -> Result<&str> {
    arg.to_str().ok_or_else(|| eyre!("not valid UTF-8"))
}

pub struct CommandHandler;

impl CommandHandler {
    pub fn execute(command: &Command, store: &mut FrecencyStore) -> CommandResult {
        match command {
            Command::Visit { path, value } => {
                store.visit_with(path, *value);
                CommandResult::Output(format_score(store.get(path)))
            }
            Command::Get { path } => CommandResult::Output(format_score(store.get(path))),
            Command::Del { path } => match store.del(path) {
                DeleteOutcome::Deleted => {
                    CommandResult::Output(format!("Deleted {}", String::from_utf8_lossy(path)))
                }
                DeleteOutcome::NotFound => {
                    CommandResult::Error(format!("Not found: {}", String::from_utf8_lossy(path)))
                }
                DeleteOutcome::NotInitialized => {
                    CommandResult::Error("Store not initialized".to_string())
                }
            },
            Command::List { limit } => {
                let lines: Vec<String> = store
                    .list(*limit)
                    .iter()
                    .map(|scored| format!("{}\t{}", format_score(scored.score), scored.path_lossy()))
                    .collect();
                CommandResult::Output(lines.join("\n"))
            }
            Command::Sync => status(store.sync(), "sync failed"),
            Command::Save => status(store.save(), "save failed"),
            Command::Help => CommandResult::Output(help_text()),
            Command::Version => {
                CommandResult::Output(format!("frecstore {}", env!("CARGO_PKG_VERSION")))
            }
        }
    }
}

fn status(ok: bool, failure: &str) -> CommandResult {
    if ok {
        CommandResult::Output(String::new())
    } else {
        CommandResult::Error(failure.to_string())
    }
}

fn format_score(score: f64) -> String {
    format!("{:.3}", score)
}

pub fn help_text() -> String {
    r#"frecstore - frecency scores for filesystem paths

USAGE:
    frecstore [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
    visit PATH [VALUE]   Add VALUE (default 1) to the score of PATH
    get PATH             Print the current score of PATH
    del PATH             Remove PATH
    list [LIMIT]         Print score<TAB>path, highest score first
    sync                 Flush the shared segment
    save                 Write the text checkpoint now

OPTIONS:
    --segment FILE       Shared segment file (env FRECSTORE_SEGMENT)
    --data FILE          Checkpoint file (env FRECSTORE_DATA)
    -h, --help           Print help information
    -v, --version        Print version information

Set RUST_LOG=debug for diagnostics."#
        .to_string()
}
