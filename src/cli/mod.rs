//! # frecstore CLI Module
//!
//! A thin command surface over `FrecencyStore`, for scripting and for
//! inspecting the shared table from a shell.
//!
//! ## Usage
//!
//! ```bash
//! frecstore visit ~/src/project          # record one visit
//! frecstore visit ~/src/project 5        # add 5 to its score
//! frecstore get ~/src/project            # print the current score
//! frecstore list 10                      # top 10, highest score first
//! frecstore del ~/src/project
//! frecstore --segment /tmp/f.shm --data /tmp/f.txt list
//! ```
//!
//! Every invocation attaches to the shared segment, runs one command, then
//! saves the checkpoint and flushes the segment. It never shuts the segment
//! down, so other processes keep their view.
//!
//! ## Module Organization
//!
//! - `commands`: command parsing and execution against a store
//! - this module: global option parsing (`parse_args`)
//!
//! Arguments are taken as `OsStr`. Option names, values and numbers must be
//! UTF-8; paths are kept as raw bytes, so any directory name the filesystem
//! accepts can be scored.

pub mod commands;

use std::ffi::OsStr;
use std::path::PathBuf;

use eyre::{bail, Result};

pub use commands::{Command, CommandHandler, CommandResult};

#[derive(Debug, PartialEq)]
pub struct Invocation {
    pub segment: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub command: Command,
}

/// Parses the arguments after the program name.
pub fn parse_args<S: AsRef<OsStr>>(args: &[S]) -> Result<Invocation> {
    let mut segment = None;
    let mut data = None;
    let mut rest: Vec<&OsStr> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let raw = args[i].as_ref();
        match raw.to_str() {
            Some("--help" | "-h") => {
                return Ok(Invocation {
                    segment,
                    data,
                    command: Command::Help,
                })
            }
            Some("--version" | "-v") => {
                return Ok(Invocation {
                    segment,
                    data,
                    command: Command::Version,
                })
            }
            Some(opt @ ("--segment" | "--data")) => {
                let Some(value) = args.get(i + 1) else {
                    bail!("Missing value for {}", opt);
                };
                let value = PathBuf::from(value.as_ref());
                if opt == "--segment" {
                    segment = Some(value);
                } else {
                    data = Some(value);
                }
                i += 1;
            }
            Some(opt) if opt.starts_with("--") => {
                bail!("Unknown option: {}", opt);
            }
            // The command word; everything from here on belongs to it.
            _ => {
                rest.extend(args[i..].iter().map(|arg| arg.as_ref()));
                break;
            }
        }
        i += 1;
    }

    let command = if rest.is_empty() {
        Command::Help
    } else {
        Command::parse(&rest)?
    };

    Ok(Invocation {
        segment,
        data,
        command,
    })
}
