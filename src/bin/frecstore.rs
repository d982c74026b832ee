//! # frecstore CLI Entry Point
//!
//! ## Usage
//!
//! ```bash
//! frecstore visit ~/src/project
//! frecstore list 10
//! frecstore --help
//! ```

use std::env;
use std::ffi::OsString;

use eyre::{bail, Result};
use frecstore::cli::commands::help_text;
use frecstore::cli::{self, Command, CommandHandler, CommandResult};
use frecstore::FrecencyStore;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let args: Vec<OsString> = env::args_os().skip(1).collect();
    let invocation = cli::parse_args(&args)?;

    match invocation.command {
        Command::Help => {
            println!("{}", help_text());
            return Ok(());
        }
        Command::Version => {
            println!("frecstore {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let mut builder = FrecencyStore::builder();
    if let Some(segment) = &invocation.segment {
        builder = builder.segment_path(segment);
    }
    if let Some(data) = &invocation.data {
        builder = builder.data_path(data);
    }
    let mut store = builder.open()?;

    let result = CommandHandler::execute(&invocation.command, &mut store);

    store.save();
    store.sync();

    match result {
        CommandResult::Output(text) => {
            if !text.is_empty() {
                println!("{}", text);
            }
            Ok(())
        }
        CommandResult::Error(message) => bail!(message),
    }
}
