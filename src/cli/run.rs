//! Dispatches parsed arguments to the command handlers.
//!
//! # Returns
//! - `Ok(CommandResult)` with error/warning counts and exit behavior
//! - `Err` if the command fails (e.g., invalid config, unreadable catalog)
use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{
        CommandResult, compile::compile, extract::extract, filter::filter, import::import,
        init::init, init_config::init_config, stats::stats, update::update,
    },
};

pub fn run(Arguments { common, command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Extract(cmd)) => extract(&common, cmd),
        Some(Command::Init(cmd)) => init(&common, cmd),
        Some(Command::Update(cmd)) => update(&common, cmd),
        Some(Command::Compile(cmd)) => compile(&common, cmd),
        Some(Command::Filter(cmd)) => filter(&common, cmd),
        Some(Command::Import(cmd)) => import(&common, cmd),
        Some(Command::Stats) => stats(&common),
        Some(Command::InitConfig) => init_config(&common),
        None => {
            bail!("No command provided. Use --help to see available commands.")
        }
    }
}
