//! Command dispatch: bridges CLI args -> inventory operations -> output.

pub mod cleanup;
pub mod config_cmd;
pub mod create;
pub mod delete;
pub mod info;
pub mod list;
pub mod route;
pub mod run;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch a control-plane command to its handler.
pub async fn dispatch(
    cmd: Command,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Create(args) => create::handle(args, settings, global).await,
        Command::List(args) => list::handle(args, settings, global).await,
        Command::Info(args) => info::handle(args, settings, global).await,
        Command::Delete(args) => delete::handle(args, settings, global).await,
        Command::Run(args) => run::handle(args, settings).await,
        Command::Cleanup(args) => cleanup::handle(args, settings, global).await,
        Command::Route(args) => route::handle(args, settings, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal {
            message: "local command reached control-plane dispatch".into(),
        }),
    }
}
