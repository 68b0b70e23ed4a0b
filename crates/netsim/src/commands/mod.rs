//! Command dispatch: bridges CLI args -> workspace operations -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod firewall;
pub mod links;
pub mod ping;
pub mod terminal;
pub mod util;
pub mod validate;

use netsim_core::Workspace;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

use self::util::TopologyFile;

/// Dispatch a command to the appropriate handler.
pub fn dispatch(
    cmd: Command,
    file: &TopologyFile,
    config: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Init { force } => init(file, force, global),
        Command::Devices(args) => devices::handle(file, args, global),
        Command::Links(args) => links::handle(file, args, global),
        Command::Firewall(args) => firewall::handle(file, args, global),
        Command::Ping { source, target } => ping::handle(file, &source, &target, global),
        Command::Terminal { device } => {
            terminal::handle(file, &device, &config.terminal.user, global)
        }
        Command::Validate => validate::handle(file, global),
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "netsim", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Write an empty topology, refusing to clobber one without `--force`.
fn init(file: &TopologyFile, force: bool, global: &GlobalOpts) -> Result<(), CliError> {
    if file.exists() && !force {
        return Err(CliError::Conflict {
            resource_type: "topology file".into(),
            identifier: file.path().display().to_string(),
        });
    }
    file.save(&Workspace::new())?;
    util::status(
        &format!("Empty topology written to {}", file.path().display()),
        global.quiet,
    );
    Ok(())
}
