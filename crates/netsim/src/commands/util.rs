//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use netsim_core::{CoreError, Workspace};

use crate::error::CliError;

/// The topology document a command reads and, for edits, writes back.
#[derive(Debug, Clone)]
pub struct TopologyFile {
    path: PathBuf,
}

impl TopologyFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the workspace. A file that does not exist yet is an empty
    /// topology.
    pub fn load(&self) -> Result<Workspace, CliError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no topology file yet, starting empty");
                return Ok(Workspace::new());
            }
            Err(e) => return Err(e.into()),
        };
        Workspace::from_json(&text).map_err(|err| match err {
            CoreError::Snapshot(source) => CliError::Topology {
                path: self.path.display().to_string(),
                source,
            },
            other => other.into(),
        })
    }

    /// Write the workspace as pretty JSON, creating parent directories.
    pub fn save(&self, workspace: &Workspace) -> Result<(), CliError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = workspace.to_json()?;
        std::fs::write(&self.path, json)?;
        info!(path = %self.path.display(), "topology saved");
        Ok(())
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.trim_end_matches('?').into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}

/// Print a status line to stderr unless `--quiet`.
pub fn status(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}
