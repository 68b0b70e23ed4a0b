//! `netsim ping` handler.

use serde::Serialize;
use tracing::debug;

use netsim_core::address::{AddressOptions, validate_address};
use netsim_core::{DeviceId, OutcomeKind, ValidationError};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util::TopologyFile;

#[derive(Debug, Serialize)]
struct PingReport<'a> {
    source: &'a str,
    target: &'a str,
    outcome: OutcomeKind,
    success: bool,
    message: String,
}

/// Run one simulated ping. A non-reply outcome is reported and then
/// surfaces as `PingFailed`, so the exit status reflects reachability.
pub fn handle(
    file: &TopologyFile,
    source: &str,
    target: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if target.is_empty() {
        return Err(CliError::InvalidAddress(ValidationError::Empty {
            field: "Target".into(),
        }));
    }
    validate_address("Target", target, AddressOptions::HOST).map_err(CliError::InvalidAddress)?;

    let ws = file.load()?;
    let outcome = ws.ping(&DeviceId::from(source), target);
    let kind = outcome.kind();
    debug!(source, target, %kind, "ping finished");

    let report = PingReport {
        source,
        target,
        outcome: kind,
        success: outcome.is_success(),
        message: outcome.message(),
    };
    let color = output::should_color(global.color_mode());
    let out = output::render_single(
        global.format(),
        &report,
        |r| output::paint_outcome(&r.message, r.outcome, color),
        |r| r.message.clone(),
    )?;
    output::print_output(&out, global.quiet);

    if report.success {
        Ok(())
    } else {
        Err(CliError::PingFailed { kind })
    }
}
