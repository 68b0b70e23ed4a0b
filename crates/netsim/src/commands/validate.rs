//! `netsim validate` handler.

use tabled::Tabled;

use netsim_core::{Issue, Severity, audit};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util::{self, TopologyFile};

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "Severity")]
    severity: Severity,
    #[tabled(rename = "Check")]
    kind: &'static str,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&Issue> for IssueRow {
    fn from(issue: &Issue) -> Self {
        Self {
            severity: issue.severity(),
            kind: issue.kind(),
            detail: issue.to_string(),
        }
    }
}

/// Report every issue; fail only when one of them affects ping results.
pub fn handle(file: &TopologyFile, global: &GlobalOpts) -> Result<(), CliError> {
    let ws = file.load()?;
    let issues = audit(ws.topology());

    if issues.is_empty() {
        util::status(
            &format!(
                "Topology OK: {} device(s), {} link(s)",
                ws.topology().devices().len(),
                ws.topology().links().len()
            ),
            global.quiet,
        );
        return Ok(());
    }

    let out = output::render_list(
        global.format(),
        &issues,
        |i| IssueRow::from(i),
        ToString::to_string,
    )?;
    output::print_output(&out, global.quiet);

    let errors = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    if errors == 0 {
        Ok(())
    } else {
        Err(CliError::TopologyIssues { count: errors })
    }
}
