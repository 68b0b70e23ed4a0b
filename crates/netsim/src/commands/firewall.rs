//! Firewall rule command handlers.

use tabled::Tabled;

use netsim_core::firewall::DEFAULT_ACTION;
use netsim_core::{CoreError, DeviceId, FirewallAction, FirewallRule, RuleId};

use crate::cli::{FirewallArgs, FirewallCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util::{self, TopologyFile};

// ── Rule table row ──────────────────────────────────────────────────

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Source")]
    src: String,
    #[tabled(rename = "Destination")]
    dst: String,
    #[tabled(rename = "Action")]
    action: FirewallAction,
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    file: &TopologyFile,
    args: FirewallArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut ws = file.load()?;

    match args.command {
        FirewallCommand::List { router } => {
            let id = DeviceId::from(router);
            let device = ws.device(&id)?;
            if !device.is_router() {
                return Err(CoreError::NotARouter {
                    id,
                    device_type: device.device_type,
                }
                .into());
            }

            let rules = device.firewall_rules.as_slice();
            let out = output::render_list(
                global.format(),
                rules,
                |r: &FirewallRule| RuleRow {
                    position: rules.iter().position(|x| x.id == r.id).map_or(0, |i| i + 1),
                    id: r.id.to_string(),
                    src: r.src.to_string(),
                    dst: r.dst.to_string(),
                    action: r.action,
                },
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            if global.format() == OutputFormat::Table {
                util::status(
                    &format!("Unmatched traffic: {DEFAULT_ACTION} (first match wins)"),
                    global.quiet,
                );
            }
            Ok(())
        }

        FirewallCommand::Add {
            router,
            src,
            dst,
            action,
        } => {
            let id = DeviceId::from(router);
            let rule = ws.add_firewall_rule(&id, &src, &dst, FirewallAction::from(action))?;
            file.save(&ws)?;
            output::print_output(&rule.to_string(), global.quiet);
            Ok(())
        }

        FirewallCommand::Delete { router, rule } => {
            let id = DeviceId::from(router);
            let rule = RuleId(rule);
            if !util::confirm(&format!("Delete rule {rule} on {id}?"), global.yes)? {
                return Ok(());
            }
            ws.delete_firewall_rule(&id, rule)?;
            file.save(&ws)?;
            util::status(&format!("Rule {rule} deleted from {id}"), global.quiet);
            Ok(())
        }
    }
}
