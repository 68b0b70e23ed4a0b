//! Device command handlers.

use tabled::Tabled;

use netsim_core::{Device, DeviceId, DeviceSettings, DeviceType, Topology};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util::{self, TopologyFile};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Netmask")]
    netmask: String,
    #[tabled(rename = "Gateway")]
    gateway: String,
    #[tabled(rename = "Rules")]
    rules: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.to_string(),
            dtype: d.device_type.to_string(),
            label: d.label.clone(),
            ip: d.ip().unwrap_or("-").to_owned(),
            netmask: d.netmask.clone(),
            gateway: if d.is_router() {
                String::new()
            } else {
                d.gateway().unwrap_or("-").to_owned()
            },
            rules: if d.is_router() {
                d.firewall_rules.len().to_string()
            } else {
                String::new()
            },
        }
    }
}

fn detail(d: &Device, topology: &Topology) -> String {
    let mut lines = vec![
        format!("ID:       {}", d.id),
        format!("Label:    {}", d.label),
        format!("Type:     {}", d.device_type),
        format!("IP:       {}", d.ip().unwrap_or("-")),
        format!("Netmask:  {}", d.netmask),
    ];
    if d.is_router() {
        lines.push(format!("Rules:    {}", d.firewall_rules.len()));
    } else {
        lines.push(format!("Gateway:  {}", d.gateway().unwrap_or("-")));
    }

    let peers: Vec<String> = topology
        .links_of(&d.id)
        .map(|l| {
            let peer = if l.source == d.id { &l.target } else { &l.source };
            let label = topology.device(peer).map_or("?", |p| p.label.as_str());
            format!("{peer} ({label})")
        })
        .collect();
    lines.push(format!(
        "Links:    {}",
        if peers.is_empty() {
            "-".into()
        } else {
            peers.join(", ")
        }
    ));
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    file: &TopologyFile,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut ws = file.load()?;

    match args.command {
        DevicesCommand::List => {
            let devices = ws.topology().devices();
            let out = output::render_list(
                global.format(),
                devices,
                |d| DeviceRow::from(d),
                |d| d.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { device } => {
            let d = ws.device(&DeviceId::from(device))?;
            let out = output::render_single(
                global.format(),
                d,
                |d| detail(d, ws.topology()),
                |d| d.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Add { kind, label } => {
            let id = ws.add_device(DeviceType::from(kind), label.as_deref());
            file.save(&ws)?;
            let d = ws.device(&id)?;
            let out = output::render_single(
                global.format(),
                d,
                |d| format!("Added {} {} ({})", d.device_type, d.id, d.label),
                |d| d.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Remove { device } => {
            let id = DeviceId::from(device);
            let links = {
                let d = ws.device(&id)?;
                ws.topology().links_of(&d.id).count()
            };
            let prompt = if links == 0 {
                format!("Remove device {id}?")
            } else {
                format!("Remove device {id} and its {links} link(s)?")
            };
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }
            ws.remove_device(&id)?;
            file.save(&ws)?;
            util::status(&format!("Device {id} removed"), global.quiet);
            Ok(())
        }

        DevicesCommand::Configure {
            device,
            label,
            ip,
            netmask,
            gateway,
        } => {
            let settings = DeviceSettings {
                label,
                ip,
                netmask,
                gateway,
            };
            if settings == DeviceSettings::default() {
                return Err(CliError::Validation {
                    field: "settings".into(),
                    reason: "pass at least one of --label, --ip, --netmask, --gateway".into(),
                });
            }
            let id = DeviceId::from(device);
            ws.configure_device(&id, settings)?;
            file.save(&ws)?;
            util::status(&format!("Device {id} configured"), global.quiet);
            Ok(())
        }
    }
}
