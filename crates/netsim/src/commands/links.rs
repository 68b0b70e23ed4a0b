//! Link command handlers.

use tabled::Tabled;

use netsim_core::{DeviceId, Link, LinkId, Topology};

use crate::cli::{GlobalOpts, LinksArgs, LinksCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, TopologyFile};

#[derive(Tabled)]
struct LinkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Target")]
    target: String,
}

fn endpoint(topology: &Topology, id: &DeviceId) -> String {
    match topology.device(id) {
        Some(d) => format!("{id} ({})", d.label),
        None => format!("{id} (missing)"),
    }
}

fn row(link: &Link, topology: &Topology) -> LinkRow {
    LinkRow {
        id: link.id.to_string(),
        source: endpoint(topology, &link.source),
        target: endpoint(topology, &link.target),
    }
}

pub fn handle(file: &TopologyFile, args: LinksArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut ws = file.load()?;

    match args.command {
        LinksCommand::List => {
            let topology = ws.topology();
            let out = output::render_list(
                global.format(),
                topology.links(),
                |l| row(l, topology),
                |l| l.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LinksCommand::Add { a, b } => {
            let id = ws.connect(&DeviceId::from(a), &DeviceId::from(b))?;
            file.save(&ws)?;
            output::print_output(id.as_str(), global.quiet);
            Ok(())
        }

        LinksCommand::Remove { link } => {
            let id = LinkId::from(link);
            ws.disconnect(&id)?;
            file.save(&ws)?;
            util::status(&format!("Link {id} removed"), global.quiet);
            Ok(())
        }
    }
}
