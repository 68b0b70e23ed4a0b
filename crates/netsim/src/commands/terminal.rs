//! `netsim terminal` handler: a device console fed from stdin.

use std::io::{self, BufRead, IsTerminal, Write};

use netsim_core::{DeviceId, TerminalCommand};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util::TopologyFile;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(tabled::Tabled)]
struct LogRow {
    #[tabled(rename = "Log")]
    line: String,
}

/// Feed stdin to the device's interpreter until EOF.
///
/// Interactively the prompt is printed before each read and the echoed
/// command is skipped; piped input gets the full transcript. Structured
/// output formats print the final log once stdin is exhausted.
pub fn handle(
    file: &TopologyFile,
    device: &str,
    user: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let ws = file.load()?;
    let topology = ws.topology();
    let mut session = ws.open_terminal(&DeviceId::from(device), user)?;

    let streaming = global.format() == OutputFormat::Table && !global.quiet;
    let interactive = streaming && io::stdin().is_terminal();
    let mut stdout = io::stdout().lock();

    if streaming {
        for line in session.log() {
            writeln!(stdout, "{line}")?;
        }
    }

    let mut input = io::stdin().lock();
    let mut line = String::new();
    loop {
        if interactive {
            write!(stdout, "{} ", session.prompt(topology))?;
            stdout.flush()?;
        }
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let clears = TerminalCommand::parse(&line) == TerminalCommand::Clear;
        let appended = session.submit(&line, topology);
        if !streaming {
            continue;
        }
        if clears && interactive {
            write!(stdout, "{CLEAR_SCREEN}")?;
        }
        for out in appended.iter().skip(usize::from(interactive)) {
            writeln!(stdout, "{out}")?;
        }
    }
    drop(stdout);

    if !streaming {
        let out = output::render_list(
            global.format(),
            session.log(),
            |l| LogRow { line: l.clone() },
            String::clone,
        )?;
        output::print_output(&out, global.quiet);
    }
    Ok(())
}
