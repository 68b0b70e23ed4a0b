//! Line interpreter behind a device's terminal window.
//!
//! The grammar is tiny: `ping <ip>`, `clear`, blank lines, and everything
//! else is rejected. [`interpret`] is pure and returns what to do with the
//! log; [`TerminalSession`] owns the log of one device and applies it.

use tracing::debug;

use crate::engine;
use crate::model::{Device, DeviceId};
use crate::topology::Topology;

/// User name shown in the prompt when none is configured.
pub const DEFAULT_USER: &str = "admin";

/// A parsed terminal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalCommand<'a> {
    /// `ping`, with its target token if one was given.
    Ping(Option<&'a str>),
    Clear,
    Empty,
    Unknown(&'a str),
}

impl<'a> TerminalCommand<'a> {
    /// Parse a trimmed line. Only the first two whitespace-separated tokens
    /// of a `ping` are looked at.
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            None => Self::Empty,
            Some("ping") => Self::Ping(tokens.next()),
            Some("clear") if tokens.next().is_none() => Self::Clear,
            Some(_) => Self::Unknown(line),
        }
    }
}

/// Everything [`interpret`] needs to know about the session.
#[derive(Debug, Clone, Copy)]
pub struct TerminalContext<'a> {
    pub topology: &'a Topology,
    pub device: &'a DeviceId,
    pub label: &'a str,
    pub user: &'a str,
}

impl TerminalContext<'_> {
    pub fn prompt(&self) -> String {
        format!("[{}@{}] >", self.user, self.label)
    }
}

/// Effect of one line on the session log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interpretation {
    /// Lines to append, in order.
    pub lines: Vec<String>,
    /// Wipe the log instead of appending.
    pub clear: bool,
}

/// Interpret one input line typed on `ctx.device`.
pub fn interpret(line: &str, ctx: &TerminalContext<'_>) -> Interpretation {
    let command = TerminalCommand::parse(line);
    let response = match command {
        TerminalCommand::Empty => return Interpretation::default(),
        TerminalCommand::Clear => {
            return Interpretation {
                lines: Vec::new(),
                clear: true,
            };
        }
        TerminalCommand::Ping(None) => "Usage: ping <ip_address>".to_owned(),
        TerminalCommand::Ping(Some(target)) => {
            engine::ping(ctx.topology, ctx.device, target).message()
        }
        TerminalCommand::Unknown(text) => format!("Bad command: {text}"),
    };
    debug!(device = %ctx.device, ?command, "terminal command");

    Interpretation {
        lines: vec![format!("{} {}", ctx.prompt(), line.trim()), response],
        clear: false,
    }
}

// ── Session ─────────────────────────────────────────────────────────

/// Append-only log of one device's terminal.
#[derive(Debug, Clone)]
pub struct TerminalSession {
    device: DeviceId,
    label: String,
    user: String,
    log: Vec<String>,
}

impl TerminalSession {
    /// Open a terminal on `device`, starting with the login banner.
    pub fn open(device: &Device, user: impl Into<String>) -> Self {
        Self {
            device: device.id.clone(),
            label: device.label.clone(),
            user: user.into(),
            log: vec![
                format!("Connecting to {}...", device.label),
                "Login successful.".to_owned(),
            ],
        }
    }

    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Prompt for the next line, using the device's current label.
    pub fn prompt(&self, topology: &Topology) -> String {
        self.context(topology).prompt()
    }

    /// Run one line against `topology` and return the lines it appended.
    /// A `clear` empties the log and returns nothing.
    pub fn submit(&mut self, line: &str, topology: &Topology) -> &[String] {
        let outcome = interpret(line, &self.context(topology));
        if outcome.clear {
            self.log.clear();
            return &[];
        }
        let start = self.log.len();
        self.log.extend(outcome.lines);
        self.log.get(start..).unwrap_or_default()
    }

    fn context<'a>(&'a self, topology: &'a Topology) -> TerminalContext<'a> {
        // The label may have been edited since the session opened.
        let label = topology
            .device(&self.device)
            .map_or(self.label.as_str(), |d| d.label.as_str());
        TerminalContext {
            topology,
            device: &self.device,
            label,
            user: &self.user,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{DeviceType, Link};
    use pretty_assertions::assert_eq;

    fn lan() -> Topology {
        let mut a = Device::new("1".into(), DeviceType::Pc, "PC-A");
        a.ip = Some("192.168.1.10".into());
        let mut b = Device::new("2".into(), DeviceType::Pc, "PC-B");
        b.ip = Some("192.168.1.20".into());
        Topology::new(vec![a, b], vec![Link::new("1".into(), "2".into())])
    }

    #[test]
    fn parse_grammar() {
        assert_eq!(TerminalCommand::parse(""), TerminalCommand::Empty);
        assert_eq!(TerminalCommand::parse("   "), TerminalCommand::Empty);
        assert_eq!(TerminalCommand::parse("clear"), TerminalCommand::Clear);
        assert_eq!(TerminalCommand::parse("ping"), TerminalCommand::Ping(None));
        assert_eq!(
            TerminalCommand::parse("  ping   10.0.0.1 extra "),
            TerminalCommand::Ping(Some("10.0.0.1"))
        );
        assert_eq!(
            TerminalCommand::parse("clear all"),
            TerminalCommand::Unknown("clear all")
        );
        assert_eq!(
            TerminalCommand::parse("traceroute 1.1.1.1"),
            TerminalCommand::Unknown("traceroute 1.1.1.1")
        );
    }

    #[test]
    fn ping_echoes_prompt_then_result() {
        let topo = lan();
        let ctx = TerminalContext {
            topology: &topo,
            device: &"1".into(),
            label: "PC-A",
            user: DEFAULT_USER,
        };
        let out = interpret("ping 192.168.1.20", &ctx);
        assert_eq!(
            out,
            Interpretation {
                lines: vec![
                    "[admin@PC-A] > ping 192.168.1.20".into(),
                    "Reply from 192.168.1.20: bytes=32 time<1ms TTL=64".into(),
                ],
                clear: false,
            }
        );
    }

    #[test]
    fn ping_without_target_prints_usage() {
        let topo = lan();
        let ctx = TerminalContext {
            topology: &topo,
            device: &"1".into(),
            label: "PC-A",
            user: DEFAULT_USER,
        };
        assert_eq!(
            interpret("ping", &ctx).lines,
            ["[admin@PC-A] > ping", "Usage: ping <ip_address>"]
        );
    }

    #[test]
    fn unknown_command_is_echoed() {
        let topo = lan();
        let ctx = TerminalContext {
            topology: &topo,
            device: &"1".into(),
            label: "PC-A",
            user: "root",
        };
        assert_eq!(
            interpret("  show ip  ", &ctx).lines,
            ["[root@PC-A] > show ip", "Bad command: show ip"]
        );
    }

    #[test]
    fn session_log_appends_and_clears() {
        let topo = lan();
        let mut session = TerminalSession::open(topo.device(&"1".into()).unwrap(), DEFAULT_USER);
        assert_eq!(session.log(), ["Connecting to PC-A...", "Login successful."]);

        assert!(session.submit("", &topo).is_empty());
        assert_eq!(session.log().len(), 2);

        let appended = session.submit("ping 192.168.1.10", &topo).to_vec();
        assert_eq!(
            appended,
            [
                "[admin@PC-A] > ping 192.168.1.10",
                "Reply from 192.168.1.10: bytes=32 time<1ms TTL=64",
            ]
        );
        assert_eq!(session.log().len(), 4);

        assert!(session.submit("clear", &topo).is_empty());
        assert!(session.log().is_empty());

        session.submit("bogus", &topo);
        assert_eq!(session.log(), ["[admin@PC-A] > bogus", "Bad command: bogus"]);
    }

    #[test]
    fn malformed_local_target_finds_no_host() {
        let mut pc = Device::new("1".into(), DeviceType::Pc, "PC-A");
        pc.ip = Some("192.168.1.10".into());
        pc.gateway = Some("192.168.1.1".into());
        let mut router = Device::new("2".into(), DeviceType::Router, "R1");
        router.ip = Some("192.168.1.1".into());
        let topo = Topology::new(vec![pc, router], vec![Link::new("1".into(), "2".into())]);

        let mut session = TerminalSession::open(topo.device(&"1".into()).unwrap(), DEFAULT_USER);
        for target in ["192.168.1.300", "192.168.1.abc"] {
            let appended = session.submit(&format!("ping {target}"), &topo).to_vec();
            assert_eq!(
                appended[1],
                format!("Ping request could not find host {target}.")
            );
        }
        // still routed when the segment differs
        assert_eq!(
            session.submit("ping 8.8.8.8", &topo)[1],
            "Reply from 8.8.8.8: bytes=32 time=10ms TTL=54 (Routed via 192.168.1.1)"
        );
    }

    #[test]
    fn session_prompt_follows_relabel() {
        let mut topo = lan();
        let session = TerminalSession::open(topo.device(&"1".into()).unwrap(), DEFAULT_USER);
        topo.device_mut(&"1".into()).unwrap().label = "Desk".into();
        assert_eq!(session.prompt(&topo), "[admin@Desk] >");
    }
}
