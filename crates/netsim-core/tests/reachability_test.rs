#![allow(clippy::unwrap_used)]
// End-to-end reachability scenarios driven through `Workspace`, with
// topologies loaded from the JSON exchange format.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use netsim_core::address::{AddressOptions, is_same_subnet, validate_address};
use netsim_core::engine::{TimeoutReason, UnreachableReason};
use netsim_core::{
    DeviceId, DeviceSettings, DeviceType, FirewallAction, OutcomeKind, PingOutcome, Workspace,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn node(id: &str, device_type: &str, ip: &str, gateway: &str, rules: Value) -> Value {
    json!({
        "id": id,
        "type": "device",
        "position": { "x": 0.0, "y": 0.0 },
        "data": {
            "label": format!("dev-{id}"),
            "deviceType": device_type,
            "ip": ip,
            "netmask": "255.255.255.0",
            "gateway": gateway,
            "firewallRules": rules,
        }
    })
}

fn edge(source: &str, target: &str) -> Value {
    json!({ "id": format!("link-{source}-{target}"), "source": source, "target": target })
}

fn load(nodes: Vec<Value>, edges: Vec<Value>) -> Workspace {
    let doc = json!({ "nodes": nodes, "edges": edges });
    Workspace::from_json(&doc.to_string()).unwrap()
}

fn id(raw: &str) -> DeviceId {
    DeviceId::from(raw)
}

/// PC `1` behind router `2`, plus an internet host `3` on another segment.
fn routed_lan(rules: Value) -> Workspace {
    load(
        vec![
            node("1", "pc", "192.168.1.10", "192.168.1.1", json!([])),
            node("2", "router", "192.168.1.1", "", rules),
            node("3", "pc", "203.0.113.5", "", json!([])),
        ],
        vec![edge("1", "2")],
    )
}

// ── Subnet helpers ──────────────────────────────────────────────────

#[test]
fn same_subnet_is_reflexive_and_commutative() {
    let addresses = ["192.168.1.10", "192.168.1.20", "10.0.0.5", "8.8.8.8", "192.168.2.1"];
    for a in addresses {
        assert!(is_same_subnet(a, a), "{a} should share a subnet with itself");
        for b in addresses {
            assert_eq!(is_same_subnet(a, b), is_same_subnet(b, a), "{a} vs {b}");
        }
    }
}

// ── Local segment ───────────────────────────────────────────────────

#[test]
fn linked_neighbours_reply_and_unlinked_time_out() {
    let mut ws = load(
        vec![
            node("1", "pc", "192.168.1.10", "", json!([])),
            node("2", "pc", "192.168.1.20", "", json!([])),
        ],
        vec![edge("1", "2")],
    );

    let outcome = ws.ping(&id("1"), "192.168.1.20");
    assert_eq!(
        outcome.message(),
        "Reply from 192.168.1.20: bytes=32 time<1ms TTL=64"
    );

    ws.disconnect(&"link-1-2".into()).unwrap();
    assert_eq!(
        ws.ping(&id("1"), "192.168.1.20"),
        PingOutcome::Timeout(TimeoutReason::NoConnection)
    );
}

#[test]
fn unknown_local_host_is_reported() {
    let ws = load(vec![node("1", "pc", "192.168.1.10", "", json!([]))], vec![]);
    assert_eq!(
        ws.ping(&id("1"), "192.168.1.99").message(),
        "Ping request could not find host 192.168.1.99."
    );
}

#[test]
fn loopback_succeeds_without_links() {
    let ws = load(
        vec![node("1", "pc", "10.0.0.5", "10.0.0.1", json!([]))],
        vec![],
    );
    assert!(ws.topology().links().is_empty());
    let outcome = ws.ping(&id("1"), "10.0.0.5");
    assert!(outcome.is_success());
    assert_eq!(outcome.message(), "Reply from 10.0.0.5: bytes=32 time<1ms TTL=64");
}

// ── Gateway path ────────────────────────────────────────────────────

#[test]
fn unlinked_gateway_is_disconnected_never_success() {
    let ws = load(
        vec![
            node("1", "pc", "10.0.0.5", "10.0.0.1", json!([])),
            node("2", "router", "10.0.0.1", "", json!([])),
        ],
        vec![],
    );
    for target in ["8.8.8.8", "1.1.1.1", "203.0.113.5"] {
        assert_eq!(
            ws.ping(&id("1"), target),
            PingOutcome::Timeout(TimeoutReason::GatewayDisconnected),
            "target {target}"
        );
    }
}

#[test]
fn missing_gateway_device_times_out() {
    let ws = load(
        vec![node("1", "pc", "10.0.0.5", "10.0.0.1", json!([]))],
        vec![],
    );
    assert_eq!(ws.ping(&id("1"), "8.8.8.8").message(), "Gateway timeout.");
}

#[test]
fn no_gateway_is_unreachable() {
    let ws = load(vec![node("1", "pc", "10.0.0.5", "", json!([]))], vec![]);
    assert_eq!(
        ws.ping(&id("1"), "8.8.8.8"),
        PingOutcome::Unreachable(UnreachableReason::NoGateway)
    );
}

#[test]
fn gateway_on_other_segment_is_a_config_error() {
    let ws = load(
        vec![node("1", "pc", "10.0.0.5", "10.0.1.1", json!([]))],
        vec![],
    );
    let outcome = ws.ping(&id("1"), "8.8.8.8");
    assert_eq!(outcome.kind(), OutcomeKind::ConfigError);
    assert_eq!(
        outcome.message(),
        "Config Error: Gateway (10.0.1.1) unreachable from 10.0.0.5."
    );
}

#[test]
fn routed_reply_names_gateway() {
    let ws = routed_lan(json!([]));
    assert_eq!(
        ws.ping(&id("1"), "8.8.8.8").message(),
        "Reply from 8.8.8.8: bytes=32 time=10ms TTL=54 (Routed via 192.168.1.1)"
    );
}

#[test]
fn router_reaches_foreign_subnets_itself() {
    let ws = routed_lan(json!([]));
    assert_eq!(
        ws.ping(&id("2"), "8.8.8.8").message(),
        "Reply from 8.8.8.8: bytes=32 time=5ms TTL=64"
    );
}

// ── Firewall ────────────────────────────────────────────────────────

#[test]
fn first_matching_rule_wins() {
    let drop_first = routed_lan(json!([
        { "id": 1, "src": "any", "dst": "203.0.113.5", "action": "DROP" },
        { "id": 2, "src": "any", "dst": "any", "action": "ACCEPT" },
    ]));
    assert_eq!(
        drop_first.ping(&id("1"), "203.0.113.5").message(),
        "Request timed out. (Packet filtered)"
    );
    assert!(drop_first.ping(&id("1"), "8.8.8.8").is_success());

    let accept_first = routed_lan(json!([
        { "id": 1, "src": "any", "dst": "any", "action": "ACCEPT" },
        { "id": 2, "src": "any", "dst": "203.0.113.5", "action": "DROP" },
    ]));
    assert!(accept_first.ping(&id("1"), "203.0.113.5").is_success());
}

#[test]
fn rules_added_through_workspace_take_effect() {
    let mut ws = routed_lan(json!([]));
    let router = id("2");
    let rule = ws
        .add_firewall_rule(&router, "192.168.1.10", "any", FirewallAction::Drop)
        .unwrap();
    assert_eq!(
        ws.ping(&id("1"), "8.8.8.8"),
        PingOutcome::Timeout(TimeoutReason::PacketFiltered { rule })
    );

    ws.delete_firewall_rule(&router, rule).unwrap();
    assert!(ws.ping(&id("1"), "8.8.8.8").is_success());
}

// ── Validation ──────────────────────────────────────────────────────

#[test]
fn address_validation_cases() {
    let err = validate_address("IP Address", "300.1.1.1", AddressOptions::HOST).unwrap_err();
    assert!(err.to_string().contains("300"), "{err}");
    assert!(err.to_string().contains("exceeds 255"), "{err}");

    assert!(validate_address("IP Address", "", AddressOptions::HOST).is_ok());
    assert!(validate_address("Source IP", "any", AddressOptions::RULE).is_ok());
    assert!(validate_address("IP Address", "any", AddressOptions::HOST).is_err());
}

#[test]
fn configuring_a_device_changes_reachability() {
    let mut ws = Workspace::new();
    let a = ws.add_device(DeviceType::Pc, None);
    let b = ws.add_device(DeviceType::Pc, None);
    ws.connect(&a, &b).unwrap();

    assert_eq!(ws.ping(&a, "192.168.1.20").message(), "Error: IP not configured.");

    for (dev, ip) in [(&a, "192.168.1.10"), (&b, "192.168.1.20")] {
        ws.configure_device(
            dev,
            DeviceSettings {
                ip: Some(ip.into()),
                ..DeviceSettings::default()
            },
        )
        .unwrap();
    }
    assert!(ws.ping(&a, "192.168.1.20").is_success());
    assert_eq!(ws.ping(&id("99"), "192.168.1.20").message(), "Error: Source missing.");
}

// ── Determinism ─────────────────────────────────────────────────────

#[test]
fn repeated_pings_are_identical() {
    let ws = routed_lan(json!([
        { "id": 1, "src": "any", "dst": "203.0.113.5", "action": "DROP" },
    ]));
    for target in ["192.168.1.1", "203.0.113.5", "8.8.8.8", "192.168.1.77"] {
        let first = ws.ping(&id("1"), target);
        for _ in 0..5 {
            assert_eq!(ws.ping(&id("1"), target), first, "target {target}");
        }
    }
}

#[test]
fn export_then_import_preserves_outcomes() {
    let ws = routed_lan(json!([
        { "id": 1, "src": "any", "dst": "203.0.113.5", "action": "DROP" },
    ]));
    let restored = Workspace::from_json(&ws.to_json().unwrap()).unwrap();
    for target in ["192.168.1.1", "203.0.113.5", "8.8.8.8"] {
        assert_eq!(restored.ping(&id("1"), target), ws.ping(&id("1"), target));
    }
}
