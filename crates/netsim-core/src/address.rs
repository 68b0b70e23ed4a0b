// ── Dotted-quad address utilities ──
//
// Addresses stay textual throughout the model: the exchange format stores
// them as strings and rule matching compares them verbatim. These helpers
// answer the two questions the rest of the crate asks about them.

use thiserror::Error;

use crate::model::DeviceId;

/// Literal accepted in firewall rule endpoints to match every address.
pub const ANY: &str = "any";

/// Netmask stored on freshly configured devices.
///
/// Decorative: subnet membership is always computed as a fixed /24.
pub const DEFAULT_NETMASK: &str = "255.255.255.0";

/// Rejected address input, naming the field it was entered in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid {field} format (e.g. 192.168.1.1)")]
    Format { field: String, value: String },

    #[error("Invalid {field}: Value {value} exceeds 255")]
    OctetOutOfRange { field: String, value: u16 },

    #[error("{field} cannot be empty")]
    Empty { field: String },

    #[error("{field} {value} is already assigned to device {owner}")]
    DuplicateAddress {
        field: String,
        value: String,
        owner: DeviceId,
    },
}

impl ValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &str {
        match self {
            Self::Format { field, .. }
            | Self::OctetOutOfRange { field, .. }
            | Self::Empty { field }
            | Self::DuplicateAddress { field, .. } => field,
        }
    }
}

/// What a field accepts beyond plain dotted-quads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressOptions {
    pub allow_any: bool,
}

impl AddressOptions {
    /// Device addressing fields: ip, netmask, gateway.
    pub const HOST: Self = Self { allow_any: false };
    /// Firewall rule endpoints, where `any` is a wildcard.
    pub const RULE: Self = Self { allow_any: true };
}

/// Syntactic check of one address field.
///
/// The empty string is valid (the field is unset), `any` is valid when the
/// options allow it, anything else must be four dot-separated groups of one
/// to three digits, each no greater than 255.
pub fn validate_address(
    field: &str,
    value: &str,
    options: AddressOptions,
) -> Result<(), ValidationError> {
    if value.is_empty() || (options.allow_any && value == ANY) {
        return Ok(());
    }

    let octets = parse_octets(value).ok_or_else(|| ValidationError::Format {
        field: field.into(),
        value: value.into(),
    })?;

    match octets.into_iter().find(|o| *o > 255) {
        Some(value) => Err(ValidationError::OctetOutOfRange {
            field: field.into(),
            value,
        }),
        None => Ok(()),
    }
}

/// Boolean form of [`validate_address`].
pub fn is_valid_address(value: &str, options: AddressOptions) -> bool {
    validate_address("address", value, options).is_ok()
}

/// Simulated subnet membership: both addresses split into exactly four
/// dot-separated parts and the first three parts are textually equal,
/// whatever netmask is configured.
///
/// The parts are not range-checked, so `192.168.1.300` sits on the
/// `192.168.1` segment and resolves to no device there.
pub fn is_same_subnet(a: &str, b: &str) -> bool {
    match (dotted_parts(a), dotted_parts(b)) {
        (Some(a), Some(b)) => a[..3] == b[..3],
        _ => false,
    }
}

fn dotted_parts(value: &str) -> Option<[&str; 4]> {
    let mut parts = value.split('.');
    let quad = [parts.next()?, parts.next()?, parts.next()?, parts.next()?];
    (!value.is_empty() && parts.next().is_none()).then_some(quad)
}

/// Split into four groups of 1-3 ASCII digits. Range is not checked here.
fn parse_octets(value: &str) -> Option<[u16; 4]> {
    let mut octets = [0u16; 4];
    let mut parts = value.split('.');

    for slot in &mut octets {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }

    if parts.next().is_some() {
        return None;
    }
    Some(octets)
}
