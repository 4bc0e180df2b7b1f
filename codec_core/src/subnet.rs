//! IPv4 CIDR arithmetic.
//!
//! Addresses are handled as big-endian `u32`s; [`Ipv4Addr`] is only used
//! for the dotted-quad text form.

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::error::{Result, ToolError};

const PLACEHOLDER: &str = "-";

/// Strict dotted-quad check: four groups of one to three digits, each at
/// most 255. Leading zeros are accepted (`010` is ten).
pub fn parse_ipv4(value: &str) -> Result<Ipv4Addr> {
    let trimmed = value.trim();
    let invalid = || ToolError::format(format!("invalid IPv4 address: {trimmed}"));
    let mut octets = [0u8; 4];
    let mut parts = trimmed.split('.');
    for slot in octets.iter_mut() {
        let part = parts.next().ok_or_else(invalid)?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        *slot = part.parse::<u8>().map_err(|_| invalid())?;
    }
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(Ipv4Addr::from(octets))
}

/// `len == 0` gives the all-zero mask; larger values are clamped to 32.
pub fn mask_from_prefix_length(len: u8) -> u32 {
    match len.min(32) {
        0 => 0,
        len => u32::MAX << (32 - u32::from(len)),
    }
}

/// Rejects masks whose one-bits are not a single leading run.
pub fn mask_to_prefix(mask: u32) -> Result<u8> {
    let prefix = mask.leading_ones();
    if mask.checked_shl(prefix).unwrap_or(0) != 0 {
        return Err(ToolError::format(format!(
            "invalid subnet mask: {}",
            Ipv4Addr::from(mask)
        )));
    }
    Ok(prefix as u8)
}

/// Accepts a prefix length (`24`, `/24`) or a dotted mask (`255.255.255.0`).
/// Empty input means `/0`; lengths above 32 are clamped.
pub fn parse_prefix(value: &str) -> Result<u8> {
    let trimmed = value.trim().trim_start_matches('/').trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    if trimmed.contains('.') {
        let mask = parse_ipv4(trimmed)
            .map_err(|_| ToolError::format(format!("invalid subnet mask: {trimmed}")))?;
        return mask_to_prefix(u32::from(mask));
    }
    if trimmed.len() > 3 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ToolError::format(format!("invalid prefix length: {trimmed}")));
    }
    let len: u16 = trimmed
        .parse()
        .map_err(|_| ToolError::format(format!("invalid prefix length: {trimmed}")))?;
    if len > 32 {
        tracing::debug!(len, "prefix length clamped to 32");
    }
    Ok(len.min(32) as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostRange {
    pub first: u32,
    pub last: u32,
    pub hosts: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subnet {
    address: u32,
    prefix: u8,
}

impl Subnet {
    pub fn new(address: Ipv4Addr, prefix: u8) -> Self {
        Self {
            address: u32::from(address),
            prefix: prefix.min(32),
        }
    }

    /// Parses `a.b.c.d/len` or `a.b.c.d/m.m.m.m`.
    pub fn parse(cidr: &str) -> Result<Self> {
        let trimmed = cidr.trim();
        let (ip, prefix) = trimmed
            .split_once('/')
            .ok_or_else(|| ToolError::format(format!("expected address/prefix, got {trimmed:?}")))?;
        if prefix.trim().is_empty() {
            return Err(ToolError::format("missing prefix length"));
        }
        Ok(Self::new(parse_ipv4(ip)?, parse_prefix(prefix)?))
    }

    /// Address and prefix given separately, as the two-field form does.
    pub fn from_parts(ip: &str, prefix: &str) -> Result<Self> {
        Ok(Self::new(parse_ipv4(ip)?, parse_prefix(prefix)?))
    }

    pub fn address(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.address)
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn mask(&self) -> u32 {
        mask_from_prefix_length(self.prefix)
    }

    pub fn wildcard(&self) -> u32 {
        !self.mask()
    }

    pub fn network(&self) -> u32 {
        self.address & self.mask()
    }

    pub fn broadcast(&self) -> u32 {
        self.network() | self.wildcard()
    }

    /// `/32` is the address alone, `/31` is a point-to-point pair, and any
    /// shorter prefix excludes the network and broadcast addresses.
    pub fn host_range(&self) -> HostRange {
        match self.prefix {
            32 => HostRange {
                first: self.address,
                last: self.address,
                hosts: 1,
            },
            31 => HostRange {
                first: self.network(),
                last: self.broadcast(),
                hosts: 2,
            },
            len => HostRange {
                first: self.network().wrapping_add(1),
                last: self.broadcast().wrapping_sub(1),
                hosts: (1u64 << (32 - u32::from(len))).saturating_sub(2),
            },
        }
    }

    pub fn summary(&self) -> SubnetSummary {
        let range = self.host_range();
        SubnetSummary {
            network: format!("{}/{}", Ipv4Addr::from(self.network()), self.prefix),
            mask: Ipv4Addr::from(self.mask()).to_string(),
            wildcard: Ipv4Addr::from(self.wildcard()).to_string(),
            broadcast: Ipv4Addr::from(self.broadcast()).to_string(),
            first_host: Ipv4Addr::from(range.first).to_string(),
            last_host: Ipv4Addr::from(range.last).to_string(),
            hosts: range.hosts.to_string(),
        }
    }
}

/// Display-ready calculator output.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetSummary {
    pub network: String,
    pub mask: String,
    pub wildcard: String,
    pub broadcast: String,
    pub first_host: String,
    pub last_host: String,
    pub hosts: String,
}

impl SubnetSummary {
    /// Shown in place of a result when the input does not parse.
    pub fn placeholder() -> Self {
        Self {
            network: PLACEHOLDER.into(),
            mask: PLACEHOLDER.into(),
            wildcard: PLACEHOLDER.into(),
            broadcast: PLACEHOLDER.into(),
            first_host: PLACEHOLDER.into(),
            last_host: PLACEHOLDER.into(),
            hosts: PLACEHOLDER.into(),
        }
    }
}

/// Uses `cidr` when it is non-blank, otherwise `ip` plus `prefix`.
pub fn calculate_subnet(cidr: &str, ip: &str, prefix: &str) -> Result<SubnetSummary> {
    let subnet = if cidr.trim().is_empty() {
        Subnet::from_parts(ip, prefix)?
    } else {
        Subnet::parse(cidr)?
    };
    Ok(subnet.summary())
}
