//! Validation utilities for ipv4ddns
//!
//! This module provides validation functions for various inputs including
//! DNS zone names, DNS record names and IPv4 addresses.

use std::net::Ipv4Addr;

use anyhow::{anyhow, Result};

use crate::constants::{APEX_RECORD_NAME, MAX_LABEL_LENGTH, MAX_RECORD_NAME_LENGTH};

/// Validates that a string is a valid DNS record name
///
/// Follows RFC 1035 with the usual DNS provider conventions:
///
/// 1. **Length constraints**: at most 253 characters (excluding a trailing
///    dot), at most 63 characters per label.
/// 2. **Syntax rules**: labels separated by dots, no empty labels, no spaces,
///    labels cannot start or end with a hyphen.
/// 3. **Allowed characters**: letters, digits, `-`, `_`, and `*` as a complete
///    label.
/// 4. **Special cases**: `@` is the zone apex; a trailing dot is ignored.
///
/// # Examples
///
/// ```
/// use ipv4ddns::validation::validate_record_name;
///
/// assert!(validate_record_name("@").is_ok());
/// assert!(validate_record_name("home.example.com").is_ok());
/// assert!(validate_record_name("*.example.com").is_ok());
/// assert!(validate_record_name("example.com.").is_ok());
///
/// assert!(validate_record_name("").is_err());
/// assert!(validate_record_name("example..com").is_err());
/// assert!(validate_record_name("-example.com").is_err());
/// assert!(validate_record_name("ex@mple.com").is_err());
/// ```
pub fn validate_record_name(record_name: &str) -> Result<()> {
    let trimmed = record_name.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Record name cannot be empty"));
    }
    if trimmed == APEX_RECORD_NAME {
        return Ok(());
    }
    if trimmed.contains(' ') {
        return Err(anyhow!("Record name cannot contain spaces"));
    }

    let name = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if name.is_empty() {
        return Err(anyhow!("Record name cannot be empty"));
    }
    if name.len() > MAX_RECORD_NAME_LENGTH {
        return Err(anyhow!(
            "Record name too long (max {} characters, got {})",
            MAX_RECORD_NAME_LENGTH,
            name.len()
        ));
    }
    if name.starts_with('.') {
        return Err(anyhow!("Record name cannot start with a dot"));
    }
    if name.contains("..") {
        return Err(anyhow!("Record name cannot contain consecutive dots"));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(anyhow!("Record name contains empty label"));
        }
        if label == "*" {
            continue;
        }
        if label.len() > MAX_LABEL_LENGTH {
            return Err(anyhow!(
                "Record name label too long (max {} characters, got {})",
                MAX_LABEL_LENGTH,
                label.len()
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(anyhow!("Record name label cannot start or end with hyphen"));
        }
        for ch in label.chars() {
            if !ch.is_alphanumeric() && ch != '-' && ch != '_' {
                return Err(anyhow!(
                    "Record name contains invalid character: '{}' (allowed: letters, digits, '-', '_', or wildcard labels)",
                    ch
                ));
            }
        }
    }

    Ok(())
}

/// Validates a zone name such as `example.com`
///
/// Same label rules as [`validate_record_name`], but a zone is always a
/// concrete domain: the apex shorthand and wildcard labels are rejected, and
/// at least two labels are required.
pub fn validate_zone_name(zone_name: &str) -> Result<()> {
    let trimmed = zone_name.trim();
    if trimmed == APEX_RECORD_NAME {
        return Err(anyhow!("Zone name must be a domain, not '@'"));
    }
    if trimmed.split('.').any(|label| label == "*") {
        return Err(anyhow!("Zone name cannot contain wildcard labels"));
    }
    validate_record_name(trimmed).map_err(|e| anyhow!("Invalid zone name: {}", e))?;

    let name = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if !name.contains('.') {
        return Err(anyhow!("Zone name must have at least two labels, got: {}", name));
    }
    Ok(())
}

/// Returns `true` if the address may be published in a public A record
///
/// Rejects the ranges an IP-echo service should never report for a host on
/// the public internet:
/// - unspecified (`0.0.0.0`) and loopback (`127.0.0.0/8`)
/// - private (`10/8`, `172.16/12`, `192.168/16`) and shared CGNAT (`100.64/10`)
/// - link-local (`169.254/16`)
/// - documentation (`192.0.2/24`, `198.51.100/24`, `203.0.113/24`)
/// - multicast (`224/4`) and broadcast (`255.255.255.255`)
///
/// # Examples
///
/// ```
/// use std::net::Ipv4Addr;
/// use ipv4ddns::validation::is_public_ipv4;
///
/// assert!(is_public_ipv4(Ipv4Addr::new(1, 1, 1, 1)));
/// assert!(!is_public_ipv4(Ipv4Addr::new(192, 168, 1, 1)));
/// assert!(!is_public_ipv4(Ipv4Addr::LOCALHOST));
/// ```
pub fn is_public_ipv4(addr: Ipv4Addr) -> bool {
    if addr.is_unspecified() || addr.is_loopback() || addr.is_private() {
        return false;
    }
    if addr.is_link_local() || addr.is_documentation() {
        return false;
    }
    if addr.is_multicast() || addr.is_broadcast() {
        return false;
    }

    // Shared address space (100.64.0.0/10)
    let octets = addr.octets();
    if octets[0] == 100 && (octets[1] & 0xc0) == 64 {
        return false;
    }

    true
}

/// Parses a dotted-quad string into a publicly routable IPv4 address
pub fn parse_public_ipv4(value: &str) -> Result<Ipv4Addr> {
    let value = value.trim();
    let addr: Ipv4Addr = value
        .parse()
        .map_err(|_| anyhow!("Not an IPv4 address: '{}'", value))?;
    if !is_public_ipv4(addr) {
        return Err(anyhow!("Not a public IPv4 address: {}", addr));
    }
    Ok(addr)
}
