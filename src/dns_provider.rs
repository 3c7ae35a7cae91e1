//! DNS provider abstraction layer
//!
//! This module defines the operations the updater needs from a DNS provider:
//! zone lookup by name, zone fetch by ID, record listing and record update.
//! Cloudflare is the only implementation; tests use in-memory fakes.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::DNS_RECORD_TYPE_A;

//==============================================================================
// Types
//==============================================================================

/// A DNS zone as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsZone {
    /// Opaque provider identifier
    pub id: String,
    /// Domain name of the zone (e.g. "example.com")
    pub name: String,
}

/// Represents a DNS record from the provider
///
/// Only the fields the updater reads are modelled; everything else the
/// provider returns is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// The unique identifier for this DNS record
    pub id: String,
    /// The type of DNS record (e.g., "A" for IPv4)
    #[serde(rename = "type")]
    pub record_type: String,
    /// The fully qualified name for this record
    pub name: String,
    /// The IP address or other content of the record
    #[serde(default)]
    pub content: String,
    /// Whether proxy is enabled for this record (provider-specific)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
    /// Time-to-live value in seconds
    pub ttl: u32,
}

impl DnsRecord {
    /// True for A records
    pub fn is_a_record(&self) -> bool {
        self.record_type.eq_ignore_ascii_case(DNS_RECORD_TYPE_A)
    }
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DNS {} {} -> {} (TTL: {})",
            self.record_type, self.name, self.content, self.ttl
        )
    }
}

/// Body of a record update call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordUpdate {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    /// Carried over from the existing record so an overwrite keeps the flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

//==============================================================================
// Trait
//==============================================================================

/// DNS provider trait for reading zones and rewriting records
///
/// None of these operations create anything at the provider: the updater only
/// ever rewrites an existing record.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Lists zones whose name matches `name`, in provider order
    async fn list_zones(&self, name: &str) -> anyhow::Result<Vec<DnsZone>>;

    /// Fetches a single zone by its identifier
    async fn get_zone(&self, zone_id: &str) -> anyhow::Result<DnsZone>;

    /// Lists every DNS record in a zone, in provider order
    ///
    /// Implementations must follow pagination so the caller sees the whole
    /// zone.
    async fn list_records(&self, zone_id: &str) -> anyhow::Result<Vec<DnsRecord>>;

    /// Overwrites an existing record
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The HTTP request fails
    /// - The API returns an error response
    /// - Rate limit is exceeded
    /// - Server error occurs
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> anyhow::Result<DnsRecord>;
}

//==============================================================================
// Tests
//==============================================================================
