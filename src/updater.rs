//! Updater module for ipv4ddns
//!
//! One run: resolve the public IPv4 address, find the zone, find the A
//! record, and rewrite it only when its content differs. Every failure ends
//! the run with a logged [`RunOutcome`]; nothing is retried.

use std::fmt;
use std::net::Ipv4Addr;

use tracing::{debug, error, info, warn};

use crate::config::{normalize_name, Config, UpdateName};
use crate::constants::{APEX_RECORD_NAME, DNS_RECORD_TYPE_A};
use crate::dns_provider::{DnsProvider, DnsRecord, DnsZone, RecordUpdate};
use crate::public_ip::IpResolver;

//==============================================================================
// Outcome
//==============================================================================

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The IP-echo service failed; no DNS calls were made
    IpUnavailable,
    /// Listing zones failed
    ZoneLookupFailed,
    /// No zone matches the configured zone name
    ZoneNotFound,
    /// Fetching the zone or its records failed
    RecordLookupFailed,
    /// The zone has no A record with the configured name
    RecordNotFound,
    /// The record already points at the current address
    Unchanged { ip: Ipv4Addr },
    /// The record was rewritten
    Updated {
        record_id: String,
        previous: String,
        current: Ipv4Addr,
    },
    /// The update call was rejected or failed in transit
    UpdateFailed { record_id: String },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::IpUnavailable => write!(f, "public IP unavailable"),
            RunOutcome::ZoneLookupFailed => write!(f, "zone lookup failed"),
            RunOutcome::ZoneNotFound => write!(f, "zone not found"),
            RunOutcome::RecordLookupFailed => write!(f, "record lookup failed"),
            RunOutcome::RecordNotFound => write!(f, "record not found"),
            RunOutcome::Unchanged { ip } => write!(f, "unchanged ({})", ip),
            RunOutcome::Updated {
                record_id,
                previous,
                current,
            } => write!(f, "updated {} from {} to {}", record_id, previous, current),
            RunOutcome::UpdateFailed { record_id } => write!(f, "update of {} failed", record_id),
        }
    }
}

//==============================================================================
// Helpers
//==============================================================================

/// Redacts secrets from a log message
///
/// Every non-empty secret is replaced with `***REDACTED***`.
///
/// # Examples
///
/// ```
/// use ipv4ddns::updater::redact_secrets;
///
/// let redacted = redact_secrets("Bearer secret123 rejected", &["secret123"]);
/// assert_eq!(redacted, "Bearer ***REDACTED*** rejected");
/// ```
#[must_use]
pub fn redact_secrets(message: &str, secrets: &[&str]) -> String {
    let mut sanitized = message.to_string();
    for secret in secrets.iter().filter(|s| !s.is_empty()) {
        sanitized = sanitized.replace(secret, "***REDACTED***");
    }
    sanitized
}

/// Finds the first A record named `fqdn`, in provider order
///
/// Names are compared case-insensitively and without a trailing dot.
pub fn find_a_record<'a>(records: &'a [DnsRecord], fqdn: &str) -> Option<&'a DnsRecord> {
    let wanted = normalize_name(fqdn);
    records
        .iter()
        .find(|record| record.is_a_record() && normalize_name(&record.name) == wanted)
}

//==============================================================================
// Updater
//==============================================================================

/// Runs one check-and-update pass against a DNS provider
pub struct Updater<'a> {
    config: &'a Config,
    provider: &'a dyn DnsProvider,
    resolver: &'a dyn IpResolver,
}

impl<'a> Updater<'a> {
    pub fn new(
        config: &'a Config,
        provider: &'a dyn DnsProvider,
        resolver: &'a dyn IpResolver,
    ) -> Self {
        Self {
            config,
            provider,
            resolver,
        }
    }

    /// Performs a full run
    ///
    /// The public address is resolved before any provider call, so an
    /// unreachable echo service costs no API requests.
    pub async fn run(&self) -> RunOutcome {
        info!(
            "Checking {} in zone {}",
            self.config.record_fqdn(),
            self.config.zone_name
        );

        let ip = match self.resolver.public_ipv4().await {
            Ok(ip) => ip,
            Err(e) => {
                error!("Failed to retrieve IP address: {}", self.redact(&e));
                return RunOutcome::IpUnavailable;
            }
        };
        info!("Current IP: {}", ip);

        let zone = match self.lookup_zone().await {
            Ok(Some(zone)) => zone,
            Ok(None) => {
                warn!("No zone found matching {}", self.config.zone_name);
                return RunOutcome::ZoneNotFound;
            }
            Err(e) => {
                error!("Error fetching Cloudflare zones: {}", self.redact(&e));
                return RunOutcome::ZoneLookupFailed;
            }
        };
        info!("Zone ID: {}", zone.id);

        let record = match self.lookup_record(&zone.id).await {
            Ok(record) => record,
            Err(e) => {
                error!("Error fetching DNS record: {}", self.redact(&e));
                return RunOutcome::RecordLookupFailed;
            }
        };

        self.apply(&zone.id, ip, record.as_ref()).await
    }

    /// Returns the first zone the provider lists for the configured name
    pub async fn lookup_zone(&self) -> anyhow::Result<Option<DnsZone>> {
        debug!("Grabbing zone {}", self.config.zone_name);
        let zones = self.provider.list_zones(&self.config.zone_name).await?;
        if zones.len() > 1 {
            debug!(
                "{} zones match {}, using the first",
                zones.len(),
                self.config.zone_name
            );
        }
        Ok(zones.into_iter().next())
    }

    /// Returns the A record for the configured hostname, if the zone has one
    pub async fn lookup_record(&self, zone_id: &str) -> anyhow::Result<Option<DnsRecord>> {
        let zone = self.provider.get_zone(zone_id).await?;
        debug!("Confirmed zone {} ({})", zone.name, zone.id);

        let records = self.provider.list_records(zone_id).await?;
        debug!("Zone {} holds {} records", zone_id, records.len());

        let fqdn = self.config.record_fqdn();
        Ok(find_a_record(&records, &fqdn).cloned())
    }

    /// Rewrites the record when `ip` differs from its content
    ///
    /// Never creates a record: with no record this only logs.
    pub async fn apply(
        &self,
        zone_id: &str,
        ip: Ipv4Addr,
        record: Option<&DnsRecord>,
    ) -> RunOutcome {
        let Some(record) = record else {
            warn!("No A record found for {}", self.config.record_fqdn());
            return RunOutcome::RecordNotFound;
        };

        info!("Current IP {}, Domain IP {}", ip, record.content);
        if record.content.trim() == ip.to_string() {
            info!("No-op: {} already points at {}", record.name, ip);
            return RunOutcome::Unchanged { ip };
        }

        let update = self.build_update(record, ip);
        match self.provider.update_record(zone_id, &record.id, &update).await {
            Ok(updated) => {
                info!("DNS record updated successfully to {} ({})", ip, updated);
                RunOutcome::Updated {
                    record_id: record.id.clone(),
                    previous: record.content.clone(),
                    current: ip,
                }
            }
            Err(e) => {
                error!("Error updating DNS record: {}", self.redact(&e));
                RunOutcome::UpdateFailed {
                    record_id: record.id.clone(),
                }
            }
        }
    }

    fn build_update(&self, record: &DnsRecord, ip: Ipv4Addr) -> RecordUpdate {
        let name = match self.config.update_name {
            UpdateName::Record => record.name.clone(),
            UpdateName::Apex => APEX_RECORD_NAME.to_string(),
        };

        RecordUpdate {
            record_type: DNS_RECORD_TYPE_A.to_string(),
            name,
            content: ip.to_string(),
            ttl: self.config.ttl,
            proxied: record.proxied,
        }
    }

    fn redact(&self, err: &anyhow::Error) -> String {
        redact_secrets(&format!("{:#}", err), &[self.config.api_token.as_str()])
    }
}

//==============================================================================
// Tests
//==============================================================================
