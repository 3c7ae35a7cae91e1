//! In-memory test doubles for the updater integration tests

#![allow(dead_code)]

pub mod server;

use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use zeroize::Zeroizing;

use ipv4ddns::config::{Config, UpdateName};
use ipv4ddns::dns_provider::{DnsProvider, DnsRecord, DnsZone, RecordUpdate};
use ipv4ddns::public_ip::IpResolver;

pub const TOKEN: &str = "test_token_0123456789012345678901234567";

pub fn test_config(record_name: &str, update_name: UpdateName) -> Config {
    Config {
        api_token: Zeroizing::new(TOKEN.to_string()),
        zone_name: "example.com".to_string(),
        record_name: record_name.to_string(),
        ttl: 60,
        update_name,
        ip_service: "https://api.ipify.org?format=json".to_string(),
        timeout: Duration::from_secs(5),
        verbose: false,
    }
}

pub fn zone(id: &str, name: &str) -> DnsZone {
    DnsZone {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn record(id: &str, record_type: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        record_type: record_type.to_string(),
        name: name.to_string(),
        content: content.to_string(),
        proxied: None,
        ttl: 300,
    }
}

/// A recorded update call: (zone id, record id, body)
pub type UpdateCall = (String, String, RecordUpdate);

/// A DnsProvider that serves fixed zones and records and tracks calls
#[derive(Default)]
pub struct FakeProvider {
    zones: Vec<DnsZone>,
    records: Vec<DnsRecord>,
    fail_zone_list: bool,
    fail_record_list: bool,
    fail_update: Option<String>,
    calls: Mutex<Vec<&'static str>>,
    updates: Mutex<Vec<UpdateCall>>,
}

impl FakeProvider {
    pub fn new(zones: Vec<DnsZone>, records: Vec<DnsRecord>) -> Self {
        Self {
            zones,
            records,
            ..Default::default()
        }
    }

    pub fn failing_zone_list(mut self) -> Self {
        self.fail_zone_list = true;
        self
    }

    pub fn failing_record_list(mut self) -> Self {
        self.fail_record_list = true;
        self
    }

    pub fn failing_update(mut self, message: &str) -> Self {
        self.fail_update = Some(message.to_string());
        self
    }

    /// Names of the trait methods called, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| **c == method).count()
    }

    pub fn updates(&self) -> Vec<UpdateCall> {
        self.updates.lock().unwrap().clone()
    }

    fn track(&self, method: &'static str) {
        self.calls.lock().unwrap().push(method);
    }
}

#[async_trait]
impl DnsProvider for FakeProvider {
    async fn list_zones(&self, name: &str) -> Result<Vec<DnsZone>> {
        self.track("list_zones");
        if self.fail_zone_list {
            return Err(anyhow!("Cloudflare server error: 503"));
        }
        Ok(self
            .zones
            .iter()
            .filter(|z| z.name == name)
            .cloned()
            .collect())
    }

    async fn get_zone(&self, zone_id: &str) -> Result<DnsZone> {
        self.track("get_zone");
        self.zones
            .iter()
            .find(|z| z.id == zone_id)
            .cloned()
            .ok_or_else(|| anyhow!("Zone fetch failed: [7003] Could not route"))
    }

    async fn list_records(&self, _zone_id: &str) -> Result<Vec<DnsRecord>> {
        self.track("list_records");
        if self.fail_record_list {
            return Err(anyhow!("Rate limited by Cloudflare"));
        }
        Ok(self.records.clone())
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<DnsRecord> {
        self.track("update_record");
        self.updates.lock().unwrap().push((
            zone_id.to_string(),
            record_id.to_string(),
            update.clone(),
        ));
        if let Some(message) = &self.fail_update {
            return Err(anyhow!("{}", message));
        }
        Ok(DnsRecord {
            id: record_id.to_string(),
            record_type: update.record_type.clone(),
            name: update.name.clone(),
            content: update.content.clone(),
            proxied: update.proxied,
            ttl: update.ttl,
        })
    }
}

/// An IpResolver returning a fixed answer
pub struct FakeResolver {
    ip: Option<Ipv4Addr>,
    calls: AtomicUsize,
}

impl FakeResolver {
    pub fn returning(ip: Ipv4Addr) -> Self {
        Self {
            ip: Some(ip),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            ip: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpResolver for FakeResolver {
    async fn public_ipv4(&self) -> Result<Ipv4Addr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.ip
            .ok_or_else(|| anyhow!("IP service request failed: connection refused"))
    }
}
