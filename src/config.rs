//! Configuration module for ipv4ddns
//!
//! This module handles loading and validating configuration from files and environment variables.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use zeroize::Zeroizing;

use crate::constants::{
    APEX_RECORD_NAME, DEFAULT_IP_SERVICE, DEFAULT_TIMEOUT_SECS, DEFAULT_TTL_SECS, DNS_TTL_AUTO,
    ENV_API_TOKEN, ENV_IP_SERVICE, ENV_RECORD_NAME, ENV_TTL, ENV_UPDATE_NAME, ENV_ZONE_NAME,
    MAX_TIMEOUT_SECS, MAX_TTL_SECS, MIN_API_TOKEN_LENGTH, MIN_TIMEOUT_SECS, MIN_TTL_SECS,
};
use crate::validation::{validate_record_name, validate_zone_name};

//==============================================================================
// Update name policy
//==============================================================================

/// Which `name` is written back when a record is updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateName {
    /// Send the matched record's own name (default)
    Record,
    /// Send `@`, renaming the record to the zone apex
    Apex,
}

/// Parses an update-name policy string
///
/// Accepted aliases:
/// - `Record`: "record", "name", "keep"
/// - `Apex`: "apex", "@", "root"
pub fn parse_update_name(value: &str) -> Result<UpdateName> {
    match value.trim().to_ascii_lowercase().as_str() {
        "record" | "name" | "keep" => Ok(UpdateName::Record),
        "apex" | "@" | "root" => Ok(UpdateName::Apex),
        _ => Err(anyhow::anyhow!(
            "Invalid update_name policy: '{}'. Use: record|apex",
            value
        )),
    }
}

//==============================================================================
// Config
//==============================================================================

/// Configuration for a single updater run
///
/// Built once in `main` and passed by reference to everything that needs it.
/// The API token is wrapped in `Zeroizing` so it is cleared from memory on
/// drop, and it never appears in `Debug` output.
///
/// # Configuration Loading Priority
///
/// 1. Environment variables (highest priority)
/// 2. Config file (path given with `--config`)
/// 3. Defaults (lowest priority)
#[derive(Clone)]
pub struct Config {
    /// Cloudflare API token with `Zone:Read` and `DNS:Edit` permissions
    pub api_token: Zeroizing<String>,
    /// Zone holding the record (e.g. "example.com")
    pub zone_name: String,
    /// Hostname of the A record to keep current
    ///
    /// Defaults to the zone name, i.e. the apex record.
    pub record_name: String,
    /// TTL written with every update
    ///
    /// Default: 60 seconds
    pub ttl: u32,
    /// Name sent in the update body
    ///
    /// Default: `UpdateName::Record`
    pub update_name: UpdateName,
    /// IP-echo endpoint
    pub ip_service: String,
    /// HTTP request timeout
    ///
    /// Default: 30 seconds
    pub timeout: Duration,
    /// Enable verbose logging
    pub verbose: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"***REDACTED***")
            .field("zone_name", &self.zone_name)
            .field("record_name", &self.record_name)
            .field("ttl", &self.ttl)
            .field("update_name", &self.update_name)
            .field("ip_service", &self.ip_service)
            .field("timeout", &self.timeout)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl Config {
    /// Loads configuration from file and environment variables
    ///
    /// # Environment Variables
    ///
    /// - `CLOUDFLARE_API_TOKEN` - Cloudflare API token
    /// - `ZONE_NAME` - zone name
    /// - `RECORD_NAME` - DNS record name
    /// - `DDNS_TTL` - TTL written on update
    /// - `DDNS_UPDATE_NAME` - update-name policy (record|apex)
    /// - `DDNS_IP_SERVICE` - IP-echo endpoint
    ///
    /// Empty values are ignored.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::load_from_file(config_path)?;
        Self::override_with_env(&mut config)?;
        if config.record_name.is_empty() {
            config.record_name = config.zone_name.clone();
        }
        Self::validate(&config)?;
        Ok(config)
    }

    /// Loads configuration from a TOML file, falling back to defaults
    fn load_from_file(config_path: Option<PathBuf>) -> Result<Self> {
        let mut toml_config = TomlConfig::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                toml_config =
                    toml::from_str(&content).with_context(|| "Failed to parse config file")?;
            }
        }

        let update_name = match toml_config.update_name.as_deref() {
            Some(v) => parse_update_name(v)?,
            None => UpdateName::Record,
        };

        Ok(Self {
            api_token: Zeroizing::new(toml_config.api_token.unwrap_or_default()),
            zone_name: toml_config.zone_name.unwrap_or_default(),
            record_name: toml_config.record_name.unwrap_or_default(),
            ttl: toml_config.ttl.unwrap_or(DEFAULT_TTL_SECS),
            update_name,
            ip_service: toml_config
                .ip_service
                .unwrap_or_else(|| DEFAULT_IP_SERVICE.to_string()),
            timeout: Duration::from_secs(toml_config.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            verbose: toml_config.verbose.unwrap_or(false),
        })
    }

    fn override_with_env(config: &mut Self) -> Result<()> {
        if let Some(v) = non_empty_env(ENV_API_TOKEN) {
            config.api_token = Zeroizing::new(v);
        }
        if let Some(v) = non_empty_env(ENV_ZONE_NAME) {
            config.zone_name = v;
        }
        if let Some(v) = non_empty_env(ENV_RECORD_NAME) {
            config.record_name = v;
        }
        if let Some(v) = non_empty_env(ENV_TTL) {
            config.ttl = v
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} value", ENV_TTL))?;
        }
        if let Some(v) = non_empty_env(ENV_UPDATE_NAME) {
            config.update_name = parse_update_name(&v)?;
        }
        if let Some(v) = non_empty_env(ENV_IP_SERVICE) {
            config.ip_service = v;
        }
        Ok(())
    }

    /// Ensures that all required fields are present and valid
    fn validate(&self) -> Result<()> {
        if self.api_token.as_str().is_empty() {
            return Err(anyhow::anyhow!("Missing {}", ENV_API_TOKEN));
        }
        if self.api_token.as_str().len() < MIN_API_TOKEN_LENGTH {
            return Err(anyhow::anyhow!(
                "{} is too short ({} chars, minimum {})",
                ENV_API_TOKEN,
                self.api_token.as_str().len(),
                MIN_API_TOKEN_LENGTH
            ));
        }
        if self.zone_name.is_empty() {
            return Err(anyhow::anyhow!("Missing {}", ENV_ZONE_NAME));
        }
        validate_zone_name(&self.zone_name)?;
        validate_record_name(&self.record_name)?;

        if self.ttl != DNS_TTL_AUTO && !(MIN_TTL_SECS..=MAX_TTL_SECS).contains(&self.ttl) {
            return Err(anyhow::anyhow!(
                "ttl must be {} (automatic) or between {} and {} seconds, got {}",
                DNS_TTL_AUTO,
                MIN_TTL_SECS,
                MAX_TTL_SECS,
                self.ttl
            ));
        }

        if !(self.ip_service.starts_with("https://") || self.ip_service.starts_with("http://")) {
            return Err(anyhow::anyhow!(
                "ip_service must be an http(s) URL, got: {}",
                self.ip_service
            ));
        }

        let timeout_secs = self.timeout.as_secs();
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&timeout_secs) {
            return Err(anyhow::anyhow!(
                "timeout must be between {} and {} seconds, got {}",
                MIN_TIMEOUT_SECS,
                MAX_TIMEOUT_SECS,
                timeout_secs
            ));
        }

        Ok(())
    }

    /// The hostname records are matched against
    ///
    /// `@` resolves to the zone name, and a name outside the zone is taken
    /// as relative to it (`home` becomes `home.example.com`). The result is
    /// lowercase without a trailing dot, the form Cloudflare reports record
    /// names in.
    pub fn record_fqdn(&self) -> String {
        let zone = normalize_name(&self.zone_name);
        if self.record_name.trim() == APEX_RECORD_NAME {
            return zone;
        }

        let name = normalize_name(&self.record_name);
        if name == zone || name.ends_with(&format!(".{}", zone)) {
            name
        } else {
            format!("{}.{}", name, zone)
        }
    }
}

/// Lowercases a DNS name and drops one trailing dot
pub fn normalize_name(name: &str) -> String {
    let name = name.trim();
    name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase()
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// TOML configuration file structure
#[derive(Debug, Default, serde::Deserialize)]
struct TomlConfig {
    api_token: Option<String>,
    zone_name: Option<String>,
    record_name: Option<String>,
    ttl: Option<u32>,
    update_name: Option<String>,
    ip_service: Option<String>,
    timeout: Option<u64>,
    verbose: Option<bool>,
}

//==============================================================================
// Tests
//==============================================================================
