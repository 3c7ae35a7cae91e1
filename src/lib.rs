//! ipv4ddns - one-shot IPv4 DDNS updater for Cloudflare
//!
//! Each run resolves the host's public IPv4 address and rewrites the
//! matching A record only when it differs. Scheduling is left to cron or a
//! systemd timer.

pub mod cloudflare;
pub mod config;
pub mod constants;
pub mod dns_provider;
pub mod public_ip;
pub mod updater;
pub mod validation;
