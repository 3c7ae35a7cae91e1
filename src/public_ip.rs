//! Public IPv4 discovery through an HTTP echo service
//!
//! The service must answer with JSON `{"ip": "<IPv4>"}` (ipify's
//! `?format=json` shape).

use std::net::Ipv4Addr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::constants::USER_AGENT;
use crate::validation::parse_public_ipv4;

/// Source of the caller's current public IPv4 address
#[async_trait]
pub trait IpResolver: Send + Sync {
    async fn public_ipv4(&self) -> Result<Ipv4Addr>;
}

#[derive(Debug, Deserialize)]
struct EchoResponse {
    ip: String,
}

/// Extracts the address from an echo service body
pub fn parse_echo_response(body: &str) -> Result<Ipv4Addr> {
    let echo: EchoResponse =
        serde_json::from_str(body).context("IP service returned malformed JSON")?;
    parse_public_ipv4(&echo.ip)
}

/// Resolves the public address with a single GET, no retries
pub struct HttpIpResolver {
    url: String,
    client: reqwest::Client,
}

impl HttpIpResolver {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }
}

#[async_trait]
impl IpResolver for HttpIpResolver {
    async fn public_ipv4(&self) -> Result<Ipv4Addr> {
        debug!("GET {}", self.url);
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("IP service request failed")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("IP service returned HTTP {}", status.as_u16());
        }

        let body = resp.text().await.context("Failed to read IP service response")?;
        parse_echo_response(&body)
    }
}
