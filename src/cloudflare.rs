//! Cloudflare API client for DNS operations
//!
//! Uses reqwest with rustls for HTTP requests.

use std::fmt;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use urlencoding::encode;
use zeroize::Zeroizing;

use crate::constants::{
    CLOUDFLARE_API_BASE, HTTP_STATUS_FORBIDDEN, HTTP_STATUS_TOO_MANY_REQUESTS,
    HTTP_STATUS_UNAUTHORIZED, MAX_RECORD_PAGES, RECORDS_PER_PAGE, USER_AGENT,
};
use crate::dns_provider::{DnsProvider, DnsRecord, DnsZone, RecordUpdate};

//==============================================================================
// Types
//==============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiError>,
    result: Option<T>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiError {
    code: u64,
    message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    total_pages: Option<u32>,
}

impl ResultInfo {
    /// Whether pages remain after `page` (1-based)
    fn has_page_after(&self, page: u32) -> bool {
        matches!(self.total_pages, Some(total) if page < total)
    }
}

/// Maps the statuses that carry no usable envelope (edge errors often come
/// back as HTML) to errors before the body is decoded
fn check_status(status: StatusCode, action: &str) -> Result<()> {
    let code = status.as_u16();
    if code == HTTP_STATUS_UNAUTHORIZED || code == HTTP_STATUS_FORBIDDEN {
        bail!("{} rejected: authentication failed ({})", action, code);
    }
    if code == HTTP_STATUS_TOO_MANY_REQUESTS {
        bail!("Rate limited by Cloudflare");
    }
    if status.is_server_error() {
        bail!("Cloudflare server error: {}", code);
    }
    Ok(())
}

/// Turns a Cloudflare envelope into its result, or into an error describing
/// why the call failed
fn check_response<T>(
    status: StatusCode,
    body: ApiResponse<T>,
    action: &str,
) -> Result<ApiResponse<T>> {
    check_status(status, action)?;
    if body.success && status.is_success() {
        return Ok(body);
    }

    let errors = body
        .errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if errors.is_empty() {
        bail!("{} failed: HTTP {}", action, status.as_u16());
    }
    bail!("{} failed: {}", action, errors)
}

//==============================================================================
// Client
//==============================================================================

pub struct CloudflareClient {
    api_token: Zeroizing<String>,
    api_base: String,
    client: reqwest::Client,
}

impl CloudflareClient {
    pub fn new(api_token: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            api_token: Zeroizing::new(api_token.to_string()),
            api_base: CLOUDFLARE_API_BASE.to_string(),
            client,
        })
    }

    /// Points the client at another API root (a proxy or a local test server)
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Sends an authenticated request and decodes the Cloudflare envelope
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> Result<ApiResponse<T>> {
        let resp = request
            .bearer_auth(self.api_token.as_str())
            .send()
            .await
            .with_context(|| format!("{} request failed", action))?;
        let status = resp.status();
        check_status(status, action)?;
        let body: ApiResponse<T> = resp
            .json()
            .await
            .with_context(|| {
                format!("Failed to parse {} response (HTTP {})", action, status.as_u16())
            })?;
        check_response(status, body, action)
    }
}

#[async_trait]
impl DnsProvider for CloudflareClient {
    async fn list_zones(&self, name: &str) -> Result<Vec<DnsZone>> {
        let url = format!("{}/zones?name={}", self.api_base, encode(name));

        debug!("GET {}", url);
        let body: ApiResponse<Vec<DnsZone>> = self.send(self.client.get(&url), "Zone list").await?;
        Ok(body.result.unwrap_or_default())
    }

    async fn get_zone(&self, zone_id: &str) -> Result<DnsZone> {
        let url = format!("{}/zones/{}", self.api_base, encode(zone_id));

        debug!("GET {}", url);
        let body: ApiResponse<DnsZone> = self.send(self.client.get(&url), "Zone fetch").await?;
        body.result.context("API returned success but no zone")
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        let mut records = Vec::new();

        for page in 1..=MAX_RECORD_PAGES {
            let url = format!(
                "{}/zones/{}/dns_records?page={}&per_page={}",
                self.api_base,
                encode(zone_id),
                page,
                RECORDS_PER_PAGE
            );

            debug!("GET {}", url);
            let body: ApiResponse<Vec<DnsRecord>> =
                self.send(self.client.get(&url), "Record list").await?;
            let batch = body.result.unwrap_or_default();
            let more = !batch.is_empty()
                && body
                    .result_info
                    .is_some_and(|info| info.has_page_after(page));
            records.extend(batch);

            if !more {
                return Ok(records);
            }
        }

        bail!("Record list exceeded {} pages", MAX_RECORD_PAGES)
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<DnsRecord> {
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            self.api_base,
            encode(zone_id),
            encode(record_id)
        );

        debug!("PUT {}", url);
        let body: ApiResponse<DnsRecord> = self
            .send(self.client.put(&url).json(update), "Record update")
            .await?;
        body.result.context("API returned success but no result")
    }
}

//==============================================================================
// Tests
//==============================================================================
