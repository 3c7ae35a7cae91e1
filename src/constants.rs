//! Common constants used throughout the ipv4ddns application

//==============================================================================
// Cloudflare API Constants
//==============================================================================

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// User agent string for outbound requests
pub const USER_AGENT: &str = "ipv4ddns/1.0";

/// DNS record type for IPv4 addresses
pub const DNS_RECORD_TYPE_A: &str = "A";

/// Record name Cloudflare understands as the zone apex
pub const APEX_RECORD_NAME: &str = "@";

/// Page size used when listing DNS records
pub const RECORDS_PER_PAGE: u32 = 100;

/// Upper bound on record-list pages fetched in one run
pub const MAX_RECORD_PAGES: u32 = 100;

//==============================================================================
// HTTP Status Codes
//==============================================================================

/// HTTP status code for unauthorized requests (401)
pub const HTTP_STATUS_UNAUTHORIZED: u16 = 401;

/// HTTP status code for forbidden requests (403)
pub const HTTP_STATUS_FORBIDDEN: u16 = 403;

/// HTTP status code for rate limiting (429)
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;

//==============================================================================
// IP Echo Service
//==============================================================================

/// Default IP-echo endpoint, answers `{"ip": "<IPv4>"}`
pub const DEFAULT_IP_SERVICE: &str = "https://api.ipify.org?format=json";

//==============================================================================
// TTL Constants
//==============================================================================

/// TTL written on every update unless configured otherwise
pub const DEFAULT_TTL_SECS: u32 = 60;

/// Cloudflare's "automatic" TTL
pub const DNS_TTL_AUTO: u32 = 1;

/// Smallest explicit TTL Cloudflare accepts
pub const MIN_TTL_SECS: u32 = 60;

/// Largest explicit TTL Cloudflare accepts
pub const MAX_TTL_SECS: u32 = 86400;

//==============================================================================
// Timeout Constants
//==============================================================================

/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Minimum HTTP request timeout in seconds
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Maximum HTTP request timeout in seconds
pub const MAX_TIMEOUT_SECS: u64 = 300;

//==============================================================================
// Validation Constants
//==============================================================================

/// Minimum API token length in characters
pub const MIN_API_TOKEN_LENGTH: usize = 32;

/// Maximum DNS record name length in characters
pub const MAX_RECORD_NAME_LENGTH: usize = 253;

/// Maximum DNS label length in characters
pub const MAX_LABEL_LENGTH: usize = 63;

//==============================================================================
// Environment Variable Names
//==============================================================================

/// Environment variable name for Cloudflare API token
pub const ENV_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";

/// Environment variable name for the zone name
pub const ENV_ZONE_NAME: &str = "ZONE_NAME";

/// Environment variable name for DNS record name
pub const ENV_RECORD_NAME: &str = "RECORD_NAME";

/// Environment variable name for the TTL written on update
pub const ENV_TTL: &str = "DDNS_TTL";

/// Environment variable name for the update-name policy
pub const ENV_UPDATE_NAME: &str = "DDNS_UPDATE_NAME";

/// Environment variable name for the IP-echo endpoint
pub const ENV_IP_SERVICE: &str = "DDNS_IP_SERVICE";
