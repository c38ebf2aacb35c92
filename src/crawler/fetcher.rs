//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with user agent and timeouts
//! - Building item URLs from the configured prefixes
//! - GET requests for directory pages
//! - Decoding the site's Latin-1 page bodies
//! - Error classification

use crate::config::{CrawlerConfig, SourceConfig, UserAgentConfig};
use crate::state::{ItemKey, ItemType};
use encoding_rs::WINDOWS_1252;
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched and decoded the page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Decoded page body
        body: String,
    },

    /// The response body could not be decoded as Latin-1 text
    Undecodable {
        /// HTTP status code
        status_code: u16,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request ran into the configured timeout
        timed_out: bool,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `crawler` - Timeouts for requests and connections
/// * `user_agent` - The user agent configuration
///
/// # Example
///
/// ```no_run
/// use campus_atlas::config::{CrawlerConfig, UserAgentConfig};
/// use campus_atlas::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the page URL of an item
///
/// The key string is appended verbatim to the prefix for the item's type.
pub fn item_url(key: &ItemKey, source: &SourceConfig) -> String {
    let prefix = match key.item_type() {
        ItemType::Unit => &source.unit_url_prefix,
        ItemType::Lecturer => &source.lecturer_url_prefix,
    };
    format!("{}{}", prefix, key.key_string())
}

/// Fetches a directory page
///
/// # Error Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx, decodable body | Success |
/// | 2xx, undecodable body | Undecodable |
/// | Any other status | HttpError |
/// | Timeout | NetworkError (timed_out) |
/// | Connection or body read failure | NetworkError |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return network_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => return network_error(e),
    };

    match decode_latin1(&bytes) {
        Some(body) => FetchResult::Success {
            status_code: status.as_u16(),
            body,
        },
        None => FetchResult::Undecodable {
            status_code: status.as_u16(),
        },
    }
}

/// Decodes a page body served in a single-byte Latin-1 compatible encoding
///
/// Uses the WHATWG `windows-1252` decoder, which is what browsers apply to
/// pages labelled `iso-8859-1`. Returns `None` for malformed input.
pub fn decode_latin1(bytes: &[u8]) -> Option<String> {
    WINDOWS_1252
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

fn network_error(e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: "Connection refused".to_string(),
            timed_out: false,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            timed_out: false,
        }
    }
}
