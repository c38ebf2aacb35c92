use serde::Deserialize;

/// Default base URL for organizational unit pages
pub const DEFAULT_UNIT_URL_PREFIX: &str =
    "https://www.campus.rwth-aachen.de/rwth/all/unit.asp?gguid=";

/// Default base URL for lecturer pages
pub const DEFAULT_LECTURER_URL_PREFIX: &str =
    "https://www.campus.rwth-aachen.de/rwth/all/lecturer.asp?gguid=";

/// Key of the Department of Computer Science unit
pub const DEFAULT_ROOT_KEY: &str = "0xE543C8C10685D51196700000F4B4937D";

/// Main configuration structure for Campus-Atlas
///
/// Every section is optional; missing sections fall back to the defaults
/// used for the computer science directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub source: SourceConfig,
    pub reference: ReferenceConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Upper bound on the number of items ever visited
    #[serde(rename = "max-items-to-visit")]
    pub max_items_to_visit: usize,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: usize,

    /// Total time allowed for a single request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Time allowed to establish a connection (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_items_to_visit: 1000,
            max_concurrent_fetches: 32,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Directory site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL that unit keys are appended to
    #[serde(rename = "unit-url-prefix")]
    pub unit_url_prefix: String,

    /// Base URL that lecturer keys are appended to
    #[serde(rename = "lecturer-url-prefix")]
    pub lecturer_url_prefix: String,

    /// Key of the unit the crawl starts from
    #[serde(rename = "root-key")]
    pub root_key: String,

    /// Display name of the root unit
    #[serde(rename = "root-name")]
    pub root_name: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            unit_url_prefix: DEFAULT_UNIT_URL_PREFIX.to_string(),
            lecturer_url_prefix: DEFAULT_LECTURER_URL_PREFIX.to_string(),
            root_key: DEFAULT_ROOT_KEY.to_string(),
            root_name: "Fachgruppe Informatik".to_string(),
        }
    }
}

/// Room reference table configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Optional TOML file replacing the embedded reference table
    pub path: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Optional path of a markdown listing of all stored places
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,

    /// Whether rooms from the reference table are stored as places too
    #[serde(rename = "include-reference-rooms")]
    pub include_reference_rooms: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./campus-atlas.db".to_string(),
            summary_path: None,
            include_reference_rooms: true,
        }
    }
}
