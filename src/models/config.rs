//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Monitored pages
    #[serde(default = "defaults::sources")]
    pub sources: Vec<Source>,

    /// CSS selector schema for the monitored pages
    #[serde(default)]
    pub schema: PageSchema,

    /// Notification settings
    #[serde(default)]
    pub mail: MailConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AppError::Config(e.to_string()))?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Look up a source by key.
    pub fn source(&self, key: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.key == key)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.sources.is_empty() {
            return Err(AppError::validation("no sources defined"));
        }

        let mut keys = HashSet::new();
        for source in &self.sources {
            if source.key.trim().is_empty()
                || source.name.trim().is_empty()
                || source.url.trim().is_empty()
            {
                return Err(AppError::validation(
                    "source key, name, and url must all be set",
                ));
            }
            if !keys.insert(source.key.as_str()) {
                return Err(AppError::validation(format!(
                    "duplicate source key '{}'",
                    source.key
                )));
            }
        }

        self.schema.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            sources: defaults::sources(),
            schema: PageSchema::default(),
            mail: MailConfig::default(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// A monitored page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Stable identifier, used as the snapshot key
    pub key: String,

    /// Human-readable name used in notifications
    pub name: String,

    /// Page URL
    pub url: String,
}

/// CSS selector schema describing the structure of a monitored page.
///
/// The extractor treats the container as the structural marker: a missing
/// container means the page layout changed upstream, while a present but
/// empty container is a valid zero-entry page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSchema {
    /// Selector for the structural container
    #[serde(default = "defaults::container_selector")]
    pub container_selector: String,

    /// Selector for one content row within the container
    #[serde(default = "defaults::row_selector")]
    pub row_selector: String,

    /// Leading rows to skip (header rows)
    #[serde(default = "defaults::skip_rows")]
    pub skip_rows: usize,

    /// Selector for the cell holding the stable id
    #[serde(default = "defaults::id_selector")]
    pub id_selector: String,

    /// Selector for an anchor within the row; its resolved href becomes
    /// the reserved `link` field
    #[serde(default = "defaults::link_selector")]
    pub link_selector: Option<String>,

    /// Named field selectors, evaluated within each row
    #[serde(default = "defaults::field_selectors")]
    pub fields: Vec<FieldSelector>,
}

impl PageSchema {
    /// Validate selector strings for basic sanity.
    ///
    /// Selector syntax itself is checked when the extractor is built.
    pub fn validate(&self) -> Result<()> {
        if self.container_selector.trim().is_empty() {
            return Err(AppError::validation("schema.container_selector is empty"));
        }
        if self.row_selector.trim().is_empty() {
            return Err(AppError::validation("schema.row_selector is empty"));
        }
        if self.id_selector.trim().is_empty() {
            return Err(AppError::validation("schema.id_selector is empty"));
        }
        for field in &self.fields {
            if field.name.trim().is_empty() || field.selector.trim().is_empty() {
                return Err(AppError::validation(
                    "schema field name and selector must be set",
                ));
            }
            if field.name == "link" && self.link_selector.is_some() {
                return Err(AppError::validation(
                    "field name 'link' is reserved while schema.link_selector is set",
                ));
            }
        }
        Ok(())
    }
}

impl Default for PageSchema {
    fn default() -> Self {
        Self {
            container_selector: defaults::container_selector(),
            row_selector: defaults::row_selector(),
            skip_rows: defaults::skip_rows(),
            id_selector: defaults::id_selector(),
            link_selector: defaults::link_selector(),
            fields: defaults::field_selectors(),
        }
    }
}

/// A named field extracted from each row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSelector {
    /// Field name in the record
    pub name: String,

    /// CSS selector, evaluated within the row
    pub selector: String,
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Subject line prefix; the run date is appended
    #[serde(default = "defaults::subject")]
    pub subject: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            subject: defaults::subject(),
        }
    }
}

/// Mail parameters taken from the environment, consumed only by the
/// external mail collaborator handoff.
#[derive(Debug, Clone, Default)]
pub struct MailSettings {
    /// Sender account identifier (EMAIL_SENDER)
    pub sender: Option<String>,

    /// Recipient addresses (EMAIL_RECEIVERS, comma-separated)
    pub recipients: Vec<String>,

    /// Whether the sender credential (EMAIL_PASSWORD) is present.
    /// The credential itself stays in the environment for the external
    /// transport; it is never read into the payload.
    pub credential_set: bool,
}

impl MailSettings {
    /// Read mail settings from the process environment.
    pub fn from_env() -> Self {
        let sender = std::env::var("EMAIL_SENDER")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let credential_set = std::env::var("EMAIL_PASSWORD")
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false);

        let recipients = std::env::var("EMAIL_RECEIVERS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            sender,
            recipients,
            credential_set,
        }
    }
}

mod defaults {
    use super::{FieldSelector, Source};

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; curia-watch/1.0)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // The two CURIA case-law pages
    pub fn sources() -> Vec<Source> {
        vec![
            Source {
                key: "court_of_justice".to_string(),
                name: "Court of Justice".to_string(),
                url: "https://curia.europa.eu/en/content/juris/c2_juris.htm".to_string(),
            },
            Source {
                key: "general_court".to_string(),
                name: "General Court".to_string(),
                url: "https://curia.europa.eu/en/content/juris/t2_juris.htm".to_string(),
            },
        ]
    }

    // Schema defaults for the CURIA page layout: a single table whose rows
    // carry the case number in the first cell and a description in the second.
    pub fn container_selector() -> String {
        "table".into()
    }
    pub fn row_selector() -> String {
        "tr".into()
    }
    pub fn skip_rows() -> usize {
        1
    }
    pub fn id_selector() -> String {
        "td:nth-child(1)".into()
    }
    pub fn link_selector() -> Option<String> {
        Some("a".into())
    }
    pub fn field_selectors() -> Vec<FieldSelector> {
        vec![FieldSelector {
            name: "description".to_string(),
            selector: "td:nth-child(2)".to_string(),
        }]
    }

    pub fn subject() -> String {
        "CURIA Website Update Alert".into()
    }
}
