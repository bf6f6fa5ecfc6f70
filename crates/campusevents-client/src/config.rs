//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/campusevents/config.toml` by default. Every section and key is
//! optional:
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:5000/api"
//! timeout = 10
//!
//! [calendar]
//! base_url = "https://calendar.google.com/calendar/render"
//! open_in_browser = true
//!
//! [display]
//! max_title_length = 40
//!
//! [filters]
//! tab = "week"
//! category = "all"
//! sort = "popular"
//!
//! [notifications]
//! desktop = true
//!
//! [communities]
//! joined = ["comm-1", "comm-4"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use campusevents_api::{ApiConfig, FetchResult};
use campusevents_core::calendar::DEFAULT_CALENDAR_BASE_URL;
use campusevents_core::{CalendarLinkBuilder, CommunityDirectory, FormatOptions};

/// Configuration for the campusevents client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiSettings,

    pub calendar: CalendarSettings,

    pub display: DisplaySettings,

    /// Default filter criteria for `list`.
    pub filters: FilterSettings,

    pub notifications: NotificationSettings,

    pub communities: CommunitySettings,
}

/// Events API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the events API.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout: u64,

    /// Use the built-in sample catalog instead of the API.
    pub demo: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: ApiConfig::DEFAULT_BASE_URL.to_string(),
            timeout: ApiConfig::DEFAULT_TIMEOUT_SECS,
            demo: false,
        }
    }
}

/// Calendar deep link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Calendar service endpoint.
    pub base_url: String,

    /// Open links in the browser instead of only printing them.
    pub open_in_browser: bool,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CALENDAR_BASE_URL.to_string(),
            open_in_browser: true,
        }
    }
}

/// Display settings for output formatting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Maximum title length (truncated with ellipsis).
    pub max_title_length: Option<usize>,

    /// Include descriptions in event cards.
    pub show_description: bool,
}

/// Default filter criteria.
///
/// Values are parsed leniently: unknown tabs show everything and unknown
/// sort keys keep the API's order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub tab: String,
    pub category: String,
    pub sort: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            tab: "all".to_string(),
            category: "all".to_string(),
            sort: "newest".to_string(),
        }
    }
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Also send desktop notifications.
    pub desktop: bool,

    /// Desktop notification timeout in seconds.
    pub timeout_secs: u32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            desktop: false,
            timeout_secs: 5,
        }
    }
}

/// Community membership settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunitySettings {
    /// Joined community ids; the built-in defaults apply when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined: Option<Vec<String>>,
}

impl ClientConfig {
    /// Loads configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("campusevents")
    }

    /// Checks values that only fail at use time.
    pub fn validate(&self) -> Result<(), String> {
        self.api_config(None).map_err(|e| e.to_string())?;

        let calendar = url::Url::parse(&self.calendar.base_url)
            .map_err(|e| format!("invalid calendar base_url {:?}: {}", self.calendar.base_url, e))?;
        if !matches!(calendar.scheme(), "http" | "https") {
            return Err(format!(
                "calendar base_url must be http or https, got {:?}",
                calendar.scheme()
            ));
        }

        if self.api.timeout == 0 {
            return Err("api timeout must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Builds the events API configuration, preferring `override_url`.
    pub fn api_config(&self, override_url: Option<&str>) -> FetchResult<ApiConfig> {
        let base_url = override_url.unwrap_or(&self.api.base_url);
        Ok(ApiConfig::new(base_url)?.with_timeout(Duration::from_secs(self.api.timeout)))
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            max_title_length: self.display.max_title_length,
            show_description: self.display.show_description,
        }
    }

    pub fn calendar_builder(&self) -> CalendarLinkBuilder {
        CalendarLinkBuilder::new().with_base_url(&self.calendar.base_url)
    }

    pub fn community_directory(&self) -> CommunityDirectory {
        match self.communities.joined {
            Some(ref joined) => CommunityDirectory::builtin().with_joined(joined.iter().cloned()),
            None => CommunityDirectory::builtin(),
        }
    }
}
