// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application configuration management.
//!
//! Persistent configuration in TOML format: feed selection, basemap,
//! refresh cadence, initial viewport, and overlay visibility. Every field
//! carries a serde default so configs written by older builds keep loading.

use serde::{Deserialize, Serialize};

/// USGS summary feed time windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FeedPreset {
    PastHour,
    PastDay,
    #[default]
    PastWeek,
    PastMonth,
}

impl FeedPreset {
    /// Endpoint for this time window.
    #[must_use]
    pub fn url(self) -> &'static str {
        match self {
            FeedPreset::PastHour => quake_feed::ALL_HOUR_URL,
            FeedPreset::PastDay => quake_feed::ALL_DAY_URL,
            FeedPreset::PastWeek => quake_feed::ALL_WEEK_URL,
            FeedPreset::PastMonth => quake_feed::ALL_MONTH_URL,
        }
    }

    /// Human-readable window name for UI display.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FeedPreset::PastHour => "Past Hour",
            FeedPreset::PastDay => "Past Day",
            FeedPreset::PastWeek => "Past Week",
            FeedPreset::PastMonth => "Past Month",
        }
    }
}

/// Basemap tile provider selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basemap {
    #[default]
    OpenStreetMap,
    CartoDark,
    CartoLight,
}

impl Basemap {
    /// Attribution line drawn on the map.
    #[must_use]
    pub fn attribution(self) -> &'static str {
        match self {
            Basemap::OpenStreetMap => "© OpenStreetMap contributors",
            Basemap::CartoDark | Basemap::CartoLight => {
                "© OpenStreetMap contributors, © CARTO"
            }
        }
    }

    /// Cache subdirectory name for this basemap's tiles.
    #[must_use]
    pub fn cache_name(self) -> &'static str {
        match self {
            Basemap::OpenStreetMap => "osm",
            Basemap::CartoDark => "carto_dark",
            Basemap::CartoLight => "carto_light",
        }
    }
}

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Feed time window
    #[serde(default)]
    pub feed: FeedPreset,

    /// Custom feed URL; takes precedence over the preset when set
    #[serde(default)]
    pub custom_feed_url: Option<String>,

    /// Seconds between feed refreshes (0 = load once)
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,

    /// Basemap tile provider
    #[serde(default)]
    pub basemap: Basemap,

    /// Initial map center latitude
    #[serde(default)]
    pub center_lat: f64,

    /// Initial map center longitude
    #[serde(default)]
    pub center_lon: f64,

    /// Initial map zoom level
    #[serde(default = "default_zoom")]
    pub zoom: f64,

    /// Show the depth legend overlay
    #[serde(default = "default_true")]
    pub show_legend: bool,

    /// Show the feed status window
    #[serde(default = "default_true")]
    pub show_status: bool,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_refresh_secs() -> u64 {
    300
}

fn default_zoom() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            feed: FeedPreset::default(),
            custom_feed_url: None,
            refresh_secs: default_refresh_secs(),
            basemap: Basemap::default(),
            center_lat: 0.0,
            center_lon: 0.0,
            zoom: default_zoom(),
            show_legend: true,
            show_status: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load("quakemap-desktop", "config")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store("quakemap-desktop", "config", self)
    }

    /// Get the config file path for display to user
    #[allow(dead_code)]
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path("quakemap-desktop", "config")
    }

    /// Effective feed URL: the custom URL when set, otherwise the preset.
    #[must_use]
    pub fn feed_url(&self) -> String {
        match &self.custom_feed_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => self.feed.url().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_feed_is_weekly() {
        let config = AppConfig::default();
        assert_eq!(config.feed, FeedPreset::PastWeek);
        assert_eq!(config.feed_url(), quake_feed::ALL_WEEK_URL);
    }

    #[test]
    fn test_custom_url_takes_precedence() {
        let config = AppConfig {
            custom_feed_url: Some("https://example.com/feed.geojson".to_string()),
            ..Default::default()
        };
        assert_eq!(config.feed_url(), "https://example.com/feed.geojson");
    }

    #[test]
    fn test_empty_custom_url_falls_back_to_preset() {
        let config = AppConfig {
            custom_feed_url: Some(String::new()),
            feed: FeedPreset::PastDay,
            ..Default::default()
        };
        assert_eq!(config.feed_url(), quake_feed::ALL_DAY_URL);
    }

    #[test]
    fn test_preset_urls() {
        assert!(FeedPreset::PastHour.url().ends_with("all_hour.geojson"));
        assert!(FeedPreset::PastMonth.url().ends_with("all_month.geojson"));
    }
}
