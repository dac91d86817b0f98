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

//! Client library for the USGS earthquake GeoJSON summary feeds.
//!
//! This library provides a modular, reusable architecture for fetching and
//! processing earthquake event data. It supports multiple layers that can
//! be used independently or composed together:
//!
//! - **Schema layer**: typed GeoJSON deserialization and per-feature
//!   validation into [`Earthquake`] records
//! - **Catalog layer**: immutable snapshots of one feed load
//! - **HTTP layer**: async fetching with timeout, retry with exponential
//!   backoff, periodic refresh, and URL hot-reload
//!
//! # Quick Start
//!
//! Use the [`Client`] type for full-stack operation:
//!
//! ```no_run
//! use quake_feed::{Client, FetchConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Client::spawn(FetchConfig {
//!         url: quake_feed::ALL_DAY_URL.to_string(),
//!         refresh_interval: Duration::from_secs(120),
//!         ..Default::default()
//!     });
//!
//!     // Polling approach
//!     loop {
//!         let catalog = client.catalog();
//!         for quake in catalog.events() {
//!             println!("M{:.1} {}", quake.magnitude, quake.place);
//!         }
//!         tokio::time::sleep(Duration::from_secs(5)).await;
//!     }
//! }
//! ```
//!
//! # Using Individual Layers
//!
//! The schema layer alone parses a feed body without any networking:
//!
//! ```
//! use quake_feed::geojson::parse_feed;
//!
//! let body = r#"{"type": "FeatureCollection", "features": []}"#;
//! let events = parse_feed(body).expect("valid feed document");
//! assert!(events.is_empty());
//! ```

pub mod catalog;
pub mod geojson;
pub mod http;

use std::sync::{Arc, RwLock};

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

pub use catalog::QuakeCatalog;
pub use geojson::{Earthquake, FeatureError, FeedError};
pub use http::{FeedEvent, FeedState, FetchConfig};

/// USGS summary feed: all earthquakes, past hour.
pub const ALL_HOUR_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_hour.geojson";

/// USGS summary feed: all earthquakes, past day.
pub const ALL_DAY_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson";

/// USGS summary feed: all earthquakes, past week. The default feed.
pub const ALL_WEEK_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// USGS summary feed: all earthquakes, past month.
pub const ALL_MONTH_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_month.geojson";

/// Full-stack feed client that wires all layers together.
///
/// The client runs the fetch loop in a background task and keeps the latest
/// state and catalog behind cheap polling accessors, which suits an
/// immediate-mode UI reading them every frame. Must be spawned inside a
/// tokio runtime context.
pub struct Client {
    state: Arc<RwLock<FeedState>>,
    catalog: Arc<RwLock<Arc<QuakeCatalog>>>,
    url_tx: watch::Sender<String>,
    cancel_token: CancellationToken,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("cancel_token", &self.cancel_token)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Spawn a new client with the given configuration.
    ///
    /// This starts background tasks for fetching and event processing.
    #[must_use]
    pub fn spawn(config: FetchConfig) -> Self {
        let (event_tx, mut event_rx) = mpsc::channel(16);
        let (url_tx, url_rx) = watch::channel(config.url.clone());
        let cancel_token = CancellationToken::new();

        let state = Arc::new(RwLock::new(FeedState::Idle));
        let catalog = Arc::new(RwLock::new(Arc::new(QuakeCatalog::empty())));

        tokio::spawn(http::fetch_loop(
            config,
            event_tx,
            url_rx,
            cancel_token.clone(),
        ));

        // Drain fetch events into the shared polling state.
        let state_clone = Arc::clone(&state);
        let catalog_clone = Arc::clone(&catalog);
        tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                match event {
                    FeedEvent::StateChanged(new_state) => {
                        if let Ok(mut s) = state_clone.write() {
                            *s = new_state;
                        }
                    }
                    FeedEvent::CatalogLoaded(new_catalog) => {
                        if let Ok(mut c) = catalog_clone.write() {
                            *c = Arc::new(new_catalog);
                        }
                    }
                }
            }
        });

        Self {
            state,
            catalog,
            url_tx,
            cancel_token,
        }
    }

    /// Get the current feed state.
    #[must_use]
    pub fn state(&self) -> FeedState {
        self.state
            .read()
            .map(|s| s.clone())
            .unwrap_or(FeedState::Idle)
    }

    /// Get the latest catalog snapshot (cheap `Arc` clone).
    #[must_use]
    pub fn catalog(&self) -> Arc<QuakeCatalog> {
        self.catalog
            .read()
            .map(|c| Arc::clone(&c))
            .unwrap_or_default()
    }

    /// Change the feed URL.
    ///
    /// The fetch loop reloads from the new URL immediately.
    pub fn set_url(&self, url: String) {
        let _ = self.url_tx.send(url);
    }

    /// Get the current feed URL.
    #[must_use]
    pub fn current_url(&self) -> String {
        self.url_tx.borrow().clone()
    }

    /// Shut down the client.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
