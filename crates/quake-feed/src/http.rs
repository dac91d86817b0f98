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

//! Async feed fetching with retry, backoff, and periodic refresh.
//!
//! One background task owns the HTTP side of the feed: it issues a GET with
//! a request timeout, retries transient failures with exponential backoff,
//! and re-fetches on a refresh interval. The feed URL can be changed at
//! runtime through a watch channel, and the whole loop shuts down through a
//! cancellation token.

use std::time::Duration;

use log::{error, info, warn};
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::catalog::QuakeCatalog;
use crate::geojson::{parse_feed, FeedError};

/// Configuration for feed fetching.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Feed URL to GET.
    pub url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Interval between successful loads. Zero disables refresh, giving a
    /// single one-shot load.
    pub refresh_interval: Duration,
    /// Retry attempts after the initial failure of one load.
    pub max_retries: u32,
    /// Backoff before the first retry; doubles per attempt.
    pub initial_backoff: Duration,
    /// Upper bound on the backoff delay.
    pub max_backoff: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: crate::ALL_WEEK_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            refresh_interval: Duration::from_secs(300),
            max_retries: 3,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(60),
        }
    }
}

/// Feed state, the user-visible side of the load lifecycle.
///
/// `Loaded` with an empty catalog is a valid outcome ("no earthquakes this
/// week") and is distinct from `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    /// No load attempted yet.
    Idle,
    /// A load (or retry) is in flight.
    Loading,
    /// The last load succeeded.
    Loaded,
    /// The last load failed after exhausting retries.
    Failed(String),
}

/// Events emitted by the fetch task.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Feed state changed.
    StateChanged(FeedState),
    /// A load completed; replaces any previous catalog wholesale.
    CatalogLoaded(QuakeCatalog),
}

/// Backoff delay before retry `attempt` (1-based): doubles per attempt,
/// capped at `max`.
fn backoff_delay(initial: Duration, max: Duration, attempt: u32) -> Duration {
    let doubled = initial.saturating_mul(1_u32.checked_shl(attempt - 1).unwrap_or(u32::MAX));
    doubled.min(max)
}

enum LoadOutcome {
    Loaded(QuakeCatalog),
    Failed(FeedError),
    UrlChanged,
    Cancelled,
}

pub(crate) async fn fetch_loop(
    config: FetchConfig,
    event_tx: mpsc::Sender<FeedEvent>,
    mut url_rx: watch::Receiver<String>,
    cancel_token: CancellationToken,
) {
    let client = match reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            let _ = event_tx
                .send(FeedEvent::StateChanged(FeedState::Failed(e.to_string())))
                .await;
            return;
        }
    };

    loop {
        if cancel_token.is_cancelled() {
            info!("Feed fetch cancelled");
            return;
        }

        let current_url = url_rx.borrow_and_update().clone();

        if event_tx
            .send(FeedEvent::StateChanged(FeedState::Loading))
            .await
            .is_err()
        {
            return; // Receiver dropped
        }

        info!("Loading earthquake feed from {}...", current_url);

        match load_with_retry(&client, &current_url, &config, &mut url_rx, &cancel_token).await {
            LoadOutcome::Loaded(catalog) => {
                info!("Feed loaded: {} earthquakes", catalog.len());
                if event_tx
                    .send(FeedEvent::StateChanged(FeedState::Loaded))
                    .await
                    .is_err()
                {
                    return;
                }
                if event_tx.send(FeedEvent::CatalogLoaded(catalog)).await.is_err() {
                    return;
                }
            }
            LoadOutcome::Failed(e) => {
                error!("Feed load failed: {}", e);
                let _ = event_tx
                    .send(FeedEvent::StateChanged(FeedState::Failed(e.to_string())))
                    .await;
            }
            LoadOutcome::UrlChanged => {
                info!("Feed URL changed, reloading immediately...");
                continue;
            }
            LoadOutcome::Cancelled => {
                info!("Feed fetch cancelled");
                return;
            }
        }

        if config.refresh_interval.is_zero() {
            // One-shot mode: stay alive only for URL changes.
            tokio::select! {
                changed = url_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    info!("Feed URL changed, reloading...");
                }
                () = cancel_token.cancelled() => {
                    return;
                }
            }
        } else {
            tokio::select! {
                () = sleep(config.refresh_interval) => {}
                changed = url_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    info!("Feed URL changed, reloading...");
                }
                () = cancel_token.cancelled() => {
                    return;
                }
            }
        }
    }
}

async fn load_with_retry(
    client: &reqwest::Client,
    url: &str,
    config: &FetchConfig,
    url_rx: &mut watch::Receiver<String>,
    cancel_token: &CancellationToken,
) -> LoadOutcome {
    let mut attempt: u32 = 0;

    loop {
        match load_once(client, url).await {
            Ok(catalog) => return LoadOutcome::Loaded(catalog),
            Err(e) => {
                if attempt >= config.max_retries {
                    return LoadOutcome::Failed(e);
                }
                attempt += 1;

                let delay =
                    backoff_delay(config.initial_backoff, config.max_backoff, attempt);
                warn!(
                    "Feed load failed ({}), retry {}/{} in {:?}...",
                    e, attempt, config.max_retries, delay
                );

                tokio::select! {
                    () = sleep(delay) => {}
                    changed = url_rx.changed() => {
                        if changed.is_err() {
                            return LoadOutcome::Cancelled;
                        }
                        return LoadOutcome::UrlChanged;
                    }
                    () = cancel_token.cancelled() => {
                        return LoadOutcome::Cancelled;
                    }
                }
            }
        }
    }
}

async fn load_once(client: &reqwest::Client, url: &str) -> Result<QuakeCatalog, FeedError> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let events = parse_feed(&body)?;
    Ok(QuakeCatalog::new(events))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let initial = Duration::from_secs(2);
        let max = Duration::from_secs(60);
        assert_eq!(backoff_delay(initial, max, 1), Duration::from_secs(2));
        assert_eq!(backoff_delay(initial, max, 2), Duration::from_secs(4));
        assert_eq!(backoff_delay(initial, max, 3), Duration::from_secs(8));
        assert_eq!(backoff_delay(initial, max, 4), Duration::from_secs(16));
    }

    #[test]
    fn test_backoff_is_capped() {
        let initial = Duration::from_secs(2);
        let max = Duration::from_secs(60);
        assert_eq!(backoff_delay(initial, max, 6), Duration::from_secs(60));
        assert_eq!(backoff_delay(initial, max, 32), Duration::from_secs(60));
    }

    #[test]
    fn test_default_config_targets_weekly_feed() {
        let config = FetchConfig::default();
        assert_eq!(config.url, crate::ALL_WEEK_URL);
        assert!(!config.refresh_interval.is_zero());
    }

    #[test]
    fn test_loaded_empty_is_not_failed() {
        // "No earthquakes this week" must stay distinguishable from a
        // failed load.
        let loaded = FeedState::Loaded;
        let failed = FeedState::Failed("boom".to_string());
        assert_ne!(loaded, failed);
    }
}
