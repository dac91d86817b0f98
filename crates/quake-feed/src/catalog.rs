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

//! Catalog layer: the immutable result of one feed load.
//!
//! Unlike a live tracker there is no merging, staleness cleanup, or
//! per-entry update path — each refresh replaces the catalog wholesale.

use chrono::{DateTime, Utc};

use crate::geojson::Earthquake;

/// One snapshot of the earthquake feed.
#[derive(Debug, Clone, Default)]
pub struct QuakeCatalog {
    events: Vec<Earthquake>,
    loaded_at: Option<DateTime<Utc>>,
}

impl QuakeCatalog {
    /// Build a catalog from validated events, stamped with the load time.
    #[must_use]
    pub fn new(events: Vec<Earthquake>) -> Self {
        Self {
            events,
            loaded_at: Some(Utc::now()),
        }
    }

    /// Empty catalog, used before the first load completes.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Events in feed order.
    #[must_use]
    pub fn events(&self) -> &[Earthquake] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// When this snapshot was loaded; `None` for the pre-load empty catalog.
    #[must_use]
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Look up an event by its USGS id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Earthquake> {
        self.events.iter().find(|e| e.id == id)
    }

    /// The highest-magnitude event in the snapshot.
    #[must_use]
    pub fn strongest(&self) -> Option<&Earthquake> {
        self.events
            .iter()
            .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
    }

    /// Events sorted strongest-first, for list display.
    #[must_use]
    pub fn by_magnitude_desc(&self) -> Vec<&Earthquake> {
        let mut sorted: Vec<&Earthquake> = self.events.iter().collect();
        sorted.sort_unstable_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quake(id: &str, magnitude: f64) -> Earthquake {
        Earthquake {
            id: id.to_string(),
            place: format!("near {id}"),
            magnitude,
            latitude: 0.0,
            longitude: 0.0,
            depth_km: 10.0,
            time: None,
            url: None,
        }
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = QuakeCatalog::empty();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert!(catalog.loaded_at().is_none());
        assert!(catalog.strongest().is_none());
    }

    #[test]
    fn test_loaded_catalog_is_stamped() {
        let catalog = QuakeCatalog::new(vec![quake("a", 1.0)]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.loaded_at().is_some());
    }

    #[test]
    fn test_events_keep_feed_order() {
        let catalog = QuakeCatalog::new(vec![quake("first", 2.0), quake("second", 5.0)]);
        assert_eq!(catalog.events()[0].id, "first");
        assert_eq!(catalog.events()[1].id, "second");
    }

    #[test]
    fn test_strongest_and_sorting() {
        let catalog =
            QuakeCatalog::new(vec![quake("a", 2.0), quake("b", 6.1), quake("c", 4.5)]);
        assert_eq!(catalog.strongest().unwrap().id, "b");

        let sorted = catalog.by_magnitude_desc();
        let ids: Vec<&str> = sorted.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn test_get_by_id() {
        let catalog = QuakeCatalog::new(vec![quake("a", 2.0), quake("b", 3.0)]);
        assert!(catalog.get("b").is_some());
        assert!(catalog.get("missing").is_none());
    }
}
