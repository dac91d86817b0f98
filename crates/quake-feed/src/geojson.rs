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

//! Typed schema for the USGS earthquake GeoJSON summary feeds.
//!
//! The feed is a GeoJSON `FeatureCollection` where each feature is one
//! earthquake event: a `Point` geometry of `[longitude, latitude, depth_km]`
//! plus `place`/`mag`/`time`/`url` properties. This module deserializes the
//! document into serde types and validates each feature into an
//! [`Earthquake`] record.
//!
//! Validation is per-feature: a feature that is missing its magnitude or
//! place, or that carries a non-point geometry, is skipped with a warning
//! rather than failing the whole document. Document-level problems (not
//! JSON, not a `FeatureCollection`) are hard errors.

use chrono::{DateTime, Utc};
use log::warn;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can fail an entire feed load.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a FeatureCollection document, got '{0}'")]
    UnexpectedDocument(String),
}

/// Reasons a single feature is rejected during validation.
///
/// These never fail a load; the offending feature is skipped and logged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeatureError {
    #[error("missing required property: {0}")]
    MissingProperty(&'static str),

    #[error("missing geometry")]
    MissingGeometry,

    #[error("expected Point geometry, got '{0}'")]
    NotAPoint(String),

    #[error("expected [lon, lat, depth] coordinates, got {0} values")]
    TruncatedCoordinates(usize),
}

/// Top-level GeoJSON document.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub metadata: Option<FeedMetadata>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// Feed metadata block (title and generation time, informational only).
#[derive(Debug, Deserialize)]
pub struct FeedMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub generated: Option<i64>,
    #[serde(default)]
    pub count: Option<usize>,
}

/// One raw GeoJSON feature, prior to validation.
#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: Option<String>,
    pub properties: FeatureProperties,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

/// Earthquake properties as USGS publishes them. Every field is nullable
/// in real feed data, so each is an `Option` here and validated later.
#[derive(Debug, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub mag: Option<f64>,
    /// Event origin time, epoch milliseconds.
    #[serde(default)]
    pub time: Option<i64>,
    /// USGS event detail page.
    #[serde(default)]
    pub url: Option<String>,
}

/// GeoJSON geometry; earthquake events are always points.
#[derive(Debug, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

/// One validated earthquake event.
///
/// Coordinates are stored in map order (latitude, longitude) — the
/// inversion from GeoJSON's `[longitude, latitude, depth]` happens exactly
/// once, in [`Earthquake::from_feature`].
#[derive(Debug, Clone, PartialEq)]
pub struct Earthquake {
    /// USGS event id (e.g. "us7000abcd"); empty string if the feed omits it.
    pub id: String,
    /// Human-readable location description (e.g. "10km N of Town").
    pub place: String,
    pub magnitude: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_km: f64,
    /// Event origin time; absent if the feed omitted or mangled it.
    pub time: Option<DateTime<Utc>>,
    /// USGS event detail page.
    pub url: Option<String>,
}

impl Earthquake {
    /// Validate one raw feature into an event record.
    pub fn from_feature(feature: Feature) -> Result<Self, FeatureError> {
        let magnitude = feature
            .properties
            .mag
            .ok_or(FeatureError::MissingProperty("mag"))?;
        let place = feature
            .properties
            .place
            .ok_or(FeatureError::MissingProperty("place"))?;

        let geometry = feature.geometry.ok_or(FeatureError::MissingGeometry)?;
        if geometry.kind != "Point" {
            return Err(FeatureError::NotAPoint(geometry.kind));
        }
        if geometry.coordinates.len() < 3 {
            return Err(FeatureError::TruncatedCoordinates(
                geometry.coordinates.len(),
            ));
        }

        // GeoJSON order is [lon, lat, depth]; everything downstream works
        // in (lat, lon).
        let longitude = geometry.coordinates[0];
        let latitude = geometry.coordinates[1];
        let depth_km = geometry.coordinates[2];

        let time = feature
            .properties
            .time
            .and_then(DateTime::<Utc>::from_timestamp_millis);

        Ok(Self {
            id: feature.id.unwrap_or_default(),
            place,
            magnitude,
            latitude,
            longitude,
            depth_km,
            time,
            url: feature.properties.url,
        })
    }
}

/// Parse a feed body into validated events, in feed order.
///
/// Returns a hard error if the body is not a GeoJSON `FeatureCollection`;
/// individual malformed features are skipped with a warning so one bad
/// record cannot blank the whole map.
pub fn parse_feed(body: &str) -> Result<Vec<Earthquake>, FeedError> {
    let document: FeatureCollection = serde_json::from_str(body)?;

    if document.kind != "FeatureCollection" {
        return Err(FeedError::UnexpectedDocument(document.kind));
    }

    let mut events = Vec::with_capacity(document.features.len());
    for feature in document.features {
        let id = feature.id.clone().unwrap_or_default();
        match Earthquake::from_feature(feature) {
            Ok(event) => events.push(event),
            Err(e) => warn!("Skipping feature '{}': {}", id, e),
        }
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_json(place: &str, mag: f64, lon: f64, lat: f64, depth: f64) -> String {
        format!(
            r#"{{
                "type": "FeatureCollection",
                "metadata": {{"title": "USGS All Earthquakes, Past Week", "count": 1}},
                "features": [{{
                    "type": "Feature",
                    "id": "us7000test",
                    "properties": {{
                        "place": "{place}",
                        "mag": {mag},
                        "time": 1700000000000,
                        "url": "https://earthquake.usgs.gov/earthquakes/eventpage/us7000test"
                    }},
                    "geometry": {{"type": "Point", "coordinates": [{lon}, {lat}, {depth}]}}
                }}]
            }}"#
        )
    }

    #[test]
    fn test_parse_single_feature() {
        let body = feature_json("10km N of Town", 3.2, 10.0, 20.0, 15.0);
        let events = parse_feed(&body).unwrap();
        assert_eq!(events.len(), 1);

        let quake = &events[0];
        assert_eq!(quake.id, "us7000test");
        assert_eq!(quake.place, "10km N of Town");
        assert!((quake.magnitude - 3.2).abs() < f64::EPSILON);
        // Coordinate order inverted from GeoJSON [lon, lat, depth].
        assert!((quake.latitude - 20.0).abs() < f64::EPSILON);
        assert!((quake.longitude - 10.0).abs() < f64::EPSILON);
        assert!((quake.depth_km - 15.0).abs() < f64::EPSILON);
        assert!(quake.time.is_some());
        assert_eq!(
            quake.url.as_deref(),
            Some("https://earthquake.usgs.gov/earthquakes/eventpage/us7000test")
        );
    }

    #[test]
    fn test_parse_empty_collection() {
        let body = r#"{"type": "FeatureCollection", "features": []}"#;
        let events = parse_feed(body).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_parse_not_json() {
        let result = parse_feed("<html>service unavailable</html>");
        assert!(matches!(result, Err(FeedError::Json(_))));
    }

    #[test]
    fn test_parse_wrong_document_type() {
        let body = r#"{"type": "Feature", "properties": {}}"#;
        let result = parse_feed(body);
        assert!(matches!(
            result,
            Err(FeedError::UnexpectedDocument(kind)) if kind == "Feature"
        ));
    }

    #[test]
    fn test_null_magnitude_is_skipped() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": "a",
                 "properties": {"place": "somewhere", "mag": null},
                 "geometry": {"type": "Point", "coordinates": [1.0, 2.0, 3.0]}},
                {"type": "Feature", "id": "b",
                 "properties": {"place": "elsewhere", "mag": 4.5},
                 "geometry": {"type": "Point", "coordinates": [4.0, 5.0, 6.0]}}
            ]
        }"#;
        let events = parse_feed(body).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "b");
    }

    #[test]
    fn test_non_point_geometry_is_skipped() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": "line",
                 "properties": {"place": "fault trace", "mag": 1.0},
                 "geometry": {"type": "LineString", "coordinates": [1.0, 2.0]}}
            ]
        }"#;
        let events = parse_feed(body).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_feature_error_variants() {
        let feature = Feature {
            id: None,
            properties: FeatureProperties {
                place: Some("x".to_string()),
                mag: Some(1.0),
                time: None,
                url: None,
            },
            geometry: Some(Geometry {
                kind: "Point".to_string(),
                coordinates: vec![1.0, 2.0],
            }),
        };
        assert_eq!(
            Earthquake::from_feature(feature),
            Err(FeatureError::TruncatedCoordinates(2))
        );
    }

    #[test]
    fn test_negative_depth_and_magnitude_are_valid() {
        // Above-sea-level epicenters have negative depth; tiny events can
        // carry negative magnitudes. Both must pass validation untouched.
        let body = feature_json("shallow event", -0.5, -122.4, 37.8, -2.0);
        let events = parse_feed(&body).unwrap();
        assert_eq!(events.len(), 1);
        assert!((events[0].depth_km - (-2.0)).abs() < f64::EPSILON);
        assert!((events[0].magnitude - (-0.5)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_event_time_millis_conversion() {
        let body = feature_json("timed event", 2.0, 0.0, 0.0, 10.0);
        let events = parse_feed(&body).unwrap();
        let time = events[0].time.unwrap();
        assert_eq!(time.timestamp_millis(), 1_700_000_000_000);
    }
}
