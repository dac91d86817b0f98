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

//! Marker styling: depth to color, magnitude to radius.
//!
//! Both mappings are pure functions of a single event — no cross-event
//! state — so a marker's appearance is fully determined by its own depth
//! and magnitude.

use egui::{Color32, Stroke};
use quake_feed::Earthquake;

/// Lower bounds of the six depth bands, shallow to deep, in km.
pub const DEPTH_STEPS_KM: [f64; 6] = [-10.0, 10.0, 30.0, 50.0, 70.0, 90.0];

/// Band colors, index-parallel to [`DEPTH_STEPS_KM`]: green for shallow
/// events through red for the deepest.
pub const DEPTH_COLORS: [Color32; 6] = [
    Color32::from_rgb(0x00, 0xff, 0x00), // #00ff00
    Color32::from_rgb(0xad, 0xff, 0x2f), // #adff2f
    Color32::from_rgb(0xff, 0xd7, 0x00), // #ffd700
    Color32::from_rgb(0xff, 0x8c, 0x00), // #ff8c00
    Color32::from_rgb(0xff, 0x45, 0x00), // #ff4500
    Color32::from_rgb(0xff, 0x00, 0x00), // #ff0000
];

const MARKER_FILL_ALPHA: u8 = 204; // 0.8 fill opacity
const MARKER_STROKE_WIDTH: f32 = 0.5;

/// Map a depth to its band color.
///
/// Strict greater-than comparisons: an event exactly on a boundary falls
/// into the shallower band (depth 90.0 is orange-red, 90.0001 is red).
/// Total over all reals; negative depths (above-sea-level epicenters) land
/// in the shallowest band.
#[must_use]
pub fn depth_color(depth_km: f64) -> Color32 {
    if depth_km > 90.0 {
        DEPTH_COLORS[5]
    } else if depth_km > 70.0 {
        DEPTH_COLORS[4]
    } else if depth_km > 50.0 {
        DEPTH_COLORS[3]
    } else if depth_km > 30.0 {
        DEPTH_COLORS[2]
    } else if depth_km > 10.0 {
        DEPTH_COLORS[1]
    } else {
        DEPTH_COLORS[0]
    }
}

/// Map a magnitude to a marker radius in pixels: 4x linear scaling.
///
/// Deliberately unclamped: a zero or negative magnitude yields a
/// zero-or-negative radius, which the painter silently skips.
#[must_use]
pub fn magnitude_radius(magnitude: f64) -> f32 {
    (magnitude * 4.0) as f32
}

/// Derived, per-event marker appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub radius: f32,
    pub fill: Color32,
    pub stroke: Stroke,
}

impl MarkerStyle {
    /// Compute the style for one event.
    #[must_use]
    pub fn for_event(quake: &Earthquake) -> Self {
        let band = depth_color(quake.depth_km);
        Self {
            radius: magnitude_radius(quake.magnitude),
            fill: Color32::from_rgba_unmultiplied(
                band.r(),
                band.g(),
                band.b(),
                MARKER_FILL_ALPHA,
            ),
            stroke: Stroke::new(MARKER_STROKE_WIDTH, Color32::BLACK),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quake(magnitude: f64, depth_km: f64) -> Earthquake {
        Earthquake {
            id: "test".to_string(),
            place: "test place".to_string(),
            magnitude,
            latitude: 0.0,
            longitude: 0.0,
            depth_km,
            time: None,
            url: None,
        }
    }

    #[test]
    fn test_depth_buckets() {
        assert_eq!(depth_color(5.0), DEPTH_COLORS[0]);
        assert_eq!(depth_color(15.0), DEPTH_COLORS[1]);
        assert_eq!(depth_color(45.0), DEPTH_COLORS[2]);
        assert_eq!(depth_color(60.0), DEPTH_COLORS[3]);
        assert_eq!(depth_color(80.0), DEPTH_COLORS[4]);
        assert_eq!(depth_color(300.0), DEPTH_COLORS[5]);
    }

    #[test]
    fn test_boundary_falls_to_shallower_band() {
        // Exact boundary values use strict greater-than, so 90.0 is not in
        // the deepest band but 90.0001 is.
        assert_eq!(depth_color(90.0), DEPTH_COLORS[4]);
        assert_eq!(depth_color(90.0001), DEPTH_COLORS[5]);
        assert_eq!(depth_color(10.0), DEPTH_COLORS[0]);
        assert_eq!(depth_color(10.0001), DEPTH_COLORS[1]);
    }

    #[test]
    fn test_depth_color_is_total_and_six_valued() {
        let mut depth = -50.0;
        while depth < 200.0 {
            let color = depth_color(depth);
            assert!(DEPTH_COLORS.contains(&color));
            depth += 0.7;
        }
        // Negative depths are valid input and map to the shallowest band.
        assert_eq!(depth_color(-3.0), DEPTH_COLORS[0]);
    }

    #[test]
    fn test_radius_is_linear_and_unclamped() {
        assert!((magnitude_radius(5.0) - 20.0).abs() < f32::EPSILON);
        assert!((magnitude_radius(3.2) - 12.8).abs() < 1e-5);
        assert!((magnitude_radius(0.0) - 0.0).abs() < f32::EPSILON);
        assert!((magnitude_radius(-1.0) - (-4.0)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_marker_style_for_event() {
        let style = MarkerStyle::for_event(&quake(5.0, 45.0));
        assert!((style.radius - 20.0).abs() < f32::EPSILON);
        // Fill is the #ff8c00 band at 0.8 opacity.
        assert_eq!(
            style.fill,
            Color32::from_rgba_unmultiplied(0xff, 0x8c, 0x00, 204)
        );
        assert_eq!(style.stroke.color, Color32::BLACK);
        assert!((style.stroke.width - 0.5).abs() < f32::EPSILON);
    }
}
