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

//! Earthquake marker layer for the walkers map.
//!
//! Each catalog event becomes one styled circle; clicking a marker selects
//! it and shows its popup, clicking empty map clears the selection, and
//! clicking the popup opens the USGS event page.

use egui::{Color32, CornerRadius, FontId, Pos2, Rect};
use log::warn;
use quake_feed::{Earthquake, QuakeCatalog};
use walkers::{MapMemory, Plugin, Projector};

use crate::map::position;
use crate::map::style::MarkerStyle;

/// Minimum clickable radius, so low-magnitude events stay selectable.
const MIN_HIT_RADIUS: f32 = 6.0;

/// One marker, fully derived from one event: screen-independent center in
/// map order (lat, lon) plus the computed style.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub style: MarkerStyle,
}

/// Derive one marker per catalog event, in feed order.
#[must_use]
pub fn marker_specs(catalog: &QuakeCatalog) -> Vec<MarkerSpec> {
    catalog
        .events()
        .iter()
        .map(|quake| MarkerSpec {
            id: quake.id.clone(),
            latitude: quake.latitude,
            longitude: quake.longitude,
            style: MarkerStyle::for_event(quake),
        })
        .collect()
}

/// Popup body for one event.
#[must_use]
pub fn popup_text(quake: &Earthquake) -> String {
    let mut text = format!(
        "{}\nMagnitude: {}\nDepth: {} km",
        quake.place, quake.magnitude, quake.depth_km
    );
    if let Some(time) = quake.time {
        text.push_str(&format!("\n{}", time.format("%Y-%m-%d %H:%M UTC")));
    }
    text
}

/// Map plugin that draws the earthquake layer and handles selection.
pub struct QuakeLayer<'a> {
    pub catalog: &'a QuakeCatalog,
    pub selected: &'a mut Option<String>,
}

impl Plugin for QuakeLayer<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        _map_memory: &MapMemory,
    ) {
        let click_pos = if response.clicked() {
            response.interact_pointer_pos()
        } else {
            None
        };

        // Popup geometry is computed up front so a click on the popup is
        // not treated as a click on the map underneath it.
        let popup = self
            .selected
            .as_ref()
            .and_then(|id| self.catalog.get(id))
            .map(|quake| PopupBox::layout(ui, projector, quake));

        let popup_clicked = match (&popup, click_pos) {
            (Some(popup), Some(pos)) => popup.rect.contains(pos),
            _ => false,
        };
        if popup_clicked {
            if let Some(url) = popup.as_ref().and_then(|p| p.url.as_deref()) {
                if let Err(e) = webbrowser::open(url) {
                    warn!("Failed to open event page: {}", e);
                }
            }
        }

        let mut hit: Option<String> = None;
        for spec in marker_specs(self.catalog) {
            let projected = projector.project(position(spec.latitude, spec.longitude));
            let center = egui::pos2(projected.x, projected.y);

            // Only draw if within visible area
            if !response.rect.contains(center) {
                continue;
            }

            ui.painter()
                .circle(center, spec.style.radius, spec.style.fill, spec.style.stroke);

            if !popup_clicked {
                if let Some(pos) = click_pos {
                    if center.distance(pos) <= spec.style.radius.max(MIN_HIT_RADIUS) {
                        hit = Some(spec.id.clone());
                    }
                }
            }
        }

        // A click that landed on neither the popup nor a marker clears the
        // selection.
        if click_pos.is_some() && !popup_clicked {
            *self.selected = hit;
        }

        if let Some(popup) = popup {
            popup.draw(ui);
        }
    }
}

/// Laid-out popup: measured text, anchor rect, and the event page URL.
struct PopupBox {
    rect: Rect,
    text_pos: Pos2,
    galley: std::sync::Arc<egui::Galley>,
    hint: Option<std::sync::Arc<egui::Galley>>,
    url: Option<String>,
}

impl PopupBox {
    const PADDING: f32 = 6.0;

    fn layout(ui: &egui::Ui, projector: &Projector, quake: &Earthquake) -> Self {
        let projected = projector.project(position(quake.latitude, quake.longitude));
        let anchor = egui::pos2(projected.x, projected.y);

        let galley = ui.painter().layout_no_wrap(
            popup_text(quake),
            FontId::proportional(11.0),
            Color32::WHITE,
        );
        let hint = quake.url.is_some().then(|| {
            ui.painter().layout_no_wrap(
                "Click to open USGS event page".to_string(),
                FontId::proportional(9.0),
                Color32::from_rgb(150, 200, 220),
            )
        });

        let hint_height = hint.as_ref().map_or(0.0, |h| h.size().y + 2.0);
        let width = galley
            .size()
            .x
            .max(hint.as_ref().map_or(0.0, |h| h.size().x));
        let size = egui::vec2(
            width + Self::PADDING * 2.0,
            galley.size().y + hint_height + Self::PADDING * 2.0,
        );

        // Anchored above-right of the marker, like a map callout.
        let text_pos = anchor + egui::vec2(12.0, -(size.y + 8.0));
        let rect = Rect::from_min_size(text_pos, size);

        Self {
            rect,
            text_pos,
            galley,
            hint,
            url: quake.url.clone(),
        }
    }

    fn draw(&self, ui: &egui::Ui) {
        let painter = ui.painter();
        painter.rect_filled(
            self.rect,
            CornerRadius::same(3),
            Color32::from_rgba_unmultiplied(0, 0, 0, 200),
        );

        let inner = self.text_pos + egui::vec2(Self::PADDING, Self::PADDING);
        painter.galley(inner, self.galley.clone(), Color32::WHITE);

        if let Some(hint) = &self.hint {
            let hint_pos = inner + egui::vec2(0.0, self.galley.size().y + 2.0);
            painter.galley(hint_pos, hint.clone(), Color32::from_rgb(150, 200, 220));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::style::DEPTH_COLORS;
    use quake_feed::QuakeCatalog;

    fn quake(id: &str, place: &str, magnitude: f64, lat: f64, lon: f64, depth: f64) -> Earthquake {
        Earthquake {
            id: id.to_string(),
            place: place.to_string(),
            magnitude,
            latitude: lat,
            longitude: lon,
            depth_km: depth,
            time: None,
            url: None,
        }
    }

    #[test]
    fn test_empty_catalog_yields_zero_markers() {
        let specs = marker_specs(&QuakeCatalog::empty());
        assert!(specs.is_empty());
    }

    #[test]
    fn test_marker_center_uses_map_order() {
        // GeoJSON coordinates [-122.4, 37.8, 45] with mag 5.0: the marker
        // sits at (lat 37.8, lon -122.4) with radius 20 in the 30-50 band.
        let catalog = QuakeCatalog::new(vec![quake("a", "SF Bay", 5.0, 37.8, -122.4, 45.0)]);
        let specs = marker_specs(&catalog);
        assert_eq!(specs.len(), 1);

        let spec = &specs[0];
        assert!((spec.latitude - 37.8).abs() < f64::EPSILON);
        assert!((spec.longitude - (-122.4)).abs() < f64::EPSILON);
        assert!((spec.style.radius - 20.0).abs() < f32::EPSILON);
        let band = DEPTH_COLORS[3]; // #ff8c00
        assert_eq!(
            spec.style.fill,
            Color32::from_rgba_unmultiplied(band.r(), band.g(), band.b(), 204)
        );
    }

    #[test]
    fn test_end_to_end_feature_rendering() {
        let catalog = QuakeCatalog::new(vec![quake(
            "e2e",
            "10km N of Town",
            3.2,
            20.0,
            10.0,
            15.0,
        )]);
        let specs = marker_specs(&catalog);

        let spec = &specs[0];
        assert!((spec.latitude - 20.0).abs() < f64::EPSILON);
        assert!((spec.longitude - 10.0).abs() < f64::EPSILON);
        assert!((spec.style.radius - 12.8).abs() < 1e-5);
        let band = DEPTH_COLORS[1]; // #adff2f
        assert_eq!(
            spec.style.fill,
            Color32::from_rgba_unmultiplied(band.r(), band.g(), band.b(), 204)
        );

        let text = popup_text(&catalog.events()[0]);
        assert!(text.contains("10km N of Town"));
        assert!(text.contains("3.2"));
        assert!(text.contains("15 km"));
    }

    #[test]
    fn test_markers_keep_feed_order() {
        let catalog = QuakeCatalog::new(vec![
            quake("first", "a", 1.0, 0.0, 0.0, 5.0),
            quake("second", "b", 2.0, 1.0, 1.0, 5.0),
        ]);
        let ids: Vec<String> = marker_specs(&catalog).into_iter().map(|s| s.id).collect();
        assert_eq!(ids, ["first", "second"]);
    }

    #[test]
    fn test_negative_magnitude_passes_through() {
        // Radius stays unclamped; the painter draws nothing for it.
        let catalog = QuakeCatalog::new(vec![quake("neg", "tiny", -1.0, 0.0, 0.0, 5.0)]);
        let specs = marker_specs(&catalog);
        assert!((specs[0].style.radius - (-4.0)).abs() < f32::EPSILON);
    }
}
