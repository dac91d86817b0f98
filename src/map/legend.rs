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

//! Depth legend overlay.
//!
//! The legend is static: its bands come from the constant threshold/color
//! tables, never from the loaded data, and it renders every frame whether
//! or not a feed load has completed.

use egui::{Color32, CornerRadius, RichText, Stroke};

use crate::map::style::{DEPTH_COLORS, DEPTH_STEPS_KM};

/// One legend row: a depth band label and its color swatch.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color32,
}

/// Zip the parallel threshold and color tables into legend rows.
///
/// Every band but the last is labeled "low–high"; the deepest band is
/// open-ended ("90+").
#[must_use]
pub fn legend_entries() -> Vec<LegendEntry> {
    DEPTH_STEPS_KM
        .iter()
        .zip(DEPTH_COLORS)
        .enumerate()
        .map(|(i, (low, color))| {
            let label = match DEPTH_STEPS_KM.get(i + 1) {
                Some(high) => format!("{low}–{high}"),
                None => format!("{low}+"),
            };
            LegendEntry { label, color }
        })
        .collect()
}

/// Render the legend as a fixed overlay in the bottom-right map corner.
pub fn show(ctx: &egui::Context) {
    egui::Window::new("depth_legend")
        .title_bar(false)
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-10.0, -30.0))
        .resizable(false)
        .frame(
            egui::Frame::window(&ctx.style())
                .fill(Color32::from_rgba_unmultiplied(25, 30, 35, 230))
                .stroke(Stroke::new(1.0, Color32::from_rgb(60, 80, 100)))
                .corner_radius(CornerRadius::same(6)),
        )
        .show(ctx, |ui| {
            ui.label(
                RichText::new("Depth (km)")
                    .color(Color32::from_rgb(150, 200, 220))
                    .size(12.0)
                    .strong(),
            );
            ui.add_space(2.0);

            for entry in legend_entries() {
                ui.horizontal(|ui| {
                    let (rect, _) = ui.allocate_exact_size(
                        egui::vec2(14.0, 14.0),
                        egui::Sense::hover(),
                    );
                    ui.painter()
                        .rect_filled(rect, CornerRadius::same(2), entry.color);
                    ui.label(
                        RichText::new(&entry.label)
                            .color(Color32::from_rgb(200, 200, 200))
                            .size(11.0)
                            .monospace(),
                    );
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_entries() {
        assert_eq!(legend_entries().len(), 6);
    }

    #[test]
    fn test_band_labels() {
        let entries = legend_entries();
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["-10–10", "10–30", "30–50", "50–70", "70–90", "90+"]);
    }

    #[test]
    fn test_colors_follow_band_order() {
        let entries = legend_entries();
        for (entry, color) in entries.iter().zip(DEPTH_COLORS) {
            assert_eq!(entry.color, color);
        }
    }
}
