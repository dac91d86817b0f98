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

//! Feed status window.
//!
//! Shows the load lifecycle explicitly: a failed load renders its error
//! text here (and as a bubble on the map), while an empty-but-successful
//! load shows "0 earthquakes" — the two are never conflated.

use chrono::Utc;
use egui::{Color32, CornerRadius, RichText, Stroke};
use log::warn;
use quake_feed::{Client, FeedState, QuakeCatalog};

use crate::config::{AppConfig, FeedPreset};

pub struct StatusPane {
    pub visible: bool,
}

impl StatusPane {
    pub fn new(visible: bool) -> Self {
        Self { visible }
    }

    fn state_line(state: &FeedState) -> (Color32, &'static str) {
        match state {
            FeedState::Idle => (Color32::from_rgb(150, 150, 150), "IDLE"),
            FeedState::Loading => (Color32::from_rgb(255, 200, 50), "LOADING"),
            FeedState::Loaded => (Color32::from_rgb(100, 255, 100), "LIVE"),
            FeedState::Failed(_) => (Color32::from_rgb(255, 80, 80), "FAILED"),
        }
    }

    /// Render the status pane as a floating window
    pub fn render(
        &mut self,
        ctx: &egui::Context,
        state: &FeedState,
        catalog: &QuakeCatalog,
        config: &mut AppConfig,
        client: &Client,
    ) {
        if !self.visible {
            // Show a small button to re-open the status pane when hidden
            egui::Window::new("show_status")
                .title_bar(false)
                .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(10.0, -10.0))
                .resizable(false)
                .frame(window_frame(ctx))
                .show(ctx, |ui| {
                    if ui
                        .button(
                            RichText::new("Show Status")
                                .color(Color32::from_rgb(150, 200, 220))
                                .size(11.0),
                        )
                        .clicked()
                    {
                        self.visible = true;
                    }
                });
            return;
        }

        egui::Window::new("feed_status")
            .title_bar(false)
            .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(10.0, -10.0))
            .fixed_size(egui::vec2(280.0, 0.0))
            .resizable(false)
            .frame(window_frame(ctx))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("◈ FEED STATUS")
                            .color(Color32::from_rgb(100, 180, 220))
                            .size(12.0)
                            .strong(),
                    );
                    ui.with_layout(
                        egui::Layout::right_to_left(egui::Align::Center),
                        |ui| {
                            if ui
                                .button(RichText::new("✕").size(10.0))
                                .clicked()
                            {
                                self.visible = false;
                            }
                        },
                    );
                });

                let (color, label) = Self::state_line(state);
                ui.horizontal(|ui| {
                    ui.label(RichText::new("●").color(color).size(11.0));
                    ui.label(
                        RichText::new(label)
                            .color(color)
                            .size(11.0)
                            .monospace()
                            .strong(),
                    );
                });

                if let FeedState::Failed(message) = state {
                    ui.label(
                        RichText::new(message)
                            .color(Color32::from_rgb(255, 120, 120))
                            .size(9.5),
                    );
                }

                ui.add_space(2.0);

                ui.label(
                    RichText::new(format!("EVENTS: {}", catalog.len()))
                        .color(Color32::from_rgb(180, 180, 180))
                        .size(10.0)
                        .monospace(),
                );

                if let Some(strongest) = catalog.strongest() {
                    ui.label(
                        RichText::new(format!(
                            "MAX M{:.1} {}",
                            strongest.magnitude, strongest.place
                        ))
                        .color(Color32::from_rgb(180, 180, 180))
                        .size(10.0)
                        .monospace(),
                    );
                }

                if let Some(loaded_at) = catalog.loaded_at() {
                    let age = (Utc::now() - loaded_at).num_seconds();
                    ui.label(
                        RichText::new(format!("UPDATED T-{:03}s", age.max(0)))
                            .color(Color32::from_rgb(120, 120, 120))
                            .size(9.0)
                            .monospace(),
                    );
                }

                ui.add_space(4.0);

                // Feed window selector; switching reloads immediately.
                ui.horizontal_wrapped(|ui| {
                    for preset in [
                        FeedPreset::PastHour,
                        FeedPreset::PastDay,
                        FeedPreset::PastWeek,
                        FeedPreset::PastMonth,
                    ] {
                        let active =
                            config.custom_feed_url.is_none() && config.feed == preset;
                        let clicked = ui
                            .selectable_label(
                                active,
                                RichText::new(preset.label()).size(9.5),
                            )
                            .clicked();
                        if clicked && !active {
                            config.feed = preset;
                            config.custom_feed_url = None;
                            client.set_url(config.feed_url());
                            if let Err(e) = config.save() {
                                warn!("Failed to save config: {}", e);
                            }
                        }
                    }
                });

                ui.label(
                    RichText::new(client.current_url())
                        .color(Color32::from_rgb(100, 100, 100))
                        .size(8.0)
                        .monospace(),
                );
            });
    }
}

fn window_frame(ctx: &egui::Context) -> egui::Frame {
    egui::Frame::window(&ctx.style())
        .fill(Color32::from_rgba_unmultiplied(25, 30, 35, 230))
        .stroke(Stroke::new(1.0, Color32::from_rgb(60, 80, 100)))
        .corner_radius(CornerRadius::same(6))
}
