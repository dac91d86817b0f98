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

mod config;
mod map;
mod status;

use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use eframe::egui;
use log::{info, warn};
use quake_feed::{Client, FeedState, FetchConfig, QuakeCatalog};
use walkers::{HttpOptions, HttpTiles, Map, MapMemory};

use config::{AppConfig, Basemap, FeedPreset};
use map::markers::QuakeLayer;
use map::style::depth_color;
use map::{legend, position, tile_cache_dir, CartoTileSource, CartoVariant};
use status::StatusPane;

#[derive(Parser, Debug)]
#[command(name = "quakemap-desktop", version, about = "USGS earthquake map viewer")]
struct Cli {
    /// Feed time window
    #[arg(long, value_enum)]
    feed: Option<FeedPreset>,

    /// Custom feed URL (takes precedence over --feed)
    #[arg(long)]
    feed_url: Option<String>,

    /// Seconds between feed refreshes (0 = load once)
    #[arg(long)]
    refresh: Option<u64>,
}

fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load config ({}), using defaults", e);
        AppConfig::default()
    });
    if let Some(feed) = cli.feed {
        config.feed = feed;
        config.custom_feed_url = None;
    }
    if let Some(url) = cli.feed_url {
        config.custom_feed_url = Some(url);
    }
    if let Some(refresh) = cli.refresh {
        config.refresh_secs = refresh;
    }

    info!("Starting QuakeMap Desktop...");

    // The feed client runs on a tokio runtime; the GUI thread only polls
    // its shared state. The runtime must outlive the event loop.
    let runtime = tokio::runtime::Runtime::new().expect("Failed to start tokio runtime");
    let _enter = runtime.enter();

    let client = Client::spawn(FetchConfig {
        url: config.feed_url(),
        refresh_interval: Duration::from_secs(config.refresh_secs),
        ..Default::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_title("QuakeMap Desktop"),
        ..Default::default()
    };

    eframe::run_native(
        "QuakeMap Desktop",
        options,
        Box::new(move |cc| Ok(Box::new(QuakeMapApp::new(cc, config, client)))),
    )
}

struct QuakeMapApp {
    config: AppConfig,
    client: Client,
    tiles: HttpTiles,
    map_memory: MapMemory,
    selected: Option<String>,
    status_pane: StatusPane,
}

impl QuakeMapApp {
    fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, client: Client) -> Self {
        let tiles = build_tiles(config.basemap, &cc.egui_ctx);

        let mut map_memory = MapMemory::default();
        if map_memory.set_zoom(config.zoom).is_err() {
            warn!("Invalid configured zoom {}, keeping default", config.zoom);
        }

        let status_pane = StatusPane::new(config.show_status);

        Self {
            config,
            client,
            tiles,
            map_memory,
            selected: None,
            status_pane,
        }
    }

    fn draw_map(&mut self, ui: &mut egui::Ui, catalog: &QuakeCatalog, state: &FeedState) {
        let rect = ui.available_rect_before_wrap();

        let home = position(self.config.center_lat, self.config.center_lon);
        ui.add(
            Map::new(Some(&mut self.tiles), &mut self.map_memory, home).with_plugin(
                QuakeLayer {
                    catalog,
                    selected: &mut self.selected,
                },
            ),
        );

        let painter = ui.painter();

        // Attribution (required by the tile providers)
        let attribution_color = match self.config.basemap {
            Basemap::CartoDark => egui::Color32::from_white_alpha(180),
            _ => egui::Color32::from_black_alpha(180),
        };
        painter.text(
            rect.right_bottom() + egui::vec2(-10.0, -10.0),
            egui::Align2::RIGHT_BOTTOM,
            self.config.basemap.attribution(),
            egui::FontId::proportional(10.0),
            attribution_color,
        );

        // Feed lifecycle bubble: failures are loud; the initial load gets a
        // quiet notice. A loaded-but-empty feed is not an error and shows
        // nothing here.
        let bubble = match state {
            FeedState::Failed(message) => Some((
                format!("Feed error: {}", message),
                egui::Color32::from_rgb(220, 50, 50),
            )),
            FeedState::Loading | FeedState::Idle if catalog.is_empty() => Some((
                "Loading earthquake feed...".to_string(),
                egui::Color32::from_rgb(255, 200, 100),
            )),
            _ => None,
        };

        if let Some((message, bg_color)) = bubble {
            let bubble_pos = rect.center_top() + egui::vec2(0.0, 20.0);
            let text_galley = painter.layout_no_wrap(
                message.clone(),
                egui::FontId::proportional(12.0),
                egui::Color32::WHITE,
            );

            let padding = egui::vec2(12.0, 6.0);
            let bubble_rect =
                egui::Rect::from_center_size(bubble_pos, text_galley.size() + padding * 2.0);

            painter.rect_filled(bubble_rect, egui::CornerRadius::same(5), bg_color);
            painter.text(
                bubble_pos,
                egui::Align2::CENTER_CENTER,
                message,
                egui::FontId::proportional(12.0),
                egui::Color32::WHITE,
            );
        }
    }

    fn draw_event_list(&mut self, ctx: &egui::Context, catalog: &QuakeCatalog) {
        let screen_height = ctx.screen_rect().height();

        egui::Window::new("Earthquakes")
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
            .fixed_size(egui::vec2(320.0, screen_height - 20.0))
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("◈ EVENTS")
                            .color(egui::Color32::from_rgb(100, 200, 100))
                            .size(14.0)
                            .strong(),
                    );
                    ui.with_layout(
                        egui::Layout::right_to_left(egui::Align::Center),
                        |ui| {
                            ui.label(
                                egui::RichText::new(format!("TOTAL: {}", catalog.len()))
                                    .color(egui::Color32::from_rgb(150, 150, 150))
                                    .size(10.0)
                                    .monospace(),
                            );
                        },
                    );
                });

                ui.add_space(4.0);

                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.push_id("event_list", |ui| {
                        for quake in catalog.by_magnitude_desc() {
                            let is_selected =
                                self.selected.as_deref() == Some(quake.id.as_str());

                            let frame = if is_selected {
                                egui::Frame::group(ui.style()).fill(
                                    egui::Color32::from_rgba_unmultiplied(100, 140, 180, 120),
                                )
                            } else {
                                egui::Frame::group(ui.style())
                            };

                            let inner = frame.show(ui, |ui| {
                                ui.horizontal(|ui| {
                                    ui.label(
                                        egui::RichText::new("●")
                                            .color(depth_color(quake.depth_km))
                                            .size(12.0),
                                    );
                                    ui.label(
                                        egui::RichText::new(format!("M{:.1}", quake.magnitude))
                                            .color(egui::Color32::from_rgb(200, 220, 255))
                                            .size(11.0)
                                            .monospace()
                                            .strong(),
                                    );
                                    ui.label(
                                        egui::RichText::new(&quake.place)
                                            .color(egui::Color32::from_rgb(180, 180, 180))
                                            .size(10.0),
                                    );
                                });

                                ui.horizontal(|ui| {
                                    ui.spacing_mut().item_spacing.x = 8.0;
                                    ui.label(
                                        egui::RichText::new(format!(
                                            "DEPTH {:.0} KM",
                                            quake.depth_km
                                        ))
                                        .color(egui::Color32::from_rgb(120, 120, 120))
                                        .size(9.0)
                                        .monospace(),
                                    );
                                    if let Some(time) = quake.time {
                                        ui.label(
                                            egui::RichText::new(format_age(
                                                (Utc::now() - time).num_seconds(),
                                            ))
                                            .color(egui::Color32::from_rgb(120, 120, 120))
                                            .size(9.0)
                                            .monospace(),
                                        );
                                    }
                                });
                            });

                            if inner.response.interact(egui::Sense::click()).clicked() {
                                self.selected = Some(quake.id.clone());
                            }

                            ui.add_space(3.0);
                        }
                    });
                });
            });
    }
}

impl eframe::App for QuakeMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll-driven UI: keep repainting so feed refreshes show up.
        ctx.request_repaint_after(Duration::from_millis(500));

        let state = self.client.state();
        let catalog = self.client.catalog();

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_map(ui, &catalog, &state);
            });

        self.draw_event_list(ctx, &catalog);

        if self.config.show_legend {
            legend::show(ctx);
        }

        self.status_pane
            .render(ctx, &state, &catalog, &mut self.config, &self.client);
    }
}

fn build_tiles(basemap: Basemap, ctx: &egui::Context) -> HttpTiles {
    let http_options = HttpOptions {
        cache: Some(tile_cache_dir(basemap.cache_name())),
        ..Default::default()
    };

    match basemap {
        Basemap::OpenStreetMap => HttpTiles::with_options(
            walkers::sources::OpenStreetMap,
            http_options,
            ctx.clone(),
        ),
        Basemap::CartoDark => HttpTiles::with_options(
            CartoTileSource::new(CartoVariant::Dark),
            http_options,
            ctx.clone(),
        ),
        Basemap::CartoLight => HttpTiles::with_options(
            CartoTileSource::new(CartoVariant::Light),
            http_options,
            ctx.clone(),
        ),
    }
}

/// Compact age label for the event list ("42s ago", "12m ago", "5h ago").
fn format_age(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        format!("{}s ago", seconds)
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else {
        format!("{}h ago", seconds / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_age_units() {
        assert_eq!(format_age(5), "5s ago");
        assert_eq!(format_age(90), "1m ago");
        assert_eq!(format_age(7200), "2h ago");
        assert_eq!(format_age(-3), "0s ago");
    }
}
