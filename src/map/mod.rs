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

//! Map rendering: tile sources, the earthquake marker layer, and the
//! depth legend overlay.

pub mod carto;
pub mod legend;
pub mod markers;
pub mod style;

use std::path::PathBuf;

pub use carto::{CartoTileSource, CartoVariant};

/// Build a walkers position from map-order (latitude, longitude).
#[must_use]
pub fn position(latitude: f64, longitude: f64) -> walkers::Position {
    walkers::lat_lon(latitude, longitude)
}

/// On-disk cache directory for one basemap's tiles.
#[must_use]
pub fn tile_cache_dir(basemap: &str) -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("quakemap-desktop")
        .join("tiles")
        .join(basemap)
}
