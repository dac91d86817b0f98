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

use walkers::sources::{Attribution, TileSource};
use walkers::TileId;

/// Carto basemap style variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartoVariant {
    Dark,
    Light,
}

impl CartoVariant {
    fn path_segment(self) -> &'static str {
        match self {
            CartoVariant::Dark => "dark_all",
            CartoVariant::Light => "light_all",
        }
    }
}

/// Tile source for Carto CDN basemap tiles
/// Uses subdomain load balancing across a-d.basemaps.cartocdn.com
#[derive(Debug, Clone, Copy)]
pub struct CartoTileSource {
    variant: CartoVariant,
}

impl CartoTileSource {
    #[must_use]
    pub fn new(variant: CartoVariant) -> Self {
        Self { variant }
    }
}

impl TileSource for CartoTileSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        // Subdomain load balancing (a, b, c, d) based on tile coordinates
        let subdomain = ['a', 'b', 'c', 'd'][((tile_id.x + tile_id.y) % 4) as usize];

        format!(
            "https://{}.basemaps.cartocdn.com/{}/{}/{}/{}.png",
            subdomain,
            self.variant.path_segment(),
            tile_id.zoom,
            tile_id.x,
            tile_id.y
        )
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "© OpenStreetMap contributors, © CARTO",
            url: "https://carto.com/attributions",
            logo_light: None,
            logo_dark: None,
        }
    }

    // Use default implementations for tile_size() and max_zoom()
    // tile_size() defaults to 256px
    // max_zoom() defaults to appropriate level for the source
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_url_variants() {
        let tile = TileId {
            x: 1,
            y: 2,
            zoom: 3,
        };
        let dark = CartoTileSource::new(CartoVariant::Dark).tile_url(tile);
        assert_eq!(dark, "https://d.basemaps.cartocdn.com/dark_all/3/1/2.png");

        let light = CartoTileSource::new(CartoVariant::Light).tile_url(tile);
        assert!(light.contains("/light_all/"));
    }
}
