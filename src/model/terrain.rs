use serde::{Deserialize, Serialize};

/// Biomes a tile can belong to. Vegetation validity is defined per plant
/// species in the configuration as a list of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Water,
    Beach,
    Plains,
    Grassland,
    Forest,
    Rainforest,
    Savanna,
    Desert,
    Tundra,
    Mountain,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tile {
    pub biome: Biome,
    /// Ambient water availability in [0, 1].
    pub moisture: f64,
    /// Soil quality in [0, 1].
    pub fertility: f64,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            biome: Biome::Plains,
            moisture: 0.5,
            fertility: 0.5,
        }
    }
}

/// Fixed tile map sampled by plants and resources. Generated once at world
/// creation; the simulation core only ever reads it.
#[derive(Serialize, Deserialize, Clone)]
pub struct TileGrid {
    tiles: Vec<Tile>,
    pub cols: usize,
    pub rows: usize,
    pub tile_size: f64,
}

impl TileGrid {
    pub fn generate(cols: usize, rows: usize, tile_size: f64, seed: u64) -> Self {
        let mut tiles = Vec::with_capacity(cols * rows);
        for y in 0..rows {
            for x in 0..cols {
                let elevation = Self::value_noise(x as f32, y as f32, seed);
                let moisture = Self::value_noise(x as f32, y as f32, seed.wrapping_add(101));
                let fertility = Self::value_noise(x as f32, y as f32, seed.wrapping_add(211));
                let biome = Self::classify(elevation, moisture);
                tiles.push(Tile {
                    biome,
                    moisture: f64::from(moisture),
                    fertility: f64::from(fertility),
                });
            }
        }
        Self {
            tiles,
            cols,
            rows,
            tile_size,
        }
    }

    fn classify(elevation: f32, moisture: f32) -> Biome {
        if elevation < 0.28 {
            Biome::Water
        } else if elevation < 0.32 {
            Biome::Beach
        } else if elevation > 0.78 {
            if moisture < 0.4 {
                Biome::Mountain
            } else {
                Biome::Tundra
            }
        } else if moisture < 0.25 {
            Biome::Desert
        } else if moisture < 0.4 {
            Biome::Savanna
        } else if moisture > 0.75 {
            Biome::Rainforest
        } else if moisture > 0.55 {
            Biome::Forest
        } else if elevation > 0.5 {
            Biome::Grassland
        } else {
            Biome::Plains
        }
    }

    /// Returns the tile containing the world coordinate, or `None` when the
    /// coordinate falls outside the map. Out-of-bounds is not an error here;
    /// callers decide what standing off the map means.
    pub fn tile_at(&self, x: f64, y: f64) -> Option<&Tile> {
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }
        let cx = (x / self.tile_size) as usize;
        let cy = (y / self.tile_size) as usize;
        if cx >= self.cols || cy >= self.rows {
            return None;
        }
        Some(&self.tiles[cy * self.cols + cx])
    }

    pub fn world_bounds(&self) -> (f64, f64) {
        (
            self.cols as f64 * self.tile_size,
            self.rows as f64 * self.tile_size,
        )
    }

    /// Overwrites a tile. Used by tests to pin down biome layouts.
    pub fn set_tile(&mut self, cx: usize, cy: usize, tile: Tile) {
        if cx < self.cols && cy < self.rows {
            self.tiles[cy * self.cols + cx] = tile;
        }
    }

    fn value_noise(x: f32, y: f32, seed: u64) -> f32 {
        let scale1 = 0.1;
        let scale2 = 0.05;
        let scale3 = 0.02;
        let noise1 = Self::hash_noise(x * scale1, y * scale1, seed) * 0.5;
        let noise2 = Self::hash_noise(x * scale2, y * scale2, seed.wrapping_add(1)) * 0.3;
        let noise3 = Self::hash_noise(x * scale3, y * scale3, seed.wrapping_add(2)) * 0.2;
        (noise1 + noise2 + noise3).clamp(0.0, 1.0)
    }

    fn hash_noise(x: f32, y: f32, seed: u64) -> f32 {
        let ix = x.floor() as i32;
        let iy = y.floor() as i32;
        let fx = x - x.floor();
        let fy = y - y.floor();
        let ux = fx * fx * (3.0 - 2.0 * fx);
        let uy = fy * fy * (3.0 - 2.0 * fy);
        let v00 = Self::hash(ix, iy, seed);
        let v10 = Self::hash(ix + 1, iy, seed);
        let v01 = Self::hash(ix, iy + 1, seed);
        let v11 = Self::hash(ix + 1, iy + 1, seed);
        let v0 = v00 + ux * (v10 - v00);
        let v1 = v01 + ux * (v11 - v01);
        v0 + uy * (v1 - v0)
    }

    fn hash(x: i32, y: i32, seed: u64) -> f32 {
        let n = (x.wrapping_mul(127) ^ y.wrapping_mul(311)) as u64 ^ seed;
        let n = n.wrapping_mul(0x517cc1b727220a95);
        let n = n ^ (n >> 32);
        (n & 0xFFFFFF) as f32 / 0xFFFFFF as f32
    }
}
