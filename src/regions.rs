//! Region tables and the tile palette.
//!
//! Region tables are authored as JSON lists of `{ name, height, color, glyph }`
//! rows, one list per layer. The defaults are embedded in the binary via
//! `include_str!`; a user file can replace them. Tile names are interned into
//! dense [`TileId`]s so grids stay `Copy`.

use std::collections::HashMap;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};
use crate::thresholds::{ThresholdEntry, ThresholdTable};

const DEFAULT_REGIONS_JSON: &str = include_str!("../data/defaults/regions.json");

/// Colour of void cells in image output.
pub const VOID_COLOR: [u8; 3] = [16, 12, 20];

/// Glyph of void cells in text output.
pub const VOID_GLYPH: char = ' ';

/// Dense identifier of a tile type within a [`TilePalette`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u16);

/// One row of a region table as written in the JSON file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainType {
    pub name: String,
    /// Inclusive upper bound of the noise value for this tile.
    #[serde(alias = "height")]
    pub upper_bound: f32,
    #[serde(default = "default_color")]
    pub color: [u8; 3],
    /// Defaults to the first letter of `name`.
    #[serde(default)]
    pub glyph: Option<char>,
}

fn default_color() -> [u8; 3] {
    [255, 0, 255]
}

impl TerrainType {
    pub fn new(name: &str, upper_bound: f32) -> Self {
        Self {
            name: name.to_string(),
            upper_bound,
            color: default_color(),
            glyph: None,
        }
    }

    fn glyph_or_initial(&self) -> char {
        self.glyph
            .or_else(|| self.name.chars().next())
            .unwrap_or('?')
    }
}

/// The three region tables of a generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Table used by the uniform random mode.
    pub regions: Vec<TerrainType>,
    /// Base composition in noise mode.
    pub dirt_regions: Vec<TerrainType>,
    /// Ore types, consulted only where the ore gate opens.
    pub ore_regions: Vec<TerrainType>,
}

impl RegionConfig {
    /// The embedded default tables.
    pub fn defaults() -> Self {
        // The embedded file is covered by `test_embedded_defaults_parse`.
        Self::from_json("embedded defaults", DEFAULT_REGIONS_JSON)
            .unwrap_or_else(|_| Self::fallback())
    }

    pub fn from_json(origin: &str, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| GenError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// Load tables from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        Self::from_json(&path.display().to_string(), &contents)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|source| GenError::Parse {
            origin: "region config".to_string(),
            source,
        })
    }

    fn fallback() -> Self {
        Self {
            regions: vec![TerrainType::new("Dirt", 0.6), TerrainType::new("Stone", 1.0)],
            dirt_regions: vec![TerrainType::new("Dirt", 0.5), TerrainType::new("Stone", 1.0)],
            ore_regions: vec![TerrainType::new("Iron", 0.7), TerrainType::new("Gold", 1.0)],
        }
    }
}

/// Display properties of one tile type.
#[derive(Clone, Debug, PartialEq)]
pub struct TileStyle {
    pub name: String,
    pub color: [u8; 3],
    pub glyph: char,
}

/// Interned tile names and their styles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TilePalette {
    styles: Vec<TileStyle>,
    by_name: HashMap<String, TileId>,
}

impl TilePalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `terrain.name`, registering it on first sight. Later rows with
    /// the same name reuse the first row's colour and glyph.
    pub fn intern(&mut self, terrain: &TerrainType) -> Result<TileId> {
        if let Some(&id) = self.by_name.get(&terrain.name) {
            return Ok(id);
        }
        let index = u16::try_from(self.styles.len())
            .ok()
            .filter(|&i| i < u16::MAX)
            .ok_or(GenError::PaletteFull(self.styles.len() + 1))?;
        let id = TileId(index);
        self.styles.push(TileStyle {
            name: terrain.name.clone(),
            color: terrain.color,
            glyph: terrain.glyph_or_initial(),
        });
        self.by_name.insert(terrain.name.clone(), id);
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<TileId> {
        self.by_name.get(name).copied()
    }

    pub fn style(&self, id: TileId) -> Option<&TileStyle> {
        self.styles.get(id.0 as usize)
    }

    pub fn name(&self, id: TileId) -> &str {
        self.style(id).map(|s| s.name.as_str()).unwrap_or("?")
    }

    pub fn color(&self, cell: Option<TileId>) -> [u8; 3] {
        cell.and_then(|id| self.style(id))
            .map(|s| s.color)
            .unwrap_or(VOID_COLOR)
    }

    pub fn glyph(&self, cell: Option<TileId>) -> char {
        cell.and_then(|id| self.style(id))
            .map(|s| s.glyph)
            .unwrap_or(VOID_GLYPH)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// All ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        (0..self.styles.len()).map(|i| TileId(i as u16))
    }
}

/// Palette plus the three threshold tables, ready for classification.
#[derive(Clone, Debug, PartialEq)]
pub struct Regions {
    pub palette: TilePalette,
    pub base: ThresholdTable<TileId>,
    pub dirt: ThresholdTable<TileId>,
    pub ore: ThresholdTable<TileId>,
}

impl Regions {
    pub fn from_config(config: &RegionConfig) -> Result<Self> {
        let mut palette = TilePalette::new();
        let base = build_table("regions", &config.regions, &mut palette)?;
        let dirt = build_table("dirt_regions", &config.dirt_regions, &mut palette)?;
        let ore = build_table("ore_regions", &config.ore_regions, &mut palette)?;
        debug!("palette holds {} tile types", palette.len());
        Ok(Self { palette, base, dirt, ore })
    }

    pub fn defaults() -> Result<Self> {
        Self::from_config(&RegionConfig::defaults())
    }
}

fn build_table(
    label: &str,
    rows: &[TerrainType],
    palette: &mut TilePalette,
) -> Result<ThresholdTable<TileId>> {
    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        if !row.upper_bound.is_finite() {
            return Err(GenError::NonFiniteBound {
                table: label.to_string(),
                name: row.name.clone(),
            });
        }
        entries.push(ThresholdEntry::new(row.upper_bound, palette.intern(row)?));
    }
    ThresholdTable::new(label, entries)
}
