//! Material Design icon rendering from a vector icon font.
//!
//! The name table comes from the font's `_meta.json` (a list of
//! `{"name": ..., "codepoint": "F02DC"}` records). Rasterized glyphs are cached
//! per `(codepoint, size)` for the lifetime of the session.

use std::collections::HashMap;
use std::path::Path;

use fontdue::{Font, FontSettings, Metrics};
use image::RgbaImage;
use serde::Deserialize;

use crate::scene::Color;
use crate::{Error, Result};

#[derive(Deserialize)]
struct MetaEntry {
    name: String,
    codepoint: String,
}

/// Icon name to codepoint lookup.
#[derive(Debug, Default, Clone)]
pub struct IconTable {
    codepoints: HashMap<String, char>,
}

impl IconTable {
    pub fn from_meta_json(json: &str) -> Result<Self> {
        let entries: Vec<MetaEntry> = serde_json::from_str(json)?;
        let codepoints = entries
            .into_iter()
            .filter_map(|e| {
                let cp = u32::from_str_radix(e.codepoint.trim(), 16).ok()?;
                Some((e.name, char::from_u32(cp)?))
            })
            .collect();
        Ok(Self { codepoints })
    }

    /// Resolve an icon name, ignoring a `namespace:` prefix such as `mdi:`.
    pub fn lookup(&self, name: &str) -> Option<char> {
        let bare = name.split_once(':').map_or(name, |(_, n)| n);
        self.codepoints.get(bare).copied()
    }

    pub fn len(&self) -> usize {
        self.codepoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty()
    }
}

/// Loaded icon font plus name table and a size-keyed raster cache.
pub struct IconSet {
    table: IconTable,
    font: Font,
    rasters: HashMap<(char, u32), (Metrics, Vec<u8>)>,
}

impl IconSet {
    pub fn new(table: IconTable, font_bytes: &[u8]) -> Result<Self> {
        let font = Font::from_bytes(font_bytes, FontSettings::default())
            .map_err(|e| Error::AssetError(format!("icon font: {}", e)))?;
        Ok(Self {
            table,
            font,
            rasters: HashMap::new(),
        })
    }

    /// Load the icon font and its metadata from disk.
    pub async fn load(font_path: &Path, meta_path: &Path) -> Result<Self> {
        let meta = tokio::fs::read_to_string(meta_path).await?;
        let table = IconTable::from_meta_json(&meta)?;
        let font_bytes = tokio::fs::read(font_path).await?;
        Self::new(table, &font_bytes)
    }

    pub fn table(&self) -> &IconTable {
        &self.table
    }

    /// Draw an icon onto a transparent layer; returns false when the name is unknown.
    pub fn draw(
        &mut self,
        layer: &mut RgbaImage,
        name: &str,
        x: i32,
        y: i32,
        size: u32,
        color: Color,
    ) -> bool {
        let Some(cp) = self.table.lookup(name) else {
            return false;
        };
        let px = size as f32;
        let ascent = self
            .font
            .horizontal_line_metrics(px)
            .map(|m| m.ascent)
            .unwrap_or(px);
        let font = &self.font;
        let (metrics, coverage) = self
            .rasters
            .entry((cp, size))
            .or_insert_with(|| font.rasterize(cp, px));

        let left = x + metrics.xmin;
        let top = y + (ascent - (metrics.ymin as f32 + metrics.height as f32)).round() as i32;
        let (w, h) = layer.dimensions();
        for gy in 0..metrics.height {
            for gx in 0..metrics.width {
                let cov = coverage[gy * metrics.width + gx];
                if cov == 0 {
                    continue;
                }
                let (dx, dy) = (left + gx as i32, top + gy as i32);
                if dx < 0 || dy < 0 || dx as u32 >= w || dy as u32 >= h {
                    continue;
                }
                let alpha = (cov as u32 * color.a as u32 / 255) as u8;
                layer.put_pixel(
                    dx as u32,
                    dy as u32,
                    image::Rgba([color.r, color.g, color.b, alpha]),
                );
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const META: &str = r#"[
        {"id": "1", "name": "home", "codepoint": "F02DC", "aliases": []},
        {"name": "thermometer", "codepoint": "F050F"},
        {"name": "broken", "codepoint": "zz"}
    ]"#;

    #[test]
    fn meta_table_parses_hex_codepoints() {
        let table = IconTable::from_meta_json(META).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("home"), char::from_u32(0xF02DC));
    }

    #[test]
    fn lookup_strips_namespace() {
        let table = IconTable::from_meta_json(META).unwrap();
        assert_eq!(table.lookup("mdi:thermometer"), table.lookup("thermometer"));
        assert!(table.lookup("mdi:unknown").is_none());
    }

    #[test]
    fn invalid_font_bytes_are_an_asset_error() {
        let table = IconTable::default();
        assert!(matches!(IconSet::new(table, b"nope"), Err(Error::AssetError(_))));
    }
}
