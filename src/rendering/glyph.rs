//! Glyph decoding and the per-session glyph cache.

use std::collections::HashMap;

use super::fonts::{self, FontId, AWTRIX_BASELINE, AWTRIX_BITMAPS, FIRST_CHAR, LAST_CHAR};

/// Single-bit coverage mask for one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMask {
    pub width: u32,
    pub height: u32,
    /// Row-major coverage, `width * height` entries.
    pub bits: Vec<bool>,
    /// Horizontal offset from the pen position.
    pub x_offset: i32,
    /// Vertical offset from the draw origin (baseline shift already applied).
    pub y_offset: i32,
}

impl GlyphMask {
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[(y * self.width + x) as usize]
    }

    /// Iterate the covered pixels as `(x, y)` pairs relative to the mask origin.
    pub fn covered(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let w = self.width;
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(move |(i, _)| (i as u32 % w, i as u32 / w))
    }
}

/// A decoded glyph: optional mask plus the pen advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub mask: Option<GlyphMask>,
    pub advance: u32,
}

/// Advance width of a character without decoding its mask.
pub fn advance_of(font: FontId, ch: char) -> u32 {
    match font {
        FontId::Awtrix => match fonts::atlas_glyph(ch) {
            Some(g) if g.advance > 0 => g.advance,
            _ => font.fallback_advance(),
        },
        _ => font.fallback_advance(),
    }
}

/// Decode a glyph straight from the font tables.
pub fn decode(font: FontId, ch: char) -> Glyph {
    match font.fixed_table() {
        Some((table, cell_w, cell_h)) => decode_fixed(table, cell_w, cell_h, ch),
        None => decode_atlas(ch),
    }
}

fn decode_fixed(table: &[u8], cell_w: u32, cell_h: u32, ch: char) -> Glyph {
    let code = ch as u32;
    let advance = cell_w;
    if !(FIRST_CHAR..=LAST_CHAR).contains(&code) {
        return Glyph { mask: None, advance };
    }
    let start = ((code - FIRST_CHAR) * cell_w) as usize;
    let Some(columns) = table.get(start..start + cell_w as usize) else {
        return Glyph { mask: None, advance };
    };

    let mut bits = vec![false; (cell_w * cell_h) as usize];
    for (col, byte) in columns.iter().enumerate() {
        for row in 0..cell_h {
            if (byte >> row) & 1 == 1 {
                bits[(row * cell_w) as usize + col] = true;
            }
        }
    }

    Glyph {
        mask: Some(GlyphMask {
            width: cell_w,
            height: cell_h,
            bits,
            x_offset: 0,
            y_offset: 0,
        }),
        advance,
    }
}

fn decode_atlas(ch: char) -> Glyph {
    let Some(g) = fonts::atlas_glyph(ch) else {
        return Glyph {
            mask: None,
            advance: FontId::Awtrix.fallback_advance(),
        };
    };
    let advance = if g.advance > 0 {
        g.advance
    } else {
        FontId::Awtrix.fallback_advance()
    };
    if g.width == 0 || g.height == 0 {
        return Glyph { mask: None, advance };
    }

    let mut bits = Vec::with_capacity((g.width * g.height) as usize);
    let mut byte = 0u8;
    let mut consumed = 0usize;
    let mut cursor = g.offset;
    for _ in 0..g.width * g.height {
        if consumed % 8 == 0 {
            byte = AWTRIX_BITMAPS.get(cursor).copied().unwrap_or(0);
            cursor += 1;
        }
        consumed += 1;
        bits.push(byte & 0x80 != 0);
        byte <<= 1;
    }

    Glyph {
        mask: Some(GlyphMask {
            width: g.width,
            height: g.height,
            bits,
            x_offset: g.x_offset,
            y_offset: g.y_offset + AWTRIX_BASELINE,
        }),
        advance,
    }
}

/// Session-lifetime cache of decoded glyphs keyed by `(font, char)`.
///
/// Font data is static, so entries are never invalidated.
#[derive(Debug, Default)]
pub struct GlyphCache {
    entries: HashMap<(FontId, char), Glyph>,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mask_for(&mut self, font: FontId, ch: char) -> &Glyph {
        self.entries
            .entry((font, ch))
            .or_insert_with(|| decode(font, ch))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
