//! Static font data for the three built-in bitmap fonts.
//!
//! The two fixed-width fonts are flat per-column tables covering printable
//! ASCII (32..=126): every glyph occupies `cell_width` consecutive bytes and
//! bit `n` of a byte is row `n` (top row in the least significant bit).
//!
//! The variable-width `awtrix` font is a glyph atlas: each descriptor points
//! into a shared bitmap blob packed MSB-first, one bit per pixel, row-major
//! within the glyph's bounding box. Offsets are relative to a baseline five
//! pixels below the draw origin.

use serde::{Deserialize, Serialize};

/// First character code present in every table.
pub const FIRST_CHAR: u32 = 32;
/// Last character code present in every table.
pub const LAST_CHAR: u32 = 126;

/// Vertical shift applied to atlas glyphs so that the baseline sits below the origin.
pub const AWTRIX_BASELINE: i32 = 5;

/// Identifier of one of the built-in fonts.
///
/// Deserializes from `"3x5"`, `"5x7"` or `"awtrix"`; anything else falls back to `5x7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum FontId {
    Small3x5,
    #[default]
    Medium5x7,
    Awtrix,
}

impl FontId {
    pub fn name(self) -> &'static str {
        match self {
            FontId::Small3x5 => "3x5",
            FontId::Medium5x7 => "5x7",
            FontId::Awtrix => "awtrix",
        }
    }

    /// Height of one text cell, used as the slide step for vertical line cycling.
    pub fn cell_height(self) -> i32 {
        match self {
            FontId::Small3x5 => 5,
            FontId::Medium5x7 => 7,
            FontId::Awtrix => 6,
        }
    }

    /// Advance used when a character has no glyph.
    pub fn fallback_advance(self) -> u32 {
        match self {
            FontId::Small3x5 => 3,
            FontId::Medium5x7 => 5,
            FontId::Awtrix => 4,
        }
    }

    /// Extra pixels inserted between characters for a requested spacing.
    ///
    /// Atlas glyph advances already include one column of side bearing.
    pub fn gap(self, spacing: i32) -> i32 {
        match self {
            FontId::Awtrix => spacing - 1,
            _ => spacing,
        }
    }

    pub(crate) fn fixed_table(self) -> Option<(&'static [u8], u32, u32)> {
        match self {
            FontId::Small3x5 => Some((&FONT_3X5, 3, 5)),
            FontId::Medium5x7 => Some((&FONT_5X7, 5, 7)),
            FontId::Awtrix => None,
        }
    }
}

impl From<String> for FontId {
    fn from(s: String) -> Self {
        match s.as_str() {
            "3x5" => FontId::Small3x5,
            "awtrix" => FontId::Awtrix,
            _ => FontId::Medium5x7,
        }
    }
}

impl From<FontId> for String {
    fn from(f: FontId) -> Self {
        f.name().to_string()
    }
}

/// One entry of the variable-width glyph atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasGlyph {
    pub offset: usize,
    pub width: u32,
    pub height: u32,
    pub advance: u32,
    pub x_offset: i32,
    pub y_offset: i32,
}

/// Look up the atlas descriptor for a character, if it is printable ASCII.
pub fn atlas_glyph(ch: char) -> Option<&'static AtlasGlyph> {
    let code = ch as u32;
    if !(FIRST_CHAR..=LAST_CHAR).contains(&code) {
        return None;
    }
    AWTRIX_GLYPHS.get((code - FIRST_CHAR) as usize)
}

pub(crate) static FONT_3X5: [u8; 285] = [
    0x00, 0x00, 0x00, 0x00, 0x17, 0x00, 0x03, 0x00, 0x03, 0x1F, 0x0A, 0x1F, 0x12, 0x1F, 0x09,
    0x09, 0x04, 0x12, 0x0A, 0x15, 0x1A, 0x00, 0x03, 0x00, 0x00, 0x0E, 0x11, 0x11, 0x0E, 0x00,
    0x05, 0x02, 0x05, 0x04, 0x0E, 0x04, 0x10, 0x08, 0x00, 0x04, 0x04, 0x04, 0x00, 0x10, 0x00,
    0x18, 0x04, 0x03, 0x1F, 0x11, 0x1F, 0x12, 0x1F, 0x10, 0x1D, 0x15, 0x17, 0x15, 0x15, 0x1F,
    0x07, 0x04, 0x1F, 0x17, 0x15, 0x1D, 0x1F, 0x15, 0x1D, 0x01, 0x01, 0x1F, 0x1F, 0x15, 0x1F,
    0x17, 0x15, 0x1F, 0x00, 0x0A, 0x00, 0x10, 0x0A, 0x00, 0x04, 0x0A, 0x11, 0x0A, 0x0A, 0x0A,
    0x11, 0x0A, 0x04, 0x01, 0x15, 0x07, 0x0E, 0x15, 0x16, 0x1E, 0x05, 0x1E, 0x1F, 0x15, 0x0A,
    0x0E, 0x11, 0x11, 0x1F, 0x11, 0x0E, 0x1F, 0x15, 0x15, 0x1F, 0x05, 0x05, 0x0E, 0x11, 0x1D,
    0x1F, 0x04, 0x1F, 0x11, 0x1F, 0x11, 0x08, 0x10, 0x0F, 0x1F, 0x04, 0x1B, 0x1F, 0x10, 0x10,
    0x1F, 0x06, 0x1F, 0x1F, 0x01, 0x1E, 0x0E, 0x11, 0x0E, 0x1F, 0x05, 0x02, 0x0E, 0x19, 0x16,
    0x1F, 0x05, 0x1A, 0x12, 0x15, 0x09, 0x01, 0x1F, 0x01, 0x1F, 0x10, 0x1F, 0x0F, 0x10, 0x0F,
    0x1F, 0x0C, 0x1F, 0x1B, 0x04, 0x1B, 0x03, 0x1C, 0x03, 0x19, 0x15, 0x13, 0x1F, 0x11, 0x00,
    0x03, 0x04, 0x18, 0x00, 0x11, 0x1F, 0x02, 0x01, 0x02, 0x10, 0x10, 0x10, 0x01, 0x02, 0x00,
    0x1E, 0x05, 0x1E, 0x1F, 0x15, 0x0A, 0x0E, 0x11, 0x11, 0x1F, 0x11, 0x0E, 0x1F, 0x15, 0x15,
    0x1F, 0x05, 0x05, 0x0E, 0x11, 0x1D, 0x1F, 0x04, 0x1F, 0x11, 0x1F, 0x11, 0x08, 0x10, 0x0F,
    0x1F, 0x04, 0x1B, 0x1F, 0x10, 0x10, 0x1F, 0x06, 0x1F, 0x1F, 0x01, 0x1E, 0x0E, 0x11, 0x0E,
    0x1F, 0x05, 0x02, 0x0E, 0x19, 0x16, 0x1F, 0x05, 0x1A, 0x12, 0x15, 0x09, 0x01, 0x1F, 0x01,
    0x1F, 0x10, 0x1F, 0x0F, 0x10, 0x0F, 0x1F, 0x0C, 0x1F, 0x1B, 0x04, 0x1B, 0x03, 0x1C, 0x03,
    0x19, 0x15, 0x13, 0x04, 0x1F, 0x11, 0x00, 0x1F, 0x00, 0x11, 0x1F, 0x04, 0x04, 0x06, 0x02,
];

pub(crate) static FONT_5X7: [u8; 475] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x5F, 0x00, 0x00, 0x00, 0x07, 0x00, 0x07, 0x00,
    0x14, 0x7F, 0x14, 0x7F, 0x14, 0x24, 0x2A, 0x7F, 0x2A, 0x12, 0x23, 0x13, 0x08, 0x64, 0x62,
    0x36, 0x49, 0x55, 0x22, 0x50, 0x00, 0x05, 0x03, 0x00, 0x00, 0x00, 0x1C, 0x22, 0x41, 0x00,
    0x00, 0x41, 0x22, 0x1C, 0x00, 0x08, 0x2A, 0x1C, 0x2A, 0x08, 0x08, 0x08, 0x3E, 0x08, 0x08,
    0x00, 0x50, 0x30, 0x00, 0x00, 0x08, 0x08, 0x08, 0x08, 0x08, 0x00, 0x60, 0x60, 0x00, 0x00,
    0x20, 0x10, 0x08, 0x04, 0x02, 0x3E, 0x51, 0x49, 0x45, 0x3E, 0x00, 0x42, 0x7F, 0x40, 0x00,
    0x42, 0x61, 0x51, 0x49, 0x46, 0x21, 0x41, 0x45, 0x4B, 0x31, 0x18, 0x14, 0x12, 0x7F, 0x10,
    0x27, 0x45, 0x45, 0x45, 0x39, 0x3C, 0x4A, 0x49, 0x49, 0x30, 0x01, 0x71, 0x09, 0x05, 0x03,
    0x36, 0x49, 0x49, 0x49, 0x36, 0x06, 0x49, 0x49, 0x29, 0x1E, 0x00, 0x36, 0x36, 0x00, 0x00,
    0x00, 0x56, 0x36, 0x00, 0x00, 0x08, 0x14, 0x22, 0x41, 0x00, 0x14, 0x14, 0x14, 0x14, 0x14,
    0x00, 0x41, 0x22, 0x14, 0x08, 0x02, 0x01, 0x51, 0x09, 0x06, 0x32, 0x49, 0x79, 0x41, 0x3E,
    0x7E, 0x11, 0x11, 0x11, 0x7E, 0x7F, 0x49, 0x49, 0x49, 0x36, 0x3E, 0x41, 0x41, 0x41, 0x22,
    0x7F, 0x41, 0x41, 0x22, 0x1C, 0x7F, 0x49, 0x49, 0x49, 0x41, 0x7F, 0x09, 0x09, 0x01, 0x01,
    0x3E, 0x41, 0x41, 0x51, 0x32, 0x7F, 0x08, 0x08, 0x08, 0x7F, 0x00, 0x41, 0x7F, 0x41, 0x00,
    0x20, 0x40, 0x41, 0x3F, 0x01, 0x7F, 0x08, 0x14, 0x22, 0x41, 0x7F, 0x40, 0x40, 0x40, 0x40,
    0x7F, 0x02, 0x04, 0x02, 0x7F, 0x7F, 0x04, 0x08, 0x10, 0x7F, 0x3E, 0x41, 0x41, 0x41, 0x3E,
    0x7F, 0x09, 0x09, 0x09, 0x06, 0x3E, 0x41, 0x51, 0x21, 0x5E, 0x7F, 0x09, 0x19, 0x29, 0x46,
    0x46, 0x49, 0x49, 0x49, 0x31, 0x01, 0x01, 0x7F, 0x01, 0x01, 0x3F, 0x40, 0x40, 0x40, 0x3F,
    0x1F, 0x20, 0x40, 0x20, 0x1F, 0x7F, 0x20, 0x18, 0x20, 0x7F, 0x63, 0x14, 0x08, 0x14, 0x63,
    0x03, 0x04, 0x78, 0x04, 0x03, 0x61, 0x51, 0x49, 0x45, 0x43, 0x00, 0x00, 0x7F, 0x41, 0x41,
    0x02, 0x04, 0x08, 0x10, 0x20, 0x41, 0x41, 0x7F, 0x00, 0x00, 0x04, 0x02, 0x01, 0x02, 0x04,
    0x40, 0x40, 0x40, 0x40, 0x40, 0x00, 0x01, 0x02, 0x04, 0x00, 0x20, 0x54, 0x54, 0x54, 0x78,
    0x7F, 0x48, 0x44, 0x44, 0x38, 0x38, 0x44, 0x44, 0x44, 0x20, 0x38, 0x44, 0x44, 0x48, 0x7F,
    0x38, 0x54, 0x54, 0x54, 0x18, 0x08, 0x7E, 0x09, 0x01, 0x02, 0x08, 0x14, 0x54, 0x54, 0x3C,
    0x7F, 0x08, 0x04, 0x04, 0x78, 0x00, 0x44, 0x7D, 0x40, 0x00, 0x20, 0x40, 0x44, 0x3D, 0x00,
    0x00, 0x7F, 0x10, 0x28, 0x44, 0x00, 0x41, 0x7F, 0x40, 0x00, 0x7C, 0x04, 0x18, 0x04, 0x78,
    0x7C, 0x08, 0x04, 0x04, 0x78, 0x38, 0x44, 0x44, 0x44, 0x38, 0x7C, 0x14, 0x14, 0x14, 0x08,
    0x08, 0x14, 0x14, 0x18, 0x7C, 0x7C, 0x08, 0x04, 0x04, 0x08, 0x48, 0x54, 0x54, 0x54, 0x20,
    0x04, 0x3F, 0x44, 0x40, 0x20, 0x3C, 0x40, 0x40, 0x20, 0x7C, 0x1C, 0x20, 0x40, 0x20, 0x1C,
    0x3C, 0x40, 0x30, 0x40, 0x3C, 0x44, 0x28, 0x10, 0x28, 0x44, 0x0C, 0x50, 0x50, 0x50, 0x3C,
    0x44, 0x64, 0x54, 0x4C, 0x44, 0x00, 0x08, 0x36, 0x41, 0x00, 0x00, 0x00, 0x7F, 0x00, 0x00,
    0x00, 0x41, 0x36, 0x08, 0x00, 0x10, 0x08, 0x08, 0x10, 0x08,
];

pub(crate) static AWTRIX_BITMAPS: [u8; 175] = [
    0xE8, 0xB4, 0xBE, 0xFA, 0x79, 0x3C, 0x85, 0x42, 0x55, 0x56, 0xC0, 0x6A, 0x40, 0x95, 0x80,
    0xAA, 0x80, 0x5D, 0x00, 0x60, 0xE0, 0x80, 0x25, 0x48, 0xF6, 0xDE, 0x59, 0x2E, 0xE7, 0xCE,
    0xE7, 0x9E, 0xB7, 0x92, 0xF3, 0x9E, 0xF3, 0xDE, 0xE4, 0x92, 0xF7, 0xDE, 0xF7, 0x9E, 0xA0,
    0x46, 0x2A, 0x22, 0xE3, 0x80, 0x88, 0xA8, 0xE5, 0x84, 0x57, 0xC6, 0x57, 0xDA, 0xD7, 0x5C,
    0x72, 0x46, 0xD6, 0xDC, 0xF3, 0xCE, 0xF3, 0xC8, 0x72, 0xD6, 0xB7, 0xDA, 0xE9, 0x2E, 0x24,
    0xD4, 0xB7, 0x5A, 0x92, 0x4E, 0xBF, 0xDA, 0xD6, 0xDA, 0x56, 0xD4, 0xD7, 0x48, 0x56, 0xE6,
    0xD7, 0x5A, 0x71, 0x1C, 0xE9, 0x24, 0xB6, 0xDE, 0xB6, 0xD4, 0xB7, 0xFA, 0xB5, 0x5A, 0xB5,
    0x24, 0xE5, 0x4E, 0xEA, 0xC0, 0x91, 0x12, 0xD5, 0xC0, 0x54, 0xE0, 0x90, 0x57, 0xDA, 0xD7,
    0x5C, 0x72, 0x46, 0xD6, 0xDC, 0xF3, 0xCE, 0xF3, 0xC8, 0x72, 0xD6, 0xB7, 0xDA, 0xE9, 0x2E,
    0x24, 0xD4, 0xB7, 0x5A, 0x92, 0x4E, 0xBF, 0xDA, 0xD6, 0xDA, 0x56, 0xD4, 0xD7, 0x48, 0x56,
    0xE6, 0xD7, 0x5A, 0x71, 0x1C, 0xE9, 0x24, 0xB6, 0xDE, 0xB6, 0xD4, 0xB7, 0xFA, 0xB5, 0x5A,
    0xB5, 0x24, 0xE5, 0x4E, 0x6B, 0x26, 0xF8, 0xC9, 0xAC, 0x78,
];

pub(crate) static AWTRIX_GLYPHS: [AtlasGlyph; 95] = [
    AtlasGlyph { offset: 0, width: 0, height: 0, advance: 2, x_offset: 0, y_offset: 0 }, // ' '
    AtlasGlyph { offset: 0, width: 1, height: 5, advance: 2, x_offset: 0, y_offset: -5 }, // '!'
    AtlasGlyph { offset: 1, width: 3, height: 2, advance: 4, x_offset: 0, y_offset: -5 }, // '"'
    AtlasGlyph { offset: 2, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '#'
    AtlasGlyph { offset: 4, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '$'
    AtlasGlyph { offset: 6, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '%'
    AtlasGlyph { offset: 8, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '&'
    AtlasGlyph { offset: 10, width: 1, height: 2, advance: 2, x_offset: 0, y_offset: -5 }, // "'"
    AtlasGlyph { offset: 11, width: 2, height: 5, advance: 3, x_offset: 0, y_offset: -5 }, // '('
    AtlasGlyph { offset: 13, width: 2, height: 5, advance: 3, x_offset: 0, y_offset: -5 }, // ')'
    AtlasGlyph { offset: 15, width: 3, height: 3, advance: 4, x_offset: 0, y_offset: -5 }, // '*'
    AtlasGlyph { offset: 17, width: 3, height: 3, advance: 4, x_offset: 0, y_offset: -4 }, // '+'
    AtlasGlyph { offset: 19, width: 2, height: 2, advance: 3, x_offset: 0, y_offset: -2 }, // ','
    AtlasGlyph { offset: 20, width: 3, height: 1, advance: 4, x_offset: 0, y_offset: -3 }, // '-'
    AtlasGlyph { offset: 21, width: 1, height: 1, advance: 2, x_offset: 0, y_offset: -1 }, // '.'
    AtlasGlyph { offset: 22, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '/'
    AtlasGlyph { offset: 24, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '0'
    AtlasGlyph { offset: 26, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '1'
    AtlasGlyph { offset: 28, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '2'
    AtlasGlyph { offset: 30, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '3'
    AtlasGlyph { offset: 32, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '4'
    AtlasGlyph { offset: 34, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '5'
    AtlasGlyph { offset: 36, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '6'
    AtlasGlyph { offset: 38, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '7'
    AtlasGlyph { offset: 40, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '8'
    AtlasGlyph { offset: 42, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '9'
    AtlasGlyph { offset: 44, width: 1, height: 3, advance: 2, x_offset: 0, y_offset: -4 }, // ':'
    AtlasGlyph { offset: 45, width: 2, height: 4, advance: 3, x_offset: 0, y_offset: -4 }, // ';'
    AtlasGlyph { offset: 46, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '<'
    AtlasGlyph { offset: 48, width: 3, height: 3, advance: 4, x_offset: 0, y_offset: -4 }, // '='
    AtlasGlyph { offset: 50, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '>'
    AtlasGlyph { offset: 52, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '?'
    AtlasGlyph { offset: 54, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '@'
    AtlasGlyph { offset: 56, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'A'
    AtlasGlyph { offset: 58, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'B'
    AtlasGlyph { offset: 60, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'C'
    AtlasGlyph { offset: 62, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'D'
    AtlasGlyph { offset: 64, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'E'
    AtlasGlyph { offset: 66, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'F'
    AtlasGlyph { offset: 68, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'G'
    AtlasGlyph { offset: 70, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'H'
    AtlasGlyph { offset: 72, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'I'
    AtlasGlyph { offset: 74, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'J'
    AtlasGlyph { offset: 76, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'K'
    AtlasGlyph { offset: 78, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'L'
    AtlasGlyph { offset: 80, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'M'
    AtlasGlyph { offset: 82, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'N'
    AtlasGlyph { offset: 84, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'O'
    AtlasGlyph { offset: 86, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'P'
    AtlasGlyph { offset: 88, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'Q'
    AtlasGlyph { offset: 90, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'R'
    AtlasGlyph { offset: 92, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'S'
    AtlasGlyph { offset: 94, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'T'
    AtlasGlyph { offset: 96, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'U'
    AtlasGlyph { offset: 98, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'V'
    AtlasGlyph { offset: 100, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'W'
    AtlasGlyph { offset: 102, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'X'
    AtlasGlyph { offset: 104, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'Y'
    AtlasGlyph { offset: 106, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'Z'
    AtlasGlyph { offset: 108, width: 2, height: 5, advance: 3, x_offset: 0, y_offset: -5 }, // '['
    AtlasGlyph { offset: 110, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '\\'
    AtlasGlyph { offset: 112, width: 2, height: 5, advance: 3, x_offset: 0, y_offset: -5 }, // ']'
    AtlasGlyph { offset: 114, width: 3, height: 2, advance: 4, x_offset: 0, y_offset: -5 }, // '^'
    AtlasGlyph { offset: 115, width: 3, height: 1, advance: 4, x_offset: 0, y_offset: -1 }, // '_'
    AtlasGlyph { offset: 116, width: 2, height: 2, advance: 3, x_offset: 0, y_offset: -5 }, // '`'
    AtlasGlyph { offset: 117, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'a'
    AtlasGlyph { offset: 119, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'b'
    AtlasGlyph { offset: 121, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'c'
    AtlasGlyph { offset: 123, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'd'
    AtlasGlyph { offset: 125, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'e'
    AtlasGlyph { offset: 127, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'f'
    AtlasGlyph { offset: 129, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'g'
    AtlasGlyph { offset: 131, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'h'
    AtlasGlyph { offset: 133, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'i'
    AtlasGlyph { offset: 135, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'j'
    AtlasGlyph { offset: 137, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'k'
    AtlasGlyph { offset: 139, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'l'
    AtlasGlyph { offset: 141, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'm'
    AtlasGlyph { offset: 143, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'n'
    AtlasGlyph { offset: 145, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'o'
    AtlasGlyph { offset: 147, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'p'
    AtlasGlyph { offset: 149, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'q'
    AtlasGlyph { offset: 151, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'r'
    AtlasGlyph { offset: 153, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 's'
    AtlasGlyph { offset: 155, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 't'
    AtlasGlyph { offset: 157, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'u'
    AtlasGlyph { offset: 159, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'v'
    AtlasGlyph { offset: 161, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'w'
    AtlasGlyph { offset: 163, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'x'
    AtlasGlyph { offset: 165, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'y'
    AtlasGlyph { offset: 167, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // 'z'
    AtlasGlyph { offset: 169, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '{'
    AtlasGlyph { offset: 171, width: 1, height: 5, advance: 2, x_offset: 0, y_offset: -5 }, // '|'
    AtlasGlyph { offset: 172, width: 3, height: 5, advance: 4, x_offset: 0, y_offset: -5 }, // '}'
    AtlasGlyph { offset: 174, width: 3, height: 2, advance: 4, x_offset: 0, y_offset: -4 }, // '~'
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_cover_printable_ascii() {
        let count = (LAST_CHAR - FIRST_CHAR + 1) as usize;
        assert_eq!(FONT_3X5.len(), count * 3);
        assert_eq!(FONT_5X7.len(), count * 5);
        assert_eq!(AWTRIX_GLYPHS.len(), count);
    }

    #[test]
    fn atlas_offsets_stay_inside_bitmap() {
        for g in AWTRIX_GLYPHS.iter() {
            let bytes = ((g.width * g.height) as usize).div_ceil(8);
            assert!(g.offset + bytes <= AWTRIX_BITMAPS.len());
        }
    }

    #[test]
    fn unknown_font_names_fall_back_to_5x7() {
        assert_eq!(FontId::from("3x5".to_string()), FontId::Small3x5);
        assert_eq!(FontId::from("awtrix".to_string()), FontId::Awtrix);
        assert_eq!(FontId::from("comic".to_string()), FontId::Medium5x7);
    }

    #[test]
    fn atlas_lookup_rejects_non_ascii() {
        assert!(atlas_glyph('A').is_some());
        assert!(atlas_glyph('\u{7f}').is_none());
        assert!(atlas_glyph('ł').is_none());
    }
}
