//! Symbol and color constants shared by effects.

use glyphfall_core::Color;

/// Glyphs shown by falling rain drops.
pub const RAIN_SYMBOLS: &[char] = &['o', '.', ',', '*', '|'];

/// Blues used for rain drops before they fade into their final color.
pub const RAIN_COLORS: &[Color] = &[
    Color::Rgb(0x00, 0x31, 0x5c),
    Color::Rgb(0x00, 0x4c, 0x8f),
    Color::Rgb(0x00, 0x75, 0xdb),
    Color::Rgb(0x37, 0x78, 0xff),
    Color::Rgb(0x37, 0xa0, 0xff),
];
