//! Colors, xterm-256 downsampling and HSL helpers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use ratatui::style::Color as TermColor;

use crate::error::CoreError;

/// Channel levels of the 6x6x6 xterm color cube.
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// RGB values of the 16 system colors (xterm defaults).
const SYSTEM_COLORS: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (128, 0, 0),
    (0, 128, 0),
    (128, 128, 0),
    (0, 0, 128),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
    (128, 128, 128),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (0, 0, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

/// A color as written in effect configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// A 24-bit color.
    Rgb(u8, u8, u8),
    /// An index into the xterm-256 palette.
    Xterm(u8),
}

impl Color {
    /// Resolve this color to RGB channels.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Rgb(r, g, b) => (r, g, b),
            Color::Xterm(index) => xterm_to_rgb(index),
        }
    }

    /// Scale the lightness of this color by `factor`, keeping hue and saturation.
    pub fn adjust_brightness(self, factor: f32) -> Color {
        let (r, g, b) = self.rgb();
        let (h, s, l) = rgb_to_hsl(r, g, b);
        hsl_to_rgb(h, s, (l * factor).clamp(0.0, 1.0))
    }

    /// Linearly blend towards `other`; `t` is clamped to `0.0..=1.0`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let (r1, g1, b1) = self.rgb();
        let (r2, g2, b2) = other.rgb();
        Color::Rgb(lerp_u8(r1, r2, t), lerp_u8(g1, g2, t), lerp_u8(b1, b2, t))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Color::Xterm(index) => write!(f, "{index}"),
        }
    }
}

impl FromStr for Color {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidColor(s.to_string());
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
            };
            return Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }
        if !trimmed.starts_with('#') {
            if let Ok(index) = trimmed.parse::<u8>() {
                return Ok(Color::Xterm(index));
            }
        }
        Err(invalid())
    }
}

/// How colors are written to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// 24-bit RGB escapes.
    #[default]
    TrueColor,
    /// Every color is downsampled to the nearest xterm-256 index.
    Xterm256,
    /// Colors are dropped; only symbols and attributes are drawn.
    NoColor,
}

impl ColorMode {
    /// Convert a color for output in this mode.
    pub fn resolve(self, color: Color, cache: &XtermCache) -> Option<TermColor> {
        match (self, color) {
            (ColorMode::NoColor, _) => None,
            (ColorMode::TrueColor, Color::Rgb(r, g, b)) => Some(TermColor::Rgb(r, g, b)),
            (_, Color::Xterm(index)) => Some(TermColor::Indexed(index)),
            (ColorMode::Xterm256, rgb) => Some(TermColor::Indexed(cache.xterm_index(rgb))),
        }
    }
}

impl FromStr for ColorMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truecolor" | "24bit" | "rgb" => Ok(ColorMode::TrueColor),
            "xterm256" | "256" | "xterm" => Ok(ColorMode::Xterm256),
            "none" | "no_color" | "nocolor" => Ok(ColorMode::NoColor),
            _ => Err(CoreError::InvalidColorMode(s.to_string())),
        }
    }
}

/// Shared memoization table for RGB to xterm-256 lookups.
///
/// Cloning the handle shares the table. One cache is created per process and
/// handed to every engine `Terminal` that renders in xterm mode.
#[derive(Debug, Clone, Default)]
pub struct XtermCache {
    table: Rc<RefCell<HashMap<(u8, u8, u8), u8>>>,
}

/// Handles are equal when they share one table.
impl PartialEq for XtermCache {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.table, &other.table)
    }
}

impl XtermCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the xterm-256 index nearest to `color`.
    pub fn xterm_index(&self, color: Color) -> u8 {
        let rgb = match color {
            Color::Xterm(index) => return index,
            Color::Rgb(r, g, b) => (r, g, b),
        };
        if let Some(index) = self.table.borrow().get(&rgb) {
            return *index;
        }
        let index = nearest_xterm(rgb);
        self.table.borrow_mut().insert(rgb, index);
        index
    }

    /// Number of memoized colors.
    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }

    /// Whether nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.table.borrow().is_empty()
    }
}

/// RGB value of an xterm-256 palette index.
fn xterm_to_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        0..=15 => SYSTEM_COLORS[index as usize],
        16..=231 => {
            let offset = index - 16;
            (
                CUBE_LEVELS[(offset / 36) as usize],
                CUBE_LEVELS[((offset % 36) / 6) as usize],
                CUBE_LEVELS[(offset % 6) as usize],
            )
        }
        232..=255 => {
            let v = 8 + (index - 232) * 10;
            (v, v, v)
        }
    }
}

/// Nearest palette entry, ignoring the user-configurable system colors.
fn nearest_xterm((r, g, b): (u8, u8, u8)) -> u8 {
    let distance = |index: u8| {
        let (pr, pg, pb) = xterm_to_rgb(index);
        let dr = r as i32 - pr as i32;
        let dg = g as i32 - pg as i32;
        let db = b as i32 - pb as i32;
        dr * dr + dg * dg + db * db
    };
    (16..=255u8).min_by_key(|&index| distance(index)).unwrap_or(16)
}

fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 * (1.0 - t) + b as f64 * t).round() as u8
}

/// Convert RGB channels to HSL (hue in degrees, saturation and lightness 0-1).
fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h * 60.0, s, l)
}

/// Convert HSL to an RGB color.
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color {
    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return Color::Rgb(v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = h / 360.0;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Color::Rgb(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
