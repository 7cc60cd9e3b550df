//! The fixed Piet color palette: hue and brightness axes, pixel
//! classification, and the cyclic deltas instruction decoding is built on.

use serde::{Deserialize, Serialize};

/// Hue axis of the palette. Black and white are achromatic markers, not
/// positions on the hue cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hue {
    /// Achromatic black
    Black,
    /// Red
    Red,
    /// Yellow
    Yellow,
    /// Green
    Green,
    /// Cyan
    Cyan,
    /// Blue
    Blue,
    /// Magenta
    Magenta,
    /// Achromatic white
    White,
    /// Off-palette pixel
    Unknown,
}

impl Hue {
    /// Position on the six-step hue cycle red -> yellow -> green -> cyan ->
    /// blue -> magenta, or `None` for achromatic/unknown hues.
    pub fn cycle_index(self) -> Option<i32> {
        match self {
            Hue::Red => Some(0),
            Hue::Yellow => Some(1),
            Hue::Green => Some(2),
            Hue::Cyan => Some(3),
            Hue::Blue => Some(4),
            Hue::Magenta => Some(5),
            _ => None,
        }
    }
}

/// Brightness axis of the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Brightness {
    /// Achromatic white
    White,
    /// Light shade
    Light,
    /// Normal shade
    Normal,
    /// Dark shade
    Dark,
    /// Achromatic black
    Black,
    /// Off-palette pixel
    Unknown,
}

impl Brightness {
    /// Position on the three-step brightness cycle light -> normal -> dark,
    /// or `None` for achromatic/unknown brightness.
    pub fn cycle_index(self) -> Option<i32> {
        match self {
            Brightness::Light => Some(0),
            Brightness::Normal => Some(1),
            Brightness::Dark => Some(2),
            _ => None,
        }
    }
}

/// One codel color: a (hue, brightness) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Hue component
    pub hue: Hue,
    /// Brightness component
    pub brightness: Brightness,
}

/// The obstruction color
pub const BLACK: Color = Color {
    hue: Hue::Black,
    brightness: Brightness::Black,
};

/// The free-slide color
pub const WHITE: Color = Color {
    hue: Hue::White,
    brightness: Brightness::White,
};

/// The classification for any pixel outside the palette
pub const UNKNOWN: Color = Color {
    hue: Hue::Unknown,
    brightness: Brightness::Unknown,
};

impl Color {
    /// Creates a color from its two components
    pub fn new(hue: Hue, brightness: Brightness) -> Self {
        Color { hue, brightness }
    }

    /// True for exactly the black/black pair
    pub fn is_black(self) -> bool {
        self.hue == Hue::Black && self.brightness == Brightness::Black
    }

    /// True for exactly the white/white pair
    pub fn is_white(self) -> bool {
        self.hue == Hue::White && self.brightness == Brightness::White
    }

    /// True for black, white or unknown
    pub fn is_achromatic(self) -> bool {
        !self.is_colored()
    }

    /// True for the 18 chromatic palette entries
    pub fn is_colored(self) -> bool {
        self.hue.cycle_index().is_some() && self.brightness.cycle_index().is_some()
    }

    /// True for cells a traversal can never pass through: black and any
    /// unrecognized pixel. Unknown is never a free-slide cell.
    pub fn is_obstruction(self) -> bool {
        !self.is_colored() && !self.is_white()
    }

    /// Classifies an RGB triple against the palette. Each channel must be
    /// one of 0x00, 0xC0, 0xFF and the triple must be one of the 20 palette
    /// entries; everything else maps to [`UNKNOWN`].
    pub fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        let level = |channel: u8| -> Option<u32> {
            match channel {
                0x00 => Some(0),
                0xC0 => Some(1),
                0xFF => Some(2),
                _ => None,
            }
        };
        let (r, g, b) = match (level(red), level(green), level(blue)) {
            (Some(r), Some(g), Some(b)) => (r, g, b),
            _ => return UNKNOWN,
        };
        use Brightness as Br;
        match r + g * 3 + b * 9 {
            0 => BLACK,                                     // 000000
            1 => Color::new(Hue::Red, Br::Dark),            // C00000
            2 => Color::new(Hue::Red, Br::Normal),          // FF0000
            3 => Color::new(Hue::Green, Br::Dark),          // 00C000
            4 => Color::new(Hue::Yellow, Br::Dark),         // C0C000
            6 => Color::new(Hue::Green, Br::Normal),        // 00FF00
            8 => Color::new(Hue::Yellow, Br::Normal),       // FFFF00
            9 => Color::new(Hue::Blue, Br::Dark),           // 0000C0
            10 => Color::new(Hue::Magenta, Br::Dark),       // C000C0
            12 => Color::new(Hue::Cyan, Br::Dark),          // 00C0C0
            14 => Color::new(Hue::Red, Br::Light),          // FFC0C0
            16 => Color::new(Hue::Green, Br::Light),        // C0FFC0
            17 => Color::new(Hue::Yellow, Br::Light),       // FFFFC0
            18 => Color::new(Hue::Blue, Br::Normal),        // 0000FF
            20 => Color::new(Hue::Magenta, Br::Normal),     // FF00FF
            22 => Color::new(Hue::Blue, Br::Light),         // C0C0FF
            23 => Color::new(Hue::Magenta, Br::Light),      // FFC0FF
            24 => Color::new(Hue::Cyan, Br::Normal),        // 00FFFF
            25 => Color::new(Hue::Cyan, Br::Light),         // C0FFFF
            26 => WHITE,                                    // FFFFFF
            _ => UNKNOWN,
        }
    }
}

/// Forward cyclic hue distance between two chromatic colors, in 0..6.
/// `None` if either endpoint is achromatic.
pub fn hue_delta(from: Color, to: Color) -> Option<i32> {
    let a = from.hue.cycle_index()?;
    let b = to.hue.cycle_index()?;
    Some((b - a).rem_euclid(6))
}

/// Forward cyclic brightness distance between two chromatic colors, in 0..3.
/// `None` if either endpoint is achromatic.
pub fn brightness_delta(from: Color, to: Color) -> Option<i32> {
    let a = from.brightness.cycle_index()?;
    let b = to.brightness.cycle_index()?;
    Some((b - a).rem_euclid(3))
}
