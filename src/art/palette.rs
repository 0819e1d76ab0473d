use std::fmt;

/// Opaque sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Fully opaque RGBA8 pixel.
    pub const fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Fill used for mechanics missing from the table.
pub const DEFAULT_MECHANIC_COLOR: Rgb = Rgb::from_hex(0xFFFFFF);

const MECHANIC_COLORS: &[(&str, Rgb)] = &[
    ("GAME_OVER", Rgb::from_hex(0x333333)),
    ("SAVE_LIFE", Rgb::from_hex(0x99CC00)),
    ("ATTACK_2X", Rgb::from_hex(0xFFCC00)),
    ("SKIP_1X", Rgb::from_hex(0x0099CC)),
    ("STEAL_CHOSEN", Rgb::from_hex(0x666666)),
    ("SHUFFLE", Rgb::from_hex(0xCC9966)),
    ("PEEK_3", Rgb::from_hex(0xFF66CC)),
    ("CANCEL", Rgb::from_hex(0xCC3300)),
    ("VANILLA", Rgb::from_hex(0xEFEFEF)),
];

/// Fallback art color for a mechanic id.
pub fn mechanic_color(mechanic_id: &str) -> Rgb {
    MECHANIC_COLORS
        .iter()
        .find(|(id, _)| *id == mechanic_id)
        .map(|(_, c)| *c)
        .unwrap_or(DEFAULT_MECHANIC_COLOR)
}

#[cfg(test)]
#[path = "../../tests/unit/art/palette.rs"]
mod tests;
