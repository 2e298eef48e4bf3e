use std::fmt;

/// 24-bit display color derived from an identity string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Polynomial rolling hash (`h = c + (h << 5) - h`) over UTF-16 code
/// units with signed 32-bit wraparound.
pub fn identity_hash(name: &str) -> i32 {
    name.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}

/// Stable avatar color for `name`. The empty string hashes to 0, i.e. black.
pub fn color_for(name: &str) -> HexColor {
    let hash = identity_hash(name);
    let channel = |shift: u32| ((hash >> shift) & 0xFF) as u8;
    HexColor {
        r: channel(0),
        g: channel(8),
        b: channel(16),
    }
}
