//! Module containing models for color palettes

use crate::de;
use serde_derive::Deserialize;
use std::fmt::{Display, Formatter};

/// A five-color site palette made by a BotBr.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Palette {
    /// ID of the palette.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub id: u64,

    /// Title of the palette.
    pub title: String,

    /// ID of the BotBr who made the palette.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub botbr_id: u64,

    /// Color 1 (text), in hex format without `#` prefix.
    pub color1: String,

    /// Color 2 (link).
    pub color2: String,

    /// Color 3 (button).
    pub color3: String,

    /// Color 4 (box).
    pub color4: String,

    /// Color 5 (bottom).
    pub color5: String,
}

impl Palette {
    /// URL to a CSS file with the palette colors as `--colorX` (and
    /// `--colorX_r/_g/_b`) variables in a `:root` directive.
    pub fn css_url(&self) -> String {
        format!("https://battleofthebits.com/disk/palette_vars/{}", self.id)
    }
}

impl Display for Palette {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Palette({:?} by BotBr {}, id {})", self.title, self.botbr_id, self.id)
    }
}
