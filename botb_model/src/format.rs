//! Module containing models for entry formats

use crate::de;
use serde_derive::Deserialize;
use std::fmt::{Display, Formatter};

/// Medium a format belongs to. Not to be confused with the format itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    Other,
    Audio,
    Visual,
}

/// Struct representing a format, e.g. `chiptune` or `pixel`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Format {
    /// ID of the format.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub id: u64,

    /// Title of the format.
    pub title: String,

    /// Short, lowercase identifier used in lieu of the ID in many APIs.
    pub token: String,

    /// Short description of the format.
    pub description: String,

    /// HTML representation of the icon; likely of no use to implementations.
    pub icon: String,

    /// Direct URL to the icon for this format.
    pub icon_url: String,

    /// Medium the format belongs to.
    pub medium: Medium,

    /// Maximum file size in bytes.
    ///
    /// ## BotB internals:
    /// Some values are malformed and carry stray unicode characters around
    /// the number; see [`de::lenient_int`].
    #[serde(deserialize_with = "de::lenient_int")]
    pub maxfilesize: i64,

    /// Maximum file size in a human-readable format.
    pub maxfilesize_human: String,

    /// Which class this format awards points of.
    pub point_class: String,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Format({} ({}), id {})", self.title, self.token, self.id)
    }
}
