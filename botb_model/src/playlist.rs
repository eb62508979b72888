//! Module containing models for entry playlists

use crate::de;
use chrono::NaiveDate;
use serde_derive::Deserialize;
use std::fmt::{Display, Formatter};

/// A playlist of entries, curated by a BotBr.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Playlist {
    /// ID of the playlist.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub id: u64,

    /// ID of the BotBr who made the playlist.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub botbr_id: u64,

    /// Title of the playlist.
    pub title: String,

    /// Amount of entries in the playlist.
    #[serde(deserialize_with = "de::u32_from_any")]
    pub count: u32,

    /// Total runtime of entries with known lengths, in seconds.
    #[serde(deserialize_with = "de::i64_from_any")]
    pub runtime: i64,

    /// Date the playlist was created.
    #[serde(deserialize_with = "de::date")]
    pub date_create: NaiveDate,

    /// Date the playlist was last modified.
    #[serde(deserialize_with = "de::date")]
    pub date_modify: NaiveDate,

    /// Description of the playlist, if any.
    #[serde(default)]
    pub description: Option<String>,

    /// ID of the entry used as the thumbnail, if one is set.
    #[serde(default, deserialize_with = "opt_entry_id")]
    pub thumbnail_id: Option<u64>,
}

fn opt_entry_id<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    de::opt_u32_from_any(deserializer).map(|id| id.map(u64::from))
}

impl Display for Playlist {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Playlist({:?} by BotBr {}, {} items, id {})", self.title, self.botbr_id, self.count, self.id)
    }
}
