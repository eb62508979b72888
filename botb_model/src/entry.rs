//! Module containing models for battle entries

use crate::{battle::Battle, botbr::BotBr, de, format::{Format, Medium}};
use chrono::NaiveDateTime;
use serde_derive::Deserialize;
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// An entry author, as returned in the `authors` field of the entry API.
///
/// This is a trimmed-down view of a [`BotBr`] with a few entry-specific
/// extras (avatar at submission time, country).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntryAuthor {
    /// The author's BotBr ID.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub id: u64,

    /// The author's username.
    pub name: String,

    /// Name of the aura PNG; see [`EntryAuthor::aura_url`].
    pub aura: String,

    /// Fallback color for the aura, as a `#rrggbb` hex value.
    pub aura_color: String,

    /// Relative URL to the author's current avatar (`/disk/...`).
    pub avatar: String,

    /// Relative URL to the author's avatar at the time the entry was
    /// submitted.
    pub avatar_from_time: String,

    /// The author's class.
    ///
    /// ## BotB internals:
    /// This field is called `class` in the API.
    #[serde(rename = "class")]
    pub botbr_class: String,

    /// HTML div for the class icon.
    pub class_icon: String,

    /// Country code of the author.
    pub country_code: String,

    /// Country name of the author.
    pub country_name: String,

    /// The author's current level.
    #[serde(deserialize_with = "de::u32_from_any")]
    pub level: u32,

    /// Full URL to the author's profile.
    pub profile_url: String,
}

impl EntryAuthor {
    /// URL to the aura PNG, derived from [`EntryAuthor::aura`].
    pub fn aura_url(&self) -> String {
        format!("https://battleofthebits.com/disk/botbr_auras/{}.png", self.aura)
    }
}

/// Struct representing a battle entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entry {
    /// ID of the entry.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub id: u64,

    /// The entry's title.
    pub title: String,

    /// List of authors for the entry.
    pub authors: Vec<EntryAuthor>,

    /// Names of all authors joined with a `" + "` symbol.
    pub authors_display: String,

    /// ID of the BotBr who submitted this entry.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub botbr_id: u64,

    /// The BotBr who submitted this entry.
    pub botbr: BotBr,

    /// ID of the battle this entry was submitted to.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub battle_id: u64,

    /// The battle this entry was submitted to.
    pub battle: Battle,

    /// Submission date and time of the entry.
    #[serde(deserialize_with = "de::datetime")]
    pub datetime: NaiveDateTime,

    /// The submission date in a human-readable format, as displayed on-site.
    pub datetime_display: String,

    /// Amount of downloads the entry has.
    ///
    /// ## BotB internals:
    /// The typo is deliberate; the API field really is called `donloads`.
    #[serde(deserialize_with = "de::u32_from_any")]
    pub donloads: u32,

    /// Relative URL to the entry source file, for downloading (deliberate
    /// typo again).
    pub donload_url: String,

    /// Amount of favorites the entry has.
    #[serde(deserialize_with = "de::u32_from_any")]
    pub favs: u32,

    /// Token of the entry's format.
    pub format_token: String,

    /// The entry's format.
    pub format: Format,

    #[serde(default, deserialize_with = "de::f64_from_any")]
    pub gov: f64,

    /// Whether the entry was submitted late.
    #[serde(deserialize_with = "de::bool_from_any")]
    pub late: bool,

    /// Amount of plays this entry has.
    #[serde(deserialize_with = "de::u32_from_any")]
    pub plays: u32,

    /// Amount of comments ("posts") under this entry.
    ///
    /// ## BotB internals:
    /// Some entries from 2009 have no attached comment thread, in which case
    /// the field is missing entirely and defaults to 0.
    #[serde(default, deserialize_with = "de::u32_from_any")]
    pub posts: u32,

    /// URL to the entry's page on the site.
    pub profile_url: String,

    #[serde(default, deserialize_with = "de::i64_from_any")]
    pub q: i64,

    /// Relative URL to the entry thumbnail; empty for entries without one
    /// (i.e. non-visual entries).
    #[serde(default)]
    pub thumbnail_url: String,

    /// Amount of votes this entry got.
    #[serde(deserialize_with = "de::u32_from_any")]
    pub votes: u32,

    /// URL to the player for the entry.
    pub view_url: String,

    /// Preview URL.
    pub preview_url: String,

    /// Length of the entry in seconds; only meaningful for audio entries.
    #[serde(default, deserialize_with = "de::f64_from_any")]
    pub length: f64,

    /// Relative player URL (`/player/Entry/{id}`). Absent for some non-audio
    /// and non-rendered entries.
    #[serde(default)]
    pub listen_url: Option<String>,

    /// Direct URL to the source file of an audio entry.
    ///
    /// ## BotB internals:
    /// The API returns the JSON literal `false` for non-audio entries; that
    /// becomes `None` here.
    #[serde(default, deserialize_with = "de::false_as_none")]
    pub play_url: Option<String>,

    /// YouTube URL for this entry, if any.
    #[serde(default)]
    pub youtube_url: Option<String>,

    /// Rank of the entry; only present once the battle is over.
    #[serde(default, deserialize_with = "de::opt_u32_from_any")]
    pub rank: Option<u32>,

    /// English ordinal suffix for the rank ("st" for 1st and so on); empty
    /// while the battle is running.
    #[serde(default)]
    pub rank_suffix: String,

    /// HTML representation of the rank; `?/{entry count}` while the battle
    /// is running.
    #[serde(default)]
    pub rank_display: String,

    /// Score of the entry; only present once the battle is over.
    #[serde(default, deserialize_with = "de::opt_f64_from_any")]
    pub score: Option<f64>,

    /// HTML representation of the score; empty while the battle is running.
    #[serde(default)]
    pub score_display: String,

    /// HTML representation of trophies this entry has, if any.
    #[serde(default)]
    pub trophy_display: Option<String>,

    // Medium markers; the API reports the medium through the *presence* of
    // one of these keys rather than a value. Consolidated by Entry::medium.
    #[serde(default)]
    medium_audio: Option<Value>,
    #[serde(default)]
    medium_visual: Option<Value>,
}

impl Entry {
    /// Medium of the entry.
    ///
    /// ## BotB internals:
    /// Consolidated from the `medium_audio`/`medium_visual` marker fields of
    /// the API; entries carrying neither are [`Medium::Other`].
    pub fn medium(&self) -> Medium {
        if self.medium_audio.is_some() {
            Medium::Audio
        } else if self.medium_visual.is_some() {
            Medium::Visual
        } else {
            Medium::Other
        }
    }

    /// Longhand for [`Entry::donloads`], for spelling convenience.
    pub fn downloads(&self) -> u32 {
        self.donloads
    }

    /// Longhand for [`Entry::donload_url`], for spelling convenience.
    pub fn download_url(&self) -> &str {
        &self.donload_url
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Entry({:?} by {}, format {}, battle {:?}, id {})",
            self.title, self.authors_display, self.format_token, self.battle.title, self.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Entry;
    use crate::format::Medium;
    use serde_json::json;

    fn payload() -> serde_json::Value {
        json!({
            "id": "401354",
            "title": "winter chip squared",
            "authors": [],
            "authors_display": "knurek",
            "botbr_id": 16333,
            "botbr": {
                "id": 16333,
                "name": "knurek",
                "aura": "00016333",
                "aura_color": "#7f9fbf",
                "avatar_url": "https://battleofthebits.com/disk/botbr_avatars/16333.png",
                "badge_levels": [],
                "boons": 1.25,
                "class": "mixist",
                "class_icon": "",
                "create_date": "2016-05-03",
                "laston_date": "2024-11-30",
                "level": 13,
                "palette_id": 2117,
                "points": 5430,
                "points_array": [],
                "profile_url": "https://battleofthebits.com/barracks/Profile/knurek/"
            },
            "battle_id": 4766,
            "battle": {
                "id": 4766,
                "title": "Winter Chip XIX",
                "url": "https://battleofthebits.com/arena/Battle/4766/",
                "profile_url": "https://battleofthebits.com/arena/Battle/4766/Winter+Chip+XIX/",
                "cover_art_url": "https://battleofthebits.com/disk/battle_covers/4766.png",
                "botbr_id": 1,
                "hosts_names": "puke7",
                "type": 0,
                "entry_count": 400,
                "start": "2023-12-21 00:00:00",
                "end": "2024-03-01 00:00:00"
            },
            "datetime": "2024-01-15 21:03:11",
            "datetime_display": "January 15th 2024",
            "donloads": "31",
            "donload_url": "/disk/entries/401354",
            "favs": 4,
            "format_token": "s3xmodit",
            "format": {
                "id": 9,
                "title": "S3XMODIT",
                "token": "s3xmodit",
                "description": "tracked module music",
                "icon": "",
                "icon_url": "https://battleofthebits.com/styles/icons/s3xmodit.png",
                "medium": "audio",
                "maxfilesize": 4194304,
                "maxfilesize_human": "4MB",
                "point_class": "chipist"
            },
            "gov": 0.0,
            "late": "0",
            "medium_audio": 1,
            "plays": 120,
            "profile_url": "https://battleofthebits.com/arena/Entry/401354/",
            "q": 0,
            "votes": 17,
            "view_url": "https://battleofthebits.com/player/Entry/401354/",
            "preview_url": "https://battleofthebits.com/player/Entry/401354/preview",
            "length": 154.2,
            "play_url": false
        })
    }

    #[test]
    fn medium_is_consolidated_from_marker_fields() {
        let entry: Entry = serde_json::from_value(payload()).unwrap();

        assert_eq!(entry.medium(), Medium::Audio);
        assert_eq!(entry.play_url, None);
        assert_eq!(entry.downloads(), 31);
        // 2009-era entries without a comment thread have no "posts" at all
        assert_eq!(entry.posts, 0);
        assert!(!entry.late);
    }
}

/// Link between a playlist and an entry, as returned by the
/// `playlist_to_entry` API.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaylistToEntry {
    /// ID of the playlist.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub playlist_id: u64,

    /// ID of the entry.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub entry_id: u64,
}
