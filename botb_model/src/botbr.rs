//! Module containing models for BotBrs (site users)

use crate::de;
use chrono::NaiveDate;
use serde_derive::Deserialize;
use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
};

/// Badge tier a BotBr has unlocked for a given format.
///
/// ## BotB internals:
/// Transmitted as an integer in the `badge_levels` map. Badges are unlocked
/// by badge *progress* points (7/28/56/100), which are not exposed through
/// the official API.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BadgeLevel {
    /// No badge unlocked. Not actually used on-site.
    NotUnlocked,
    Regular,
    Bronze,
    Silver,
    Gold,
}

impl BadgeLevel {
    pub(crate) fn from_int(value: i64) -> Option<BadgeLevel> {
        Some(match value {
            0 => BadgeLevel::NotUnlocked,
            1 => BadgeLevel::Regular,
            2 => BadgeLevel::Bronze,
            3 => BadgeLevel::Silver,
            4 => BadgeLevel::Gold,
            _ => return None,
        })
    }
}

/// Struct representing a BotBr.
///
/// Fields directly match the object properties of the `botbr` API, except
/// where noted otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotBr {
    /// The BotBr's ID.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub id: u64,

    /// The BotBr's username.
    pub name: String,

    /// Name of the aura PNG for this BotBr; usually the BotBr ID zero-padded
    /// to 8 characters. See [`BotBr::aura_url`] for the full URL.
    pub aura: String,

    /// Fallback color for the aura, as a `#rrggbb` hex value.
    pub aura_color: String,

    /// URL to the BotBr's current avatar.
    pub avatar_url: String,

    /// Unlocked badge tier per format token.
    ///
    /// Not to be confused with badge *progress*; see [`BadgeLevel`].
    #[serde(deserialize_with = "badge_levels")]
    pub badge_levels: HashMap<String, BadgeLevel>,

    /// Amount of boons the BotBr currently has.
    #[serde(deserialize_with = "de::f64_from_any")]
    pub boons: f64,

    /// The class displayed next to the BotBr's level, derived on level-up
    /// from the highest entry in [`BotBr::points_array`].
    ///
    /// ## BotB internals:
    /// This field is called `class` in the API.
    #[serde(rename = "class")]
    pub botbr_class: String,

    /// HTML div for the class icon; likely of no use to implementations.
    pub class_icon: String,

    /// Date the account was created, in the US East Coast timezone
    /// (as all dates on-site).
    #[serde(deserialize_with = "de::date")]
    pub create_date: NaiveDate,

    /// Date the BotBr was last seen on the site.
    #[serde(deserialize_with = "de::date")]
    pub laston_date: NaiveDate,

    /// The BotBr's current level.
    #[serde(deserialize_with = "de::u32_from_any")]
    pub level: u32,

    /// ID of the palette used by the BotBr.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub palette_id: u64,

    /// Total points amassed by the BotBr; always >= 0.
    #[serde(deserialize_with = "de::i64_from_any")]
    pub points: i64,

    /// Points per class name.
    ///
    /// ## BotB internals:
    /// Some old BotBrs have lowercase class names in here, counted
    /// separately, and individual counts may be negative (e.g. latist
    /// points). Empty maps arrive as `[]`, see [`de::int_map_or_empty_list`].
    #[serde(deserialize_with = "de::int_map_or_empty_list")]
    pub points_array: HashMap<String, i64>,

    /// URL to the BotBr's profile.
    pub profile_url: String,
}

impl BotBr {
    /// URL to the aura PNG, derived from [`BotBr::aura`].
    pub fn aura_url(&self) -> String {
        format!("https://battleofthebits.com/disk/botbr_auras/{}.png", self.aura)
    }
}

impl Display for BotBr {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "BotBr({}, level {} {}, id {})", self.name, self.level, self.botbr_class, self.id)
    }
}

fn badge_levels<'de, D>(deserializer: D) -> Result<HashMap<String, BadgeLevel>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw = de::int_map_or_empty_list(deserializer)?;
    let mut out = HashMap::with_capacity(raw.len());

    for (format, value) in raw {
        let level = BadgeLevel::from_int(value)
            .ok_or_else(|| D::Error::custom(format!("unknown badge level {}", value)))?;

        out.insert(format, level);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{BadgeLevel, BotBr};
    use serde_json::json;

    #[test]
    fn deserialize_botbr() {
        let botbr: BotBr = serde_json::from_value(json!({
            "id": "16333",
            "name": "knurek",
            "aura": "00016333",
            "aura_color": "#7f9fbf",
            "avatar_url": "https://battleofthebits.com/disk/botbr_avatars/16333.png",
            "badge_levels": {"mixist": 1, "chipist": "2"},
            "boons": "12.5",
            "class": "mixist",
            "class_icon": "<div class=\"icon\"></div>",
            "create_date": "2016-05-03",
            "laston_date": "2024-11-30",
            "level": 13,
            "palette_id": 2117,
            "points": "5430",
            "points_array": [],
            "profile_url": "https://battleofthebits.com/barracks/Profile/knurek/"
        }))
        .unwrap();

        assert_eq!(botbr.id, 16333);
        assert_eq!(botbr.badge_levels["chipist"], BadgeLevel::Bronze);
        assert!(botbr.points_array.is_empty());
        assert_eq!(botbr.aura_url(), "https://battleofthebits.com/disk/botbr_auras/00016333.png");
    }
}
