//! Module containing models for battles

use crate::de;
use chrono::NaiveDateTime;
use serde_derive::Deserialize;
use std::fmt::{Display, Formatter};

/// Phase a battle is currently in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattlePeriod {
    /// Upcoming battle.
    Warmup,

    /// Entries are being accepted.
    Entry,

    /// Voting is open.
    Vote,

    /// Votes are being tallied.
    ///
    /// ## BotB internals:
    /// Never actually transmitted: battles in the tally period have no
    /// `period` property at all, only a `period_end`. [`Battle::period`]
    /// reconstructs this variant from that combination.
    Tally,

    /// Battle has ended.
    End,
}

/// Struct representing a battle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Battle {
    /// ID of the battle.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub id: u64,

    /// Title of the battle.
    pub title: String,

    /// URL to the battle page.
    pub url: String,

    /// URL to the entry list page of the battle.
    pub profile_url: String,

    /// Full URL to the battle cover art.
    pub cover_art_url: String,

    /// ID of the hosting BotBr. Battles with multiple hosts have this set
    /// to 1; see [`Battle::hosts_names`].
    #[serde(deserialize_with = "de::u64_from_any")]
    pub botbr_id: u64,

    /// Names of all battle hosts, joined with a `" + "` sign.
    pub hosts_names: String,

    /// The battle's type attribute.
    ///
    /// ## BotB internals:
    /// The value 3 marks an XHB; every other value is some flavor of major
    /// (0/1 for most majors, 2 for some themed ones, and a few one-offs).
    #[serde(rename = "type", deserialize_with = "de::i64_from_any")]
    pub battle_type: i64,

    /// Amount of entries submitted.
    #[serde(default, deserialize_with = "de::u32_from_any")]
    pub entry_count: u32,

    /// Date and time at which the battle starts.
    #[serde(deserialize_with = "de::datetime")]
    pub start: NaiveDateTime,

    /// Date and time at which the battle ends. During the voting period this
    /// is the end of voting instead.
    #[serde(deserialize_with = "de::datetime")]
    pub end: NaiveDateTime,

    /// Format tokens for this battle; one entry for XHBs, possibly more for
    /// majors.
    #[serde(default)]
    pub format_tokens: Vec<String>,

    // Raw period value; battles in the tally phase omit it, so it is only
    // exposed through Battle::period which reconstructs Tally.
    #[serde(default)]
    period: Option<BattlePeriod>,

    /// End of the current battle period, where provided. For majors this is
    /// the "final results" datetime.
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub period_end: Option<NaiveDateTime>,
}

impl Battle {
    /// Current battle period.
    ///
    /// `None` when the payload carries no period information at all (some
    /// endpoints, e.g. the battle nested in an entry, never include it).
    pub fn period(&self) -> Option<BattlePeriod> {
        match self.period {
            // A period_end without a period means the votes are being tallied.
            None if self.period_end.is_some() => Some(BattlePeriod::Tally),
            period => period,
        }
    }

    /// Whether this battle is an X Hour Battle (minor battle).
    pub fn is_xhb(&self) -> bool {
        self.battle_type == 3
    }

    /// Whether this battle is a major battle.
    pub fn is_major(&self) -> bool {
        !self.is_xhb()
    }
}

impl Display for Battle {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Battle({}, {}, hosted by {}, id {})",
            self.title,
            if self.is_xhb() { "XHB" } else { "major" },
            self.hosts_names,
            self.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Battle, BattlePeriod};
    use serde_json::json;

    fn payload() -> serde_json::Value {
        json!({
            "id": 4766,
            "title": "pixel dailies",
            "url": "https://battleofthebits.com/arena/Battle/4766/",
            "profile_url": "https://battleofthebits.com/arena/Battle/4766/pixel+dailies/",
            "cover_art_url": "https://battleofthebits.com/disk/battle_covers/4766.png",
            "botbr_id": "8234",
            "hosts_names": "puke7 + xterm",
            "type": "3",
            "entry_count": 11,
            "start": "2024-02-01 00:00:00",
            "end": "2024-02-02 00:00:00",
            "format_tokens": ["pixel"],
            "period": "vote"
        })
    }

    #[test]
    fn deserialize_battle() {
        let battle: Battle = serde_json::from_value(payload()).unwrap();

        assert!(battle.is_xhb());
        assert_eq!(battle.period(), Some(BattlePeriod::Vote));
        assert_eq!(battle.format_tokens, vec!["pixel"]);
    }

    #[test]
    fn missing_period_with_period_end_means_tally() {
        let mut payload = payload();
        payload.as_object_mut().unwrap().remove("period");
        payload
            .as_object_mut()
            .unwrap()
            .insert("period_end".into(), "2024-02-02 12:00:00".into());

        let battle: Battle = serde_json::from_value(payload).unwrap();

        assert_eq!(battle.period(), Some(BattlePeriod::Tally));
    }

    #[test]
    fn missing_period_entirely_is_none() {
        let mut payload = payload();
        payload.as_object_mut().unwrap().remove("period");

        let battle: Battle = serde_json::from_value(payload).unwrap();

        assert_eq!(battle.period(), None);
    }
}
