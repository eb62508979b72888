//! Module containing models for the site and BotBr statistics tables
//!
//! Statistics apply to the given date in the US East Coast timezone; getting
//! statistics for a date in another timezone requires aggregating multiple
//! days.

use crate::de;
use chrono::NaiveDate;
use serde_derive::Deserialize;
use std::fmt::{Display, Formatter};

/// A single row of the daily site statistics table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyStats {
    /// ID of the daily stats table row.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub id: u64,

    /// Date of the statistic.
    #[serde(deserialize_with = "de::date")]
    pub date: NaiveDate,

    /// Total amount of page views.
    #[serde(deserialize_with = "de::i64_from_any")]
    pub page_views: i64,

    /// Total amount of entry plays.
    #[serde(deserialize_with = "de::i64_from_any")]
    pub plays: i64,

    /// Total amount of entry downloads (deliberate typo, as on entries).
    #[serde(deserialize_with = "de::i64_from_any")]
    pub donloads: i64,

    /// Amount of unique IPs visiting the site.
    #[serde(deserialize_with = "de::i64_from_any")]
    pub ip_count: i64,

    /// Amount of entries submitted to the site.
    #[serde(deserialize_with = "de::i64_from_any")]
    pub entry_count: i64,

    /// Amount of BotBrs seen on the site.
    #[serde(deserialize_with = "de::i64_from_any")]
    pub botbr_count: i64,

    /// Amount of users seen on the site; same as [`DailyStats::botbr_count`].
    #[serde(deserialize_with = "de::i64_from_any")]
    pub user_count: i64,

    /// Amount of group thread posts made on the site.
    #[serde(deserialize_with = "de::i64_from_any")]
    pub post_count: i64,

    /// Total boons owned by BotBrs including the bank, rounded to an integer.
    #[serde(deserialize_with = "de::i64_from_any")]
    pub economic_pool: i64,

    /// Average amount of boons owned by BotBrs, rounded to an integer.
    #[serde(deserialize_with = "de::i64_from_any")]
    pub avg_debit: i64,

    /// Boons currently held by the BotB Bank, rounded to an integer.
    #[serde(deserialize_with = "de::i64_from_any")]
    pub bank_debit: i64,

    /// Boons the bank has given out to BotBrs.
    #[serde(deserialize_with = "de::i64_from_any")]
    pub bank_credit: i64,

    /// Total points of all BotBrs on the site.
    #[serde(deserialize_with = "de::i64_from_any")]
    pub total_points: i64,
}

impl DailyStats {
    /// Longhand for [`DailyStats::donloads`], for spelling convenience.
    pub fn downloads(&self) -> i64 {
        self.donloads
    }
}

impl Display for DailyStats {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "DailyStats({}, id {})", self.date, self.id)
    }
}

/// A single row of the per-BotBr statistics table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotBrStats {
    /// ID of the BotBr the statistic applies to.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub botbr_id: u64,

    /// Label of the statistic: `level`, `boons`, `a_light`/`a_ack`/`a_dark`
    /// for aura points, or a class name for class point amounts.
    pub label: String,

    /// Value of the statistic.
    #[serde(deserialize_with = "de::f64_from_any")]
    pub val: f64,

    /// Date of the statistic.
    #[serde(deserialize_with = "de::date")]
    pub date: NaiveDate,
}

impl Display for BotBrStats {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "BotBrStats({} = {} for BotBr {} on {})", self.label, self.val, self.botbr_id, self.date)
    }
}
