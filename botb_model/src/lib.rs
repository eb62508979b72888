//! Typed models for the objects served by the Battle of the Bits API.
//!
//! Every struct here mirrors one object type of the `/api/v1` endpoints and
//! derives [`serde::Deserialize`] directly from the JSON payloads the site
//! returns, including their documented quirks (stringly-typed numbers,
//! deliberately misspelled field names, maps that degrade to empty arrays).
//! Where the raw payload is awkward, a small accessor reconstructs the
//! intended value (e.g. [`Entry::medium`], [`Battle::period`]).

#![deny(
    bare_trait_objects,
    missing_debug_implementations,
    unknown_lints,
    unused_imports,
    unused_parens
)]

pub mod battle;
pub mod botbr;
pub mod de;
pub mod entry;
pub mod format;
pub mod group_thread;
pub mod palette;
pub mod playlist;
pub mod stats;
pub mod tag;

pub use crate::{
    battle::{Battle, BattlePeriod},
    botbr::{BadgeLevel, BotBr},
    entry::{Entry, EntryAuthor, PlaylistToEntry},
    format::{Format, Medium},
    group_thread::{Group, GroupThread},
    palette::Palette,
    playlist::Playlist,
    stats::{BotBrStats, DailyStats},
    tag::{Favorite, LyceumArticle, Tag},
};
