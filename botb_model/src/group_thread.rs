//! Module containing models for group threads (forum threads and comment
//! threads)

use crate::de;
use chrono::NaiveDateTime;
use serde::Deserializer;
use serde_derive::Deserialize;
use std::fmt::{Display, Formatter};

/// Forum group a thread can belong to.
///
/// ## BotB internals:
/// Transmitted as an integer `group_id`. Entry, battle and BotBr comment
/// threads are ordinary group threads in their respective groups.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Group {
    Bulletins,
    News,
    /// "elders only, n00b" when trying to access.
    Internal,
    /// Entry comments.
    Entries,
    /// Battle comments.
    Battles,
    Photos,
    /// Redirects to the update log on-site; appears to be unused.
    UpdateLog,
    N00bS0z,
    Mail,
    BugReportsAndFeatureRequests,
    Smeesh,
    ProjectDev,
    /// BotBr profile comments.
    BotBrs,
    /// Discussion threads for Lyceum articles.
    Lyceum,
    /// A group ID this library does not know about.
    Unknown(i64),
}

impl From<i64> for Group {
    fn from(group_id: i64) -> Group {
        match group_id {
            1 => Group::Bulletins,
            2 => Group::News,
            3 => Group::Internal,
            4 => Group::Entries,
            5 => Group::Battles,
            6 => Group::Photos,
            7 => Group::UpdateLog,
            8 => Group::N00bS0z,
            9 => Group::Mail,
            10 => Group::BugReportsAndFeatureRequests,
            11 => Group::Smeesh,
            12 => Group::ProjectDev,
            13 => Group::BotBrs,
            14 => Group::Lyceum,
            id => Group::Unknown(id),
        }
    }
}

fn group<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Group, D::Error> {
    de::i64_from_any(deserializer).map(Group::from)
}

/// A group thread, i.e. a thread in a forum group, containing posts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupThread {
    /// ID of the group thread.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub id: u64,

    /// Group this thread belongs to.
    #[serde(rename = "group_id", deserialize_with = "group")]
    pub group: Group,

    /// Title of the thread.
    pub title: String,

    /// Timestamp of the first post in the thread.
    #[serde(deserialize_with = "de::datetime")]
    pub first_post_timestamp: NaiveDateTime,

    /// Timestamp of the last post in the thread; `None` if the thread only
    /// contains one post.
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub last_post_timestamp: Option<NaiveDateTime>,
}

impl Display for GroupThread {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "GroupThread({:?}, id {})", self.title, self.id)
    }
}
