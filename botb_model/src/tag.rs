//! Module containing models for entry tags, favorites and Lyceum articles

use crate::de;
use serde_derive::Deserialize;
use std::fmt::{Display, Formatter};

/// A tag on an entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    /// ID of the tag.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub id: u64,

    /// ID of the entry this tag applies to.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub entry_id: u64,

    /// The tag text itself.
    pub tag: String,
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Tag({:?} on entry {}, id {})", self.tag, self.entry_id, self.id)
    }
}

/// A favorite on an entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub struct Favorite {
    /// ID of the favorite.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub id: u64,

    /// ID of the BotBr who favorited.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub botbr_id: u64,

    /// ID of the favorited entry.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub entry_id: u64,

    #[serde(default, deserialize_with = "de::i64_from_any")]
    pub much: i64,
}

/// An article on the Lyceum, the site's wiki.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LyceumArticle {
    /// ID of the article.
    #[serde(deserialize_with = "de::u64_from_any")]
    pub id: u64,

    /// Title of the article.
    pub title: String,

    /// URL of the article.
    pub profile_url: String,

    /// Raw text of the article, in Firki markup.
    pub text_firki: String,

    /// Text of the article with Firki markup stripped.
    pub text_stripped: String,

    /// Amount of views this article has.
    #[serde(deserialize_with = "de::u32_from_any")]
    pub views: u32,
}

impl Display for LyceumArticle {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "LyceumArticle({:?}, id {})", self.title, self.id)
    }
}
