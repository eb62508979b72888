//! A client library for the [Battle of the Bits](https://battleofthebits.com)
//! REST API.
//!
//! The API serves a dozen object types (BotBrs, battles, entries, formats,
//! playlists, ...) through a uniform family of endpoints: load by ID, a
//! filterable and sortable paginated list, a random pick, and for some types
//! a title search. [`Botb`] exposes one typed method family per object type,
//! generated from the same template, plus convenience methods that stitch
//! several endpoints together (entries of a BotBr, entries in a playlist,
//! and so on).
//!
//! List results come back as a [`PaginatedList`], a lazy cursor that pulls
//! pages on demand and stops at the true end of the data or at a configured
//! item cap. Constructing one performs no I/O at all.
//!
//! The library is transport-agnostic: [`Botb`] is generic over an
//! [`ApiClient`], a two-method trait for issuing GET and form-POST requests.
//! The companion `botb_http` crate provides a blocking implementation; tests
//! substitute scripted fakes.

#![deny(
    bare_trait_objects,
    missing_debug_implementations,
    stable_features,
    unknown_lints,
    unused_extern_crates,
    unused_features,
    unused_imports,
    unused_parens
)]

#[macro_use]
mod macros;

pub mod api;
pub mod error;

pub use crate::{
    api::{
        client::{ApiClient, HttpResponse},
        condition::{Condition, Operand, Scalar},
        pagination::{Cursor, PaginatedList},
        query::{ListQuery, PageBody, MAX_PAGE_LENGTH},
    },
    error::{Error, Result},
};
pub use botb_model as model;

use botb_model::{
    Battle, BotBr, BotBrStats, DailyStats, Entry, Favorite, Format, GroupThread, LyceumArticle,
    Palette, Playlist, PlaylistToEntry, Tag,
};
use chrono::NaiveDate;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use std::collections::HashSet;

/// Characters escaped in the search query path segment: everything except
/// unreserved characters, spaces included.
const SEARCH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Entry point to the API, generic over the HTTP transport.
#[derive(Debug)]
pub struct Botb<A: ApiClient> {
    client: A,
    base_url: String,
    max_page_length: u32,
}

impl<A: ApiClient> Botb<A> {
    pub fn new(client: A) -> Botb<A> {
        Botb {
            client,
            base_url: api::BASE_URL.to_string(),
            max_page_length: MAX_PAGE_LENGTH,
        }
    }

    /// Points the client at a different API root, e.g. a local fixture
    /// server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Botb<A> {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the page length ceiling the backend is assumed to enforce.
    pub fn with_max_page_length(mut self, max_page_length: u32) -> Botb<A> {
        self.max_page_length = max_page_length;
        self
    }

    pub fn client(&self) -> &A {
        &self.client
    }

    // Generic endpoint plumbing. Everything public below goes through these.

    fn load_object<T: DeserializeOwned>(&self, object_type: &str, id: u64) -> Result<Option<T>> {
        let url = format!("{}/{}/load/{}", self.base_url, object_type, id);
        let response = self.client.get(&url)?;

        match response.status {
            404 => Ok(None),
            // Parts of the load API report missing objects as a 500 with an
            // "unfounded" response_message instead of a 404
            500 if is_unfounded(&response.body) => Ok(None),
            _ if !response.is_success() => Err(Error::http(response.status, response.body)),
            _ => decode(&response).map(Some),
        }
    }

    fn list_object_page<T: DeserializeOwned>(
        &self,
        object_type: &str,
        page_number: u32,
        page_length: u32,
        query: &ListQuery,
    ) -> Result<Vec<T>> {
        let url = format!(
            "{}/{}/list/{}/{}",
            self.base_url, object_type, page_number, page_length
        );

        let response = match query.build(page_length, self.max_page_length)? {
            PageBody::Query(params) =>
                if params.is_empty() {
                    self.client.get(&url)?
                } else {
                    let encoded = serde_urlencoded::to_string(&params)
                        .map_err(|error| Error::InvalidQuery(error.to_string()))?;

                    self.client.get(&format!("{}?{}", url, encoded))?
                },
            PageBody::Form(fields) => self.client.post_form(&url, &fields)?,
        };

        // A 400 with an RTFM body is the backend rejecting the query itself
        if response.status == 400 && response.body.contains("Please RTFM") {
            return Err(Error::InvalidQuery(first_line(&response.body).to_string()))
        }

        if !response.is_success() {
            return Err(Error::http(response.status, response.body))
        }

        if response.body.is_empty() {
            return Ok(Vec::new())
        }

        decode(&response)
    }

    fn list_object<'a, T: DeserializeOwned + 'a>(
        &'a self,
        object_type: &'static str,
        query: ListQuery,
    ) -> PaginatedList<'a, T> {
        PaginatedList::new(move |page_number, page_length| {
            self.list_object_page(object_type, page_number, page_length, &query)
        })
        .page_ceiling(self.max_page_length)
    }

    fn random_object<T: DeserializeOwned>(&self, object_type: &str) -> Result<T> {
        let url = format!("{}/{}/random", self.base_url, object_type);
        let response = self.client.get(&url)?;

        if !response.is_success() {
            return Err(Error::http(response.status, response.body))
        }

        // The random endpoint returns a single-element list
        let items: Vec<T> = decode(&response)?;

        items.into_iter().next().ok_or_else(|| {
            Error::http(response.status, "random endpoint returned an empty list")
        })
    }

    fn search_object_page<T: DeserializeOwned>(
        &self,
        object_type: &str,
        query: &str,
        page_number: u32,
        page_length: u32,
    ) -> Result<Vec<T>> {
        if page_length < 1 || page_length > self.max_page_length {
            return Err(Error::InvalidQuery(format!(
                "page length must be between 1 and {}, got {}",
                self.max_page_length, page_length
            )))
        }

        let encoded = utf8_percent_encode(query, SEARCH_SEGMENT);
        let url = format!(
            "{}/{}/search/{}/{}/{}",
            self.base_url, object_type, encoded, page_number, page_length
        );

        let response = self.client.get(&url)?;

        if !response.is_success() {
            return Err(Error::http(response.status, response.body))
        }

        if response.body.is_empty() {
            return Ok(Vec::new())
        }

        decode(&response)
    }

    fn search_object<'a, T: DeserializeOwned + 'a>(
        &'a self,
        object_type: &'static str,
        query: &str,
    ) -> PaginatedList<'a, T> {
        let query = query.to_string();

        PaginatedList::new(move |page_number, page_length| {
            self.search_object_page(object_type, &query, page_number, page_length)
        })
        .page_ceiling(self.max_page_length)
    }

    /// GET on an endpoint outside of the load/list/random/search families
    /// that returns plain JSON.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url)?;

        if !response.is_success() {
            return Err(Error::http(response.status, response.body))
        }

        decode(&response)
    }

    // BotBrs

    object_api! {
        "botbr" => BotBr {
            load: botbr_load,
            list_page: botbr_list_page,
            list: botbr_list,
            random: botbr_random,
            search_page: botbr_search_page, search: botbr_search,
        }
    }

    /// Point thresholds for BotBr levels, from level 0 up to the maximum.
    pub fn botbr_levels(&self) -> Result<Vec<u64>> {
        self.get_json(&format!("{}/botbr/levels", self.base_url))
    }

    /// Loads a BotBr by their exact username, or `None` if nobody has it.
    pub fn botbr_load_for_username(&self, username: &str) -> Result<Option<BotBr>> {
        // The name filter matches substrings, so the results still have to
        // be checked for an exact match
        let mut candidates = self.botbr_list(ListQuery::new().filter("name", username));

        for candidate in &mut candidates {
            let candidate = candidate?;

            if candidate.name == username {
                return Ok(Some(candidate))
            }
        }

        Ok(None)
    }

    /// ID of the BotBr with the given exact username.
    pub fn botbr_id_for_username(&self, username: &str) -> Result<Option<u64>> {
        Ok(self.botbr_load_for_username(username)?.map(|botbr| botbr.id))
    }

    /// Lazily lists all entries the BotBr authored, collaborations included.
    /// With `submitted_only` the list is restricted to entries they
    /// submitted themselves.
    pub fn botbr_entries(
        &self,
        botbr_id: u64,
        submitted_only: bool,
        query: ListQuery,
    ) -> PaginatedList<'_, Entry> {
        let mut query = query.condition(Condition::new(
            "id",
            "IN_SUBQUERY:botbr_entry_list",
            botbr_id,
        ));

        if submitted_only {
            query = query.condition(Condition::new("botbr_id", "=", botbr_id));
        }

        self.entry_list(query)
    }

    /// Lazily lists all entries the BotBr has favorited.
    pub fn botbr_favorite_entries(
        &self,
        botbr_id: u64,
        query: ListQuery,
    ) -> PaginatedList<'_, Entry> {
        self.entry_list(query.condition(Condition::new(
            "id",
            "IN_SUBQUERY:botbr_favorites",
            botbr_id,
        )))
    }

    /// Lazily lists all palettes created by the BotBr.
    pub fn botbr_palettes(&self, botbr_id: u64, query: ListQuery) -> PaginatedList<'_, Palette> {
        self.palette_list(query.filter("botbr_id", botbr_id).default_sort("id"))
    }

    // Battles

    object_api! {
        "battle" => Battle {
            load: battle_load,
            list_page: battle_list_page,
            list: battle_list,
            random: battle_random,
            search_page: battle_search_page, search: battle_search,
        }
    }

    /// Upcoming and currently running battles.
    pub fn battle_current(&self) -> Result<Vec<Battle>> {
        self.get_json(&format!("{}/battle/current", self.base_url))
    }

    /// Battles that were ongoing on the given date (site time, EST).
    pub fn battle_list_by_date(&self, date: NaiveDate) -> Result<Vec<Battle>> {
        self.get_json(&format!(
            "{}/battle/list_by_date/{}",
            self.base_url,
            date.format("%Y-%m-%d")
        ))
    }

    /// Battles that were ongoing during the given month (site time, EST).
    pub fn battle_list_by_month(&self, year: i32, month: u32) -> Result<Vec<Battle>> {
        self.get_json(&format!(
            "{}/battle/list_by_month/{:04}-{:02}",
            self.base_url, year, month
        ))
    }

    // Entries

    object_api! {
        "entry" => Entry {
            load: entry_load,
            list_page: entry_list_page,
            list: entry_list,
            random: entry_random,
            search_page: entry_search_page, search: entry_search,
        }
    }

    /// Lazily lists all tags on the given entry.
    pub fn entry_tags(&self, entry_id: u64, query: ListQuery) -> PaginatedList<'_, Tag> {
        self.tag_list(query.filter("entry_id", entry_id).default_sort("id"))
    }

    /// Lazily lists all favorites on the given entry.
    pub fn entry_favorites(&self, entry_id: u64, query: ListQuery) -> PaginatedList<'_, Favorite> {
        self.favorite_list(query.filter("entry_id", entry_id).default_sort("id"))
    }

    /// IDs of the playlists the given entry appears in.
    pub fn entry_playlist_ids(&self, entry_id: u64) -> Result<Vec<u64>> {
        let mut links = self.playlist_to_entry_list(ListQuery::new().filter("entry_id", entry_id));
        let links = links.try_collect()?;

        Ok(links.into_iter().map(|link| link.playlist_id).collect())
    }

    /// The playlists the given entry appears in.
    pub fn entry_playlists(&self, entry_id: u64) -> Result<Vec<Playlist>> {
        let playlist_ids = self.entry_playlist_ids(entry_id)?;

        if playlist_ids.is_empty() {
            return Ok(Vec::new())
        }

        self.playlist_list(
            ListQuery::new()
                .sort("id")
                .condition(Condition::new("id", "IN", playlist_ids)),
        )
        .try_collect()
    }

    // Favorites

    object_api! {
        "favorite" => Favorite {
            load: favorite_load,
            list_page: favorite_list_page,
            list: favorite_list,
            random: favorite_random,
        }
    }

    // Formats

    object_api! {
        "format" => Format {
            load: format_load,
            list_page: format_list_page,
            list: format_list,
            random: format_random,
        }
    }

    // Group threads

    object_api! {
        "group_thread" => GroupThread {
            load: group_thread_load,
            list_page: group_thread_list_page,
            list: group_thread_list,
            random: group_thread_random,
            search_page: group_thread_search_page, search: group_thread_search,
        }
    }

    // Lyceum articles

    object_api! {
        "lyceum_article" => LyceumArticle {
            load: lyceum_article_load,
            list_page: lyceum_article_list_page,
            list: lyceum_article_list,
            random: lyceum_article_random,
            search_page: lyceum_article_search_page, search: lyceum_article_search,
        }
    }

    // Palettes

    object_api! {
        "palette" => Palette {
            load: palette_load,
            list_page: palette_list_page,
            list: palette_list,
            random: palette_random,
        }
    }

    // Playlists

    object_api! {
        "playlist" => Playlist {
            load: playlist_load,
            list_page: playlist_list_page,
            list: playlist_list,
            random: playlist_random,
            search_page: playlist_search_page, search: playlist_search,
        }
    }

    /// Fetches a single page of playlist-to-entry links. The linking table
    /// only supports listing, there is no load or random endpoint for it.
    pub fn playlist_to_entry_list_page(
        &self,
        page_number: u32,
        page_length: u32,
        query: &ListQuery,
    ) -> Result<Vec<PlaylistToEntry>> {
        self.list_object_page("playlist_to_entry", page_number, page_length, query)
    }

    /// Lazily lists playlist-to-entry links matching the given query.
    pub fn playlist_to_entry_list(&self, query: ListQuery) -> PaginatedList<'_, PlaylistToEntry> {
        self.list_object("playlist_to_entry", query)
    }

    /// IDs of the entries in the given playlist, in playlist order.
    pub fn playlist_entry_ids(&self, playlist_id: u64) -> Result<Vec<u64>> {
        let mut links =
            self.playlist_to_entry_list(ListQuery::new().filter("playlist_id", playlist_id));
        let links = links.try_collect()?;

        Ok(links.into_iter().map(|link| link.entry_id).collect())
    }

    /// The entries in the given playlist, in playlist order.
    pub fn playlist_entries(&self, playlist_id: u64) -> Result<Vec<Entry>> {
        self.get_json(&format!(
            "{}/entry/playlist_playlist/{}",
            self.base_url, playlist_id
        ))
    }

    // Tags

    object_api! {
        "tag" => Tag {
            load: tag_load,
            list_page: tag_list_page,
            list: tag_list,
            random: tag_random,
            search_page: tag_search_page, search: tag_search,
        }
    }

    /// IDs of all entries carrying the given tag, deduplicated.
    pub fn tag_entry_ids(&self, tag: &str) -> Result<Vec<u64>> {
        let mut tags = self.tag_list(
            ListQuery::new()
                .sort("id")
                .condition(Condition::new("tag", "LIKE", tag)),
        );

        let mut seen = HashSet::new();
        let mut entry_ids = Vec::new();

        for tag in &mut tags {
            let tag = tag?;

            if seen.insert(tag.entry_id) {
                entry_ids.push(tag.entry_id);
            }
        }

        Ok(entry_ids)
    }

    /// Lazily lists all entries carrying the given tag.
    ///
    /// Resolving the tag to entry IDs takes one round of requests up front,
    /// hence the outer `Result`.
    pub fn tag_entries(&self, tag: &str, query: ListQuery) -> Result<PaginatedList<'_, Entry>> {
        let entry_ids = self.tag_entry_ids(tag)?;

        if entry_ids.is_empty() {
            // An IN condition cannot carry an empty list
            return Ok(PaginatedList::new(|_, _| Ok(Vec::new())))
        }

        Ok(self.entry_list(
            query
                .default_sort("id")
                .condition(Condition::new("id", "IN", entry_ids)),
        ))
    }

    // BotBr stats

    /// Fetches a single page of the `botbr_stats` list matching the given
    /// query. The stats table has no load endpoint.
    pub fn botbr_stats_list_page(
        &self,
        page_number: u32,
        page_length: u32,
        query: &ListQuery,
    ) -> Result<Vec<BotBrStats>> {
        self.list_object_page("botbr_stats", page_number, page_length, query)
    }

    /// Lazily lists `botbr_stats` rows matching the given query.
    pub fn botbr_stats_list(&self, query: ListQuery) -> PaginatedList<'_, BotBrStats> {
        self.list_object("botbr_stats", query)
    }

    /// Fetches a random `botbr_stats` row.
    pub fn botbr_stats_random(&self) -> Result<BotBrStats> {
        self.random_object("botbr_stats")
    }

    /// All recorded stats of the given BotBr. Empty for nonexistent BotBrs.
    pub fn botbr_stats_for_botbr(&self, botbr_id: u64) -> Result<Vec<BotBrStats>> {
        self.get_json(&format!(
            "{}/botbr_stats/by_botbr_id/{}",
            self.base_url, botbr_id
        ))
    }

    /// The given BotBr's stats from the last `days` days. Empty for
    /// nonexistent BotBrs.
    pub fn botbr_stats_days_back(&self, botbr_id: u64, days: u32) -> Result<Vec<BotBrStats>> {
        self.get_json(&format!(
            "{}/botbr_stats/days_back/{}/{}",
            self.base_url, botbr_id, days
        ))
    }

    // Daily stats

    object_api! {
        "daily_stats" => DailyStats {
            load: daily_stats_load,
            list_page: daily_stats_list_page,
            list: daily_stats_list,
            random: daily_stats_random,
        }
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    serde_json::from_str(&response.body)
        .map_err(|_| Error::http(response.status, response.body.clone()))
}

/// Whether a 500 body is the load API's way of reporting "not found".
fn is_unfounded(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("response_message")
                .and_then(|message| message.as_str())
                .map(|message| message.contains("unfounded"))
        })
        .unwrap_or(false)
}

/// First line of an error body, with both newlines and `<br>` tags treated
/// as line breaks.
fn first_line(body: &str) -> &str {
    body.split('\n')
        .next()
        .unwrap_or("")
        .split("<br>")
        .next()
        .unwrap_or("")
}
