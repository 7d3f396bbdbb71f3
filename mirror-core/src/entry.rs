use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use rss::{Guid, Item};
use serde::Deserialize;
use url::Url;

use crate::config::FeedSpec;
use crate::ident::{EntryId, Tracker};

/// One release object as the indexer API returns it. Everything is optional
/// at the wire level; presence is checked when converting to an [`Entry`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceRecord {
    pub id: Option<u64>,
    pub title: Option<String>,
    /// Indexer page of the release.
    pub link: Option<String>,
    pub torrent_url: Option<String>,
    pub timestamp: Option<i64>,
    pub total_size: Option<u64>,
    pub seeders: Option<u32>,
    pub leechers: Option<u32>,
    pub num_files: Option<u32>,
    pub nyaa_id: Option<u64>,
    pub tosho_id: Option<u64>,
    pub anidex_id: Option<u64>,
    pub anidb_aid: Option<u64>,
}

/// Why a source record could not be turned into a feed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingField(&'static str),
    BadTimestamp(i64),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingField(field) => write!(f, "missing field `{field}`"),
            SkipReason::BadTimestamp(ts) => write!(f, "timestamp {ts} out of range"),
        }
    }
}

/// A validated record, ready to render into an [`rss::Item`].
#[derive(Debug, Clone)]
pub struct Entry {
    /// Non-empty, most specific first.
    pub ids: Vec<EntryId>,
    pub title: String,
    pub download_url: String,
    pub page_link: Option<String>,
    pub published: DateTime<Utc>,
    pub size_bytes: u64,
    pub seeders: u32,
    pub leechers: u32,
    pub num_files: Option<u32>,
    pub anidb_aid: Option<u64>,
}

impl Entry {
    pub fn from_record(record: &SourceRecord) -> Result<Entry, SkipReason> {
        fn require<T>(value: Option<T>, name: &'static str) -> Result<T, SkipReason> {
            value.ok_or(SkipReason::MissingField(name))
        }

        let title = require(record.title.clone(), "title")?;
        let download_url = require(record.torrent_url.clone(), "torrent_url")?;
        let timestamp = require(record.timestamp, "timestamp")?;
        let size_bytes = require(record.total_size, "total_size")?;
        let seeders = require(record.seeders, "seeders")?;
        let leechers = require(record.leechers, "leechers")?;

        let published = Utc
            .timestamp_opt(timestamp, 0)
            .single()
            .ok_or(SkipReason::BadTimestamp(timestamp))?;

        Ok(Entry {
            ids: EntryId::resolve_all(record),
            title,
            download_url,
            page_link: record.link.clone(),
            published,
            size_bytes,
            seeders,
            leechers,
            num_files: record.num_files,
            anidb_aid: record.anidb_aid,
        })
    }

    /// Identifier used for the item guid: the most specific one the record
    /// carries. `ids` is never empty, the download URL always resolves.
    pub fn primary_id(&self) -> &EntryId {
        &self.ids[0]
    }

    fn tracker_ref(&self) -> Option<(Tracker, u64)> {
        self.ids.iter().find_map(|id| match id {
            EntryId::Tracker(tracker, n) => Some((*tracker, *n)),
            _ => None,
        })
    }

    /// Render into an RSS item. The serializer owns all escaping.
    pub fn to_rss_item(&self, spec: &FeedSpec) -> Item {
        let link = spec
            .rewrite_link_base
            .as_deref()
            .and_then(|base| rebase_link(&self.download_url, base))
            .unwrap_or_else(|| self.download_url.clone());

        let mut guid = Guid::default();
        guid.set_value(self.primary_id().to_string());
        guid.set_permalink(self.primary_id().is_permalink());

        let mut item = Item::default();
        item.set_title(self.title.clone());
        item.set_link(link);
        item.set_guid(guid);
        item.set_pub_date(self.published.to_rfc2822());
        item.set_description(self.description(spec));
        item
    }

    fn description(&self, spec: &FeedSpec) -> String {
        let mut parts = Vec::new();
        parts.push(format!(
            "{:.2} MiB",
            self.size_bytes as f64 / (1024.0 * 1024.0)
        ));
        match self.num_files {
            Some(1) => parts.push("File: 1".to_string()),
            Some(n) => parts.push(format!("Files: {n}")),
            None => {}
        }
        parts.push(format!("Seeders: {}", self.seeders));
        parts.push(format!("Leechers: {}", self.leechers));
        match self.anidb_aid {
            Some(aid) => parts.push(format!("AniDB: {aid}")),
            None => parts.push("AniDB: N/A".to_string()),
        }
        if let Some((tracker, id)) = self.tracker_ref() {
            parts.push(format!("{}: {id}", tracker.label()));
            parts.push(format!(
                "<a href=\"{}\">{}</a>",
                tracker.page_url(id),
                self.title
            ));
        } else if let Some(link) = &self.page_link {
            parts.push(format!("<a href=\"{link}\">{}</a>", self.title));
        }

        let mut description = parts.join(" | ");
        if let Some(image) = self.anidb_aid.and_then(|aid| spec.posters.get(&aid)) {
            description.push_str(&format!(
                "<br><img src=\"https://cdn-eu.anidb.net/images/main/{image}.jpg\" />"
            ));
        }
        description
    }
}

/// Re-base a link on the configured host, keeping path and query.
fn rebase_link(link: &str, base: &str) -> Option<String> {
    let link = Url::parse(link).ok()?;
    let mut rebased = Url::parse(base).ok()?;
    rebased.set_path(link.path());
    rebased.set_query(link.query());
    Some(rebased.to_string())
}
