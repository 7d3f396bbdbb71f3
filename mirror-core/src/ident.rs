use std::fmt;

use crate::entry::SourceRecord;

/// Trackers the indexer cross-references a release on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tracker {
    Nyaa,
    Tosho,
    Anidex,
}

impl Tracker {
    pub fn label(&self) -> &'static str {
        match self {
            Tracker::Nyaa => "Nyaa",
            Tracker::Tosho => "Tosho",
            Tracker::Anidex => "AniDex",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Tracker::Nyaa => "nyaa",
            Tracker::Tosho => "tosho",
            Tracker::Anidex => "anidex",
        }
    }

    /// Public page of a release on this tracker.
    pub fn page_url(&self, id: u64) -> String {
        match self {
            Tracker::Nyaa => format!("https://nyaa.si/view/{id}"),
            Tracker::Tosho => format!("https://www.tokyotosho.info/details.php?id={id}"),
            Tracker::Anidex => format!("https://anidex.info/torrent/{id}"),
        }
    }
}

/// Identifier an item is deduplicated by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryId {
    /// The indexer's own numeric release id.
    Torrent(u64),
    /// Release id on one of the cross-referenced trackers.
    Tracker(Tracker, u64),
    /// Download URL, for records carrying no numeric id at all.
    Url(String),
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Torrent(id) => write!(f, "torrent:{id}"),
            EntryId::Tracker(tracker, id) => write!(f, "{}:{id}", tracker.prefix()),
            EntryId::Url(url) => f.write_str(url),
        }
    }
}

impl EntryId {
    /// Every identifier a record carries, most specific first. The first one
    /// becomes the item guid; all of them count for deduplication.
    pub fn resolve_all(record: &SourceRecord) -> Vec<EntryId> {
        let mut ids = Vec::new();
        if let Some(id) = record.id {
            ids.push(EntryId::Torrent(id));
        }
        if let Some(id) = record.nyaa_id {
            ids.push(EntryId::Tracker(Tracker::Nyaa, id));
        }
        if let Some(id) = record.tosho_id {
            ids.push(EntryId::Tracker(Tracker::Tosho, id));
        }
        if let Some(id) = record.anidex_id {
            ids.push(EntryId::Tracker(Tracker::Anidex, id));
        }
        if let Some(url) = &record.torrent_url {
            ids.push(EntryId::Url(url.clone()));
        }
        ids
    }

    /// Recover an identifier from a persisted guid value. Besides the
    /// canonical `kind:id` form this accepts tracker page URLs and bare
    /// numeric ids, both found in documents written by earlier tooling.
    pub fn parse(value: &str) -> Option<EntryId> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if value.starts_with("http://") || value.starts_with("https://") {
            let id = parse_tracker_page(value).unwrap_or_else(|| EntryId::Url(value.to_string()));
            return Some(id);
        }
        if let Some((kind, digits)) = value.split_once(':') {
            let id = digits.parse().ok()?;
            return match kind {
                "torrent" => Some(EntryId::Torrent(id)),
                "nyaa" => Some(EntryId::Tracker(Tracker::Nyaa, id)),
                "tosho" => Some(EntryId::Tracker(Tracker::Tosho, id)),
                "anidex" => Some(EntryId::Tracker(Tracker::Anidex, id)),
                _ => None,
            };
        }
        value.parse().ok().map(EntryId::Torrent)
    }

    /// Whether the guid built from this identifier is a permalink.
    pub fn is_permalink(&self) -> bool {
        matches!(self, EntryId::Url(_))
    }
}

fn parse_tracker_page(url: &str) -> Option<EntryId> {
    if let Some(rest) = url.strip_prefix("https://nyaa.si/view/") {
        let id = rest.trim_end_matches('/').parse().ok()?;
        return Some(EntryId::Tracker(Tracker::Nyaa, id));
    }
    if let Some(rest) = url.strip_prefix("https://www.tokyotosho.info/details.php?id=") {
        let id = rest.parse().ok()?;
        return Some(EntryId::Tracker(Tracker::Tosho, id));
    }
    if let Some(rest) = url.strip_prefix("https://anidex.info/torrent/") {
        let id = rest.trim_end_matches('/').parse().ok()?;
        return Some(EntryId::Tracker(Tracker::Anidex, id));
    }
    None
}
