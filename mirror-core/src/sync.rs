use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{FeedSpec, FetchConfig};
use crate::document::FeedDocument;
use crate::entry::{Entry, SourceRecord};
use crate::error::MirrorError;
use crate::filter::RecordFilter;

/// Closed page interval. `"3"` means pages 1..=3, `"2..5"` pages 2..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub first: u32,
    pub last: u32,
}

impl Default for PageRange {
    fn default() -> Self {
        Self { first: 1, last: 1 }
    }
}

impl PageRange {
    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }
}

impl FromStr for PageRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid page number `{part}`"))
        };
        let range = match s.split_once("..") {
            Some((first, last)) => Self {
                first: parse(first)?,
                last: parse(last)?,
            },
            None => Self {
                first: 1,
                last: parse(s)?,
            },
        };
        if range.first == 0 || range.last < range.first {
            return Err(format!("invalid page range `{s}`"));
        }
        Ok(range)
    }
}

/// What one run did for one feed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunReport {
    pub pages_fetched: u32,
    pub pages_failed: u32,
    pub records_seen: usize,
    pub filtered_out: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub new_items: usize,
    pub total_items: usize,
    pub written: bool,
}

/// Build the shared HTTP client from fetch settings.
pub fn http_client(fetch: &FetchConfig) -> Result<Client, MirrorError> {
    let client = Client::builder()
        .user_agent(fetch.user_agent.clone())
        .timeout(Duration::from_secs(fetch.request_timeout_seconds))
        .build()?;
    Ok(client)
}

/// Run one incremental pass for a feed: fetch the requested pages, keep the
/// records that pass the feed's rules and are not already in the document,
/// then merge and rewrite the file. An existing document is left untouched
/// when nothing new arrived; a missing one is created even when empty.
pub async fn sync_feed(
    client: &Client,
    spec: &FeedSpec,
    output_dir: &Path,
    pages: PageRange,
) -> Result<RunReport, MirrorError> {
    let filter = RecordFilter::new(spec)?;
    if let Some(base) = &spec.rewrite_link_base {
        Url::parse(base)?;
    }

    let mut doc = FeedDocument::open(spec.file_path(output_dir), &spec.name, &spec.link).await?;
    let mut known = doc.known_ids();

    let mut report = RunReport::default();
    let mut new_items = Vec::new();

    for page in pages.iter() {
        let records = match fetch_page(client, spec, page).await {
            Ok(records) => records,
            Err(err) => {
                warn!(feed = %spec.name, page, error = %err, "failed to fetch page");
                report.pages_failed += 1;
                continue;
            }
        };
        report.pages_fetched += 1;
        report.records_seen += records.len();

        for record in &records {
            if !filter.accepts(record) {
                report.filtered_out += 1;
                continue;
            }
            let entry = match Entry::from_record(record) {
                Ok(entry) => entry,
                Err(reason) => {
                    warn!(feed = %spec.name, reason = %reason, "skipping record");
                    report.skipped += 1;
                    continue;
                }
            };
            // A record is new only when none of its identifier kinds is
            // known. Accepted ids join the set right away, so a repeat
            // within the same run collapses to one item.
            if entry.ids.iter().any(|id| known.contains(id)) {
                report.duplicates += 1;
                continue;
            }
            known.extend(entry.ids.iter().cloned());
            new_items.push(entry.to_rss_item(spec));
        }
    }

    report.new_items = new_items.len();
    if new_items.is_empty() && doc.existed() {
        report.total_items = doc.len();
        debug!(feed = %spec.name, "no new entries, leaving file untouched");
        return Ok(report);
    }

    doc.merge(new_items, spec.insert);
    if spec.sort_by_date {
        doc.sort_newest_first();
    }
    report.total_items = doc.len();
    doc.write().await?;
    report.written = true;
    info!(
        feed = %spec.name,
        new = report.new_items,
        total = report.total_items,
        path = %doc.path().display(),
        "feed updated"
    );
    Ok(report)
}

async fn fetch_page(
    client: &Client,
    spec: &FeedSpec,
    page: u32,
) -> Result<Vec<SourceRecord>, MirrorError> {
    let url = spec.page_url(page);
    let response = client.get(&url).send().await?.error_for_status()?;
    let records = response.json().await?;
    Ok(records)
}
