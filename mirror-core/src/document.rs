use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use rss::{Channel, Item};

use crate::config::InsertPosition;
use crate::error::MirrorError;
use crate::ident::EntryId;

/// A feed file on disk, parsed into a channel and written back atomically.
/// Items are never removed; the document only grows.
#[derive(Debug)]
pub struct FeedDocument {
    channel: Channel,
    path: PathBuf,
    existed: bool,
}

impl FeedDocument {
    /// Load the document at `path`, or start a fresh channel when the file
    /// does not exist yet. A file that exists but does not parse is fatal.
    pub async fn open(
        path: impl Into<PathBuf>,
        title: &str,
        link: &str,
    ) -> Result<Self, MirrorError> {
        let path = path.into();
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let channel = Channel::read_from(&bytes[..])?;
                Ok(Self {
                    channel,
                    path,
                    existed: true,
                })
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let mut channel = Channel::default();
                channel.set_title(title);
                channel.set_link(link);
                Ok(Self {
                    channel,
                    path,
                    existed: false,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Whether the file was already on disk when the document was opened.
    pub fn existed(&self) -> bool {
        self.existed
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn items(&self) -> &[Item] {
        self.channel.items()
    }

    pub fn len(&self) -> usize {
        self.channel.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.items().is_empty()
    }

    /// One identifier per item already in the document: the guid when it
    /// parses, else the item link for documents written by other tools.
    pub fn known_ids(&self) -> HashSet<EntryId> {
        self.channel.items().iter().filter_map(item_id).collect()
    }

    /// Insert rendered items without touching what is already there.
    pub fn merge(&mut self, new_items: Vec<Item>, position: InsertPosition) {
        if new_items.is_empty() {
            return;
        }
        let mut items = self.channel.items().to_vec();
        match position {
            InsertPosition::Append => items.extend(new_items),
            InsertPosition::Prepend => {
                let mut head = new_items;
                head.extend(items);
                items = head;
            }
        }
        self.channel.set_items(items);
    }

    /// Order items by publish date, newest first; undated items sink to the
    /// end. The sort is stable, equal dates keep their relative order.
    pub fn sort_newest_first(&mut self) {
        let mut items = self.channel.items().to_vec();
        items.sort_by(|a, b| pub_date(b).cmp(&pub_date(a)));
        self.channel.set_items(items);
    }

    /// Write the document back, pretty-printed, through a temp file so a
    /// crash mid-write never leaves a truncated feed behind.
    pub async fn write(&self) -> Result<(), MirrorError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut buf = Vec::new();
        self.channel.pretty_write_to(&mut buf, b' ', 2)?;
        buf.push(b'\n');
        let tmp = self.path.with_extension("xml.tmp");
        tokio::fs::write(&tmp, &buf).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn item_id(item: &Item) -> Option<EntryId> {
    if let Some(guid) = item.guid() {
        if let Some(id) = EntryId::parse(guid.value()) {
            return Some(id);
        }
    }
    item.link().map(|link| EntryId::Url(link.to_string()))
}

fn pub_date(item: &Item) -> Option<DateTime<FixedOffset>> {
    item.pub_date()
        .and_then(|value| DateTime::parse_from_rfc2822(value).ok())
}
