use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::MirrorError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub fetch: FetchConfig,
    pub feeds: Vec<FeedSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// One mirrored feed: where to poll, where the document lives, and which
/// records are admitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSpec {
    /// Number used to select the feed on the command line.
    pub number: u32,
    pub name: String,
    /// Channel link of the produced document.
    pub link: String,
    /// Endpoint template; the page number is appended as-is.
    pub api_url: String,
    /// File name of the document under the output directory.
    pub file_name: String,
    /// Title pattern a record must match, case-insensitive.
    #[serde(default)]
    pub include: Option<String>,
    /// Title pattern that rejects a record, case-insensitive.
    #[serde(default)]
    pub exclude: Option<String>,
    #[serde(default)]
    pub files: Option<FilesRule>,
    /// AniDB id -> poster image id. A non-empty map also acts as an
    /// admission list: records with an unknown AniDB id are rejected.
    #[serde(default)]
    pub posters: HashMap<u64, String>,
    /// When set, download links are re-based on this host.
    #[serde(default)]
    pub rewrite_link_base: Option<String>,
    #[serde(default)]
    pub insert: InsertPosition,
    /// Re-sort the whole document by descending publish date after a merge.
    #[serde(default)]
    pub sort_by_date: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilesRule {
    /// Only records packaging exactly one file.
    Single,
    /// Only records packaging more than one file.
    Multi,
}

/// Where freshly merged items land in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    #[default]
    Append,
    Prepend,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_request_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("rssfeed")
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("feedmirror/{}", env!("CARGO_PKG_VERSION"))
}

impl MirrorConfig {
    pub fn feed(&self, number: u32) -> Option<&FeedSpec> {
        self.feeds.iter().find(|feed| feed.number == number)
    }
}

impl FeedSpec {
    pub fn file_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.file_name)
    }

    pub fn page_url(&self, page: u32) -> String {
        format!("{}{}", self.api_url, page)
    }
}

/// Locate the config file: an explicit path wins, then `./config.json`,
/// then the user config directory.
pub fn config_file_path(explicit: Option<&Path>) -> Result<PathBuf, MirrorError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let local = PathBuf::from("config.json");
    if local.exists() {
        return Ok(local);
    }
    let config_dir = dirs::config_dir().ok_or(MirrorError::NoConfigDir)?;
    Ok(config_dir.join("feedmirror").join("config.json"))
}

pub async fn load_config(path: &Path) -> Result<MirrorConfig, MirrorError> {
    let bytes = tokio::fs::read(path).await?;
    let config = serde_json::from_slice(&bytes)?;
    Ok(config)
}
