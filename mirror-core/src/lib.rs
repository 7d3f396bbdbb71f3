pub mod config;
pub mod document;
pub mod entry;
pub mod error;
pub mod filter;
pub mod ident;
pub mod sync;

pub use config::{
    config_file_path, load_config, FeedSpec, FetchConfig, FilesRule, InsertPosition, MirrorConfig,
};
pub use document::FeedDocument;
pub use entry::{Entry, SkipReason, SourceRecord};
pub use error::MirrorError;
pub use filter::RecordFilter;
pub use ident::{EntryId, Tracker};
pub use sync::{http_client, sync_feed, PageRange, RunReport};
