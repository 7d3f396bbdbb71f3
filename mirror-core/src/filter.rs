use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::config::{FeedSpec, FilesRule};
use crate::entry::SourceRecord;
use crate::error::MirrorError;

/// Admission rules of one feed, compiled once per run. Invalid patterns
/// surface here, before anything is fetched.
#[derive(Debug)]
pub struct RecordFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
    files: Option<FilesRule>,
    posters: Option<HashSet<u64>>,
}

impl RecordFilter {
    pub fn new(spec: &FeedSpec) -> Result<Self, MirrorError> {
        Ok(Self {
            include: compile(spec.include.as_deref())?,
            exclude: compile(spec.exclude.as_deref())?,
            files: spec.files,
            posters: (!spec.posters.is_empty()).then(|| spec.posters.keys().copied().collect()),
        })
    }

    /// True when the record passes every configured rule. Pure; rejected
    /// records are not logged.
    pub fn accepts(&self, record: &SourceRecord) -> bool {
        let title = record.title.as_deref().unwrap_or_default();
        if let Some(include) = &self.include {
            if !include.is_match(title) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(title) {
                return false;
            }
        }
        if let Some(rule) = self.files {
            let count = record.num_files.unwrap_or(0);
            let ok = match rule {
                FilesRule::Single => count == 1,
                FilesRule::Multi => count > 1,
            };
            if !ok {
                return false;
            }
        }
        if let Some(posters) = &self.posters {
            match record.anidb_aid {
                Some(aid) if posters.contains(&aid) => {}
                _ => return false,
            }
        }
        true
    }
}

fn compile(pattern: Option<&str>) -> Result<Option<Regex>, MirrorError> {
    match pattern {
        Some(pattern) => {
            let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
            Ok(Some(regex))
        }
        None => Ok(None),
    }
}
