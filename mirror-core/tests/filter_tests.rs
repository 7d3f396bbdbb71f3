use std::collections::HashMap;

use mirror_core::{FeedSpec, FilesRule, InsertPosition, MirrorError, RecordFilter, SourceRecord};

fn spec() -> FeedSpec {
    FeedSpec {
        number: 1,
        name: "Test Feed".into(),
        link: "http://example.com/".into(),
        api_url: "http://example.com/json?page=".into(),
        file_name: "test.xml".into(),
        include: None,
        exclude: None,
        files: None,
        posters: HashMap::new(),
        rewrite_link_base: None,
        insert: InsertPosition::Append,
        sort_by_date: false,
    }
}

fn record(title: &str) -> SourceRecord {
    SourceRecord {
        title: Some(title.into()),
        ..SourceRecord::default()
    }
}

#[test]
fn include_pattern_matches_case_insensitively() {
    let mut spec = spec();
    spec.include = Some("1080p".into());
    let filter = RecordFilter::new(&spec).unwrap();

    assert!(filter.accepts(&record("[Group] Show - 01 (1080P)")));
    assert!(!filter.accepts(&record("[Group] Show - 01 (720p)")));
}

#[test]
fn exclude_pattern_rejects_case_insensitively() {
    let mut spec = spec();
    spec.exclude = Some("batch".into());
    let filter = RecordFilter::new(&spec).unwrap();

    assert!(!filter.accepts(&record("[Group] Show - 01-12 [Batch]")));
    assert!(filter.accepts(&record("[Group] Show - 01")));
}

#[test]
fn exclude_wins_over_include() {
    let mut spec = spec();
    spec.include = Some("show".into());
    spec.exclude = Some(r"\(raw\)".into());
    let filter = RecordFilter::new(&spec).unwrap();

    assert!(filter.accepts(&record("Show - 02")));
    assert!(!filter.accepts(&record("Show - 02 (RAW)")));
}

#[test]
fn without_patterns_everything_passes() {
    let filter = RecordFilter::new(&spec()).unwrap();

    assert!(filter.accepts(&record("anything at all")));
    // Even a record with no title yet; required fields are checked later.
    assert!(filter.accepts(&SourceRecord::default()));
}

#[test]
fn invalid_pattern_is_a_config_error() {
    let mut spec = spec();
    spec.include = Some("(unclosed".into());

    assert!(matches!(
        RecordFilter::new(&spec),
        Err(MirrorError::Pattern(_))
    ));
}

#[test]
fn files_rule_checks_the_file_count() {
    let mut single = spec();
    single.files = Some(FilesRule::Single);
    let single = RecordFilter::new(&single).unwrap();

    let mut multi = spec();
    multi.files = Some(FilesRule::Multi);
    let multi = RecordFilter::new(&multi).unwrap();

    let with_count = |n: u32| SourceRecord {
        num_files: Some(n),
        ..record("Show")
    };

    assert!(single.accepts(&with_count(1)));
    assert!(!single.accepts(&with_count(4)));
    assert!(multi.accepts(&with_count(4)));
    assert!(!multi.accepts(&with_count(1)));

    // No file count fails either rule.
    assert!(!single.accepts(&record("Show")));
    assert!(!multi.accepts(&record("Show")));
}

#[test]
fn poster_map_acts_as_an_admission_list() {
    let mut spec = spec();
    spec.posters = HashMap::from([(17617, "262414".to_string())]);
    let filter = RecordFilter::new(&spec).unwrap();

    let with_aid = |aid: u64| SourceRecord {
        anidb_aid: Some(aid),
        ..record("Show")
    };

    assert!(filter.accepts(&with_aid(17617)));
    assert!(!filter.accepts(&with_aid(99999)));
    assert!(!filter.accepts(&record("Show")));
}

#[test]
fn empty_poster_map_admits_everything() {
    let filter = RecordFilter::new(&spec()).unwrap();

    let mut rec = record("Show");
    rec.anidb_aid = Some(99999);
    assert!(filter.accepts(&rec));
}
