pub mod nyt;

use crate::cache::SnapshotCache;
use crate::model::Snapshot;
use chrono::{DateTime, Utc};
use colored::*;
use flate2::read::GzDecoder;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Snapshot directory does not exist: {0}")]
    MissingDirectory(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type FormatResult<T> = std::result::Result<T, FormatError>;

/// Where historical snapshots come from.
pub trait SnapshotSource {
    /// Every state with at least one snapshot, sorted by name.
    fn states(&self) -> FormatResult<Vec<String>>;

    /// One state's snapshots, oldest first.
    fn load_snapshots(&self, state: &str) -> FormatResult<Vec<Snapshot>>;
}

lazy_static! {
    static ref SNAPSHOT_FILE_RX: Regex = Regex::new(
        r"(\d{4}-\d{2}-\d{2})T(\d{2})[:-](\d{2})[:-](\d{2})(\.\d+)?(Z|[+-]\d{2}[:-]?\d{2})\.json(\.gz)?$"
    )
    .unwrap();
}

/// Version timestamp encoded in a snapshot file name, e.g.
/// `results-2020-11-05T12-30-00Z.json`.
pub fn timestamp_from_file_name(name: &str) -> Option<DateTime<Utc>> {
    let caps = SNAPSHOT_FILE_RX.captures(name)?;
    let fraction = caps.get(5).map_or("", |m| m.as_str());

    let offset = match &caps[6] {
        "Z" => "Z".to_string(),
        raw => {
            let digits: String = raw[1..].chars().filter(|c| c.is_ascii_digit()).collect();
            format!("{}{}:{}", &raw[..1], &digits[..2], &digits[2..])
        }
    };

    let normalized = format!(
        "{}T{}:{}:{}{}{}",
        &caps[1], &caps[2], &caps[3], &caps[4], fraction, offset
    );
    DateTime::parse_from_rfc3339(&normalized)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Instants claimed by more than one file in a time-sorted listing.
fn duplicate_instants(files: &[(DateTime<Utc>, PathBuf)]) -> Vec<(DateTime<Utc>, Vec<&Path>)> {
    let mut duplicates: Vec<(DateTime<Utc>, Vec<&Path>)> = Vec::new();
    for pair in files.windows(2) {
        let ((first_time, first_path), (second_time, second_path)) = (&pair[0], &pair[1]);
        if first_time != second_time {
            continue;
        }
        if let Some((time, paths)) = duplicates.last_mut() {
            if *time == *second_time {
                paths.push(second_path.as_path());
                continue;
            }
        }
        duplicates.push((*first_time, vec![first_path.as_path(), second_path.as_path()]));
    }
    duplicates
}

fn read_document(path: &Path) -> io::Result<Vec<u8>> {
    let mut content = Vec::new();
    if path.extension().map_or(false, |ext| ext == "gz") {
        GzDecoder::new(File::open(path)?).read_to_end(&mut content)?;
    } else {
        File::open(path)?.read_to_end(&mut content)?;
    }
    Ok(content)
}

/// A directory holding one results document per version.
///
/// Every document is read when the source is opened; snapshots are grouped
/// by state and sorted oldest first.
pub struct DirectorySource {
    dir: PathBuf,
    by_state: BTreeMap<String, Vec<Snapshot>>,
    documents: usize,
}

impl DirectorySource {
    pub fn open(dir: &Path, cache: Option<&SnapshotCache>) -> FormatResult<Self> {
        if !dir.is_dir() {
            return Err(FormatError::MissingDirectory(dir.to_path_buf()));
        }

        let entries = fs::read_dir(dir).map_err(|source| FormatError::Read {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| FormatError::Read {
                path: dir.to_path_buf(),
                source,
            })?;
            let name = entry.file_name().to_string_lossy().to_string();
            if !(name.ends_with(".json") || name.ends_with(".json.gz")) {
                continue;
            }
            match timestamp_from_file_name(&name) {
                Some(timestamp) => files.push((timestamp, entry.path())),
                None => eprintln!("Skipping (no timestamp in name): {}", name.yellow()),
            }
        }
        files.sort();

        for (timestamp, paths) in duplicate_instants(&files) {
            eprintln!(
                "⚠️  {} documents share the instant {}: {}",
                paths.len(),
                timestamp.to_rfc3339().yellow(),
                paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        let mut by_state: BTreeMap<String, Vec<Snapshot>> = BTreeMap::new();
        for (timestamp, path) in &files {
            for snapshot in load_document(path, *timestamp, cache)? {
                by_state
                    .entry(snapshot.state_name.clone())
                    .or_default()
                    .push(snapshot);
            }
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            by_state,
            documents: files.len(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn document_count(&self) -> usize {
        self.documents
    }
}

fn load_document(
    path: &Path,
    timestamp: DateTime<Utc>,
    cache: Option<&SnapshotCache>,
) -> FormatResult<Vec<Snapshot>> {
    let content = read_document(path).map_err(|source| FormatError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parse = |content: &[u8]| {
        nyt::parse_results(content, timestamp).map_err(|source| FormatError::Parse {
            path: path.to_path_buf(),
            source,
        })
    };

    let mut rows = match cache {
        Some(cache) => cache.get_or_parse(&content, parse)?,
        None => parse(&content)?,
    };

    // Identical documents share a cache entry, so restamp with this version.
    for row in &mut rows {
        row.timestamp = timestamp;
    }
    Ok(rows)
}

impl SnapshotSource for DirectorySource {
    fn states(&self) -> FormatResult<Vec<String>> {
        Ok(self.by_state.keys().cloned().collect())
    }

    fn load_snapshots(&self, state: &str) -> FormatResult<Vec<Snapshot>> {
        Ok(self.by_state.get(state).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn document(votes: &[(&str, i64, i64)]) -> String {
        let races: Vec<serde_json::Value> = votes
            .iter()
            .map(|(state, biden, trump)| {
                serde_json::json!({
                    "state_name": state,
                    "electoral_votes": 20,
                    "candidates": [
                        {"last_name": "Biden", "votes": biden},
                        {"last_name": "Trump", "votes": trump}
                    ],
                    "votes": biden + trump,
                    "tot_exp_vote": 7_000_000,
                    "precincts_total": 9000,
                    "precincts_reporting": 8000
                })
            })
            .collect();
        serde_json::json!({"data": {"races": races}}).to_string()
    }

    #[test]
    fn parses_file_name_timestamps() {
        let expected = Utc.with_ymd_and_hms(2020, 11, 5, 12, 30, 0).unwrap();
        assert_eq!(timestamp_from_file_name("results-2020-11-05T12-30-00Z.json"), Some(expected));
        assert_eq!(timestamp_from_file_name("2020-11-05T12:30:00Z.json.gz"), Some(expected));
        assert_eq!(
            timestamp_from_file_name("results-2020-11-05T07-30-00-0500.json"),
            Some(expected)
        );
        assert_eq!(timestamp_from_file_name("results.json"), None);
    }

    #[test]
    fn groups_documents_by_state_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("results-2020-11-05T14-00-00Z.json"),
            document(&[("Pennsylvania", 3_300_000, 3_290_000)]),
        )
        .unwrap();
        fs::write(
            dir.path().join("results-2020-11-05T10-00-00Z.json"),
            document(&[("Pennsylvania", 3_200_000, 3_250_000), ("Georgia", 2_400_000, 2_410_000)]),
        )
        .unwrap();

        let mut gz = GzEncoder::new(
            File::create(dir.path().join("results-2020-11-05T12-00-00Z.json.gz")).unwrap(),
            Compression::default(),
        );
        gz.write_all(document(&[("Pennsylvania", 3_250_000, 3_270_000)]).as_bytes())
            .unwrap();
        gz.finish().unwrap();

        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("latest.json"), "{}").unwrap();

        let source = DirectorySource::open(dir.path(), None).unwrap();
        assert_eq!(source.document_count(), 3);
        assert_eq!(source.states().unwrap(), vec!["Georgia", "Pennsylvania"]);

        let pennsylvania = source.load_snapshots("Pennsylvania").unwrap();
        let biden: Vec<i64> = pennsylvania.iter().map(|s| s.candidates[0].votes).collect();
        assert_eq!(biden, vec![3_200_000, 3_250_000, 3_300_000]);
        assert!(pennsylvania.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(source.load_snapshots("Ohio").unwrap().is_empty());
    }

    #[test]
    fn cached_rows_take_the_file_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(cache_dir.path()).unwrap();

        let body = document(&[("Arizona", 1_600_000, 1_590_000)]);
        fs::write(dir.path().join("results-2020-11-05T10-00-00Z.json"), &body).unwrap();
        fs::write(dir.path().join("results-2020-11-05T11-00-00Z.json"), &body).unwrap();

        let source = DirectorySource::open(dir.path(), Some(&cache)).unwrap();
        let arizona = source.load_snapshots("Arizona").unwrap();
        assert_eq!(arizona.len(), 2);
        assert_eq!(arizona[1].timestamp, Utc.with_ymd_and_hms(2020, 11, 5, 11, 0, 0).unwrap());
        assert!(cache.get(&SnapshotCache::key(body.as_bytes())).is_some());
    }

    #[test]
    fn finds_documents_sharing_an_instant() {
        let at = |h| Utc.with_ymd_and_hms(2020, 11, 5, h, 30, 0).unwrap();
        let mut files = vec![
            (
                timestamp_from_file_name("results-2020-11-05T12-30-00Z.json").unwrap(),
                PathBuf::from("results-2020-11-05T12-30-00Z.json"),
            ),
            (
                timestamp_from_file_name("results-2020-11-05T07-30-00-0500.json").unwrap(),
                PathBuf::from("results-2020-11-05T07-30-00-0500.json"),
            ),
            (at(10), PathBuf::from("a.json")),
            (at(11), PathBuf::from("b.json")),
            (at(11), PathBuf::from("b.json.gz")),
        ];
        files.sort();

        let duplicates = duplicate_instants(&files);
        assert_eq!(duplicates.len(), 2);
        assert_eq!(duplicates[0].0, at(11));
        assert_eq!(duplicates[0].1.len(), 2);
        assert_eq!(duplicates[1].0, at(12));
        assert_eq!(duplicates[1].1.len(), 2);
        assert!(duplicate_instants(&files[..2]).is_empty());
    }

    #[test]
    fn unwritable_cache_does_not_block_loading() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(cache_dir.path()).unwrap();

        let body = document(&[("Georgia", 2_400_000, 2_410_000)]);
        fs::write(dir.path().join("results-2020-11-05T10-00-00Z.json"), &body).unwrap();
        let entry = cache_dir
            .path()
            .join(format!("{}.json", SnapshotCache::key(body.as_bytes())));
        fs::create_dir_all(entry.join("occupied")).unwrap();

        let source = DirectorySource::open(dir.path(), Some(&cache)).unwrap();
        assert_eq!(source.states().unwrap(), vec!["Georgia"]);
        assert_eq!(source.load_snapshots("Georgia").unwrap().len(), 1);
    }

    #[test]
    fn malformed_document_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("results-2020-11-05T10-00-00Z.json"), "{\"data\": 3}").unwrap();

        match DirectorySource::open(dir.path(), None) {
            Err(FormatError::Parse { path, .. }) => {
                assert!(path.ends_with("results-2020-11-05T10-00-00Z.json"))
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("malformed document was accepted"),
        }
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            DirectorySource::open(&dir.path().join("absent"), None),
            Err(FormatError::MissingDirectory(_))
        ));
    }
}
