mod export;
mod info;
mod summarize;

pub use export::{export, ExportFormat};
pub use info::info;
pub use summarize::summarize;

use crate::cache::SnapshotCache;
use crate::formats::DirectorySource;
use crate::metrics::{MetricsCollector, Stage};
use crate::reports::trend::DEFAULT_VOLUME_FLOOR;
use crate::reports::{summarize_source, StateReport, SummaryOptions};
use clap::Args;
use colored::*;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Where parsed documents are cached.
#[derive(Args, Debug, Clone)]
pub struct CacheArgs {
    /// Directory for parsed snapshot cache entries.
    #[clap(long, default_value = "_cache")]
    pub cache_dir: PathBuf,
    /// Parse every document without reading or writing the cache.
    #[clap(long)]
    pub no_cache: bool,
}

impl CacheArgs {
    pub fn open_source(&self, snapshot_dir: &Path) -> Result<DirectorySource, Box<dyn Error>> {
        let cache = if self.no_cache {
            None
        } else {
            Some(SnapshotCache::new(&self.cache_dir)?)
        };
        Ok(DirectorySource::open(snapshot_dir, cache.as_ref())?)
    }
}

/// Options shared by the commands that summarize states.
#[derive(Args, Debug, Clone)]
pub struct Selection {
    /// Summarize only these states (repeatable). Defaults to the battleground states.
    #[clap(long = "state")]
    pub states: Vec<String>,
    /// Summarize every state found in the snapshots.
    #[clap(long, conflicts_with = "states")]
    pub all_states: bool,
    /// Number of recent votes the trend is averaged over.
    #[clap(long, default_value_t = DEFAULT_VOLUME_FLOOR)]
    pub volume_floor: i64,
    #[clap(flatten)]
    pub cache: CacheArgs,
}

impl Selection {
    pub fn options(&self) -> SummaryOptions {
        let states = if self.all_states {
            None
        } else if self.states.is_empty() {
            SummaryOptions::default().states
        } else {
            Some(self.states.clone())
        };

        SummaryOptions {
            states,
            volume_floor: self.volume_floor,
        }
    }
}

/// Read snapshots and summarize the selected states, timing both stages.
fn load_reports(
    snapshot_dir: &Path,
    selection: &Selection,
    metrics: &mut MetricsCollector,
) -> Result<Vec<StateReport>, Box<dyn Error>> {
    println!(
        "🔍 Reading snapshots from {}",
        snapshot_dir.display().to_string().bright_cyan()
    );

    metrics.start_stage(Stage::Loading);
    let source = selection.cache.open_source(snapshot_dir)?;
    metrics.end_stage(Stage::Loading, Some(source.document_count() as u64));

    println!(
        "📁 Found {} document versions",
        source.document_count().to_string().bright_yellow()
    );

    metrics.start_stage(Stage::Summarizing);
    let reports = summarize_source(&source, &selection.options())?;
    let batches: usize = reports.iter().map(|r| r.len()).sum();
    metrics.end_stage(Stage::Summarizing, Some(batches as u64));

    Ok(reports)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selection_uses_battlegrounds() {
        let cache = tempfile::tempdir().unwrap();
        let options = fixtures::selection(cache.path()).options();
        assert!(options.states.unwrap().contains(&"Georgia".to_string()));
    }

    #[test]
    fn explicit_and_all_state_selection() {
        let cache = tempfile::tempdir().unwrap();
        let mut selection = fixtures::selection(cache.path());
        selection.states = vec!["Ohio".to_string()];
        assert_eq!(selection.options().states, Some(vec!["Ohio".to_string()]));

        selection.states.clear();
        selection.all_states = true;
        assert_eq!(selection.options().states, None);
    }

    #[test]
    fn loads_and_summarizes_through_the_cache() {
        let snapshots = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        fixtures::write_snapshots(snapshots.path());

        let mut selection = fixtures::selection(cache.path());
        selection.all_states = true;
        let mut metrics = MetricsCollector::new();

        let reports = load_reports(snapshots.path(), &selection, &mut metrics).unwrap();
        let counts: Vec<(&str, usize)> = reports
            .iter()
            .map(|r| (r.state_name.as_str(), r.len()))
            .collect();
        // The third version repeats the second and is absorbed.
        assert_eq!(counts, vec![("Georgia", 2), ("Ohio", 2)]);
        assert_eq!(std::fs::read_dir(cache.path()).unwrap().count(), 2);
    }
}
