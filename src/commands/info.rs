use super::CacheArgs;
use crate::formats::SnapshotSource;
use colored::*;
use std::error::Error;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// List every state in the snapshot directory with its snapshot span.
pub fn info(snapshot_dir: &Path, cache: &CacheArgs) -> Result<(), Box<dyn Error>> {
    let source = cache.open_source(snapshot_dir)?;

    println!(
        "📋 {} document versions in {}",
        source.document_count().to_string().bright_yellow(),
        source.dir().display().to_string().bright_cyan()
    );

    for state in source.states()? {
        let snapshots = source.load_snapshots(&state)?;
        let span = match (snapshots.first(), snapshots.last()) {
            (Some(first), Some(last)) => format!(
                "{} → {}",
                first.timestamp.format(TIMESTAMP_FORMAT),
                last.timestamp.format(TIMESTAMP_FORMAT)
            ),
            _ => "no snapshots".to_string(),
        };

        println!(
            "  {} {} snapshots ({})",
            format!("{:<20}", state).green(),
            snapshots.len().to_string().bright_white(),
            span.dimmed()
        );
    }

    Ok(())
}
