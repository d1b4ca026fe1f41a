use super::OutputResult;
use crate::model::IterationSummary;
use crate::reports::StateReport;
use crate::util::write_serialized;
use std::collections::BTreeMap;
use std::path::Path;

/// `{state: [summaries newest first]}`
pub fn summaries_by_state(reports: &[StateReport]) -> BTreeMap<&str, Vec<&IterationSummary>> {
    reports
        .iter()
        .map(|r| (r.state_name.as_str(), r.newest_first().collect()))
        .collect()
}

pub fn write_json(reports: &[StateReport], path: &Path) -> OutputResult<()> {
    write_serialized(path, &summaries_by_state(reports))?;
    Ok(())
}
