mod snapshot;
mod summary;

pub use snapshot::{Candidate, Snapshot};
pub use summary::{IterationInfo, IterationSummary};
