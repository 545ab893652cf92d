// Domain models: decoded samples, aggregated rows, result envelope.

mod result;
mod sample;

pub use result::{ProcessResult, ReportArtifacts, ReportFilenames};
pub use sample::{AggregatedGroup, GroupKey, RawSample, SummaryStats};
