// Result envelope returned to the external collaborator.

use crate::detect::FormatTag;

use super::SummaryStats;

/// The two serialized report artifacts.
#[derive(Debug, Clone, Default)]
pub struct ReportArtifacts {
    /// Multi-sheet workbook: zip archive of named CSV sheets.
    pub workbook: Vec<u8>,
    /// Processed/aggregated view as a single delimited file.
    pub flat: Vec<u8>,
}

/// Suggested download names for the artifacts.
#[derive(Debug, Clone, Default)]
pub struct ReportFilenames {
    pub workbook: String,
    pub flat: String,
}

impl ReportFilenames {
    pub fn for_format(tag: FormatTag) -> Self {
        Self {
            workbook: format!("benchmark_{tag}_results.zip"),
            flat: format!("benchmark_{tag}_results.csv"),
        }
    }

    pub fn combined() -> Self {
        Self {
            workbook: "benchmark_combined_results.zip".into(),
            flat: "benchmark_combined_results.csv".into(),
        }
    }
}

/// Uniform outcome of one pipeline run (single file or coalesced batch).
/// Never retained by the core; the caller owns it.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub success: bool,
    pub format: FormatTag,
    pub error: Option<String>,
    pub stats: SummaryStats,
    pub raw_count: usize,
    pub processed_count: usize,
    pub artifacts: ReportArtifacts,
    pub filenames: ReportFilenames,
}

impl ProcessResult {
    pub fn failure(format: FormatTag, error: impl Into<String>) -> Self {
        Self {
            success: false,
            format,
            error: Some(error.into()),
            stats: SummaryStats::default(),
            raw_count: 0,
            processed_count: 0,
            artifacts: ReportArtifacts::default(),
            filenames: ReportFilenames::default(),
        }
    }
}
