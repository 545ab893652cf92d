// Orchestrator: detect -> decode -> aggregate -> encode, for a single file
// or for a coalesced batch. Synchronous and CPU-bound; async callers run it
// on a blocking thread.

use tracing::{debug, info};

use crate::decoders::{Decoder, Registry};
use crate::detect::{self, FormatTag};
use crate::models::{ProcessResult, RawSample, ReportFilenames, SummaryStats};
use crate::report;

/// One file handed to the batch path: name plus decoded-to-text content.
#[derive(Debug, Clone)]
pub struct NamedFile {
    pub filename: String,
    pub content: String,
}

pub struct Pipeline {
    registry: Registry,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            registry: Registry::with_defaults(),
        }
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Single-file path: detect the format, then run the pipeline.
    pub fn process_file(&self, filename: &str, content: &str) -> ProcessResult {
        let tag = detect::detect(content);
        self.run_single(tag, filename, content)
    }

    /// Single-file path with a known tag (used by the submit facade, which
    /// has already detected the format).
    pub fn run_single(&self, tag: FormatTag, filename: &str, content: &str) -> ProcessResult {
        let decoder = match self.registry.get(tag) {
            Ok(d) => d,
            Err(e) => return ProcessResult::failure(tag, e.to_string()),
        };
        let decoded = match decoder.decode(content) {
            Ok(d) => d,
            Err(e) => return ProcessResult::failure(tag, e.to_string()),
        };
        if !decoded.skipped.is_empty() {
            debug!(
                file = filename,
                format = %tag,
                skipped = decoded.skipped.len(),
                "skipped malformed records"
            );
        }
        if decoded.samples.is_empty() {
            return ProcessResult::failure(tag, "no records could be extracted from the file");
        }
        let result = self.finish(tag, decoder.as_ref(), decoded.samples, false);
        info!(
            file = filename,
            format = %tag,
            raw = result.raw_count,
            processed = result.processed_count,
            "file processed"
        );
        result
    }

    /// Multi-file path: decode each file with the batch's declared tag (no
    /// per-file re-detection), concatenate, aggregate once, encode once.
    pub fn process_batch(&self, tag: FormatTag, files: &[NamedFile]) -> ProcessResult {
        if files.is_empty() {
            return ProcessResult::failure(tag, "batch contained no files");
        }
        let decoder = match self.registry.get(tag) {
            Ok(d) => d,
            Err(e) => return ProcessResult::failure(tag, e.to_string()),
        };

        let mut samples: Vec<RawSample> = Vec::new();
        for file in files {
            match decoder.decode(&file.content) {
                Ok(decoded) => {
                    if !decoded.skipped.is_empty() {
                        debug!(
                            file = %file.filename,
                            skipped = decoded.skipped.len(),
                            "skipped malformed records"
                        );
                    }
                    samples.extend(decoded.samples);
                }
                Err(e) => {
                    return ProcessResult::failure(
                        tag,
                        format!("{}: {}", file.filename, e),
                    );
                }
            }
        }
        if samples.is_empty() {
            return ProcessResult::failure(tag, "no records could be extracted from the files");
        }
        let result = self.finish(tag, decoder.as_ref(), samples, true);
        info!(
            files = files.len(),
            format = %tag,
            raw = result.raw_count,
            processed = result.processed_count,
            "batch processed"
        );
        result
    }

    fn finish(
        &self,
        tag: FormatTag,
        decoder: &dyn Decoder,
        samples: Vec<RawSample>,
        combined: bool,
    ) -> ProcessResult {
        let processed = decoder.aggregate(&samples);
        // Everything filtered out is a valid outcome; stats then fall back
        // to the raw samples so the summary is still meaningful.
        let stats = if processed.is_empty() {
            SummaryStats::from_samples(&samples)
        } else {
            SummaryStats::from_groups(&processed)
        };
        let artifacts = report::encode(&samples, &processed, &stats);
        let filenames = if combined {
            ReportFilenames::combined()
        } else {
            ReportFilenames::for_format(tag)
        };
        ProcessResult {
            success: true,
            format: tag,
            error: None,
            stats,
            raw_count: samples.len(),
            processed_count: processed.len(),
            artifacts,
            filenames,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
