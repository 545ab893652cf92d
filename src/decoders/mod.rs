// Format decoders: one per benchmark file family, polymorphic over a shared
// capability set (sniff / decode / aggregate / describe) plus a registry.
// Aggregation policy is shared free code in `crate::aggregate`, invoked by
// value from the decoders that want it. No inheritance, no overrides.

mod afterburner;
mod capframe;
mod generic;

use std::collections::HashMap;
use std::sync::Arc;

pub use afterburner::AfterburnerDecoder;
pub use capframe::{CapFrameDecoder, low_percentile};
pub use generic::GenericDecoder;

use crate::detect::FormatTag;
use crate::models::{AggregatedGroup, RawSample};

/// Unrecoverable structural problem with a whole file. Record-level problems
/// never surface here; they land in `DecodeReport::skipped`.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON structure: {0}")]
    Json(#[from] serde_json::Error),
    #[error("file contains no run data (Runs)")]
    NoRuns,
    #[error("file contains no frame data")]
    NoFrameData,
}

/// One malformed record that was skipped during decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Record index within the file (run index, block index, or row index).
    pub index: usize,
    pub reason: String,
}

/// Decode output: the samples that parsed, plus an account of what did not.
#[derive(Debug, Clone, Default)]
pub struct DecodeReport {
    pub samples: Vec<RawSample>,
    pub skipped: Vec<SkippedRecord>,
}

impl DecodeReport {
    pub fn skip(&mut self, index: usize, reason: impl Into<String>) {
        self.skipped.push(SkippedRecord {
            index,
            reason: reason.into(),
        });
    }
}

/// Capability set shared by all format decoders.
pub trait Decoder: Send + Sync {
    fn format(&self) -> FormatTag;

    /// Short human-readable description of the format family.
    fn describe(&self) -> &'static str;

    /// Whether this decoder claims the content. The generic decoder always does.
    fn sniff(&self, content: &str) -> bool;

    /// Turns file content into an ordered sample sequence. Fails only on
    /// unrecoverable structural problems; bad records are skipped and recorded.
    fn decode(&self, content: &str) -> Result<DecodeReport, DecodeError>;

    fn supported_extensions(&self) -> &'static [&'static str];

    /// Whether files of this format arrive in multi-file sets from one source
    /// and must be batched before processing.
    fn requires_coalescing(&self) -> bool {
        false
    }

    /// Post-decode aggregation. Default is an integer-cast pass-through;
    /// filtering formats call the shared policy instead.
    fn aggregate(&self, samples: &[RawSample]) -> Vec<AggregatedGroup> {
        samples.iter().map(AggregatedGroup::pass_through).collect()
    }
}

/// Fixed mapping from format tag to decoder instance.
pub struct Registry {
    decoders: HashMap<FormatTag, Arc<dyn Decoder>>,
}

impl Registry {
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// All built-in decoders.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(CapFrameDecoder));
        registry.register(Arc::new(AfterburnerDecoder));
        registry.register(Arc::new(GenericDecoder));
        registry
    }

    pub fn register(&mut self, decoder: Arc<dyn Decoder>) {
        tracing::debug!(format = %decoder.format(), decoder = decoder.describe(), "decoder registered");
        self.decoders.insert(decoder.format(), decoder);
    }

    /// Fails with `UnknownFormat` for tags with no registered decoder.
    pub fn get(&self, tag: FormatTag) -> Result<Arc<dyn Decoder>, UnknownFormat> {
        self.decoders.get(&tag).cloned().ok_or(UnknownFormat(tag))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("no decoder registered for format: {0}")]
pub struct UnknownFormat(pub FormatTag);
