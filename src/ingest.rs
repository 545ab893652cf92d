// Submit facade: the single entry point the external collaborator calls with
// raw bytes and a source id. Non-coalescing formats return a result
// immediately; coalescing formats are acknowledged and resolved by a later
// session flush.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::detect::{self, FormatTag};
use crate::models::ProcessResult;
use crate::pipeline::{NamedFile, Pipeline};
use crate::session::SessionCoalescer;

#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Payloads larger than this are rejected without decoding.
    pub max_file_bytes: u64,
}

/// Outcome of a submit call.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Pipeline ran to completion; the result is final.
    Completed(Box<ProcessResult>),
    /// File joined a session; the result arrives on the flush channel.
    Accepted { format: FormatTag },
}

pub struct Ingest {
    pipeline: Arc<Pipeline>,
    coalescer: SessionCoalescer,
    config: IngestConfig,
}

impl Ingest {
    pub fn new(pipeline: Arc<Pipeline>, coalescer: SessionCoalescer, config: IngestConfig) -> Self {
        Self {
            pipeline,
            coalescer,
            config,
        }
    }

    pub async fn submit(&self, source_id: &str, filename: &str, payload: Bytes) -> SubmitOutcome {
        if payload.len() as u64 > self.config.max_file_bytes {
            return SubmitOutcome::Completed(Box::new(ProcessResult::failure(
                FormatTag::Generic,
                format!(
                    "file too large: {} bytes (limit {})",
                    payload.len(),
                    self.config.max_file_bytes
                ),
            )));
        }

        let content = String::from_utf8_lossy(&payload).into_owned();
        let tag = detect::detect(&content);
        let decoder = self.pipeline.registry().get(tag).ok();
        if let Some(d) = &decoder
            && !d
                .supported_extensions()
                .iter()
                .any(|ext| filename.ends_with(ext))
        {
            debug!(file = filename, format = %tag, "unusual extension for detected format");
        }
        let needs_coalescing = decoder.is_some_and(|d| d.requires_coalescing());

        if needs_coalescing {
            debug!(source_id, file = filename, format = %tag, "file accepted into session");
            self.coalescer
                .enqueue(
                    source_id,
                    tag,
                    NamedFile {
                        filename: filename.to_string(),
                        content,
                    },
                )
                .await;
            return SubmitOutcome::Accepted { format: tag };
        }

        // Decode/aggregate/encode are CPU-bound with no suspension points;
        // keep them off the event-driven dispatch threads.
        let pipeline = self.pipeline.clone();
        let filename = filename.to_string();
        let result =
            match tokio::task::spawn_blocking(move || pipeline.run_single(tag, &filename, &content))
                .await
            {
                Ok(result) => result,
                Err(e) => ProcessResult::failure(tag, format!("pipeline task failed: {e}")),
            };
        SubmitOutcome::Completed(Box::new(result))
    }
}
