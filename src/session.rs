// Per-source debounce state machine: files of a coalescing format arriving
// within a fixed quiet window are batched and run through the pipeline once.
// One flush timer per session, armed on the first arrival and never reset;
// snapshot-then-delete happens under the store lock, so an arrival can never
// append to a session that has begun flushing.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::detect::FormatTag;
use crate::models::ProcessResult;
use crate::pipeline::{NamedFile, Pipeline};

#[derive(Debug, Clone)]
pub struct CoalescerConfig {
    /// Quiet window after the first file of a batch, in seconds.
    pub quiet_window_secs: u64,
}

/// Outcome of one flushed session, delivered on the results channel.
#[derive(Debug)]
pub struct FlushResult {
    pub source_id: String,
    pub result: ProcessResult,
}

/// Per-source pending state. Lives in the store from first arrival until its
/// flush timer fires; removed exactly once, flush success or not.
struct Session {
    format: FormatTag,
    files: Vec<NamedFile>,
    started_at: Instant,
}

pub struct SessionCoalescer {
    inner: Arc<Inner>,
}

struct Inner {
    pipeline: Arc<Pipeline>,
    sessions: Mutex<HashMap<String, Session>>,
    quiet_window: Duration,
    results_tx: mpsc::Sender<FlushResult>,
}

impl SessionCoalescer {
    pub fn new(
        pipeline: Arc<Pipeline>,
        config: CoalescerConfig,
        results_tx: mpsc::Sender<FlushResult>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                pipeline,
                sessions: Mutex::new(HashMap::new()),
                quiet_window: Duration::from_secs(config.quiet_window_secs),
                results_tx,
            }),
        }
    }

    /// Appends a file to the source's session, creating the session and
    /// arming its single flush timer if this is the first arrival. The timer
    /// is measured from the first arrival and not reset by later ones.
    pub async fn enqueue(&self, source_id: &str, format: FormatTag, file: NamedFile) {
        let mut sessions = self.inner.sessions.lock().await;
        match sessions.get_mut(source_id) {
            Some(session) => {
                if session.format != format {
                    // Mixed-format batch: the first file's format wins.
                    warn!(
                        source_id,
                        session_format = %session.format,
                        file_format = %format,
                        file = %file.filename,
                        "mixed-format batch; first file's format wins"
                    );
                }
                session.files.push(file);
            }
            None => {
                debug!(source_id, format = %format, "session started");
                sessions.insert(
                    source_id.to_string(),
                    Session {
                        format,
                        files: vec![file],
                        started_at: Instant::now(),
                    },
                );
                tokio::spawn(flush_after(
                    self.inner.clone(),
                    source_id.to_string(),
                    self.inner.quiet_window,
                ));
            }
        }
    }

    /// Number of files currently pending for a source (0 when no session).
    pub async fn pending_files(&self, source_id: &str) -> usize {
        let sessions = self.inner.sessions.lock().await;
        sessions.get(source_id).map_or(0, |s| s.files.len())
    }
}

/// Timer task: sleeps out the quiet window, then removes the session and runs
/// the batch pipeline on a blocking thread. The session is gone before the
/// pipeline starts, so late arrivals open a fresh session instead.
async fn flush_after(inner: Arc<Inner>, source_id: String, quiet_window: Duration) {
    tokio::time::sleep(quiet_window).await;

    let session = inner.sessions.lock().await.remove(&source_id);
    let Some(session) = session else {
        return;
    };
    debug!(
        source_id,
        files = session.files.len(),
        waited_ms = session.started_at.elapsed().as_millis() as u64,
        "session flushing"
    );

    let format = session.format;
    let files = session.files;
    let pipeline = inner.pipeline.clone();
    let result =
        match tokio::task::spawn_blocking(move || pipeline.process_batch(format, &files)).await {
            Ok(result) => result,
            Err(e) => ProcessResult::failure(format, format!("pipeline task failed: {e}")),
        };
    if !result.success {
        warn!(
            source_id,
            error = result.error.as_deref().unwrap_or("unknown"),
            "session flush failed"
        );
    }

    if inner
        .results_tx
        .send(FlushResult { source_id, result })
        .await
        .is_err()
    {
        debug!("flush result receiver dropped");
    }
}
