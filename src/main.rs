use std::sync::Arc;

use anyhow::Result;
use benchreport::*;
use bytes::Bytes;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "benchreport starting");

    let paths: Vec<String> = std::env::args().skip(1).collect();
    anyhow::ensure!(
        !paths.is_empty(),
        "usage: benchreport <benchmark-file> [more files...]"
    );

    let pipeline = Arc::new(pipeline::Pipeline::new());
    let (flush_tx, mut flush_rx) =
        tokio::sync::mpsc::channel(app_config.limits.flush_channel_capacity);
    let coalescer = session::SessionCoalescer::new(
        pipeline.clone(),
        session::CoalescerConfig {
            quiet_window_secs: app_config.session.quiet_window_secs,
        },
        flush_tx,
    );
    let ingest = ingest::Ingest::new(
        pipeline,
        coalescer,
        ingest::IngestConfig {
            max_file_bytes: app_config.limits.max_file_bytes,
        },
    );

    let mut accepted = 0usize;
    for path in &paths {
        let payload = Bytes::from(std::fs::read(path)?);
        match ingest.submit("cli", path, payload).await {
            ingest::SubmitOutcome::Completed(result) => write_result(&result)?,
            ingest::SubmitOutcome::Accepted { format } => {
                tracing::info!(file = %path, format = %format, "accepted into session");
                accepted += 1;
            }
        }
    }

    // All coalesced files share the one CLI source id, so at most one flush
    // is pending; wait it out.
    if accepted > 0
        && let Some(flush) = flush_rx.recv().await
    {
        write_result(&flush.result)?;
    }

    Ok(())
}

fn write_result(result: &models::ProcessResult) -> Result<()> {
    if !result.success {
        anyhow::bail!(
            "processing failed ({}): {}",
            result.format,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
    std::fs::write(&result.filenames.workbook, &result.artifacts.workbook)?;
    std::fs::write(&result.filenames.flat, &result.artifacts.flat)?;
    tracing::info!(
        format = %result.format,
        raw = result.raw_count,
        processed = result.processed_count,
        avg_framerate = result.stats.avg_framerate,
        workbook = %result.filenames.workbook,
        flat = %result.filenames.flat,
        "reports written"
    );
    Ok(())
}
