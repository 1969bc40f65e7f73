use anyhow::{Context, Result};
use log::{error, info, warn};
use pack_worker::{Processor, WorkerResponse};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Reads newline-delimited JSON requests from stdin and writes newline-delimited JSON responses to stdout.
/// Logging goes to stderr.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("[WORKER] Starting pack-worker");

    let (output_tx, mut output_rx) = mpsc::unbounded_channel::<WorkerResponse>();

    // Single writer, so responses never interleave
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(response) = output_rx.recv().await {
            let line = match serde_json::to_string(&response) {
                Ok(line) => line,
                Err(e) => {
                    error!("[WORKER] Failed to serialize response: {e}");
                    continue;
                }
            };
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    });

    let processor = Processor::new(output_tx);

    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
        .context("Failed to register SIGTERM handler")?;
    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
        .context("Failed to register SIGINT handler")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut runs: Vec<JoinHandle<()>> = vec![];

    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("[WORKER] Received SIGTERM, cancelling {} run(s)", processor.cancel_all());
                break;
            }
            _ = sigint.recv() => {
                info!("[WORKER] Received SIGINT, cancelling {} run(s)", processor.cancel_all());
                break;
            }
            line = lines.next_line() => {
                match line.context("Failed to read from stdin")? {
                    None => {
                        info!("[WORKER] Input closed");
                        break;
                    }
                    Some(line) if line.trim().is_empty() => continue,
                    Some(line) => {
                        if let Some(run) = processor.process_message(&line) {
                            runs.push(run);
                        }
                        runs.retain(|run| !run.is_finished());
                    }
                }
            }
        }
    }

    // In-flight runs still send their terminal message
    for run in runs {
        if let Err(e) = run.await {
            warn!("[WORKER] Run task failed: {e}");
        }
    }
    drop(processor);

    writer
        .await
        .context("Failed to join output writer")?
        .context("Failed to write to stdout")?;
    info!("[WORKER] Shut down");
    Ok(())
}
