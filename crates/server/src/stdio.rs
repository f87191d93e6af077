//! Line-delimited JSON-RPC over stdin/stdout.
//!
//! Each frame is handled on its own task. Responses funnel through one
//! writer task so concurrent calls never interleave partial lines.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::rpc::McpServer;

/// Serve the process's stdin and stdout until stdin closes.
pub async fn serve_stdio(server: McpServer) -> io::Result<()> {
    info!(tools = server.registry().len(), "MCP stdio transport ready");
    serve(server, tokio::io::stdin(), tokio::io::stdout()).await
}

/// Serve frames read from `reader`, answering on `writer`.
///
/// Returns once the reader is exhausted and every in-flight call has
/// been answered.
pub async fn serve<R, W>(server: McpServer, reader: R, writer: W) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<String>(64);

    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(frame) = rx.recv().await {
            writer.write_all(frame.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        writer.shutdown().await
    });

    let mut lines = BufReader::new(reader).lines();
    let mut in_flight = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        let frame = line.trim();
        if frame.is_empty() {
            continue;
        }

        let server = server.clone();
        let tx = tx.clone();
        let frame = frame.to_string();
        in_flight.spawn(async move {
            let Some(response) = server.handle_frame(&frame).await else {
                return;
            };
            match serde_json::to_string(&response) {
                Ok(text) => {
                    if tx.send(text).await.is_err() {
                        debug!("Writer closed before response was sent");
                    }
                }
                Err(e) => error!(error = %e, "Failed to encode response"),
            }
        });

        while let Some(finished) = in_flight.try_join_next() {
            if let Err(e) = finished {
                error!(error = %e, "Request task panicked");
            }
        }
    }

    while let Some(finished) = in_flight.join_next().await {
        if let Err(e) = finished {
            error!(error = %e, "Request task panicked");
        }
    }

    drop(tx);
    writer_task.await.map_err(io::Error::other)?
}
