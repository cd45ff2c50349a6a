//! Newline-delimited JSON-RPC over standard input/output
//!
//! Every inbound line is handled on its own task. Responses are funneled
//! through a channel into a single writer so frames never interleave;
//! completions may therefore be written out of issuance order.

use serde_json::Value;
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout},
    sync::mpsc,
    task::JoinHandle,
};
use tracing::{debug, info};

use crate::mcp::{rpc::json_rpc_error, server::handle_json_rpc_value};
use crate::AppState;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to read from stdin: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write to stdout: {0}")]
    Write(#[source] std::io::Error),
    #[error("transport writer stopped unexpectedly: {0}")]
    Writer(#[from] tokio::task::JoinError),
}

pub struct StdioServer<R, W> {
    state: AppState,
    reader: R,
    writer: W,
}

impl StdioServer<Stdin, Stdout> {
    pub fn connect(state: AppState) -> Self {
        Self::new(state, tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> StdioServer<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(state: AppState, reader: R, writer: W) -> Self {
        Self {
            state,
            reader,
            writer,
        }
    }

    /// Serves until the reader reaches EOF, then drains in-flight requests.
    pub async fn run(self) -> Result<(), TransportError> {
        let (frames_tx, frames_rx) = mpsc::unbounded_channel::<Value>();
        let mut writer_task: JoinHandle<Result<(), TransportError>> =
            tokio::spawn(write_frames(self.writer, frames_rx));

        let mut reader = BufReader::new(self.reader);
        let mut buffer = Vec::new();
        let read_result = loop {
            buffer.clear();
            tokio::select! {
                written = &mut writer_task => {
                    // Only a failed or panicked writer ends while a sender is still alive.
                    return match written {
                        Ok(result) => result,
                        Err(err) => Err(err.into()),
                    };
                }
                read = reader.read_until(b'\n', &mut buffer) => match read {
                    Ok(0) => {
                        info!("transport closed by peer");
                        break Ok(());
                    }
                    Ok(_) => {}
                    Err(err) => break Err(TransportError::Read(err)),
                },
            }

            // Invalid UTF-8 is decoded lossily so one bad frame cannot stop the transport.
            let line = String::from_utf8_lossy(&buffer).into_owned();
            if line.trim().is_empty() {
                continue;
            }

            let state = self.state.clone();
            let frames_tx = frames_tx.clone();
            tokio::spawn(async move {
                if let Some(response) = handle_line(&state, &line).await {
                    let _ = frames_tx.send(response);
                }
            });
        };

        // The writer finishes once every in-flight task has dropped its sender.
        drop(frames_tx);
        let write_result = writer_task.await?;

        read_result?;
        write_result
    }
}

async fn write_frames<W>(
    mut writer: W,
    mut frames: mpsc::UnboundedReceiver<Value>,
) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = frames.recv().await {
        let mut encoded = frame.to_string();
        encoded.push('\n');

        writer
            .write_all(encoded.as_bytes())
            .await
            .map_err(TransportError::Write)?;
        writer.flush().await.map_err(TransportError::Write)?;
    }

    Ok(())
}

/// Decodes one line, which may hold a single message or a batch array.
pub async fn handle_line(state: &AppState, line: &str) -> Option<Value> {
    let payload: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(err) => {
            debug!(error = %err, "discarding unparseable frame");
            return Some(json_rpc_error(None, -32700, "Parse error"));
        }
    };

    let Some(batch) = payload.as_array() else {
        return handle_json_rpc_value(state, payload).await;
    };

    if batch.is_empty() {
        return Some(Value::Array(vec![json_rpc_error(
            None,
            -32600,
            "Invalid Request",
        )]));
    }

    let mut responses = Vec::new();
    for item in batch {
        if let Some(response) = handle_json_rpc_value(state, item.clone()).await {
            responses.push(response);
        }
    }

    if responses.is_empty() {
        return None;
    }

    Some(Value::Array(responses))
}
