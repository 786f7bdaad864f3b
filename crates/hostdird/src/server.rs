//! Line-protocol server
//!
//! One command per line. Every reply is its text lines followed by a
//! terminator line holding a single `.`:
//!
//! ```text
//! > ls uvsq.fr
//! < 193.51.25.12 ecampus.uvsq.fr
//! < 193.51.31.154 poste.uvsq.fr
//! < .
//! ```

use anyhow::Result;
use hostdir_core::Directory;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_stream::StreamExt;
use tokio_util::codec::FramedRead;
use tracing::{debug, error, info, warn};

use crate::input::CommandCodec;
use crate::session::respond_to_input;

/// Terminator written after every reply
const END_OF_REPLY: &str = ".\n";

/// Accept connections until `shutdown` resolves
///
/// Each connection runs on its own task and shares `directory`.
pub async fn serve<F>(
    listener: TcpListener,
    directory: Arc<Directory>,
    max_line_bytes: usize,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    info!("Listening on {}", listener.local_addr()?);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                };

                let directory = Arc::clone(&directory);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, peer, directory, max_line_bytes).await {
                        error!("Connection {} failed: {}", peer, e);
                    }
                });
            }
            _ = &mut shutdown => {
                info!("Stopping listener");
                break;
            }
        }
    }

    Ok(())
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    directory: Arc<Directory>,
    max_line_bytes: usize,
) -> Result<()> {
    debug!("Connection opened: {}", peer);

    let (read_half, mut write_half) = stream.into_split();
    let mut lines = FramedRead::new(read_half, CommandCodec::new(max_line_bytes));

    while let Some(input) = lines.next().await {
        let Some(response) = respond_to_input(&directory, input?, max_line_bytes).await else {
            continue;
        };
        let mut frame = response.text;
        if !frame.is_empty() {
            frame.push('\n');
        }
        frame.push_str(END_OF_REPLY);
        write_half.write_all(frame.as_bytes()).await?;

        if response.quit {
            break;
        }
    }

    write_half.shutdown().await?;
    debug!("Connection closed: {}", peer);
    Ok(())
}
