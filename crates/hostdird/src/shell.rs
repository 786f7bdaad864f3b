//! Interactive mode: commands on stdin, replies on stdout

use anyhow::Result;
use hostdir_core::Directory;
use tokio::io::AsyncWriteExt;
use tokio_stream::StreamExt;
use tokio_util::codec::FramedRead;
use tracing::info;

use crate::input::CommandCodec;
use crate::session::respond_to_input;

const PROMPT: &str = "hostdir> ";

/// Run the shell until `quit`, end of input, or Ctrl-C
pub async fn run(directory: &Directory, max_line_bytes: usize) -> Result<()> {
    let mut lines = FramedRead::new(tokio::io::stdin(), CommandCodec::new(max_line_bytes));
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let input = tokio::select! {
            input = lines.next() => input.transpose()?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(input) = input else {
            stdout.write_all(b"\n").await?;
            break;
        };
        let Some(response) = respond_to_input(directory, input, max_line_bytes).await else {
            continue;
        };
        if !response.text.is_empty() {
            stdout.write_all(response.text.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        if response.quit {
            break;
        }
    }

    stdout.flush().await?;
    info!("Shell session ended");
    Ok(())
}
