// # File Record Store
//
// Text-file implementation of RecordStore.
//
// ## Purpose
//
// Keeps the directory durable across restarts. The file is the canonical
// set of records; the directory reads it once and then appends to it.
//
// ## Write Discipline
//
// - Append-only: existing lines are never rewritten
// - One open per append: the handle is dropped before the call returns
// - Flush + sync_data before reporting success
// - A failed append is cut back to the length the file had before it, so a
//   rejected add never leaves a whole or partial line behind
// - A file whose last line lacks a terminator gets one before the new line
//
// ## File Format
//
// ```text
// www.uvsq.fr 193.51.31.90
// poste.uvsq.fr 193.51.31.154
// ```

use async_trait::async_trait;
use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt};

use super::codec;
use crate::Error;
use crate::model::Record;
use crate::traits::RecordStore;

/// File-backed record store
///
/// # Example
///
/// ```rust,no_run
/// use hostdir_core::store::FileRecordStore;
/// use hostdir_core::traits::RecordStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileRecordStore::new("/var/lib/hostdir/dns.txt").await?;
///
///     let lines = store.read_lines().await?;
///     println!("{} line(s)", lines.len());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    path: PathBuf,
}

impl FileRecordStore {
    /// Create a store for `path`
    ///
    /// Creates the parent directory if needed. The file itself is created
    /// on the first append.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::persistence(format!(
                    "Failed to create store directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        Ok(Self { path })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `line` at the end of the file, opening and closing it
    async fn append_line(&self, line: &str) -> Result<(), Error> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                Error::persistence(format!("Failed to open {}: {}", self.path.display(), e))
            })?;

        let original_len = file
            .metadata()
            .await
            .map_err(|e| {
                Error::persistence(format!("Failed to inspect {}: {}", self.path.display(), e))
            })?
            .len();

        let mut buffer = String::with_capacity(line.len() + 2);
        if !Self::ends_with_newline(&mut file, original_len)
            .await
            .map_err(|e| {
                Error::persistence(format!("Failed to inspect {}: {}", self.path.display(), e))
            })?
        {
            buffer.push('\n');
        }
        buffer.push_str(line);
        buffer.push('\n');

        write_or_truncate(&mut file, original_len, buffer.as_bytes())
            .await
            .map_err(|e| {
                Error::persistence(format!("Failed to append to {}: {}", self.path.display(), e))
            })
    }

    /// True for an empty file or one whose last byte is `\n`
    async fn ends_with_newline(file: &mut fs::File, len: u64) -> io::Result<bool> {
        if len == 0 {
            return Ok(true);
        }

        file.seek(SeekFrom::End(-1)).await?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last).await?;
        Ok(last[0] == b'\n')
    }
}

/// Destination of a single append
#[async_trait]
trait AppendTarget: AsyncWrite + Unpin + Send {
    /// Make written data durable
    async fn sync(&mut self) -> io::Result<()>;

    /// Cut the destination back to `len` bytes
    async fn truncate(&mut self, len: u64) -> io::Result<()>;
}

#[async_trait]
impl AppendTarget for fs::File {
    async fn sync(&mut self) -> io::Result<()> {
        self.sync_data().await
    }

    async fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len).await
    }
}

/// Write, flush and sync `bytes`; on any failure truncate back to
/// `original_len` before returning the error
async fn write_or_truncate<T: AppendTarget>(
    target: &mut T,
    original_len: u64,
    bytes: &[u8],
) -> io::Result<()> {
    let written = async {
        target.write_all(bytes).await?;
        target.flush().await?;
        target.sync().await
    }
    .await;

    let Err(e) = written else {
        return Ok(());
    };

    match target.truncate(original_len).await {
        Ok(()) => Err(e),
        Err(undo) => {
            tracing::error!(
                "Append failed ({}) and truncating back to {} bytes failed too: {}",
                e,
                original_len,
                undo
            );
            Err(io::Error::other(format!(
                "{e}; truncating back to {original_len} bytes failed: {undo}"
            )))
        }
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn read_lines(&self) -> Result<Vec<String>, Error> {
        if !self.path.exists() {
            tracing::debug!("Store file does not exist yet: {}", self.path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            Error::persistence(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        Ok(content.lines().map(str::to_owned).collect())
    }

    async fn append_record(&self, record: &Record) -> Result<(), Error> {
        self.append_line(&codec::format_record(record)).await?;
        tracing::trace!("Appended '{}' to {}", record, self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
