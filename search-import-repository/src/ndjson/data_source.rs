//! NDJSON data source implementation.

use std::collections::HashMap;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, instrument, trace};

use crate::errors::DataSourceError;
use crate::interfaces::DataSource;
use search_import_shared::SearchDocument;

/// Where the next unread record of a collection starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    next_offset: usize,
    position: u64,
}

/// A file left open by the previous page so the next one can continue reading.
struct OpenFile {
    collection: String,
    cursor: Cursor,
    reader: BufReader<File>,
}

/// Data source reading one NDJSON file per collection.
///
/// Blank lines are ignored and do not count towards offsets. Sequential pages
/// continue from where the previous page stopped instead of rescanning the
/// file. The file handle stays open between pages until
/// [`DataSource::release_page_resources`] is called; after that only the byte
/// position is remembered and the file is reopened on the next page.
pub struct NdjsonDataSource {
    root: PathBuf,
    open: Mutex<Option<OpenFile>>,
    cursors: Mutex<HashMap<String, Cursor>>,
}

impl NdjsonDataSource {
    /// Create a data source reading from the `root` directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            open: Mutex::new(None),
            cursors: Mutex::new(HashMap::new()),
        }
    }

    /// Directory the collection files are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{}.ndjson", collection))
    }

    /// Open `collection` positioned at the start of record `offset`.
    async fn open_at(&self, collection: &str, offset: usize) -> Result<OpenFile, DataSourceError> {
        let path = self.collection_path(collection);
        let file = File::open(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DataSourceError::unknown_collection(collection),
            _ => DataSourceError::Io(e),
        })?;
        let mut reader = BufReader::new(file);

        let remembered = self.cursors.lock().await.get(collection).copied();
        let cursor = match remembered {
            Some(cursor) if cursor.next_offset <= offset => {
                reader.seek(SeekFrom::Start(cursor.position)).await?;
                cursor
            }
            _ => Cursor {
                next_offset: 0,
                position: 0,
            },
        };

        let mut open = OpenFile {
            collection: collection.to_string(),
            cursor,
            reader,
        };

        let mut line = String::new();
        while open.cursor.next_offset < offset {
            line.clear();
            let read = open.reader.read_line(&mut line).await?;
            if read == 0 {
                break;
            }
            open.cursor.position += read as u64;
            if !line.trim().is_empty() {
                open.cursor.next_offset += 1;
            }
        }

        trace!(
            collection = %collection,
            offset = offset,
            position = open.cursor.position,
            "Opened collection file"
        );

        Ok(open)
    }
}

#[async_trait]
impl DataSource for NdjsonDataSource {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn page(
        &self,
        collection: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SearchDocument>, DataSourceError> {
        let mut open = self.open.lock().await;

        let mut file = match open.take() {
            Some(file) if file.collection == collection && file.cursor.next_offset == offset => {
                file
            }
            _ => self.open_at(collection, offset).await?,
        };

        let mut documents = Vec::with_capacity(limit);
        let mut line = String::new();

        while documents.len() < limit {
            line.clear();
            let read = file.reader.read_line(&mut line).await?;
            if read == 0 {
                break;
            }
            file.cursor.position += read as u64;

            let record = line.trim();
            if record.is_empty() {
                continue;
            }

            let document: SearchDocument = serde_json::from_str(record).map_err(|e| {
                DataSourceError::parse(collection, file.cursor.next_offset, e.to_string())
            })?;
            file.cursor.next_offset += 1;
            documents.push(document);
        }

        debug!(
            collection = %collection,
            offset = offset,
            count = documents.len(),
            "Read page"
        );

        self.cursors
            .lock()
            .await
            .insert(collection.to_string(), file.cursor);
        *open = Some(file);

        Ok(documents)
    }

    fn release_page_resources(&self) {
        // The cursor survives; only the handle and its read buffer are dropped.
        if let Ok(mut open) = self.open.try_lock() {
            *open = None;
        }
    }
}
