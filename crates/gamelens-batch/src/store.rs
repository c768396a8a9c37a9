//! Document store access
//!
//! The batch driver reads reviews page by page and writes each review's
//! aspect sentiment result back as a single field overwrite. Stores are
//! schemaless: every document is a JSON object, and fields the engine does
//! not know about are left untouched.
//!
//! Two implementations ship with the crate:
//! - [`JsonFileStore`] over a JSON array export of the review collection
//! - [`MemoryStore`] for tests and embedding

use async_trait::async_trait;
use gamelens_core::{Error, Result, Review};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Document field holding the review body
pub const TEXT_FIELD: &str = "review";
/// Document field holding the source platform
pub const PLATFORM_FIELD: &str = "platform";
/// Document field holding the game title
pub const GAME_TITLE_FIELD: &str = "game_title";

/// Result of a single field write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// False when the stored value was already identical
    pub modified: bool,
}

/// Paginated review source with per-document field updates
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch up to `limit` documents starting at offset `skip`.
    /// An empty page means the store is exhausted.
    async fn find(&self, skip: usize, limit: usize) -> Result<Vec<Review>>;

    /// Overwrite `field` of document `id` with `value`.
    ///
    /// A successful return means the write is durable.
    async fn update_field(&self, id: &str, field: &str, value: Value) -> Result<UpdateOutcome>;

    /// Fold durable but not yet compacted writes into the primary
    /// collection. Called once at the end of a run.
    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Store name for logging
    fn name(&self) -> &str;
}

/// Ordered documents plus an id index
#[derive(Debug, Default)]
struct Documents {
    docs: Vec<Map<String, Value>>,
    ids: Vec<String>,
    index: HashMap<String, usize>,
}

impl Documents {
    fn new(values: Vec<Value>) -> Result<Self> {
        let mut docs = Vec::with_capacity(values.len());
        for (position, value) in values.into_iter().enumerate() {
            let Value::Object(doc) = value else {
                return Err(Error::store(format!(
                    "Document at position {position} is not a JSON object"
                )));
            };
            docs.push(doc);
        }

        // Explicit ids first, so a synthetic key never shadows one.
        let mut ids: Vec<Option<String>> = vec![None; docs.len()];
        let mut index = HashMap::with_capacity(docs.len());
        for (position, doc) in docs.iter().enumerate() {
            match explicit_id(doc) {
                Ok(id) if !index.contains_key(&id) => {
                    index.insert(id.clone(), position);
                    ids[position] = Some(id);
                }
                Ok(id) => warn!(position, id = %id, "Duplicate document id, using a positional key"),
                Err(IdProblem::Missing) => {
                    warn!(position, "Document has no id, using a positional key")
                }
                Err(IdProblem::Unsupported(value)) => warn!(
                    position,
                    id = %value,
                    "Unsupported document id type, using a positional key"
                ),
            }
        }

        let ids = ids
            .into_iter()
            .enumerate()
            .map(|(position, id)| match id {
                Some(id) => id,
                None => {
                    let mut key = format!("#{position}");
                    while index.contains_key(&key) {
                        key.push('#');
                    }
                    index.insert(key.clone(), position);
                    key
                }
            })
            .collect();

        Ok(Self { docs, ids, index })
    }

    fn page(&self, skip: usize, limit: usize) -> Vec<Review> {
        self.docs
            .iter()
            .zip(&self.ids)
            .skip(skip)
            .take(limit)
            .map(|(doc, id)| review_from_document(id, doc))
            .collect()
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| Error::store(format!("Document '{id}' not found")))
    }

    /// Replace a field, returning the previous value when it changed
    fn replace(&mut self, position: usize, field: &str, value: Value) -> Option<Option<Value>> {
        let doc = &mut self.docs[position];
        if doc.get(field) == Some(&value) {
            return None;
        }
        Some(doc.insert(field.to_string(), value))
    }

    fn restore(&mut self, position: usize, field: &str, previous: Option<Value>) {
        let doc = &mut self.docs[position];
        match previous {
            Some(value) => doc.insert(field.to_string(), value),
            None => doc.remove(field),
        };
    }

    fn get(&self, id: &str) -> Option<&Map<String, Value>> {
        self.index.get(id).map(|position| &self.docs[*position])
    }

    fn len(&self) -> usize {
        self.docs.len()
    }
}

enum IdProblem {
    Missing,
    Unsupported(Value),
}

/// Store id of a document: `_id` (string, number or `{"$oid": ..}`), then `id`
fn explicit_id(doc: &Map<String, Value>) -> std::result::Result<String, IdProblem> {
    let value = doc
        .get("_id")
        .or_else(|| doc.get("id"))
        .ok_or(IdProblem::Missing)?;

    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Object(o) => o
            .get("$oid")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| IdProblem::Unsupported(value.clone())),
        other => Err(IdProblem::Unsupported(other.clone())),
    }
}

fn review_from_document(id: &str, doc: &Map<String, Value>) -> Review {
    let text = doc.get(TEXT_FIELD).and_then(Value::as_str).unwrap_or_default();
    let mut review = Review::new(id, text);

    if let Some(platform) = doc.get(PLATFORM_FIELD).and_then(Value::as_str) {
        review = review.with_platform(platform);
    }
    if let Some(title) = doc.get(GAME_TITLE_FIELD).and_then(Value::as_str) {
        review = review.with_game_title(title);
    }
    review
}

/// In-memory document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Documents>,
}

impl MemoryStore {
    pub fn new(documents: Vec<Value>) -> Result<Self> {
        Ok(Self {
            documents: RwLock::new(Documents::new(documents)?),
        })
    }

    /// Current contents of a document
    pub fn get(&self, id: &str) -> Option<Map<String, Value>> {
        self.documents.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, skip: usize, limit: usize) -> Result<Vec<Review>> {
        Ok(self.documents.read().page(skip, limit))
    }

    async fn update_field(&self, id: &str, field: &str, value: Value) -> Result<UpdateOutcome> {
        let mut documents = self.documents.write();
        let position = documents.position(id)?;
        let modified = documents.replace(position, field, value).is_some();
        Ok(UpdateOutcome { modified })
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// One field write, as appended to the journal
#[derive(Serialize)]
struct JournalRecord<'a> {
    id: &'a str,
    field: &'a str,
    value: &'a Value,
}

#[derive(Deserialize)]
struct JournalEntry {
    id: String,
    field: String,
    value: Value,
}

#[derive(Debug)]
struct FileState {
    documents: Documents,
    journal: Option<File>,
    pending: usize,
}

/// Document store over a JSON array file.
///
/// The whole collection is held in memory. Each modifying update is
/// appended as one synced line to `<file>.journal`; [`flush`] rewrites the
/// collection once through a temporary file in the same directory and
/// removes the journal. Opening a collection with a leftover journal
/// replays it, so an interrupted run loses no acknowledged write.
///
/// [`flush`]: DocumentStore::flush
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    journal_path: PathBuf,
    state: Mutex<FileState>,
}

impl JsonFileStore {
    /// Open an existing collection file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::store(format!("Failed to read store {}: {}", path.display(), e))
        })?;
        let values: Vec<Value> = serde_json::from_str(&content).map_err(|e| {
            Error::store(format!(
                "Store {} is not a JSON array of documents: {}",
                path.display(),
                e
            ))
        })?;

        let store = Self {
            path: path.to_path_buf(),
            journal_path: journal_path(path),
            state: Mutex::new(FileState {
                documents: Documents::new(values)?,
                journal: None,
                pending: 0,
            }),
        };

        let replayed = store.replay_journal()?;
        if replayed > 0 {
            info!(path = %path.display(), replayed, "Recovered journaled updates");
            store.compact()?;
        }

        info!(
            path = %path.display(),
            documents = store.len(),
            "Opened document store"
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    pub fn len(&self) -> usize {
        self.state.lock().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Updates journaled since the last compaction
    pub fn pending(&self) -> usize {
        self.state.lock().pending
    }

    fn replay_journal(&self) -> Result<usize> {
        let file = match File::open(&self.journal_path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut state = self.state.lock();
        let mut replayed = 0;
        for (number, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            // A torn last line from a crash is expected; skip anything unreadable.
            let entry: JournalEntry = match serde_json::from_str(&line) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(line = number + 1, error = %e, "Skipping unreadable journal line");
                    continue;
                }
            };
            match state.documents.position(&entry.id) {
                Ok(position) => {
                    state.documents.replace(position, &entry.field, entry.value);
                    replayed += 1;
                }
                Err(_) => warn!(id = %entry.id, "Journal entry for unknown document"),
            }
        }
        state.pending = replayed;
        Ok(replayed)
    }

    fn append(&self, journal: &mut Option<File>, record: &JournalRecord<'_>) -> Result<()> {
        if journal.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.journal_path)?;
            *journal = Some(file);
        }
        let Some(file) = journal.as_mut() else {
            return Err(Error::store("Journal is not open"));
        };

        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        file.write_all(&line)?;
        file.sync_data()?;
        Ok(())
    }

    /// Rewrite the collection and drop the journal
    fn compact(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.pending == 0 {
            return Ok(());
        }

        self.write_file(&state.documents)?;

        state.journal = None;
        match std::fs::remove_file(&self.journal_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        debug!(path = %self.path.display(), updates = state.pending, "Compacted store");
        state.pending = 0;
        Ok(())
    }

    fn write_file(&self, documents: &Documents) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &documents.docs)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| {
            Error::store(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e.error
            ))
        })?;
        Ok(())
    }
}

fn journal_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".journal");
    PathBuf::from(name)
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn find(&self, skip: usize, limit: usize) -> Result<Vec<Review>> {
        Ok(self.state.lock().documents.page(skip, limit))
    }

    async fn update_field(&self, id: &str, field: &str, value: Value) -> Result<UpdateOutcome> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let position = state.documents.position(id)?;

        let Some(previous) = state.documents.replace(position, field, value) else {
            debug!(document = id, field, "Field already up to date");
            return Ok(UpdateOutcome { modified: false });
        };

        let record = JournalRecord {
            id,
            field,
            value: &state.documents.docs[position][field],
        };
        if let Err(e) = self.append(&mut state.journal, &record) {
            // Keep memory in line with what is durable
            state.documents.restore(position, field, previous);
            state.journal = None;
            return Err(e);
        }

        state.pending += 1;
        Ok(UpdateOutcome { modified: true })
    }

    async fn flush(&self) -> Result<()> {
        self.compact()
    }

    fn name(&self) -> &str {
        "json-file"
    }
}
