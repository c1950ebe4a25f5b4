//! Lead persistence backends.
//!
//! One contract, two adapters: `RedisLeadStore` is the production path and
//! leans on the backend's atomic `SET NX` for idempotency; `FileLeadStore`
//! is a local append-only JSONL log for environments without Redis.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::models::LeadRecord;

/// Outcome of a conditional insert. `AlreadyExists` is not an error: the
/// same logical lead was submitted before and the stored record stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

/// Store for lead records with insert-if-absent semantics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Insert `record` unless a record with the same id already exists.
    /// Exactly one stored record per id, regardless of concurrent callers.
    async fn insert_if_absent(&self, record: &LeadRecord) -> Result<InsertOutcome>;

    /// Backend reachability check for the health endpoint.
    async fn ping(&self) -> Result<()>;
}

/// Conditional insert as one server-side step: the record write and its
/// `leads:type:` index entry either both land or neither does, so a stored
/// record can never be missing from the index.
/// KEYS[1] = lead key, KEYS[2] = type index; ARGV = json, score, member.
const INSERT_LUA: &str = r"
if redis.call('set', KEYS[1], ARGV[1], 'NX') then
    redis.call('zadd', KEYS[2], ARGV[2], ARGV[3])
    return 1
end
return 0
";

/// Redis implementation of LeadStore.
#[derive(Clone)]
pub struct RedisLeadStore {
    client: redis::Client,
}

impl RedisLeadStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    fn lead_key(id: &str) -> String {
        format!("lead:{}", id)
    }

    fn type_index_key(record: &LeadRecord) -> String {
        format!("leads:type:{}", record.lead.lead_type.as_str())
    }

    fn type_index_member(record: &LeadRecord) -> String {
        format!("{}#{}", record.received_at.to_rfc3339(), record.id)
    }
}

#[async_trait]
impl LeadStore for RedisLeadStore {
    async fn insert_if_absent(&self, record: &LeadRecord) -> Result<InsertOutcome> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(record)?;

        // A 0 reply means SET NX found an existing record and wrote nothing.
        let inserted: i64 = redis::Script::new(INSERT_LUA)
            .key(Self::lead_key(&record.id))
            .key(Self::type_index_key(record))
            .arg(&json)
            .arg(record.received_at.timestamp() as f64)
            .arg(Self::type_index_member(record))
            .invoke_async(&mut conn)
            .await?;

        if inserted == 1 {
            Ok(InsertOutcome::Inserted)
        } else {
            Ok(InsertOutcome::AlreadyExists)
        }
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

/// Append-only JSONL implementation of LeadStore.
///
/// The id index is seeded from the existing file at open; the mutex spans
/// the duplicate check and the append, so concurrent submissions with the
/// same token still produce exactly one line.
pub struct FileLeadStore {
    path: PathBuf,
    ids: Mutex<HashSet<String>>,
}

impl FileLeadStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut ids = HashSet::new();

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                for line in contents.lines().filter(|line| !line.trim().is_empty()) {
                    let record: LeadRecord = serde_json::from_str(line)
                        .with_context(|| format!("corrupt lead log line in {}", path.display()))?;
                    ids.insert(record.id);
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        }

        Ok(Self {
            path,
            ids: Mutex::new(ids),
        })
    }
}

#[async_trait]
impl LeadStore for FileLeadStore {
    async fn insert_if_absent(&self, record: &LeadRecord) -> Result<InsertOutcome> {
        let mut ids = self.ids.lock().await;

        if ids.contains(&record.id) {
            return Ok(InsertOutcome::AlreadyExists);
        }

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("opening {}", self.path.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        ids.insert(record.id.clone());
        Ok(InsertOutcome::Inserted)
    }

    // Read-only probe: a health check must not create the log file. An
    // absent file is healthy as long as its parent directory is writable
    // territory, i.e. it exists.
    async fn ping(&self) -> Result<()> {
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let parent = match self.path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent,
                    _ => Path::new("."),
                };
                tokio::fs::metadata(parent)
                    .await
                    .with_context(|| format!("checking {}", parent.display()))?;
                Ok(())
            }
            Err(err) => Err(err).with_context(|| format!("checking {}", self.path.display())),
        }
    }
}
