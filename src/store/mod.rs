pub mod types;

use std::path::Path;

use anyhow::{Context, Result};
use cnidarium::{StateDelta, StateRead, StateWrite, Storage};
use futures::StreamExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use types::{RecordId, SentimentRecord};

// Key prefixes (no trailing slashes, cnidarium convention)
const RECORD_PREFIX: &str = "pulse/record";
const PLAYER_PREFIX: &str = "pulse/player";
const SEQ_PREFIX: &str = "pulse/seq";

fn record_key(id: &str) -> String {
    format!("{}/{}", RECORD_PREFIX, id)
}
fn player_key(player: &str, id: &str) -> String {
    format!("{}/{}:{}", PLAYER_PREFIX, player, id)
}
fn seq_key() -> String {
    format!("{}/next", SEQ_PREFIX)
}

/// Result of persisting one transcript's records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    pub inserted: usize,
    /// Records whose identity key already existed.
    pub skipped: usize,
}

/// Append-only sentiment record store. First write of a key wins.
pub struct SentimentStore {
    storage: Storage,
    /// Held from snapshot read to commit; one writer at a time.
    write_lock: Mutex<()>,
}

impl SentimentStore {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let prefixes = vec![
            RECORD_PREFIX.to_string(),
            PLAYER_PREFIX.to_string(),
            SEQ_PREFIX.to_string(),
        ];
        let storage = Storage::load(data_dir.to_path_buf(), prefixes)
            .await
            .context("Failed to init cnidarium storage")?;
        Ok(Self {
            storage,
            write_lock: Mutex::new(()),
        })
    }

    /// Persist a batch in one commit, skipping keys that already exist
    /// (in storage or earlier in the same batch).
    pub async fn insert_batch(&self, records: &[SentimentRecord]) -> Result<InsertOutcome> {
        let _guard = self.write_lock.lock().await;
        let snapshot = self.storage.latest_snapshot();
        let mut delta = StateDelta::new(snapshot);

        let mut next_seq = match delta.get_raw(&seq_key()).await? {
            Some(bytes) => decode_seq(&bytes)?,
            None => 0,
        };

        let mut outcome = InsertOutcome::default();
        for record in records {
            let id = record.id();
            if delta.get_raw(&record_key(&id)).await?.is_some() {
                outcome.skipped += 1;
                continue;
            }

            let mut record = record.clone();
            record.seq = next_seq;
            next_seq += 1;

            delta.put_raw(
                record_key(&id),
                serde_json::to_vec(&record).context("serialize SentimentRecord")?,
            );
            // Player index entry, value is the record id
            delta.put_raw(player_key(&record.player_name, &id), id.clone().into_bytes());
            outcome.inserted += 1;
        }

        if outcome.inserted > 0 {
            delta.put_raw(seq_key(), next_seq.to_le_bytes().to_vec());
            self.storage.commit(delta).await?;
        }
        debug!(
            inserted = outcome.inserted,
            skipped = outcome.skipped,
            "sentiment batch stored"
        );
        Ok(outcome)
    }

    pub async fn get(&self, id: &RecordId) -> Result<Option<SentimentRecord>> {
        let snapshot = self.storage.latest_snapshot();
        match snapshot.get_raw(&record_key(id)).await? {
            Some(bytes) => Ok(Some(
                serde_json::from_slice(&bytes).context("deserialize SentimentRecord")?,
            )),
            None => Ok(None),
        }
    }

    /// Every record for one canonical player name, in no particular order.
    pub async fn records_for_player(&self, player: &str) -> Result<Vec<SentimentRecord>> {
        let snapshot = self.storage.latest_snapshot();
        let prefix = format!("{}/{}:", PLAYER_PREFIX, player);
        let mut stream = snapshot.prefix_raw(&prefix);
        let mut results = Vec::new();

        while let Some(entry) = stream.next().await {
            match entry {
                Ok((_key, value)) => {
                    let id = String::from_utf8_lossy(&value).to_string();
                    match self.get(&id).await {
                        Ok(Some(record)) => results.push(record),
                        Ok(None) => warn!(record_id = %id, "Dangling player index entry"),
                        Err(e) => warn!("Failed to read record {}: {}", id, e),
                    }
                }
                Err(e) => {
                    warn!("Error reading player index: {}", e);
                }
            }
        }

        Ok(results)
    }

    /// Every stored record, in no particular order.
    pub async fn all_records(&self) -> Result<Vec<SentimentRecord>> {
        let snapshot = self.storage.latest_snapshot();
        let mut stream = snapshot.prefix_raw(RECORD_PREFIX);
        let mut results = Vec::new();

        while let Some(entry) = stream.next().await {
            match entry {
                Ok((_key, value)) => match serde_json::from_slice::<SentimentRecord>(&value) {
                    Ok(record) => results.push(record),
                    Err(e) => warn!("Skipping unreadable record: {}", e),
                },
                Err(e) => {
                    warn!("Error reading record stream: {}", e);
                }
            }
        }

        Ok(results)
    }

    pub async fn records_for_team(&self, team: &str) -> Result<Vec<SentimentRecord>> {
        let mut records = self.all_records().await?;
        records.retain(|r| r.team == team);
        Ok(records)
    }
}

fn decode_seq(bytes: &[u8]) -> Result<u64> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("corrupt sequence counter ({} bytes)", bytes.len()))?;
    Ok(u64::from_le_bytes(arr))
}
