use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use idlewatch_core::{ActivityRecord, ChatId, MemberId, Sighting, WatchError, WatchResult};

use crate::format::{self, Entry, Roster};

/// Durable last-seen records, one JSON file per chat.
///
/// Writes are serialized per chat and go to disk before memory is updated,
/// so the in-memory roster always equals the last successfully persisted one.
pub struct ActivityStore {
    state_dir: PathBuf,
    chats: RwLock<HashMap<ChatId, Arc<Mutex<Roster>>>>,
}

impl ActivityStore {
    /// Rebuild the store from `state_dir`. A missing directory is an empty store.
    pub async fn load(state_dir: impl Into<PathBuf>) -> WatchResult<Self> {
        let state_dir = state_dir.into();
        let mut chats = HashMap::new();

        let mut dir = match fs::read_dir(&state_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %state_dir.display(), "State directory does not exist; starting empty");
                return Ok(Self::empty(state_dir));
            }
            Err(e) => return Err(WatchError::persistence(&state_dir, e)),
        };

        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| WatchError::persistence(&state_dir, e))?
        {
            let path = item.path();
            let Some(chat_id) = chat_id_from_path(&path) else {
                if !is_temp_file(&path) {
                    warn!(path = %path.display(), "Ignoring unrecognised file in state directory");
                }
                continue;
            };
            let bytes = fs::read(&path)
                .await
                .map_err(|e| WatchError::persistence(&path, e))?;
            let raw = String::from_utf8(bytes)
                .map_err(|e| WatchError::corrupt(&path, format!("not UTF-8: {}", e)))?;
            let roster = format::decode(&path, &raw)?;
            debug!(chat_id, members = roster.len(), "Loaded chat roster");
            chats.insert(chat_id, Arc::new(Mutex::new(roster)));
        }

        info!(path = %state_dir.display(), chats = chats.len(), "Activity store loaded");
        Ok(Self {
            state_dir,
            chats: RwLock::new(chats),
        })
    }

    fn empty(state_dir: PathBuf) -> Self {
        Self {
            state_dir,
            chats: RwLock::new(HashMap::new()),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Path of the snapshot file backing one chat.
    pub fn chat_file(&self, chat_id: ChatId) -> PathBuf {
        self.state_dir.join(format!("{}.json", chat_id))
    }

    /// Insert or overwrite one member's record, then persist.
    ///
    /// Last write wins: an older `seen_at` still replaces a newer one.
    pub async fn record(
        &self,
        chat_id: ChatId,
        member_id: MemberId,
        display_name: &str,
        seen_at: DateTime<Utc>,
    ) -> WatchResult<()> {
        self.record_batch(chat_id, &[Sighting::new(member_id, display_name, seen_at)])
            .await
    }

    /// Apply several sightings as a single persisted snapshot.
    pub async fn record_batch(&self, chat_id: ChatId, sightings: &[Sighting]) -> WatchResult<()> {
        if sightings.is_empty() {
            return Ok(());
        }

        let (roster, mut current) = loop {
            let roster = self.roster(chat_id).await;
            let current = Arc::clone(&roster).lock_owned().await;
            // A failed first write may have dropped this roster from the table.
            if self.is_registered(chat_id, &roster).await {
                break (roster, current);
            }
        };

        let mut next = current.clone();
        for sighting in sightings {
            let display_name = if sighting.display_name.trim().is_empty() {
                sighting.member_id.to_string()
            } else {
                sighting.display_name.clone()
            };
            next.insert(
                sighting.member_id,
                Entry {
                    display_name,
                    last_seen: format::truncate_to_seconds(sighting.seen_at),
                },
            );
        }

        if let Err(e) = self.persist(chat_id, &next).await {
            if current.is_empty() && !self.chat_file(chat_id).is_file() {
                self.unregister(chat_id, &roster).await;
            }
            return Err(e);
        }
        *current = next;
        debug!(chat_id, count = sightings.len(), "Recorded activity");
        Ok(())
    }

    /// Consistent copy of every record in a chat, ordered by member id.
    pub async fn snapshot(&self, chat_id: ChatId) -> Vec<ActivityRecord> {
        let roster = match self.chats.read().await.get(&chat_id) {
            Some(roster) => Arc::clone(roster),
            None => return Vec::new(),
        };
        let roster = roster.lock().await;
        roster
            .iter()
            .map(|(member_id, entry)| {
                ActivityRecord::new(chat_id, *member_id, entry.display_name.clone(), entry.last_seen)
            })
            .collect()
    }

    /// Remove a member's record. Returns whether one existed.
    pub async fn evict(&self, chat_id: ChatId, member_id: MemberId) -> WatchResult<bool> {
        let roster = match self.chats.read().await.get(&chat_id) {
            Some(roster) => Arc::clone(roster),
            None => return Ok(false),
        };
        let mut current = roster.lock().await;
        if !current.contains_key(&member_id) {
            return Ok(false);
        }

        let mut next = current.clone();
        next.remove(&member_id);
        self.persist(chat_id, &next).await?;
        *current = next;
        info!(chat_id, member_id, "Evicted activity record");
        Ok(true)
    }

    /// Chats with any recorded state, sorted.
    pub async fn chats(&self) -> Vec<ChatId> {
        let mut ids: Vec<ChatId> = self.chats.read().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    async fn roster(&self, chat_id: ChatId) -> Arc<Mutex<Roster>> {
        if let Some(roster) = self.chats.read().await.get(&chat_id) {
            return Arc::clone(roster);
        }
        let mut chats = self.chats.write().await;
        Arc::clone(chats.entry(chat_id).or_default())
    }

    async fn is_registered(&self, chat_id: ChatId, roster: &Arc<Mutex<Roster>>) -> bool {
        self.chats
            .read()
            .await
            .get(&chat_id)
            .is_some_and(|current| Arc::ptr_eq(current, roster))
    }

    /// Drop a chat that never reached disk, so the table matches the files.
    async fn unregister(&self, chat_id: ChatId, roster: &Arc<Mutex<Roster>>) {
        let mut chats = self.chats.write().await;
        if chats.get(&chat_id).is_some_and(|current| Arc::ptr_eq(current, roster)) {
            chats.remove(&chat_id);
        }
    }

    /// Write to a temp file, fsync, then rename over the chat file.
    async fn persist(&self, chat_id: ChatId, roster: &Roster) -> WatchResult<()> {
        let json = format::encode(roster)?;
        let path = self.chat_file(chat_id);
        let tmp_path = path.with_extension("json.tmp");

        fs::create_dir_all(&self.state_dir)
            .await
            .map_err(|e| WatchError::persistence(&self.state_dir, e))?;

        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(|e| WatchError::persistence(&tmp_path, e))?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|e| WatchError::persistence(&tmp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| WatchError::persistence(&tmp_path, e))?;
        drop(file);

        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(WatchError::persistence(&path, e));
        }
        Ok(())
    }
}

fn chat_id_from_path(path: &Path) -> Option<ChatId> {
    if path.extension()? != "json" {
        return None;
    }
    format::parse_id(path.file_stem()?.to_str()?)
}

fn is_temp_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "tmp")
}
