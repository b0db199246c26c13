//! Test support utilities shared across unit and integration tests.

use std::collections::{BTreeSet, VecDeque};
use std::env;
use std::ffi::OsString;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{Mutex, MutexGuard};

use crate::block::{
    ApiFuture, BlockApiError, BlockStorageApi, CreateSnapshotRequest, CreateVolumeRequest,
    Snapshot, Volume,
};

/// Reply queued on a [`ScriptedBlockApi`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScriptedReply {
    /// Body of a snapshot lookup or creation.
    Snapshot(Snapshot),
    /// Body of a volume lookup or creation.
    Volume(Volume),
    /// Empty body, as returned by deletions.
    Empty,
}

/// Records a single request made through [`ScriptedBlockApi`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BlockCall {
    /// `GET /snapshots/{id}`.
    GetSnapshot {
        /// Zone in the request URL.
        zone: String,
        /// Requested snapshot.
        snapshot_id: String,
    },
    /// `POST /volumes`.
    CreateVolume(CreateVolumeRequest),
    /// `GET /volumes/{id}`.
    GetVolume {
        /// Zone in the request URL.
        zone: String,
        /// Requested volume.
        volume_id: String,
    },
    /// `POST /snapshots`.
    CreateSnapshot(CreateSnapshotRequest),
    /// `DELETE /snapshots/{id}`.
    DeleteSnapshot {
        /// Zone in the request URL.
        zone: String,
        /// Snapshot to delete.
        snapshot_id: String,
    },
}

/// Scripted Block Storage API that returns pre-seeded replies in FIFO order.
///
/// Used to drive deterministic API outcomes without network access.
#[derive(Clone, Debug, Default)]
pub struct ScriptedBlockApi {
    replies: Arc<StdMutex<VecDeque<Result<ScriptedReply, BlockApiError>>>>,
    calls: Arc<StdMutex<Vec<BlockCall>>>,
}

impl ScriptedBlockApi {
    /// Creates an API with no queued replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<BlockCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Queues a snapshot body.
    pub fn push_snapshot(&self, snapshot: Snapshot) {
        self.push(Ok(ScriptedReply::Snapshot(snapshot)));
    }

    /// Queues a volume body.
    pub fn push_volume(&self, volume: Volume) {
        self.push(Ok(ScriptedReply::Volume(volume)));
    }

    /// Queues an empty successful reply.
    pub fn push_empty(&self) {
        self.push(Ok(ScriptedReply::Empty));
    }

    /// Queues an error.
    pub fn push_error(&self, error: BlockApiError) {
        self.push(Err(error));
    }

    fn push(&self, reply: Result<ScriptedReply, BlockApiError>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    fn next(&self, call: BlockCall) -> Result<ScriptedReply, BlockApiError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(BlockApiError::Transport {
                    message: String::from("no scripted response available"),
                })
            })
    }

    fn next_snapshot(&self, call: BlockCall) -> Result<Snapshot, BlockApiError> {
        match self.next(call)? {
            ScriptedReply::Snapshot(snapshot) => Ok(snapshot),
            other => Err(mismatch("snapshot", &other)),
        }
    }

    fn next_volume(&self, call: BlockCall) -> Result<Volume, BlockApiError> {
        match self.next(call)? {
            ScriptedReply::Volume(volume) => Ok(volume),
            other => Err(mismatch("volume", &other)),
        }
    }
}

fn mismatch(expected: &str, reply: &ScriptedReply) -> BlockApiError {
    BlockApiError::Decode {
        message: format!("expected scripted {expected} reply, found {reply:?}"),
    }
}

impl BlockStorageApi for ScriptedBlockApi {
    fn get_snapshot<'a>(&'a self, zone: &'a str, snapshot_id: &'a str) -> ApiFuture<'a, Snapshot> {
        let result = self.next_snapshot(BlockCall::GetSnapshot {
            zone: zone.to_owned(),
            snapshot_id: snapshot_id.to_owned(),
        });
        Box::pin(async move { result })
    }

    fn create_volume<'a>(&'a self, request: &'a CreateVolumeRequest) -> ApiFuture<'a, Volume> {
        let result = self.next_volume(BlockCall::CreateVolume(request.clone()));
        Box::pin(async move { result })
    }

    fn get_volume<'a>(&'a self, zone: &'a str, volume_id: &'a str) -> ApiFuture<'a, Volume> {
        let result = self.next_volume(BlockCall::GetVolume {
            zone: zone.to_owned(),
            volume_id: volume_id.to_owned(),
        });
        Box::pin(async move { result })
    }

    fn create_snapshot<'a>(
        &'a self,
        request: &'a CreateSnapshotRequest,
    ) -> ApiFuture<'a, Snapshot> {
        let result = self.next_snapshot(BlockCall::CreateSnapshot(request.clone()));
        Box::pin(async move { result })
    }

    fn delete_snapshot<'a>(&'a self, zone: &'a str, snapshot_id: &'a str) -> ApiFuture<'a, ()> {
        let result = self
            .next(BlockCall::DeleteSnapshot {
                zone: zone.to_owned(),
                snapshot_id: snapshot_id.to_owned(),
            })
            .and_then(|reply| match reply {
                ScriptedReply::Empty => Ok(()),
                other => Err(mismatch("empty", &other)),
            });
        Box::pin(async move { result })
    }
}

/// Global mutex used to serialise environment mutation in tests.
pub static ENV_LOCK: Mutex<()> = Mutex::const_new(());

/// Guard that holds the env mutex and restores variables on drop.
pub struct EnvGuard {
    previous: Vec<(String, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Sets multiple environment variables while holding a global mutex.
    pub async fn set_vars(pairs: &[(&str, &str)]) -> Self {
        Self::apply(pairs, &[]).await
    }

    /// Sets `pairs` and removes `unset` while holding a global mutex.
    ///
    /// Removing variables keeps values from the developer's shell out of
    /// resolution tests.
    pub async fn apply(pairs: &[(&str, &str)], unset: &[&str]) -> Self {
        debug_assert!(
            {
                let mut seen = BTreeSet::new();
                pairs
                    .iter()
                    .map(|(key, _)| *key)
                    .chain(unset.iter().copied())
                    .all(|key| seen.insert(key))
            },
            "duplicate environment variable keys passed to EnvGuard"
        );

        let guard = ENV_LOCK.lock().await;
        let mut previous = Vec::with_capacity(pairs.len() + unset.len());
        for (key, value) in pairs {
            let old = env::var_os(key);
            // SAFETY: Environment mutation is serialised by `ENV_LOCK`, preventing races.
            unsafe { env::set_var(key, value) };
            previous.push(((*key).to_owned(), old));
        }
        for key in unset {
            let old = env::var_os(key);
            // SAFETY: Environment mutation is serialised by `ENV_LOCK`, preventing races.
            unsafe { env::remove_var(key) };
            previous.push(((*key).to_owned(), old));
        }

        Self {
            previous,
            _guard: guard,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in &self.previous {
            // SAFETY: Environment mutation is serialised by holding `_guard`.
            unsafe {
                match old {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }
    }
}

/// Builds a volume body with the given tags.
#[must_use]
pub fn volume(id: &str, name: &str, zone: &str, tags: &[&str]) -> Volume {
    Volume {
        id: id.to_owned(),
        name: name.to_owned(),
        zone: zone.to_owned(),
        tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
        volume_type: String::from("sbs_5k"),
        specs: None,
    }
}

/// Builds a snapshot body with the given tags.
#[must_use]
pub fn snapshot(id: &str, name: &str, zone: &str, tags: &[&str]) -> Snapshot {
    Snapshot {
        id: id.to_owned(),
        name: name.to_owned(),
        zone: zone.to_owned(),
        tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
        parent_volume: None,
    }
}
