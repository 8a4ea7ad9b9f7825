//! Process-local registry for deferred jobs.
//!
//! A deferred submission is remembered as its original request, keyed by a
//! freshly minted job id. The store keeps requests, not results: polling
//! recomputes from the stored request, so polls stay idempotent and the
//! store never holds half-finished state. Contents are process-local and
//! vanish on restart.

use std::fmt;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::distr::Alphanumeric;
use rand::Rng;
use seqalign_core::models::AlignmentRequest;

/// Length of a generated job id, in characters.
pub const JOB_ID_LEN: usize = 10;

/// Opaque identifier handed to callers of the deferred path.
///
/// Ids are random alphanumeric strings from a CSPRNG, so they are not
/// guessable and carry no ordering or timing information.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    fn random() -> Self {
        let id = rand::rng()
            .sample_iter(Alphanumeric)
            .take(JOB_ID_LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Concurrent map of pending jobs, shared across request handlers.
///
/// Backed by `DashMap`, so submissions and polls from different connections
/// never contend on a single lock. The store is injected into handler state
/// rather than reached through a global, which keeps tests hermetic.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: DashMap<JobId, AlignmentRequest>,
}

impl JobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
        }
    }

    /// Registers a request under a fresh job id and returns the id.
    ///
    /// The entry is visible to readers before this returns, so a caller can
    /// poll the id it receives without racing the registration. Collisions
    /// with a live id are resolved by resampling.
    pub fn submit(&self, request: AlignmentRequest) -> JobId {
        loop {
            let id = JobId::random();
            match self.jobs.entry(id.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(request);
                    return id;
                }
            }
        }
    }

    /// Returns a copy of the stored request, or `None` for an unknown id.
    ///
    /// The entry stays in the store, so repeated polls see the same request.
    #[must_use]
    pub fn get(&self, id: &JobId) -> Option<AlignmentRequest> {
        self.jobs.get(id).map(|entry| entry.value().clone())
    }

    /// Number of registered jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the store holds no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
