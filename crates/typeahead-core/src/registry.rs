//! Cancellation registry: keyed table of the cancellation handles of every
//! live operation.
//!
//! A [`CancellationRegistry`] is an explicit object: build one, clone it into
//! whoever needs it. Each registered operation owns a [`Registration`] guard;
//! the table owns a clone of the same [`CancellationToken`]. The entry is
//! released at the first terminal event:
//!
//! - the operation completes or fails, dropping its guard, or
//! - someone cancels the key, which removes the entry and signals the token.
//!
//! # Locking
//!
//! All table mutations happen under one [`Mutex`]. The lock is never held
//! while tokens are signalled: [`CancellationRegistry::cancel`] detaches the
//! set under the lock and signals it afterwards, so a cancelled operation that
//! immediately drops its guard (and calls back into the registry) cannot
//! deadlock or invalidate the sweep.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

/// Identity of one registered operation. Unique per registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Terminal state of an operation run through the registry.
///
/// Cancellation is not an error: callers match on it separately and must not
/// route it through their failure handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Cancelled => None,
        }
    }
}

type Table<K> = HashMap<K, HashMap<HandleId, CancellationToken>>;

struct Inner<K> {
    next_id: AtomicU64,
    table: Mutex<Table<K>>,
}

/// Keyed table of live cancellation handles.
///
/// Cloning is cheap and every clone refers to the same table.
pub struct CancellationRegistry<K> {
    inner: Arc<Inner<K>>,
}

impl<K> Clone for CancellationRegistry<K> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<K> Default for CancellationRegistry<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for CancellationRegistry<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table();
        let mut map = f.debug_map();
        for (key, set) in table.iter() {
            map.entry(key, &set.len());
        }
        map.finish()
    }
}

impl<K> CancellationRegistry<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(1),
                table: Mutex::new(HashMap::new()),
            }),
        }
    }

    // A panic while holding the lock cannot leave the table half-updated:
    // every critical section is a single map operation.
    fn table(&self) -> MutexGuard<'_, Table<K>> {
        self.inner.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_id(&self) -> HandleId {
        HandleId(self.inner.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// File a new handle under `key` without touching existing ones.
    pub fn register(&self, key: K) -> Registration<K> {
        let id = self.next_id();
        let token = CancellationToken::new();
        self.table()
            .entry(key.clone())
            .or_default()
            .insert(id, token.clone());
        tracing::trace!(?key, %id, "registry: registered");
        Registration {
            registry: self.clone(),
            key,
            id,
            token,
        }
    }

    /// Remove one handle. Drops the key once its set is empty.
    ///
    /// Returns `false` when the handle was already gone (finished or
    /// cancelled earlier), which is not an error.
    pub fn unregister(&self, key: &K, id: HandleId) -> bool {
        let mut table = self.table();
        let Some(set) = table.get_mut(key) else {
            return false;
        };
        let removed = set.remove(&id).is_some();
        if set.is_empty() {
            table.remove(key);
        }
        removed
    }

    /// Cancel every operation currently filed under `key`.
    ///
    /// Returns the number of handles signalled. Cancelling an empty key is a
    /// no-op.
    pub fn cancel(&self, key: &K) -> usize {
        let detached = self.table().remove(key);
        let Some(detached) = detached else {
            return 0;
        };
        for token in detached.values() {
            token.cancel();
        }
        tracing::debug!(?key, cancelled = detached.len(), "registry: cancelled key");
        detached.len()
    }

    /// Cancel-and-replace: cancel whatever is filed under `key`, then file a
    /// fresh handle in its place.
    ///
    /// The swap happens under a single lock acquisition so two concurrent
    /// callers can never both end up registered. The superseded tokens are
    /// signalled after the lock is released.
    pub fn begin(&self, key: K) -> Registration<K> {
        let id = self.next_id();
        let token = CancellationToken::new();
        let superseded = {
            let mut table = self.table();
            let fresh = HashMap::from([(id, token.clone())]);
            table.insert(key.clone(), fresh)
        };
        let cancelled = superseded.map_or(0, |set| {
            for token in set.values() {
                token.cancel();
            }
            set.len()
        });
        tracing::debug!(?key, %id, cancelled, "registry: began operation");
        Registration {
            registry: self.clone(),
            key,
            id,
            token,
        }
    }

    /// Wrap `operation` with cancel-and-replace semantics under `key`.
    ///
    /// Registration happens when this is called, not when the returned future
    /// is first polled, so the previous operation is already cancelled by the
    /// time this returns. The handle is released automatically whichever way
    /// the operation ends, including the returned future being dropped.
    pub fn cancellable<F>(&self, key: K, operation: F) -> impl Future<Output = Outcome<F::Output>>
    where
        F: Future,
    {
        self.begin(key).run(operation)
    }

    /// Number of live handles filed under `key`.
    pub fn active(&self, key: &K) -> usize {
        self.table().get(key).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }
}

/// Guard for one registered operation.
///
/// Dropping it unregisters the handle; this is how natural completion and
/// failure release the entry.
pub struct Registration<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    registry: CancellationRegistry<K>,
    key: K,
    id: HandleId,
    token: CancellationToken,
}

impl<K> fmt::Debug for Registration<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("key", &self.key)
            .field("id", &self.id)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

impl<K> Registration<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Clone of the token shared with the registry entry.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancel this operation only. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
        self.registry.unregister(&self.key, self.id);
    }

    /// Drive `operation` until it finishes or this handle is cancelled.
    ///
    /// When both happen at once cancellation wins, so a superseded operation
    /// never reports a value. The guard is released when this returns.
    pub async fn run<F>(self, operation: F) -> Outcome<F::Output>
    where
        F: Future,
    {
        let token = self.token.clone();
        tokio::select! {
            biased;
            () = token.cancelled() => {
                tracing::trace!(key = ?self.key, id = %self.id, "registry: operation cancelled");
                Outcome::Cancelled
            }
            output = operation => Outcome::Completed(output),
        }
    }
}

impl<K> Drop for Registration<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn drop(&mut self) {
        self.registry.unregister(&self.key, self.id);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
