//! Time-boxed cache of the `{cookie, crumb}` session.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex as AsyncMutex, RwLock};

use crate::core::YfError;

/// How long a freshly acquired session is trusted.
///
/// Shorter than the upstream's own token lifetime so that a stale crumb is noticed early.
pub const SESSION_TTL: Duration = Duration::minutes(5);

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Useful for exercising expiry in tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A fully populated credential pair and its expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub(crate) cookie: String,
    pub(crate) crumb: String,
    pub(crate) expires_at: DateTime<Utc>,
}

impl Session {
    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    pub fn crumb(&self) -> &str {
        &self.crumb
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("cookie", &"<redacted>")
            .field("crumb", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Holds at most one [`Session`], expiring lazily on access.
///
/// Entries are written whole by [`SessionCache::put`], so a handshake that is
/// abandoned half-way never leaves a partial session behind.
pub struct SessionCache {
    slot: RwLock<Option<Session>>,
    fetch_lock: AsyncMutex<()>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCache").finish_non_exhaustive()
    }
}

impl SessionCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: RwLock::new(None),
            fetch_lock: AsyncMutex::new(()),
            clock,
        }
    }

    /// The cached session, if there is one and it has not expired.
    pub async fn get(&self) -> Option<Session> {
        let now = self.clock.now();
        {
            let slot = self.slot.read().await;
            match slot.as_ref() {
                Some(s) if now < s.expires_at => return Some(s.clone()),
                None => return None,
                Some(_) => {}
            }
        }

        // Expired: drop it, unless someone replaced it in the meantime.
        let mut slot = self.slot.write().await;
        if slot.as_ref().is_some_and(|s| now >= s.expires_at) {
            *slot = None;
        }
        slot.as_ref().filter(|s| now < s.expires_at).cloned()
    }

    /// Store a new session valid for `ttl` from now, replacing any existing one.
    pub async fn put(&self, cookie: String, crumb: String, ttl: Duration) -> Session {
        let session = Session {
            cookie,
            crumb,
            expires_at: self.clock.now() + ttl,
        };
        *self.slot.write().await = Some(session.clone());
        session
    }

    /// Forget the cached session. Idempotent.
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }

    /// Return the cached session or run `acquire` to create one.
    ///
    /// Only one acquisition runs at a time; callers that arrive while one is in flight
    /// wait for it and reuse its result instead of starting their own handshake.
    pub async fn get_or_acquire<F, Fut>(&self, ttl: Duration, acquire: F) -> Result<Session, YfError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(String, String), YfError>>,
    {
        if let Some(s) = self.get().await {
            tracing::debug!("session cache hit");
            return Ok(s);
        }

        let _guard = self.fetch_lock.lock().await;

        // Another task may have finished a handshake while this one waited.
        if let Some(s) = self.get().await {
            tracing::debug!("session acquired by a concurrent caller");
            return Ok(s);
        }

        tracing::debug!("session cache miss, starting handshake");
        let (cookie, crumb) = acquire().await?;
        Ok(self.put(cookie, crumb, ttl).await)
    }
}
