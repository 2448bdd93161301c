//! Login attempt tracker with time-windowed lockout.
//!
//! Tracks consecutive failed login attempts per identifier (email or client
//! address) and locks the identifier out for a fixed duration once the
//! failure threshold is reached. State is in-memory only; a process restart
//! clears all lockouts. This is advisory throttling layered in front of
//! credential verification, not a security boundary on its own.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::config::BruteForceSettings;

/// Configuration for the attempt tracker
#[derive(Debug, Clone)]
pub struct BruteForceConfig {
    /// Failed attempts before lockout engages
    pub max_attempts: u32,

    /// How long a locked identifier stays locked
    pub lockout: Duration,

    /// Inactivity window after which an unlocked record is purged
    pub reset_window: Duration,
}

impl Default for BruteForceConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout: Duration::from_secs(15 * 60),
            reset_window: Duration::from_secs(5 * 60),
        }
    }
}

impl From<&BruteForceSettings> for BruteForceConfig {
    fn from(settings: &BruteForceSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            lockout: Duration::from_secs(settings.lockout_secs),
            reset_window: Duration::from_secs(settings.reset_window_secs),
        }
    }
}

/// Lockout decision returned to the caller. Lockout is a normal status,
/// not an error; the route handler decides the response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockStatus {
    pub locked: bool,
    pub remaining_seconds: u64,
}

impl LockStatus {
    fn unlocked() -> Self {
        Self { locked: false, remaining_seconds: 0 }
    }
}

/// Entry tracking failures for one identifier.
/// Invariant: count >= 1 while the entry exists; locked_until >= first_attempt.
#[derive(Debug, Clone)]
struct AttemptEntry {
    count: u32,
    first_attempt: Instant,
    locked_until: Option<Instant>,
}

/// Tracks failed login attempts per identifier.
///
/// Thread-safe; the check and the record-failure paths each take the write
/// lock once, so there is no read-then-write race between concurrent
/// requests for the same identifier. Owned by the router and injected into
/// handlers rather than living in a process-global.
pub struct LoginAttemptTracker {
    config: BruteForceConfig,
    entries: RwLock<HashMap<String, AttemptEntry>>,
}

impl LoginAttemptTracker {
    pub fn new(config: BruteForceConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(BruteForceConfig::default())
    }

    /// Check whether an identifier is currently allowed to attempt a login.
    ///
    /// Expired records are purged as a side effect: a lockout past its
    /// expiry deletes the entry (rather than leaving a stale locked count
    /// behind), and an unlocked entry older than the reset window is
    /// dropped as well.
    pub fn check_locked(&self, identifier: &str) -> LockStatus {
        self.check_locked_at(identifier, Instant::now())
    }

    fn check_locked_at(&self, identifier: &str, now: Instant) -> LockStatus {
        let mut entries = self.entries.write().unwrap();

        let Some(entry) = entries.get(identifier) else {
            return LockStatus::unlocked();
        };

        if let Some(locked_until) = entry.locked_until {
            if now < locked_until {
                let remaining = locked_until - now;
                let remaining_seconds = remaining.as_secs_f64().ceil() as u64;
                tracing::warn!(identifier, remaining_seconds, "login attempt while locked out");
                return LockStatus { locked: true, remaining_seconds };
            }

            // Lockout has expired; drop the record so the count restarts
            entries.remove(identifier);
            return LockStatus::unlocked();
        }

        if now.duration_since(entry.first_attempt) > self.config.reset_window {
            entries.remove(identifier);
        }

        LockStatus::unlocked()
    }

    /// Record one failed attempt and return the resulting status.
    ///
    /// A single atomic operation under the write lock: initializes the
    /// record on first failure, increments it thereafter, and engages the
    /// lockout once the count reaches the configured maximum.
    pub fn record_failure(&self, identifier: &str) -> LockStatus {
        self.record_failure_at(identifier, Instant::now())
    }

    fn record_failure_at(&self, identifier: &str, now: Instant) -> LockStatus {
        let mut entries = self.entries.write().unwrap();

        let entry = entries.entry(identifier.to_string()).or_insert(AttemptEntry {
            count: 0,
            first_attempt: now,
            locked_until: None,
        });

        entry.count += 1;

        if entry.count >= self.config.max_attempts && entry.locked_until.is_none() {
            entry.locked_until = Some(now + self.config.lockout);
            tracing::warn!(identifier, attempts = entry.count, "identifier locked after max failed attempts");
        }

        match entry.locked_until {
            Some(locked_until) if now < locked_until => LockStatus {
                locked: true,
                remaining_seconds: (locked_until - now).as_secs_f64().ceil() as u64,
            },
            _ => LockStatus::unlocked(),
        }
    }

    /// Remove any record for the identifier (called on successful login)
    pub fn clear(&self, identifier: &str) {
        let mut entries = self.entries.write().unwrap();
        if entries.remove(identifier).is_some() {
            tracing::info!(identifier, "login attempts cleared");
        }
    }

    /// Current failure count, 0 if no record exists
    pub fn attempt_count(&self, identifier: &str) -> u32 {
        let entries = self.entries.read().unwrap();
        entries.get(identifier).map(|e| e.count).unwrap_or(0)
    }

    /// Number of identifiers currently tracked
    pub fn tracked_count(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}
