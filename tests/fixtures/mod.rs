//! Test fixtures and helper stores for integration testing

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use team_balancer::error::{EngineError, Result};
use team_balancer::rating::KeyValueStore;
use team_balancer::types::{IndividualId, MatchAssignment, Team, TEAM_SIZE};

/// Key/value store that records every write for inspection
#[derive(Debug, Default)]
pub struct RecordingStore {
    entries: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Get all writes made so far (for testing)
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }

    pub fn write_count(&self) -> usize {
        self.writes().len()
    }
}

impl KeyValueStore for RecordingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Ok(mut writes) = self.writes.lock() {
            writes.push((key.to_string(), value.to_string()));
        }
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

/// Key/value store whose writes can be switched to fail
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: RecordingStore,
    failing: Mutex<bool>,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut flag) = self.failing.lock() {
            *flag = failing;
        }
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.inner.get(key).ok().flatten()
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.failing.lock().map(|flag| *flag).unwrap_or(true) {
            return Err(EngineError::Storage {
                message: "simulated write failure".to_string(),
            }
            .into());
        }
        self.inner.set(key, value)
    }
}

/// Five slot names sharing a prefix, e.g. `blue0`..`blue4`
pub fn names(prefix: &str) -> [IndividualId; TEAM_SIZE] {
    std::array::from_fn(|i| format!("{prefix}{i}"))
}

pub fn team(prefix: &str) -> Team {
    Team::new(names(prefix).map(Some))
}

pub fn blue_vs_red() -> MatchAssignment {
    MatchAssignment::new(team("blue"), team("red"))
}

/// Fresh scratch directory under the system temp dir
pub fn scratch_dir(label: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    std::env::temp_dir().join(format!(
        "team-balancer-{}-{}-{}",
        label,
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    ))
}
