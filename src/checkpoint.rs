//! # Periodic Checkpoints
//!
//! The text checkpoint only protects what was saved, so a long-running host
//! saves on a fixed interval in addition to saving at shutdown.
//! `Checkpointer` runs that interval on a dedicated thread.
//!
//! The store is shared with the thread through `Arc<Mutex<FrecencyStore>>`.
//! The mutex orders this process's own callers against the checkpoint; it
//! does not coordinate with other processes attached to the segment.
//!
//! ```ignore
//! let store = Arc::new(Mutex::new(store));
//! let checkpointer = Checkpointer::spawn(Arc::clone(&store), Duration::from_secs(60))?;
//! // ... host runs, calling store.lock().visit(path) ...
//! checkpointer.stop();
//! store.lock().shutdown();
//! ```
//!
//! Save failures are swallowed by `FrecencyStore::save`; the thread keeps
//! running and tries again on the next tick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use eyre::{Result, WrapErr};
use parking_lot::{Condvar, Mutex};

use crate::config::DEFAULT_CHECKPOINT_INTERVAL_SECS;
use crate::store::FrecencyStore;

pub type SharedStore = Arc<Mutex<FrecencyStore>>;

struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

pub struct Checkpointer {
    signal: Arc<StopSignal>,
    saves: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl Checkpointer {
    pub fn spawn(store: SharedStore, interval: Duration) -> Result<Self> {
        let signal = Arc::new(StopSignal {
            stopped: Mutex::new(false),
            wake: Condvar::new(),
        });
        let saves = Arc::new(AtomicU64::new(0));

        let handle = {
            let signal = Arc::clone(&signal);
            let saves = Arc::clone(&saves);
            thread::Builder::new()
                .name("frecstore-checkpoint".to_string())
                .spawn(move || run(store, interval, &signal, &saves))
                .wrap_err("failed to spawn checkpoint thread")?
        };

        Ok(Self {
            signal,
            saves,
            handle: Some(handle),
        })
    }

    pub fn with_default_interval(store: SharedStore) -> Result<Self> {
        Self::spawn(store, Duration::from_secs(DEFAULT_CHECKPOINT_INTERVAL_SECS))
    }

    /// Checkpoints written successfully so far.
    pub fn saves(&self) -> u64 {
        self.saves.load(Ordering::Acquire)
    }

    /// Stops the thread and waits for it. An in-flight save completes first.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        {
            let mut stopped = self.signal.stopped.lock();
            *stopped = true;
            self.signal.wake.notify_all();
        }

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("checkpoint thread panicked");
            }
        }
    }
}

impl Drop for Checkpointer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(store: SharedStore, interval: Duration, signal: &StopSignal, saves: &AtomicU64) {
    loop {
        let deadline = Instant::now() + interval;
        {
            let mut stopped = signal.stopped.lock();
            while !*stopped {
                if signal.wake.wait_until(&mut stopped, deadline).timed_out() {
                    break;
                }
            }
            if *stopped {
                return;
            }
        }

        if store.lock().save() {
            saves.fetch_add(1, Ordering::AcqRel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn shared_store(dir: &tempfile::TempDir) -> SharedStore {
        let mut store = FrecencyStore::builder()
            .segment_path(dir.path().join("seg.shm"))
            .data_path(dir.path().join("frecency.txt"))
            .build();
        assert!(store.init());
        Arc::new(Mutex::new(store))
    }

    #[test]
    fn saves_on_interval() {
        let dir = tempdir().unwrap();
        let store = shared_store(&dir);
        store.lock().visit("/ticked");

        let checkpointer = Checkpointer::spawn(Arc::clone(&store), Duration::from_millis(10)).unwrap();

        let started = Instant::now();
        while checkpointer.saves() == 0 && started.elapsed() < Duration::from_secs(10) {
            thread::sleep(Duration::from_millis(5));
        }
        checkpointer.stop();

        let contents = std::fs::read_to_string(dir.path().join("frecency.txt")).unwrap();
        assert!(contents.contains("/ticked"));
    }

    #[test]
    fn stop_interrupts_long_interval() {
        let dir = tempdir().unwrap();
        let store = shared_store(&dir);

        let checkpointer =
            Checkpointer::spawn(Arc::clone(&store), Duration::from_secs(3600)).unwrap();
        let started = Instant::now();
        checkpointer.stop();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!dir.path().join("frecency.txt").exists());
    }

    #[test]
    fn uninitialized_store_counts_no_saves() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Mutex::new(
            FrecencyStore::builder()
                .segment_path(dir.path().join("seg.shm"))
                .data_path(dir.path().join("frecency.txt"))
                .build(),
        ));

        let checkpointer = Checkpointer::spawn(store, Duration::from_millis(5)).unwrap();
        thread::sleep(Duration::from_millis(50));

        assert_eq!(checkpointer.saves(), 0);
    }
}
