//! Live session set and backend event fan-out.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use crate::backend::BackendEvent;

/// One item in a session worker's queue.
#[derive(Debug)]
pub enum Work {
    /// A line read from the client.
    Line(String),
    /// A backend event to deliver.
    Event(Arc<BackendEvent>),
    /// Stop the worker.
    Shutdown,
}

pub type WorkSender = mpsc::UnboundedSender<Work>;

/// Concurrency-safe set of live sessions.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<u64, WorkSender>,
    next_id: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session's queue and return its id.
    pub fn add(&self, tx: WorkSender) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.sessions.insert(id, tx);
        id
    }

    /// Remove a session. Returns false if it was already gone.
    pub fn remove(&self, id: u64) -> bool {
        self.sessions.remove(&id).is_some()
    }

    /// Queue `event` for every live session. Returns how many accepted it.
    pub fn broadcast(&self, event: BackendEvent) -> usize {
        let event = Arc::new(event);
        let mut delivered = 0;
        let mut dead = Vec::new();

        for entry in self.sessions.iter() {
            if entry.value().send(Work::Event(Arc::clone(&event))).is_ok() {
                delivered += 1;
            } else {
                dead.push(*entry.key());
            }
        }

        for id in dead {
            debug!(session = id, "Pruning closed session from registry");
            self.sessions.remove(&id);
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
