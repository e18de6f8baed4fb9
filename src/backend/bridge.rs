//! Cross-thread bridge to the backend loop.
//!
//! The backend runs on its own OS thread and executes submitted tasks one at
//! a time, in submission order. Async callers either wait for a result
//! ([`BackendHandle::fetch`]) or fire and forget ([`BackendHandle::post`]).

use std::any::Any;
use std::io;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use super::{Backend, EventSink};
use crate::error::BackendError;

/// A unit of work executed on the backend loop.
pub type Task = Box<dyn FnOnce(&mut dyn Backend) + Send>;

/// Owner of the backend loop thread.
pub struct BackendLoop {
    thread: thread::JoinHandle<()>,
}

impl BackendLoop {
    /// Start `backend` on a dedicated thread.
    ///
    /// `Backend::start` runs on that thread before the first task. The loop
    /// ends once every [`BackendHandle`] has been dropped.
    pub fn spawn<B: Backend>(backend: B, sink: EventSink) -> io::Result<(Self, BackendHandle)> {
        let (tx, rx) = mpsc::unbounded_channel::<Task>();
        let thread = thread::Builder::new()
            .name("backend-loop".to_string())
            .spawn(move || run(backend, sink, rx))?;
        Ok((Self { thread }, BackendHandle { tx }))
    }

    /// Wait for the loop thread to finish.
    pub fn join(self) {
        if self.thread.join().is_err() {
            error!("Backend loop thread panicked");
        }
    }
}

fn run<B: Backend>(mut backend: B, sink: EventSink, mut rx: mpsc::UnboundedReceiver<Task>) {
    backend.start(sink);
    info!("Backend loop started");

    while let Some(task) = rx.blocking_recv() {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| task(&mut backend))) {
            error!(panic = %panic_message(payload.as_ref()), "Backend task panicked");
        }
    }

    info!("Backend loop stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// Handles
// ============================================================================

/// Cloneable submission handle for the backend loop.
#[derive(Clone)]
pub struct BackendHandle {
    tx: mpsc::UnboundedSender<Task>,
}

impl BackendHandle {
    /// Run `f` on the backend loop and wait for its result.
    ///
    /// A panic inside `f` is reported as [`BackendError::Panicked`]; the loop
    /// keeps running.
    pub async fn fetch<T, F>(&self, f: F) -> Result<T, BackendError>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn Backend) -> Result<T, BackendError> + Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let task: Task = Box::new(move |backend| {
            let result = catch_unwind(AssertUnwindSafe(|| f(backend)))
                .unwrap_or_else(|payload| Err(BackendError::Panicked(panic_message(payload.as_ref()))));
            if reply_tx.send(result).is_err() {
                debug!("Fetch caller went away before the result was ready");
            }
        });

        self.tx.send(task).map_err(|_| BackendError::LoopClosed)?;
        reply_rx.await.map_err(|_| BackendError::LoopClosed)?
    }

    /// Queue `f` on the backend loop without waiting.
    pub fn post<F>(&self, f: F) -> Result<(), BackendError>
    where
        F: FnOnce(&mut dyn Backend) + Send + 'static,
    {
        self.tx
            .send(Box::new(f))
            .map_err(|_| BackendError::LoopClosed)
    }

    /// Per-session fetch handle.
    pub fn fetcher(&self) -> Fetcher {
        Fetcher {
            handle: self.clone(),
        }
    }
}

/// A session's handle on the bridge.
///
/// `fetch` takes `&mut self`, so one session can never have two fetches in
/// flight.
pub struct Fetcher {
    handle: BackendHandle,
}

impl Fetcher {
    pub async fn fetch<T, F>(&mut self, f: F) -> Result<T, BackendError>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn Backend) -> Result<T, BackendError> + Send + 'static,
    {
        self.handle.fetch(f).await
    }
}
