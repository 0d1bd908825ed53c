use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Receives every submitted console line, off the UI thread.
///
/// `handle_input` runs on the dispatcher's runtime, one independent task per
/// registration per line: no ordering between observers, no completion
/// signal, and a failure in one observer is invisible to the others and to
/// the UI.
pub trait LineObserver: Send + Sync {
    fn handle_input(&self, line: &str);

    /// Called once per registration when the owning dispatcher shuts down,
    /// so the observer can release whatever runs behind it.
    fn dispose(&self) {}
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Bounded submission queue is at capacity; the line was not enqueued.
    #[error("submission queue is full")]
    QueueFull,
    /// The dispatcher has been shut down.
    #[error("dispatcher is closed")]
    Closed,
}

enum QueueTx {
    Bounded(mpsc::Sender<String>),
    Unbounded(mpsc::UnboundedSender<String>),
}

type Registry = Arc<Mutex<Vec<Arc<dyn LineObserver>>>>;

/// Fans submitted lines out to registered observers.
///
/// Submissions go onto a queue (bounded or unbounded, the caller's choice)
/// consumed by a worker task on a dispatcher-owned runtime; the worker
/// spawns one task per registration per line. Registration has multiset
/// semantics: the same observer registered twice is notified twice.
pub struct Dispatcher {
    tx: Option<QueueTx>,
    observers: Registry,
    runtime: Runtime,
    worker: Option<JoinHandle<()>>,
}

impl Dispatcher {
    /// `capacity` of `None` builds an unbounded queue; `Some(n)` bounds it
    /// at `n` (minimum 1) and makes [`submit`](Self::submit) fail fast with
    /// [`DispatchError::QueueFull`] instead of ever blocking the caller.
    pub fn new(capacity: Option<usize>) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("opcon-dispatch")
            .enable_time()
            .build()?;
        let observers: Registry = Arc::new(Mutex::new(Vec::new()));
        let obs = Arc::clone(&observers);
        let (tx, worker) = match capacity {
            Some(n) => {
                let (tx, mut rx) = mpsc::channel::<String>(n.max(1));
                let worker = runtime.spawn(async move {
                    while let Some(line) = rx.recv().await {
                        fan_out(&obs, line);
                    }
                });
                (QueueTx::Bounded(tx), worker)
            }
            None => {
                let (tx, mut rx) = mpsc::unbounded_channel::<String>();
                let worker = runtime.spawn(async move {
                    while let Some(line) = rx.recv().await {
                        fan_out(&obs, line);
                    }
                });
                (QueueTx::Unbounded(tx), worker)
            }
        };
        Ok(Self {
            tx: Some(tx),
            observers,
            runtime,
            worker: Some(worker),
        })
    }

    /// Add a registration. Duplicates are kept and notified once each.
    pub fn register(&self, observer: Arc<dyn LineObserver>) {
        self.lock_registry().push(observer);
    }

    /// Remove one registration matching `observer` by pointer identity.
    /// Other registrations of the same observer stay in place.
    pub fn unregister(&self, observer: &Arc<dyn LineObserver>) {
        let mut registry = self.lock_registry();
        if let Some(pos) = registry.iter().position(|o| Arc::ptr_eq(o, observer)) {
            registry.remove(pos);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.lock_registry().len()
    }

    /// Enqueue a submitted line for delivery.
    pub fn submit(&self, line: impl Into<String>) -> Result<(), DispatchError> {
        let line = line.into();
        match &self.tx {
            None => Err(DispatchError::Closed),
            Some(QueueTx::Bounded(tx)) => tx.try_send(line).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => DispatchError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => DispatchError::Closed,
            }),
            Some(QueueTx::Unbounded(tx)) => tx.send(line).map_err(|_| DispatchError::Closed),
        }
    }

    /// Lines enqueued but not yet picked up, when the queue is bounded.
    pub fn queue_depth(&self) -> Option<usize> {
        match &self.tx {
            Some(QueueTx::Bounded(tx)) => Some(tx.max_capacity() - tx.capacity()),
            _ => None,
        }
    }

    /// Close the queue, drain the worker, then dispose every remaining
    /// registration (once per registration). Idempotent. Dispose is only
    /// ever triggered from here: surface teardown does not imply it.
    pub fn shutdown(&mut self) {
        if self.tx.take().is_none() {
            return;
        }
        if let Some(worker) = self.worker.take() {
            if let Err(e) = self.runtime.block_on(worker) {
                warn!(target: "dispatch", "worker ended abnormally: {e}");
            }
        }
        let disposed: Vec<_> = self.lock_registry().drain(..).collect();
        for observer in &disposed {
            observer.dispose();
        }
        info!(target: "dispatch", count = disposed.len(), "dispatcher shut down");
    }

    fn lock_registry(&self) -> std::sync::MutexGuard<'_, Vec<Arc<dyn LineObserver>>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn fan_out(observers: &Mutex<Vec<Arc<dyn LineObserver>>>, line: String) {
    let snapshot = observers
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    debug!(target: "dispatch", observers = snapshot.len(), chars = line.len(), "fan out");
    if snapshot.is_empty() {
        return;
    }
    let line: Arc<str> = line.into();
    for observer in snapshot {
        let line = Arc::clone(&line);
        tokio::spawn(async move {
            if catch_unwind(AssertUnwindSafe(|| observer.handle_input(&line))).is_err() {
                warn!(target: "dispatch", "line observer panicked");
            }
        });
    }
}
