//! Asynchronous change notification.
//!
//! A [`Notifier`] owns one worker thread fed by a monitor queue (a `Mutex`
//! plus `Condvar`). Producers enqueue [`ChangeEvent`]s through a cloneable
//! [`NotifierHandle`] and never wait on listeners; the worker delivers the
//! events to every registered listener in enqueue order.

use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::elements::ElementTag;
use crate::error::{NclError, NclResult};
use crate::registry::ElementId;

/// A structural or attribute change in a document.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    ElementAdded {
        parent: ElementId,
        child: ElementId,
        tag: ElementTag,
    },
    ElementRemoved {
        parent: ElementId,
        child: ElementId,
        tag: ElementTag,
    },
    IdChanged {
        element: ElementId,
        old: Option<String>,
        new: String,
    },
    Modified {
        element: ElementId,
        tag: ElementTag,
    },
    /// An alias was removed and every reference through it went dangling.
    ReferencesInvalidated { alias: ElementId, count: usize },
}

/// An event together with its enqueue sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub sequence: u64,
    pub event: ChangeEvent,
}

pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Receives notifications on the worker thread.
///
/// Errors and panics raised by a listener are logged and do not stop the
/// delivery to other listeners.
pub trait ChangeListener: Send + Sync {
    fn on_change(&self, notification: &Notification) -> Result<(), ListenerError>;
}

impl<F> ChangeListener for F
where
    F: Fn(&Notification) -> Result<(), ListenerError> + Send + Sync,
{
    fn on_change(&self, notification: &Notification) -> Result<(), ListenerError> {
        self(notification)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct State {
    queue: VecDeque<Notification>,
    listeners: Vec<(ListenerId, Arc<dyn ChangeListener>)>,
    next_sequence: u64,
    next_listener: u64,
    stopping: bool,
    dispatching: bool,
}

struct Shared {
    state: Mutex<State>,
    /// Signalled when work arrives or shutdown is requested.
    wake: Condvar,
    /// Signalled when the queue is drained.
    idle: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The worker side of the event bus. Dropping it shuts the worker down.
pub struct Notifier {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("running", &self.worker.is_some())
            .finish()
    }
}

impl Notifier {
    /// Spawn the worker thread.
    pub fn start() -> NclResult<Self> {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                listeners: Vec::new(),
                next_sequence: 0,
                next_listener: 0,
                stopping: false,
                dispatching: false,
            }),
            wake: Condvar::new(),
            idle: Condvar::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("ncl-notifier".to_string())
            .spawn(move || run(&worker_shared))
            .map_err(|e| NclError::NotifierStart(e.to_string()))?;
        debug!("notifier worker started");

        Ok(Notifier {
            shared,
            worker: Some(worker),
        })
    }

    pub fn handle(&self) -> NotifierHandle {
        NotifierHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Deliver everything already enqueued, then stop and join the worker.
    pub fn finish(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        self.shared.lock().stopping = true;
        self.shared.wake.notify_all();
        if worker.join().is_err() {
            warn!("notifier worker terminated abnormally");
        }
        debug!("notifier worker stopped");
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Producer side of the event bus.
#[derive(Clone)]
pub struct NotifierHandle {
    shared: Arc<Shared>,
}

impl fmt::Debug for NotifierHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierHandle")
            .field("pending", &self.pending())
            .finish()
    }
}

impl NotifierHandle {
    pub fn add_listener(&self, listener: impl ChangeListener + 'static) -> ListenerId {
        let mut state = self.shared.lock();
        let id = ListenerId(state.next_listener);
        state.next_listener += 1;
        state.listeners.push((id, Arc::new(listener)));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut state = self.shared.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(current, _)| *current != id);
        state.listeners.len() != before
    }

    /// Enqueue an event and return its sequence number.
    pub fn add_notification(&self, event: ChangeEvent) -> NclResult<u64> {
        let mut state = self.shared.lock();
        if state.stopping {
            return Err(NclError::NotifierStopped);
        }
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.queue.push_back(Notification { sequence, event });
        drop(state);
        self.shared.wake.notify_one();
        Ok(sequence)
    }

    /// Number of notifications waiting for delivery.
    pub fn pending(&self) -> usize {
        self.shared.lock().queue.len()
    }

    /// Block until every notification enqueued so far has been delivered.
    pub fn wait_idle(&self) {
        let mut state = self.shared.lock();
        while !state.queue.is_empty() || state.dispatching {
            state = self
                .shared
                .idle
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

fn run(shared: &Shared) {
    loop {
        let (notification, listeners) = {
            let mut state = shared.lock();
            loop {
                if let Some(next) = state.queue.pop_front() {
                    state.dispatching = true;
                    let listeners: Vec<Arc<dyn ChangeListener>> =
                        state.listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
                    break (next, listeners);
                }
                if state.stopping {
                    return;
                }
                state = shared
                    .wake
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };

        dispatch(&notification, &listeners);

        let mut state = shared.lock();
        state.dispatching = false;
        if state.queue.is_empty() {
            shared.idle.notify_all();
        }
    }
}

fn dispatch(notification: &Notification, listeners: &[Arc<dyn ChangeListener>]) {
    for listener in listeners {
        match panic::catch_unwind(AssertUnwindSafe(|| listener.on_change(notification))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(
                "listener failed on notification {}: {}",
                notification.sequence, err
            ),
            Err(_) => warn!(
                "listener panicked on notification {}",
                notification.sequence
            ),
        }
    }
}
