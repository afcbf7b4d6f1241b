//! Frontier queue shared by the coordinator and the scraper workers
//!
//! Besides the FIFO of pending tasks, the frontier counts workers that are parked
//! waiting for work. The coordinator is the only producer, so once the queue is empty
//! and every worker is parked no new task can appear unless a result is still in
//! flight; see [`Frontier::is_idle`].

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug)]
struct State<T> {
    queue: VecDeque<T>,
    parked: usize,
    closed: bool,
}

/// FIFO of pending work with parked-worker accounting
#[derive(Debug)]
pub(crate) struct Frontier<T> {
    state: Mutex<State<T>>,
    available: Notify,
    parked_changed: Notify,
}

impl<T> Frontier<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                parked: 0,
                closed: false,
            }),
            available: Notify::new(),
            parked_changed: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a task and wakes one parked worker
    pub fn push(&self, item: T) {
        self.lock().queue.push_back(item);
        self.available.notify_one();
    }

    /// Takes the next task, parking until one is available
    ///
    /// Returns `None` once the frontier has been closed; that is the stop signal for
    /// workers.
    pub async fn pop(&self) -> Option<T> {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if state.closed {
                    return None;
                }
                if let Some(item) = state.queue.pop_front() {
                    let more = !state.queue.is_empty();
                    drop(state);
                    if more {
                        self.available.notify_one();
                    }
                    return Some(item);
                }
                state.parked += 1;
            }
            self.parked_changed.notify_one();

            notified.await;

            let mut state = self.lock();
            state.parked -= 1;
        }
    }

    /// Returns true if the queue is empty and `workers` workers are parked in [`pop`]
    ///
    /// Workers hand off their results before calling `pop` again, so when this holds
    /// every result has already been sent.
    ///
    /// [`pop`]: Frontier::pop
    pub fn is_idle(&self, workers: usize) -> bool {
        let state = self.lock();
        state.queue.is_empty() && state.parked == workers
    }

    /// Resolves after a worker parks
    pub async fn parked_changed(&self) {
        self.parked_changed.notified().await;
    }

    /// Stops the frontier; every current and future `pop` returns `None`
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_waiters();
    }

    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }
}
