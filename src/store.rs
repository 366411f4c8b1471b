//! State container with subscribers.
//!
//! Mutations go through [`Store::update`]; every subscriber is woken after
//! each one and re-renders from a fresh snapshot.

use std::sync::Arc;
use tokio::sync::watch;

pub struct Store<S> {
    tx: Arc<watch::Sender<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self { tx: Arc::clone(&self.tx) }
    }
}

impl<S: Clone + Send + Sync + 'static> Store<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Apply a mutation atomically and notify subscribers
    pub fn update<R>(&self, mutate: impl FnOnce(&mut S) -> R) -> R {
        let mut output = None;
        self.tx.send_modify(|state| output = Some(mutate(state)));
        output.expect("send_modify runs the closure exactly once")
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }
}
