//! Stateless pub-sub hooks
//!
//! Subscribers only ever see the event itself, never the engine state. Handlers are async, and each event is handled
//! on its own task.
use std::sync::Arc;

use futures_util::future::BoxFuture;
use log::*;
use tokio::{sync::mpsc, task::JoinSet};

pub type Handler<E> = Arc<dyn Fn(E) -> BoxFuture<'static, ()> + Send + Sync>;

pub struct EventHandler<E: Send + 'static> {
    receiver: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        Self { receiver, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer { sender: self.sender.clone() }
    }

    /// Handles events until every producer has been dropped, then waits for in-flight handlers to finish.
    pub async fn start_handler(self) {
        let Self { mut receiver, sender, handler } = self;
        // Only producers may keep the channel open
        drop(sender);
        debug!("📬️ Starting event handler");
        let mut jobs = JoinSet::new();
        while let Some(event) = receiver.recv().await {
            trace!("📬️ Handling event");
            jobs.spawn((handler)(event));
            // reap whatever has finished so the set does not grow without bound
            while let Some(done) = jobs.try_join_next() {
                log_join_result(done);
            }
        }
        debug!("📬️ All producers are gone. Waiting for {} handler(s) to complete", jobs.len());
        while let Some(done) = jobs.join_next().await {
            log_join_result(done);
        }
        debug!("📬️ Event handler has shut down");
    }
}

fn log_join_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        warn!("📬️ An event handler task failed: {e}");
    }
}

#[derive(Clone)]
pub struct EventProducer<E> {
    sender: mpsc::Sender<E>,
}

impl<E: Send> EventProducer<E> {
    pub async fn publish_event(&self, event: E) {
        if let Err(e) = self.sender.send(event).await {
            error!("📬️ Failed to send event: {e}");
        }
    }
}
