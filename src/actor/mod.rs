//! Actors communicate over unbounded channels whose messages carry the
//! sending side's tracing span, so event handling is attributed to whatever
//! triggered it.

pub mod indicator;
pub mod space_watcher;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::Span;

pub struct Sender<T> {
    tx: UnboundedSender<(Span, T)>,
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Sender { tx: self.tx.clone() }
    }
}

impl<T> Sender<T> {
    pub fn send(&self, event: T) {
        if self.tx.send((Span::current(), event)).is_err() {
            tracing::warn!("dropping event; receiver is gone");
        }
    }
}

pub type Receiver<T> = UnboundedReceiver<(Span, T)>;

pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Sender { tx }, rx)
}
