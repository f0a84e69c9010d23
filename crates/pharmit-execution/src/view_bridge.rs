//! Forwards controller notifications to the view over a channel.

use tokio::sync::mpsc;
use tracing::trace;

use pharmit_core::session::{QueryEvent, ViewNotifier};

/// A [`ViewNotifier`] that sends every event down an unbounded channel.
///
/// The view owns the receiver. Events sent after the receiver is dropped are discarded.
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<QueryEvent>,
}

impl ChannelNotifier {
    pub fn new(sender: mpsc::UnboundedSender<QueryEvent>) -> Self {
        Self { sender }
    }

    /// Creates a notifier together with the receiving end for the view.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<QueryEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl ViewNotifier for ChannelNotifier {
    fn notify(&self, event: QueryEvent) {
        if self.sender.send(event).is_err() {
            trace!("View receiver dropped, event discarded");
        }
    }
}
