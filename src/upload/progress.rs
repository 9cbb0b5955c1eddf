use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;

/// Percentage of a batch that has settled, published on a watch channel.
///
/// The published value never decreases within a batch.
pub struct BatchProgress<'a> {
    sender: &'a watch::Sender<u8>,
    total: usize,
    completed: AtomicUsize,
}

impl<'a> BatchProgress<'a> {
    pub fn start(sender: &'a watch::Sender<u8>, total: usize) -> Self {
        sender.send_replace(if total == 0 { 100 } else { 0 });
        Self {
            sender,
            total,
            completed: AtomicUsize::new(0),
        }
    }

    /// Record one settled file, successful or not
    pub fn file_done(&self) {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        let percent = (completed.min(self.total) * 100 / self.total.max(1)) as u8;
        self.sender.send_modify(|current| *current = (*current).max(percent));
    }
}
