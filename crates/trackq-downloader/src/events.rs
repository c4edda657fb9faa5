//! Conflated event channel.
//!
//! Capacity is one and the latest value wins: when a new event is published
//! before the previous one was read, the previous one is silently dropped.
//! Transient UI notices tolerate loss; only the most recent is meaningful.
//! Publishing never blocks and never fails, with or without subscribers.

use tokio::sync::watch;

use trackq_core::DownloaderEvent;

/// Publisher half, owned by the downloader.
#[derive(Debug)]
pub(crate) struct EventSender {
    tx: watch::Sender<Option<DownloaderEvent>>,
}

impl EventSender {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Publish an event, replacing any unread one.
    pub(crate) fn publish(&self, event: DownloaderEvent) {
        let _ = self.tx.send_replace(Some(event));
    }

    /// Open a new subscription. Subscribers see events published after this
    /// call; they do not replay the past.
    pub(crate) fn subscribe(&self) -> EventStream {
        EventStream {
            rx: self.tx.subscribe(),
        }
    }
}

/// Subscriber half of the downloader event channel.
///
/// Each subscriber independently receives the most recently published event
/// it has not yet read; intermediate events may be skipped.
#[derive(Debug, Clone)]
pub struct EventStream {
    rx: watch::Receiver<Option<DownloaderEvent>>,
}

impl EventStream {
    /// Wait for the next event.
    ///
    /// Returns `None` once the downloader has been dropped.
    pub async fn recv(&mut self) -> Option<DownloaderEvent> {
        loop {
            self.rx.changed().await.ok()?;
            let event = self.rx.borrow_and_update().clone();
            if let Some(event) = event {
                return Some(event);
            }
        }
    }
}
