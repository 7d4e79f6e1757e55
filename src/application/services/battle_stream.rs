//! Paced delivery of a resolved battle
//!
//! The first chunk is available immediately and each later chunk after a fixed
//! delay. Cancelling stops delivery; the battle itself is already settled.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A cancellable, timer-driven sequence of narration chunks
pub struct BattleStream {
    receiver: mpsc::Receiver<Vec<String>>,
    pacer: JoinHandle<()>,
}

impl BattleStream {
    /// Start delivering `chunks`, pausing `delay` between consecutive ones.
    pub fn spawn(chunks: Vec<Vec<String>>, delay: Duration) -> Self {
        let (sender, receiver) = mpsc::channel(1);
        let pacer = tokio::spawn(async move {
            for (i, chunk) in chunks.into_iter().enumerate() {
                if i > 0 {
                    tokio::time::sleep(delay).await;
                }
                if sender.send(chunk).await.is_err() {
                    tracing::debug!("Battle stream receiver dropped");
                    break;
                }
            }
        });
        Self { receiver, pacer }
    }

    /// Next chunk, or `None` once delivery completed or was cancelled
    pub async fn next_chunk(&mut self) -> Option<Vec<String>> {
        self.receiver.recv().await
    }

    /// Stop delivery; chunks not yet received are discarded.
    pub fn cancel(&mut self) {
        self.pacer.abort();
        self.receiver.close();
        while self.receiver.try_recv().is_ok() {}
    }
}

impl Stream for BattleStream {
    type Item = Vec<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for BattleStream {
    fn drop(&mut self) {
        self.pacer.abort();
    }
}
