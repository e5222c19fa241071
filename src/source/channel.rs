//! In-process artifact handoff.
//!
//! A collector running in the same process publishes complete sets through
//! a [`SetPublisher`]; the pipeline side reads them through a
//! [`ChannelSource`]. Only the newest set is kept, so a pipeline that falls
//! behind skips straight to the latest snapshot.

use tokio::sync::watch;

use super::ArtifactSource;
use crate::registry::ArtifactSet;

/// Publishing half of an in-process channel.
#[derive(Debug, Clone)]
pub struct SetPublisher {
    tx: watch::Sender<Option<ArtifactSet>>,
}

impl SetPublisher {
    /// Replace the current set. Succeeds even when no source is listening.
    pub fn publish(&self, artifacts: ArtifactSet) {
        self.tx.send_replace(Some(artifacts));
    }
}

/// Receiving half of an in-process channel.
///
/// Yields nothing until the first set is published. Once every publisher
/// is dropped the source reports it through [`error`](ArtifactSource::error).
///
/// ```
/// use clusterwatch::{ArtifactSet, ArtifactSource, ChannelSource};
///
/// let (publisher, mut source) = ChannelSource::channel("collector");
/// assert!(source.poll().is_none());
///
/// publisher.publish(ArtifactSet::new());
/// assert!(source.poll().is_some());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    rx: watch::Receiver<Option<ArtifactSet>>,
    description: String,
    closed: bool,
}

impl ChannelSource {
    pub fn channel(name: &str) -> (SetPublisher, Self) {
        let (tx, rx) = watch::channel(None);
        let source = Self {
            rx,
            description: format!("channel: {}", name),
            closed: false,
        };
        (SetPublisher { tx }, source)
    }
}

impl ArtifactSource for ChannelSource {
    fn poll(&mut self) -> Option<ArtifactSet> {
        match self.rx.has_changed() {
            Ok(true) => self.rx.borrow_and_update().clone(),
            Ok(false) => None,
            Err(_) => {
                self.closed = true;
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.closed.then_some("publisher closed")
    }
}
