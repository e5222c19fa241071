//! Artifact sources - the input boundary of the pipeline.
//!
//! Collecting state from the cluster happens elsewhere. A source only hands
//! over complete [`ArtifactSet`]s that a collector has already produced,
//! either as a bundle file on disk or pushed through an in-process channel.

mod channel;
mod file;

pub use channel::{ChannelSource, SetPublisher};
pub use file::FileSource;

use std::fmt::Debug;

use crate::registry::ArtifactSet;

/// Trait for receiving artifact sets.
///
/// # Example
///
/// ```
/// use clusterwatch::{ArtifactSource, FileSource};
///
/// let mut source = FileSource::new("cluster.json");
/// if let Some(artifacts) = source.poll() {
///     println!("Got {} artifact kinds", artifacts.kinds().len());
/// }
/// ```
pub trait ArtifactSource: Send + Debug {
    /// Poll for the latest artifact set.
    ///
    /// Returns `Some(set)` if a new set is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<ArtifactSet>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Returns the error message if the last poll failed.
    fn error(&self) -> Option<&str>;
}
