//! File-based artifact source.
//!
//! Polls a JSON bundle file written by a collector.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::ArtifactSource;
use crate::registry::ArtifactSet;

/// A source that reads artifact bundles from a JSON file.
///
/// The source tracks the file's modification time and only returns a new
/// set when the file has been updated. The bundle is an object keyed by
/// artifact kind (`osd_map`, `pg_brief`, `osd_tree`, `mds_map`,
/// `mon_status`).
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<ArtifactSet> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match ArtifactSet::parse(&content) {
                Ok(artifacts) => {
                    self.last_error = None;
                    Some(artifacts)
                }
                Err(e) => {
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl ArtifactSource for FileSource {
    fn poll(&mut self) -> Option<ArtifactSet> {
        let current_modified = self.modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, keep the last set
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(artifacts) = self.read_file() {
                self.last_modified = current_modified;
                return Some(artifacts);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterwatch_types::ArtifactKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "osd_map": {"osds": [], "pools": [{"pool": 1, "pool_name": "rbd"}]},
            "mon_status": {"monmap": {"mons": [{"rank": 0}]}, "quorum": [0]}
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/cluster.json");
        assert_eq!(source.path(), Path::new("/tmp/cluster.json"));
        assert_eq!(source.description(), "file: /tmp/cluster.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let artifacts = source.poll().unwrap();
        assert!(artifacts.contains(ArtifactKind::OsdMap));
        assert!(artifacts.contains(ArtifactKind::MonStatus));
        assert!(!artifacts.contains(ArtifactKind::PgBrief));

        // Unchanged file yields nothing new
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/cluster.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[test]
    fn test_file_source_recovers_after_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{").unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_none());
        assert!(source.error().is_some());

        // Parse failures leave last_modified unset, so the next poll rereads
        std::fs::write(file.path(), sample_json()).unwrap();
        assert!(source.poll().is_some());
        assert!(source.error().is_none());
    }
}
