//! Commit Pipeline
//!
//! Owns the open Host Document and its write handle. A commit synthesizes
//! every region, notes whether anything changed, then writes in place or
//! falls back to offering the text as a download.

use log::{info, warn};

use super::document::HostDocument;
use super::format::HostFormat;
use super::synth::{SynthWarning, Synthesizer};
use crate::roster::ActiveRoster;
use crate::storage::download::updated_file_name;
use crate::storage::{DownloadSink, StorageError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommitError {
    #[error("no document is open")]
    NoDocument,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Original file replaced
    Persisted { location: String },
    /// New text handed to the download sink
    Downloaded { file_name: String, location: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub outcome: CommitOutcome,
    /// Synthesized text equals what was there before (diagnostic only)
    pub unchanged: bool,
    pub warnings: Vec<SynthWarning>,
}

impl CommitReport {
    pub fn summary(&self) -> String {
        let mut msg = match &self.outcome {
            CommitOutcome::Persisted { location } => format!("Saved {}", location),
            CommitOutcome::Downloaded { location, .. } => format!("Saved copy: {}", location),
        };
        if self.unchanged {
            msg.push_str(" (no changes)");
        }
        if !self.warnings.is_empty() {
            msg.push_str(&format!(" - {} region(s) skipped", self.warnings.len()));
        }
        msg
    }
}

#[derive(Debug, Default)]
pub struct CommitPipeline {
    document: Option<HostDocument>,
}

impl CommitPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a new document; the previous one (and its write
    /// handle) is released and returned
    pub fn open(&mut self, document: HostDocument) -> Option<HostDocument> {
        self.document.replace(document)
    }

    pub fn close(&mut self) -> Option<HostDocument> {
        self.document.take()
    }

    pub fn document(&self) -> Option<&HostDocument> {
        self.document.as_ref()
    }

    /// Synthesize and persist. The stored text only changes when the new
    /// text actually went somewhere.
    pub fn commit(
        &mut self,
        roster: &ActiveRoster,
        format: &HostFormat,
        download: &mut dyn DownloadSink,
    ) -> Result<CommitReport, CommitError> {
        let document = self.document.as_mut().ok_or(CommitError::NoDocument)?;

        let synthesis = Synthesizer::new(format).synthesize(roster, document.text());
        let unchanged = synthesis.text == document.text();
        if unchanged {
            info!("Commit of {}: no changes", document.name());
        }

        let written = match document.handle_mut() {
            Some(handle) => {
                let location = handle.describe();
                match handle.write_all(&synthesis.text) {
                    Ok(()) => Some(location),
                    Err(e) => {
                        warn!("In-place write to {} failed ({}), falling back to download", location, e);
                        None
                    }
                }
            }
            None => {
                info!("{}: {}, offering download", document.name(), StorageError::WriteCapabilityUnavailable);
                None
            }
        };

        let outcome = match written {
            Some(location) => CommitOutcome::Persisted { location },
            None => {
                let file_name = updated_file_name(document.name());
                let location = download.offer(&file_name, &synthesis.text)?;
                CommitOutcome::Downloaded { file_name, location }
            }
        };

        document.set_text(synthesis.text);
        info!("Committed {} characters: {:?}", roster.len(), outcome);
        Ok(CommitReport {
            outcome,
            unchanged,
            warnings: synthesis.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::document::{FileWriteHandle, WriteHandle};
    use crate::host::region::Region;
    use crate::roster::CharacterId;
    use crate::storage::download::MemoryDownload;
    use tempfile::TempDir;

    const DOC: &str = "<!-- CHARACTER-SCRIPTS:BEGIN --><!-- CHARACTER-SCRIPTS:END -->\n\
        const roster = [/* ROSTER:BEGIN */ \"ghost\" /* ROSTER:END */];\n\
        // SELECT-CASES:BEGIN\n// SELECT-CASES:END\n\
        // PLAYER-CASES:BEGIN\n// PLAYER-CASES:END\n";

    struct FailingHandle;

    impl WriteHandle for FailingHandle {
        fn write_all(&mut self, _text: &str) -> Result<(), StorageError> {
            Err(StorageError::PermissionDenied("read-only".into()))
        }
        fn describe(&self) -> String {
            "read-only".into()
        }
    }

    fn roster(names: &[&str]) -> ActiveRoster {
        ActiveRoster::new(names.iter().map(|n| CharacterId::parse(n).unwrap())).unwrap()
    }

    #[test]
    fn test_commit_persists_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("game.html");
        std::fs::write(&path, DOC).unwrap();

        let mut pipeline = CommitPipeline::new();
        pipeline.open(HostDocument::open_file(&path).unwrap());
        let mut sink = MemoryDownload::default();

        let report = pipeline
            .commit(&roster(&["ghost", "robot"]), &HostFormat::default(), &mut sink)
            .unwrap();

        assert!(matches!(report.outcome, CommitOutcome::Persisted { .. }));
        assert!(!report.unchanged);
        assert!(report.warnings.is_empty());
        assert!(sink.files.is_empty());

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains(r#""ghost", "robot""#));
        assert_eq!(pipeline.document().unwrap().text(), on_disk);
    }

    #[test]
    fn test_second_commit_reports_unchanged() {
        let mut pipeline = CommitPipeline::new();
        pipeline.open(HostDocument::from_text("game.html", DOC));
        let mut sink = MemoryDownload::default();
        let r = roster(&["ghost", "robot"]);

        let first = pipeline.commit(&r, &HostFormat::default(), &mut sink).unwrap();
        let second = pipeline.commit(&r, &HostFormat::default(), &mut sink).unwrap();
        assert!(!first.unchanged);
        assert!(second.unchanged);
        // Unchanged never blocks the write
        assert_eq!(sink.files.len(), 2);
        assert_eq!(sink.files[0].1, sink.files[1].1);
    }

    #[test]
    fn test_no_handle_falls_back_to_download() {
        let mut pipeline = CommitPipeline::new();
        pipeline.open(HostDocument::from_text("game.html", DOC));
        let mut sink = MemoryDownload::default();

        let report = pipeline
            .commit(&roster(&["dragon"]), &HostFormat::default(), &mut sink)
            .unwrap();

        assert_eq!(
            report.outcome,
            CommitOutcome::Downloaded {
                file_name: "game_updated.html".into(),
                location: "memory:game_updated.html".into(),
            }
        );
        assert_eq!(sink.files.len(), 1);
        assert!(sink.files[0].1.contains("createDragonCharacter"));
    }

    #[test]
    fn test_failed_write_falls_back_to_download() {
        let mut pipeline = CommitPipeline::new();
        pipeline.open(HostDocument::from_text("game.html", DOC).with_handle(Box::new(FailingHandle)));
        let mut sink = MemoryDownload::default();

        let report = pipeline
            .commit(&roster(&["ghost"]), &HostFormat::default(), &mut sink)
            .unwrap();
        assert!(matches!(report.outcome, CommitOutcome::Downloaded { .. }));
    }

    #[test]
    fn test_cancelled_download_leaves_document_untouched() {
        let mut pipeline = CommitPipeline::new();
        pipeline.open(HostDocument::from_text("game.html", DOC));
        let mut sink = MemoryDownload {
            cancel: true,
            ..Default::default()
        };

        let result = pipeline.commit(&roster(&["robot"]), &HostFormat::default(), &mut sink);
        assert_eq!(result, Err(CommitError::Storage(StorageError::SelectionCancelled)));
        assert_eq!(pipeline.document().unwrap().text(), DOC);
    }

    #[test]
    fn test_missing_region_still_commits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("game.html");
        let text = DOC.replace("// PLAYER-CASES:BEGIN\n", "");
        std::fs::write(&path, &text).unwrap();

        let mut pipeline = CommitPipeline::new();
        pipeline.open(
            HostDocument::from_text("game.html", text).with_handle(Box::new(FileWriteHandle::new(&path))),
        );
        let report = pipeline
            .commit(&roster(&["alien"]), &HostFormat::default(), &mut MemoryDownload::default())
            .unwrap();

        assert_eq!(
            report.warnings,
            vec![SynthWarning::RegionMarkerNotFound(Region::PlayerFactorySwitch)]
        );
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"alien\""));
    }

    #[test]
    fn test_commit_without_document() {
        let mut pipeline = CommitPipeline::new();
        let result = pipeline.commit(&roster(&["ghost"]), &HostFormat::default(), &mut MemoryDownload::default());
        assert_eq!(result, Err(CommitError::NoDocument));
    }

    #[test]
    fn test_open_releases_previous() {
        let mut pipeline = CommitPipeline::new();
        assert!(pipeline.open(HostDocument::from_text("a.html", "a")).is_none());
        let previous = pipeline.open(HostDocument::from_text("b.html", "b")).unwrap();
        assert_eq!(previous.name(), "a.html");
        assert_eq!(pipeline.document().unwrap().name(), "b.html");
    }
}
