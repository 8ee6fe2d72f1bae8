//! Workspace
//!
//! One open host document and everything derived from it: the commit
//! pipeline (which owns the text and write handle), the roster editor and
//! the host format used to read and write regions. Lifecycle is
//! `open(document) -> edits/commits -> close()`; opening again replaces the
//! whole set.

use log::{info, warn};

use crate::host::{
    extract, CommitError, CommitPipeline, CommitReport, ExtractError, ExtractWarning, HostDocument, HostFormat,
    Strategy,
};
use crate::roster::{ActiveRoster, Catalog, CharacterDescriptor, RosterEditor};
use crate::storage::DownloadSink;

/// What opening a document found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenReport {
    pub name: String,
    pub strategy: Strategy,
    pub count: usize,
    pub warnings: Vec<ExtractWarning>,
}

impl OpenReport {
    pub fn summary(&self) -> String {
        let mut msg = format!("Opened {}: {} characters ({})", self.name, self.count, self.strategy.label());
        if self.warnings.contains(&ExtractWarning::UsingFallbackExtraction) {
            msg.push_str(" - fallback extraction, check the order");
        }
        msg
    }
}

pub struct Workspace {
    format: HostFormat,
    pipeline: CommitPipeline,
    editor: Option<RosterEditor>,
    /// Descriptors found by rescans; seeds the catalog of every open
    known: Vec<CharacterDescriptor>,
}

impl Workspace {
    pub fn new(format: HostFormat) -> Self {
        Self {
            format,
            pipeline: CommitPipeline::new(),
            editor: None,
            known: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.editor.is_some()
    }

    pub fn document(&self) -> Option<&HostDocument> {
        self.pipeline.document()
    }

    pub fn editor(&self) -> Option<&RosterEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut RosterEditor> {
        self.editor.as_mut()
    }

    /// Extract the roster and take ownership of the document
    ///
    /// On `RosterNotFound` the previous document is still released: the
    /// workspace ends up closed rather than half-open.
    pub fn open(&mut self, document: HostDocument) -> Result<OpenReport, ExtractError> {
        self.close();

        let extraction = extract(document.text(), &self.format)?;
        let roster = ActiveRoster::new(extraction.ids).map_err(|_| ExtractError::RosterNotFound)?;
        for warning in &extraction.warnings {
            warn!("{}: {}", document.name(), warning);
        }

        let report = OpenReport {
            name: document.name().to_string(),
            strategy: extraction.strategy,
            count: roster.len(),
            warnings: extraction.warnings,
        };
        let catalog = Catalog::from_descriptors(self.known.clone());
        self.editor = Some(RosterEditor::new(roster, catalog));
        self.pipeline.open(document);
        info!("{}", report.summary());
        Ok(report)
    }

    /// Drop the roster and release the document and its write handle
    pub fn close(&mut self) {
        if let Some(document) = self.pipeline.close() {
            info!("Closed {}", document.name());
        }
        self.editor = None;
    }

    pub fn commit(&mut self, download: &mut dyn DownloadSink) -> Result<CommitReport, CommitError> {
        let editor = self.editor.as_ref().ok_or(CommitError::NoDocument)?;
        self.pipeline.commit(editor.roster(), &self.format, download)
    }

    /// Remember rescanned descriptors and merge them into the open roster's
    /// catalog. Returns how many the editor accepted (0 when closed).
    pub fn rescan(&mut self, descriptors: Vec<CharacterDescriptor>) -> usize {
        for descriptor in &descriptors {
            match self.known.iter_mut().find(|d| d.id == descriptor.id) {
                Some(existing) => *existing = descriptor.clone(),
                None => self.known.push(descriptor.clone()),
            }
        }
        match self.editor.as_mut() {
            Some(editor) => editor.rescan(descriptors),
            None => 0,
        }
    }
}
