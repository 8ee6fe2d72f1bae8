//! Host document handling
//!
//! The game's host document is an HTML file with embedded script. Four
//! marker-delimited regions of it are generated from the roster:
//! - `format`: markers, line templates and naming rules (configurable)
//! - `region`: locating and replacing marker-bounded spans
//! - `extract`: recovering the roster order from document text
//! - `synth`: re-rendering every region from the roster
//! - `document`: the opened text and its write handle
//! - `commit`: synthesize, then write in place or offer a download

pub mod commit;
pub mod document;
pub mod extract;
pub mod format;
pub mod region;
pub mod synth;

pub use commit::{CommitError, CommitOutcome, CommitPipeline, CommitReport};
pub use document::{FileWriteHandle, HostDocument, WriteHandle};
pub use extract::{extract, ExtractError, ExtractWarning, Extraction, Strategy};
pub use format::HostFormat;
pub use region::Region;
pub use synth::{SynthWarning, Synthesis, Synthesizer};
