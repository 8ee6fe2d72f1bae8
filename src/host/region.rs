//! Regions
//!
//! Named, marker-delimited spans of the host document. The engine never
//! parses the surrounding code: it finds marker pairs and swaps the text
//! between them. `RegionCodec` is the seam where a structural strategy
//! could replace the marker one without touching callers.

use std::fmt;
use std::ops::Range;

use super::format::MarkerPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    RosterArray,
    SelectionSwitch,
    PlayerFactorySwitch,
    ScriptIncludes,
}

impl Region {
    /// Commit order: later regions are synthesized against earlier output
    pub const ALL: [Region; 4] = [
        Region::RosterArray,
        Region::SelectionSwitch,
        Region::PlayerFactorySwitch,
        Region::ScriptIncludes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Region::RosterArray => "roster array",
            Region::SelectionSwitch => "selection switch",
            Region::PlayerFactorySwitch => "player factory switch",
            Region::ScriptIncludes => "script includes",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One located span: byte ranges of the markers and the content between
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub begin_marker: Range<usize>,
    pub end_marker: Range<usize>,
}

impl Span {
    pub fn content(&self) -> Range<usize> {
        self.begin_marker.end..self.end_marker.start
    }
}

/// How region content is located and replaced
pub trait RegionCodec {
    /// All spans for a marker pair, in document order
    fn spans(&self, text: &str, markers: &MarkerPair) -> Vec<Span>;

    /// Replace every span's content with the same `content`. Returns `None`
    /// if no span exists; the input is left untouched in that case.
    fn replace_all(&self, text: &str, markers: &MarkerPair, content: &str) -> Option<String> {
        let spans = self.spans(text, markers);
        if spans.is_empty() {
            return None;
        }
        let mut out = String::with_capacity(text.len() + content.len() * spans.len());
        let mut cursor = 0;
        for span in &spans {
            let range = span.content();
            out.push_str(&text[cursor..range.start]);
            out.push_str(content);
            cursor = range.end;
        }
        out.push_str(&text[cursor..]);
        Some(out)
    }
}

/// Literal marker search, left to right, non-nested
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerCodec;

impl RegionCodec for MarkerCodec {
    fn spans(&self, text: &str, markers: &MarkerPair) -> Vec<Span> {
        let mut spans = Vec::new();
        if markers.begin.is_empty() || markers.end.is_empty() {
            return spans;
        }
        let mut from = 0;
        while let Some(rel) = text[from..].find(&markers.begin) {
            let begin_start = from + rel;
            let begin_end = begin_start + markers.begin.len();

            let Some(end_rel) = text[begin_end..].find(&markers.end) else {
                break;
            };
            let end_start = begin_end + end_rel;
            let end_end = end_start + markers.end.len();

            // A second begin before this end means the first was unterminated;
            // pair the end with the nearest begin instead.
            let inner_begin = text[begin_end..end_start]
                .rfind(&markers.begin)
                .map(|r| begin_end + r);
            let begin_start = inner_begin.unwrap_or(begin_start);

            spans.push(Span {
                begin_marker: begin_start..begin_start + markers.begin.len(),
                end_marker: end_start..end_end,
            });
            from = end_end;
        }
        spans
    }
}

/// Whitespace between the last newline and the end of `prefix`, or empty if
/// the line has other text before the marker
pub fn line_indent(prefix: &str) -> &str {
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let tail = &prefix[line_start..];
    if tail.chars().all(|c| c == ' ' || c == '\t') {
        tail
    } else {
        ""
    }
}
