//! Region Extractor
//!
//! Recovers the Active Roster from host document text. Strategies run in
//! priority order and the first one that yields ids wins; results are never
//! merged across strategies.

use log::{info, warn};
use regex::Regex;
use std::sync::OnceLock;

use super::format::HostFormat;
use super::region::{MarkerCodec, Region, RegionCodec};
use crate::roster::{builtin, CharacterId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("no character roster found in the document")]
    RosterNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractWarning {
    #[error("roster markers not found, using fallback extraction (order may differ from the document)")]
    UsingFallbackExtraction,
    #[error("skipped {0:?}: not a valid character id")]
    SkippedLiteral(String),
}

/// Which strategy produced the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Markers,
    Assignment,
    LegacyArray,
    Presence,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Markers => "roster markers",
            Strategy::Assignment => "roster assignment",
            Strategy::LegacyArray => "legacy array",
            Strategy::Presence => "fallback scan",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub ids: Vec<CharacterId>,
    pub strategy: Strategy,
    pub warnings: Vec<ExtractWarning>,
}

fn literal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([^"\\\n]*)"|'([^'\\\n]*)'"#).expect("valid literal regex"))
}

fn bare_array_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\[\]]*)\]").expect("valid array regex"))
}

/// Quoted string literals in document order
fn quoted_literals(text: &str) -> impl Iterator<Item = &str> {
    literal_regex().captures_iter(text).filter_map(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
    })
}

/// Literals converted to ids; invalid ones become warnings, repeats are dropped
fn collect_ids(text: &str, warnings: &mut Vec<ExtractWarning>) -> Vec<CharacterId> {
    let mut ids: Vec<CharacterId> = Vec::new();
    for literal in quoted_literals(text) {
        match CharacterId::parse(literal) {
            Ok(id) if !ids.contains(&id) => ids.push(id),
            Ok(_) => {}
            Err(_) => {
                warn!("Skipping non-id literal {:?} in roster", literal);
                warnings.push(ExtractWarning::SkippedLiteral(literal.to_string()));
            }
        }
    }
    ids
}

fn from_markers(text: &str, format: &HostFormat, warnings: &mut Vec<ExtractWarning>) -> Vec<CharacterId> {
    let markers = format.markers(Region::RosterArray);
    match MarkerCodec.spans(text, markers).first() {
        Some(span) => collect_ids(&text[span.content()], warnings),
        None => Vec::new(),
    }
}

fn from_assignment(text: &str, format: &HostFormat, warnings: &mut Vec<ExtractWarning>) -> Vec<CharacterId> {
    for name in &format.roster_variables {
        let pattern = format!(r"\b{}\s*=\s*\[([^\]]*)\]", regex::escape(name));
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        if let Some(body) = re.captures(text).and_then(|c| c.get(1)) {
            let ids = collect_ids(body.as_str(), warnings);
            if !ids.is_empty() {
                return ids;
            }
        }
    }
    Vec::new()
}

fn from_legacy_array(text: &str, format: &HostFormat, warnings: &mut Vec<ExtractWarning>) -> Vec<CharacterId> {
    for caps in bare_array_regex().captures_iter(text) {
        let Some(body) = caps.get(1) else { continue };
        let has_probe = quoted_literals(body.as_str())
            .any(|lit| format.legacy_probe_names.iter().any(|probe| probe == lit));
        if has_probe {
            return collect_ids(body.as_str(), warnings);
        }
    }
    Vec::new()
}

/// Allow-list ids whose quoted form appears anywhere, in allow-list order
fn from_presence(text: &str) -> Vec<CharacterId> {
    builtin::allow_list()
        .filter(|id| {
            text.contains(&format!("\"{}\"", id)) || text.contains(&format!("'{}'", id))
        })
        .cloned()
        .collect()
}

type StrategyFn = fn(&str, &HostFormat, &mut Vec<ExtractWarning>) -> Vec<CharacterId>;

/// Ordered strategies tried before the presence fallback
const ORDERED: [(Strategy, StrategyFn); 3] = [
    (Strategy::Markers, from_markers),
    (Strategy::Assignment, from_assignment),
    (Strategy::LegacyArray, from_legacy_array),
];

/// Recover the roster order from a host document
pub fn extract(text: &str, format: &HostFormat) -> Result<Extraction, ExtractError> {
    let mut warnings = Vec::new();

    for (strategy, run) in ORDERED {
        let ids = run(text, format, &mut warnings);
        if !ids.is_empty() {
            info!("Extracted {} characters via {}", ids.len(), strategy.label());
            return Ok(Extraction {
                ids,
                strategy,
                warnings,
            });
        }
    }

    let ids = from_presence(text);
    if ids.is_empty() {
        warn!("No roster found by any extraction strategy");
        return Err(ExtractError::RosterNotFound);
    }
    warn!("Using fallback extraction: {} characters in allow-list order", ids.len());
    warnings.push(ExtractWarning::UsingFallbackExtraction);
    Ok(Extraction {
        ids,
        strategy: Strategy::Presence,
        warnings,
    })
}
