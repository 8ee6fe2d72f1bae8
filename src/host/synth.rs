//! Region Synthesizer
//!
//! Re-renders every region from the Active Roster. Rendering is a pure
//! function of (roster, format, indentation of the region's first span), so
//! running it twice without a roster change yields the same bytes, and every
//! span of a region holds the same block.

use log::warn;

use super::format::HostFormat;
use super::region::{line_indent, MarkerCodec, Region, RegionCodec};
use crate::roster::ActiveRoster;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthWarning {
    #[error("markers for the {0} region not found, left unchanged")]
    RegionMarkerNotFound(Region),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub text: String,
    pub warnings: Vec<SynthWarning>,
}

pub struct Synthesizer<'a, C: RegionCodec = MarkerCodec> {
    format: &'a HostFormat,
    codec: C,
}

impl<'a> Synthesizer<'a, MarkerCodec> {
    pub fn new(format: &'a HostFormat) -> Self {
        Self {
            format,
            codec: MarkerCodec,
        }
    }
}

impl<'a, C: RegionCodec> Synthesizer<'a, C> {
    pub fn with_codec(format: &'a HostFormat, codec: C) -> Self {
        Self { format, codec }
    }

    /// Content placed between one region's markers
    ///
    /// `prefix` is the document text before the begin marker; line regions
    /// take their indentation from it.
    pub fn render(&self, region: Region, roster: &ActiveRoster, prefix: &str) -> String {
        let templates = &self.format.templates;
        let template = match region {
            Region::RosterArray => {
                let quoted: Vec<String> = roster.iter().map(|id| format!("\"{}\"", id)).collect();
                return format!(" {} ", quoted.join(", "));
            }
            Region::SelectionSwitch => &templates.selection_case,
            Region::PlayerFactorySwitch => &templates.player_case,
            Region::ScriptIncludes => &templates.script_include,
        };

        let indent = line_indent(prefix);
        let mut block = String::from("\n");
        for id in roster.iter() {
            block.push_str(indent);
            block.push_str(&self.format.render_line(template, id));
            block.push('\n');
        }
        block.push_str(indent);
        block
    }

    /// Rewrite one region; `None` when its markers are missing
    ///
    /// The block is rendered once, indented from the first span, and every
    /// span receives the same bytes.
    pub fn synthesize_region(&self, region: Region, roster: &ActiveRoster, text: &str) -> Option<String> {
        let markers = self.format.markers(region);
        let first = self.codec.spans(text, markers).into_iter().next()?;
        let block = self.render(region, roster, &text[..first.begin_marker.start]);
        self.codec.replace_all(text, markers, &block)
    }

    /// Rewrite every region in commit order
    ///
    /// A missing region is reported and skipped; the rest still apply.
    pub fn synthesize(&self, roster: &ActiveRoster, text: &str) -> Synthesis {
        let mut current = text.to_string();
        let mut warnings = Vec::new();
        for region in Region::ALL {
            match self.synthesize_region(region, roster, &current) {
                Some(next) => current = next,
                None => {
                    warn!("Region markers not found: {}", region);
                    warnings.push(SynthWarning::RegionMarkerNotFound(region));
                }
            }
        }
        Synthesis {
            text: current,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::extract::extract;
    use crate::host::format::MarkerPair;
    use crate::host::region::Span;
    use crate::roster::CharacterId;

    const HOST: &str = r#"<!DOCTYPE html>
<html>
<head>
    <!-- CHARACTER-SCRIPTS:BEGIN -->
    <script src="characters/installed/ghost.js"></script>
    <!-- CHARACTER-SCRIPTS:END -->
</head>
<body>
<script>
    const roster = [/* ROSTER:BEGIN */ "ghost" /* ROSTER:END */];

    function buildPreview(id) {
        switch (id) {
            // SELECT-CASES:BEGIN
            case "ghost": return createGhostCharacter();
            // SELECT-CASES:END
        }
    }

    function buildPlayer(id) {
        let player = null;
        switch (id) {
            // PLAYER-CASES:BEGIN
            case "ghost": player = createGhostCharacter(); break;
            // PLAYER-CASES:END
        }
        return player;
    }

    function buildMenuPreview(id) {
        switch (id) {
            // SELECT-CASES:BEGIN
            case "stale": return createStaleCharacter();
            // SELECT-CASES:END
        }
    }
</script>
</body>
</html>
"#;

    fn roster(names: &[&str]) -> ActiveRoster {
        ActiveRoster::new(names.iter().map(|n| CharacterId::parse(n).unwrap())).unwrap()
    }

    #[test]
    fn test_full_synthesis() {
        let format = HostFormat::default();
        let out = Synthesizer::new(&format).synthesize(&roster(&["ufo", "ghost"]), HOST);
        assert!(out.warnings.is_empty());

        assert!(out.text.contains(r#"[/* ROSTER:BEGIN */ "ufo", "ghost" /* ROSTER:END */]"#));
        let ind = " ".repeat(12);
        assert!(out.text.contains(&format!(
            "{ind}// SELECT-CASES:BEGIN\n\
             {ind}case \"ufo\": return createUFOCharacter();\n\
             {ind}case \"ghost\": return createGhostCharacter();\n\
             {ind}// SELECT-CASES:END"
        )));
        assert!(out.text.contains(&format!(
            "case \"ufo\": player = createUFOCharacter(); break;\n{ind}case \"ghost\": player"
        )));
        assert!(out.text.contains(
            "    <script src=\"characters/installed/ufo.js\"></script>\n    <script src=\"characters/installed/ghost.js\"></script>\n    <!-- CHARACTER-SCRIPTS:END -->"
        ));
        assert!(!out.text.contains("createStaleCharacter"));
        assert!(out.text.starts_with("<!DOCTYPE html>\n<html>\n<head>\n"));
        assert!(out.text.ends_with("</script>\n</body>\n</html>\n"));
    }

    #[test]
    fn test_idempotent() {
        let format = HostFormat::default();
        let synth = Synthesizer::new(&format);
        let r = roster(&["dragon", "ghost", "robot"]);
        let once = synth.synthesize(&r, HOST).text;
        let twice = synth.synthesize(&r, &once).text;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_multi_span_identical() {
        let format = HostFormat::default();
        let synth = Synthesizer::new(&format);
        let out = synth.synthesize(&roster(&["alien", "wizard"]), HOST).text;

        let spans = MarkerCodec.spans(&out, format.markers(Region::SelectionSwitch));
        assert_eq!(spans.len(), 2);
        assert_eq!(&out[spans[0].content()], &out[spans[1].content()]);
    }

    #[test]
    fn test_multi_span_identical_across_columns() {
        let format = HostFormat::default();
        let text = "        // SELECT-CASES:BEGIN\n        // SELECT-CASES:END\n\
                    function other() {\n  // SELECT-CASES:BEGIN\n  // SELECT-CASES:END\n}\n";
        let out = Synthesizer::new(&format)
            .synthesize_region(Region::SelectionSwitch, &roster(&["ghost", "robot"]), text)
            .unwrap();

        let spans = MarkerCodec.spans(&out, format.markers(Region::SelectionSwitch));
        assert_eq!(spans.len(), 2);
        assert_eq!(&out[spans[0].content()], &out[spans[1].content()]);
        // Indented from the first span
        assert!(out.starts_with(
            "        // SELECT-CASES:BEGIN\n        case \"ghost\": return createGhostCharacter();\n"
        ));
    }

    /// Finds no spans anywhere
    struct BlindCodec;

    impl RegionCodec for BlindCodec {
        fn spans(&self, _text: &str, _markers: &MarkerPair) -> Vec<Span> {
            Vec::new()
        }
    }

    #[test]
    fn test_custom_codec_drives_synthesis() {
        let format = HostFormat::default();
        let out = Synthesizer::with_codec(&format, BlindCodec).synthesize(&roster(&["ghost"]), HOST);

        let expected: Vec<SynthWarning> = Region::ALL.into_iter().map(SynthWarning::RegionMarkerNotFound).collect();
        assert_eq!(out.warnings, expected);
        assert_eq!(out.text, HOST);
    }

    #[test]
    fn test_round_trip_order() {
        let format = HostFormat::default();
        let first = extract(HOST, &format).unwrap();
        let r = ActiveRoster::new(first.ids.clone()).unwrap();
        let written = Synthesizer::new(&format).synthesize(&r, HOST).text;
        assert_eq!(extract(&written, &format).unwrap().ids, first.ids);

        let shuffled = roster(&["robot", "ghost", "apple"]);
        let written = Synthesizer::new(&format).synthesize(&shuffled, HOST).text;
        assert_eq!(extract(&written, &format).unwrap().ids, shuffled.ids());
    }

    #[test]
    fn test_missing_region_is_reported_not_fatal() {
        let format = HostFormat::default();
        let text = HOST.replace("// PLAYER-CASES:BEGIN", "// player cases");
        let out = Synthesizer::new(&format).synthesize(&roster(&["cactus"]), &text);

        assert_eq!(
            out.warnings,
            vec![SynthWarning::RegionMarkerNotFound(Region::PlayerFactorySwitch)]
        );
        // Untouched region keeps its old content
        assert!(out.text.contains("case \"ghost\": player = createGhostCharacter(); break;"));
        // Others were rewritten
        assert!(out.text.contains(r#""cactus" /* ROSTER:END */"#));
        assert!(out.text.contains("case \"cactus\": return createCactusCharacter();"));
    }

    #[test]
    fn test_inline_marker_has_no_indent() {
        let format = HostFormat::default();
        let text = "x; // SELECT-CASES:BEGIN\n// SELECT-CASES:END";
        let out = Synthesizer::new(&format)
            .synthesize_region(Region::SelectionSwitch, &roster(&["ghost"]), text)
            .unwrap();
        assert_eq!(
            out,
            "x; // SELECT-CASES:BEGIN\ncase \"ghost\": return createGhostCharacter();\n// SELECT-CASES:END"
        );
    }
}
