//! Host format
//!
//! The textual contract with the game's host document: marker pairs, line
//! templates, generator naming overrides and the names the extractor looks
//! for. Serialized as part of `settings.ron`; every field has a default so
//! a partial file still loads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::region::Region;
use crate::roster::{capitalize, CharacterId};

/// Begin/end literal pair delimiting one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPair {
    pub begin: String,
    pub end: String,
}

impl MarkerPair {
    pub fn new(begin: &str, end: &str) -> Self {
        Self {
            begin: begin.to_string(),
            end: end.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    pub roster_array: MarkerPair,
    pub selection_switch: MarkerPair,
    pub player_factory_switch: MarkerPair,
    pub script_includes: MarkerPair,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            roster_array: MarkerPair::new("/* ROSTER:BEGIN */", "/* ROSTER:END */"),
            selection_switch: MarkerPair::new("// SELECT-CASES:BEGIN", "// SELECT-CASES:END"),
            player_factory_switch: MarkerPair::new("// PLAYER-CASES:BEGIN", "// PLAYER-CASES:END"),
            script_includes: MarkerPair::new(
                "<!-- CHARACTER-SCRIPTS:BEGIN -->",
                "<!-- CHARACTER-SCRIPTS:END -->",
            ),
        }
    }
}

/// Line templates. Placeholders: `{id}`, `{generator}`, `{dir}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Templates {
    pub selection_case: String,
    pub player_case: String,
    pub script_include: String,
    /// Value substituted for `{dir}` in include lines
    pub installed_dir: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            selection_case: r#"case "{id}": return {generator}();"#.to_string(),
            player_case: r#"case "{id}": player = {generator}(); break;"#.to_string(),
            script_include: r#"<script src="{dir}/{id}.js"></script>"#.to_string(),
            installed_dir: "characters/installed".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostFormat {
    pub markers: Markers,
    pub templates: Templates,
    /// Generator names that don't follow `create<Id>Character`
    pub generator_overrides: BTreeMap<String, String>,
    /// Variable names tried by assignment-style extraction
    pub roster_variables: Vec<String>,
    /// Names that identify a bare legacy roster array
    pub legacy_probe_names: Vec<String>,
}

impl Default for HostFormat {
    fn default() -> Self {
        let mut generator_overrides = BTreeMap::new();
        generator_overrides.insert("ufo".to_string(), "createUFOCharacter".to_string());
        generator_overrides.insert("tv".to_string(), "createTVCharacter".to_string());
        Self {
            markers: Markers::default(),
            templates: Templates::default(),
            generator_overrides,
            roster_variables: vec![
                "characters".to_string(),
                "characterList".to_string(),
                "availableCharacters".to_string(),
            ],
            legacy_probe_names: vec![
                "happyface".to_string(),
                "ghost".to_string(),
                "robot".to_string(),
            ],
        }
    }
}

impl HostFormat {
    pub fn markers(&self, region: Region) -> &MarkerPair {
        match region {
            Region::RosterArray => &self.markers.roster_array,
            Region::SelectionSwitch => &self.markers.selection_switch,
            Region::PlayerFactorySwitch => &self.markers.player_factory_switch,
            Region::ScriptIncludes => &self.markers.script_includes,
        }
    }

    /// Name of the function that builds this character in the host document
    pub fn generator_name(&self, id: &CharacterId) -> String {
        match self.generator_overrides.get(id.as_str()) {
            Some(name) => name.clone(),
            None => format!("create{}Character", capitalize(id.as_str())),
        }
    }

    /// Expand a line template for one roster entry
    pub fn render_line(&self, template: &str, id: &CharacterId) -> String {
        template
            .replace("{generator}", &self.generator_name(id))
            .replace("{dir}", &self.templates.installed_dir)
            .replace("{id}", id.as_str())
    }
}
