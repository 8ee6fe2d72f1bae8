//! Roster Model
//!
//! The in-memory side of the editor: which characters are compiled into the
//! game (the Active Roster, order-significant) and which could be
//! (the Available Catalog). Pure data, no I/O.
//!
//! ```text
//! ActiveRoster  ["apple", "carrot", "pumpkin"]   <- selection order in-game
//! Catalog       [ghost (installed), ufo, ...]    <- descriptors, flags only
//! builtin       fixed table, never re-added      <- display lookup fallback
//! ```

pub mod builtin;
pub mod editor;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use editor::RosterEditor;

/// Errors for roster construction and editor preconditions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("cannot remove the last character in the roster")]
    CannotRemoveLast,
    #[error("{0} is already installed")]
    AlreadyInstalled(CharacterId),
    #[error("{0} is not in the roster")]
    NotInRoster(CharacterId),
    #[error("no descriptor known for {0}")]
    UnknownCharacter(CharacterId),
    #[error("index {index} out of range for roster of {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("roster must contain at least one character")]
    Empty,
    #[error("invalid character id {0:?} (expected lowercase letters and digits)")]
    InvalidCharacterId(String),
}

/// Stable identifier of a character
///
/// Lowercase ASCII letters and digits only. Doubles as the naming root for
/// generated code (`createAppleCharacter`) and script paths (`apple.js`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterId(String);

impl CharacterId {
    /// Parse an id, folding ASCII uppercase to lowercase
    pub fn parse(raw: &str) -> Result<Self, RosterError> {
        let id = raw.trim().to_ascii_lowercase();
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()) {
            return Err(RosterError::InvalidCharacterId(raw.to_string()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CharacterId {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CharacterId> for String {
    fn from(id: CharacterId) -> Self {
        id.0
    }
}

impl AsRef<str> for CharacterId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Catalog grouping shown next to each character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cute,
    Scary,
    Scifi,
    Mythical,
    Nature,
    Food,
    Action,
    Magic,
    Adventure,
    Custom,
    #[default]
    Misc,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Cute => "Cute",
            Category::Scary => "Scary",
            Category::Scifi => "Sci-Fi",
            Category::Mythical => "Mythical",
            Category::Nature => "Nature",
            Category::Food => "Food",
            Category::Action => "Action",
            Category::Magic => "Magic",
            Category::Adventure => "Adventure",
            Category::Custom => "Custom",
            Category::Misc => "Misc",
        }
    }
}

/// Display and catalog data for one character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDescriptor {
    pub id: CharacterId,
    pub display_name: String,
    /// Emoji or short glyph shown in lists
    #[serde(default)]
    pub glyph: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub abilities: Vec<String>,
    /// Set while the id is part of the Active Roster (not persisted)
    #[serde(skip)]
    pub installed: bool,
}

impl CharacterDescriptor {
    /// Minimal descriptor for an id we only know by name
    pub fn placeholder(id: CharacterId) -> Self {
        let display_name = capitalize(id.as_str());
        Self {
            id,
            display_name,
            glyph: "?".to_string(),
            category: Category::Custom,
            description: String::new(),
            abilities: Vec::new(),
            installed: false,
        }
    }
}

/// Capitalize the first ASCII letter, leave the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Ordered, duplicate-free list of the characters compiled into the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRoster {
    ids: Vec<CharacterId>,
}

impl ActiveRoster {
    /// Build a roster, dropping later duplicates. Fails if nothing remains.
    pub fn new(ids: impl IntoIterator<Item = CharacterId>) -> Result<Self, RosterError> {
        let mut out: Vec<CharacterId> = Vec::new();
        for id in ids {
            if !out.contains(&id) {
                out.push(id);
            }
        }
        if out.is_empty() {
            return Err(RosterError::Empty);
        }
        Ok(Self { ids: out })
    }

    pub fn ids(&self) -> &[CharacterId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: &CharacterId) -> bool {
        self.ids.contains(id)
    }

    pub fn position(&self, id: &CharacterId) -> Option<usize> {
        self.ids.iter().position(|x| x == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterId> {
        self.ids.iter()
    }

    // Mutators are crate-private: only the editor changes the roster.

    pub(crate) fn push(&mut self, id: CharacterId) {
        self.ids.push(id);
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> CharacterId {
        self.ids.remove(index)
    }

    pub(crate) fn ids_mut(&mut self) -> &mut Vec<CharacterId> {
        &mut self.ids
    }
}

/// Descriptors for characters that can be installed
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CharacterDescriptor>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(entries: Vec<CharacterDescriptor>) -> Self {
        let mut catalog = Self::new();
        for descriptor in entries {
            catalog.upsert(descriptor);
        }
        catalog
    }

    pub fn get(&self, id: &CharacterId) -> Option<&CharacterDescriptor> {
        self.entries.iter().find(|d| &d.id == id)
    }

    pub fn get_mut(&mut self, id: &CharacterId) -> Option<&mut CharacterDescriptor> {
        self.entries.iter_mut().find(|d| &d.id == id)
    }

    /// Insert or replace by id, keeping the first-seen position
    pub fn upsert(&mut self, descriptor: CharacterDescriptor) {
        if let Some(existing) = self.get_mut(&descriptor.id) {
            *existing = descriptor;
        } else {
            self.entries.push(descriptor);
        }
    }

    pub fn entries(&self) -> &[CharacterDescriptor] {
        &self.entries
    }

    /// Entries not currently installed, in catalog order
    pub fn available(&self) -> impl Iterator<Item = &CharacterDescriptor> {
        self.entries.iter().filter(|d| !d.installed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Resolve display data for an id: built-in table first, then the catalog
pub fn lookup<'a>(catalog: &'a Catalog, id: &CharacterId) -> Option<&'a CharacterDescriptor> {
    builtin::descriptor(id).or_else(|| catalog.get(id))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn ids(names: &[&str]) -> Vec<CharacterId> {
        names.iter().map(|n| CharacterId::parse(n).unwrap()).collect()
    }

    #[test]
    fn test_character_id_parse() {
        assert_eq!(CharacterId::parse("Apple").unwrap().as_str(), "apple");
        assert_eq!(CharacterId::parse("r2d2").unwrap().as_str(), "r2d2");
        assert!(matches!(CharacterId::parse(""), Err(RosterError::InvalidCharacterId(_))));
        assert!(CharacterId::parse("happy face").is_err());
        assert!(CharacterId::parse("snake_case").is_err());
    }

    #[test]
    fn test_roster_drops_duplicates() {
        let roster = ActiveRoster::new(ids(&["ghost", "robot", "ghost"])).unwrap();
        assert_eq!(roster.ids(), ids(&["ghost", "robot"]).as_slice());
    }

    #[test]
    fn test_roster_rejects_empty() {
        assert_eq!(ActiveRoster::new(Vec::new()), Err(RosterError::Empty));
    }

    #[test]
    fn test_catalog_upsert_keeps_position() {
        let mut catalog = Catalog::from_descriptors(vec![
            CharacterDescriptor::placeholder(CharacterId::parse("ufo").unwrap()),
            CharacterDescriptor::placeholder(CharacterId::parse("tv").unwrap()),
        ]);
        let mut ufo = CharacterDescriptor::placeholder(CharacterId::parse("ufo").unwrap());
        ufo.display_name = "Flying Saucer".into();
        catalog.upsert(ufo);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0].display_name, "Flying Saucer");
    }

    #[test]
    fn test_descriptor_ron() {
        let text = r#"(id: "ufo", display_name: "UFO", category: scifi, abilities: ["Beam"])"#;
        let descriptor: CharacterDescriptor = ron::from_str(text).unwrap();
        assert_eq!(descriptor.id.as_str(), "ufo");
        assert_eq!(descriptor.category, Category::Scifi);
        assert!(!descriptor.installed);

        let bad = r#"(id: "Not Valid", display_name: "x")"#;
        assert!(ron::from_str::<CharacterDescriptor>(bad).is_err());
    }
}
