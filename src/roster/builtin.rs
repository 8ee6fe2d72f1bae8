//! Built-in characters
//!
//! The fixed set shipped with every game build. Their order is the legacy
//! allow-list order used by fallback extraction, and removing one from the
//! roster never re-adds a catalog descriptor.

use super::{Category, CharacterDescriptor, CharacterId};
use std::sync::OnceLock;

struct BuiltinDef {
    id: &'static str,
    name: &'static str,
    glyph: &'static str,
    category: Category,
    description: &'static str,
    abilities: &'static [&'static str],
}

const BUILTINS: &[BuiltinDef] = &[
    BuiltinDef {
        id: "happyface",
        name: "Happy Face",
        glyph: "😀",
        category: Category::Cute,
        description: "The original bouncing smiley.",
        abilities: &["Double Jump"],
    },
    BuiltinDef {
        id: "ghost",
        name: "Ghost",
        glyph: "👻",
        category: Category::Scary,
        description: "Drifts through the level, slightly see-through.",
        abilities: &["Phase", "Float"],
    },
    BuiltinDef {
        id: "robot",
        name: "Robot",
        glyph: "🤖",
        category: Category::Scifi,
        description: "Boxy, loud and surprisingly quick.",
        abilities: &["Boost"],
    },
    BuiltinDef {
        id: "dragon",
        name: "Dragon",
        glyph: "🐉",
        category: Category::Mythical,
        description: "Small wings, big attitude.",
        abilities: &["Glide", "Fire Breath"],
    },
    BuiltinDef {
        id: "alien",
        name: "Alien",
        glyph: "👽",
        category: Category::Scifi,
        description: "Visitor with an antenna for every occasion.",
        abilities: &["Tractor Beam"],
    },
    BuiltinDef {
        id: "unicorn",
        name: "Unicorn",
        glyph: "🦄",
        category: Category::Magic,
        description: "Leaves a faint sparkle trail.",
        abilities: &["Dash"],
    },
    BuiltinDef {
        id: "ninja",
        name: "Ninja",
        glyph: "🥷",
        category: Category::Action,
        description: "Quiet and quick on the wall jumps.",
        abilities: &["Wall Jump", "Dash"],
    },
    BuiltinDef {
        id: "wizard",
        name: "Wizard",
        glyph: "🧙",
        category: Category::Magic,
        description: "Tall hat, short temper.",
        abilities: &["Blink"],
    },
    BuiltinDef {
        id: "pirate",
        name: "Pirate",
        glyph: "🏴",
        category: Category::Adventure,
        description: "Arrr.",
        abilities: &["Swing"],
    },
    BuiltinDef {
        id: "cactus",
        name: "Cactus",
        glyph: "🌵",
        category: Category::Nature,
        description: "Do not hug.",
        abilities: &["Spikes"],
    },
];

fn table() -> &'static [CharacterDescriptor] {
    static TABLE: OnceLock<Vec<CharacterDescriptor>> = OnceLock::new();
    TABLE.get_or_init(|| {
        BUILTINS
            .iter()
            .filter_map(|def| {
                let id = CharacterId::parse(def.id).ok()?;
                Some(CharacterDescriptor {
                    id,
                    display_name: def.name.to_string(),
                    glyph: def.glyph.to_string(),
                    category: def.category,
                    description: def.description.to_string(),
                    abilities: def.abilities.iter().map(|a| a.to_string()).collect(),
                    installed: false,
                })
            })
            .collect()
    })
}

/// Built-in descriptors in allow-list order
pub fn descriptors() -> &'static [CharacterDescriptor] {
    table()
}

/// Built-in ids in allow-list order
pub fn allow_list() -> impl Iterator<Item = &'static CharacterId> {
    table().iter().map(|d| &d.id)
}

pub fn is_builtin(id: &CharacterId) -> bool {
    table().iter().any(|d| &d.id == id)
}

pub fn descriptor(id: &CharacterId) -> Option<&'static CharacterDescriptor> {
    table().iter().find(|d| &d.id == id)
}
