//! Roster Editor
//!
//! The only place the Active Roster changes. Every successful operation
//! bumps `revision`, which the UI compares each frame to rebuild its rows;
//! a rejected operation leaves both the roster and the revision untouched.

use log::{debug, info};
use rand::Rng;

use super::{builtin, lookup, ActiveRoster, Catalog, CharacterDescriptor, CharacterId, RosterError};

pub struct RosterEditor {
    roster: ActiveRoster,
    catalog: Catalog,
    revision: u64,
}

impl RosterEditor {
    /// Wrap an extracted roster. Catalog entries that are already active are
    /// flagged installed.
    pub fn new(roster: ActiveRoster, catalog: Catalog) -> Self {
        let mut editor = Self {
            roster,
            catalog,
            revision: 0,
        };
        editor.sync_installed_flags();
        editor
    }

    pub fn roster(&self) -> &ActiveRoster {
        &self.roster
    }

    #[cfg(test)]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Incremented once per successful mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Display data for an active or available id
    pub fn describe(&self, id: &CharacterId) -> Option<&CharacterDescriptor> {
        lookup(&self.catalog, id)
    }

    /// Installable characters: built-ins missing from the roster, then
    /// uninstalled catalog entries
    pub fn available(&self) -> Vec<&CharacterDescriptor> {
        builtin::descriptors()
            .iter()
            .filter(|d| !self.roster.contains(&d.id))
            .chain(self.catalog.available().filter(|d| !builtin::is_builtin(&d.id)))
            .collect()
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn sync_installed_flags(&mut self) {
        let active: Vec<CharacterId> = self.roster.ids().to_vec();
        for id in active {
            if let Some(entry) = self.catalog.get_mut(&id) {
                entry.installed = true;
            }
        }
    }

    /// Append a character to the roster
    pub fn install(&mut self, mut descriptor: CharacterDescriptor) -> Result<(), RosterError> {
        if self.roster.contains(&descriptor.id) {
            return Err(RosterError::AlreadyInstalled(descriptor.id));
        }
        let id = descriptor.id.clone();
        if !builtin::is_builtin(&id) {
            descriptor.installed = true;
            self.catalog.upsert(descriptor);
        }
        self.roster.push(id.clone());
        self.touch();
        info!("Installed {} (roster now {})", id, self.roster.len());
        Ok(())
    }

    /// Install by id, resolving the descriptor from the catalog or built-ins
    pub fn install_id(&mut self, id: &CharacterId) -> Result<(), RosterError> {
        if self.roster.contains(id) {
            return Err(RosterError::AlreadyInstalled(id.clone()));
        }
        let descriptor = self
            .describe(id)
            .cloned()
            .ok_or_else(|| RosterError::UnknownCharacter(id.clone()))?;
        self.install(descriptor)
    }

    /// Remove a character. The last remaining entry cannot be removed.
    pub fn remove(&mut self, id: &CharacterId) -> Result<(), RosterError> {
        if self.roster.len() <= 1 {
            return Err(RosterError::CannotRemoveLast);
        }
        let index = self
            .roster
            .position(id)
            .ok_or_else(|| RosterError::NotInRoster(id.clone()))?;
        let removed = self.roster.remove_at(index);

        if !builtin::is_builtin(&removed) {
            match self.catalog.get_mut(&removed) {
                Some(entry) => entry.installed = false,
                None => self.catalog.upsert(CharacterDescriptor::placeholder(removed.clone())),
            }
        }
        self.touch();
        info!("Removed {} (roster now {})", removed, self.roster.len());
        Ok(())
    }

    /// Stable move of one entry; every other entry keeps its relative order
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), RosterError> {
        let len = self.roster.len();
        for index in [from, to] {
            if index >= len {
                return Err(RosterError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }
        let ids = self.roster.ids_mut();
        let id = ids.remove(from);
        ids.insert(to, id);
        self.touch();
        debug!("Moved roster entry {} -> {}", from, to);
        Ok(())
    }

    pub fn move_up(&mut self, index: usize) -> Result<(), RosterError> {
        if index == 0 {
            return self.reorder(0, 0);
        }
        self.reorder(index, index - 1)
    }

    pub fn move_down(&mut self, index: usize) -> Result<(), RosterError> {
        let last = self.roster.len().saturating_sub(1);
        self.reorder(index, (index + 1).min(last.max(index)))
    }

    /// Uniform shuffle of the whole roster (Fisher–Yates)
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        let ids = self.roster.ids_mut();
        for i in (1..ids.len()).rev() {
            let j = rng.gen_range(0..=i);
            ids.swap(i, j);
        }
        self.touch();
    }

    pub fn reverse_order(&mut self) {
        self.roster.ids_mut().reverse();
        self.touch();
    }

    /// Merge descriptors found by a script-directory rescan
    ///
    /// Built-ins are skipped; `installed` follows roster membership.
    pub fn rescan(&mut self, descriptors: Vec<CharacterDescriptor>) -> usize {
        let mut merged = 0;
        for mut descriptor in descriptors {
            if builtin::is_builtin(&descriptor.id) {
                continue;
            }
            descriptor.installed = self.roster.contains(&descriptor.id);
            self.catalog.upsert(descriptor);
            merged += 1;
        }
        if merged > 0 {
            self.touch();
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::tests::ids;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn editor(names: &[&str]) -> RosterEditor {
        RosterEditor::new(ActiveRoster::new(ids(names)).unwrap(), Catalog::new())
    }

    fn id(name: &str) -> CharacterId {
        CharacterId::parse(name).unwrap()
    }

    #[test]
    fn test_produce_aisle_scenario() {
        let mut ed = editor(&["apple", "carrot", "pumpkin"]);

        ed.reorder(0, 2).unwrap();
        assert_eq!(ed.roster().ids(), ids(&["carrot", "pumpkin", "apple"]).as_slice());

        ed.reverse_order();
        assert_eq!(ed.roster().ids(), ids(&["apple", "pumpkin", "carrot"]).as_slice());

        ed.remove(&id("apple")).unwrap();
        ed.remove(&id("pumpkin")).unwrap();
        let revision = ed.revision();
        assert_eq!(ed.remove(&id("carrot")), Err(RosterError::CannotRemoveLast));
        assert_eq!(ed.roster().ids(), ids(&["carrot"]).as_slice());
        assert_eq!(ed.revision(), revision);
    }

    #[test]
    fn test_remove_singleton_never_mutates() {
        let mut ed = editor(&["ghost"]);
        assert_eq!(ed.remove(&id("ghost")), Err(RosterError::CannotRemoveLast));
        // Checked before membership
        assert_eq!(ed.remove(&id("robot")), Err(RosterError::CannotRemoveLast));
        assert_eq!(ed.roster().ids(), ids(&["ghost"]).as_slice());
        assert_eq!(ed.revision(), 0);
    }

    #[test]
    fn test_install_rejects_duplicate() {
        let mut ed = editor(&["ghost", "robot"]);
        let result = ed.install(CharacterDescriptor::placeholder(id("ghost")));
        assert_eq!(result, Err(RosterError::AlreadyInstalled(id("ghost"))));
        assert_eq!(ed.roster().len(), 2);
        assert_eq!(ed.revision(), 0);
    }

    #[test]
    fn test_install_and_remove_flip_catalog_flag() {
        let ufo = CharacterDescriptor::placeholder(id("ufo"));
        let mut ed = RosterEditor::new(
            ActiveRoster::new(ids(&["ghost"])).unwrap(),
            Catalog::from_descriptors(vec![ufo]),
        );
        assert_eq!(ed.catalog().available().count(), 1);

        ed.install_id(&id("ufo")).unwrap();
        assert_eq!(ed.roster().ids(), ids(&["ghost", "ufo"]).as_slice());
        assert!(ed.catalog().get(&id("ufo")).unwrap().installed);
        assert_eq!(ed.catalog().available().count(), 0);

        ed.remove(&id("ufo")).unwrap();
        assert!(!ed.catalog().get(&id("ufo")).unwrap().installed);
    }

    #[test]
    fn test_remove_builtin_does_not_readd_descriptor() {
        let mut ed = editor(&["ghost", "robot"]);
        ed.remove(&id("robot")).unwrap();
        assert!(ed.catalog().get(&id("robot")).is_none());
    }

    #[test]
    fn test_remove_unknown_custom_readds_placeholder() {
        let mut ed = editor(&["ghost", "apple"]);
        ed.remove(&id("apple")).unwrap();
        let entry = ed.catalog().get(&id("apple")).unwrap();
        assert!(!entry.installed);
        assert_eq!(entry.display_name, "Apple");
    }

    #[test]
    fn test_install_unknown_id() {
        let mut ed = editor(&["ghost"]);
        assert_eq!(ed.install_id(&id("zebra")), Err(RosterError::UnknownCharacter(id("zebra"))));
        // Built-ins resolve without a catalog entry
        ed.install_id(&id("dragon")).unwrap();
        assert!(ed.catalog().get(&id("dragon")).is_none());
    }

    #[test]
    fn test_reorder_bounds_and_noop() {
        let mut ed = editor(&["a", "b", "c"]);
        assert_eq!(ed.reorder(0, 3), Err(RosterError::IndexOutOfRange { index: 3, len: 3 }));
        ed.reorder(1, 1).unwrap();
        assert_eq!(ed.revision(), 0);
    }

    #[test]
    fn test_reorder_sequence_is_permutation() {
        let names = ["a", "b", "c", "d", "e", "f"];
        let mut ed = editor(&names);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let from = rng.gen_range(0..names.len());
            let to = rng.gen_range(0..names.len());
            ed.reorder(from, to).unwrap();
        }
        let mut sorted: Vec<CharacterId> = ed.roster().ids().to_vec();
        sorted.sort();
        assert_eq!(sorted, ids(&names));
    }

    #[test]
    fn test_move_up_down_edges() {
        let mut ed = editor(&["a", "b", "c"]);
        ed.move_up(0).unwrap();
        ed.move_down(2).unwrap();
        assert_eq!(ed.roster().ids(), ids(&["a", "b", "c"]).as_slice());
        ed.move_down(0).unwrap();
        assert_eq!(ed.roster().ids(), ids(&["b", "a", "c"]).as_slice());
        ed.move_up(2).unwrap();
        assert_eq!(ed.roster().ids(), ids(&["b", "c", "a"]).as_slice());
    }

    #[test]
    fn test_randomize_is_permutation() {
        let names = ["a", "b", "c", "d", "e", "f", "g"];
        let mut ed = editor(&names);
        let mut rng = StdRng::seed_from_u64(42);
        ed.randomize(&mut rng);
        let mut sorted: Vec<CharacterId> = ed.roster().ids().to_vec();
        sorted.sort();
        assert_eq!(sorted, ids(&names));
        assert_eq!(ed.revision(), 1);
    }

    #[test]
    fn test_randomize_covers_every_position() {
        // Each id should land first at least once over many seeds
        let names = ["a", "b", "c"];
        let mut firsts = std::collections::HashSet::new();
        for seed in 0..64 {
            let mut ed = editor(&names);
            ed.randomize(&mut StdRng::seed_from_u64(seed));
            firsts.insert(ed.roster().ids()[0].clone());
        }
        assert_eq!(firsts.len(), 3);
    }

    #[test]
    fn test_rescan_skips_builtins() {
        let mut ed = editor(&["ghost", "apple"]);
        let merged = ed.rescan(vec![
            CharacterDescriptor::placeholder(id("ghost")),
            CharacterDescriptor::placeholder(id("apple")),
            CharacterDescriptor::placeholder(id("ufo")),
        ]);
        assert_eq!(merged, 2);
        assert!(ed.catalog().get(&id("apple")).unwrap().installed);
        assert!(!ed.catalog().get(&id("ufo")).unwrap().installed);
        assert!(ed.catalog().get(&id("ghost")).is_none());
    }

    #[test]
    fn test_available_lists_missing_builtins_then_catalog() {
        let mut ed = RosterEditor::new(
            ActiveRoster::new(ids(&["happyface", "ghost"])).unwrap(),
            Catalog::from_descriptors(vec![CharacterDescriptor::placeholder(id("ufo"))]),
        );
        let names: Vec<&str> = ed.available().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(names.first(), Some(&"robot"));
        assert_eq!(names.last(), Some(&"ufo"));
        assert!(!names.contains(&"ghost"));

        ed.install_id(&id("ufo")).unwrap();
        assert!(!ed.available().iter().any(|d| d.id.as_str() == "ufo"));
    }
}
