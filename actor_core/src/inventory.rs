//! Grouping of an actor's items into sheet sections

use item_core::{Item, ItemKind};

/// An actor's items by section, each in stored order
#[derive(Debug, Clone, Default)]
pub struct Inventory<'a> {
    pub weapons: Vec<&'a Item>,
    pub armor: Vec<&'a Item>,
    pub gear: Vec<&'a Item>,
    pub abilities: Vec<&'a Item>,
    pub spells: Vec<&'a Item>,
}

impl<'a> Inventory<'a> {
    pub fn from_items(items: &'a [Item]) -> Self {
        let mut inventory = Inventory::default();
        for item in items {
            let section = match item.kind {
                ItemKind::Weapon(_) => &mut inventory.weapons,
                ItemKind::Armor(_) => &mut inventory.armor,
                ItemKind::Gear(_) => &mut inventory.gear,
                ItemKind::Ability(_) => &mut inventory.abilities,
                ItemKind::Spell(_) => &mut inventory.spells,
            };
            section.push(item);
        }
        inventory
    }

    /// Items that are currently equipped, across all sections
    pub fn equipped(&self) -> impl Iterator<Item = &'a Item> + '_ {
        self.weapons
            .iter()
            .chain(self.armor.iter())
            .copied()
            .filter(|item| item.is_equipped())
    }
}
