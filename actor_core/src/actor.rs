//! Actor - a character sheet document and its derive pass
//!
//! Derivation is explicit: mutators only change data, and the caller runs
//! [`Actor::prepare_data`] afterwards to bring derived numbers up to date.

use crate::combat;
use crate::equipment::ArmorContribution;
use crate::inventory::Inventory;
use crate::roll_data::RollData;
use crate::stats;
use crate::types::{AttributeScore, Attributes, CombatStats, Level, Resources, Saves};
use item_core::{Attribute, Item};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The actor's `system` block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorSystem {
    pub attributes: Attributes,
    pub resources: Resources,
    pub combat: CombatStats,
    pub saves: Saves,
    pub level: Level,
}

/// A character with its owned items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    #[serde(default)]
    pub system: ActorSystem,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Actor {
            name: name.into(),
            system: ActorSystem::default(),
            items: Vec::new(),
        }
    }

    /// Builder: set an attribute's raw score
    pub fn with_attribute(mut self, attribute: Attribute, value: i32) -> Self {
        self.system.attributes.get_mut(attribute).value = value;
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.system.level = Level::new(level);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Full derive: prepare every owned item, then recompute the actor's
    /// derived numbers. Safe to call repeatedly.
    pub fn prepare_data(&mut self) {
        for item in &mut self.items {
            item.prepare();
        }
        self.prepare_derived_data();
    }

    /// Recompute modifiers, resource maxima, AC, initiative and saves from
    /// the current attributes and equipped armor. Items are taken as already
    /// prepared.
    pub fn prepare_derived_data(&mut self) {
        stats::derive_modifiers(&mut self.system.attributes);

        let armor = ArmorContribution::from_items(&self.items);
        let system = &mut self.system;
        stats::derive_stats(
            &system.attributes,
            &system.level,
            &armor,
            &mut system.resources,
            &mut system.combat,
            &mut system.saves,
        );

        debug!(
            actor = %self.name,
            hp_max = system.resources.hp.max,
            wp_max = system.resources.wp.max,
            ac = system.combat.ac.value,
            initiative = system.combat.initiative.value,
            armor_bonus = armor.armor_bonus,
            "derived actor stats"
        );
    }

    pub fn attribute(&self, attribute: Attribute) -> &AttributeScore {
        self.system.attributes.get(attribute)
    }

    // === Items ===

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Remove the first item called `name`
    pub fn remove_item(&mut self, name: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.name == name)?;
        Some(self.items.remove(index))
    }

    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn item_mut(&mut self, name: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.name == name)
    }

    /// Set the equipped flag on the named item. Returns false when there is no
    /// such item or it cannot be equipped.
    pub fn set_equipped(&mut self, name: &str, equipped: bool) -> bool {
        self.item_mut(name)
            .is_some_and(|item| item.set_equipped(equipped))
    }

    /// Flip the equipped flag on the named item, returning the new state
    pub fn toggle_equipped(&mut self, name: &str) -> Option<bool> {
        let item = self.item_mut(name)?;
        let equipped = !item.is_equipped();
        item.set_equipped(equipped).then_some(equipped)
    }

    pub fn inventory(&self) -> Inventory<'_> {
        Inventory::from_items(&self.items)
    }

    // === Rolls ===

    /// Every `@`-path a formula may reference on this actor
    pub fn roll_data(&self) -> RollData {
        let system = &self.system;
        let mut data = RollData::new();

        for (attr, score) in system.attributes.iter() {
            let key = attr.key();
            data.insert(format!("attributes.{}.value", key), score.value);
            data.insert(format!("attributes.{}.mod", key), score.modifier);
            data.insert(key, score.value);
            data.insert(format!("{}_mod", key), score.modifier);
        }

        data.insert("level.value", system.level.value);
        data.insert("lvl", system.level.value);

        for (key, resource) in [("hp", &system.resources.hp), ("wp", &system.resources.wp)] {
            data.insert(format!("resources.{}.value", key), resource.value);
            data.insert(format!("resources.{}.min", key), resource.min);
            data.insert(format!("resources.{}.max", key), resource.max);
        }

        data.insert("combat.ac.value", system.combat.ac.value);
        data.insert("combat.initiative.value", system.combat.initiative.value);
        data.insert("combat.speed.value", system.combat.speed.value);

        data.insert("saves.dodge", system.saves.dodge);
        data.insert("saves.resistance", system.saves.resistance);
        data.insert("saves.fortitude", system.saves.fortitude);

        data
    }

    /// Initiative roll with this actor's numbers substituted in
    pub fn initiative_formula(&self) -> String {
        self.roll_data()
            .substitute(&crate::config::constants().rolls.initiative_formula)
    }

    /// Attack roll formula for the named weapon
    pub fn attack_formula(&self, name: &str) -> Option<String> {
        let weapon = self.item(name)?.as_weapon()?;
        Some(combat::weapon_attack_formula(&self.system.attributes, weapon))
    }

    /// Damage roll formula for the named weapon
    pub fn damage_formula(&self, name: &str) -> Option<String> {
        let weapon = self.item(name)?.as_weapon()?;
        Some(combat::weapon_damage_formula(&self.system.attributes, weapon))
    }

    /// Save DC of an owned spell
    pub fn spell_save_dc(&self, name: &str) -> Option<i32> {
        combat::spell_save_dc(self.item(name)?, Some(&self.system.attributes))
    }
}
