//! item_core - Item documents and rule tables for the tabletop rule set
//!
//! This library provides:
//! - Rule tables: attributes, damage types, weapon/armor/ability/magic taxonomies
//! - Item: the polymorphic item document (weapon, armor, spell, ability, gear)
//! - Item preparation: type-specific defaults and always-derived fields
//! - Roll formula validation

pub mod formula;
pub mod item;
pub mod types;

pub use formula::{validate_formula, Formula, FormulaError};
pub use item::{
    Ability, Armor, AttackBonus, Components, Damage, Gear, Item, ItemKind, Range, Spell, SpellSave,
    Weapon,
};
pub use types::{
    AbilityType, ArmorType, AttackType, Attribute, DamageType, MagicSchool, MagicSource,
    WeaponProperty, WeaponType,
};
