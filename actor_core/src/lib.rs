//! actor_core - Derived character stats for the tabletop rule set
//!
//! This library provides:
//! - Actor: the character document with its owned items
//! - Stat derivation: attribute modifiers, HP/WP maxima, AC, initiative, saves
//! - Equipment aggregation: armor and shield contributions to AC
//! - Roll data and attack/damage/spell DC formula builders
//! - Rules constants loaded once from TOML
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use actor_core::prelude::*;
//!
//! let mut actor = Actor::new("Aria")
//!     .with_attribute(Attribute::Dexterity, 14)
//!     .with_item(Item::armor("Chain Shirt", Armor::default()));
//! actor.set_equipped("Chain Shirt", true);
//! actor.prepare_data();
//! println!("AC {}", actor.system.combat.ac.value);
//! ```

pub mod actor;
pub mod combat;
pub mod config;
pub mod equipment;
pub mod helpers;
pub mod inventory;
pub mod prelude;
pub mod roll_data;
pub mod stats;
pub mod types;

// Core API
pub use actor::{Actor, ActorSystem};
pub use equipment::ArmorContribution;
pub use inventory::Inventory;
pub use roll_data::RollData;
pub use stats::modifier;
pub use types::{AttributeScore, Attributes, CombatStats, Level, Resource, Resources, Saves, StatValue};

// Helpers
pub use helpers::{calculate_effect_value, format_modifier, EffectModifier, ModifierKind};

// Configuration
pub use config::{constants, init_constants, init_constants_default, ConfigError, RulesConstants};

// Re-export commonly needed item_core types
pub use item_core::{Attribute, Item, ItemKind};
