//! Prelude module for convenient imports
//!
//! ```rust
//! use actor_core::prelude::*;
//! ```

// Core types
pub use crate::actor::{Actor, ActorSystem};
pub use crate::types::{Attributes, Level, Resource, Resources};

// Derivation
pub use crate::equipment::ArmorContribution;
pub use crate::stats::modifier;

// Rolls
pub use crate::roll_data::RollData;

// Config
pub use crate::config::{init_constants, init_constants_default};

// Items
pub use item_core::{Ability, Armor, ArmorType, Attribute, Item, ItemKind, Spell, Weapon};
