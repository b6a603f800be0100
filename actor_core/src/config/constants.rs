//! Rule constants configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use super::ConfigError;

/// Global rule constants instance
static RULES_CONSTANTS: OnceLock<RulesConstants> = OnceLock::new();

/// Initialize the global rule constants from a TOML file
///
/// Call once at startup, before the first derive. Returns error if already
/// initialized or if loading fails.
pub fn init_constants(path: &Path) -> Result<(), ConfigError> {
    let constants = RulesConstants::load_from_path(path)?;
    RULES_CONSTANTS
        .set(constants)
        .map_err(|_| ConfigError::ValidationError("RulesConstants already initialized".to_string()))
}

/// Initialize the global rule constants with default values
pub fn init_constants_default() -> Result<(), ConfigError> {
    RULES_CONSTANTS
        .set(RulesConstants::default())
        .map_err(|_| ConfigError::ValidationError("RulesConstants already initialized".to_string()))
}

/// Get a reference to the global rule constants
///
/// Falls back to the default rules if nothing was initialized, which then
/// stay fixed for the rest of the process.
pub fn constants() -> &'static RulesConstants {
    RULES_CONSTANTS.get_or_init(RulesConstants::default)
}

/// Check if constants have been initialized
pub fn constants_initialized() -> bool {
    RULES_CONSTANTS.get().is_some()
}

/// Ensure constants are initialized with defaults (idempotent, useful for tests)
pub fn ensure_constants_initialized() {
    RULES_CONSTANTS.get_or_init(RulesConstants::default);
}

/// Tunable rule constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConstants {
    #[serde(default)]
    pub armor_class: ArmorClassConstants,
    #[serde(default)]
    pub saves: SaveConstants,
    #[serde(default)]
    pub spells: SpellConstants,
    #[serde(default)]
    pub resources: ResourceConstants,
    #[serde(default)]
    pub rolls: RollConstants,
}

impl RulesConstants {
    /// Load constants from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        super::load_toml(path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmorClassConstants {
    /// AC of an unarmored character with a +0 dexterity modifier
    #[serde(default = "default_ac_base")]
    pub base: i32,
}

impl Default for ArmorClassConstants {
    fn default() -> Self {
        ArmorClassConstants {
            base: default_ac_base(),
        }
    }
}

fn default_ac_base() -> i32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveConstants {
    /// Save target = base + attribute modifier
    #[serde(default = "default_save_base")]
    pub base: i32,
}

impl Default for SaveConstants {
    fn default() -> Self {
        SaveConstants {
            base: default_save_base(),
        }
    }
}

fn default_save_base() -> i32 {
    8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellConstants {
    /// Spell save DC = dc_base + best casting modifier
    #[serde(default = "default_save_base")]
    pub dc_base: i32,
}

impl Default for SpellConstants {
    fn default() -> Self {
        SpellConstants {
            dc_base: default_save_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConstants {
    /// HP max = con_factor * con + con mod * level
    #[serde(default = "default_hp_con_factor")]
    pub hp_con_factor: i32,
}

impl Default for ResourceConstants {
    fn default() -> Self {
        ResourceConstants {
            hp_con_factor: default_hp_con_factor(),
        }
    }
}

fn default_hp_con_factor() -> i32 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollConstants {
    /// Die rolled for attacks
    #[serde(default = "default_attack_die")]
    pub attack_die: String,
    /// Formula handed to the host's combat tracker
    #[serde(default = "default_initiative_formula")]
    pub initiative_formula: String,
}

impl Default for RollConstants {
    fn default() -> Self {
        RollConstants {
            attack_die: default_attack_die(),
            initiative_formula: default_initiative_formula(),
        }
    }
}

fn default_attack_die() -> String {
    "1d20".to_string()
}

fn default_initiative_formula() -> String {
    "1d20 + @attributes.dex.mod".to_string()
}
