//! Actor data blocks
//!
//! Every block has a `Default` matching a freshly created character, and every
//! field is `#[serde(default)]`, so a document missing whole blocks still loads
//! with the initial sheet values.

use item_core::Attribute;
use serde::{Deserialize, Serialize};

/// A single attribute score and its derived modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeScore {
    #[serde(default = "default_attribute_value")]
    pub value: i32,
    /// Derived: recomputed from `value` on every derive
    #[serde(rename = "mod", default)]
    pub modifier: i32,
}

fn default_attribute_value() -> i32 {
    10
}

impl Default for AttributeScore {
    fn default() -> Self {
        AttributeScore::new(default_attribute_value())
    }
}

impl AttributeScore {
    pub fn new(value: i32) -> Self {
        AttributeScore { value, modifier: 0 }
    }
}

/// The six attribute scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(rename = "str", default)]
    pub strength: AttributeScore,
    #[serde(rename = "dex", default)]
    pub dexterity: AttributeScore,
    #[serde(rename = "con", default)]
    pub constitution: AttributeScore,
    #[serde(rename = "int", default)]
    pub intelligence: AttributeScore,
    #[serde(rename = "wis", default)]
    pub wisdom: AttributeScore,
    #[serde(rename = "cha", default)]
    pub charisma: AttributeScore,
}

impl Attributes {
    /// Build from raw scores in sheet order: str, dex, con, int, wis, cha
    pub fn from_values(values: [i32; 6]) -> Self {
        let [strength, dexterity, constitution, intelligence, wisdom, charisma] =
            values.map(AttributeScore::new);
        Attributes {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }

    pub fn get(&self, attribute: Attribute) -> &AttributeScore {
        match attribute {
            Attribute::Strength => &self.strength,
            Attribute::Dexterity => &self.dexterity,
            Attribute::Constitution => &self.constitution,
            Attribute::Intelligence => &self.intelligence,
            Attribute::Wisdom => &self.wisdom,
            Attribute::Charisma => &self.charisma,
        }
    }

    pub fn get_mut(&mut self, attribute: Attribute) -> &mut AttributeScore {
        match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Dexterity => &mut self.dexterity,
            Attribute::Constitution => &mut self.constitution,
            Attribute::Intelligence => &mut self.intelligence,
            Attribute::Wisdom => &mut self.wisdom,
            Attribute::Charisma => &mut self.charisma,
        }
    }

    /// Iterate attributes with their scores in sheet order
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &AttributeScore)> + '_ {
        Attribute::all().iter().map(move |attr| (*attr, self.get(*attr)))
    }
}

/// A consumable pool with a derived maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub value: i32,
    #[serde(default)]
    pub min: i32,
    /// Derived: recomputed on every derive
    #[serde(default)]
    pub max: i32,
}

impl Resource {
    pub fn new(value: i32, min: i32, max: i32) -> Self {
        Resource { value, min, max }
    }

    /// Clamp `value` into `[min, max]`.
    ///
    /// When `max` has dropped below `min` the upper bound wins.
    pub fn clamp(&mut self) {
        self.value = self.value.max(self.min).min(self.max);
    }
}

/// Hit points and willpower points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default = "default_hp")]
    pub hp: Resource,
    #[serde(default = "default_wp")]
    pub wp: Resource,
}

fn default_hp() -> Resource {
    Resource::new(10, 0, 10)
}

fn default_wp() -> Resource {
    Resource::new(5, 0, 5)
}

impl Default for Resources {
    fn default() -> Self {
        Resources {
            hp: default_hp(),
            wp: default_wp(),
        }
    }
}

impl Resources {
    pub fn clamp_all(&mut self) {
        self.hp.clamp();
        self.wp.clamp();
    }
}

/// A single derived or authored number on the sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatValue {
    #[serde(default)]
    pub value: i32,
}

impl StatValue {
    pub fn new(value: i32) -> Self {
        StatValue { value }
    }
}

/// Combat numbers: AC and initiative are derived, speed is authored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStats {
    #[serde(default)]
    pub initiative: StatValue,
    #[serde(default = "default_ac")]
    pub ac: StatValue,
    #[serde(default = "default_speed")]
    pub speed: StatValue,
}

fn default_ac() -> StatValue {
    StatValue::new(10)
}

fn default_speed() -> StatValue {
    StatValue::new(30)
}

impl Default for CombatStats {
    fn default() -> Self {
        CombatStats {
            initiative: StatValue::default(),
            ac: default_ac(),
            speed: default_speed(),
        }
    }
}

/// Saving throw target numbers (all derived)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Saves {
    pub dodge: i32,
    pub resistance: i32,
    pub fortitude: i32,
}

/// Character level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    #[serde(default = "default_level")]
    pub value: i32,
}

fn default_level() -> i32 {
    1
}

impl Default for Level {
    fn default() -> Self {
        Level {
            value: default_level(),
        }
    }
}

impl Level {
    pub fn new(value: i32) -> Self {
        Level { value }
    }

    /// Level as used by the formulas: anything below 1 counts as 1
    pub fn effective(&self) -> i32 {
        self.value.max(1)
    }
}
