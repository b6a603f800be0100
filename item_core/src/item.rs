use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{trace, warn};

/// Weapons reaching further than this many feet attack at range
pub const MELEE_REACH: i32 = 5;

/// Willpower cost given to spells and abilities that do not state one
pub const DEFAULT_WP_COST: i32 = 1;

/// An item document: a name plus the type-specific `system` payload
///
/// Serialized the way the host stores it: `{ "name", "type", "system" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(flatten)]
    pub kind: ItemKind,
}

/// Type-specific item data, tagged by the document's `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "system", rename_all = "snake_case")]
pub enum ItemKind {
    Weapon(Weapon),
    Armor(Armor),
    Spell(Spell),
    Ability(Ability),
    Gear(Gear),
}

impl ItemKind {
    /// The document type key (`weapon`, `armor`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            ItemKind::Weapon(_) => "weapon",
            ItemKind::Armor(_) => "armor",
            ItemKind::Spell(_) => "spell",
            ItemKind::Ability(_) => "ability",
            ItemKind::Gear(_) => "gear",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Weapon(_) => write!(f, "Weapon"),
            ItemKind::Armor(_) => write!(f, "Armor"),
            ItemKind::Spell(_) => write!(f, "Spell"),
            ItemKind::Ability(_) => write!(f, "Ability"),
            ItemKind::Gear(_) => write!(f, "Gear"),
        }
    }
}

/// Weapon payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon_type: Option<WeaponType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon_properties: Option<BTreeSet<WeaponProperty>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<Damage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_bonus: Option<AttackBonus>,
    #[serde(default)]
    pub equipped: bool,
}

/// Armor payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Armor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_type: Option<ArmorType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_bonus: Option<i32>,
    /// Derived from `armor_type` on every prepare; `None` is "no cap"
    #[serde(default)]
    pub dex_limit: Option<i32>,
    #[serde(default)]
    pub equipped: bool,
}

/// Spell payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<MagicSchool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wp_cost: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<Damage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casting_time: Option<String>,
    /// Carried through as authored; the live DC depends on the caster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save: Option<SpellSave>,
}

/// Saving throw block of a spell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellSave {
    pub dc: i32,
}

/// Ability (feat/technique) payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability_type: Option<AbilityType>,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wp_cost: Option<i32>,
}

/// Mundane equipment; carries no derived data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gear {}

/// A damage roll and its type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Damage {
    pub formula: String,
    #[serde(rename = "type")]
    pub damage_type: DamageType,
}

impl Default for Damage {
    fn default() -> Self {
        Damage {
            formula: "1d6".to_string(),
            damage_type: DamageType::Slashing,
        }
    }
}

/// Reach or range in `units`; `max` is the long range for weapons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    #[serde(default)]
    pub value: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
    #[serde(default = "default_units")]
    pub units: String,
}

fn default_units() -> String {
    "ft".to_string()
}

impl Range {
    pub fn new(value: i32, max: Option<i32>) -> Self {
        Range {
            value,
            max,
            units: default_units(),
        }
    }

    /// Default reach of a freshly created weapon
    pub fn weapon_default() -> Self {
        Range::new(MELEE_REACH, Some(MELEE_REACH))
    }

    /// Default range of a freshly created spell
    pub fn spell_default() -> Self {
        Range::new(30, None)
    }

    /// Whether attacks at this range are ranged attacks (long range past melee reach)
    pub fn is_ranged(&self) -> bool {
        self.max.is_some_and(|max| max > MELEE_REACH)
    }
}

/// How a weapon's attack roll is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackBonus {
    /// Roll-data formula for the attribute part of the bonus
    pub formula: String,
    #[serde(rename = "type")]
    pub attack_type: AttackType,
    pub attribute: Attribute,
    /// Flat bonus authored on the weapon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
}

impl Default for AttackBonus {
    fn default() -> Self {
        AttackBonus::for_attack_type(AttackType::Melee)
    }
}

impl AttackBonus {
    pub fn for_attack_type(attack_type: AttackType) -> Self {
        let attribute = attack_type.attribute();
        AttackBonus {
            formula: attribute.mod_formula(),
            attack_type,
            attribute,
            value: None,
        }
    }

    /// Point type, attribute and formula at `attack_type`, keeping the flat bonus
    fn retarget(&mut self, attack_type: AttackType) {
        let attribute = attack_type.attribute();
        self.attack_type = attack_type;
        self.attribute = attribute;
        self.formula = attribute.mod_formula();
    }
}

/// Spell components
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Components {
    pub verbal: bool,
    pub somatic: bool,
    pub material: bool,
    pub material_description: String,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Item {
            name: name.into(),
            kind,
        }
    }

    pub fn weapon(name: impl Into<String>, weapon: Weapon) -> Self {
        Item::new(name, ItemKind::Weapon(weapon))
    }

    pub fn armor(name: impl Into<String>, armor: Armor) -> Self {
        Item::new(name, ItemKind::Armor(armor))
    }

    pub fn spell(name: impl Into<String>, spell: Spell) -> Self {
        Item::new(name, ItemKind::Spell(spell))
    }

    pub fn ability(name: impl Into<String>, ability: Ability) -> Self {
        Item::new(name, ItemKind::Ability(ability))
    }

    pub fn gear(name: impl Into<String>) -> Self {
        Item::new(name, ItemKind::Gear(Gear::default()))
    }

    pub fn as_weapon(&self) -> Option<&Weapon> {
        match &self.kind {
            ItemKind::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }

    pub fn as_armor(&self) -> Option<&Armor> {
        match &self.kind {
            ItemKind::Armor(armor) => Some(armor),
            _ => None,
        }
    }

    pub fn as_spell(&self) -> Option<&Spell> {
        match &self.kind {
            ItemKind::Spell(spell) => Some(spell),
            _ => None,
        }
    }

    /// Whether the item is currently equipped (only weapons and armor can be)
    pub fn is_equipped(&self) -> bool {
        match &self.kind {
            ItemKind::Weapon(weapon) => weapon.equipped,
            ItemKind::Armor(armor) => armor.equipped,
            _ => false,
        }
    }

    /// Set the equipped flag. Returns false for item types that cannot be equipped.
    pub fn set_equipped(&mut self, equipped: bool) -> bool {
        match &mut self.kind {
            ItemKind::Weapon(weapon) => {
                weapon.equipped = equipped;
                true
            }
            ItemKind::Armor(armor) => {
                armor.equipped = equipped;
                true
            }
            _ => false,
        }
    }

    /// Fill in type-specific defaults and recompute derived fields in place.
    ///
    /// Authored fields are only filled when absent, except the weapon's attack
    /// type/attribute/formula (always follows range) and the armor's dex limit
    /// (always follows armor type). Running this twice changes nothing.
    pub fn prepare(&mut self) {
        trace!(item = %self.name, kind = self.kind.key(), "preparing item");
        let damage = match &self.kind {
            ItemKind::Weapon(weapon) => weapon.damage.as_ref(),
            ItemKind::Spell(spell) => spell.damage.as_ref(),
            _ => None,
        };
        if let Some(DamageType::Other(key)) = damage.map(|d| &d.damage_type) {
            warn!(item = %self.name, damage_type = %key, "unrecognized damage type");
        }

        match &mut self.kind {
            ItemKind::Weapon(weapon) => weapon.prepare(),
            ItemKind::Armor(armor) => {
                if let Some(ArmorType::Other(key)) = &armor.armor_type {
                    if !key.trim().is_empty() {
                        warn!(item = %self.name, armor_type = %key, "unrecognized armor type, dex is uncapped");
                    }
                }
                armor.prepare()
            }
            ItemKind::Spell(spell) => spell.prepare(),
            ItemKind::Ability(ability) => ability.prepare(),
            ItemKind::Gear(_) => {}
        }
    }
}

impl Weapon {
    fn prepare(&mut self) {
        self.weapon_properties.get_or_insert_with(BTreeSet::new);
        self.damage.get_or_insert_with(Damage::default);
        let range = self.range.get_or_insert_with(Range::weapon_default);

        // Range decides the attack stat, even over an authored attack bonus
        let attack_type = if range.is_ranged() {
            AttackType::Ranged
        } else {
            AttackType::Melee
        };
        self.attack_bonus
            .get_or_insert_with(AttackBonus::default)
            .retarget(attack_type);
    }

    pub fn attack_type(&self) -> AttackType {
        self.attack_bonus
            .as_ref()
            .map(|bonus| bonus.attack_type)
            .unwrap_or_default()
    }

    pub fn has_property(&self, property: WeaponProperty) -> bool {
        self.weapon_properties
            .as_ref()
            .is_some_and(|props| props.contains(&property))
    }
}

impl Armor {
    fn prepare(&mut self) {
        if self.armor_type.as_ref().map_or(true, ArmorType::is_blank) {
            self.armor_type = Some(ArmorType::Light);
        }
        // Zero is a real bonus, only a missing one is defaulted
        self.armor_bonus.get_or_insert(1);
        self.dex_limit = self.armor_type.as_ref().and_then(ArmorType::dex_limit);
    }

    pub fn is_shield(&self) -> bool {
        self.armor_type == Some(ArmorType::Shield)
    }
}

impl Spell {
    fn prepare(&mut self) {
        self.level.get_or_insert(1);
        self.range.get_or_insert_with(Range::spell_default);
        self.components.get_or_insert_with(Components::default);
        self.wp_cost.get_or_insert(DEFAULT_WP_COST);
    }
}

impl Ability {
    fn prepare(&mut self) {
        self.wp_cost.get_or_insert(DEFAULT_WP_COST);
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "══ {} ══", self.name)?;
        write!(f, "{}", self.kind)?;

        match &self.kind {
            ItemKind::Weapon(weapon) => {
                if let Some(ref damage) = weapon.damage {
                    write!(f, "\n  Damage: {} {}", damage.formula, damage.damage_type)?;
                }
                if let Some(ref range) = weapon.range {
                    match range.max {
                        Some(max) => write!(f, "\n  Range: {}/{} {}", range.value, max, range.units)?,
                        None => write!(f, "\n  Range: {} {}", range.value, range.units)?,
                    }
                }
                if let Some(ref bonus) = weapon.attack_bonus {
                    write!(f, "\n  Attack: {} ({})", bonus.attack_type, bonus.attribute)?;
                }
            }
            ItemKind::Armor(armor) => {
                if let Some(ref armor_type) = armor.armor_type {
                    write!(f, "\n  {}", armor_type)?;
                }
                write!(f, "\n  Armor Bonus: +{}", armor.armor_bonus.unwrap_or(0))?;
                if let Some(limit) = armor.dex_limit {
                    write!(f, "\n  Max Dex Bonus: {}", limit)?;
                }
            }
            ItemKind::Spell(spell) => {
                write!(f, "\n  Level {}", spell.level.unwrap_or(1))?;
                if let Some(school) = spell.school {
                    write!(f, " {}", school)?;
                }
                write!(f, "\n  WP Cost: {}", spell.wp_cost.unwrap_or(DEFAULT_WP_COST))?;
            }
            ItemKind::Ability(ability) => {
                if let Some(ability_type) = ability.ability_type {
                    write!(f, "\n  {}", ability_type)?;
                }
                write!(f, "\n  WP Cost: {}", ability.wp_cost.unwrap_or(DEFAULT_WP_COST))?;
            }
            ItemKind::Gear(_) => {}
        }

        if self.is_equipped() {
            write!(f, "\n  (equipped)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepared(mut item: Item) -> Item {
        item.prepare();
        item
    }

    #[test]
    fn test_weapon_defaults() {
        let item = prepared(Item::weapon("Club", Weapon::default()));
        let weapon = item.as_weapon().unwrap();

        assert_eq!(weapon.weapon_properties, Some(BTreeSet::new()));
        assert_eq!(weapon.damage, Some(Damage::default()));
        assert_eq!(weapon.range, Some(Range::new(5, Some(5))));

        let bonus = weapon.attack_bonus.as_ref().unwrap();
        assert_eq!(bonus.attack_type, AttackType::Melee);
        assert_eq!(bonus.attribute, Attribute::Strength);
        assert_eq!(bonus.formula, "@attributes.str.mod");
    }

    #[test]
    fn test_long_range_forces_dexterity() {
        let weapon = Weapon {
            range: Some(Range::new(30, Some(30))),
            attack_bonus: Some(AttackBonus {
                formula: "@attributes.str.mod".to_string(),
                attack_type: AttackType::Melee,
                attribute: Attribute::Strength,
                value: Some(2),
            }),
            ..Default::default()
        };
        let item = prepared(Item::weapon("Longbow", weapon));
        let bonus = item.as_weapon().unwrap().attack_bonus.as_ref().unwrap();

        assert_eq!(bonus.attribute, Attribute::Dexterity);
        assert_eq!(bonus.attack_type, AttackType::Ranged);
        assert_eq!(bonus.formula, "@attributes.dex.mod");
        // the authored flat bonus survives
        assert_eq!(bonus.value, Some(2));
    }

    #[test]
    fn test_short_range_forces_strength() {
        let weapon = Weapon {
            range: Some(Range::new(5, Some(5))),
            attack_bonus: Some(AttackBonus::for_attack_type(AttackType::Ranged)),
            ..Default::default()
        };
        let item = prepared(Item::weapon("Dagger", weapon));
        assert_eq!(item.as_weapon().unwrap().attack_type(), AttackType::Melee);
    }

    #[test]
    fn test_range_without_max_is_melee() {
        let weapon = Weapon {
            range: Some(Range::new(60, None)),
            ..Default::default()
        };
        let item = prepared(Item::weapon("Odd", weapon));
        assert_eq!(item.as_weapon().unwrap().attack_type(), AttackType::Melee);
    }

    #[test]
    fn test_weapon_keeps_authored_fields() {
        let weapon = Weapon {
            damage: Some(Damage {
                formula: "1d8".to_string(),
                damage_type: DamageType::Piercing,
            }),
            weapon_properties: Some([WeaponProperty::Finesse].into_iter().collect()),
            ..Default::default()
        };
        let item = prepared(Item::weapon("Rapier", weapon));
        let weapon = item.as_weapon().unwrap();
        assert_eq!(weapon.damage.as_ref().unwrap().formula, "1d8");
        assert!(weapon.has_property(WeaponProperty::Finesse));
    }

    #[test]
    fn test_armor_defaults() {
        let item = prepared(Item::armor("Padded", Armor::default()));
        let armor = item.as_armor().unwrap();
        assert_eq!(armor.armor_type, Some(ArmorType::Light));
        assert_eq!(armor.armor_bonus, Some(1));
        assert_eq!(armor.dex_limit, None);
    }

    #[test]
    fn test_zero_armor_bonus_is_kept() {
        let armor = Armor {
            armor_type: Some(ArmorType::Medium),
            armor_bonus: Some(0),
            ..Default::default()
        };
        let item = prepared(Item::armor("Rags", armor));
        let armor = item.as_armor().unwrap();
        assert_eq!(armor.armor_bonus, Some(0));
        assert_eq!(armor.dex_limit, Some(2));
    }

    #[test]
    fn test_dex_limit_follows_armor_type() {
        let mut item = prepared(Item::armor(
            "Plate",
            Armor {
                armor_type: Some(ArmorType::Heavy),
                armor_bonus: Some(6),
                ..Default::default()
            },
        ));
        assert_eq!(item.as_armor().unwrap().dex_limit, Some(0));

        // switching to an unknown type must not leave the heavy cap behind
        if let ItemKind::Armor(ref mut armor) = item.kind {
            armor.armor_type = Some(ArmorType::from("mithral"));
        }
        item.prepare();
        assert_eq!(item.as_armor().unwrap().dex_limit, None);
    }

    #[test]
    fn test_blank_armor_type_defaults_to_light() {
        let armor = Armor {
            armor_type: Some(ArmorType::from("")),
            ..Default::default()
        };
        let item = prepared(Item::armor("Vest", armor));
        assert_eq!(item.as_armor().unwrap().armor_type, Some(ArmorType::Light));
    }

    #[test]
    fn test_spell_defaults_are_independent() {
        let spell = Spell {
            level: Some(3),
            wp_cost: Some(0),
            ..Default::default()
        };
        let item = prepared(Item::spell("Fireball", spell));
        let spell = item.as_spell().unwrap();
        assert_eq!(spell.save, None);
        assert_eq!(spell.level, Some(3));
        assert_eq!(spell.wp_cost, Some(0));
        assert_eq!(spell.range, Some(Range::new(30, None)));
        assert_eq!(spell.components, Some(Components::default()));
    }

    #[test]
    fn test_ability_default_wp_cost() {
        let item = prepared(Item::ability("Second Wind", Ability::default()));
        match item.kind {
            ItemKind::Ability(ref ability) => assert_eq!(ability.wp_cost, Some(1)),
            _ => panic!("expected ability"),
        }
    }

    #[test]
    fn test_gear_is_untouched() {
        let item = Item::gear("Rope");
        assert_eq!(prepared(item.clone()), item);
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let items = vec![
            Item::weapon("Bow", Weapon {
                range: Some(Range::new(80, Some(320))),
                ..Default::default()
            }),
            Item::armor("Chain", Armor {
                armor_type: Some(ArmorType::Medium),
                ..Default::default()
            }),
            Item::spell("Light", Spell::default()),
            Item::ability("Dash", Ability::default()),
            Item::gear("Torch"),
        ];

        for item in items {
            let once = prepared(item);
            let twice = prepared(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_equip_toggle() {
        let mut sword = Item::weapon("Sword", Weapon::default());
        assert!(!sword.is_equipped());
        assert!(sword.set_equipped(true));
        assert!(sword.is_equipped());

        let mut rope = Item::gear("Rope");
        assert!(!rope.set_equipped(true));
        assert!(!rope.is_equipped());
    }

    #[test]
    fn test_document_shape() {
        let json = r#"{
            "name": "Longbow",
            "type": "weapon",
            "system": {
                "weaponType": "bow",
                "weaponProperties": ["ammunition", "twoHanded"],
                "damage": { "formula": "1d8", "type": "piercing" },
                "range": { "value": 150, "max": 600, "units": "ft" },
                "attackBonus": { "attribute": "str", "value": 1 },
                "equipped": true
            }
        }"#;

        let mut item: Item = serde_json::from_str(json).unwrap();
        item.prepare();

        let weapon = item.as_weapon().unwrap();
        assert_eq!(weapon.weapon_type, Some(WeaponType::Bow));
        assert!(weapon.has_property(WeaponProperty::TwoHanded));
        assert!(weapon.equipped);
        assert_eq!(weapon.attack_type(), AttackType::Ranged);

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "weapon");
        assert_eq!(value["system"]["attackBonus"]["attribute"], "dex");
        assert_eq!(value["system"]["attackBonus"]["type"], "ranged");
        assert_eq!(value["system"]["attackBonus"]["value"], 1);
    }

    #[test]
    fn test_unknown_damage_type_still_loads() {
        let json = r#"{
            "name": "Thunder Maul",
            "type": "weapon",
            "system": { "damage": { "formula": "2d6", "type": "thunder" } }
        }"#;

        let mut item: Item = serde_json::from_str(json).unwrap();
        item.prepare();

        let damage = item.as_weapon().unwrap().damage.as_ref().unwrap();
        assert_eq!(damage.damage_type, DamageType::Other("thunder".to_string()));
        assert_eq!(serde_json::to_value(&item).unwrap()["system"]["damage"]["type"], "thunder");
    }

    #[test]
    fn test_armor_document_from_toml() {
        let toml = r#"
name = "Tower Shield"
type = "armor"

[system]
armorType = "shield"
armorBonus = 2
equipped = true
"#;
        let mut item: Item = toml::from_str(toml).unwrap();
        item.prepare();

        let armor = item.as_armor().unwrap();
        assert!(armor.is_shield());
        assert_eq!(armor.armor_bonus, Some(2));
        assert_eq!(armor.dex_limit, None);
    }

    #[test]
    fn test_display() {
        let item = prepared(Item::armor("Breastplate", Armor {
            armor_type: Some(ArmorType::Medium),
            armor_bonus: Some(4),
            equipped: true,
            ..Default::default()
        }));
        let text = item.to_string();
        assert!(text.contains("Breastplate"));
        assert!(text.contains("Medium Armor"));
        assert!(text.contains("Max Dex Bonus: 2"));
        assert!(text.contains("(equipped)"));
    }
}
