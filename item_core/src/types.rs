use serde::{Deserialize, Serialize};
use std::fmt;

/// The six character attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    #[serde(rename = "str")]
    Strength,
    #[serde(rename = "dex")]
    Dexterity,
    #[serde(rename = "con")]
    Constitution,
    #[serde(rename = "int")]
    Intelligence,
    #[serde(rename = "wis")]
    Wisdom,
    #[serde(rename = "cha")]
    Charisma,
}

impl Attribute {
    /// Get all attributes in sheet order
    pub fn all() -> &'static [Attribute] {
        &[
            Attribute::Strength,
            Attribute::Dexterity,
            Attribute::Constitution,
            Attribute::Intelligence,
            Attribute::Wisdom,
            Attribute::Charisma,
        ]
    }

    /// Short key used in documents and roll formulas (`str`, `dex`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            Attribute::Strength => "str",
            Attribute::Dexterity => "dex",
            Attribute::Constitution => "con",
            Attribute::Intelligence => "int",
            Attribute::Wisdom => "wis",
            Attribute::Charisma => "cha",
        }
    }

    /// Roll-data path of this attribute's modifier, e.g. `@attributes.dex.mod`
    pub fn mod_formula(&self) -> String {
        format!("@attributes.{}.mod", self.key())
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Strength => write!(f, "Strength"),
            Attribute::Dexterity => write!(f, "Dexterity"),
            Attribute::Constitution => write!(f, "Constitution"),
            Attribute::Intelligence => write!(f, "Intelligence"),
            Attribute::Wisdom => write!(f, "Wisdom"),
            Attribute::Charisma => write!(f, "Charisma"),
        }
    }
}

/// Damage types for weapons and spells
///
/// Like armor types, unknown keys load as `Other` so a homebrew damage type
/// does not reject the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum DamageType {
    #[default]
    Slashing,
    Piercing,
    Bludgeoning,
    Fire,
    Cold,
    Lightning,
    Acid,
    Poison,
    Necrotic,
    Radiant,
    Force,
    Psychic,
    Other(String),
}

const KNOWN_DAMAGE_TYPES: &[DamageType] = &[
    DamageType::Slashing,
    DamageType::Piercing,
    DamageType::Bludgeoning,
    DamageType::Fire,
    DamageType::Cold,
    DamageType::Lightning,
    DamageType::Acid,
    DamageType::Poison,
    DamageType::Necrotic,
    DamageType::Radiant,
    DamageType::Force,
    DamageType::Psychic,
];

impl DamageType {
    /// The recognized damage types
    pub fn all() -> &'static [DamageType] {
        KNOWN_DAMAGE_TYPES
    }

    pub fn key(&self) -> &str {
        match self {
            DamageType::Slashing => "slashing",
            DamageType::Piercing => "piercing",
            DamageType::Bludgeoning => "bludgeoning",
            DamageType::Fire => "fire",
            DamageType::Cold => "cold",
            DamageType::Lightning => "lightning",
            DamageType::Acid => "acid",
            DamageType::Poison => "poison",
            DamageType::Necrotic => "necrotic",
            DamageType::Radiant => "radiant",
            DamageType::Force => "force",
            DamageType::Psychic => "psychic",
            DamageType::Other(key) => key,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, DamageType::Other(_))
    }
}

impl From<String> for DamageType {
    fn from(key: String) -> Self {
        match key.as_str() {
            "slashing" => DamageType::Slashing,
            "piercing" => DamageType::Piercing,
            "bludgeoning" => DamageType::Bludgeoning,
            "fire" => DamageType::Fire,
            "cold" => DamageType::Cold,
            "lightning" => DamageType::Lightning,
            "acid" => DamageType::Acid,
            "poison" => DamageType::Poison,
            "necrotic" => DamageType::Necrotic,
            "radiant" => DamageType::Radiant,
            "force" => DamageType::Force,
            "psychic" => DamageType::Psychic,
            _ => DamageType::Other(key),
        }
    }
}

impl From<&str> for DamageType {
    fn from(key: &str) -> Self {
        DamageType::from(key.to_string())
    }
}

impl From<DamageType> for String {
    fn from(damage_type: DamageType) -> Self {
        match damage_type {
            DamageType::Other(key) => key,
            known => known.key().to_string(),
        }
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DamageType::Slashing => write!(f, "Slashing"),
            DamageType::Piercing => write!(f, "Piercing"),
            DamageType::Bludgeoning => write!(f, "Bludgeoning"),
            DamageType::Fire => write!(f, "Fire"),
            DamageType::Cold => write!(f, "Cold"),
            DamageType::Lightning => write!(f, "Lightning"),
            DamageType::Acid => write!(f, "Acid"),
            DamageType::Poison => write!(f, "Poison"),
            DamageType::Necrotic => write!(f, "Necrotic"),
            DamageType::Radiant => write!(f, "Radiant"),
            DamageType::Force => write!(f, "Force"),
            DamageType::Psychic => write!(f, "Psychic"),
            DamageType::Other(key) => write!(f, "{}", key),
        }
    }
}

/// Armor categories
///
/// Unknown keys are kept as `Other` instead of failing to load, so documents
/// authored against a newer rule set still prepare.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArmorType {
    Light,
    Medium,
    Heavy,
    Shield,
    Other(String),
}

const RECOGNIZED_ARMOR_TYPES: &[ArmorType] = &[
    ArmorType::Light,
    ArmorType::Medium,
    ArmorType::Heavy,
    ArmorType::Shield,
];

impl ArmorType {
    /// The recognized armor types
    pub fn all() -> &'static [ArmorType] {
        RECOGNIZED_ARMOR_TYPES
    }

    pub fn key(&self) -> &str {
        match self {
            ArmorType::Light => "light",
            ArmorType::Medium => "medium",
            ArmorType::Heavy => "heavy",
            ArmorType::Shield => "shield",
            ArmorType::Other(key) => key,
        }
    }

    /// Cap on the dexterity modifier that counts towards AC while worn.
    /// `None` means uncapped.
    pub fn dex_limit(&self) -> Option<i32> {
        match self {
            ArmorType::Medium => Some(2),
            ArmorType::Heavy => Some(0),
            ArmorType::Light | ArmorType::Shield | ArmorType::Other(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, ArmorType::Other(_))
    }

    /// An empty key counts as no armor type at all
    pub fn is_blank(&self) -> bool {
        matches!(self, ArmorType::Other(key) if key.trim().is_empty())
    }
}

impl From<String> for ArmorType {
    fn from(key: String) -> Self {
        match key.as_str() {
            "light" => ArmorType::Light,
            "medium" => ArmorType::Medium,
            "heavy" => ArmorType::Heavy,
            "shield" => ArmorType::Shield,
            _ => ArmorType::Other(key),
        }
    }
}

impl From<&str> for ArmorType {
    fn from(key: &str) -> Self {
        ArmorType::from(key.to_string())
    }
}

impl From<ArmorType> for String {
    fn from(armor_type: ArmorType) -> Self {
        match armor_type {
            ArmorType::Other(key) => key,
            known => known.key().to_string(),
        }
    }
}

impl fmt::Display for ArmorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmorType::Light => write!(f, "Light Armor"),
            ArmorType::Medium => write!(f, "Medium Armor"),
            ArmorType::Heavy => write!(f, "Heavy Armor"),
            ArmorType::Shield => write!(f, "Shield"),
            ArmorType::Other(key) => write!(f, "{}", key),
        }
    }
}

/// Whether an attack is made in melee or at range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    #[default]
    Melee,
    Ranged,
}

impl AttackType {
    /// Attribute that drives attack and damage rolls for this attack type
    pub fn attribute(&self) -> Attribute {
        match self {
            AttackType::Melee => Attribute::Strength,
            AttackType::Ranged => Attribute::Dexterity,
        }
    }
}

impl fmt::Display for AttackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackType::Melee => write!(f, "Melee"),
            AttackType::Ranged => write!(f, "Ranged"),
        }
    }
}

/// Declares a keyed rule taxonomy: a `Copy` enum with its document key and
/// display label, plus `all()`, `key()`, `label()` and `Display`.
macro_rules! rule_table {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $key:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl $name {
            pub fn all() -> &'static [$name] {
                &[$($name::$variant),+]
            }

            pub fn key(&self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

rule_table! {
    /// Weapon families
    WeaponType {
        Axe => "axe", "Axe";
        Bow => "bow", "Bow";
        Blunderbuss => "blunderbuss", "Blunderbuss";
        Dagger => "dagger", "Dagger";
        Fist => "fist", "Fist Weapon";
        HeavyGun => "heavyGun", "Heavy Gun";
        Katana => "katana", "Katana";
        Mace => "mace", "Mace";
        Pistol => "pistol", "Pistol";
        Polearm => "polearm", "Polearm";
        Rifle => "rifle", "Rifle";
        Shield => "shield", "Shield";
        Sniper => "sniper", "Sniper";
        Spear => "spear", "Spear";
        Staff => "staff", "Staff";
        Sword => "sword", "Sword";
        Thrown => "thrown", "Thrown";
    }
}

rule_table! {
    /// Weapon properties
    WeaponProperty {
        Block => "block", "Block";
        Finesse => "finesse", "Finesse";
        Heavy => "heavy", "Heavy";
        Light => "light", "Light";
        Loading => "loading", "Loading";
        Reach => "reach", "Reach";
        TwoHanded => "twoHanded", "Two-Handed";
        Versatile => "versatile", "Versatile";
        Thrown => "thrown", "Thrown";
        Ammunition => "ammunition", "Ammunition";
        Stance => "stance", "Stance";
        Guarding => "guarding", "Guarding";
        Swift => "swift", "Swift";
        Piercing => "piercing", "Piercing";
        Slashing => "slashing", "Slashing";
        Impact => "impact", "Impact";
        Sweeping => "sweeping", "Sweeping";
    }
}

rule_table! {
    /// Schools of magic a spell can belong to
    MagicSchool {
        Light => "light", "Light";
        Fire => "fire", "Fire";
        Arcana => "arcana", "Arcana";
        Dark => "dark", "Dark";
        Frost => "frost", "Frost";
        Nature => "nature", "Nature";
        Divine => "divine", "Divine";
        Elemental => "elemental", "Elemental";
        Psychic => "psychic", "Psychic";
        Supernatural => "supernatural", "Supernatural";
        Primal => "primal", "Primal";
    }
}

rule_table! {
    /// Where an ability's power comes from
    MagicSource {
        Divine => "divine", "Divine";
        Elemental => "elemental", "Elemental";
        Arcana => "arcana", "Arcana";
        Psychic => "psychic", "Psychic";
        Supernatural => "supernatural", "Supernatural";
        Primal => "primal", "Primal";
        Martial => "martial", "Martial";
    }
}

rule_table! {
    /// How an ability is used
    AbilityType {
        Active => "active", "Active";
        Passive => "passive", "Passive";
        Reaction => "reaction", "Reaction";
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_keys_round_trip_through_serde() {
        for attr in Attribute::all() {
            let json = serde_json::to_string(attr).unwrap();
            assert_eq!(json, format!("\"{}\"", attr.key()));
            let back: Attribute = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *attr);
        }
    }

    #[test]
    fn test_armor_dex_limits() {
        assert_eq!(ArmorType::Light.dex_limit(), None);
        assert_eq!(ArmorType::Medium.dex_limit(), Some(2));
        assert_eq!(ArmorType::Heavy.dex_limit(), Some(0));
        assert_eq!(ArmorType::Shield.dex_limit(), None);
        assert_eq!(ArmorType::from("mithral").dex_limit(), None);
    }

    #[test]
    fn test_unknown_armor_type_is_preserved() {
        let armor_type: ArmorType = serde_json::from_str("\"mithral\"").unwrap();
        assert_eq!(armor_type, ArmorType::Other("mithral".to_string()));
        assert!(!armor_type.is_recognized());
        assert_eq!(serde_json::to_string(&armor_type).unwrap(), "\"mithral\"");

        let shield: ArmorType = serde_json::from_str("\"shield\"").unwrap();
        assert_eq!(shield, ArmorType::Shield);
    }

    #[test]
    fn test_unknown_damage_type_is_preserved() {
        let radiant: DamageType = serde_json::from_str("\"radiant\"").unwrap();
        assert_eq!(radiant, DamageType::Radiant);
        assert!(radiant.is_recognized());

        let sonic: DamageType = serde_json::from_str("\"sonic\"").unwrap();
        assert_eq!(sonic, DamageType::Other("sonic".to_string()));
        assert!(!sonic.is_recognized());
        assert_eq!(serde_json::to_string(&sonic).unwrap(), "\"sonic\"");

        for known in DamageType::all() {
            assert_eq!(&DamageType::from(known.key()), known);
        }
    }

    #[test]
    fn test_blank_armor_type() {
        assert!(ArmorType::from("").is_blank());
        assert!(ArmorType::from("  ").is_blank());
        assert!(!ArmorType::Light.is_blank());
    }

    #[test]
    fn test_camel_case_keys() {
        let prop: WeaponProperty = serde_json::from_str("\"twoHanded\"").unwrap();
        assert_eq!(prop, WeaponProperty::TwoHanded);
        assert_eq!(prop.to_string(), "Two-Handed");

        let weapon: WeaponType = serde_json::from_str("\"heavyGun\"").unwrap();
        assert_eq!(weapon.label(), "Heavy Gun");
    }

    #[test]
    fn test_attack_type_attribute() {
        assert_eq!(AttackType::Melee.attribute(), Attribute::Strength);
        assert_eq!(AttackType::Ranged.attribute(), Attribute::Dexterity);
        assert_eq!(Attribute::Dexterity.mod_formula(), "@attributes.dex.mod");
    }

    #[test]
    fn test_tables_are_complete() {
        assert_eq!(DamageType::all().len(), 12);
        assert_eq!(WeaponType::all().len(), 17);
        assert_eq!(WeaponProperty::all().len(), 17);
        assert_eq!(MagicSchool::all().len(), 11);
        assert_eq!(MagicSource::all().len(), 7);
        assert_eq!(AbilityType::all().len(), 3);
    }
}
