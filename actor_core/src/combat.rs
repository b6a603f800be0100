//! Roll formulas built from an actor's derived numbers
//!
//! These only build formula strings; rolling them and posting the result is
//! the host's job.

use crate::config::constants;
use crate::types::Attributes;
use item_core::{Attribute, Damage, Item, Weapon};

/// Attribute a weapon attacks and deals damage with: dex when its attack
/// bonus says so, strength otherwise
pub fn weapon_attribute(weapon: &Weapon) -> Attribute {
    match weapon.attack_bonus.as_ref().map(|bonus| bonus.attribute) {
        Some(Attribute::Dexterity) => Attribute::Dexterity,
        _ => Attribute::Strength,
    }
}

/// `1d20 + <attribute mod> + <flat bonus>`
pub fn weapon_attack_formula(attributes: &Attributes, weapon: &Weapon) -> String {
    let modifier = attributes.get(weapon_attribute(weapon)).modifier;
    let bonus = weapon
        .attack_bonus
        .as_ref()
        .and_then(|bonus| bonus.value)
        .unwrap_or(0);
    format!("{} + {} + {}", constants().rolls.attack_die, modifier, bonus)
}

/// `<damage formula> + <attribute mod>`
pub fn weapon_damage_formula(attributes: &Attributes, weapon: &Weapon) -> String {
    let modifier = attributes.get(weapon_attribute(weapon)).modifier;
    let damage = weapon.damage.clone().unwrap_or_else(Damage::default);
    format!("{} + {}", damage.formula, modifier)
}

/// Save DC of a spell cast by `owner`: base + best of int/wis/cha modifiers.
///
/// `None` for non-spells and for spells nobody owns.
pub fn spell_save_dc(item: &Item, owner: Option<&Attributes>) -> Option<i32> {
    item.as_spell()?;
    let attributes = owner?;
    let best = [
        attributes.intelligence.modifier,
        attributes.wisdom.modifier,
        attributes.charisma.modifier,
    ]
    .into_iter()
    .max()
    .unwrap_or(0);
    Some(constants().spells.dc_base.saturating_add(best))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ensure_constants_initialized;
    use crate::stats::derive_modifiers;
    use item_core::{validate_formula, AttackBonus, AttackType, Range, Spell};

    fn setup() -> Attributes {
        ensure_constants_initialized();
        // str +3, dex -1, int +1, wis +2, cha 0
        let mut attrs = Attributes::from_values([16, 8, 10, 12, 14, 10]);
        derive_modifiers(&mut attrs);
        attrs
    }

    fn prepared_weapon(range: Range, bonus: Option<i32>) -> Weapon {
        let mut item = Item::weapon(
            "w",
            Weapon {
                range: Some(range),
                attack_bonus: Some(AttackBonus {
                    value: bonus,
                    ..AttackBonus::default()
                }),
                ..Default::default()
            },
        );
        item.prepare();
        item.as_weapon().cloned().unwrap()
    }

    #[test]
    fn test_melee_attack_formula() {
        let attrs = setup();
        let weapon = prepared_weapon(Range::new(5, Some(5)), Some(1));
        let formula = weapon_attack_formula(&attrs, &weapon);
        assert_eq!(formula, "1d20 + 3 + 1");
        assert!(validate_formula(&formula));
    }

    #[test]
    fn test_ranged_attack_uses_dex() {
        let attrs = setup();
        let weapon = prepared_weapon(Range::new(80, Some(320)), None);
        assert_eq!(weapon_attribute(&weapon), Attribute::Dexterity);

        let formula = weapon_attack_formula(&attrs, &weapon);
        assert_eq!(formula, "1d20 + -1 + 0");
        assert!(validate_formula(&formula));
    }

    #[test]
    fn test_damage_formula() {
        let attrs = setup();
        let weapon = prepared_weapon(Range::new(5, Some(5)), None);
        assert_eq!(weapon_damage_formula(&attrs, &weapon), "1d6 + 3");
    }

    #[test]
    fn test_unprepared_weapon_defaults_to_strength() {
        let attrs = setup();
        let weapon = Weapon::default();
        assert_eq!(weapon.attack_type(), AttackType::Melee);
        assert_eq!(weapon_attack_formula(&attrs, &weapon), "1d20 + 3 + 0");
    }

    #[test]
    fn test_spell_save_dc_uses_best_casting_mod() {
        let attrs = setup();
        let spell = Item::spell("Hold Person", Spell::default());
        assert_eq!(spell_save_dc(&spell, Some(&attrs)), Some(10));
    }

    #[test]
    fn test_spell_save_dc_with_huge_score() {
        setup();
        let mut attrs = Attributes::from_values([10, 10, 10, i32::MAX, 10, 10]);
        derive_modifiers(&mut attrs);
        let spell = Item::spell("Wish", Spell::default());
        assert_eq!(spell_save_dc(&spell, Some(&attrs)), Some(8 + 1_073_741_818));
    }

    #[test]
    fn test_spell_save_dc_needs_owner_and_spell() {
        let attrs = setup();
        let spell = Item::spell("Hold Person", Spell::default());
        assert_eq!(spell_save_dc(&spell, None), None);
        assert_eq!(spell_save_dc(&Item::gear("Rope"), Some(&attrs)), None);
    }
}
