//! Derived stat formulas
//!
//! - mod = floor((value - 10) / 2)
//! - hp.max = 2 * con + con mod * level
//! - wp.max = int + int mod * level
//! - ac = 10 + dex mod (capped by armor) + armor bonus
//! - initiative = dex mod
//! - dodge / resistance / fortitude = 8 + dex / wis / con mod
//!
//! Scores are unbounded, so every formula is computed in `i64` and saturated
//! back into `i32`.

use crate::config::constants;
use crate::equipment::ArmorContribution;
use crate::types::{AttributeScore, Attributes, CombatStats, Level, Resources, Saves};
use item_core::Attribute;

/// Attribute modifier for a raw score (floor division, also for low scores)
pub fn modifier(value: i32) -> i32 {
    ((i64::from(value) - 10).div_euclid(2)) as i32
}

/// Recompute every attribute's modifier from its value
pub fn derive_modifiers(attributes: &mut Attributes) {
    for attr in Attribute::all() {
        let score = attributes.get_mut(*attr);
        score.modifier = modifier(score.value);
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

pub fn hp_max(con: &AttributeScore, level: &Level) -> i32 {
    let factor = i64::from(constants().resources.hp_con_factor);
    saturate(
        factor * i64::from(con.value) + i64::from(con.modifier) * i64::from(level.effective()),
    )
}

pub fn wp_max(int: &AttributeScore, level: &Level) -> i32 {
    saturate(i64::from(int.value) + i64::from(int.modifier) * i64::from(level.effective()))
}

pub fn armor_class(dex_mod: i32, armor: &ArmorContribution) -> i32 {
    saturate(
        i64::from(constants().armor_class.base)
            + i64::from(armor.effective_dex_mod(dex_mod))
            + i64::from(armor.armor_bonus),
    )
}

pub fn saves(attributes: &Attributes) -> Saves {
    let base = constants().saves.base;
    Saves {
        dodge: base.saturating_add(attributes.dexterity.modifier),
        resistance: base.saturating_add(attributes.wisdom.modifier),
        fortitude: base.saturating_add(attributes.constitution.modifier),
    }
}

/// Write resource maxima, combat numbers and saves from attributes whose
/// modifiers are already derived, then clamp the resources.
pub fn derive_stats(
    attributes: &Attributes,
    level: &Level,
    armor: &ArmorContribution,
    resources: &mut Resources,
    combat: &mut CombatStats,
    saves_out: &mut Saves,
) {
    resources.hp.max = hp_max(&attributes.constitution, level);
    resources.wp.max = wp_max(&attributes.intelligence, level);
    resources.clamp_all();

    combat.ac.value = armor_class(attributes.dexterity.modifier, armor);
    combat.initiative.value = attributes.dexterity.modifier;

    *saves_out = saves(attributes);
}
