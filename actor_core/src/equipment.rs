//! Equipment aggregation - folds worn armor and shield into AC inputs
//!
//! Both lookups take the first match in the actor's stored item order. The
//! shield lookup is independent of the armor lookup, so its bonus is added
//! even when the shield is itself the first equipped armor piece.

use item_core::{Armor, Item};

/// Armor inputs to the AC formula
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArmorContribution {
    /// Total bonus from worn armor plus shield
    pub armor_bonus: i32,
    /// Cap on the dexterity modifier; `None` means uncapped
    pub dex_limit: Option<i32>,
}

impl ArmorContribution {
    /// Scan `items` in order for equipped armor and an equipped shield
    pub fn from_items(items: &[Item]) -> Self {
        let mut contribution = ArmorContribution::default();

        if let Some(armor) = equipped_armor(items).next() {
            contribution.armor_bonus = armor.armor_bonus.unwrap_or(0);
            contribution.dex_limit = armor.dex_limit;
        }

        if let Some(shield) = equipped_armor(items).find(|armor| armor.is_shield()) {
            contribution.armor_bonus = contribution
                .armor_bonus
                .saturating_add(shield.armor_bonus.unwrap_or(0));
        }

        contribution
    }

    /// Dexterity modifier after the armor's cap
    pub fn effective_dex_mod(&self, dex_mod: i32) -> i32 {
        match self.dex_limit {
            Some(limit) => dex_mod.min(limit),
            None => dex_mod,
        }
    }
}

fn equipped_armor(items: &[Item]) -> impl Iterator<Item = &Armor> {
    items
        .iter()
        .filter_map(Item::as_armor)
        .filter(|armor| armor.equipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use item_core::{ArmorType, Weapon};

    fn armor(name: &str, armor_type: ArmorType, bonus: i32, equipped: bool) -> Item {
        let mut item = Item::armor(
            name,
            Armor {
                armor_type: Some(armor_type),
                armor_bonus: Some(bonus),
                equipped,
                ..Default::default()
            },
        );
        item.prepare();
        item
    }

    #[test]
    fn test_nothing_equipped() {
        let items = vec![
            armor("Chain", ArmorType::Medium, 4, false),
            Item::weapon("Sword", Weapon::default()),
        ];
        assert_eq!(ArmorContribution::from_items(&items), ArmorContribution::default());
    }

    #[test]
    fn test_first_equipped_armor_wins() {
        let items = vec![
            armor("Leather", ArmorType::Light, 1, false),
            armor("Chain", ArmorType::Medium, 4, true),
            armor("Plate", ArmorType::Heavy, 6, true),
        ];
        let contribution = ArmorContribution::from_items(&items);
        assert_eq!(contribution.armor_bonus, 4);
        assert_eq!(contribution.dex_limit, Some(2));
    }

    #[test]
    fn test_shield_adds_on_top() {
        let items = vec![
            armor("Plate", ArmorType::Heavy, 6, true),
            armor("Buckler", ArmorType::Shield, 1, true),
            armor("Tower", ArmorType::Shield, 3, true),
        ];
        let contribution = ArmorContribution::from_items(&items);
        assert_eq!(contribution.armor_bonus, 7);
        assert_eq!(contribution.dex_limit, Some(0));
    }

    #[test]
    fn test_lone_shield_counts_through_both_lookups() {
        let items = vec![armor("Buckler", ArmorType::Shield, 2, true)];
        let contribution = ArmorContribution::from_items(&items);
        assert_eq!(contribution.armor_bonus, 4);
        assert_eq!(contribution.dex_limit, None);
    }

    #[test]
    fn test_missing_bonus_counts_as_zero() {
        // never prepared, so no default bonus and no dex limit
        let items = vec![Item::armor(
            "Mystery",
            Armor {
                equipped: true,
                ..Default::default()
            },
        )];
        assert_eq!(ArmorContribution::from_items(&items), ArmorContribution::default());
    }

    #[test]
    fn test_huge_bonuses_saturate() {
        let items = vec![
            armor("Aegis", ArmorType::Heavy, i32::MAX, true),
            armor("Wall", ArmorType::Shield, i32::MAX, true),
        ];
        assert_eq!(ArmorContribution::from_items(&items).armor_bonus, i32::MAX);
    }

    #[test]
    fn test_effective_dex_mod() {
        let capped = ArmorContribution {
            armor_bonus: 3,
            dex_limit: Some(2),
        };
        assert_eq!(capped.effective_dex_mod(4), 2);
        assert_eq!(capped.effective_dex_mod(-1), -1);

        let uncapped = ArmorContribution::default();
        assert_eq!(uncapped.effective_dex_mod(4), 4);
    }
}
