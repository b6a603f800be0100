//! Small sheet-math helpers

use serde::{Deserialize, Serialize};

/// Format a modifier with an explicit sign: `+2`, `-1`, `+0`
pub fn format_modifier(value: i32) -> String {
    if value >= 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

/// How an effect modifier combines with its base value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    Flat,
    Percent,
}

/// A flat or percentage adjustment from an effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectModifier {
    #[serde(rename = "type")]
    pub kind: ModifierKind,
    pub value: f64,
}

impl EffectModifier {
    pub fn flat(value: f64) -> Self {
        EffectModifier {
            kind: ModifierKind::Flat,
            value,
        }
    }

    pub fn percent(value: f64) -> Self {
        EffectModifier {
            kind: ModifierKind::Percent,
            value,
        }
    }
}

/// Apply all flat modifiers, then each percentage modifier in turn, and round
/// to the nearest integer (halves round up).
pub fn calculate_effect_value(base: f64, modifiers: &[EffectModifier]) -> i64 {
    let flat: f64 = modifiers
        .iter()
        .filter(|m| m.kind == ModifierKind::Flat)
        .map(|m| m.value)
        .sum();

    let total = modifiers
        .iter()
        .filter(|m| m.kind == ModifierKind::Percent)
        .fold(base + flat, |total, m| total * (1.0 + m.value / 100.0));

    (total + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_modifier() {
        assert_eq!(format_modifier(2), "+2");
        assert_eq!(format_modifier(0), "+0");
        assert_eq!(format_modifier(-3), "-3");
    }

    #[test]
    fn test_flat_then_percent() {
        let mods = [
            EffectModifier::percent(50.0),
            EffectModifier::flat(2.0),
            EffectModifier::flat(-1.0),
        ];
        // (10 + 2 - 1) * 1.5 = 16.5
        assert_eq!(calculate_effect_value(10.0, &mods), 17);
    }

    #[test]
    fn test_percent_compounds() {
        let mods = [EffectModifier::percent(10.0), EffectModifier::percent(10.0)];
        // 100 * 1.1 * 1.1 = 121
        assert_eq!(calculate_effect_value(100.0, &mods), 121);
    }

    #[test]
    fn test_negative_halves_round_up() {
        assert_eq!(calculate_effect_value(-2.5, &[]), -2);
        assert_eq!(calculate_effect_value(7.0, &[]), 7);
    }

    #[test]
    fn test_modifier_document_shape() {
        let m: EffectModifier = serde_json::from_str(r#"{ "type": "percent", "value": 25 }"#).unwrap();
        assert_eq!(m, EffectModifier::percent(25.0));
    }
}
