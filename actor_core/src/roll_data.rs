//! Flattened roll data for the host's dice roller
//!
//! Formulas refer to actor numbers with `@`-paths such as
//! `@attributes.dex.mod`, `@dex_mod` or `@lvl`. `RollData` holds every path
//! an actor exposes, mapped to its current value.

use serde::Serialize;
use std::collections::BTreeMap;

/// Path → value mapping built from a derived actor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RollData {
    values: BTreeMap<String, i32>,
}

impl RollData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, value: i32) {
        self.values.insert(path.into(), value);
    }

    /// Look up a path, with or without the leading `@`
    pub fn get(&self, path: &str) -> Option<i32> {
        self.values.get(path.trim_start_matches('@')).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Replace every known `@path` in `formula` with its value.
    ///
    /// Negative values are parenthesized so `1d20 - @x` stays well formed.
    /// Unknown references are left in place for the host to resolve.
    pub fn substitute(&self, formula: &str) -> String {
        let mut out = String::with_capacity(formula.len());
        let mut chars = formula.char_indices().peekable();

        while let Some((start, c)) = chars.next() {
            if c != '@' {
                out.push(c);
                continue;
            }

            let mut end = start + 1;
            while let Some(&(i, next)) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' || next == '.' {
                    end = i + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }

            let path = formula[start + 1..end].trim_end_matches('.');
            match self.values.get(path) {
                Some(value) if *value < 0 => out.push_str(&format!("({})", value)),
                Some(value) => out.push_str(&value.to_string()),
                None => {
                    out.push('@');
                    out.push_str(path);
                }
            }
            // keep a trailing '.' that ended a sentence rather than a path
            out.push_str(&formula[start + 1 + path.len()..end]);
        }

        out
    }

    /// Roll data as a JSON object for handing to the host
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(*v)))
                .collect(),
        )
    }
}
