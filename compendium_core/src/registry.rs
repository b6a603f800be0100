use crate::config::CompendiumFile;
use crate::{ConfigError, LookupError};
use actor_core::Actor;
use item_core::{Formula, Item, ItemKind};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Registry of compendium items and actors, loaded from TOML files
#[derive(Debug, Default)]
pub struct CompendiumRegistry {
    items: HashMap<String, Item>,
    actors: HashMap<String, Actor>,
}

impl CompendiumRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all compendium files from a directory (recursively)
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        registry.load_dir(dir)?;
        info!(
            dir = %dir.display(),
            items = registry.items.len(),
            actors = registry.actors.len(),
            "loaded compendium"
        );
        Ok(registry)
    }

    fn load_dir(&mut self, dir: &Path) -> Result<(), ConfigError> {
        if !dir.exists() {
            return Ok(());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(dir.to_path_buf()),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::Io {
                error: e,
                path: Some(dir.to_path_buf()),
            })?;
            let path = entry.path();

            if path.is_dir() {
                self.load_dir(&path)?;
            } else if path.extension().is_some_and(|ext| ext == "toml") {
                self.load_file(&path)?;
            }
        }

        Ok(())
    }

    fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;

        let file: CompendiumFile = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            error: e,
            path: path.to_path_buf(),
        })?;

        let invalid = |message: String| ConfigError::Validation {
            message,
            path: path.to_path_buf(),
        };

        let (item_count, actor_count) = (file.items.len(), file.actors.len());

        for mut item in file.items {
            item.prepare();
            check_formulas(&item).map_err(invalid)?;
            if self.items.contains_key(&item.name) {
                return Err(invalid(format!("duplicate item '{}'", item.name)));
            }
            self.items.insert(item.name.clone(), item);
        }

        for mut actor in file.actors {
            actor.prepare_data();
            for item in &actor.items {
                check_formulas(item)
                    .map_err(|message| invalid(format!("actor '{}': {}", actor.name, message)))?;
            }
            if self.actors.contains_key(&actor.name) {
                return Err(invalid(format!("duplicate actor '{}'", actor.name)));
            }
            self.actors.insert(actor.name.clone(), actor);
        }

        info!(
            path = %path.display(),
            items = item_count,
            actors = actor_count,
            "loaded compendium file"
        );
        Ok(())
    }

    /// Get a prepared item by name
    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.get(name)
    }

    /// Get a derived actor by name
    pub fn actor(&self, name: &str) -> Option<&Actor> {
        self.actors.get(name)
    }

    /// List all item names
    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(|s| s.as_str())
    }

    /// List all actor names
    pub fn actor_names(&self) -> impl Iterator<Item = &str> {
        self.actors.keys().map(|s| s.as_str())
    }

    /// Clone an actor, hand it copies of the named items and derive it
    pub fn instantiate_actor(&self, name: &str, item_names: &[&str]) -> Result<Actor, LookupError> {
        let mut actor = self
            .actor(name)
            .cloned()
            .ok_or_else(|| LookupError::UnknownActor(name.to_string()))?;

        for item_name in item_names {
            let item = self
                .item(item_name)
                .ok_or_else(|| LookupError::UnknownItem(item_name.to_string()))?;
            actor.add_item(item.clone());
        }

        actor.prepare_data();
        Ok(actor)
    }
}

/// Damage formulas must parse before an item is accepted
fn check_formulas(item: &Item) -> Result<(), String> {
    let damage = match &item.kind {
        ItemKind::Weapon(weapon) => weapon.damage.as_ref(),
        ItemKind::Spell(spell) => spell.damage.as_ref(),
        _ => None,
    };

    if let Some(damage) = damage {
        Formula::parse(&damage.formula).map_err(|e| {
            format!(
                "item '{}' has invalid damage formula '{}': {}",
                item.name, damage.formula, e
            )
        })?;
    }
    Ok(())
}
