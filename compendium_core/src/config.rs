use actor_core::Actor;
use item_core::Item;
use serde::Deserialize;

/// TOML layout of a compendium file
#[derive(Debug, Deserialize)]
pub struct CompendiumFile {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub actors: Vec<Actor>,
}
