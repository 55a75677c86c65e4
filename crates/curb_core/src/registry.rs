use crate::assets::SpriteLoader;
use crate::entity::Entity;
use crate::error::{Result, RuntimeError};

pub type CharacterFactory = fn(&dyn SpriteLoader) -> Result<Entity>;

#[derive(Clone, Copy)]
struct Entry {
    id: &'static str,
    factory: CharacterFactory,
}

/// Playable characters by id, in registration order.
#[derive(Clone, Default)]
pub struct CharacterRegistry {
    entries: Vec<Entry>,
}

impl CharacterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later registrations of an existing id replace the factory in place.
    pub fn register(mut self, id: &'static str, factory: CharacterFactory) -> Self {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                log::warn!("Character '{id}' registered twice, keeping the last factory");
                entry.factory = factory;
            }
            None => self.entries.push(Entry { id, factory }),
        }
        self
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(&self, id: &str, loader: &dyn SpriteLoader) -> Result<Entity> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| RuntimeError::UnknownCharacter { id: id.to_string() })?;
        (entry.factory)(loader)
    }

    /// Build every character. One that fails to load is logged and left
    /// out; the rest are still returned.
    pub fn build_all(&self, loader: &dyn SpriteLoader) -> Vec<(&'static str, Entity)> {
        self.entries
            .iter()
            .filter_map(|entry| match (entry.factory)(loader) {
                Ok(entity) => Some((entry.id, entity)),
                Err(e) => {
                    log::error!("Skipping character '{}': {e}", entry.id);
                    None
                }
            })
            .collect()
    }
}
