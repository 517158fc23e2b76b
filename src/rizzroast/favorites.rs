use std::collections::HashMap;

use anyhow::{Context as _, Result};
use log::{debug, info, warn};
use rizzroast_model::favorites::FavoritesList;
use rizzroast_model::Namespace;

use super::store::KeyValueStorage;

static EMPTY: FavoritesList = FavoritesList::new();

/// Favorites lists keyed by namespace. Every mutation rewrites the whole list.
pub struct FavoritesStore {
    storage: Box<dyn KeyValueStorage + Send>,
    lists: HashMap<Namespace, FavoritesList>,
}

impl FavoritesStore {
    pub fn new(storage: Box<dyn KeyValueStorage + Send>) -> Self {
        FavoritesStore {
            storage,
            lists: HashMap::new(),
        }
    }

    /// Reads the persisted list. Missing or unreadable data yields an empty list.
    pub fn load(&mut self, namespace: &Namespace) -> &FavoritesList {
        let list = match self.storage.get(namespace.as_str()) {
            Ok(Some(text)) => FavoritesList::from_json(&text).unwrap_or_else(|e| {
                warn!("Ignoring corrupted favorites in {namespace}: {e}");
                FavoritesList::new()
            }),
            Ok(None) => FavoritesList::new(),
            Err(e) => {
                warn!("Cannot read favorites {namespace}: {e:#}");
                FavoritesList::new()
            }
        };
        info!("Loaded {} favorites from {namespace}", list.len());
        self.lists.insert(namespace.clone(), list);
        self.get(namespace)
    }

    pub fn get(&self, namespace: &Namespace) -> &FavoritesList {
        self.lists.get(namespace).unwrap_or(&EMPTY)
    }

    /// Appends `line`. Blank lines are ignored.
    pub fn save(&mut self, namespace: &Namespace, line: &str) -> Result<&FavoritesList> {
        let Some(updated) = self.current(namespace).with_appended(line) else {
            debug!("Not saving blank line to {namespace}");
            return Ok(self.get(namespace));
        };
        self.persist(namespace, updated)
    }

    /// Removes the entry at `index`. Out of range indices are ignored.
    pub fn delete(&mut self, namespace: &Namespace, index: usize) -> Result<&FavoritesList> {
        let Some(updated) = self.current(namespace).without(index) else {
            return Ok(self.get(namespace));
        };
        self.persist(namespace, updated)
    }

    fn current(&mut self, namespace: &Namespace) -> &FavoritesList {
        if !self.lists.contains_key(namespace) {
            self.load(namespace);
        }
        self.get(namespace)
    }

    fn persist(&mut self, namespace: &Namespace, list: FavoritesList) -> Result<&FavoritesList> {
        let json = list.to_json()?;
        self.storage
            .set(namespace.as_str(), &json)
            .with_context(|| format!("Storing favorites {namespace} failed"))?;
        debug!("Stored {} favorites in {namespace}", list.len());
        self.lists.insert(namespace.clone(), list);
        Ok(self.get(namespace))
    }
}
