use log::debug;
use serde::{Deserialize, Serialize};

/// Saved lines in insertion order. Serialized as a plain JSON array of strings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesList(Vec<String>);

impl FavoritesList {
    pub const fn new() -> Self {
        FavoritesList(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns a copy with `line` appended, or `None` when the line is blank.
    /// Duplicates are kept.
    pub fn with_appended(&self, line: &str) -> Option<FavoritesList> {
        if line.trim().is_empty() {
            return None;
        }
        let mut entries = self.0.clone();
        entries.push(line.to_string());
        Some(FavoritesList(entries))
    }

    /// Returns a copy without the entry at `index`, or `None` when out of range.
    pub fn without(&self, index: usize) -> Option<FavoritesList> {
        if index >= self.0.len() {
            debug!("Favorite index {index} out of range (len {})", self.0.len());
            return None;
        }
        let mut entries = self.0.clone();
        entries.remove(index);
        Some(FavoritesList(entries))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

impl<S: Into<String>> FromIterator<S> for FavoritesList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        FavoritesList(iter.into_iter().map(Into::into).collect())
    }
}
