use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod emphasis;
pub mod favorites;
pub mod share;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    Pickup,
    Roast,
}

impl Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Screen::Pickup => "Pickup",
            Screen::Roast => "Roast",
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoastLevel {
    #[default]
    #[serde(alias = "mild")]
    Mild,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "savage")]
    Savage,
}

impl Display for RoastLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let txt = match self {
            RoastLevel::Mild => "Mild",
            RoastLevel::Medium => "Medium",
            RoastLevel::Savage => "Savage",
        };
        f.write_str(txt)
    }
}

#[derive(Error, Debug)]
#[error("Invalid value: {0}")]
pub struct FromStrError(String);

impl TryFrom<&str> for RoastLevel {
    type Error = FromStrError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "mild" => Ok(RoastLevel::Mild),
            "medium" => Ok(RoastLevel::Medium),
            "savage" => Ok(RoastLevel::Savage),
            _ => Err(FromStrError(value.to_string())),
        }
    }
}

impl TryFrom<String> for RoastLevel {
    type Error = FromStrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RoastLevel::try_from(value.as_str())
    }
}

/// What kind of line to ask the generator for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationMode {
    Pickup,
    Roast(RoastLevel),
}

impl GenerationMode {
    /// Mode used by a screen. Pickup screen ignores the level.
    pub fn for_screen(screen: Screen, level: Option<RoastLevel>) -> Self {
        match screen {
            Screen::Pickup => GenerationMode::Pickup,
            Screen::Roast => GenerationMode::Roast(level.unwrap_or_default()),
        }
    }
}

/// Storage key under which a favorites list is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Namespace(String);

impl Namespace {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for Namespace {
    fn from(value: String) -> Self {
        Namespace(value)
    }
}

impl From<&str> for Namespace {
    fn from(value: &str) -> Self {
        Namespace(value.to_string())
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
