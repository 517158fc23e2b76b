use std::path::PathBuf;

use linegen::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use linegen::GeminiConfig;
use rizzroast_model::{Namespace, Screen};
use serde::{Deserialize, Serialize};

use super::store;

const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Falls back to GEMINI_API_KEY from the environment, then from build time.
    #[serde(default)]
    pub gemini_api_key: String,

    #[serde(default = "default_gemini_endpoint")]
    pub gemini_endpoint: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_serving_addr")]
    pub serving_addr: String,

    #[serde(default = "default_static_serving_dir")]
    pub static_serving_dir: PathBuf,

    #[serde(default = "default_favorites_dir")]
    pub favorites_dir: PathBuf,

    #[serde(default = "default_pickup_namespace")]
    pub pickup_namespace: Namespace,

    #[serde(default = "default_roast_namespace")]
    pub roast_namespace: Namespace,
}

fn default_gemini_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_gemini_model() -> String {
    DEFAULT_MODEL.into()
}

fn default_serving_addr() -> String {
    "0.0.0.0:3000".into()
}

fn default_static_serving_dir() -> PathBuf {
    "ui/dist".into()
}

fn default_favorites_dir() -> PathBuf {
    store::data_dir().join("favorites")
}

fn default_pickup_namespace() -> Namespace {
    Namespace::from("pickupFavorites")
}

fn default_roast_namespace() -> Namespace {
    Namespace::from("roastFavorites")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: Default::default(),
            gemini_endpoint: default_gemini_endpoint(),
            gemini_model: default_gemini_model(),
            serving_addr: default_serving_addr(),
            static_serving_dir: default_static_serving_dir(),
            favorites_dir: default_favorites_dir(),
            pickup_namespace: default_pickup_namespace(),
            roast_namespace: default_roast_namespace(),
        }
    }
}

impl Config {
    pub fn namespace(&self, screen: Screen) -> &Namespace {
        match screen {
            Screen::Pickup => &self.pickup_namespace,
            Screen::Roast => &self.roast_namespace,
        }
    }

    pub fn effective_api_key(&self) -> String {
        resolve_api_key(
            &self.gemini_api_key,
            std::env::var(API_KEY_ENV).ok(),
            option_env!("GEMINI_API_KEY"),
        )
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            endpoint: self.gemini_endpoint.clone(),
            model: self.gemini_model.clone(),
            api_key: self.effective_api_key(),
        }
    }
}

fn resolve_api_key(configured: &str, runtime: Option<String>, build_time: Option<&str>) -> String {
    if !configured.is_empty() {
        return configured.to_string();
    }
    runtime
        .filter(|key| !key.is_empty())
        .or_else(|| build_time.map(String::from))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_uses_defaults() {
        let config: Config =
            serde_yaml::from_str("geminiModel: gemini-1.5-pro\nroastNamespace: burns\n").unwrap();
        assert_eq!(config.gemini_model, "gemini-1.5-pro");
        assert_eq!(config.gemini_endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.serving_addr, "0.0.0.0:3000");
        assert_eq!(config.namespace(Screen::Roast).as_str(), "burns");
        assert_eq!(config.namespace(Screen::Pickup).as_str(), "pickupFavorites");
    }

    #[test]
    fn default_config_round_trips_through_yaml() {
        let config = Config::default();
        let text = serde_yaml::to_string(&config).unwrap();
        assert_eq!(serde_yaml::from_str::<Config>(&text).unwrap(), config);
    }

    #[test]
    fn api_key_precedence() {
        assert_eq!(resolve_api_key("cfg", Some("env".into()), Some("build")), "cfg");
        assert_eq!(resolve_api_key("", Some("env".into()), Some("build")), "env");
        assert_eq!(resolve_api_key("", Some("".into()), Some("build")), "build");
        assert_eq!(resolve_api_key("", None, None), "");
    }
}
